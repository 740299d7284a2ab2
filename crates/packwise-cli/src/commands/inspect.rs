//! Inspect and settings command implementations.

use super::load_document;
use crate::cli::{ContextArg, InspectArgs, SettingsArgs};
use crate::config::Profile;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use packwise_extractor::{ExtractorConfig, ProductExtractor};
use packwise_llm::MockProvider;

/// Execute the inspect command.
///
/// Runs every stage up to chunking with an offline provider, so it works
/// without network access or credentials.
pub async fn execute_inspect(args: InspectArgs, profile: &Profile, formatter: &Formatter) -> Result<()> {
    let document = load_document(&args.file, args.doc_type).await?;
    let config = profile.extractor_config()?;
    let extractor = ProductExtractor::new(MockProvider::default(), config)?;

    let plan = tokio::task::spawn_blocking(move || extractor.plan_document(&document))
        .await
        .map_err(|e| CliError::InvalidInput(format!("Inspection task failed: {}", e)))?;

    println!("{}", formatter.format_plan(&plan, args.show_text)?);
    Ok(())
}

/// Execute the settings command.
pub fn execute_settings(args: SettingsArgs, profile: &Profile) -> Result<()> {
    let config = match args.preset {
        Some(ContextArg::Small) => ExtractorConfig::small_context(),
        Some(ContextArg::Large) => ExtractorConfig::large_context(),
        None => profile.extractor_config()?,
    };
    println!("{}", config.to_toml().map_err(CliError::Config)?);
    Ok(())
}
