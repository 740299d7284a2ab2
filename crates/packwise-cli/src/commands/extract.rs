//! Extract command implementation.

use super::load_document;
use crate::cli::ExtractArgs;
use crate::config::Profile;
use crate::error::Result;
use crate::output::Formatter;
use packwise_extractor::{CancelHandle, CatalogProduct, DocumentRequest, ProductExtractor};
use tracing::info;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, profile: &Profile, formatter: &Formatter) -> Result<()> {
    let document = load_document(&args.file, args.doc_type).await?;

    let mut config = profile.extractor_config()?;
    if let Some(timeout) = args.timeout {
        config.extraction_timeout_secs = timeout;
    }

    let catalog = match &args.catalog {
        Some(path) => {
            let contents = tokio::fs::read_to_string(path).await?;
            serde_json::from_str::<Vec<CatalogProduct>>(&contents)?
        }
        None => Vec::new(),
    };

    let provider = profile.build_provider()?;
    let extractor = ProductExtractor::new(provider, config)?.with_catalog(catalog);

    // Ctrl-C stops the job between chunks and keeps what was extracted
    let cancel = CancelHandle::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    info!("Extracting '{}' with model {}", document.filename, profile.model);
    let outcome = extractor
        .extract_document_with_cancel(DocumentRequest::new(document), &cancel)
        .await?;

    if let Some(path) = &args.output {
        tokio::fs::write(path, serde_json::to_string_pretty(&outcome)?).await?;
        eprintln!(
            "{}",
            formatter.success(&format!("Wrote {} product(s) to {}", outcome.products.len(), path.display()))
        );
    }

    println!("{}", formatter.format_outcome(&outcome)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Backend, ContextSize, OutputFormat};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_extract_with_mock_backend() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.xlsx");
        let output = dir.path().join("out.json");
        std::fs::write(&input, b"not a workbook").unwrap();

        let profile = Profile {
            backend: Backend::Mock,
            model: "mock".to_string(),
            endpoint: None,
            api_key_env: None,
            context: ContextSize::Small,
            extractor_config: None,
        };
        let args = ExtractArgs {
            file: input,
            doc_type: None,
            catalog: None,
            output: Some(output.clone()),
            timeout: Some(5),
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_extract(args, &profile, &formatter).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["summary"]["totalProducts"], 0);
        assert_eq!(written["metadata"]["format"], "spreadsheet");
    }
}
