//! Packwise CLI - Turn supplier documents into product listings.

use clap::Parser;
use packwise_cli::commands;
use packwise_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr so JSON output stays clean)
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> packwise_cli::Result<()> {
    // Load or create config
    let mut config = Config::load(cli.config.as_deref())?;

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Profile(args) => {
            commands::execute_profile(args, &mut config, &formatter).await?;
        }
        Command::Extract(args) => {
            let profile = config.get_active_profile()?;
            commands::execute_extract(args, profile, &formatter).await?;
        }
        Command::Inspect(args) => {
            let profile = config.get_active_profile()?;
            commands::execute_inspect(args, profile, &formatter).await?;
        }
        Command::Settings(args) => {
            let profile = config.get_active_profile()?;
            commands::execute_settings(args, profile)?;
        }
    }

    Ok(())
}
