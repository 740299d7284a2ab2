//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use packwise_domain::DocumentFormat;
use std::path::PathBuf;

/// Packwise CLI - Turn supplier documents into product listings.
#[derive(Debug, Parser)]
#[command(name = "packwise")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PACKWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (product names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract product candidates from a document
    Extract(ExtractArgs),

    /// Show how a document would be chunked, without calling a model
    Inspect(InspectArgs),

    /// Print the extractor configuration for the active profile
    Settings(SettingsArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Document to extract from (.xlsx, .xls, .ods, .pdf, .pptx)
    pub file: PathBuf,

    /// Document format, when the extension is missing or misleading
    #[arg(short = 't', long = "type", value_enum)]
    pub doc_type: Option<FormatArg>,

    /// JSON file with existing catalog products to compare against
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Write the full JSON outcome to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the per-call timeout (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the inspect command.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Document to inspect
    pub file: PathBuf,

    /// Document format, when the extension is missing or misleading
    #[arg(short = 't', long = "type", value_enum)]
    pub doc_type: Option<FormatArg>,

    /// Print the text of every chunk
    #[arg(long)]
    pub show_text: bool,
}

/// Arguments for the settings command.
#[derive(Debug, Parser)]
pub struct SettingsArgs {
    /// Print a preset instead of the active profile's configuration
    #[arg(long, value_enum)]
    pub preset: Option<ContextArg>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// LLM backend
        #[arg(short = 'b', long, value_enum)]
        backend: BackendArg,
        /// Model name
        #[arg(short, long)]
        model: String,
        /// API endpoint (Ollama or OpenAI-compatible base URL)
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Environment variable holding the API key
        #[arg(long)]
        api_key_env: Option<String>,
        /// Context size preset
        #[arg(long, value_enum, default_value = "small")]
        context: ContextArg,
        /// Extractor configuration file (TOML) overriding the preset
        #[arg(long)]
        extractor_config: Option<PathBuf>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Document format argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FormatArg {
    /// Excel or ODS workbook
    Spreadsheet,
    /// PDF with a text layer
    Pdf,
    /// PowerPoint deck
    Slides,
}

/// LLM backend argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum BackendArg {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible endpoint
    Openai,
    /// Offline mock that finds no products
    Mock,
}

/// Context size argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ContextArg {
    /// Small-context models (7k token chunks)
    Small,
    /// Large-context models (120k token chunks)
    Large,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<FormatArg> for DocumentFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Spreadsheet => DocumentFormat::Spreadsheet,
            FormatArg::Pdf => DocumentFormat::Pdf,
            FormatArg::Slides => DocumentFormat::Slides,
        }
    }
}

impl From<BackendArg> for crate::config::Backend {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Ollama => crate::config::Backend::Ollama,
            BackendArg::Openai => crate::config::Backend::OpenAi,
            BackendArg::Mock => crate::config::Backend::Mock,
        }
    }
}

impl From<ContextArg> for crate::config::ContextSize {
    fn from(context: ContextArg) -> Self {
        match context {
            ContextArg::Small => crate::config::ContextSize::Small,
            ContextArg::Large => crate::config::ContextSize::Large,
        }
    }
}
