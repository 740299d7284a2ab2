//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use packwise_extractor::ExtractorConfig;
use packwise_llm::{MockProvider, OllamaProvider, OpenAiCompatProvider, Provider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// File this configuration was loaded from
    #[serde(skip)]
    path: Option<PathBuf>,
}

/// LLM backend of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible endpoint
    #[serde(rename = "openai")]
    OpenAi,
    /// Offline mock
    Mock,
}

/// Context size preset of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSize {
    /// Small-context models
    Small,
    /// Large-context models
    Large,
}

/// Provider profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// LLM backend
    pub backend: Backend,

    /// Model name
    pub model: String,

    /// API endpoint; backend default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Context size preset
    #[serde(default = "default_context")]
    pub context: ContextSize,

    /// Extractor configuration file overriding the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor_config: Option<PathBuf>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".packwise").join("config.toml"))
    }

    /// Load configuration from `path` (or the default path), or create default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            Self::default()
        };
        config.path = Some(path);
        Ok(config)
    }

    /// Save configuration to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => Self::default_path()?,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Profile {
    /// Extractor configuration: the override file if set, else the preset.
    pub fn extractor_config(&self) -> Result<ExtractorConfig> {
        let config = match &self.extractor_config {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                ExtractorConfig::from_toml(&contents).map_err(CliError::Config)?
            }
            None => match self.context {
                ContextSize::Small => ExtractorConfig::small_context(),
                ContextSize::Large => ExtractorConfig::large_context(),
            },
        };
        config.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Build the LLM provider described by this profile.
    pub fn build_provider(&self) -> Result<Provider> {
        let provider = match self.backend {
            Backend::Mock => Provider::Mock(MockProvider::new(r#"{"products": []}"#)),
            Backend::Ollama => Provider::Ollama(OllamaProvider::new(
                self.endpoint.as_deref().unwrap_or(DEFAULT_OLLAMA_ENDPOINT),
                &self.model,
            )?),
            Backend::OpenAi => {
                let key_env = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
                let api_key = std::env::var(key_env).map_err(|_| {
                    CliError::Config(format!("Environment variable {} is not set", key_env))
                })?;
                Provider::OpenAi(OpenAiCompatProvider::new(
                    self.endpoint.as_deref().unwrap_or(DEFAULT_OPENAI_ENDPOINT),
                    api_key,
                    &self.model,
                )?)
            }
        };
        Ok(provider)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "default".to_string(),
            Profile {
                backend: Backend::Ollama,
                model: "llama3.1".to_string(),
                endpoint: None,
                api_key_env: None,
                context: ContextSize::Small,
                extractor_config: None,
            },
        );

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
            path: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_context() -> ContextSize {
    ContextSize::Small
}
