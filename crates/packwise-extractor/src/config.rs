//! Configuration for the Extractor

use crate::normalize::default_noise_patterns;
use crate::vocabulary::{default_priority_keywords, default_relevance_keywords};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token budget and sampling settings for the active provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderBudget {
    /// Provider label (for notes and logs)
    pub name: String,

    /// Maximum estimated tokens per chunk, kept below the real context limit
    pub token_budget: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens the provider may generate per call
    pub max_output_tokens: u32,
}

impl ProviderBudget {
    /// Large-context provider (e.g. Gemini / GPT-4 class)
    pub fn large_context() -> Self {
        Self {
            name: "large-context".to_string(),
            token_budget: 120_000,
            temperature: 0.1,
            max_output_tokens: 8_000,
        }
    }

    /// Small-context provider (e.g. hosted 8k models)
    pub fn small_context() -> Self {
        Self {
            name: "small-context".to_string(),
            token_budget: 7_000,
            temperature: 0.1,
            max_output_tokens: 2_000,
        }
    }
}

/// Keyword lists driving relevance filtering and chunk prioritization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordVocabulary {
    /// Full vocabulary; a line containing any of these is relevant
    pub relevance_keywords: Vec<String>,

    /// High-signal subset counted to order chunks
    pub priority_keywords: Vec<String>,
}

impl Default for KeywordVocabulary {
    fn default() -> Self {
        Self {
            relevance_keywords: default_relevance_keywords(),
            priority_keywords: default_priority_keywords(),
        }
    }
}

/// A noise-removal rule: every match of `pattern` is replaced by `replacement`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoisePattern {
    /// Regular expression (Rust `regex` syntax)
    pub pattern: String,

    /// Replacement text (may reference capture groups)
    #[serde(default)]
    pub replacement: String,
}

impl NoisePattern {
    /// Create a new noise pattern
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Active provider budget
    pub provider: ProviderBudget,

    /// Relevance and priority keywords
    pub vocabulary: KeywordVocabulary,

    /// Noise patterns applied by the normalizer, in order
    pub noise_patterns: Vec<NoisePattern>,

    /// Lines kept on each side of a relevant line
    pub context_window: usize,

    /// Disable to send the normalized text unfiltered
    pub relevance_filter_enabled: bool,

    /// Maximum time for a single LLM call (seconds)
    pub extraction_timeout_secs: u64,

    /// Minimum similarity for a catalog product to be reported
    pub similarity_threshold: f64,

    /// Maximum similar catalog products attached to each candidate
    pub max_similar_products: usize,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.provider.token_budget == 0 {
            return Err("provider.token_budget must be greater than 0".to_string());
        }
        if self.provider.max_output_tokens == 0 {
            return Err("provider.max_output_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(format!(
                "provider.temperature {} out of range [0.0, 2.0]",
                self.provider.temperature
            ));
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold {} out of range [0.0, 1.0]",
                self.similarity_threshold
            ));
        }
        if self.max_similar_products == 0 {
            return Err("max_similar_products must be greater than 0".to_string());
        }
        if self.vocabulary.relevance_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err("vocabulary.relevance_keywords must not be empty".to_string());
        }
        if self.vocabulary.priority_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err("vocabulary.priority_keywords must not be empty".to_string());
        }
        for noise in &self.noise_patterns {
            Regex::new(&noise.pattern)
                .map_err(|e| format!("invalid noise pattern '{}': {}", noise.pattern, e))?;
        }
        Ok(())
    }

    /// Large-context preset: 120k token budget, generous timeout
    pub fn large_context() -> Self {
        Self {
            provider: ProviderBudget::large_context(),
            vocabulary: KeywordVocabulary::default(),
            noise_patterns: default_noise_patterns(),
            context_window: 2,
            relevance_filter_enabled: true,
            extraction_timeout_secs: 180,
            similarity_threshold: 0.3,
            max_similar_products: 5,
        }
    }

    /// Small-context preset: 7k token budget, shorter timeout per chunk
    pub fn small_context() -> Self {
        Self {
            provider: ProviderBudget::small_context(),
            extraction_timeout_secs: 60,
            ..Self::large_context()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::large_context()
    }
}
