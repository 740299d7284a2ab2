//! Text preparation ahead of extraction: normalize, filter, chunk, order

use crate::chunking::{estimate_tokens, TextChunk, TextChunker};
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::normalize::TextNormalizer;
use crate::prioritize::prioritize;
use crate::relevance::{RelevanceFilter, RelevanceOutcome};

/// Text ready to be sent to the model
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedText {
    /// Text after noise removal
    pub normalized: String,

    /// Relevance filtering result
    pub relevance: RelevanceOutcome,

    /// Chunks in processing (priority) order
    pub chunks: Vec<TextChunk>,
}

impl PreparedText {
    /// Estimated tokens of the filtered text
    pub fn estimated_tokens(&self) -> usize {
        estimate_tokens(&self.relevance.text)
    }
}

/// Runs the model-free stages of the pipeline
#[derive(Debug, Clone)]
pub struct Preprocessor {
    normalizer: TextNormalizer,
    relevance: RelevanceFilter,
    relevance_enabled: bool,
    chunker: TextChunker,
    priority_keywords: Vec<String>,
}

impl Preprocessor {
    /// Build the stages from configuration
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Ok(Self {
            normalizer: TextNormalizer::new(&config.noise_patterns)?,
            relevance: RelevanceFilter::new(
                &config.vocabulary.relevance_keywords,
                config.context_window,
            ),
            relevance_enabled: config.relevance_filter_enabled,
            chunker: TextChunker::new(config.provider.token_budget),
            priority_keywords: config.vocabulary.priority_keywords.clone(),
        })
    }

    /// Strip noise
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Keep relevant lines, or pass everything through when disabled
    pub fn filter(&self, text: &str) -> RelevanceOutcome {
        if self.relevance_enabled {
            self.relevance.filter(text)
        } else {
            let lines = text.lines().count();
            RelevanceOutcome {
                text: text.to_string(),
                matched_lines: lines,
                kept_lines: lines,
                fell_back: false,
            }
        }
    }

    /// Chunk under the token budget and order by priority
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        prioritize(self.chunker.chunk(text), &self.priority_keywords)
    }

    /// All three stages
    pub fn prepare(&self, text: &str) -> PreparedText {
        let normalized = self.normalize(text);
        let relevance = self.filter(&normalized);
        let chunks = self.chunk(&relevance.text);
        PreparedText {
            normalized,
            relevance,
            chunks,
        }
    }
}
