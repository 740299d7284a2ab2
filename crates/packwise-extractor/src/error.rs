//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Extraction call exceeded its timeout
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// LLM response located but not parseable
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Parsed product is missing a required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Job was cancelled before any chunk ran
    #[error("Extraction cancelled")]
    Cancelled,
}

/// Errors raised by a single format extractor
///
/// These never leave the formats module: `extract_text` turns them into a
/// diagnostic placeholder.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Container could not be opened (corrupt, encrypted, wrong format)
    #[error("cannot open {format} container: {reason}")]
    Open {
        /// Format that was attempted
        format: &'static str,
        /// Underlying library message
        reason: String,
    },

    /// A part inside the container could not be read
    #[error("cannot read part '{part}': {reason}")]
    Part {
        /// Part name (sheet, archive entry, page)
        part: String,
        /// Underlying library message
        reason: String,
    },

    /// The underlying library panicked
    #[error("{0} parser crashed")]
    Crashed(&'static str),
}
