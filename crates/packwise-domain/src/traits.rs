//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// A single text-completion request
///
/// The pipeline treats the provider as unreliable: any call may time out,
/// fail, or return text that is not the requested JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Instructions describing the task and output schema
    pub system_prompt: String,

    /// The document text (or chunk) to analyze
    pub user_prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens the provider may generate
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    /// Create a new request
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature,
            max_output_tokens,
        }
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (packwise-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Submit a prompt and receive a single text completion
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;

    /// Name of the underlying model, for metadata and logs
    fn model_name(&self) -> &str;
}
