//! Packwise LLM Provider Layer
//!
//! Pluggable implementations of the `LlmProvider` trait from `packwise-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `OllamaProvider`: Local Ollama chat API
//! - `OpenAiCompatProvider`: Any OpenAI-compatible chat-completions endpoint
//!   (OpenAI, Groq, DeepSeek, vLLM, ...)
//! - `Provider`: Runtime-selected wrapper over the above
//!
//! # Examples
//!
//! ```
//! use packwise_llm::MockProvider;
//! use packwise_domain::{CompletionRequest, LlmProvider};
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = CompletionRequest::new("system", "user", 0.1, 256);
//! assert_eq!(provider.complete(&request).unwrap(), "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod openai;

use packwise_domain::{CompletionRequest, LlmProvider};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use openai::OpenAiCompatProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Drive an async provider call to completion from synchronous code
///
/// Must be called from a thread that is not already driving a tokio runtime
/// (e.g. inside `tokio::task::spawn_blocking`).
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
    Ok(runtime.block_on(future))
}

/// Scripted reply for the mock provider
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Rules
/// match when the user prompt contains the rule's needle; the first matching
/// rule wins, otherwise the default response is returned.
///
/// # Examples
///
/// ```
/// use packwise_llm::MockProvider;
/// use packwise_domain::{CompletionRequest, LlmProvider};
///
/// let mut provider = MockProvider::new("[]");
/// provider.add_response("Bottle", r#"{"products": []}"#);
/// provider.add_error("corrupt");
///
/// let ok = CompletionRequest::new("sys", "Bottle A | HDPE", 0.1, 256);
/// assert_eq!(provider.complete(&ok).unwrap(), r#"{"products": []}"#);
///
/// let bad = CompletionRequest::new("sys", "corrupt chunk", 0.1, 256);
/// assert!(provider.complete(&bad).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Respond with `response` whenever the user prompt contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail whenever the user prompt contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), MockReply::Error("Mock error".to_string())));
    }

    /// Sleep for `delay` before answering (simulates a slow provider)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All requests received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        self.requests.lock().unwrap().clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let rules = self.rules.lock().unwrap();
        let reply = rules
            .iter()
            .find(|(needle, _)| request.user_prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Runtime-selected provider
///
/// Lets callers choose a backend from configuration while keeping the
/// extractor generic over a single concrete type.
pub enum Provider {
    /// Scripted mock
    Mock(MockProvider),
    /// Local Ollama instance
    Ollama(OllamaProvider),
    /// OpenAI-compatible endpoint
    OpenAi(OpenAiCompatProvider),
}

impl LlmProvider for Provider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        match self {
            Provider::Mock(p) => p.complete(request),
            Provider::Ollama(p) => LlmProvider::complete(p, request),
            Provider::OpenAi(p) => LlmProvider::complete(p, request),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Provider::Mock(p) => p.model_name(),
            Provider::Ollama(p) => LlmProvider::model_name(p),
            Provider::OpenAi(p) => LlmProvider::model_name(p),
        }
    }
}
