//! Packwise Domain Layer
//!
//! Core vocabulary shared by the product-entry extraction pipeline. Like the
//! rest of the domain layer it carries no infrastructure: no HTTP, no parsing
//! libraries, no serialization.
//!
//! ## Key Concepts
//!
//! - **RawDocument**: An uploaded office file (spreadsheet, PDF, slide deck)
//!   waiting for text extraction
//! - **Extraction Job**: One pipeline run over one document, identified by a
//!   UUIDv7 [`JobId`] and moving through the [`JobStage`] state machine
//! - **LLM Provider**: The single external capability the pipeline consumes,
//!   "submit prompt, receive text completion"
//!
//! ## Architecture
//!
//! - Pure domain types only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod job;
pub mod traits;

// Re-exports for convenience
pub use document::{DocumentFormat, RawDocument};
pub use job::{JobId, JobStage};
pub use traits::{CompletionRequest, LlmProvider};
