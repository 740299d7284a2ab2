//! Packwise Extractor
//!
//! Turns supplier documents (spreadsheets, PDFs, slide decks) into structured
//! product candidates using an LLM.
//!
//! # Overview
//!
//! Sellers upload whatever catalog material they have. The extractor pulls
//! plain text out of the container, strips noise, keeps the lines that look
//! like product data, splits the rest under the provider's token budget and
//! asks the model for products chunk by chunk. Responses are validated and
//! defaulted, merged across chunks, and optionally compared against the
//! existing catalog.
//!
//! # Architecture
//!
//! ```text
//! RawDocument → formats → normalize → relevance → chunking → prioritize
//!             → LLM (per chunk) → parser → dedup → similarity → ExtractionOutcome
//! ```
//!
//! # Key Features
//!
//! - **Format Extraction**: calamine, pdf-extract and zip-based slide parsing,
//!   each failure reported as readable placeholder text
//! - **Token Budgeting**: line-aligned chunks that fit small-context providers
//! - **Fail-Closed Parsing**: every candidate comes back fully defaulted
//! - **Partial Results**: a failed chunk becomes a note, not a failed job
//! - **Catalog Similarity**: name, category, material and capacity weighting
//!
//! # Example Usage
//!
//! ```no_run
//! use packwise_extractor::{CancelHandle, ExtractorConfig, ProductExtractor};
//! use packwise_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"products": [{"name": "Boston Round", "category": "bottles"}]}"#);
//! let extractor = ProductExtractor::new(llm, ExtractorConfig::small_context())?;
//!
//! let outcome = extractor
//!     .extract_from_text("catalog.txt", "Boston Round bottle | 250ml | PET", &CancelHandle::new())
//!     .await?;
//!
//! println!("Products: {}", outcome.summary.total_products);
//! println!("Notes: {}", outcome.summary.processing_notes);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod dedup;
mod eco;
mod error;
mod extractor;
pub mod formats;
mod normalize;
mod parser;
mod preprocess;
mod prioritize;
mod prompt;
mod relevance;
mod similarity;
mod types;
mod vocabulary;

#[cfg(test)]
mod tests;

pub use chunking::{estimate_tokens, TextChunk, TextChunker};
pub use config::{ExtractorConfig, KeywordVocabulary, NoisePattern, ProviderBudget};
pub use dedup::{dedupe, DedupKey, DedupOutcome};
pub use eco::{compute_eco_score, StatedEcoScore};
pub use error::{ExtractorError, FormatError};
pub use extractor::{
    CancelHandle, ChunkRunReport, DocumentRequest, ExtractionPlan, ProductExtractor,
};
pub use formats::{extract_text, ExtractedText};
pub use normalize::{default_noise_patterns, TextNormalizer};
pub use parser::{parse_llm_response, ParsedResponse, NO_JSON_NOTE, NO_PRODUCTS_NOTE};
pub use preprocess::{PreparedText, Preprocessor};
pub use prioritize::{keyword_occurrences, prioritize};
pub use prompt::{PromptBuilder, SYSTEM_PROMPT};
pub use relevance::{RelevanceFilter, RelevanceOutcome};
pub use similarity::{find_similar, levenshtein, name_similarity, score, SimilarityProfile};
pub use types::{
    BagFilters, BottleFilters, BoxFilters, Capacity, CapacityDimension, CatalogProduct,
    CategoryFilters, CommonFilters, Customization, Dimensions, EcoScore, ExtractionMetadata,
    ExtractionOutcome, ExtractionSummary, JarFilters, PriceTier, Pricing, ProductCandidate,
    SimilarProduct, Specifications, Sustainability,
};
pub use vocabulary::{default_priority_keywords, default_relevance_keywords};
