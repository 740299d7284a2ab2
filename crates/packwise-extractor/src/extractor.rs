//! Core extraction orchestrator

use crate::chunking::TextChunk;
use crate::config::ExtractorConfig;
use crate::dedup::dedupe;
use crate::error::ExtractorError;
use crate::formats::{extract_text, ExtractedText};
use crate::parser::{parse_llm_response, ParsedResponse};
use crate::preprocess::{PreparedText, Preprocessor};
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::similarity::find_similar;
use crate::types::{
    CatalogProduct, ExtractionMetadata, ExtractionOutcome, ExtractionSummary, ProductCandidate,
};
use packwise_domain::{CompletionRequest, JobId, JobStage, LlmProvider, RawDocument};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A document to extract products from
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    /// Uploaded document
    pub document: RawDocument,

    /// Catalog to compare against instead of the extractor's own
    pub catalog: Option<Vec<CatalogProduct>>,
}

impl DocumentRequest {
    /// Request for `document` using the extractor's catalog
    pub fn new(document: RawDocument) -> Self {
        Self {
            document,
            catalog: None,
        }
    }

    /// Compare against `catalog` for this request only
    pub fn with_catalog(mut self, catalog: Vec<CatalogProduct>) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

/// Cooperative cancellation flag, checked before each chunk
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a handle that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Combined result of the per-chunk model calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkRunReport {
    /// Candidates from every successful chunk, in processing order
    pub products: Vec<ProductCandidate>,

    /// One note per processed chunk, plus cancellation notes
    pub notes: Vec<String>,

    /// Chunks whose call or parse failed
    pub failed_chunks: usize,

    /// Chunks actually submitted
    pub attempted_chunks: usize,

    /// Products that needed defaults: `(index in products, sections)`
    pub defaulted: Vec<(usize, Vec<&'static str>)>,

    /// True when the run stopped early on cancellation
    pub cancelled: bool,
}

/// Model-free view of how a document would be processed
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    /// Text recovered from the container
    pub extracted: ExtractedText,

    /// Normalized, filtered and chunked text
    pub prepared: PreparedText,
}

/// Tracks the stage of one job
struct JobProgress {
    id: JobId,
    stage: JobStage,
    stages: Vec<String>,
}

impl JobProgress {
    fn new() -> Self {
        let stage = JobStage::Received;
        Self {
            id: JobId::new(),
            stage,
            stages: vec![stage.to_string()],
        }
    }

    fn advance(&mut self, next: JobStage) {
        if !self.stage.can_advance_to(next) {
            warn!("Job {} cannot move from {} to {}", self.id, self.stage, next);
            return;
        }
        debug!("Job {}: {} -> {}", self.id, self.stage, next);
        self.stage = next;
        self.stages.push(next.to_string());
    }
}

/// The ProductExtractor turns supplier documents into product candidates
pub struct ProductExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
    preprocessor: Preprocessor,
    catalog: Vec<CatalogProduct>,
}

impl<L> ProductExtractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new ProductExtractor; the configuration is validated
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let preprocessor = Preprocessor::new(&config)?;
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
            preprocessor,
            catalog: Vec::new(),
        })
    }

    /// Compare extracted products against `catalog`
    pub fn with_catalog(mut self, catalog: Vec<CatalogProduct>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Show how `document` would be chunked, without calling the model
    pub fn plan_document(&self, document: &RawDocument) -> ExtractionPlan {
        let extracted = extract_text(document);
        let prepared = self.preprocessor.prepare(&extracted.text());
        ExtractionPlan {
            extracted,
            prepared,
        }
    }

    /// Extract products from a document
    pub async fn extract_document(
        &self,
        request: DocumentRequest,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        self.extract_document_with_cancel(request, &CancelHandle::new())
            .await
    }

    /// Extract products from a document, stopping early when `cancel` fires
    ///
    /// Only a job cancelled before it starts is an error; every other
    /// failure ends up in the processing notes of a partial result.
    pub async fn extract_document_with_cancel(
        &self,
        request: DocumentRequest,
        cancel: &CancelHandle,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        if cancel.is_cancelled() {
            return Err(ExtractorError::Cancelled);
        }

        let started = Instant::now();
        let mut job = JobProgress::new();
        let document = &request.document;
        info!(
            "Starting extraction job {} for '{}' ({}, {} bytes)",
            job.id,
            document.filename,
            document.format,
            document.len()
        );

        let extracted = extract_text(document);
        let mut notes = Vec::new();
        if extracted.placeholder {
            notes.push(format!(
                "No text could be read from the document ({} extractor); the model only saw a diagnostic message.",
                extracted.extractor
            ));
        }

        let catalog = request.catalog.as_deref().unwrap_or(&self.catalog);
        self.run(
            &mut job,
            &document.filename,
            document.format.as_str(),
            &extracted.text(),
            notes,
            catalog,
            cancel,
            started,
        )
        .await
    }

    /// Extract products from text that is already plain
    pub async fn extract_from_text(
        &self,
        filename: &str,
        text: &str,
        cancel: &CancelHandle,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        if cancel.is_cancelled() {
            return Err(ExtractorError::Cancelled);
        }

        let started = Instant::now();
        let mut job = JobProgress::new();
        info!(
            "Starting extraction job {} for '{}' ({} chars of text)",
            job.id,
            filename,
            text.len()
        );
        self.run(
            &mut job,
            filename,
            "text",
            text,
            Vec::new(),
            &self.catalog,
            cancel,
            started,
        )
        .await
    }

    /// Submit `chunks` in the given order and collect the results
    pub async fn extract_products(&self, chunks: &[TextChunk], filename: &str) -> ChunkRunReport {
        self.run_chunks(
            chunks,
            filename,
            &self.catalog,
            &CancelHandle::new(),
            &mut JobProgress::new(),
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn run(
        &self,
        job: &mut JobProgress,
        filename: &str,
        format: &str,
        text: &str,
        mut notes: Vec<String>,
        catalog: &[CatalogProduct],
        cancel: &CancelHandle,
        started: Instant,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        job.advance(JobStage::Normalizing);
        let normalized = self.preprocessor.normalize(text);
        debug!("Normalized {} -> {} chars", text.len(), normalized.len());

        job.advance(JobStage::Filtering);
        let relevance = self.preprocessor.filter(&normalized);
        if relevance.fell_back {
            notes.push(
                "No product keywords were found; the full document text was sent for extraction."
                    .to_string(),
            );
        }

        job.advance(JobStage::Chunking);
        let chunks = self.preprocessor.chunk(&relevance.text);
        let estimated_tokens = crate::chunking::estimate_tokens(&relevance.text);
        info!(
            "Job {}: {} chunk(s), ~{} tokens, budget {} per chunk",
            job.id,
            chunks.len(),
            estimated_tokens,
            self.config.provider.token_budget
        );

        let report = self.run_chunks(&chunks, filename, catalog, cancel, job).await;
        notes.extend(report.notes);

        job.advance(JobStage::Deduplicating);
        let deduped = dedupe(report.products);
        if deduped.removed > 0 {
            notes.push(format!(
                "Removed {} duplicate product(s) with the same name and category.",
                deduped.removed
            ));
        }
        // Only the kept copy of a duplicate reports its defaults
        for (product, original) in deduped.products.iter().zip(&deduped.kept) {
            if let Some((_, sections)) = report.defaulted.iter().find(|(i, _)| i == original) {
                notes.push(format!(
                    "Defaulted fields for '{}': {}",
                    product.name,
                    sections.join(", ")
                ));
            }
        }

        let mut products = deduped.products;
        if !catalog.is_empty() {
            for product in &mut products {
                product.similar_products = find_similar(
                    product,
                    catalog,
                    self.config.similarity_threshold,
                    self.config.max_similar_products,
                );
            }
        }

        job.advance(JobStage::Complete);
        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            "Job {} complete: {} product(s), {}/{} chunk(s) failed, {} ms",
            job.id,
            products.len(),
            report.failed_chunks,
            chunks.len(),
            processing_time_ms
        );

        let summary = ExtractionSummary::from_products(&products, notes.join("\n"));
        let metadata = ExtractionMetadata {
            job_id: job.id.to_string(),
            filename: filename.to_string(),
            format: format.to_string(),
            model_name: self.llm_provider.model_name().to_string(),
            chunk_count: chunks.len(),
            failed_chunks: report.failed_chunks,
            stages: job.stages.clone(),
            estimated_tokens,
            processing_time_ms,
        };

        Ok(ExtractionOutcome {
            products,
            summary,
            metadata,
        })
    }

    async fn run_chunks(
        &self,
        chunks: &[TextChunk],
        filename: &str,
        catalog: &[CatalogProduct],
        cancel: &CancelHandle,
        job: &mut JobProgress,
    ) -> ChunkRunReport {
        let mut report = ChunkRunReport::default();
        let total = chunks.len();

        if chunks.iter().all(|chunk| chunk.lines.is_empty()) {
            report.notes.push("The document contained no text to extract from.".to_string());
            return report;
        }

        let mut known_categories: Vec<String> = Vec::new();
        for product in catalog {
            if !known_categories.contains(&product.category) {
                known_categories.push(product.category.clone());
            }
        }

        for (position, chunk) in chunks.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Job {} cancelled before chunk {}/{}", job.id, position + 1, total);
                report.notes.push(format!(
                    "Extraction cancelled: {} of {} chunk(s) skipped.",
                    total - position,
                    total
                ));
                report.cancelled = true;
                break;
            }

            job.advance(JobStage::Extracting {
                chunk: position + 1,
                total,
            });
            report.attempted_chunks += 1;

            let label = format!("Chunk {}/{}", chunk.index + 1, total);
            match self
                .extract_chunk(chunk, position + 1, total, filename, &known_categories)
                .await
            {
                Ok(parsed) => {
                    debug!("{}: {} product(s)", label, parsed.products.len());
                    if total == 1 {
                        report.notes.push(parsed.notes);
                    } else {
                        report.notes.push(format!("{}: {}", label, parsed.notes));
                    }
                    let offset = report.products.len();
                    report.products.extend(parsed.products);
                    report.defaulted.extend(
                        parsed
                            .defaulted
                            .into_iter()
                            .map(|(index, sections)| (offset + index, sections)),
                    );
                }
                Err(e) => {
                    warn!("{} failed: {}", label, e);
                    report.failed_chunks += 1;
                    if total == 1 {
                        report.notes.push(format!("Extraction failed: {}", e));
                    } else {
                        report.notes.push(format!("{} failed: {}", label, e));
                    }
                }
            }
        }

        report
    }

    /// Prompt, call and parse one chunk
    async fn extract_chunk(
        &self,
        chunk: &TextChunk,
        position: usize,
        total: usize,
        filename: &str,
        known_categories: &[String],
    ) -> Result<ParsedResponse, ExtractorError> {
        let user_prompt = PromptBuilder::new(chunk.text(), filename)
            .with_part(position, total)
            .with_known_categories(known_categories.to_vec())
            .build();
        debug!(
            "Chunk {} prompt: {} chars, ~{} tokens",
            chunk.index + 1,
            user_prompt.len(),
            chunk.estimated_tokens
        );

        let request = CompletionRequest::new(
            SYSTEM_PROMPT,
            user_prompt,
            self.config.provider.temperature,
            self.config.provider.max_output_tokens,
        );
        let response = self.call_llm(request).await?;
        debug!("LLM response length: {} chars", response.len());

        parse_llm_response(&response)
    }

    /// Call the LLM provider under the configured timeout
    async fn call_llm(&self, request: CompletionRequest) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);

        // Call in a blocking context since LlmProvider is not async
        let mut task = tokio::task::spawn_blocking(move || {
            llm.complete(&request)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        });

        match timeout(self.config.extraction_timeout(), &mut task).await {
            Ok(joined) => {
                joined.map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
            }
            Err(_) => {
                // A blocking call cannot be aborted; wait it out so the next
                // chunk is never submitted while this one is still in flight
                warn!(
                    "LLM call exceeded {}s, waiting for it to finish before continuing",
                    self.config.extraction_timeout_secs
                );
                let _ = task.await;
                Err(ExtractorError::Timeout(self.config.extraction_timeout_secs))
            }
        }
    }
}
