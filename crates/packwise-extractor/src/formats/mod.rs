//! Format extractors: container bytes to ordered text lines
//!
//! Each supported container format has one `FormatExtractor`. The entry
//! point, [`extract_text`], never fails: when a container cannot be read
//! (or yields no text at all) the pipeline continues with a one-line
//! diagnostic placeholder, so the model and the user see why nothing was
//! found.

mod pdf;
mod slides;
mod spreadsheet;

pub use pdf::PdfExtractor;
pub use slides::{SlidesExtractor, NOTES_MARKER, SLIDE_BREAK};
pub use spreadsheet::{serialize_row, SpreadsheetExtractor, CELL_SEPARATOR};

use crate::error::FormatError;
use packwise_domain::{DocumentFormat, RawDocument};
use tracing::{debug, warn};

/// Converts one container format into text lines in reading order
pub trait FormatExtractor: Send + Sync {
    /// Short name for logs and metadata
    fn name(&self) -> &'static str;

    /// Format this extractor reads
    fn format(&self) -> DocumentFormat;

    /// Extract text lines from the raw container bytes
    fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, FormatError>;
}

/// Extractor for `format`
pub fn extractor_for(format: DocumentFormat) -> &'static dyn FormatExtractor {
    match format {
        DocumentFormat::Spreadsheet => &SpreadsheetExtractor,
        DocumentFormat::Pdf => &PdfExtractor,
        DocumentFormat::Slides => &SlidesExtractor,
    }
}

/// Text recovered from a document
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    /// Lines in reading order, including boundary markers
    pub lines: Vec<String>,

    /// Name of the extractor that produced the lines
    pub extractor: &'static str,

    /// True when `lines` is a diagnostic placeholder rather than content
    pub placeholder: bool,
}

impl ExtractedText {
    /// Lines joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Extract text from `document`, substituting a placeholder on failure
pub fn extract_text(document: &RawDocument) -> ExtractedText {
    let extractor = extractor_for(document.format);
    debug!(
        "Extracting {} ({} bytes) with the {} extractor",
        document.filename,
        document.len(),
        extractor.name()
    );

    match extractor.extract(&document.bytes) {
        Ok(lines) if lines.iter().any(|line| !line.trim().is_empty()) => ExtractedText {
            lines,
            extractor: extractor.name(),
            placeholder: false,
        },
        Ok(_) => {
            warn!("No text found in {}", document.filename);
            ExtractedText {
                lines: vec![empty_placeholder(document)],
                extractor: extractor.name(),
                placeholder: true,
            }
        }
        Err(e) => {
            warn!("Text extraction failed for {}: {}", document.filename, e);
            ExtractedText {
                lines: vec![failure_placeholder(document, &e)],
                extractor: extractor.name(),
                placeholder: true,
            }
        }
    }
}

// Placeholders must survive normalization: no square brackets.
fn empty_placeholder(document: &RawDocument) -> String {
    format!(
        "The {} document '{}' ({} bytes) contained no extractable text. \
         Re-submit the product information as a PDF with a text layer or as a spreadsheet.",
        document.format,
        document.filename,
        document.len()
    )
}

fn failure_placeholder(document: &RawDocument, error: &FormatError) -> String {
    format!(
        "Text extraction failed for the {} document '{}' ({} bytes): {}",
        document.format,
        document.filename,
        document.len(),
        error
    )
}
