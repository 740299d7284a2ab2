//! PDF text-layer extraction via pdf-extract

use super::FormatExtractor;
use crate::error::FormatError;
use packwise_domain::DocumentFormat;
use std::panic;

/// Reads the text layer of a PDF, returned unmodified
pub struct PdfExtractor;

impl FormatExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, FormatError> {
        // pdf-extract panics on some malformed inputs
        let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| FormatError::Crashed("pdf"))?
            .map_err(|e| FormatError::Open {
                format: "pdf",
                reason: e.to_string(),
            })?;

        Ok(text.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_pdf() {
        let result = PdfExtractor.extract(b"%PDX-garbage");
        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_pdf_is_contained() {
        let result = PdfExtractor.extract(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog");
        assert!(result.is_err());
    }
}
