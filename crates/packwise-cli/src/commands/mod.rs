//! Command implementations.

pub mod extract;
pub mod inspect;
pub mod profile;

pub use self::extract::execute_extract;
pub use self::inspect::{execute_inspect, execute_settings};
pub use self::profile::execute_profile;

use crate::cli::FormatArg;
use crate::error::{CliError, Result};
use packwise_domain::{DocumentFormat, RawDocument};
use std::path::Path;

/// Read `path` and resolve its format from the flag or the extension.
pub(crate) async fn load_document(path: &Path, doc_type: Option<FormatArg>) -> Result<RawDocument> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let format = match doc_type {
        Some(format) => format.into(),
        None => DocumentFormat::from_filename(&filename).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Cannot tell the format of '{}'; pass --type spreadsheet|pdf|slides",
                filename
            ))
        })?,
    };

    let bytes = tokio::fs::read(path).await?;
    Ok(RawDocument::new(bytes, format, filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_document_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Catalog.PDF");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let document = load_document(&path, None).await.unwrap();
        assert_eq!(document.format, DocumentFormat::Pdf);
        assert_eq!(document.filename, "Catalog.PDF");
        assert_eq!(document.len(), 8);
    }

    #[tokio::test]
    async fn test_load_document_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let result = load_document(&path, None).await;
        assert!(matches!(result, Err(CliError::InvalidInput(_))));

        let forced = load_document(&path, Some(FormatArg::Slides)).await.unwrap();
        assert_eq!(forced.format, DocumentFormat::Slides);
    }
}
