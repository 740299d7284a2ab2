//! Uploaded documents awaiting text extraction

use std::fmt;

/// Container format of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Excel / OpenDocument workbook
    Spreadsheet,

    /// PDF with a text layer
    Pdf,

    /// PowerPoint (OOXML) slide deck
    Slides,
}

impl DocumentFormat {
    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Spreadsheet => "spreadsheet",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Slides => "slides",
        }
    }

    /// Parse a format from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spreadsheet" | "excel" => Some(DocumentFormat::Spreadsheet),
            "pdf" => Some(DocumentFormat::Pdf),
            "slides" | "powerpoint" => Some(DocumentFormat::Slides),
            _ => None,
        }
    }

    /// Resolve a format from a declared MIME type
    ///
    /// # Examples
    ///
    /// ```
    /// use packwise_domain::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_mime("application/pdf"), Some(DocumentFormat::Pdf));
    /// assert_eq!(DocumentFormat::from_mime("text/plain"), None);
    /// ```
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match essence.as_str() {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel"
            | "application/vnd.ms-excel.sheet.macroenabled.12"
            | "application/vnd.oasis.opendocument.spreadsheet" => Some(DocumentFormat::Spreadsheet),
            "application/pdf" => Some(DocumentFormat::Pdf),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Some(DocumentFormat::Slides)
            }
            _ => None,
        }
    }

    /// Resolve a format from a filename extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;

        match extension.to_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(DocumentFormat::Spreadsheet),
            "pdf" => Some(DocumentFormat::Pdf),
            "pptx" => Some(DocumentFormat::Slides),
            _ => None,
        }
    }

    /// Resolve a format from the declared MIME type, falling back to the filename
    pub fn detect(mime: Option<&str>, filename: &str) -> Option<Self> {
        mime.and_then(Self::from_mime)
            .or_else(|| Self::from_filename(filename))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded document: raw bytes plus the declared container format
///
/// Consumed once by a format extractor and then dropped; the pipeline never
/// persists it.
#[derive(Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// File contents
    pub bytes: Vec<u8>,

    /// Declared container format
    pub format: DocumentFormat,

    /// Original filename, used for prompts and logs only
    pub filename: String,
}

impl RawDocument {
    /// Create a new document
    pub fn new(bytes: Vec<u8>, format: DocumentFormat, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            format,
            filename: filename.into(),
        }
    }

    /// Size of the document in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for RawDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawDocument")
            .field("filename", &self.filename)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
