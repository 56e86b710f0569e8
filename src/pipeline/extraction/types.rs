use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExtractionError;

/// Result of text extraction from a single document.
///
/// Extraction never fails outright; a document that yields nothing
/// comes back with `method: None`, empty text and the warnings that
/// explain what went wrong along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub document_id: Uuid,
    pub method: Option<ExtractionMethod>,
    /// Pages seen by the strategy that produced the text. Zero when
    /// the document could not be opened at all.
    pub page_count: usize,
    pub text: String,
    pub warnings: Vec<ExtractionWarning>,
}

impl ExtractionReport {
    /// True when extraction produced usable (non-whitespace) text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// How text was extracted. The two strategies are never mixed within
/// one document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExtractionMethod {
    DirectText,
    ImageRecognition,
}

/// Non-fatal problems encountered during extraction.
///
/// Page numbers are 1-based, matching what a reader sees in a viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExtractionWarning {
    PageTextFailed { page: usize, reason: String },
    PageRenderFailed { page: usize, reason: String },
    PageRecognitionFailed { page: usize, reason: String },
    DocumentUnreadable { reason: String },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::PageTextFailed { page, reason } => {
                write!(f, "Could not extract text from page {page}: {reason}")
            }
            ExtractionWarning::PageRenderFailed { page, reason } => {
                write!(f, "Could not render page {page}: {reason}")
            }
            ExtractionWarning::PageRecognitionFailed { page, reason } => {
                write!(f, "Could not read page {page}: {reason}")
            }
            ExtractionWarning::DocumentUnreadable { reason } => {
                write!(f, "Could not open the PDF document: {reason}")
            }
        }
    }
}

/// PDF text layer access abstraction (allows mocking)
pub trait PdfTextSource {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;

    /// Text layer of one page. `page_number` is 0-based.
    fn page_text(&self, pdf_bytes: &[u8], page_number: usize)
        -> Result<String, ExtractionError>;
}

/// PDF page rendering abstraction (allows mocking)
pub trait PageRenderer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;

    /// Render one page to PNG bytes. `page_number` is 0-based.
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError>;
}

/// Turns a rendered page image into text.
pub trait TextRecognizer {
    fn recognize(&self, png_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Main extraction orchestrator trait
pub trait TextExtractor {
    fn extract(&self, document_id: &Uuid, pdf_bytes: &[u8]) -> ExtractionReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages_name_the_page() {
        let warning = ExtractionWarning::PageTextFailed {
            page: 3,
            reason: "no text layer".into(),
        };
        assert_eq!(
            warning.to_string(),
            "Could not extract text from page 3: no text layer"
        );
    }

    #[test]
    fn report_with_whitespace_text_counts_as_empty() {
        let report = ExtractionReport {
            document_id: Uuid::new_v4(),
            method: None,
            page_count: 1,
            text: "  \n\t ".into(),
            warnings: vec![],
        };
        assert!(!report.has_text());
    }
}
