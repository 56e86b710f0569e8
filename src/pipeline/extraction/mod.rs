pub mod types;
pub mod pdfium;
pub mod recognize;
pub mod orchestrator;

pub use types::*;
pub use pdfium::*;
pub use recognize::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDFium library unavailable: {0}")]
    PdfiumUnavailable(String),

    #[error("PDF is password-protected")]
    PdfEncrypted,

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Text layer read failed: {reason}")]
    PageText { page: usize, reason: String },

    #[error("{reason}")]
    PdfRendering { page: usize, reason: String },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Text recognition failed: {0}")]
    Recognition(String),
}
