pub mod docx;

pub use docx::*;

/// Errors that can occur while exporting a synopsis.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write XML part: {0}")]
    Xml(String),

    #[error("Failed to assemble document package: {0}")]
    Zip(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
