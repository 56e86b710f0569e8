pub mod config;
pub mod export;
pub mod gate;
pub mod pipeline;
pub mod presenter;

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use config::AppConfig;
use export::{render_docx, ExportError};
use pipeline::processor::{build_processor, ProcessingError, ProcessingOutcome};
use presenter::Presenter;

/// Initialize tracing. `RUST_LOG` overrides the built-in filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Errors from a full run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Could not read input file {path}: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Could not write output file {path}: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Process a meeting-minutes PDF into a DOCX synopsis.
///
/// Reads `input`, runs the full pipeline and writes the exported
/// document to `output`. Returns the processing outcome so the caller
/// can also show or persist the synopsis text itself.
pub fn run(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    presenter: &dyn Presenter,
) -> Result<ProcessingOutcome, RunError> {
    let pdf_bytes = fs::read(input).map_err(|source| RunError::ReadInput {
        path: input.display().to_string(),
        source,
    })?;

    let document_id = Uuid::new_v4();
    tracing::info!(
        document_id = %document_id,
        input = %input.display(),
        size_bytes = pdf_bytes.len(),
        "Starting document run"
    );

    let processor = build_processor(config)?;
    let outcome = processor.process(&document_id, &pdf_bytes, presenter)?;

    presenter.status("Exporting Word document...");
    let docx = render_docx(&outcome.blocks, &document_title(input))?;
    fs::write(output, &docx).map_err(|source| RunError::WriteOutput {
        path: output.display().to_string(),
        source,
    })?;

    tracing::info!(
        document_id = %document_id,
        output = %output.display(),
        bytes = docx.len(),
        "Document run complete"
    );
    Ok(outcome)
}

/// Document title for the export metadata, taken from the input file name.
fn document_title(input: &Path) -> String {
    match input.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => "Meeting Synopsis".to_string(),
    }
}
