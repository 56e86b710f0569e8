//! Document processing pipeline.
//!
//! Single entry point that drives the full flow:
//! extract → prompt → generate → classify into blocks.
//!
//! Uses trait-based DI for the engines (TextExtractor, TextGenerator)
//! so the pipeline remains fully testable with mock implementations.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::pipeline::extraction::orchestrator::DocumentExtractor;
use crate::pipeline::extraction::pdfium::{PdfiumRenderer, PdfiumTextSource};
use crate::pipeline::extraction::recognize::VisionRecognizer;
use crate::pipeline::extraction::types::{ExtractionReport, TextExtractor};
use crate::pipeline::synopsis::formatter::{format_synopsis, Block};
use crate::pipeline::synopsis::gemini::GeminiClient;
use crate::pipeline::synopsis::prompt::synopsis_prompt;
use crate::pipeline::synopsis::types::TextGenerator;
use crate::pipeline::synopsis::SynopsisError;
use crate::presenter::Presenter;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during document processing.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("No text could be extracted from the PDF. It might be an image-only PDF or corrupted.")]
    NoTextExtracted,

    #[error("Synopsis generation failed: {0}")]
    Synopsis(#[from] SynopsisError),

    #[error("PDFium initialization failed: {0}")]
    PdfiumInit(String),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Everything one processed document produces.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingOutcome {
    /// The full extraction report, warnings included.
    pub extraction: ExtractionReport,
    /// The synopsis exactly as the model wrote it.
    pub synopsis: String,
    /// The synopsis classified line by line for export.
    pub blocks: Vec<Block>,
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

/// Drives a document through extraction, generation and classification.
///
/// Pure pipeline logic with trait-based DI. Progress reporting goes
/// through the `Presenter` passed per call.
pub struct DocumentProcessor {
    extractor: Box<dyn TextExtractor + Send + Sync>,
    generator: Arc<dyn TextGenerator + Send + Sync>,
}

impl DocumentProcessor {
    pub fn new(
        extractor: Box<dyn TextExtractor + Send + Sync>,
        generator: Arc<dyn TextGenerator + Send + Sync>,
    ) -> Self {
        Self {
            extractor,
            generator,
        }
    }

    /// Full pipeline for one document.
    ///
    /// 1. Extract text (native text layer, image recognition fallback)
    /// 2. Build the synopsis prompt and call the model once
    /// 3. Classify the synopsis into blocks
    ///
    /// Extraction warnings are forwarded to the presenter as they are
    /// non-fatal; a document with no usable text at all aborts with
    /// `NoTextExtracted`.
    pub fn process(
        &self,
        document_id: &Uuid,
        pdf_bytes: &[u8],
        presenter: &dyn Presenter,
    ) -> Result<ProcessingOutcome, ProcessingError> {
        // Step 1: Extract text
        presenter.status("Extracting text from PDF...");
        let report = self.extractor.extract(document_id, pdf_bytes);

        for warning in &report.warnings {
            presenter.warn(&warning.to_string());
        }

        if !report.has_text() {
            return Err(ProcessingError::NoTextExtracted);
        }

        presenter.preview(&report.text);

        // Step 2: Generate the synopsis
        presenter.status("Generating synopsis with Gemini...");
        tracing::info!(
            document_id = %document_id,
            text_length = report.text.len(),
            "Processing: starting synopsis generation"
        );
        let prompt = synopsis_prompt(&report.text);
        let synopsis = self.generator.generate(&prompt)?;
        presenter.success("Synopsis generated!");

        // Step 3: Classify into blocks
        let blocks = format_synopsis(&synopsis);

        tracing::info!(
            document_id = %document_id,
            method = ?report.method,
            blocks = blocks.len(),
            "Processing complete"
        );

        Ok(ProcessingOutcome {
            extraction: report,
            synopsis,
            blocks,
        })
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build a `DocumentProcessor` with production implementations.
///
/// - PDF access: PDFium text layer + page renderer
/// - Generation and recognition: one `GeminiClient` serving both roles
///
/// Returns an error if the PDFium library cannot be loaded.
pub fn build_processor(config: &AppConfig) -> Result<DocumentProcessor, ProcessingError> {
    let text_source = Box::new(
        PdfiumTextSource::new().map_err(|e| ProcessingError::PdfiumInit(e.to_string()))?,
    );
    let renderer =
        Box::new(PdfiumRenderer::new().map_err(|e| ProcessingError::PdfiumInit(e.to_string()))?);

    let gemini = Arc::new(GeminiClient::new(
        &config.api_base_url,
        &config.model,
        &config.api_key,
        config.timeout_secs,
    ));
    tracing::info!(model = %config.model, "Document processor using Gemini model");

    let recognizer = Box::new(VisionRecognizer::new(gemini.clone()));
    let extractor = Box::new(
        DocumentExtractor::new(text_source, renderer, recognizer)
            .with_render_dpi(config.render_dpi),
    );

    Ok(DocumentProcessor::new(extractor, gemini))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
