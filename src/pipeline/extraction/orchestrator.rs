use uuid::Uuid;

use super::pdfium::DEFAULT_RENDER_DPI;
use super::types::{
    ExtractionMethod, ExtractionReport, ExtractionWarning, PageRenderer, PdfTextSource,
    TextExtractor, TextRecognizer,
};

/// Concrete implementation of the text extractor.
/// Uses trait objects for PDF access and recognition, enabling dependency injection.
///
/// Strategy: read the native text layer first. Only when not a single
/// page yields text does the whole document get rendered and read by
/// the vision model. The two strategies are never mixed per page; a
/// document with a partial text layer is taken as-is.
pub struct DocumentExtractor {
    text_source: Box<dyn PdfTextSource + Send + Sync>,
    renderer: Box<dyn PageRenderer + Send + Sync>,
    recognizer: Box<dyn TextRecognizer + Send + Sync>,
    render_dpi: u32,
}

impl DocumentExtractor {
    pub fn new(
        text_source: Box<dyn PdfTextSource + Send + Sync>,
        renderer: Box<dyn PageRenderer + Send + Sync>,
        recognizer: Box<dyn TextRecognizer + Send + Sync>,
    ) -> Self {
        Self {
            text_source,
            renderer,
            recognizer,
            render_dpi: DEFAULT_RENDER_DPI,
        }
    }

    pub fn with_render_dpi(mut self, dpi: u32) -> Self {
        self.render_dpi = dpi;
        self
    }

    /// Join the text layer of every page.
    ///
    /// Each page that has text after trimming contributes its raw text
    /// followed by a newline. Returns `None` when the document itself
    /// cannot be opened; per-page failures only produce warnings.
    fn direct_text(
        &self,
        pdf_bytes: &[u8],
        warnings: &mut Vec<ExtractionWarning>,
    ) -> Option<(String, usize)> {
        let page_count = match self.text_source.page_count(pdf_bytes) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Could not open PDF for text extraction");
                warnings.push(ExtractionWarning::DocumentUnreadable {
                    reason: e.to_string(),
                });
                return None;
            }
        };

        let mut text = String::new();
        for page_number in 0..page_count {
            match self.text_source.page_text(pdf_bytes, page_number) {
                Ok(page_text) => {
                    if !page_text.trim().is_empty() {
                        text.push_str(&page_text);
                        text.push('\n');
                    }
                }
                Err(e) => {
                    tracing::warn!(page = page_number + 1, error = %e, "Page text read failed");
                    warnings.push(ExtractionWarning::PageTextFailed {
                        page: page_number + 1,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Some((text, page_count))
    }

    /// Render every page and run recognition on the images.
    ///
    /// Failed pages are skipped with a warning so one bad page cannot
    /// sink the rest of the document.
    fn recognize_pages(
        &self,
        pdf_bytes: &[u8],
        warnings: &mut Vec<ExtractionWarning>,
    ) -> (String, usize) {
        let page_count = match self.renderer.page_count(pdf_bytes) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Could not open PDF for rendering");
                warnings.push(ExtractionWarning::DocumentUnreadable {
                    reason: e.to_string(),
                });
                return (String::new(), 0);
            }
        };

        let mut text = String::new();
        for page_number in 0..page_count {
            let png = match self
                .renderer
                .render_page(pdf_bytes, page_number, self.render_dpi)
            {
                Ok(png) => png,
                Err(e) => {
                    tracing::warn!(page = page_number + 1, error = %e, "Page rendering failed");
                    warnings.push(ExtractionWarning::PageRenderFailed {
                        page: page_number + 1,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.recognizer.recognize(&png) {
                Ok(page_text) => {
                    if !page_text.trim().is_empty() {
                        text.push_str(&page_text);
                        text.push('\n');
                    }
                }
                Err(e) => {
                    tracing::warn!(page = page_number + 1, error = %e, "Page recognition failed");
                    warnings.push(ExtractionWarning::PageRecognitionFailed {
                        page: page_number + 1,
                        reason: e.to_string(),
                    });
                }
            }
        }

        (text, page_count)
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract(&self, document_id: &Uuid, pdf_bytes: &[u8]) -> ExtractionReport {
        tracing::info!(
            document_id = %document_id,
            size = pdf_bytes.len(),
            "Starting text extraction"
        );

        let mut warnings = Vec::new();

        // Step 1: Native text layer, page by page.
        match self.direct_text(pdf_bytes, &mut warnings) {
            Some((text, page_count)) if !text.trim().is_empty() => {
                tracing::info!(
                    document_id = %document_id,
                    pages = page_count,
                    text_length = text.len(),
                    "Direct text extraction complete"
                );
                return ExtractionReport {
                    document_id: *document_id,
                    method: Some(ExtractionMethod::DirectText),
                    page_count,
                    text,
                    warnings,
                };
            }
            Some((_, 0)) => {
                // A document with no pages has nothing to recognize either.
                tracing::info!(document_id = %document_id, "Document has no pages");
                return ExtractionReport {
                    document_id: *document_id,
                    method: None,
                    page_count: 0,
                    text: String::new(),
                    warnings,
                };
            }
            _ => {}
        }

        // Step 2: No page produced text. Render every page and read the images.
        tracing::info!(
            document_id = %document_id,
            "No text layer found, falling back to image recognition"
        );
        let (text, page_count) = self.recognize_pages(pdf_bytes, &mut warnings);

        let method = if text.trim().is_empty() {
            None
        } else {
            Some(ExtractionMethod::ImageRecognition)
        };

        tracing::info!(
            document_id = %document_id,
            method = ?method,
            text_length = text.len(),
            warning_count = warnings.len(),
            "Extraction complete"
        );

        ExtractionReport {
            document_id: *document_id,
            method,
            page_count,
            text,
            warnings,
        }
    }
}
