//! Image recognition — reads text out of rendered page images.
//!
//! Bridges the `VisionReader` (synopsis layer) to the `TextRecognizer`
//! trait (extraction layer). Page images arrive as PNG bytes, are
//! base64-encoded for the API and come back as plain text.

use std::sync::Arc;

use base64::Engine as _;

use super::types::TextRecognizer;
use super::ExtractionError;
use crate::pipeline::synopsis::VisionReader;

/// Transcription prompt sent with each page image.
const TRANSCRIBE_PROMPT: &str = "\
Extract all visible text from this scanned document page. \
Preserve the reading order. Output the text only, with no commentary.";

/// Production recognizer backed by a vision-capable model.
///
/// Accepts any `VisionReader` implementation (GeminiClient or mock).
pub struct VisionRecognizer {
    reader: Arc<dyn VisionReader + Send + Sync>,
}

impl VisionRecognizer {
    pub fn new(reader: Arc<dyn VisionReader + Send + Sync>) -> Self {
        Self { reader }
    }
}

impl TextRecognizer for VisionRecognizer {
    fn recognize(&self, png_bytes: &[u8]) -> Result<String, ExtractionError> {
        let start = std::time::Instant::now();

        let base64_image = base64::engine::general_purpose::STANDARD.encode(png_bytes);

        let text = self
            .reader
            .transcribe(TRANSCRIBE_PROMPT, &base64_image)
            .map_err(|e| ExtractionError::Recognition(e.to_string()))?;

        tracing::debug!(
            elapsed_ms = %start.elapsed().as_millis(),
            image_size = png_bytes.len(),
            text_len = text.len(),
            "Recognized page image"
        );

        Ok(text)
    }
}

/// Mock recognizer for testing — returns a configurable transcription.
pub struct MockRecognizer {
    text: String,
}

impl MockRecognizer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, _png_bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::pipeline::synopsis::SynopsisError;

    #[test]
    fn mock_recognizer_returns_configured_text() {
        let mock = MockRecognizer::new("page content");
        assert_eq!(mock.recognize(&[1, 2, 3]).unwrap(), "page content");
    }

    #[test]
    fn reader_error_maps_to_recognition_error() {
        struct FailingReader;
        impl VisionReader for FailingReader {
            fn transcribe(
                &self,
                _prompt: &str,
                _image_base64: &str,
            ) -> Result<String, SynopsisError> {
                Err(SynopsisError::EmptyResponse)
            }
        }

        let recognizer = VisionRecognizer::new(Arc::new(FailingReader));
        let err = recognizer.recognize(&[0u8; 4]).unwrap_err();
        assert!(matches!(err, ExtractionError::Recognition(_)));
    }

    #[test]
    fn image_bytes_are_base64_encoded_for_the_reader() {
        struct CapturingReader {
            seen: Mutex<Option<String>>,
        }
        impl VisionReader for CapturingReader {
            fn transcribe(
                &self,
                prompt: &str,
                image_base64: &str,
            ) -> Result<String, SynopsisError> {
                assert!(!prompt.is_empty());
                *self.seen.lock().unwrap() = Some(image_base64.to_string());
                Ok("text".into())
            }
        }

        let reader = Arc::new(CapturingReader {
            seen: Mutex::new(None),
        });
        let recognizer = VisionRecognizer::new(reader.clone());

        let png = [0x89u8, 0x50, 0x4E, 0x47];
        recognizer.recognize(&png).unwrap();

        let captured = reader.seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            captured,
            base64::engine::general_purpose::STANDARD.encode(png)
        );
    }
}
