use super::SynopsisError;

/// Hosted text-generation backend abstraction (allows mocking)
pub trait TextGenerator {
    /// Sends one prompt and returns the generated text.
    ///
    /// The prompt is sent at most once; callers decide whether a
    /// failure is worth a retry.
    fn generate(&self, prompt: &str) -> Result<String, SynopsisError>;
}

/// Vision-capable backend abstraction for reading page images (allows mocking)
pub trait VisionReader {
    /// Transcribes a single base64-encoded PNG image.
    fn transcribe(&self, prompt: &str, image_base64: &str) -> Result<String, SynopsisError>;
}
