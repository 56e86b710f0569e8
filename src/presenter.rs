//! Progress reporting seam.
//!
//! The pipeline reports milestones through this trait instead of
//! printing directly, so callers can route messages anywhere: console,
//! logs, or test capture.

/// Maximum characters of extracted text shown in previews.
pub const PREVIEW_MAX_CHARS: usize = 1000;

/// Where pipeline progress and warnings go.
pub trait Presenter {
    /// A new stage has started.
    fn status(&self, message: &str);

    /// Something non-fatal went wrong.
    fn warn(&self, message: &str);

    /// Extracted text is available. Implementations typically show
    /// only a snippet; see [`preview_snippet`].
    fn preview(&self, text: &str);

    /// A stage finished successfully.
    fn success(&self, message: &str);
}

/// Presenter that swallows everything. Used by tests and library
/// callers that do their own reporting.
pub struct SilentPresenter;

impl Presenter for SilentPresenter {
    fn status(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn preview(&self, _text: &str) {}
    fn success(&self, _message: &str) {}
}

/// First [`PREVIEW_MAX_CHARS`] characters of `text`, cut on a char
/// boundary so multi-byte text never panics the slice.
pub fn preview_snippet(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_MAX_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
