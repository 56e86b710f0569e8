pub mod types;
pub mod prompt;
pub mod formatter;
pub mod gemini;

pub use types::*;
pub use prompt::*;
pub use formatter::*;
pub use gemini::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynopsisError {
    #[error("Gemini API is not reachable at {0}")]
    Connection(String),

    #[error("Gemini API returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request was blocked by the API: {reason}")]
    ContentBlocked { reason: String },

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
