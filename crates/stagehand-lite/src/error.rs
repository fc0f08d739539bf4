//! Context error types.

use thiserror::Error;

/// Errors raised by context helpers.
#[derive(Debug, Error)]
pub enum ContextError {
    /// A header name or value was rejected.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to the response failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
