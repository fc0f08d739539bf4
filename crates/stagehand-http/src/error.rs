//! Form reading error types.

use thiserror::Error;

/// Errors that can occur while reading form data from a request body.
#[derive(Debug, Error)]
pub enum FormError {
    /// The request carries no Content-Type header.
    #[error("missing Content-Type header")]
    MissingContentType,

    /// The Content-Type is neither urlencoded nor multipart.
    #[error("unsupported form content type: {0}")]
    UnsupportedContentType(String),

    /// A multipart Content-Type without a boundary parameter.
    #[error("missing boundary in multipart Content-Type")]
    MissingBoundary,

    /// The multipart body does not follow the expected layout.
    #[error("malformed multipart body: {0}")]
    Malformed(String),

    /// The urlencoded body could not be decoded.
    #[error("invalid urlencoded body: {0}")]
    Urlencoded(#[from] serde_urlencoded::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormError::UnsupportedContentType("text/plain".to_string());
        assert_eq!(err.to_string(), "unsupported form content type: text/plain");

        let err = FormError::Malformed("missing part headers".to_string());
        assert_eq!(err.to_string(), "malformed multipart body: missing part headers");
    }
}
