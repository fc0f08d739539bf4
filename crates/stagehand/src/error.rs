//! Fixture error types.

use std::io;
use thiserror::Error;

/// Result type for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Errors raised while configuring or building a fixture.
///
/// The builder keeps the first error it sees and reports it from the
/// terminal call; later configuration calls never replace it.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A second body representation was set.
    #[error("body already set, only one body representation is allowed")]
    DuplicateBody,

    /// The value handed to the flattener is not a struct.
    #[error("unsupported type {type_name} for form flattening")]
    UnsupportedType {
        /// Name of the rejected type.
        type_name: String,
    },

    /// A field holds a value kind the flattener cannot encode.
    #[error("unsupported field {field} of kind {type_name} for form flattening")]
    UnsupportedField {
        /// Field key.
        field: String,
        /// Kind of the rejected value.
        type_name: String,
    },

    /// A field or root resolved to nothing.
    #[error("nil value at {path}")]
    NilValue {
        /// Where the missing value was found.
        path: String,
    },

    /// Writing a form part failed.
    #[error("failed to encode form field {field}: {source}")]
    Encoding {
        /// Field that was being written.
        field: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Reading a file or body stream failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being read.
        context: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Finalizing the multipart body failed.
    #[error("failed to close form encoding: {0}")]
    Close(#[source] io::Error),

    /// The method is not a valid HTTP token.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// A header name or value was rejected.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The URL could not be parsed.
    #[error("invalid uri {uri}: {reason}")]
    InvalidUri {
        /// The rejected URL.
        uri: String,
        /// Parser message.
        reason: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FixtureError {
    /// Creates an I/O error with a description of what was being read.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns true for errors caused by conflicting body operations.
    #[must_use]
    pub fn is_duplicate_body(&self) -> bool {
        matches!(self, Self::DuplicateBody)
    }
}
