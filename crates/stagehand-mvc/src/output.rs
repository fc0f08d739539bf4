//! Response-side view of a context.

use crate::error::ContextError;
use http::{header, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use stagehand_http::ResponseWriter;

/// Response helpers borrowed from a [`Context`](crate::Context).
///
/// A status set with [`set_status`](Output::set_status) is sent right before
/// the first body write.
pub struct Output<'a> {
    writer: &'a mut dyn ResponseWriter,
    status: &'a mut Option<StatusCode>,
}

impl<'a> Output<'a> {
    pub(crate) fn new(writer: &'a mut dyn ResponseWriter, status: &'a mut Option<StatusCode>) -> Self {
        Self { writer, status }
    }

    /// Sets a response header.
    pub fn header(&mut self, name: &str, value: &str) -> Result<&mut Self, ContextError> {
        let name = HeaderName::try_from(name)
            .map_err(|e| ContextError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::try_from(value)
            .map_err(|e| ContextError::InvalidHeader(format!("{name}: {e}")))?;
        self.writer.insert_header(name, value);
        Ok(self)
    }

    /// Sets the status sent with the next body write.
    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        *self.status = Some(status);
        self
    }

    /// Writes the response body, sending a pending status first.
    pub fn body(&mut self, content: &[u8]) -> Result<(), ContextError> {
        if let Some(status) = self.status.take() {
            self.writer.write_header(status);
        }
        self.writer.write(content)?;
        Ok(())
    }

    /// Serializes `value` as the JSON response body.
    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<(), ContextError> {
        let content = serde_json::to_vec(value)?;
        self.writer.insert_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        self.body(&content)
    }
}
