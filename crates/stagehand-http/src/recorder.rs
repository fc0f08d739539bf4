//! In-memory response recording.

use crate::writer::ResponseWriter;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::io;

/// A [`ResponseWriter`] that records everything written to it.
///
/// The status defaults to `200 OK`. The first call to
/// [`write_header`](ResponseWriter::write_header) fixes it; a body write
/// before any explicit status implies `200 OK`, matching how HTTP servers
/// treat handlers that never set one.
#[derive(Debug, Clone)]
pub struct ResponseRecorder {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    wrote_header: bool,
}

impl Default for ResponseRecorder {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            wrote_header: false,
        }
    }
}

impl ResponseRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns true once a status line has been sent, explicitly or implicitly.
    #[must_use]
    pub fn wrote_header(&self) -> bool {
        self.wrote_header
    }

    /// Returns the recorded headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the recorded body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Builds the HTTP response the handler produced.
    #[must_use]
    pub fn result(&self) -> http::Response<Bytes> {
        let mut response = http::Response::new(Bytes::copy_from_slice(&self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

impl ResponseWriter for ResponseRecorder {
    fn header(&self, name: &str) -> Option<HeaderValue> {
        self.headers.get(name).cloned()
    }

    fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.wrote_header {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.wrote_header {
            return;
        }
        self.status = status;
        self.wrote_header = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;

    #[test]
    fn test_defaults() {
        let recorder = ResponseRecorder::new();
        assert_eq!(recorder.status(), StatusCode::OK);
        assert!(!recorder.wrote_header());
        assert!(recorder.body().is_empty());
    }

    #[test]
    fn test_first_status_wins() {
        let mut recorder = ResponseRecorder::new();
        recorder.write_header(StatusCode::NOT_FOUND);
        recorder.write_header(StatusCode::OK);
        assert_eq!(recorder.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_body_write_implies_ok() {
        let mut recorder = ResponseRecorder::new();
        assert_eq!(recorder.write_str("hello").unwrap(), 5);
        recorder.write_header(StatusCode::INTERNAL_SERVER_ERROR);

        assert!(recorder.wrote_header());
        assert_eq!(recorder.status(), StatusCode::OK);
        assert_eq!(recorder.body(), b"hello");
    }

    #[test]
    fn test_headers() {
        let mut recorder = ResponseRecorder::new();
        recorder.insert_header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        recorder.insert_header(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));

        assert_eq!(recorder.header("content-type").unwrap(), "text/html");
        assert_eq!(recorder.headers().len(), 1);
    }

    #[test]
    fn test_result() {
        let mut recorder = ResponseRecorder::new();
        recorder.insert_header(
            HeaderName::from_static("foo"),
            HeaderValue::from_static("bar"),
        );
        recorder.write_header(StatusCode::ACCEPTED);
        recorder.write(b"queued").unwrap();

        let response = recorder.result();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers().get("foo").unwrap(), "bar");
        assert_eq!(response.body().as_ref(), b"queued");
    }

    #[test]
    fn test_boxed_writer() {
        let mut writer: Box<dyn ResponseWriter> = Box::new(ResponseRecorder::new());
        writer.write_header(StatusCode::CREATED);
        assert_eq!(writer.write(b"ok").unwrap(), 2);
        assert!(writer.header("content-type").is_none());
    }
}
