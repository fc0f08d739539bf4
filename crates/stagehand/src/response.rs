//! Response wrapper with write tracking.

use crate::error::FixtureResult;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use stagehand_http::{ResponseRecorder, ResponseWriter};
use std::io;
use std::sync::Arc;

/// Size reported before anything has been written.
pub const NOT_WRITTEN: i64 = -1;

#[derive(Debug)]
struct Recorded {
    size: i64,
    recorder: ResponseRecorder,
}

/// The response side of a fixture.
///
/// Clones share the same recorder: one handle goes into the framework
/// context, the test keeps the other and inspects what the handler wrote.
///
/// Write state follows the usual framework writer rules:
///
/// - Until a status is sent, [`written`](Self::written) is false and
///   [`size`](Self::size) is [`NOT_WRITTEN`]
/// - The first [`write_header`](ResponseWriter::write_header) latches the
///   status and resets the size to 0; later calls are ignored
/// - Body writes add the byte count to the size whatever the state, so a
///   write before any status counts up from -1
///
/// # Example
///
/// ```rust
/// use stagehand::{HttpResponse, ResponseWriter, NOT_WRITTEN};
/// use http::StatusCode;
///
/// let mut response = HttpResponse::new();
/// assert!(!response.written());
/// assert_eq!(response.size(), NOT_WRITTEN);
///
/// response.write_header(StatusCode::CREATED);
/// response.write_header(StatusCode::OK);
/// response.write(b"done").unwrap();
///
/// assert_eq!(response.status(), StatusCode::CREATED);
/// assert_eq!(response.size(), 4);
/// assert_eq!(response.body(), "done");
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    inner: Arc<Mutex<Recorded>>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Recorded {
                size: NOT_WRITTEN,
                recorder: ResponseRecorder::new(),
            })),
        }
    }
}

impl HttpResponse {
    /// Creates an unwritten response around a fresh recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written since the status was sent, or [`NOT_WRITTEN`].
    #[must_use]
    pub fn size(&self) -> i64 {
        self.inner.lock().size
    }

    /// Returns true once [`size`](Self::size) has left [`NOT_WRITTEN`].
    ///
    /// Sending a status always does that. A body write before any status
    /// adds its length to the sentinel, so a zero-byte write leaves the
    /// response unwritten.
    #[must_use]
    pub fn written(&self) -> bool {
        self.inner.lock().size != NOT_WRITTEN
    }

    /// Recorded status, `200 OK` unless a handler set another.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.lock().recorder.status()
    }

    /// Recorded status as a number.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status().as_u16()
    }

    /// Snapshot of the response headers.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        self.inner.lock().recorder.headers().clone()
    }

    /// Copy of the body written so far.
    #[must_use]
    pub fn body(&self) -> Bytes {
        Bytes::copy_from_slice(self.inner.lock().recorder.body())
    }

    /// Body as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.inner.lock().recorder.body()).into_owned()
    }

    /// Decodes the body as JSON.
    pub fn decode<T: DeserializeOwned>(&self) -> FixtureResult<T> {
        Ok(serde_json::from_slice(self.inner.lock().recorder.body())?)
    }

    /// The full response as the handler produced it.
    #[must_use]
    pub fn response(&self) -> http::Response<Bytes> {
        self.inner.lock().recorder.result()
    }

    /// Marks the response written without sending a status.
    ///
    /// The recorder keeps its default status, and a later
    /// [`write_header`](ResponseWriter::write_header) is ignored.
    pub fn write_header_now(&mut self) {
        let mut recorded = self.inner.lock();
        if recorded.size == NOT_WRITTEN {
            recorded.size = 0;
        }
    }
}

impl ResponseWriter for HttpResponse {
    fn header(&self, name: &str) -> Option<HeaderValue> {
        self.inner.lock().recorder.header(name)
    }

    fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.inner.lock().recorder.insert_header(name, value);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut recorded = self.inner.lock();
        let n = recorded.recorder.write(buf)?;
        recorded.size += i64::try_from(n).unwrap_or(i64::MAX);
        Ok(n)
    }

    fn write_header(&mut self, status: StatusCode) {
        let mut recorded = self.inner.lock();
        if recorded.size != NOT_WRITTEN {
            return;
        }
        recorded.size = 0;
        recorded.recorder.write_header(status);
    }
}
