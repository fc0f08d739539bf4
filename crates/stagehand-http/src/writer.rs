//! The response writer contract handlers write through.

use http::{HeaderName, HeaderValue, StatusCode};
use std::io;

/// Write side of an HTTP response.
///
/// Framework contexts hold a boxed `ResponseWriter` and route every status,
/// header and body write through it. Implementations decide what "written"
/// means; [`ResponseRecorder`](crate::ResponseRecorder) buffers everything in
/// memory and applies an implicit `200 OK` on the first body write.
pub trait ResponseWriter: Send {
    /// Returns the current value of a response header.
    fn header(&self, name: &str) -> Option<HeaderValue>;

    /// Sets a response header, replacing any previous value.
    fn insert_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Writes bytes to the response body, returning how many were written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Sends the status line.
    fn write_header(&mut self, status: StatusCode);

    /// Writes a string to the response body.
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.write(s.as_bytes())
    }
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for Box<W> {
    fn header(&self, name: &str) -> Option<HeaderValue> {
        (**self).header(name)
    }

    fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        (**self).insert_header(name, value);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn write_header(&mut self, status: StatusCode) {
        (**self).write_header(status);
    }

    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        (**self).write_str(s)
    }
}
