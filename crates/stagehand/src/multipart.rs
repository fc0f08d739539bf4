//! In-memory `multipart/form-data` encoding with a fixed boundary.

use bytes::{BufMut, Bytes, BytesMut};
use std::io::{self, Read, Write};

/// Boundary separating form parts.
pub const FORM_DATA_BOUNDARY: &str = "------HttpTest";

/// `Content-Type` sent with a form body.
pub const FORM_DATA_CONTENT_TYPE: &str = "multipart/form-data;boundary=------HttpTest";

/// Content type written on file parts.
const FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Accumulates form fields and files into a multipart body.
///
/// Parts are laid out the same way a standard multipart writer does it:
/// the first delimiter has no leading line break, every following one does,
/// and [`close`](Self::close) appends the line break and terminating
/// delimiter once, even when no part was written.
#[derive(Debug, Default)]
pub struct FormEncoding {
    buf: BytesMut,
    parts: usize,
    closed: bool,
}

impl FormEncoding {
    /// Creates an empty encoding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parts written so far.
    #[must_use]
    pub const fn parts(&self) -> usize {
        self.parts
    }

    /// Returns true once the closing delimiter has been written.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Writes a plain text field.
    pub fn write_field(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.begin_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n",
            escape_quotes(name)
        ))?;
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    /// Writes a file part, copying `reader` to the end.
    ///
    /// Returns the number of content bytes copied.
    pub fn write_file<R: Read + ?Sized>(
        &mut self,
        name: &str,
        filename: &str,
        reader: &mut R,
    ) -> io::Result<u64> {
        self.begin_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {FILE_CONTENT_TYPE}\r\n",
            escape_quotes(name),
            escape_quotes(filename)
        ))?;
        let mut writer = (&mut self.buf).writer();
        io::copy(reader, &mut writer)
    }

    /// Writes the closing delimiter.
    ///
    /// Fails if the encoding was already closed.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("multipart encoding already closed"));
        }
        write!((&mut self.buf).writer(), "\r\n--{FORM_DATA_BOUNDARY}--\r\n")?;
        self.closed = true;
        Ok(())
    }

    /// Returns the encoded body.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    fn begin_part(&mut self, headers: &str) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("multipart encoding already closed"));
        }
        if self.parts > 0 {
            self.buf.put_slice(b"\r\n");
        }
        write!((&mut self.buf).writer(), "--{FORM_DATA_BOUNDARY}\r\n{headers}\r\n")?;
        self.parts += 1;
        Ok(())
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
