//! The output sink abstraction and an in-memory implementation.
//!
//! A [`ResponseSink`] is the in-progress HTTP response owned by the host
//! framework. The helper functions in this crate only borrow it for the
//! duration of one call; nothing is retained afterwards.

use std::io;

use bytes::{BufMut, BytesMut};

use crate::status::reason_phrase;

pub mod headers;

pub use headers::Headers;

/// An in-progress HTTP response that status, headers, and body bytes are
/// written to.
///
/// Implemented by the host framework's response object (or by
/// [`ResponseBuffer`] for hosts that speak raw TCP). One sink serves exactly
/// one response; sharing a sink across threads or writing it twice is the
/// caller's bug, not detected here.
pub trait ResponseSink {
    /// Sets the response status code. Any integer is accepted verbatim.
    fn set_status(&mut self, code: u16);

    /// Sets a response header. Calling again with the same name replaces the
    /// previous value (last-write-wins per name).
    fn set_header(&mut self, name: &str, value: &str);

    /// Writes body bytes, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Any I/O failure of the underlying transport (e.g. a broken
    /// connection) is surfaced here unchanged.
    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// An in-memory [`ResponseSink`] that can serialize itself to HTTP/1.1 wire
/// format.
///
/// # Examples
///
/// ```
/// use respond::{ResponseBuffer, ResponseSink};
///
/// let mut out = ResponseBuffer::new();
/// out.set_status(200);
/// out.write_body(b"Hello").unwrap();
///
/// let bytes = out.into_bytes();
/// let text = std::str::from_utf8(&bytes).unwrap();
/// assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
/// assert!(text.contains("Content-Length: 5\r\n"));
/// ```
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    status: u16,
    headers: Headers,
    body: BytesMut,
}

impl ResponseBuffer {
    /// Creates an empty buffer with status 200 until told otherwise.
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Headers::new(),
            body: BytesMut::new(),
        }
    }

    /// Returns the status code currently recorded.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the headers recorded so far.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the body bytes written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Serializes the response into a `BytesMut` buffer using HTTP/1.1 wire
    /// format.
    ///
    /// The status line carries the canonical reason phrase when the code has
    /// one. `Content-Length` is always written, as the last header before
    /// the blank line.
    pub fn into_bytes(self) -> BytesMut {
        let content_length = self.body.len();

        let estimated_size = 64 + self.headers.len() * 64 + content_length;
        let mut buf = BytesMut::with_capacity(estimated_size);

        // Status line
        let phrase = reason_phrase(self.status);
        buf.put(format!("HTTP/1.1 {} {phrase}\r\n", self.status).as_bytes());

        // Headers
        for (name, value) in self.headers.iter() {
            buf.put(format!("{name}: {value}\r\n").as_bytes());
        }

        // Content-Length is always the last header before the blank line
        buf.put(format!("Content-Length: {content_length}\r\n").as_bytes());

        // Header/body separator
        buf.put(&b"\r\n"[..]);

        // Body
        if !self.body.is_empty() {
            buf.put(&self.body[..]);
        }

        buf
    }
}

impl ResponseSink for ResponseBuffer {
    fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.set(name, value);
    }

    fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}
