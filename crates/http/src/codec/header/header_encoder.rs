//! Bounded formatting of response headers.
//!
//! Responses are formatted into a [`WriteBuffer`] with a hard capacity. Every
//! append takes one structured [`HeaderLine`] (or a canned body text) and either
//! writes it completely or leaves the buffer untouched and reports
//! [`SendError::BufferOverflow`]. Nothing is ever truncated.

use std::fmt;
use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use mime::Mime;

use crate::protocol::SendError;

/// The closed set of lines a response head is made of.
#[derive(Debug, Clone, Copy)]
pub enum HeaderLine<'a> {
    /// `HTTP/1.1 <code> <reason>`
    Status(StatusCode),
    ContentLength(u64),
    ContentType(&'a Mime),
    Connection { keep_alive: bool },
    /// The empty line ending the head.
    Blank,
}

impl fmt::Display for HeaderLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderLine::Status(status) => {
                write!(f, "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or("Unknown"))
            }
            HeaderLine::ContentLength(length) => write!(f, "Content-Length: {length}\r\n"),
            HeaderLine::ContentType(mime) => write!(f, "Content-Type: {mime}\r\n"),
            HeaderLine::Connection { keep_alive: true } => f.write_str("Connection: keep-alive\r\n"),
            HeaderLine::Connection { keep_alive: false } => f.write_str("Connection: close\r\n"),
            HeaderLine::Blank => f.write_str("\r\n"),
        }
    }
}

/// Fixed capacity buffer holding the formatted response head (and canned body).
#[derive(Debug)]
pub struct WriteBuffer {
    buf: BytesMut,
    capacity: usize,
}

impl WriteBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity), capacity }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Appends one formatted header line.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::BufferOverflow`] if the line does not fit, the buffer is unchanged.
    pub fn append(&mut self, line: HeaderLine<'_>) -> Result<(), SendError> {
        self.bounded(|w| write!(w, "{line}"))
    }

    /// Appends body text verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::BufferOverflow`] if the text does not fit, the buffer is unchanged.
    pub fn append_content(&mut self, content: &str) -> Result<(), SendError> {
        self.bounded(|w| w.write_all(content.as_bytes()))
    }

    fn bounded<F>(&mut self, f: F) -> Result<(), SendError>
    where
        F: FnOnce(&mut BoundedWrite<'_>) -> io::Result<()>,
    {
        let mark = self.buf.len();
        let mut writer = BoundedWrite { dst: &mut self.buf, limit: self.capacity, required: mark };
        f(&mut writer)?;

        let required = writer.required;
        if required > self.capacity {
            self.buf.truncate(mark);
            return Err(SendError::buffer_overflow(required, self.capacity));
        }
        Ok(())
    }
}

/// Writer that stops copying once `limit` would be exceeded but keeps counting,
/// so the caller learns how many bytes the whole append needed.
struct BoundedWrite<'a> {
    dst: &'a mut BytesMut,
    limit: usize,
    required: usize,
}

impl Write for BoundedWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.required += buf.len();
        if self.required <= self.limit {
            self.dst.put_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_every_line_kind() {
        let mut buf = WriteBuffer::with_capacity(1024);
        buf.append(HeaderLine::Status(StatusCode::NOT_FOUND)).unwrap();
        buf.append(HeaderLine::ContentLength(49)).unwrap();
        buf.append(HeaderLine::ContentType(&mime::TEXT_HTML)).unwrap();
        buf.append(HeaderLine::Connection { keep_alive: false }).unwrap();
        buf.append(HeaderLine::Blank).unwrap();

        assert_eq!(
            buf.as_bytes(),
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 49\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn overflow_leaves_buffer_untouched() {
        let mut buf = WriteBuffer::with_capacity(20);
        buf.append(HeaderLine::ContentLength(7)).unwrap();
        let before = buf.as_bytes().to_vec();

        let err = buf.append(HeaderLine::Connection { keep_alive: true }).unwrap_err();
        assert!(matches!(err, SendError::BufferOverflow { required: 43, capacity: 20 }));
        assert_eq!(buf.as_bytes(), &before[..]);

        assert!(buf.append_content("0123456789abcdef").is_err());
        assert_eq!(buf.len(), before.len());
    }

    #[test]
    fn exact_fit_is_accepted() {
        let mut buf = WriteBuffer::with_capacity(2);
        buf.append(HeaderLine::Blank).unwrap();
        assert_eq!(buf.len(), buf.capacity());
        assert!(buf.append(HeaderLine::Blank).is_err());
    }
}
