//! HTTP request decoder module
//!
//! The decoder is a resumable three phase state machine driven over a
//! [`ReadBuffer`]:
//!
//! 1. `RequestLine`: the first complete line is decoded as `GET <target> HTTP/1.1`
//! 2. `Header`: every following line is a header field, until the empty line
//! 3. `Body`: if a non zero `Content-Length` was declared, waits until that many
//!    bytes arrived after the empty line
//!
//! Decoding never depends on how the bytes were split across reads: calling
//! [`RequestDecoder::decode`] after every read yields the same result as one
//! call over the whole request.
//!
//! # Example
//!
//! ```
//! use origin_http::codec::{ReadBuffer, RequestDecoder};
//!
//! let mut buffer = ReadBuffer::with_capacity(2048);
//! let mut decoder = RequestDecoder::new();
//!
//! buffer.extend_from_slice(b"GET /index.html HTTP/1.1\r\nHost: local");
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"host\r\n\r\n");
//! let header = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(header.target(), "/index.html");
//! assert_eq!(header.host(), Some("localhost"));
//! ```

use std::mem;
use std::ops::Range;

use http::{Method, Version};
use tracing::trace;

use crate::codec::header::{parse_header_field, parse_request_line, HeaderField};
use crate::codec::line::LineStatus;
use crate::codec::ReadBuffer;
use crate::ensure;
use crate::protocol::{ParseError, RequestHeader};

/// Phase of the request currently being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    RequestLine,
    Header,
    Body,
    /// A request was returned, the decoder must be reset before reuse.
    Complete,
}

#[derive(Debug)]
pub struct RequestDecoder {
    phase: Phase,
    method: Method,
    target: String,
    version: Version,
    host: Option<String>,
    content_length: u64,
    keep_alive: bool,
    body: Option<Range<usize>>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The keep-alive intent seen so far, also meaningful after a parse error.
    #[inline]
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// The range of the request body inside the read buffer, once complete.
    #[inline]
    pub fn body_range(&self) -> Option<Range<usize>> {
        self.body.clone()
    }

    /// Returns the decoder to its initial state, ready for the next request.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Attempts to decode a request from the bytes received so far.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(header))`: the request is complete
    /// - `Ok(None)`: more bytes are needed
    /// - `Err(_)`: the request is malformed, see [`ParseError::outcome`]
    pub fn decode(&mut self, src: &mut ReadBuffer) -> Result<Option<RequestHeader>, ParseError> {
        loop {
            match self.phase {
                Phase::RequestLine | Phase::Header => {
                    let line = match src.next_line() {
                        LineStatus::Complete(line) => line,
                        LineStatus::Incomplete => return Ok(None),
                        LineStatus::Invalid(offset) => return Err(ParseError::invalid_line(offset)),
                    };

                    if self.decode_line(src.slice(line), src.capacity() - src.scan_pos())? {
                        return Ok(Some(self.take_header()));
                    }
                }

                Phase::Body => {
                    // content_length was bounded by the buffer capacity when entering this phase
                    let Ok(length) = usize::try_from(self.content_length) else {
                        return Err(ParseError::InvalidState);
                    };
                    if src.pending() < length {
                        return Ok(None);
                    }

                    self.body = Some(src.consume(length));
                    trace!(length, "request body complete");
                    return Ok(Some(self.take_header()));
                }

                Phase::Complete => return Err(ParseError::InvalidState),
            }
        }
    }

    /// Interprets one complete line, returns true when the request is complete.
    fn decode_line(&mut self, line: &[u8], body_capacity: usize) -> Result<bool, ParseError> {
        if self.phase == Phase::RequestLine {
            let request_line = parse_request_line(line)?;
            self.method = request_line.method;
            self.target = request_line.target;
            self.version = request_line.version;
            self.phase = Phase::Header;
            return Ok(false);
        }

        match parse_header_field(line)? {
            HeaderField::End if self.content_length == 0 => {
                self.phase = Phase::Complete;
                return Ok(true);
            }
            HeaderField::End => {
                ensure!(
                    self.content_length <= body_capacity as u64,
                    ParseError::too_large_body(self.content_length, body_capacity)
                );
                trace!(content_length = self.content_length, "header complete, waiting for body");
                self.phase = Phase::Body;
            }
            HeaderField::Connection { keep_alive } => {
                // only an explicit keep-alive turns the flag on
                self.keep_alive |= keep_alive;
            }
            HeaderField::ContentLength(length) => self.content_length = length,
            HeaderField::Host(host) => self.host = Some(String::from_utf8_lossy(host).into_owned()),
            HeaderField::Other(_) => {}
        }
        Ok(false)
    }

    fn take_header(&mut self) -> RequestHeader {
        self.phase = Phase::Complete;
        RequestHeader {
            method: self.method.clone(),
            target: mem::take(&mut self.target),
            version: self.version,
            host: self.host.take(),
            content_length: self.content_length,
            keep_alive: self.keep_alive,
        }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self {
            phase: Phase::RequestLine,
            method: Method::GET,
            target: String::new(),
            version: Version::HTTP_11,
            host: None,
            content_length: 0,
            keep_alive: false,
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn crlf(text: &str) -> Vec<u8> {
        text.replace('\n', "\r\n").into_bytes()
    }

    fn decode_all(bytes: &[u8]) -> (Result<Option<RequestHeader>, ParseError>, RequestDecoder, ReadBuffer) {
        let mut buffer = ReadBuffer::with_capacity(2048);
        let mut decoder = RequestDecoder::new();
        buffer.extend_from_slice(bytes);
        let result = decoder.decode(&mut buffer);
        (result, decoder, buffer)
    }

    /// Feeds the bytes in `chunk` sized reads, decoding after every read.
    fn decode_chunked(bytes: &[u8], chunk: usize) -> Result<Option<RequestHeader>, ParseError> {
        let mut buffer = ReadBuffer::with_capacity(2048);
        let mut decoder = RequestDecoder::new();
        let mut result = Ok(None);
        for piece in bytes.chunks(chunk) {
            buffer.extend_from_slice(piece);
            result = decoder.decode(&mut buffer);
            if !matches!(result, Ok(None)) {
                break;
            }
        }
        result
    }

    #[test]
    fn from_curl() {
        let request = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##});

        let (result, decoder, _) = decode_all(&request);
        let header = result.unwrap().unwrap();

        assert_eq!(header.method(), &Method::GET);
        assert_eq!(header.version(), Version::HTTP_11);
        assert_eq!(header.target(), "/index.html");
        assert_eq!(header.host(), Some("127.0.0.1:8080"));
        assert_eq!(header.content_length(), 0);
        assert!(!header.keep_alive());
        assert_eq!(decoder.phase(), Phase::Complete);
        assert_eq!(decoder.body_range(), None);
    }

    #[test]
    fn from_edge() {
        let request = crlf(indoc! {r##"
        GET http://127.0.0.1:8080/index/?a=1&b=2 HTTP/1.1
        Host: 127.0.0.1:8080
        Connection: keep-alive
        Cache-Control: max-age=0
        sec-ch-ua-platform: "macOS"
        Accept-Encoding: gzip, deflate, br

        "##});

        let header = decode_all(&request).0.unwrap().unwrap();

        assert_eq!(header.target(), "/index/?a=1&b=2");
        assert!(header.keep_alive());
    }

    #[test]
    fn any_split_gives_the_same_result() {
        let request = crlf(indoc! {r##"
        GET /a/b.html HTTP/1.1
        Host: example.com
        Connection: keep-alive
        Content-Length: 5
        X-Custom: 1

        hello"##});

        let whole = decode_all(&request).0.unwrap().unwrap();
        assert_eq!(whole.content_length(), 5);

        for chunk in 1..request.len() {
            let split = decode_chunked(&request, chunk).unwrap().unwrap();
            assert_eq!(split, whole, "chunk size {chunk}");
        }
    }

    #[test]
    fn malformed_split_gives_the_same_error() {
        let request = b"GET / HTTP/1.1\r\nHost: a\nAccept: b\r\n\r\n";
        for chunk in 1..=request.len() {
            assert!(matches!(decode_chunked(request, chunk), Err(ParseError::InvalidLine { offset: 23 })), "chunk size {chunk}");
        }
    }

    #[test]
    fn waits_for_the_whole_body() {
        let mut buffer = ReadBuffer::with_capacity(2048);
        let mut decoder = RequestDecoder::new();

        buffer.extend_from_slice(b"GET / HTTP/1.1\r\nContent-Length: 4\r\n\r\nab");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert_eq!(decoder.phase(), Phase::Body);

        buffer.extend_from_slice(b"cd");
        let header = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(header.content_length(), 4);
        let body = decoder.body_range().unwrap();
        assert_eq!(buffer.slice(body), b"abcd");
    }

    #[test]
    fn rejects_unsupported_requests() {
        let (result, ..) = decode_all(b"POST / HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidMethod { .. })));

        let (result, ..) = decode_all(b"GET / HTTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidVersion { .. })));

        let (result, ..) = decode_all(b"GET / HTTP/1.1\r\nContent-Length: x\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidContentLength { .. })));
    }

    #[test]
    fn rejects_body_larger_than_buffer() {
        let (result, ..) = decode_all(b"GET / HTTP/1.1\r\nContent-Length: 4096\r\n\r\n");
        assert!(matches!(result, Err(ParseError::TooLargeBody { length: 4096, .. })));
    }

    #[test]
    fn keep_alive_survives_a_later_error() {
        let (result, decoder, _) = decode_all(b"GET / HTTP/1.1\r\nConnection: keep-alive\r\nContent-Length: ?\r\n\r\n");
        assert!(result.is_err());
        assert!(decoder.keep_alive());
    }

    #[test]
    fn decode_after_complete_is_an_internal_error() {
        let (result, mut decoder, mut buffer) = decode_all(b"GET / HTTP/1.1\r\n\r\n");
        assert!(result.unwrap().is_some());

        let err = decoder.decode(&mut buffer).unwrap_err();
        assert!(matches!(err, ParseError::InvalidState));
        assert!(matches!(err.outcome(), crate::protocol::Outcome::InternalError));
    }

    #[test]
    fn reset_forgets_the_previous_request() {
        let mut buffer = ReadBuffer::with_capacity(2048);
        let mut decoder = RequestDecoder::new();

        buffer.extend_from_slice(b"GET /first HTTP/1.1\r\nConnection: keep-alive\r\nContent-Length: 1\r\n\r\nx");
        let first = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(first.content_length(), 1);

        buffer.clear();
        decoder.reset();

        buffer.extend_from_slice(b"GET /second HTTP/1.1\r\n\r\n");
        let second = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(second.target(), "/second");
        assert_eq!(second.content_length(), 0);
        assert!(!second.keep_alive());
        assert_eq!(second.host(), None);
    }
}
