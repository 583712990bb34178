//! Interpretation of single request lines.
//!
//! The [`RequestDecoder`](crate::codec::RequestDecoder) hands every complete line
//! to one of the two functions here:
//!
//! - [`parse_request_line`] for the first line: `GET <target> HTTP/1.1`
//! - [`parse_header_field`] for every following line until the empty one
//!
//! Only `Connection`, `Content-Length` and `Host` are recognized, every other
//! header field is reported as [`HeaderField::Other`] and ignored by the caller.

use http::{Method, Version};
use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

const ABSOLUTE_SCHEME: &[u8] = b"http://";

/// The decoded first line of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestLine {
    pub(crate) method: Method,
    pub(crate) target: String,
    pub(crate) version: Version,
}

/// One decoded header section line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeaderField<'a> {
    /// The empty line closing the header section.
    End,
    Connection { keep_alive: bool },
    ContentLength(u64),
    Host(&'a [u8]),
    Other(&'a [u8]),
}

#[inline]
fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Splits at the first space or tab, dropping the separator.
fn split_blank(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let index = line.iter().position(|b| is_blank(*b))?;
    Some((&line[..index], &line[index + 1..]))
}

fn trim_blank_start(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|b| !is_blank(*b)).unwrap_or(value.len());
    &value[start..]
}

/// Decodes `METHOD SP TARGET SP VERSION`.
///
/// # Errors
///
/// - the line has fewer than three parts
/// - the method is not `GET` or the version is not `HTTP/1.1` (both compared
///   ignoring ASCII case)
/// - the target does not start with `/` after the `http://host` prefix of an
///   absolute form target was stripped
pub(crate) fn parse_request_line(line: &[u8]) -> Result<RequestLine, ParseError> {
    let (method, rest) = split_blank(line).ok_or_else(|| ParseError::invalid_request_line("missing request target"))?;
    ensure!(method.eq_ignore_ascii_case(b"GET"), ParseError::invalid_method(method));

    let (target, version) = split_blank(rest).ok_or_else(|| ParseError::invalid_request_line("missing http version"))?;
    ensure!(version.eq_ignore_ascii_case(b"HTTP/1.1"), ParseError::invalid_version(version));

    let target = normalize_target(target)?;
    let target = std::str::from_utf8(target).map_err(ParseError::invalid_uri)?;

    trace!(target, "parsed request line");
    Ok(RequestLine { method: Method::GET, target: target.to_owned(), version: Version::HTTP_11 })
}

/// Strips `http://authority` from absolute form targets, then requires a leading `/`.
fn normalize_target(target: &[u8]) -> Result<&[u8], ParseError> {
    let target = if target.len() >= ABSOLUTE_SCHEME.len() && target[..ABSOLUTE_SCHEME.len()].eq_ignore_ascii_case(ABSOLUTE_SCHEME) {
        let authority_and_path = &target[ABSOLUTE_SCHEME.len()..];
        let path_start = authority_and_path
            .iter()
            .position(|b| *b == b'/')
            .ok_or_else(|| ParseError::invalid_uri("absolute target without path"))?;
        &authority_and_path[path_start..]
    } else {
        target
    };

    ensure!(target.first() == Some(&b'/'), ParseError::invalid_uri("target must start with '/'"));
    Ok(target)
}

/// Returns the value if `line` starts with `name:` (ignoring ASCII case), with
/// leading blanks removed.
fn field_value<'a>(line: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    let value = line.get(name.len() + 1..)?;
    (line[..name.len()].eq_ignore_ascii_case(name) && line[name.len()] == b':').then(|| trim_blank_start(value))
}

/// Decodes one line of the header section.
///
/// # Errors
///
/// Returns [`ParseError::InvalidContentLength`] when `Content-Length` is not a
/// non-negative decimal integer that fits in `u64`.
pub(crate) fn parse_header_field(line: &[u8]) -> Result<HeaderField<'_>, ParseError> {
    if line.is_empty() {
        return Ok(HeaderField::End);
    }

    if let Some(value) = field_value(line, b"connection") {
        return Ok(HeaderField::Connection { keep_alive: value.eq_ignore_ascii_case(b"keep-alive") });
    }

    if let Some(value) = field_value(line, b"content-length") {
        return parse_content_length(value).map(HeaderField::ContentLength);
    }

    if let Some(value) = field_value(line, b"host") {
        return Ok(HeaderField::Host(value));
    }

    trace!(line = %String::from_utf8_lossy(line), "ignore unknown header");
    Ok(HeaderField::Other(line))
}

fn parse_content_length(value: &[u8]) -> Result<u64, ParseError> {
    ensure!(
        !value.is_empty() && value.iter().all(u8::is_ascii_digit),
        ParseError::invalid_content_length(format!("value {} is not a decimal integer", String::from_utf8_lossy(value)))
    );

    // all ascii digits, so the only failure left is overflow
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| ParseError::invalid_content_length("value overflows u64"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_form() {
        let line = parse_request_line(b"GET /index.html HTTP/1.1").unwrap();
        assert_eq!(line.method, Method::GET);
        assert_eq!(line.target, "/index.html");
        assert_eq!(line.version, Version::HTTP_11);
    }

    #[test]
    fn method_and_version_ignore_case() {
        let line = parse_request_line(b"get\t/a http/1.1").unwrap();
        assert_eq!(line.target, "/a");
    }

    #[test]
    fn absolute_form_is_stripped() {
        let line = parse_request_line(b"GET http://192.168.1.1:10000/index.html HTTP/1.1").unwrap();
        assert_eq!(line.target, "/index.html");

        let line = parse_request_line(b"GET HTTP://example.com/ HTTP/1.1").unwrap();
        assert_eq!(line.target, "/");
    }

    #[test]
    fn rejects_bad_request_lines() {
        assert!(matches!(parse_request_line(b"POST / HTTP/1.1"), Err(ParseError::InvalidMethod { .. })));
        assert!(matches!(parse_request_line(b"GET / HTTP/1.0"), Err(ParseError::InvalidVersion { .. })));
        assert!(matches!(parse_request_line(b"GET /"), Err(ParseError::InvalidRequestLine { .. })));
        assert!(matches!(parse_request_line(b"GET"), Err(ParseError::InvalidRequestLine { .. })));
        assert!(matches!(parse_request_line(b"GET index.html HTTP/1.1"), Err(ParseError::InvalidUri { .. })));
        assert!(matches!(parse_request_line(b"GET http://example.com HTTP/1.1"), Err(ParseError::InvalidUri { .. })));
        assert!(matches!(parse_request_line(b"GET / HTTP/1.1 extra"), Err(ParseError::InvalidVersion { .. })));
    }

    #[test]
    fn recognized_headers() {
        assert_eq!(parse_header_field(b"").unwrap(), HeaderField::End);
        assert_eq!(parse_header_field(b"Connection: keep-alive").unwrap(), HeaderField::Connection { keep_alive: true });
        assert_eq!(parse_header_field(b"connection:\tKeep-Alive").unwrap(), HeaderField::Connection { keep_alive: true });
        assert_eq!(parse_header_field(b"Connection: close").unwrap(), HeaderField::Connection { keep_alive: false });
        assert_eq!(parse_header_field(b"Content-Length: 42").unwrap(), HeaderField::ContentLength(42));
        assert_eq!(parse_header_field(b"HOST:  127.0.0.1:8080").unwrap(), HeaderField::Host(b"127.0.0.1:8080"));
        assert_eq!(parse_header_field(b"Accept: */*").unwrap(), HeaderField::Other(b"Accept: */*"));
        assert_eq!(parse_header_field(b"Hostname: x").unwrap(), HeaderField::Other(b"Hostname: x"));
    }

    #[test]
    fn invalid_content_length() {
        assert!(parse_header_field(b"Content-Length: -1").is_err());
        assert!(parse_header_field(b"Content-Length: 12a").is_err());
        assert!(parse_header_field(b"Content-Length:").is_err());
        assert!(parse_header_field(b"Content-Length: 99999999999999999999999").is_err());
    }
}
