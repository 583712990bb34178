//! HTTP request header handling implementation.
//!
//! [`RequestHeader`] is the fully decoded request line plus the three header
//! fields this server understands. It owns its data so the read buffer can be
//! reset while the header is still in use.

use http::{Method, Version};

/// A completely decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub(crate) method: Method,
    pub(crate) target: String,
    pub(crate) version: Version,
    pub(crate) host: Option<String>,
    pub(crate) content_length: u64,
    pub(crate) keep_alive: bool,
}

impl RequestHeader {
    /// Returns the request's HTTP method, always `GET`.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the normalized target, always starting with `/`.
    ///
    /// Absolute form targets (`http://host/path`) have their scheme and
    /// authority stripped.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the request's HTTP version, always `HTTP/1.1`.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the verbatim `Host` header value, if one was sent.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the declared body length, zero when no `Content-Length` was sent.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Whether the client asked with `Connection: keep-alive` to reuse the connection.
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }
}
