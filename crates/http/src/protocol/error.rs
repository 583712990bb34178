use std::io;
use thiserror::Error;

use crate::protocol::Outcome;

/// Connection level failure, always fatal to the connection.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },

    #[error("peer closed the connection")]
    PeerClosed,

    #[error("read buffer is full, capacity {capacity}")]
    ReadBufferFull { capacity: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid line terminator at offset {offset}")]
    InvalidLine { offset: usize },

    #[error("invalid request line: {reason}")]
    InvalidRequestLine { reason: String },

    #[error("unsupported http method: {method}")]
    InvalidMethod { method: String },

    #[error("unsupported http version: {version}")]
    InvalidVersion { version: String },

    #[error("invalid request target: {reason}")]
    InvalidUri { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("declared body of {length} bytes exceed the limit {max_size}")]
    TooLargeBody { length: u64, max_size: usize },

    #[error("decoder reached an invalid state")]
    InvalidState,
}

impl ParseError {
    pub fn invalid_line(offset: usize) -> Self {
        Self::InvalidLine { offset }
    }

    pub fn invalid_request_line<S: ToString>(str: S) -> Self {
        Self::InvalidRequestLine { reason: str.to_string() }
    }

    pub fn invalid_method(method: &[u8]) -> Self {
        Self::InvalidMethod { method: String::from_utf8_lossy(method).into_owned() }
    }

    pub fn invalid_version(version: &[u8]) -> Self {
        Self::InvalidVersion { version: String::from_utf8_lossy(version).into_owned() }
    }

    pub fn invalid_uri<S: ToString>(str: S) -> Self {
        Self::InvalidUri { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn too_large_body(length: u64, max_size: usize) -> Self {
        Self::TooLargeBody { length, max_size }
    }

    /// The response a parse failure is answered with.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::InvalidState => Outcome::InternalError,
            _ => Outcome::Malformed,
        }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("response of {required} bytes exceed the write buffer capacity {capacity}")]
    BufferOverflow { required: usize, capacity: usize },

    #[error("socket accepted zero bytes with {pending} bytes pending")]
    WriteZero { pending: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn buffer_overflow(required: usize, capacity: usize) -> Self {
        Self::BufferOverflow { required, capacity }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
