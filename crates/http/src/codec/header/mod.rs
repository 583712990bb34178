//! HTTP header processing module for encoding and decoding headers
//!
//! # Components
//!
//! - Decoding: the request line and the `Connection`, `Content-Length` and
//!   `Host` header fields, one complete line at a time
//!
//! - Encoding: [`WriteBuffer`] formats [`HeaderLine`]s into a fixed capacity
//!   buffer and refuses anything that would not fit

mod header_decoder;
mod header_encoder;

pub(crate) use header_decoder::{parse_header_field, parse_request_line, HeaderField};
pub use header_encoder::{HeaderLine, WriteBuffer};
