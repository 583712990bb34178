//! HTTP connection handling module
//!
//! # Components
//!
//! - [`HttpConnection`]: one client session, exposing the three steps the
//!   reactor and the workers drive it through:
//!   - [`on_readable`](HttpConnection::on_readable): drain the socket into the read buffer
//!   - [`process`](HttpConnection::process): decode, resolve, prepare and start sending the response
//!   - [`on_writable`](HttpConnection::on_writable): resume a partially sent response
//! - [`MessageWriter`]: the two segment write plan with resumable scatter-gather sends
//! - [`Next`]: what the connection waits for afterwards

mod http_connection;
mod message_writer;

pub use http_connection::{HttpConnection, Next};
pub use message_writer::{MessageWriter, WriteStatus};
