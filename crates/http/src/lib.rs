//! A minimal reactor driven HTTP/1.1 origin server
//!
//! This crate serves files below a document root over HTTP/1.1 `GET`. One
//! reactor thread polls every socket for readiness, a fixed size worker pool
//! decodes requests and builds responses, and files are sent straight from a
//! read-only memory mapping with scatter-gather writes.
//!
//! # Example
//!
//! ```no_run
//! use origin_http::server::Server;
//! use tracing::{error, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//! tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//! let server = Server::builder().port(8080).doc_root("/var/www").build().unwrap();
//! if let Err(e) = server.start() {
//!     error!(cause = %e, "server stopped");
//! }
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: line scanning, the resumable request decoder and bounded response formatting
//! - [`resource`]: mapping request targets onto files, zero-copy file views
//! - [`connection`]: the per-connection state machine and its write plan
//! - [`protocol`]: request, outcome and error types
//! - [`server`]: configuration, the reactor, the worker pool and shared context
//!
//! # Concurrency
//!
//! A connection is only ever touched by one thread at a time. Readiness events
//! hand out custody of a connection: the thread that claims it from the shared
//! connection table owns its buffers until it re-arms the registration and parks
//! it again. See [`server::ServerContext`].
//!
//! # Limitations
//!
//! - `GET` and `HTTP/1.1` only, other methods and versions get `400 Bad Request`
//! - one request in flight per connection, no pipelining
//! - no chunked transfer encoding, no TLS, no virtual hosts
//! - requests must fit into the read buffer (2 KiB by default)
//! - no idle timeout, a silent client keeps its connection open

pub mod codec;
pub mod connection;
pub mod protocol;
pub mod resource;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
