//! Server assembly: configuration, the reactor and the worker pool.
//!
//! - [`Server`] / [`ServerBuilder`]: entry point, binds and runs everything
//! - [`ServerConfig`]: static configuration
//! - [`ServerContext`]: shared state passed explicitly to the reactor and workers,
//!   holds the connection table, the live connection counter and the resolver
//! - [`Reactor`]: the single event loop thread
//! - [`WorkerPool`]: the contract of the pool running [`ConnectionTask`]s

mod config;
mod context;
mod error;
mod reactor;
#[allow(clippy::module_inception, reason = "mirrors the builder type it defines")]
mod server;
mod worker;

pub use config::{ServerConfig, DEFAULT_DOC_ROOT, EVENT_CAPACITY, MAX_CONNECTIONS, MAX_PATH_LEN, READ_BUFFER_SIZE, WRITE_BUFFER_SIZE};
pub use context::{ServerContext, Session};
pub use error::{ServerBuildError, ServerError};
pub use reactor::Reactor;
pub use server::{Server, ServerBuilder};
pub use worker::{ConnectionTask, TokioWorkerPool, WorkerPool};
