use std::io;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("bind server error, address {address}: {source}")]
    Bind { address: SocketAddr, source: io::Error },

    #[error("can't create readiness poller: {source}")]
    Poll { source: io::Error },

    #[error("can't start {workers} workers: {source}")]
    WorkerPool { workers: usize, source: io::Error },

    #[error("reactor stopped: {source}")]
    Reactor { source: io::Error },
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("port must be set")]
    MissingPort,
    #[error("worker count must be positive")]
    NoWorkers,
}
