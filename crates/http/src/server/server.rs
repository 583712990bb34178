use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tracing::info;

use crate::server::reactor::Reactor;
use crate::server::worker::TokioWorkerPool;
use crate::server::{ServerBuildError, ServerConfig, ServerError};

#[derive(Debug)]
pub struct ServerBuilder {
    host: IpAddr,
    port: Option<u16>,
    config: ServerConfig,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { host: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: None, config: ServerConfig::default() }
    }

    pub fn host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn doc_root(mut self, doc_root: impl Into<PathBuf>) -> Self {
        self.config.doc_root = doc_root.into();
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.config.max_connections = max_connections;
        self
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let port = self.port.ok_or(ServerBuildError::MissingPort)?;
        if self.config.workers == 0 {
            return Err(ServerBuildError::NoWorkers);
        }
        Ok(Server { address: SocketAddr::new(self.host, port), config: self.config })
    }
}

#[derive(Debug)]
pub struct Server {
    address: SocketAddr,
    config: ServerConfig,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Starts the worker pool and binds the listening socket.
    pub fn bind(self) -> Result<Reactor<TokioWorkerPool>, ServerError> {
        let workers = self.config.workers;
        let pool = TokioWorkerPool::new(workers).map_err(|source| ServerError::WorkerPool { workers, source })?;

        info!(address = %self.address, workers, doc_root = %self.config.doc_root.display(), "start server");
        Reactor::bind(self.address, self.config, pool)
    }

    /// Binds and runs the event loop, returns only if polling fails.
    pub fn start(self) -> Result<(), ServerError> {
        self.bind()?.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_is_required() {
        assert!(matches!(Server::builder().build(), Err(ServerBuildError::MissingPort)));
        assert!(matches!(Server::builder().port(80).workers(0).build(), Err(ServerBuildError::NoWorkers)));
    }

    #[test]
    fn defaults() {
        let server = Server::builder().port(8080).doc_root("/srv/www").build().unwrap();
        assert_eq!(server.address(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(server.config().doc_root, PathBuf::from("/srv/www"));
        assert_eq!(server.config().read_buffer_size, 2048);
        assert_eq!(server.config().write_buffer_size, 1024);
        assert_eq!(server.config().max_path_len, 200);
        assert!(server.config().workers >= 1);
    }
}
