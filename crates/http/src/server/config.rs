use std::path::PathBuf;
use std::thread;

/// Capacity of each connection's read buffer.
pub const READ_BUFFER_SIZE: usize = 2048;

/// Capacity of each connection's response head buffer.
pub const WRITE_BUFFER_SIZE: usize = 1024;

/// Longest document root plus target path that will be resolved.
pub const MAX_PATH_LEN: usize = 200;

pub const MAX_CONNECTIONS: usize = 65535;

/// Readiness events fetched per poll.
pub const EVENT_CAPACITY: usize = 1024;

pub const DEFAULT_DOC_ROOT: &str = "resources";

/// Static configuration, fixed once the server starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub doc_root: PathBuf,
    pub read_buffer_size: usize,
    pub write_buffer_size: usize,
    pub max_path_len: usize,
    pub max_connections: usize,
    pub event_capacity: usize,
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            doc_root: PathBuf::from(DEFAULT_DOC_ROOT),
            read_buffer_size: READ_BUFFER_SIZE,
            write_buffer_size: WRITE_BUFFER_SIZE,
            max_path_len: MAX_PATH_LEN,
            max_connections: MAX_CONNECTIONS,
            event_capacity: EVENT_CAPACITY,
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}
