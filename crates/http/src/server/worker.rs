//! The worker pool collaborator.
//!
//! The reactor hands every connection that became readable to a [`WorkerPool`].
//! A pool must run each submitted task exactly once, on any of its threads and
//! in any order.

use std::io;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::server::context::{ServerContext, Session};

/// A readable connection waiting to be processed, carries custody of it.
#[derive(Debug)]
pub struct ConnectionTask {
    session: Session,
    ctx: Arc<ServerContext>,
}

impl ConnectionTask {
    pub(crate) fn new(session: Session, ctx: Arc<ServerContext>) -> Self {
        Self { session, ctx }
    }

    pub fn run(self) {
        let Self { session, ctx } = self;
        session.process(&ctx);
    }
}

pub trait WorkerPool {
    fn submit(&self, task: ConnectionTask);
}

/// Fixed size pool on a multi-thread tokio runtime.
///
/// Processing never blocks: sockets are non-blocking and files are mapped, not
/// read, so tasks run directly on the runtime's worker threads.
#[derive(Debug)]
pub struct TokioWorkerPool {
    runtime: Runtime,
}

impl TokioWorkerPool {
    pub fn new(workers: usize) -> io::Result<Self> {
        let runtime = Builder::new_multi_thread().worker_threads(workers).thread_name("origin-worker").build()?;
        Ok(Self { runtime })
    }
}

impl WorkerPool for TokioWorkerPool {
    fn submit(&self, task: ConnectionTask) {
        self.runtime.spawn(async move { task.run() });
    }
}
