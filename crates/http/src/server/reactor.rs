//! The event loop.
//!
//! A single reactor thread owns the listening socket and the readiness poller.
//! It accepts connections, reads from readable connections before handing
//! them to the worker pool, and resumes pending writes itself.

use std::io;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use mio::event::Event;
use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token};
use tracing::{debug, error, info, trace, warn};

use crate::connection::HttpConnection;
use crate::server::context::{ServerContext, Session};
use crate::server::worker::{ConnectionTask, WorkerPool};
use crate::server::{ServerConfig, ServerError};

const LISTENER: Token = Token(0);

#[derive(Debug)]
pub struct Reactor<P> {
    poll: Poll,
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    pool: P,
    next_token: usize,
}

impl<P> Reactor<P>
where
    P: WorkerPool,
{
    /// Binds the listening socket and registers it with a new poller.
    pub fn bind(address: SocketAddr, config: ServerConfig, pool: P) -> Result<Self, ServerError> {
        let poll = Poll::new().map_err(|source| ServerError::Poll { source })?;
        let mut listener = TcpListener::bind(address).map_err(|source| ServerError::Bind { address, source })?;
        poll.registry().register(&mut listener, LISTENER, Interest::READABLE).map_err(|source| ServerError::Poll { source })?;

        let registry = poll.registry().try_clone().map_err(|source| ServerError::Poll { source })?;
        let ctx = Arc::new(ServerContext::new(registry, config));

        Ok(Self { poll, listener, ctx, pool, next_token: LISTENER.0 + 1 })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.ctx
    }

    /// Runs the event loop until polling fails.
    pub fn run(mut self) -> Result<(), ServerError> {
        let mut events = Events::with_capacity(self.ctx.config().event_capacity);
        info!(address = ?self.listener.local_addr().ok(), "start listening");

        loop {
            if let Err(e) = self.poll.poll(&mut events, None) {
                if e.kind() == ErrorKind::Interrupted {
                    continue;
                }
                error!(cause = %e, "poll failure");
                return Err(ServerError::Reactor { source: e });
            }

            for event in &events {
                match event.token() {
                    LISTENER => self.accept(),
                    token => self.handle(token, event),
                }
            }
        }
    }

    /// Accepts until the listener would block.
    fn accept(&mut self) {
        loop {
            let (stream, peer) = match self.listener.accept() {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    return;
                }
            };

            if !self.ctx.try_reserve() {
                warn!(peer = %peer, max_connections = self.ctx.config().max_connections, "too many connections, reject");
                drop(stream);
                continue;
            }

            let token = Token(self.next_token);
            self.next_token += 1;

            let config = self.ctx.config();
            let conn = HttpConnection::new(stream, peer, config.read_buffer_size, config.write_buffer_size);
            match self.ctx.admit(Session::new(token, conn)) {
                Ok(()) => debug!(peer = %peer, token = ?token, live = self.ctx.live_connections(), "accept connection"),
                Err(e) => {
                    self.ctx.release();
                    warn!(cause = %e, peer = %peer, "can't register connection");
                }
            }
        }
    }

    fn handle(&self, token: Token, event: &Event) {
        let Some(mut session) = self.ctx.claim(token) else {
            trace!(token = ?token, "connection in custody or closed, ignore event");
            return;
        };

        if event.is_error() || event.is_read_closed() || event.is_write_closed() {
            debug!(token = ?token, peer = %session.peer_addr(), "peer hang up");
            self.ctx.close(session);
            return;
        }

        if event.is_readable() {
            match session.connection_mut().on_readable() {
                Ok(()) => self.pool.submit(ConnectionTask::new(session, Arc::clone(&self.ctx))),
                Err(e) => {
                    debug!(cause = %e, peer = %session.peer_addr(), "read failed");
                    self.ctx.close(session);
                }
            }
        } else if event.is_writable() {
            let result = session.connection_mut().on_writable();
            self.ctx.dispatch(session, result);
        } else {
            let interest = session.interest();
            self.ctx.park(session, interest);
        }
    }
}
