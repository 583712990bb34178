//! Shared server state and connection custody.
//!
//! Connections are parked in the [`ServerContext`] table while their socket is
//! registered and waiting for readiness. Whichever thread handles an event first
//! removes the connection from the table and owns it exclusively until it parks
//! it again, so no per-connection lock exists. A parked connection is inserted
//! under the table lock right after its registration is re-armed. The reactor
//! ignores events for tokens that are not in the table (the connection is in
//! someone's custody), and re-arming an already ready socket reports it again.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use mio::net::TcpStream;
use mio::{Interest, Registry, Token};
use tracing::{debug, warn};

use crate::connection::{HttpConnection, Next};
use crate::protocol::HttpError;
use crate::resource::ResourceResolver;
use crate::server::ServerConfig;

/// A connection together with its registration token.
#[derive(Debug)]
pub struct Session {
    token: Token,
    interest: Interest,
    conn: HttpConnection<TcpStream>,
}

impl Session {
    pub(crate) fn new(token: Token, conn: HttpConnection<TcpStream>) -> Self {
        Self { token, interest: Interest::READABLE, conn }
    }

    #[inline]
    pub fn peer_addr(&self) -> SocketAddr {
        self.conn.peer_addr()
    }

    pub(crate) fn connection_mut(&mut self) -> &mut HttpConnection<TcpStream> {
        &mut self.conn
    }

    pub(crate) fn interest(&self) -> Interest {
        self.interest
    }

    /// Runs the request pipeline, then re-arms or closes the connection.
    pub fn process(mut self, ctx: &ServerContext) {
        let result = self.conn.process(ctx.resolver());
        ctx.dispatch(self, result);
    }
}

/// Process wide state shared by the reactor and the workers.
#[derive(Debug)]
pub struct ServerContext {
    registry: Registry,
    resolver: ResourceResolver,
    config: ServerConfig,
    live: AtomicUsize,
    parked: Mutex<HashMap<Token, Session>>,
}

impl ServerContext {
    pub fn new(registry: Registry, config: ServerConfig) -> Self {
        Self {
            registry,
            resolver: ResourceResolver::new(config.doc_root.clone(), config.max_path_len),
            config,
            live: AtomicUsize::new(0),
            parked: Mutex::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    #[inline]
    pub fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    /// Number of open client connections.
    #[inline]
    pub fn live_connections(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    fn table(&self) -> MutexGuard<'_, HashMap<Token, Session>> {
        self.parked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts a new connection if the limit allows it.
    pub(crate) fn try_reserve(&self) -> bool {
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| (live < self.config.max_connections).then_some(live + 1))
            .is_ok()
    }

    /// Gives back a reservation whose connection never got registered.
    pub(crate) fn release(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }

    /// Registers a freshly accepted connection for readability.
    pub(crate) fn admit(&self, mut session: Session) -> io::Result<()> {
        let mut table = self.table();
        let stream = session.conn.stream_mut().ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?;
        self.registry.register(stream, session.token, Interest::READABLE)?;
        session.interest = Interest::READABLE;
        table.insert(session.token, session);
        Ok(())
    }

    /// Takes exclusive custody of a parked connection.
    pub(crate) fn claim(&self, token: Token) -> Option<Session> {
        self.table().remove(&token)
    }

    /// Re-arms the registration for `interest` and parks the connection.
    pub(crate) fn park(&self, mut session: Session, interest: Interest) {
        let mut table = self.table();
        let result = match session.conn.stream_mut() {
            Some(stream) => self.registry.reregister(stream, session.token, interest),
            None => Err(io::Error::from(io::ErrorKind::NotConnected)),
        };

        match result {
            Ok(()) => {
                session.interest = interest;
                table.insert(session.token, session);
            }
            Err(e) => {
                drop(table);
                warn!(cause = %e, token = ?session.token, "can't re-arm connection");
                self.close(session);
            }
        }
    }

    /// Acts on the result of a connection step.
    pub(crate) fn dispatch(&self, session: Session, result: Result<Next, HttpError>) {
        match result {
            Ok(Next::Read) => self.park(session, Interest::READABLE),
            Ok(Next::Write) => self.park(session, Interest::WRITABLE),
            Ok(Next::Close) => self.close(session),
            Err(e) => {
                debug!(cause = %e, peer = %session.peer_addr(), "connection failed");
                self.close(session);
            }
        }
    }

    /// Deregisters and closes the socket, releases the file view and the
    /// connection's slot in the limit.
    pub(crate) fn close(&self, session: Session) {
        let Session { token, mut conn, .. } = session;
        if let Some(mut stream) = conn.close() {
            if let Err(e) = self.registry.deregister(&mut stream) {
                debug!(cause = %e, token = ?token, "deregister failed");
            }
            let live = self.live.fetch_sub(1, Ordering::AcqRel) - 1;
            debug!(token = ?token, peer = %conn.peer_addr(), live, "connection closed");
        }
    }
}
