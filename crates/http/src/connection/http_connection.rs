use std::io;
use std::io::{ErrorKind, Read, Write};
use std::net::SocketAddr;

use tracing::{debug, trace, warn};

use crate::codec::{ReadBuffer, RequestDecoder};
use crate::connection::message_writer::{MessageWriter, WriteStatus};
use crate::protocol::HttpError;
use crate::resource::ResourceResolver;

/// What the connection waits for next, decides how its registration is re-armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Read,
    Write,
    Close,
}

/// One client session: socket, read buffer, decoder state and write plan.
///
/// The connection is never shared. Whoever holds it (the reactor thread or a
/// worker) has exclusive access to its buffers, custody is passed along with
/// the value.
///
/// # Type Parameters
///
/// * `S`: the non-blocking stream, reads and writes must report `WouldBlock`
///   instead of blocking
#[derive(Debug)]
pub struct HttpConnection<S> {
    stream: Option<S>,
    peer: SocketAddr,
    read_buf: ReadBuffer,
    decoder: RequestDecoder,
    writer: MessageWriter,
    keep_alive: bool,
}

impl<S> HttpConnection<S>
where
    S: Read + Write,
{
    pub fn new(stream: S, peer: SocketAddr, read_buffer_size: usize, write_buffer_size: usize) -> Self {
        Self {
            stream: Some(stream),
            peer,
            read_buf: ReadBuffer::with_capacity(read_buffer_size),
            decoder: RequestDecoder::new(),
            writer: MessageWriter::with_capacity(write_buffer_size),
            keep_alive: false,
        }
    }

    #[inline]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    #[inline]
    pub fn stream_mut(&mut self) -> Option<&mut S> {
        self.stream.as_mut()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Drains the socket into the read buffer until it would block or the
    /// buffer is full. A full buffer is only an error once [`process`](Self::process)
    /// finds no complete request in it.
    ///
    /// # Errors
    ///
    /// - [`HttpError::PeerClosed`] when a read returns zero bytes
    /// - [`HttpError::Io`] for any other read error
    pub fn on_readable(&mut self) -> Result<(), HttpError> {
        let stream = self.stream.as_mut().ok_or_else(|| io::Error::from(ErrorKind::NotConnected))?;

        loop {
            if self.read_buf.is_full() {
                trace!(peer = %self.peer, capacity = self.read_buf.capacity(), "read buffer full, stop reading");
                return Ok(());
            }

            match stream.read(self.read_buf.unfilled_mut()) {
                Ok(0) => return Err(HttpError::PeerClosed),
                Ok(n) => {
                    self.read_buf.advance(n);
                    trace!(peer = %self.peer, read = n, buffered = self.read_buf.len(), "read from socket");
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Decodes the buffered bytes and, once a request is complete or malformed,
    /// prepares the response and tries to send it right away.
    ///
    /// # Errors
    ///
    /// - [`HttpError::ReadBufferFull`] when the buffer is full and still holds no complete request
    /// - formatting or sending the response failed
    ///
    /// The connection must be closed in either case.
    pub fn process(&mut self, resolver: &ResourceResolver) -> Result<Next, HttpError> {
        let outcome = match self.decoder.decode(&mut self.read_buf) {
            Ok(None) if self.read_buf.is_full() => {
                return Err(HttpError::ReadBufferFull { capacity: self.read_buf.capacity() });
            }
            Ok(None) => return Ok(Next::Read),
            Ok(Some(header)) => {
                debug!(peer = %self.peer, target = header.target(), keep_alive = header.keep_alive(), "receive request");
                self.keep_alive = header.keep_alive();
                resolver.resolve(header.target())
            }
            Err(e) => {
                warn!(peer = %self.peer, cause = %e, "malformed request");
                self.keep_alive = self.decoder.keep_alive();
                e.outcome()
            }
        };

        self.writer.prepare(outcome, self.keep_alive)?;
        self.on_writable()
    }

    /// Sends the pending response, resuming where the previous attempt stopped.
    ///
    /// # Errors
    ///
    /// A hard write error, the connection must be closed.
    pub fn on_writable(&mut self) -> Result<Next, HttpError> {
        if self.writer.is_empty() {
            self.reset();
            return Ok(Next::Read);
        }

        let stream = self.stream.as_mut().ok_or_else(|| io::Error::from(ErrorKind::NotConnected))?;
        match self.writer.write_to(stream)? {
            WriteStatus::Pending => Ok(Next::Write),
            WriteStatus::Done if self.keep_alive => {
                trace!(peer = %self.peer, sent = self.writer.bytes_sent(), "response sent, keep alive");
                self.reset();
                Ok(Next::Read)
            }
            WriteStatus::Done => {
                trace!(peer = %self.peer, sent = self.writer.bytes_sent(), "response sent, close");
                Ok(Next::Close)
            }
        }
    }

    /// Prepares for the next request on the same socket.
    fn reset(&mut self) {
        self.read_buf.clear();
        self.decoder.reset();
        self.writer.reset();
        self.keep_alive = false;
    }

    /// Releases the file view and buffers and hands out the socket for
    /// deregistration. Only the first call returns the socket.
    pub fn close(&mut self) -> Option<S> {
        self.reset();
        self.stream.take()
    }
}
