use std::io;
use std::io::{IoSlice, Write};

use tracing::trace;

use crate::codec::{ResponseEncoder, WriteBuffer};
use crate::protocol::{Outcome, SendError};
use crate::resource::FileView;

/// Progress of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Every byte of the response was accepted.
    Done,
    /// The socket is full, resume once it is writable again.
    Pending,
}

/// A response as a two segment write plan: the formatted head, then an
/// optional file view.
///
/// Progress is kept as a single `bytes_sent` counter, both segment offsets are
/// derived from it, so a resumed send never re-formats, drops or repeats bytes.
#[derive(Debug)]
pub struct MessageWriter {
    header: WriteBuffer,
    body: Option<FileView>,
    bytes_sent: usize,
    bytes_pending: usize,
    encoder: ResponseEncoder,
}

impl MessageWriter {
    pub fn with_capacity(buffer_size: usize) -> Self {
        Self { header: WriteBuffer::with_capacity(buffer_size), body: None, bytes_sent: 0, bytes_pending: 0, encoder: ResponseEncoder::new() }
    }

    /// Builds the write plan for `outcome`, replacing any previous one.
    pub fn prepare(&mut self, outcome: Outcome, keep_alive: bool) -> Result<(), SendError> {
        self.reset();
        let body = self.encoder.encode(outcome, keep_alive, &mut self.header)?;
        self.bytes_pending = self.header.len() + body.as_ref().map_or(0, FileView::len);
        self.body = body;
        trace!(header = self.header.len(), pending = self.bytes_pending, "response prepared");
        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes_pending == 0
    }

    #[inline]
    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent
    }

    #[inline]
    pub fn bytes_pending(&self) -> usize {
        self.bytes_pending
    }

    #[inline]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// The unsent remainder of both segments.
    fn segments(&self) -> (&[u8], &[u8]) {
        let header = self.header.as_bytes();
        let body = self.body.as_ref().map_or(&[][..], FileView::as_bytes);
        let header_rest = &header[self.bytes_sent.min(header.len())..];
        let body_rest = &body[self.bytes_sent.saturating_sub(header.len())..];
        (header_rest, body_rest)
    }

    /// Sends as much of the plan as `writer` accepts with scatter-gather writes.
    ///
    /// The file view is released as soon as the whole plan was sent.
    ///
    /// # Errors
    ///
    /// Any write error other than `WouldBlock` / `Interrupted`, or a write that
    /// accepts zero bytes.
    pub fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<WriteStatus, SendError> {
        while self.bytes_pending > 0 {
            let result = {
                let (header, body) = self.segments();
                writer.write_vectored(&[IoSlice::new(header), IoSlice::new(body)])
            };

            match result {
                Ok(0) => return Err(SendError::WriteZero { pending: self.bytes_pending }),
                Ok(n) => self.advance(n),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    trace!(sent = self.bytes_sent, pending = self.bytes_pending, "socket full, wait for writable");
                    return Ok(WriteStatus::Pending);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(SendError::io(e)),
            }
        }

        self.body = None;
        Ok(WriteStatus::Done)
    }

    fn advance(&mut self, n: usize) {
        assert!(n <= self.bytes_pending, "writer accepted {n} bytes with only {} pending", self.bytes_pending);
        self.bytes_sent += n;
        self.bytes_pending -= n;
    }

    /// Drops the plan and releases the file view.
    pub fn reset(&mut self) {
        self.header.clear();
        self.body = None;
        self.bytes_sent = 0;
        self.bytes_pending = 0;
    }
}
