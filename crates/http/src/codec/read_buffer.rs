//! Fixed capacity read buffer with a bounds-checked cursor.
//!
//! The buffer tracks three positions, and every method keeps
//! `line_start <= scan_pos <= read_end <= capacity`:
//!
//! - `read_end`: bytes received from the socket so far
//! - `scan_pos`: bytes already classified into lines
//! - `line_start`: start of the line currently being interpreted

use std::ops::Range;

use crate::codec::line::{scan_line, LineStatus};

#[derive(Debug)]
pub struct ReadBuffer {
    buf: Box<[u8]>,
    read_end: usize,
    scan_pos: usize,
    line_start: usize,
}

impl ReadBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: vec![0; capacity].into_boxed_slice(), read_end: 0, scan_pos: 0, line_start: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes received so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.read_end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read_end == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.read_end == self.buf.len()
    }

    #[inline]
    pub fn scan_pos(&self) -> usize {
        self.scan_pos
    }

    #[inline]
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    /// The received bytes, with already scanned line terminators replaced by `NUL`.
    #[inline]
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.read_end]
    }

    /// The free tail of the buffer, to be filled by a socket read.
    #[inline]
    pub fn unfilled_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.read_end..]
    }

    /// Marks `n` bytes of the free tail as received.
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.buf.len() - self.read_end, "advance {n} past capacity {}", self.buf.len());
        self.read_end += n;
    }

    /// Appends as much of `bytes` as fits, returning the number of bytes copied.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.buf.len() - self.read_end);
        self.unfilled_mut()[..n].copy_from_slice(&bytes[..n]);
        self.advance(n);
        n
    }

    /// Scans for the next line. On completion the next line starts right after
    /// the terminator.
    pub fn next_line(&mut self) -> LineStatus {
        let (status, scan_pos) = scan_line(&mut self.buf[..self.read_end], self.line_start, self.scan_pos);
        debug_assert!(scan_pos >= self.scan_pos && scan_pos <= self.read_end);
        self.scan_pos = scan_pos;
        if matches!(status, LineStatus::Complete(_)) {
            self.line_start = scan_pos;
        }
        status
    }

    /// Bytes received after the start of the current line.
    #[inline]
    pub fn pending(&self) -> usize {
        self.read_end - self.line_start
    }

    /// Claims the next `len` bytes after the current line start as an opaque
    /// block, returning their range.
    pub fn consume(&mut self, len: usize) -> Range<usize> {
        assert!(len <= self.pending(), "consume {len} with only {} bytes pending", self.pending());
        let range = self.line_start..self.line_start + len;
        self.line_start = range.end;
        self.scan_pos = range.end;
        range
    }

    #[inline]
    pub fn slice(&self, range: Range<usize>) -> &[u8] {
        &self.filled()[range]
    }

    /// Forgets every received byte, the buffer keeps its capacity.
    pub fn clear(&mut self) {
        self.read_end = 0;
        self.scan_pos = 0;
        self.line_start = 0;
    }
}
