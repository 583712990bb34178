//! Line scanning over the read buffer.
//!
//! Request lines and header fields are terminated by `CR LF`. The scanner walks
//! forward from the current scan position, and when it finds a terminator it
//! overwrites both bytes with `NUL` so the line before it can be addressed on
//! its own. Scanning is re-entrant: a `CR` that is the last received byte leaves
//! the scan position on the `CR`, so the next call after more bytes arrive sees
//! the terminator as a whole.

use std::ops::Range;

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const NUL: u8 = b'\0';

/// Result of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineStatus {
    /// A whole line was found, the range excludes its terminator.
    Complete(Range<usize>),
    /// No terminator yet, more bytes are needed.
    Incomplete,
    /// A bare `LF`, or a `CR` followed by something other than `LF`, at the given offset.
    Invalid(usize),
}

/// Scans `buf[scan_pos..]` for the end of the line starting at `line_start`.
///
/// Returns the status together with the new scan position, which is the byte
/// after the terminator for a complete line.
pub(crate) fn scan_line(buf: &mut [u8], line_start: usize, scan_pos: usize) -> (LineStatus, usize) {
    let mut pos = scan_pos;
    while pos < buf.len() {
        match buf[pos] {
            CR => {
                if pos + 1 == buf.len() {
                    return (LineStatus::Incomplete, pos);
                }
                if buf[pos + 1] == LF {
                    buf[pos] = NUL;
                    buf[pos + 1] = NUL;
                    return (LineStatus::Complete(line_start..pos), pos + 2);
                }
                return (LineStatus::Invalid(pos), pos);
            }
            LF => {
                if pos > line_start && buf[pos - 1] == CR {
                    buf[pos - 1] = NUL;
                    buf[pos] = NUL;
                    return (LineStatus::Complete(line_start..pos - 1), pos + 1);
                }
                return (LineStatus::Invalid(pos), pos);
            }
            _ => pos += 1,
        }
    }
    (LineStatus::Incomplete, pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_crlf_and_normalizes_it() {
        let mut buf = *b"Host: a\r\nrest";
        let (status, scan_pos) = scan_line(&mut buf, 0, 0);

        assert_eq!(status, LineStatus::Complete(0..7));
        assert_eq!(scan_pos, 9);
        assert_eq!(&buf[..9], b"Host: a\0\0");
    }

    #[test]
    fn trailing_cr_waits_for_more_bytes() {
        let mut buf = *b"GET / HTTP/1.1\r\n";
        let (status, scan_pos) = scan_line(&mut buf[..15], 0, 0);
        assert_eq!(status, LineStatus::Incomplete);
        assert_eq!(scan_pos, 14);

        let (status, scan_pos) = scan_line(&mut buf, 0, scan_pos);
        assert_eq!(status, LineStatus::Complete(0..14));
        assert_eq!(scan_pos, 16);
    }

    #[test]
    fn no_terminator_is_incomplete() {
        let mut buf = *b"GET / HTT";
        assert_eq!(scan_line(&mut buf, 0, 0), (LineStatus::Incomplete, 9));
        assert_eq!(scan_line(&mut [], 0, 0), (LineStatus::Incomplete, 0));
    }

    #[test]
    fn bare_lf_is_invalid() {
        let mut buf = *b"GET / HTTP/1.1\nHost: a\n";
        assert_eq!(scan_line(&mut buf, 0, 0).0, LineStatus::Invalid(14));
    }

    #[test]
    fn cr_without_lf_is_invalid() {
        let mut buf = *b"GET\r/ HTTP/1.1\r\n";
        assert_eq!(scan_line(&mut buf, 0, 0).0, LineStatus::Invalid(3));
    }

    #[test]
    fn empty_line_is_complete() {
        let mut buf = *b"A\r\n\r\n";
        let (status, scan_pos) = scan_line(&mut buf, 0, 0);
        assert_eq!(status, LineStatus::Complete(0..1));

        let (status, scan_pos) = scan_line(&mut buf, scan_pos, scan_pos);
        assert_eq!(status, LineStatus::Complete(3..3));
        assert_eq!(scan_pos, 5);
    }
}
