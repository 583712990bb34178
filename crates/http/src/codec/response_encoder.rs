//! HTTP response encoder module
//!
//! Formats the response head for an [`Outcome`] into a [`WriteBuffer`]. Canned
//! error pages are appended to the same buffer, while a resolved file is handed
//! back untouched so it can be sent as a second segment without being copied.

use tracing::error;

use crate::codec::header::{HeaderLine, WriteBuffer};
use crate::protocol::{Outcome, SendError};
use crate::resource::FileView;

#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes the response for `outcome` into `dst`.
    ///
    /// Returns the file view that has to follow the head on the wire, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::BufferOverflow`] if the head (or canned body) does
    /// not fit into `dst`. The connection can't answer in that case.
    pub fn encode(&self, outcome: Outcome, keep_alive: bool, dst: &mut WriteBuffer) -> Result<Option<FileView>, SendError> {
        let result = self.do_encode(outcome, keep_alive, dst);
        if let Err(e) = &result {
            error!(cause = %e, "can't format response");
            dst.clear();
        }
        result
    }

    fn do_encode(&self, outcome: Outcome, keep_alive: bool, dst: &mut WriteBuffer) -> Result<Option<FileView>, SendError> {
        dst.append(HeaderLine::Status(outcome.status()))?;

        match outcome {
            Outcome::Resolved(view) => {
                self.encode_headers(view.len() as u64, keep_alive, dst)?;
                Ok(Some(view))
            }
            outcome => {
                let content = outcome.canned_body().unwrap_or_default();
                self.encode_headers(content.len() as u64, keep_alive, dst)?;
                dst.append_content(content)?;
                Ok(None)
            }
        }
    }

    fn encode_headers(&self, content_length: u64, keep_alive: bool, dst: &mut WriteBuffer) -> Result<(), SendError> {
        dst.append(HeaderLine::ContentLength(content_length))?;
        dst.append(HeaderLine::ContentType(&mime::TEXT_HTML))?;
        dst.append(HeaderLine::Connection { keep_alive })?;
        dst.append(HeaderLine::Blank)
    }
}
