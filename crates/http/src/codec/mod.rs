//! HTTP codec module for decoding requests and encoding responses
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`ReadBuffer`]: fixed capacity buffer with a bounds-checked line cursor
//!   - [`LineStatus`]: result of scanning for the next `CR LF` terminated line
//!   - [`RequestDecoder`]: resumable request-line / header / body state machine
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: formats the response head for an outcome
//!   - [`WriteBuffer`] and [`HeaderLine`]: bounded, never truncating formatting

mod header;
mod line;
mod read_buffer;
mod request_decoder;
mod response_encoder;

pub use header::{HeaderLine, WriteBuffer};
pub use line::LineStatus;
pub use read_buffer::ReadBuffer;
pub use request_decoder::{Phase, RequestDecoder};
pub use response_encoder::ResponseEncoder;
