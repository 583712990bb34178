//! Core HTTP protocol types.
//!
//! - **Request** ([`request`]): [`RequestHeader`], the decoded request line and headers
//! - **Response** ([`response`]): [`Outcome`], the classification every request ends in
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: connection level failures, always fatal to the connection
//!   - [`ParseError`]: malformed requests, answered with a canned response
//!   - [`SendError`]: response formatting and sending errors

mod request;
pub use request::RequestHeader;

mod response;
pub use response::Outcome;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
