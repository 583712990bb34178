//! Request target resolution.
//!
//! - [`ResourceResolver`]: joins the document root and a target and classifies
//!   the result into an [`Outcome`](crate::protocol::Outcome)
//! - [`FileView`]: the zero-copy mapping of a resolved file

mod file_view;
mod resolver;

pub use file_view::FileView;
pub use resolver::ResourceResolver;
