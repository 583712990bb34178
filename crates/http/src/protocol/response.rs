//! HTTP response classification.
//!
//! Every request ends in exactly one [`Outcome`], which decides the status line
//! and whether the response body is a canned html text or a mapped file.

use http::StatusCode;

use crate::resource::FileView;

const BAD_REQUEST_FORM: &str = "Your request has bad syntax or is inherently impossible to satisfy.\n";
const FORBIDDEN_FORM: &str = "You do not have permission to get file from this server.\n";
const NOT_FOUND_FORM: &str = "The requested file was not found on this server.\n";
const INTERNAL_ERROR_FORM: &str = "There was an unusual problem serving the requested file.\n";

/// The result of decoding and resolving one request.
#[derive(Debug)]
pub enum Outcome {
    /// The target maps to a readable regular file.
    Resolved(FileView),
    /// Protocol violation, or a directory target.
    Malformed,
    NotFound,
    Forbidden,
    /// The decoder reached a state it should never reach.
    InternalError,
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Resolved(_) => StatusCode::OK,
            Outcome::Malformed => StatusCode::BAD_REQUEST,
            Outcome::NotFound => StatusCode::NOT_FOUND,
            Outcome::Forbidden => StatusCode::FORBIDDEN,
            Outcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed html body sent for every non file outcome.
    pub fn canned_body(&self) -> Option<&'static str> {
        match self {
            Outcome::Resolved(_) => None,
            Outcome::Malformed => Some(BAD_REQUEST_FORM),
            Outcome::NotFound => Some(NOT_FOUND_FORM),
            Outcome::Forbidden => Some(FORBIDDEN_FORM),
            Outcome::InternalError => Some(INTERNAL_ERROR_FORM),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_uses_its_own_status() {
        assert_eq!(Outcome::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(Outcome::Forbidden.status().canonical_reason(), Some("Forbidden"));
    }

    #[test]
    fn only_resolved_has_no_canned_body() {
        assert!(Outcome::Resolved(FileView::empty()).canned_body().is_none());
        for outcome in [Outcome::Malformed, Outcome::NotFound, Outcome::Forbidden, Outcome::InternalError] {
            assert!(outcome.canned_body().is_some_and(|body| body.ends_with('\n')));
        }
    }
}
