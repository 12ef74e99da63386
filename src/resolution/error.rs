//! Resolution failures.

use serde::Serialize;
use thiserror::Error;

/// Why a URL did not resolve to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveError {
    /// The URL was empty after sanitizing.
    #[error("bad url: input is empty or contains no URL-safe characters")]
    BadUrl,

    /// No rewrite rule matched and the path is not an admin path.
    #[error("not found: no rewrite rule matched the request path")]
    NotFound,

    /// A result accessor was called before resolution completed.
    #[error("not resolved: the url has not been resolved yet")]
    NotResolved,
}

impl ResolveError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::BadUrl => "bad_url",
            ResolveError::NotFound => "not_found",
            ResolveError::NotResolved => "not_resolved",
        }
    }
}
