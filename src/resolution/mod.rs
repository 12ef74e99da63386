//! Resolution subsystem.
//!
//! # Data Flow
//! ```text
//! ResolverConfig
//!     → host.rs (ResolverSnapshot, published via ArcSwap)
//!     → session.rs (one per request, captures a snapshot)
//!     → record.rs (parse → match → expand → resolve, per fingerprint)
//!     → ResolutionOutcome
//! ```
//!
//! # Design Decisions
//! - Successful outcomes are memoized per session; failures are not
//! - Host behavior plugs in through `hooks.rs` traits
//! - Errors are values (`ResolveError`), never panics

pub mod error;
pub mod hooks;
pub mod host;
pub mod record;
pub mod session;

use crate::query::value::QueryMap;

pub use error::ResolveError;
pub use hooks::{NoHooks, PageLookup, ResolverHooks, StaticPages};
pub use host::{ResolverHost, ResolverSnapshot};
pub use record::ResolutionRecord;
pub use session::{fingerprint, ResolutionSession, SessionStats};

/// Query variables a URL resolved to.
pub type ResolvedQuery = QueryMap;

pub type ResolutionOutcome = Result<ResolvedQuery, ResolveError>;
