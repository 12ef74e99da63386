//! Permalink resolver library.
//!
//! Turns a request URL into the query variables a content query layer
//! understands, by matching it against an ordered table of rewrite rules and
//! filtering the result through the host's query-variable registries.

pub mod config;
pub mod observability;
pub mod query;
pub mod resolution;
pub mod routing;

pub use config::schema::ResolverConfig;
pub use query::value::{QueryMap, QueryValue};
pub use resolution::{
    PageLookup, ResolutionOutcome, ResolutionSession, ResolveError, ResolvedQuery,
    ResolverHooks, ResolverHost, ResolverSnapshot,
};
pub use routing::rules::{RewriteRule, RuleTable};
