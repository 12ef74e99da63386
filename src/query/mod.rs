//! Query-variable subsystem.
//!
//! # Data Flow
//! ```text
//! raw URL + per-call vars
//!     → url.rs (sanitize, split path / query string)
//!     → ParsedUrl { path, query }
//!
//! ParsedUrl + permalink vars (from routing)
//!     → resolver.rs (precedence merge, content-type / taxonomy passes)
//!     → registry.rs (whitelists: public, private, taxonomies, content types)
//!     → ResolvedQuery
//! ```
//!
//! # Design Decisions
//! - Values are strings or ordered string lists, never nested maps
//! - Maps are `BTreeMap` so fingerprints and output are deterministic
//! - Every pass is a total function; failures are reported, not raised

pub mod registry;
pub mod resolver;
pub mod url;
pub mod value;

pub use registry::QueryVarRegistry;
pub use resolver::VariableResolver;
pub use url::ParsedUrl;
pub use value::{QueryMap, QueryValue};
