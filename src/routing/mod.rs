//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path (normalized by query::url)
//!     → matcher.rs (ordered scan of the rule table)
//!     → Return: MatchResult (rule index + captures) or no match
//!
//! MatchResult
//!     → template.rs (expand `$matches[N]` into the rule's query template)
//!     → permalink query variables
//!
//! Rule Compilation (at snapshot build):
//!     RuleConfig[]
//!     → Compile regexes (anchored at start)
//!     → Freeze as immutable RuleTable
//! ```
//!
//! # Design Decisions
//! - Rules compiled once per snapshot, immutable afterwards
//! - Table order is precedence; it is never re-sorted
//! - First match wins, with the root rule as the only shortcut
//! - Deterministic: same path and table always yield the same match

pub mod matcher;
pub mod rules;
pub mod template;

pub use matcher::{MatchResult, RuleMatcher};
pub use rules::{RewriteRule, RuleError, RuleTable};
