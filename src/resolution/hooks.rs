//! Host extension points.
//!
//! # Responsibilities
//! - `ResolverHooks`: adjust the public variable list (`query_vars`) and the
//!   final resolved map (`request`)
//! - `PageLookup`: answer whether a page exists at a path, for verbose page
//!   rules
//!
//! # Design Decisions
//! - Hooks are traits with identity defaults; hosts override only what they use
//! - Both traits are `Send + Sync` so a host can share one instance across
//!   sessions via `Arc`

use std::collections::HashSet;

use crate::query::value::QueryMap;
use crate::routing::matcher::url_decode;

/// Filters applied around variable resolution.
pub trait ResolverHooks: Send + Sync {
    /// Adjust the public query variable names before resolution.
    fn filter_query_vars(&self, vars: Vec<String>) -> Vec<String> {
        vars
    }

    /// Transform the resolved variables before they are returned.
    fn filter_request(&self, query: QueryMap) -> QueryMap {
        query
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ResolverHooks for NoHooks {}

/// Page existence by path.
pub trait PageLookup: Send + Sync {
    fn page_exists(&self, path: &str) -> bool;
}

/// A fixed set of page paths.
///
/// Paths are compared URL-decoded and without surrounding slashes, so
/// `/about/team/` and `about%2Fteam` name the same page.
#[derive(Debug, Clone, Default)]
pub struct StaticPages {
    paths: HashSet<String>,
}

impl StaticPages {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: paths
                .into_iter()
                .map(|p| normalize_page_path(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl PageLookup for StaticPages {
    fn page_exists(&self, path: &str) -> bool {
        self.paths.contains(&normalize_page_path(path))
    }
}

fn normalize_page_path(path: &str) -> String {
    url_decode(path).trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pages_normalize() {
        let pages = StaticPages::new(["/about/team/", "contact", ""]);
        assert_eq!(pages.len(), 2);
        assert!(pages.page_exists("about/team"));
        assert!(pages.page_exists("about%2Fteam"));
        assert!(pages.page_exists("/contact/"));
        assert!(!pages.page_exists(""));
        assert!(!pages.page_exists("about"));
    }

    #[test]
    fn test_no_hooks_is_identity() {
        let hooks = NoHooks;
        let vars = vec!["p".to_string()];
        assert_eq!(hooks.filter_query_vars(vars.clone()), vars);
        assert!(hooks.filter_request(QueryMap::new()).is_empty());
    }
}
