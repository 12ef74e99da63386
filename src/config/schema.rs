//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the resolver.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::query::value::QueryMap;

/// Root configuration for the resolver.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResolverConfig {
    /// Rewrite rule table and matching options.
    pub rewrite: RewriteConfig,

    /// Recognized query variable names.
    pub query_vars: QueryVarsConfig,

    /// Registered taxonomies.
    pub taxonomies: Vec<TaxonomyConfig>,

    /// Registered content types.
    pub content_types: Vec<ContentTypeConfig>,

    /// Paths of existing pages, consulted by verbose page rules.
    pub pages: Vec<String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Rewrite rule table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Require `pagename=$matches[N]` rules to name an existing page.
    pub verbose_page_rules: bool,

    /// Path segment that marks the admin area.
    pub admin_segment: String,

    /// Rules in precedence order (first match wins).
    pub rules: Vec<RuleConfig>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            verbose_page_rules: false,
            admin_segment: "wp-admin/".to_string(),
            rules: Vec::new(),
        }
    }
}

/// A single rewrite rule.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleConfig {
    /// Regex matched against the request path, anchored at the start only.
    pub pattern: String,

    /// Query template, e.g. `index.php?pagename=$matches[1]`.
    pub template: String,
}

/// Query variable name lists.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryVarsConfig {
    /// Names a URL may set.
    pub public: Vec<String>,

    /// Names only a caller may set, through extra variables.
    pub private: Vec<String>,

    /// Variables applied to every resolution, ahead of anything in the URL.
    pub extra: QueryMap,
}

impl Default for QueryVarsConfig {
    fn default() -> Self {
        Self {
            public: to_strings(DEFAULT_PUBLIC_QUERY_VARS),
            private: to_strings(DEFAULT_PRIVATE_QUERY_VARS),
            extra: QueryMap::new(),
        }
    }
}

/// A registered taxonomy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TaxonomyConfig {
    /// Taxonomy identifier.
    pub taxonomy: String,

    /// Query variable carrying term slugs.
    pub query_var: String,
}

/// A registered content type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContentTypeConfig {
    /// Content type identifier, the value of `post_type`.
    pub post_type: String,

    /// Query variable whose value is a slug of this type.
    #[serde(default)]
    pub query_var: Option<String>,

    /// Whether `post_type` may name this type in a resolved query.
    #[serde(default = "default_publicly_queryable")]
    pub publicly_queryable: bool,
}

fn default_publicly_queryable() -> bool {
    true
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

const DEFAULT_PUBLIC_QUERY_VARS: &[&str] = &[
    "m", "p", "posts", "w", "cat", "withcomments", "withoutcomments", "s", "search", "exact",
    "sentence", "calendar", "page", "paged", "more", "tb", "pb", "author", "order", "orderby",
    "year", "monthnum", "day", "hour", "minute", "second", "name", "category_name", "tag", "feed",
    "author_name", "pagename", "page_id", "error", "attachment", "attachment_id", "subpost",
    "subpost_id", "preview", "robots", "favicon", "taxonomy", "term", "cpage", "post_type",
    "embed",
];

const DEFAULT_PRIVATE_QUERY_VARS: &[&str] = &[
    "offset", "posts_per_page", "posts_per_archive_page", "showposts", "nopaging", "post_type",
    "post_status", "category__in", "category__not_in", "category__and", "tag__in",
    "tag__not_in", "tag__and", "tag_slug__in", "tag_slug__and", "tag_id", "post_mime_type",
    "perm", "comments_per_page", "post__in", "post__not_in", "post_parent", "post_parent__in",
    "post_parent__not_in", "title", "fields",
];

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
