//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use permalink_resolver::config::{ContentTypeConfig, RuleConfig, TaxonomyConfig};
use permalink_resolver::resolution::{PageLookup, StaticPages};
use permalink_resolver::{QueryMap, QueryValue, ResolverConfig, ResolverHost};

/// Default registries with the given rule table.
pub fn config(rules: &[(&str, &str)]) -> ResolverConfig {
    let mut config = ResolverConfig::default();
    config.rewrite.rules = rules
        .iter()
        .map(|(pattern, template)| RuleConfig {
            pattern: pattern.to_string(),
            template: template.to_string(),
        })
        .collect();
    config
}

/// One literal `about` rule, `pagename` as the only public variable, and
/// `pagename` registered as the query variable of the `page` type.
pub fn about_config() -> ResolverConfig {
    let mut config = config(&[("^about/?$", "pagename=about")]);
    config.query_vars.public = vec!["pagename".into()];
    config.content_types = vec![content_type("page", Some("pagename"), true)];
    config
}

/// A small table shaped like a generated blog rule set.
pub fn blog_rules() -> Vec<(&'static str, &'static str)> {
    vec![
        ("feed/(feed|rdf|rss|rss2|atom)/?$", "index.php?&feed=$matches[1]"),
        (
            "category/(.+?)/page/?([0-9]{1,})/?$",
            "index.php?category_name=$matches[1]&paged=$matches[2]",
        ),
        ("category/(.+?)/?$", "index.php?category_name=$matches[1]"),
        ("tag/([^/]+)/?$", "index.php?tag=$matches[1]"),
        ("genre/([^/]+)/?$", "index.php?genre=$matches[1]"),
        ("books/([^/]+)/?$", "index.php?book=$matches[1]"),
        ("page/?([0-9]{1,})/?$", "index.php?&paged=$matches[1]"),
        (
            "([0-9]{4})/([0-9]{1,2})/([^/]+)/?$",
            "index.php?year=$matches[1]&monthnum=$matches[2]&name=$matches[3]",
        ),
        ("$", "index.php"),
    ]
}

pub fn blog_config() -> ResolverConfig {
    let mut config = config(&blog_rules());
    config.query_vars.public.push("genre".into());
    config.query_vars.public.push("book".into());
    config.taxonomies = vec![TaxonomyConfig {
        taxonomy: "genre".into(),
        query_var: "genre".into(),
    }];
    config.content_types = vec![
        content_type("post", None, true),
        content_type("page", Some("pagename"), true),
        content_type("book", Some("book"), false),
    ];
    config
}

pub fn content_type(
    post_type: &str,
    query_var: Option<&str>,
    publicly_queryable: bool,
) -> ContentTypeConfig {
    ContentTypeConfig {
        post_type: post_type.into(),
        query_var: query_var.map(Into::into),
        publicly_queryable,
    }
}

pub fn host(config: &ResolverConfig) -> ResolverHost {
    ResolverHost::from_config(config).unwrap()
}

pub fn vars(pairs: &[(&str, &str)]) -> QueryMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), QueryValue::from(*v)))
        .collect()
}

/// Page lookup that counts how often it is asked.
pub struct CountingPages {
    pages: StaticPages,
    lookups: AtomicUsize,
}

impl CountingPages {
    pub fn new(paths: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            pages: StaticPages::new(paths),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl PageLookup for CountingPages {
    fn page_exists(&self, path: &str) -> bool {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.pages.page_exists(path)
    }
}
