//! Rule matching logic.
//!
//! # Responsibilities
//! - Scan the rule table in order against a request path
//! - Short-circuit the empty path to the root rule
//! - Retry each rule against the URL-decoded path
//! - Skip verbose page rules whose page does not exist
//!
//! # Design Decisions
//! - First match wins; the table is never re-ordered
//! - A group that did not participate captures the empty string
//! - Rules whose pattern text starts with the path are matched against the
//!   path repeated twice (`feed` → `feed/feed`), which generated feed and
//!   endpoint rules rely on

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use regex::Captures;

use crate::resolution::hooks::PageLookup;
use crate::routing::rules::{CompiledRule, RuleTable};

/// Outcome of scanning the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Index of the matched rule in the table.
    pub matched: Option<usize>,
    /// Regex captures; index 0 is the whole match.
    pub captures: Vec<String>,
    /// True when the root rule matched the empty path.
    pub is_root: bool,
    /// Number of rules tried.
    pub rules_scanned: usize,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

/// Scans a [`RuleTable`] for the rule that applies to a path.
pub struct RuleMatcher<'a> {
    table: &'a RuleTable,
    verbose: bool,
    pages: &'a dyn PageLookup,
}

impl<'a> RuleMatcher<'a> {
    pub fn new(table: &'a RuleTable, verbose: bool, pages: &'a dyn PageLookup) -> Self {
        Self {
            table,
            verbose,
            pages,
        }
    }

    /// Find the first rule that matches `path`.
    pub fn find_match(&self, path: &str) -> MatchResult {
        if path.is_empty() {
            if let Some(root) = self.table.root() {
                return MatchResult {
                    matched: Some(root),
                    captures: vec![String::new()],
                    is_root: true,
                    rules_scanned: 0,
                };
            }
        }

        let mut rules_scanned = 0;
        for (index, rule) in self.table.compiled().iter().enumerate() {
            rules_scanned += 1;
            if let Some(captures) = self.try_rule(rule, path) {
                tracing::debug!(
                    rule = index,
                    pattern = %rule.rule.pattern,
                    path,
                    "Rewrite rule matched"
                );
                return MatchResult {
                    matched: Some(index),
                    captures,
                    is_root: false,
                    rules_scanned,
                };
            }
        }

        tracing::debug!(path, rules_scanned, "No rewrite rule matched");
        MatchResult {
            rules_scanned,
            ..MatchResult::default()
        }
    }

    fn try_rule(&self, rule: &CompiledRule, path: &str) -> Option<Vec<String>> {
        let target: Cow<'_, str> = if !path.is_empty() && rule.rule.pattern.starts_with(path) {
            Cow::Owned(format!("{path}/{path}"))
        } else {
            Cow::Borrowed(path)
        };

        let captures = match rule.regex.captures(&target) {
            Some(caps) => captures_to_vec(&caps),
            None => {
                let decoded = url_decode(&target);
                captures_to_vec(&rule.regex.captures(&decoded)?)
            }
        };

        if self.verbose {
            if let Some(index) = rule.page_capture {
                let exists = captures
                    .get(index)
                    .map(|slug| self.pages.page_exists(slug))
                    .unwrap_or(false);
                if !exists {
                    tracing::debug!(
                        pattern = %rule.rule.pattern,
                        "Verbose page rule skipped, page does not exist"
                    );
                    return None;
                }
            }
        }

        Some(captures)
    }
}

fn captures_to_vec(caps: &Captures<'_>) -> Vec<String> {
    caps.iter()
        .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect()
}

/// Form-style decode: `+` is a space, then `%XX` sequences are decoded.
pub fn url_decode(input: &str) -> String {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
