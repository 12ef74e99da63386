//! Rewrite rule table.
//!
//! # Responsibilities
//! - Hold host-supplied `(pattern, template)` pairs in precedence order
//! - Compile each pattern once, anchored at the start of the path
//! - Locate the root rule used for the empty path

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::schema::RuleConfig;
use crate::routing::template;

/// Pattern of the rule that matches the empty path.
pub const ROOT_PATTERN: &str = "$";

/// A rewrite rule as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub template: String,
}

impl RewriteRule {
    pub fn new(pattern: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            template: template.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.pattern == ROOT_PATTERN
    }
}

impl From<&RuleConfig> for RewriteRule {
    fn from(config: &RuleConfig) -> Self {
        Self::new(config.pattern.clone(), config.template.clone())
    }
}

/// Errors raised while compiling a rule table.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {index} has an invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A rule with its compiled regex and pre-scanned template.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) rule: RewriteRule,
    pub(crate) regex: Regex,
    /// Capture index named by `pagename=$matches[N]`, if the template has one.
    pub(crate) page_capture: Option<usize>,
}

/// Ordered, immutable rewrite rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
    root: Option<usize>,
}

impl RuleTable {
    /// Compile `rules`, keeping their order.
    pub fn new(rules: Vec<RewriteRule>) -> Result<Self, RuleError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (index, rule) in rules.into_iter().enumerate() {
            let regex = compile_pattern(&rule.pattern).map_err(|source| RuleError::InvalidPattern {
                index,
                pattern: rule.pattern.clone(),
                source,
            })?;
            let page_capture = template::page_name_capture(&rule.template);
            compiled.push(CompiledRule {
                rule,
                regex,
                page_capture,
            });
        }

        let root = compiled.iter().position(|c| c.rule.is_root());
        Ok(Self {
            rules: compiled,
            root,
        })
    }

    pub fn from_config(rules: &[RuleConfig]) -> Result<Self, RuleError> {
        Self::new(rules.iter().map(RewriteRule::from).collect())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RewriteRule> {
        self.rules.get(index).map(|c| &c.rule)
    }

    /// Index of the root rule, if the table has one.
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn rules(&self) -> impl Iterator<Item = &RewriteRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub(crate) fn compiled(&self) -> &[CompiledRule] {
        &self.rules
    }
}

/// Compile a pattern anchored at the start, unanchored at the end.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^{pattern}"))
}
