//! Per-input resolution record.
//!
//! One record exists per fingerprint in a session. It runs the pipeline
//! (parse → match → expand → resolve) and keeps the intermediate results so
//! callers can inspect which rule matched and what it produced.

use crate::query::resolver::{ResolveInput, VariableResolver};
use crate::query::url::parse_url;
use crate::query::value::QueryMap;
use crate::resolution::error::ResolveError;
use crate::resolution::hooks::{PageLookup, ResolverHooks};
use crate::resolution::host::ResolverSnapshot;
use crate::resolution::ResolutionOutcome;
use crate::routing::matcher::RuleMatcher;
use crate::routing::rules::RewriteRule;
use crate::routing::template::{apply_admin_override, expand_match};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RecordState {
    #[default]
    Pending,
    Resolved,
    Failed(ResolveError),
}

/// Collaborators a record needs to run.
pub(crate) struct Pipeline<'a> {
    pub(crate) snapshot: &'a ResolverSnapshot,
    pub(crate) hooks: &'a dyn ResolverHooks,
    pub(crate) pages: &'a dyn PageLookup,
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionRecord {
    request: String,
    matched_rule: Option<RewriteRule>,
    matched_query: String,
    permalink_vars: Option<QueryMap>,
    query_vars: QueryMap,
    rules_scanned: usize,
    state: RecordState,
}

impl ResolutionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full pipeline for a sanitized URL.
    pub(crate) fn run(
        &mut self,
        url: &str,
        extra: &QueryMap,
        pipeline: &Pipeline<'_>,
    ) -> ResolutionOutcome {
        *self = Self::new();
        let snapshot = pipeline.snapshot;

        let parsed = parse_url(url, extra);
        self.request = parsed.path.clone();
        self.permalink_vars = Some(QueryMap::new());

        let mut not_found = false;
        let rules = snapshot.rules();
        if !rules.is_empty() {
            let matcher = RuleMatcher::new(rules, snapshot.verbose_page_rules(), pipeline.pages);
            let result = matcher.find_match(&parsed.path);
            self.rules_scanned = result.rules_scanned;

            match expand_match(rules, &result) {
                Some(expanded) => {
                    self.matched_rule = result.matched.and_then(|i| rules.get(i)).cloned();
                    self.matched_query = expanded.matched_query;
                    self.permalink_vars = Some(expanded.vars);
                }
                None => not_found = true,
            }

            apply_admin_override(
                &parsed.path,
                snapshot.admin_segment(),
                &mut not_found,
                &mut self.permalink_vars,
            );
        }

        let resolver = VariableResolver::new(snapshot.registry(), pipeline.hooks);
        let outcome = resolver.resolve(ResolveInput {
            parsed: &parsed,
            permalink_vars: self.permalink_vars.as_ref(),
            session_vars: snapshot.session_vars(),
            call_vars: extra,
            not_found,
        });

        match &outcome {
            Ok(vars) => {
                self.query_vars = vars.clone();
                self.state = RecordState::Resolved;
            }
            Err(e) => self.state = RecordState::Failed(*e),
        }
        outcome
    }

    /// Request path the URL was reduced to.
    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn is_resolved(&self) -> bool {
        self.state == RecordState::Resolved
    }

    /// The failure of the last run, if it failed.
    pub fn error(&self) -> Option<ResolveError> {
        match self.state {
            RecordState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn rules_scanned(&self) -> usize {
        self.rules_scanned
    }

    /// Resolved query variables.
    pub fn query_vars(&self) -> Result<&QueryMap, ResolveError> {
        self.ensure_resolved()?;
        Ok(&self.query_vars)
    }

    /// Rule that matched, `None` when the path resolved without one.
    pub fn matched_rule(&self) -> Result<Option<&RewriteRule>, ResolveError> {
        self.ensure_resolved()?;
        Ok(self.matched_rule.as_ref())
    }

    /// Query string produced by the matched rule's template.
    pub fn matched_query(&self) -> Result<&str, ResolveError> {
        self.ensure_resolved()?;
        Ok(&self.matched_query)
    }

    /// Variables parsed from the matched query; `None` for admin paths.
    pub fn permalink_vars(&self) -> Result<Option<&QueryMap>, ResolveError> {
        self.ensure_resolved()?;
        Ok(self.permalink_vars.as_ref())
    }

    fn ensure_resolved(&self) -> Result<(), ResolveError> {
        if self.is_resolved() {
            Ok(())
        } else {
            Err(ResolveError::NotResolved)
        }
    }
}
