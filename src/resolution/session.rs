//! Per-session resolution cache.
//!
//! # Responsibilities
//! - Reject URLs that sanitize to nothing
//! - Memoize successful resolutions by fingerprint
//! - Re-run the pipeline for inputs that previously failed
//!
//! # Design Decisions
//! - The fingerprint is a SHA-256 over the sanitized URL and per-call extras,
//!   so the same URL with different extras resolves independently
//! - A session is owned by one caller (`&mut self`); sharing happens one level
//!   up, in `ResolverHost`
//!
//! # Data Flow
//! ```text
//! resolve_url(url, extra)
//!     → sanitize_url → fingerprint
//!     → resolved record? return cached vars
//!     → otherwise ResolutionRecord::run (parse → match → expand → resolve)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::observability::metrics;
use crate::query::url::sanitize_url;
use crate::query::value::QueryMap;
use crate::resolution::error::ResolveError;
use crate::resolution::hooks::{PageLookup, ResolverHooks};
use crate::resolution::host::ResolverSnapshot;
use crate::resolution::record::{Pipeline, ResolutionRecord};
use crate::resolution::ResolutionOutcome;

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Lookups answered from a resolved record.
    pub hits: u64,
    /// Lookups that ran the pipeline.
    pub misses: u64,
    /// Rewrite rules tried across all pipeline runs.
    pub rules_scanned: u64,
}

pub struct ResolutionSession {
    id: Uuid,
    snapshot: Arc<ResolverSnapshot>,
    hooks: Arc<dyn ResolverHooks>,
    pages: Arc<dyn PageLookup>,
    records: HashMap<String, ResolutionRecord>,
    stats: SessionStats,
}

impl ResolutionSession {
    pub fn new(
        snapshot: Arc<ResolverSnapshot>,
        hooks: Arc<dyn ResolverHooks>,
        pages: Arc<dyn PageLookup>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            snapshot,
            hooks,
            pages,
            records: HashMap::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> &Arc<ResolverSnapshot> {
        &self.snapshot
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Resolve `url` into query variables.
    ///
    /// `extra` overrides values from the URL's own query string and may set
    /// private variables.
    pub fn resolve_url(&mut self, url: &str, extra: &QueryMap) -> ResolutionOutcome {
        let span = tracing::debug_span!("resolve_url", session_id = %self.id, url);
        let _enter = span.enter();

        let sanitized = sanitize_url(url);
        if sanitized.is_empty() {
            tracing::warn!(url, "Rejected URL with no usable characters");
            let outcome = Err(ResolveError::BadUrl);
            metrics::record_resolution(&outcome);
            return outcome;
        }

        let key = fingerprint(&sanitized, extra);
        if let Some(record) = self.records.get(&key) {
            if record.is_resolved() {
                self.stats.hits += 1;
                metrics::record_cache(true);
                let outcome = record.query_vars().cloned();
                metrics::record_resolution(&outcome);
                return outcome;
            }
        }

        self.stats.misses += 1;
        metrics::record_cache(false);

        let pipeline = Pipeline {
            snapshot: &self.snapshot,
            hooks: self.hooks.as_ref(),
            pages: self.pages.as_ref(),
        };
        let record = self.records.entry(key).or_default();
        let outcome = record.run(&sanitized, extra, &pipeline);

        let scanned = record.rules_scanned();
        self.stats.rules_scanned += scanned as u64;
        metrics::record_rules_scanned(scanned);
        metrics::record_resolution(&outcome);

        match &outcome {
            Ok(vars) => {
                tracing::debug!(request = record.request(), vars = vars.len(), "URL resolved")
            }
            Err(e) => {
                tracing::debug!(request = record.request(), error = %e, "URL not resolved")
            }
        }
        outcome
    }

    /// The record kept for `url` and `extra`, if it was ever resolved in
    /// this session.
    pub fn record(&self, url: &str, extra: &QueryMap) -> Option<&ResolutionRecord> {
        let sanitized = sanitize_url(url);
        if sanitized.is_empty() {
            return None;
        }
        self.records.get(&fingerprint(&sanitized, extra))
    }

    /// Drop every memoized record.
    pub fn invalidate(&mut self) {
        tracing::debug!(
            session_id = %self.id,
            records = self.records.len(),
            "Session cache invalidated"
        );
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cache key for a sanitized URL and its per-call extras.
pub fn fingerprint(url: &str, extra: &QueryMap) -> String {
    let encoded =
        serde_json::to_string(&(url, extra)).unwrap_or_else(|_| format!("{url}{extra:?}"));
    let digest = Sha256::digest(encoded.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}
