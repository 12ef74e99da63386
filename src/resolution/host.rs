//! Resolver snapshots and the host that publishes them.
//!
//! # Responsibilities
//! - Build an immutable `ResolverSnapshot` (rules, registry, options) from config
//! - Publish the current snapshot and swap it atomically on reload
//! - Mint `ResolutionSession`s bound to the snapshot current at creation
//!
//! # Design Decisions
//! - Snapshots are shared via `Arc` and never mutated
//! - A reload never touches an existing session; only new sessions see it
//! - Sessions are minted per request and never shared between requests

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::ResolverConfig;
use crate::query::registry::QueryVarRegistry;
use crate::query::value::QueryMap;
use crate::resolution::hooks::{NoHooks, PageLookup, ResolverHooks, StaticPages};
use crate::resolution::session::ResolutionSession;
use crate::routing::rules::{RuleError, RuleTable};

/// Everything a resolution reads, frozen at one point in time.
#[derive(Debug, Clone)]
pub struct ResolverSnapshot {
    rules: RuleTable,
    registry: QueryVarRegistry,
    verbose_page_rules: bool,
    admin_segment: String,
    session_vars: QueryMap,
    pages: StaticPages,
}

impl ResolverSnapshot {
    pub fn new(rules: RuleTable, registry: QueryVarRegistry) -> Self {
        Self {
            rules,
            registry,
            verbose_page_rules: false,
            admin_segment: "wp-admin/".to_string(),
            session_vars: QueryMap::new(),
            pages: StaticPages::default(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self, RuleError> {
        let rules = RuleTable::from_config(&config.rewrite.rules)?;
        Ok(Self {
            rules,
            registry: QueryVarRegistry::from_config(config),
            verbose_page_rules: config.rewrite.verbose_page_rules,
            admin_segment: config.rewrite.admin_segment.clone(),
            session_vars: config.query_vars.extra.clone(),
            pages: StaticPages::new(&config.pages),
        })
    }

    pub fn with_verbose_page_rules(mut self, verbose: bool) -> Self {
        self.verbose_page_rules = verbose;
        self
    }

    pub fn with_admin_segment(mut self, segment: impl Into<String>) -> Self {
        self.admin_segment = segment.into();
        self
    }

    /// Variables applied to every resolution made from this snapshot.
    pub fn with_session_vars(mut self, vars: QueryMap) -> Self {
        self.session_vars = vars;
        self
    }

    pub fn with_pages(mut self, pages: StaticPages) -> Self {
        self.pages = pages;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn registry(&self) -> &QueryVarRegistry {
        &self.registry
    }

    pub fn verbose_page_rules(&self) -> bool {
        self.verbose_page_rules
    }

    pub fn admin_segment(&self) -> &str {
        &self.admin_segment
    }

    pub fn session_vars(&self) -> &QueryMap {
        &self.session_vars
    }

    pub fn pages(&self) -> &StaticPages {
        &self.pages
    }
}

/// Publishes the current snapshot and creates sessions from it.
pub struct ResolverHost {
    current: ArcSwap<ResolverSnapshot>,
    hooks: Arc<dyn ResolverHooks>,
    /// Overrides the snapshot's static page list when set.
    page_lookup: Option<Arc<dyn PageLookup>>,
}

impl ResolverHost {
    pub fn new(snapshot: ResolverSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
            hooks: Arc::new(NoHooks),
            page_lookup: None,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self, RuleError> {
        Ok(Self::new(ResolverSnapshot::from_config(config)?))
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ResolverHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_page_lookup(mut self, pages: Arc<dyn PageLookup>) -> Self {
        self.page_lookup = Some(pages);
        self
    }

    /// The snapshot new sessions will use.
    pub fn snapshot(&self) -> Arc<ResolverSnapshot> {
        self.current.load_full()
    }

    /// Replace the published snapshot.
    pub fn publish(&self, snapshot: ResolverSnapshot) {
        tracing::info!(rules = snapshot.rules().len(), "Publishing resolver snapshot");
        self.current.store(Arc::new(snapshot));
    }

    /// Rebuild the snapshot from `config` and publish it.
    ///
    /// On error the current snapshot stays in place.
    pub fn apply_config(&self, config: &ResolverConfig) -> Result<(), RuleError> {
        let snapshot = ResolverSnapshot::from_config(config)?;
        self.publish(snapshot);
        Ok(())
    }

    /// Start a resolution session on the current snapshot.
    pub fn session(&self) -> ResolutionSession {
        let snapshot = self.snapshot();
        let pages: Arc<dyn PageLookup> = match &self.page_lookup {
            Some(pages) => Arc::clone(pages),
            None => Arc::new(snapshot.pages().clone()),
        };
        ResolutionSession::new(snapshot, Arc::clone(&self.hooks), pages)
    }
}
