//! Query variable resolution.
//!
//! # Responsibilities
//! - Merge session variables, URL query and permalink variables per public name
//! - Detect content-type slugs and set `post_type` / `name`
//! - Encode spaces in taxonomy terms as `+`
//! - Drop `post_type` values that are not publicly queryable
//! - Copy private variables supplied by the caller
//!
//! # Design Decisions
//! - Precedence: session extras > per-call extras > URL query > permalink
//!   (per-call extras are already merged over the URL query by the parser)
//! - A URL can never set a private variable; only caller-supplied maps can

use crate::query::registry::QueryVarRegistry;
use crate::query::url::ParsedUrl;
use crate::query::value::{QueryMap, QueryValue};
use crate::resolution::error::ResolveError;
use crate::resolution::hooks::ResolverHooks;

/// Everything gathered before variable resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub parsed: &'a ParsedUrl,
    /// `None` when the permalink variables were discarded (admin paths).
    pub permalink_vars: Option<&'a QueryMap>,
    /// Variables applied to every resolution of the session.
    pub session_vars: &'a QueryMap,
    /// Variables supplied with this call.
    pub call_vars: &'a QueryMap,
    /// A not-found condition survived the admin override.
    pub not_found: bool,
}

pub struct VariableResolver<'a> {
    registry: &'a QueryVarRegistry,
    hooks: &'a dyn ResolverHooks,
}

impl<'a> VariableResolver<'a> {
    pub fn new(registry: &'a QueryVarRegistry, hooks: &'a dyn ResolverHooks) -> Self {
        Self { registry, hooks }
    }

    pub fn resolve(&self, input: ResolveInput<'_>) -> Result<QueryMap, ResolveError> {
        let mut vars = self.merge_public(&input);
        self.encode_taxonomy_terms(&mut vars);
        self.filter_post_type(&mut vars);
        self.inject_private(&mut vars, input.call_vars);
        self.inject_private(&mut vars, input.session_vars);

        if input.not_found {
            return Err(ResolveError::NotFound);
        }
        Ok(self.hooks.filter_request(vars))
    }

    fn merge_public(&self, input: &ResolveInput<'_>) -> QueryMap {
        let public = self.hooks.filter_query_vars(self.registry.public_vars().to_vec());
        let mut vars = QueryMap::new();

        for name in &public {
            let value = input
                .session_vars
                .get(name)
                .or_else(|| input.parsed.query.get(name))
                .or_else(|| input.permalink_vars.and_then(|p| p.get(name)));

            let Some(value) = value else { continue };
            vars.insert(name.clone(), value.clone());

            if value.is_empty() {
                continue;
            }
            if let Some(post_type) = self.registry.content_type_for(name) {
                vars.insert("post_type".to_string(), QueryValue::from(post_type));
                vars.insert("name".to_string(), value.clone());
            }
        }
        vars
    }

    fn encode_taxonomy_terms(&self, vars: &mut QueryMap) {
        for query_var in self.registry.taxonomy_vars() {
            if let Some(value) = vars.get_mut(query_var) {
                *value = value.map_each(|term| term.replace(' ', "+"));
            }
        }
    }

    fn filter_post_type(&self, vars: &mut QueryMap) {
        let remove = match vars.get_mut("post_type") {
            None => return,
            Some(QueryValue::Single(post_type)) => {
                let queryable = self.registry.is_publicly_queryable(post_type);
                if !queryable {
                    tracing::debug!(post_type = %post_type, "Dropping non-queryable post_type");
                }
                !queryable
            }
            Some(QueryValue::Multi(types)) => {
                types.retain(|t| self.registry.is_publicly_queryable(t));
                false
            }
        };
        if remove {
            vars.remove("post_type");
        }
    }

    fn inject_private(&self, vars: &mut QueryMap, supplied: &QueryMap) {
        if supplied.is_empty() {
            return;
        }
        for name in self.registry.private_vars() {
            if let Some(value) = supplied.get(name) {
                vars.insert(name.clone(), value.clone());
            }
        }
    }
}
