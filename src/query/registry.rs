//! Query variable registry.
//!
//! Read-only snapshot of the names a resolved query may carry: public and
//! private query variables, taxonomy query variables, and content-type query
//! variables with their publicly-queryable flag.

use std::collections::{HashMap, HashSet};

use crate::config::schema::{ContentTypeConfig, ResolverConfig, TaxonomyConfig};

#[derive(Debug, Clone, Default)]
pub struct QueryVarRegistry {
    public: Vec<String>,
    private: Vec<String>,
    taxonomy_vars: Vec<String>,
    /// query var → content type
    content_type_vars: HashMap<String, String>,
    queryable_types: HashSet<String>,
}

impl QueryVarRegistry {
    pub fn new(
        public: Vec<String>,
        private: Vec<String>,
        taxonomies: &[TaxonomyConfig],
        content_types: &[ContentTypeConfig],
    ) -> Self {
        let taxonomy_vars = taxonomies
            .iter()
            .filter(|t| !t.query_var.is_empty())
            .map(|t| t.query_var.clone())
            .collect();

        let mut content_type_vars = HashMap::new();
        for content_type in content_types {
            if let Some(var) = content_type.query_var.as_deref().filter(|v| !v.is_empty()) {
                content_type_vars.insert(var.to_string(), content_type.post_type.clone());
            }
        }

        let queryable_types = content_types
            .iter()
            .filter(|t| t.publicly_queryable)
            .map(|t| t.post_type.clone())
            .collect();

        Self {
            public,
            private,
            taxonomy_vars,
            content_type_vars,
            queryable_types,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(
            config.query_vars.public.clone(),
            config.query_vars.private.clone(),
            &config.taxonomies,
            &config.content_types,
        )
    }

    /// Public query variable names, in registration order.
    pub fn public_vars(&self) -> &[String] {
        &self.public
    }

    pub fn private_vars(&self) -> &[String] {
        &self.private
    }

    pub fn taxonomy_vars(&self) -> &[String] {
        &self.taxonomy_vars
    }

    /// Content type whose slug is carried by `query_var`, if any.
    pub fn content_type_for(&self, query_var: &str) -> Option<&str> {
        self.content_type_vars.get(query_var).map(String::as_str)
    }

    pub fn is_publicly_queryable(&self, post_type: &str) -> bool {
        self.queryable_types.contains(post_type)
    }
}
