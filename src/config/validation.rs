//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every rewrite pattern compiles and appears once
//! - Reject empty names in the query variable registries
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ResolverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;

use thiserror::Error;

use crate::config::schema::ResolverConfig;
use crate::routing::rules::compile_pattern;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rewrite rule {index} has an empty pattern")]
    EmptyPattern { index: usize },

    #[error("rewrite rule {index} pattern `{pattern}` is not a valid regex: {message}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        message: String,
    },

    #[error("rewrite rule {index} repeats pattern `{pattern}` (first at rule {first})")]
    DuplicatePattern {
        index: usize,
        first: usize,
        pattern: String,
    },

    #[error("{list} query variable {index} is empty")]
    EmptyQueryVar { list: &'static str, index: usize },

    #[error("content type {index} has an empty post_type")]
    EmptyPostType { index: usize },

    #[error("taxonomy {index} has an empty name")]
    EmptyTaxonomy { index: usize },

    #[error("rewrite.admin_segment must not be empty")]
    EmptyAdminSegment,
}

pub fn validate_config(config: &ResolverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_rules(config, &mut errors);

    if config.rewrite.admin_segment.is_empty() {
        errors.push(ValidationError::EmptyAdminSegment);
    }

    for (list, names) in [
        ("public", &config.query_vars.public),
        ("private", &config.query_vars.private),
    ] {
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                errors.push(ValidationError::EmptyQueryVar { list, index });
            }
        }
    }

    for (index, taxonomy) in config.taxonomies.iter().enumerate() {
        if taxonomy.taxonomy.trim().is_empty() {
            errors.push(ValidationError::EmptyTaxonomy { index });
        }
    }

    for (index, content_type) in config.content_types.iter().enumerate() {
        if content_type.post_type.trim().is_empty() {
            errors.push(ValidationError::EmptyPostType { index });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rules(config: &ResolverConfig, errors: &mut Vec<ValidationError>) {
    let mut seen = HashMap::new();

    for (index, rule) in config.rewrite.rules.iter().enumerate() {
        if rule.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern { index });
            continue;
        }

        if let Some(&first) = seen.get(rule.pattern.as_str()) {
            errors.push(ValidationError::DuplicatePattern {
                index,
                first,
                pattern: rule.pattern.clone(),
            });
            continue;
        }
        seen.insert(rule.pattern.as_str(), index);

        if let Err(e) = compile_pattern(&rule.pattern) {
            errors.push(ValidationError::InvalidPattern {
                index,
                pattern: rule.pattern.clone(),
                message: e.to_string(),
            });
        }
    }
}
