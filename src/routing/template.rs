//! Query template expansion.
//!
//! # Responsibilities
//! - Keep only the query-assignment part of a rule template
//! - Tokenize `$matches[N]` back-references and substitute captures
//! - Parse the expansion into permalink query variables
//! - Apply the admin-path override to a not-found result
//!
//! # Design Decisions
//! - Explicit tokenizer instead of a substitution regex, so escaping is
//!   applied in exactly one place
//! - Captures are form-urlencoded before substitution and decoded again by
//!   the query parser, so `&`, `=` and `+` inside a slug survive intact

use url::form_urlencoded;

use crate::query::value::{QueryMap, QueryValue};
use crate::routing::matcher::MatchResult;
use crate::routing::rules::RuleTable;

const BACKREF_OPEN: &str = "$matches[";
const PAGE_NAME_BACKREF: &str = "pagename=$matches[";

/// A piece of a tokenized template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    /// `$matches[N]`, N ≥ 1.
    Capture(usize),
}

/// The expanded template of a matched rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedQuery {
    /// Query string after substitution.
    pub matched_query: String,
    /// `matched_query` parsed into variables.
    pub vars: QueryMap,
}

/// Drop everything up to and including the last `?` (`index.php?` prefix).
pub fn query_portion(template: &str) -> &str {
    match template.rfind('?') {
        Some(pos) if pos > 0 => &template[pos + 1..],
        _ => template,
    }
}

/// Split a template into literal text and back-references.
///
/// Only `$matches[N]` with a positive index and no leading zero is a
/// back-reference; anything else stays literal.
pub fn tokenize(template: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find(BACKREF_OPEN) {
        let start = cursor + offset;
        match backref_at(template, start) {
            Some((index, end)) => {
                if literal_start < start {
                    tokens.push(Token::Literal(&template[literal_start..start]));
                }
                tokens.push(Token::Capture(index));
                cursor = end;
                literal_start = end;
            }
            None => cursor = start + 1,
        }
    }

    if literal_start < template.len() {
        tokens.push(Token::Literal(&template[literal_start..]));
    }
    tokens
}

/// Parse `$matches[N]` at byte `start`; returns the index and the end offset.
fn backref_at(template: &str, start: usize) -> Option<(usize, usize)> {
    let digits_start = start + BACKREF_OPEN.len();
    let digits_len = template[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    let close = digits_start + digits_len;
    if template.as_bytes().get(close) != Some(&b']') {
        return None;
    }
    let digits = &template[digits_start..close];
    if digits.is_empty() || digits.starts_with('0') {
        return None;
    }
    let index = digits.parse().ok()?;
    Some((index, close + 1))
}

/// Substitute captures into `template`, escaping each one.
///
/// A back-reference to a group that did not participate expands to nothing.
pub fn expand(template: &str, captures: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    for token in tokenize(template) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Capture(index) => {
                if let Some(capture) = captures.get(index) {
                    out.extend(form_urlencoded::byte_serialize(capture.as_bytes()));
                }
            }
        }
    }
    out
}

/// Capture index assigned to `pagename` by the template, if any.
pub fn page_name_capture(template: &str) -> Option<usize> {
    let start = template.find(PAGE_NAME_BACKREF)?;
    let digits_start = start + PAGE_NAME_BACKREF.len();
    let digits: String = template[digits_start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let close = digits_start + digits.len();
    if digits.is_empty() || template.as_bytes().get(close) != Some(&b']') {
        return None;
    }
    digits.parse().ok()
}

/// Expand the matched rule's template into permalink variables.
///
/// Returns `None` when no rule matched.
pub fn expand_match(table: &RuleTable, result: &MatchResult) -> Option<ExpandedQuery> {
    let rule = table.get(result.matched?)?;
    let matched_query = expand(query_portion(&rule.template), &result.captures);
    let vars = QueryValue::parse_query(&matched_query);
    Some(ExpandedQuery {
        matched_query,
        vars,
    })
}

/// True when `path` points into the admin area.
pub fn is_admin_path(path: &str, admin_segment: &str) -> bool {
    !admin_segment.is_empty() && path.contains(admin_segment)
}

/// Clear a not-found result for the empty path and for admin paths, and
/// discard permalink variables for admin paths.
pub fn apply_admin_override(
    path: &str,
    admin_segment: &str,
    not_found: &mut bool,
    permalink_vars: &mut Option<QueryMap>,
) {
    let admin = is_admin_path(path, admin_segment);
    if path.is_empty() || admin {
        *not_found = false;
    }
    if admin {
        *permalink_vars = None;
    }
}
