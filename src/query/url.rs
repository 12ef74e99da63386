//! URL sanitizing and decomposition.
//!
//! # Responsibilities
//! - Strip characters that are not URL-safe
//! - Split a raw URL into a relative request path and its query variables
//! - Merge caller-supplied variables over the URL's own query string

use url::{ParseError, Url};

use crate::query::value::{QueryMap, QueryValue};

const FRONT_CONTROLLER: &str = "index.php";

/// Characters kept by [`sanitize_url`] besides ASCII letters and digits.
const URL_SAFE_PUNCTUATION: &str = "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=";

/// A raw URL reduced to the parts the rule matcher works on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Path relative to the site root, without surrounding slashes and
    /// without a leading `index.php`.
    pub path: String,
    /// Query-string variables, with per-call variables merged on top.
    pub query: QueryMap,
}

/// Remove every character outside the URL-safe set.
///
/// Control characters, whitespace and non-ASCII text are dropped rather
/// than interpreted. An empty result means the input was not a usable URL.
pub fn sanitize_url(raw: &str) -> String {
    raw.chars().filter(|c| is_url_safe(*c)).collect()
}

fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || URL_SAFE_PUNCTUATION.contains(c)
}

/// Decompose an already sanitized URL.
///
/// Never fails: input that cannot be decomposed yields an empty path, which
/// is then handled by rule matching.
pub fn parse_url(url: &str, extra: &QueryMap) -> ParsedUrl {
    let (raw_path, raw_query) = split_components(url);

    let trimmed = raw_path.trim_matches('/');
    let without_front = trimmed.strip_prefix(FRONT_CONTROLLER).unwrap_or(trimmed);
    let path = without_front.trim_matches('/').to_string();

    let mut query = raw_query.map(QueryValue::parse_query).unwrap_or_default();
    for (key, value) in extra {
        query.insert(key.clone(), value.clone());
    }

    ParsedUrl { path, query }
}

/// Split `url` into its raw path and query text.
///
/// The path is cut from the input as written. `Url` only locates where the
/// scheme and authority end, so characters such as `{`, `"` or `\` and
/// dot segments reach rule matching unchanged.
fn split_components(url: &str) -> (&str, Option<&str>) {
    let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
    let (target, query) = match without_fragment.split_once('?') {
        Some((target, query)) => (target, Some(query)),
        None => (without_fragment, None),
    };
    (strip_origin(target), query)
}

/// Drop `scheme://authority` from an absolute URL; relative input is
/// returned as is.
fn strip_origin(target: &str) -> &str {
    let parsed = match Url::parse(target) {
        Ok(parsed) if parsed.has_host() => parsed,
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => return target,
        Err(e) => {
            tracing::debug!(url = target, error = %e, "URL could not be decomposed");
            return "";
        }
    };

    let after_scheme = target.get(parsed.scheme().len() + 1..).unwrap_or_default();
    let authority_and_path = after_scheme.strip_prefix("//").unwrap_or(after_scheme);
    authority_and_path
        .find('/')
        .map_or("", |slash| &authority_and_path[slash..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_url("about\r\n"), "about");
        assert_eq!(sanitize_url("caf\u{e9}/menu"), "caf/menu");
        assert_eq!(sanitize_url("a b"), "ab");
        assert_eq!(sanitize_url("   "), "");
        assert_eq!(sanitize_url("/tag/x?s=1&p[]=2"), "/tag/x?s=1&p[]=2");
    }

    #[test]
    fn test_relative_path_is_trimmed() {
        let parsed = parse_url("/blog/hello-world/", &QueryMap::new());
        assert_eq!(parsed.path, "blog/hello-world");
        assert!(parsed.query.is_empty());
    }

    #[test]
    fn test_absolute_url_keeps_path_and_query() {
        let parsed = parse_url("https://example.com/category/news/?paged=2", &QueryMap::new());
        assert_eq!(parsed.path, "category/news");
        assert_eq!(parsed.query.get("paged"), Some(&QueryValue::from("2")));
    }

    #[test]
    fn test_front_controller_is_stripped() {
        assert_eq!(parse_url("/index.php/about/", &QueryMap::new()).path, "about");
        assert_eq!(parse_url("index.php", &QueryMap::new()).path, "");
        assert_eq!(parse_url("http://example.com/index.php?p=4", &QueryMap::new()).path, "");
    }

    #[test]
    fn test_extra_vars_override_url_query() {
        let mut extra = QueryMap::new();
        extra.insert("paged".into(), QueryValue::from("9"));
        extra.insert("s".into(), QueryValue::from("term"));

        let parsed = parse_url("/news?paged=2&order=asc", &extra);
        assert_eq!(parsed.query.get("paged"), Some(&QueryValue::from("9")));
        assert_eq!(parsed.query.get("order"), Some(&QueryValue::from("asc")));
        assert_eq!(parsed.query.get("s"), Some(&QueryValue::from("term")));
    }

    #[test]
    fn test_path_text_is_kept_verbatim() {
        assert_eq!(parse_url("/tag/{rust}/", &QueryMap::new()).path, "tag/{rust}");
        let absolute = parse_url("https://example.com/tag/a\"b<c>/", &QueryMap::new());
        assert_eq!(absolute.path, "tag/a\"b<c>");
        assert_eq!(parse_url("/tag\\rust", &QueryMap::new()).path, "tag\\rust");
        assert_eq!(parse_url("/a/../b/./c", &QueryMap::new()).path, "a/../b/./c");
        assert_eq!(parse_url("/caf%C3%A9/", &QueryMap::new()).path, "caf%C3%A9");
    }

    #[test]
    fn test_query_ends_at_fragment() {
        let parsed = parse_url("/news?paged=2#comments", &QueryMap::new());
        assert_eq!(parsed.path, "news");
        assert_eq!(parsed.query.get("paged"), Some(&QueryValue::from("2")));

        let parsed = parse_url("/news#top?paged=2", &QueryMap::new());
        assert_eq!(parsed.path, "news");
        assert!(parsed.query.is_empty());
    }

    #[test]
    fn test_root_url_has_empty_path() {
        assert_eq!(parse_url("/", &QueryMap::new()).path, "");
        assert_eq!(parse_url("https://example.com", &QueryMap::new()).path, "");
    }
}
