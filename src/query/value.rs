//! Query variable values and query-string decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

/// A query variable value: a single string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

/// Query variables keyed by name.
pub type QueryMap = BTreeMap<String, QueryValue>;

impl QueryValue {
    /// True for an empty string or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::Single(value) => value.is_empty(),
            QueryValue::Multi(values) => values.is_empty(),
        }
    }

    /// Apply `f` to the string, or to every element of the list.
    pub fn map_each(&self, f: impl Fn(&str) -> String) -> Self {
        match self {
            QueryValue::Single(value) => QueryValue::Single(f(value.as_str())),
            QueryValue::Multi(values) => {
                QueryValue::Multi(values.iter().map(|v| f(v.as_str())).collect())
            }
        }
    }

    /// Convert a JSON value supplied by a caller.
    ///
    /// Scalars become strings (`true` → `"1"`, `false` → `""`), `null` is
    /// treated as absent, and arrays/objects become lists whose scalar
    /// elements are stringified. Nested containers inside a list are kept as
    /// their compact JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(QueryValue::Multi(items.iter().map(scalar_text).collect())),
            Value::Object(fields) => {
                Some(QueryValue::Multi(fields.values().map(scalar_text).collect()))
            }
            scalar => Some(QueryValue::Single(scalar_text(scalar))),
        }
    }

    /// Parse a JSON object into a query map, dropping `null` members.
    pub fn map_from_json(value: &Value) -> QueryMap {
        value
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(key, v)| Self::from_json(v).map(|v| (key.clone(), v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Decode an HTTP query string into a query map.
    ///
    /// `+` decodes to a space and `%XX` sequences are decoded. Bracketed keys
    /// (`tag[]=a&tag[]=b`, `tag[x]=a`) collect into a list under the bare
    /// name; a repeated plain key keeps its last value. Dots and spaces in
    /// key names are replaced with `_`.
    pub fn parse_query(input: &str) -> QueryMap {
        let mut map = QueryMap::new();
        for (raw_key, value) in form_urlencoded::parse(input.as_bytes()) {
            let value = value.into_owned();
            match split_bracket_key(&raw_key) {
                Some(base) => {
                    if base.is_empty() {
                        continue;
                    }
                    match map.get_mut(&base) {
                        Some(QueryValue::Multi(values)) => values.push(value),
                        _ => {
                            map.insert(base, QueryValue::Multi(vec![value]));
                        }
                    }
                }
                None => {
                    let key = normalize_key(&raw_key);
                    if key.is_empty() {
                        continue;
                    }
                    map.insert(key, QueryValue::Single(value));
                }
            }
        }
        map
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

/// Returns the normalized base name if `key` has the form `name[...]`.
fn split_bracket_key(key: &str) -> Option<String> {
    let open = key.find('[')?;
    if !key[open..].contains(']') {
        return None;
    }
    Some(normalize_key(&key[..open]))
}

fn normalize_key(key: &str) -> String {
    key.replace(['.', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_pairs() {
        let map = QueryValue::parse_query("pagename=about&paged=2");
        assert_eq!(map.get("pagename"), Some(&QueryValue::from("about")));
        assert_eq!(map.get("paged"), Some(&QueryValue::from("2")));
    }

    #[test]
    fn test_parse_array_keys_collapse() {
        let map = QueryValue::parse_query("tag[]=a&tag[]=b&cat[x]=c");
        assert_eq!(map.get("tag"), Some(&QueryValue::from(vec!["a", "b"])));
        assert_eq!(map.get("cat"), Some(&QueryValue::from(vec!["c"])));
    }

    #[test]
    fn test_repeated_plain_key_keeps_last() {
        let map = QueryValue::parse_query("s=one&s=two");
        assert_eq!(map.get("s"), Some(&QueryValue::from("two")));
    }

    #[test]
    fn test_decoding_and_key_normalization() {
        let map = QueryValue::parse_query("s=hello+world%21&index.php&my+key=1");
        assert_eq!(map.get("s"), Some(&QueryValue::from("hello world!")));
        assert_eq!(map.get("index_php"), Some(&QueryValue::from("")));
        assert_eq!(map.get("my_key"), Some(&QueryValue::from("1")));
    }

    #[test]
    fn test_from_json_normalizes_scalars() {
        assert_eq!(QueryValue::from_json(&json!(7)), Some(QueryValue::from("7")));
        assert_eq!(QueryValue::from_json(&json!(true)), Some(QueryValue::from("1")));
        assert_eq!(QueryValue::from_json(&json!(null)), None);
        assert_eq!(
            QueryValue::from_json(&json!(["a", 2, {"k": "v"}])),
            Some(QueryValue::from(vec!["a", "2", "{\"k\":\"v\"}"]))
        );
    }

    #[test]
    fn test_map_from_json_drops_nulls() {
        let map = QueryValue::map_from_json(&json!({"paged": 3, "s": null}));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("paged"), Some(&QueryValue::from("3")));
    }
}
