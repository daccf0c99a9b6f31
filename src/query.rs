//! Query string sources and nested parameter flattening.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

/// A source of query string pairs for URL building.
///
/// Implementations return the key/value pairs to append, in the order they
/// should appear. Keys and values are raw strings; percent-encoding happens
/// when the pairs are written into a URL.
///
/// Implementations are provided for slices, arrays, and vectors of pairs,
/// for string maps, and for [`serde_json::Value`] objects. Nested objects
/// and arrays inside a `Value` flatten into bracketed keys, so
/// `{"fields": {"node--article": "title,path"}}` becomes the single pair
/// `fields[node--article]` / `title,path`.
pub trait SearchParams {
    /// Returns the ordered key/value pairs to append to a URL query string.
    fn query_pairs(&self) -> Vec<(String, String)>;
}

impl<K: AsRef<str>, V: AsRef<str>> SearchParams for [(K, V)] {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
            .collect()
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> SearchParams for [(K, V); N] {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.as_slice().query_pairs()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> SearchParams for Vec<(K, V)> {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.as_slice().query_pairs()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> SearchParams for BTreeMap<K, V> {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
            .collect()
    }
}

/// Hash maps have no inherent order, so pairs are sorted by key to keep the
/// produced query string deterministic.
impl<K: AsRef<str>, V: AsRef<str>> SearchParams for HashMap<K, V> {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .iter()
            .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
            .collect();
        pairs.sort();
        pairs
    }
}

impl SearchParams for serde_json::Map<String, Value> {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in self {
            flatten_into(key, value, &mut pairs);
        }
        pairs
    }
}

/// Objects flatten into bracketed pairs; any other JSON value yields no
/// pairs.
impl SearchParams for Value {
    fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            Value::Object(map) => map.query_pairs(),
            _ => Vec::new(),
        }
    }
}

fn flatten_into(prefix: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{prefix}[{key}]"), nested, pairs);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(&format!("{prefix}[{index}]"), item, pairs);
            }
        }
        Value::Null => pairs.push((prefix.to_string(), String::new())),
        Value::String(text) => pairs.push((prefix.to_string(), text.clone())),
        other => pairs.push((prefix.to_string(), other.to_string())),
    }
}

/// Encodes pairs as an `application/x-www-form-urlencoded` body.
pub(crate) fn form_encoded(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
