//! Typed accessors over the free-form option maps attached to passage
//! components.
//!
//! Every component in a passage configuration (handlers, listeners,
//! connectors, dialers) carries a generic string-keyed option map for
//! settings that the core does not interpret itself.  During compilation,
//! several subsystems read their options out of this map and must then
//! *delete* the keys they consumed, so that subsystem-specific options never
//! leak into the generic metadata a component receives at instantiation
//! time.  This crate provides the map type and its best-effort typed
//! getters: a getter never fails, it simply reads an absent or malformed
//! value as "not present".

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::FromIterator;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A free-form option map with best-effort typed getters.
///
/// Values are JSON so that a consumed string can be replaced in place by a
/// structured value (for example a comma-joined list rewritten as a JSON
/// array).  Keys iterate in sorted order, which keeps serialized output
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    /// Return a new, empty option map.
    pub fn new() -> Self {
        Metadata(BTreeMap::new())
    }

    /// Return the raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Return the value under `key` as a string slice.
    ///
    /// Only actual JSON strings are visible through this getter; a number
    /// or boolean stored under the key reads as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Return the value under `key` as an owned string, or the empty
    /// string when the key is absent.
    ///
    /// Numbers and booleans are rendered to their usual text forms, so a
    /// query option that parsed as a bare number still reads back as text.
    pub fn get_string(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Return the value under `key` as an integer, or 0 when the key is
    /// absent or does not parse.
    pub fn get_int(&self, key: &str) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            Some(Value::Bool(b)) => *b as i64,
            _ => 0,
        }
    }

    /// Return the value under `key` as a boolean, or false when the key is
    /// absent or does not parse.
    ///
    /// Strings accept the usual spellings (`true`, `1`, ...); numbers are
    /// true when nonzero.
    pub fn get_bool(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "t" | "true" | "y" | "yes" | "on"
            ),
            _ => false,
        }
    }

    /// Return the value under `key` as a duration.
    ///
    /// A bare integer is a number of seconds; anything else is parsed with
    /// [`humantime::parse_duration`] (`30s`, `1h30m`, ...).  Absent or
    /// unparseable values read as `None`.
    pub fn get_duration(&self, key: &str) -> Option<Duration> {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_u64().map(Duration::from_secs),
            Some(Value::String(s)) => {
                let s = s.trim();
                if let Ok(secs) = s.parse::<u64>() {
                    return Some(Duration::from_secs(secs));
                }
                humantime::parse_duration(s).ok()
            }
            _ => None,
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Store `value` under `key` only if the key is not already present.
    ///
    /// This is the ingestion rule for URL queries, where the first value
    /// listed for a key wins.
    pub fn set_once(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Delete `key` from the map.  Deleting an absent key is fine.
    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    /// Return true if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Return true if the map holds no options at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the number of options in the map.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the options in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, String>> for Metadata {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl FromIterator<(String, String)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Metadata(
            iter.into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Shorthand for a map built from string pairs.
    fn md(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn strings() {
        let m = md(&[("a", "hello"), ("b", "")]);
        assert_eq!(m.get_str("a"), Some("hello"));
        assert_eq!(m.get_string("a"), "hello");
        assert_eq!(m.get_string("b"), "");
        assert_eq!(m.get_string("missing"), "");
        assert_eq!(m.get_str("missing"), None);
    }

    #[test]
    fn ints() {
        let m = md(&[("n", "42"), ("junk", "forty-two"), ("neg", "-7")]);
        assert_eq!(m.get_int("n"), 42);
        assert_eq!(m.get_int("junk"), 0);
        assert_eq!(m.get_int("neg"), -7);
        assert_eq!(m.get_int("missing"), 0);
    }

    #[test]
    fn bools() {
        let m = md(&[("t", "true"), ("one", "1"), ("f", "no"), ("junk", "zzz")]);
        assert!(m.get_bool("t"));
        assert!(m.get_bool("one"));
        assert!(!m.get_bool("f"));
        assert!(!m.get_bool("junk"));
        assert!(!m.get_bool("missing"));
    }

    #[test]
    fn durations() {
        let m = md(&[("plain", "30"), ("suffix", "1h30m"), ("junk", "soon")]);
        assert_eq!(m.get_duration("plain"), Some(Duration::from_secs(30)));
        assert_eq!(m.get_duration("suffix"), Some(Duration::from_secs(5400)));
        assert_eq!(m.get_duration("junk"), None);
        assert_eq!(m.get_duration("missing"), None);
    }

    #[test]
    fn first_value_wins() {
        let mut m = Metadata::new();
        m.set_once("k", "first");
        m.set_once("k", "second");
        assert_eq!(m.get_str("k"), Some("first"));
    }

    #[test]
    fn consume_and_delete() {
        let mut m = md(&[("keep", "x"), ("eat", "y")]);
        assert_eq!(m.get_string("eat"), "y");
        m.remove("eat");
        assert!(!m.contains("eat"));
        assert!(m.contains("keep"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn structured_rewrite() {
        let mut m = md(&[("dns", "1.1.1.1,8.8.8.8")]);
        let parts: Vec<String> = m
            .get_string("dns")
            .split(',')
            .map(str::to_string)
            .collect();
        m.set("dns", serde_json::json!(parts));
        assert_eq!(m.get_str("dns"), None);
        assert!(m.get("dns").unwrap().is_array());
    }
}
