//! Typed key-value fields attached to log records
//!
//! This module provides:
//! - `FieldValue`: the closed set of value types a field may hold
//! - `OpaqueValue`: captured rendering of any other `Debug` type
//! - `FieldSet`: uniquely keyed fields with deterministic serialization

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A value whose type has no dedicated `FieldValue` variant.
///
/// The value is rendered with `Debug` when captured; the type name is kept so
/// the runtime can report which type fell back to its string form.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueValue {
    type_name: &'static str,
    rendered: String,
}

impl OpaqueValue {
    pub fn new<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            rendered: format!("{:?}", value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl Serialize for OpaqueValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.rendered)
    }
}

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Opaque(OpaqueValue),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Opaque(o) => write!(f, "{}", o),
        }
    }
}

impl FieldValue {
    /// Capture a value of any other type through its `Debug` rendering
    pub fn opaque<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        FieldValue::Opaque(OpaqueValue::new(value))
    }

    /// Render for plain-text output: strings quoted, everything else bare
    #[must_use]
    pub fn to_plain(&self) -> String {
        match self {
            FieldValue::String(s) => format!("\"{}\"", sanitize(s)),
            FieldValue::Opaque(o) => sanitize(o.as_str()),
            other => other.to_string(),
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Opaque(o) => serde_json::Value::String(o.as_str().to_string()),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, FieldValue::Opaque(_))
    }
}

/// Escape line breaks and tabs so one record stays on one line
pub(crate) fn sanitize(value: &str) -> String {
    if !value.contains(['\n', '\r', '\t']) {
        return value.to_string();
    }
    value
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u16> for FieldValue {
    fn from(i: u16) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<usize> for FieldValue {
    fn from(i: usize) -> Self {
        i64::try_from(i)
            .map(FieldValue::Int)
            .unwrap_or_else(|_| FieldValue::opaque(&i))
    }
}

impl From<u64> for FieldValue {
    fn from(i: u64) -> Self {
        i64::try_from(i)
            .map(FieldValue::Int)
            .unwrap_or_else(|_| FieldValue::opaque(&i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f64::from(f))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl From<OpaqueValue> for FieldValue {
    fn from(value: OpaqueValue) -> Self {
        FieldValue::Opaque(value)
    }
}

/// Uniquely keyed fields attached to a log record.
///
/// Setting an existing key replaces its value. Serialization always walks
/// keys in ascending byte order, independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: HashMap<String, FieldValue>,
}

impl FieldSet {
    /// Create a new empty field set
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Add a field (chaining version)
    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.set(key, value);
        self
    }

    /// Add or overwrite a field
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy every entry of `other` into this set, `other` winning on conflict
    pub fn extend_from(&mut self, other: &FieldSet) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Return a new set holding this set's entries overwritten by `other`'s.
    ///
    /// Neither input is modified.
    #[must_use]
    pub fn merge(&self, other: &FieldSet) -> FieldSet {
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    /// Return a copy of this set with one extra field
    #[must_use]
    pub fn clone_with<K, V>(&self, key: K, value: V) -> FieldSet
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.clone().with_field(key, value)
    }

    /// Get a clone of all fields as a map
    pub fn to_map(&self) -> HashMap<String, FieldValue> {
        self.fields.clone()
    }

    /// Entries in ascending key order
    pub fn sorted(&self) -> Vec<(&str, &FieldValue)> {
        let mut entries: Vec<(&str, &FieldValue)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Keys and plain-text renderings, in ascending key order
    pub fn serialize(&self) -> Vec<(String, String)> {
        self.sorted()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_plain()))
            .collect()
    }

    /// Format fields as space separated key=value pairs
    pub fn format_fields(&self) -> String {
        self.serialize()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fields whose values fell back to an opaque rendering, in key order
    pub fn opaque_entries(&self) -> Vec<(&str, &OpaqueValue)> {
        self.sorted()
            .into_iter()
            .filter_map(|(k, v)| match v {
                FieldValue::Opaque(o) => Some((k, o)),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.sorted();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldSet
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for (key, value) in iter {
            set.set(key, value);
        }
        set
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FieldSet
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_set_creation() {
        let set = FieldSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_set_overwrites_existing_key() {
        let mut set = FieldSet::new();
        set.set("user", "a1");
        set.set("user", "b2");

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("user"), Some(&FieldValue::from("b2")));
    }

    #[test]
    fn test_serialize_sorts_keys() {
        let set = FieldSet::new()
            .with_field("zeta", 1)
            .with_field("alpha", 2)
            .with_field("Mid", 3);

        let keys: Vec<String> = set.serialize().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_value_formatting() {
        let set = FieldSet::from([
            ("a_str", FieldValue::from("text")),
            ("b_int", FieldValue::from(42)),
            ("c_float", FieldValue::from(2.5)),
            ("d_bool", FieldValue::from(true)),
            ("e_null", FieldValue::Null),
        ]);

        assert_eq!(
            set.format_fields(),
            "a_str=\"text\" b_int=42 c_float=2.5 d_bool=true e_null=null"
        );
    }

    #[test]
    fn test_opaque_formatting() {
        #[derive(Debug)]
        struct Point {
            x: i32,
        }

        let value = FieldValue::opaque(&Point { x: 7 });
        assert_eq!(value.to_plain(), "Point { x: 7 }");
        match value {
            FieldValue::Opaque(ref o) => assert!(o.type_name().ends_with("Point")),
            _ => panic!("Expected opaque value"),
        }

        let set = FieldSet::new().with_field("p", value).with_field("n", 1);
        let opaque = set.opaque_entries();
        assert_eq!(opaque.len(), 1);
        assert_eq!(opaque[0].0, "p");
    }

    #[test]
    fn test_plain_values_stay_on_one_line() {
        let value = FieldValue::from("line one\nline two\tend");
        assert_eq!(value.to_plain(), "\"line one\\nline two\\tend\"");
    }

    #[test]
    fn test_merge_is_a_copy() {
        let a = FieldSet::new().with_field("shared", "a").with_field("only_a", 1);
        let b = FieldSet::new().with_field("shared", "b").with_field("only_b", 2);

        let merged = a.merge(&b);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("shared"), Some(&FieldValue::from("b")));
        assert_eq!(a.get("shared"), Some(&FieldValue::from("a")));
        assert!(!a.contains_key("only_b"));
        assert!(!b.contains_key("only_a"));
    }

    #[test]
    fn test_clone_with_leaves_receiver_untouched() {
        let base = FieldSet::new().with_field("service", "api");
        let extended = base.clone_with("request", "r-1");

        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("x")), FieldValue::from("x"));
    }

    #[test]
    fn test_serde_output_is_sorted() {
        let set = FieldSet::new().with_field("b", 2).with_field("a", "x");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"a":"x","b":2}"#);
    }
}
