//! Ordered parameter set.
//!
//! Keys are unique; the order of first insertion is kept because it is the
//! order signed when schema sorting is disabled.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A flat mapping of string keys to string values with stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry of `other` into this set, overriding existing values.
    pub fn extend_from(&mut self, other: &ParameterSet) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParameterSet::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for ParameterSet {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Renders a scalar the way the gateway forms see it: `true` is "1",
/// `false` and `null` are empty (and therefore never signed).
fn scalar_to_string(key: &str, value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Bool(false) | Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(format!(
            "value for '{}' must be a string, number or boolean",
            key
        )),
    }
}

struct ParameterSetVisitor;

impl<'de> Visitor<'de> for ParameterSetVisitor {
    type Value = ParameterSet;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a flat object of scalar parameters")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut params = ParameterSet::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            let value = scalar_to_string(&key, value).map_err(de::Error::custom)?;
            params.insert(key, value);
        }
        Ok(params)
    }
}

impl<'de> Deserialize<'de> for ParameterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ParameterSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut params = ParameterSet::new();
        params.insert("b", "1");
        params.insert("a", "2");
        params.insert("b", "3");

        let entries: Vec<_> = params.iter().collect();
        assert_eq!(entries, vec![("b", "3"), ("a", "2")]);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut params = ParameterSet::from([("orderId", "A1"), ("signMsg", "OLD")]);
        assert_eq!(params.remove("signMsg").as_deref(), Some("OLD"));
        assert!(!params.contains_key("signMsg"));
        assert_eq!(params.get("orderId"), Some("A1"));
        assert_eq!(params.remove("missing"), None);
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let json = r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#;
        let params: ParameterSet = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = params.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_deserialize_stringifies_scalars() {
        let json = r#"{"amount": 0, "rate": 1.5, "on": true, "off": false, "none": null}"#;
        let params: ParameterSet = serde_json::from_str(json).unwrap();
        assert_eq!(params.get("amount"), Some("0"));
        assert_eq!(params.get("rate"), Some("1.5"));
        assert_eq!(params.get("on"), Some("1"));
        assert_eq!(params.get("off"), Some(""));
        assert_eq!(params.get("none"), Some(""));
    }

    #[test]
    fn test_deserialize_rejects_nested_values() {
        let result: Result<ParameterSet, _> = serde_json::from_str(r#"{"ext1": {"a": 1}}"#);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("'ext1'"));
    }

    #[test]
    fn test_serialize_in_insertion_order() {
        let params = ParameterSet::from([("z", "1"), ("a", "2")]);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }
}
