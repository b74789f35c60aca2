// src/core/store.rs

//! # Structured Store
//!
//! The only place mutable option state lives. An ordered `key -> JSON value`
//! container whose portable form is plain JSON text. Key order is significant:
//! setting a key moves it to the end, so iteration order is the order in which
//! keys were last set. The argument renderer relies on this as a tie-break.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failures of the portable JSON form.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The entries could not be written as JSON.
    #[error("Store could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    /// The text is not a JSON object.
    #[error("Store could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Ordered, heterogeneous property storage.
///
/// Values are scalars, sequences (arrays), maps (objects of scalars) or
/// multimaps (objects of arrays). The shape of a key is declared by whoever
/// owns it; the store itself only keeps order and values.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Store {
    entries: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut entries = Map::<String, Value>::deserialize(deserializer)?;
        // A null value means the key is absent.
        entries.retain(|_, value| !value.is_null());
        Ok(Self { entries })
    }
}

impl PartialEq for Store {
    /// Value equality that also requires identical key order.
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Store {}

impl Store {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Stores `value` under `key`, moving the key to the end of the order.
    /// A `null` value removes the key instead.
    pub fn set(&mut self, key: &str, value: Value) {
        self.entries.shift_remove(key);
        if !value.is_null() {
            self.entries.insert(key.to_string(), value);
        }
    }

    /// Removes `key`, keeping the relative order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Whether `key` holds a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the store into its portable JSON form.
    pub fn encode(&self) -> Result<String, StoreError> {
        serde_json::to_string(&self.entries).map_err(StoreError::Encode)
    }

    /// Decodes a store from its portable JSON form. Key order is kept as written;
    /// `null` entries are dropped.
    pub fn decode(portable: &str) -> Result<Self, StoreError> {
        serde_json::from_str(portable).map_err(StoreError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_store() -> Store {
        let mut store = Store::new();
        store.set("Configuration", json!("Release"));
        store.set("NoRestore", json!(true));
        store.set("Verbosity", json!(2));
        store.set("Sources", json!(["a", "b", "c"]));
        store.set("Properties", json!({"key1": 1, "key2": "foobar"}));
        store.set("Loggers", json!({"console": ["v=q", "summary"], "file": []}));
        store
    }

    #[test]
    fn test_round_trip_keeps_values_and_order() {
        let store = sample_store();
        let decoded = Store::decode(&store.encode().unwrap()).unwrap();

        assert_eq!(decoded, store);
        assert_eq!(
            decoded.keys().collect::<Vec<_>>(),
            vec![
                "Configuration",
                "NoRestore",
                "Verbosity",
                "Sources",
                "Properties",
                "Loggers"
            ]
        );
        assert_eq!(decoded.get("Loggers"), store.get("Loggers"));
    }

    #[test]
    fn test_set_null_removes_key() {
        let mut store = sample_store();
        store.set("Verbosity", Value::Null);
        assert!(!store.contains_key("Verbosity"));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_set_moves_key_to_end() {
        let mut store = Store::new();
        store.set("a", json!(1));
        store.set("b", json!(2));
        store.set("c", json!(3));
        store.set("a", json!(4));

        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["b", "c", "a"]);
        assert_eq!(store.get("a"), Some(&json!(4)));
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut store = Store::new();
        for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
            store.set(key, json!(i));
        }
        store.remove("b");
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let mut first = Store::new();
        first.set("a", json!(1));
        first.set("b", json!(2));

        let mut second = Store::new();
        second.set("b", json!(2));
        second.set("a", json!(1));

        assert_ne!(first, second);
    }

    #[test]
    fn test_decode_drops_null_entries() {
        let store = Store::decode(r#"{"a": 1, "b": null, "c": [null]}"#).unwrap();
        assert!(!store.contains_key("b"));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(store.get("c"), Some(&json!([null])));

        let nested: Store = serde_json::from_value(json!({"b": null})).unwrap();
        assert!(nested.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(Store::decode("[1, 2]"), Err(StoreError::Decode(_))));
    }
}
