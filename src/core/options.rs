// src/core/options.rs

//! # Options
//!
//! A property bag over a [`Store`]. Every accessor takes a plain string key; the
//! typed layer on top (`ToolOptions` implementations) hands out stable key
//! constants per property. Collection helpers follow one pattern: read the current
//! collection (or an empty default), apply the change, write it back.

use crate::core::multimap::MultiMap;
use crate::core::store::{Store, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failures of the options API.
#[derive(Error, Debug)]
pub enum OptionsError {
    /// A value could not be turned into JSON.
    #[error("Value for '{key}' could not be encoded: {source}")]
    Encode {
        /// Store key of the property.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A stored value does not decode into the requested type.
    #[error("Value for '{key}' could not be decoded: {source}")]
    Decode {
        /// Store key of the property.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A collection helper found a different shape under the key.
    #[error("Property '{key}' holds a {found}, expected a {expected}.")]
    ShapeMismatch {
        /// Store key of the property.
        key: String,
        /// Shape the helper works on.
        expected: &'static str,
        /// Shape actually stored.
        found: &'static str,
    },
    /// `add_entry` on an entry that already exists.
    #[error("Property '{key}' already contains an entry for '{entry}'.")]
    DuplicateEntry {
        /// Store key of the map.
        key: String,
        /// The entry already present.
        entry: String,
    },
    /// Portable form errors.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A copy-safe bag of typed properties.
///
/// Serializes as exactly its store, so an `Options` nested in another serde type
/// shows up as the flat key -> value object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    store: Store,
}

/// Human readable name of a JSON value's shape, for error messages.
pub(crate) fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) | Value::Number(_) | Value::String(_) => "scalar",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

fn encode<V: Serialize>(key: &str, value: V) -> Result<Value, OptionsError> {
    serde_json::to_value(value).map_err(|source| OptionsError::Encode {
        key: key.to_string(),
        source,
    })
}

impl Options {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing store.
    pub fn from_store(store: Store) -> Self {
        Self { store }
    }

    /// The backing store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Encodes the options into the store's portable form.
    pub fn encode(&self) -> Result<String, OptionsError> {
        Ok(self.store.encode()?)
    }

    /// Decodes options from the store's portable form.
    pub fn decode(portable: &str) -> Result<Self, OptionsError> {
        Ok(Self {
            store: Store::decode(portable)?,
        })
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// The stored JSON value of `key`.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    /// Stores `value` under `key`. Values encoding to `null` (e.g. `None`) remove the key.
    pub fn set<V: Serialize>(&mut self, key: &str, value: V) -> Result<(), OptionsError> {
        let encoded = encode(key, value)?;
        log::trace!("Setting option '{}' to {}", key, encoded);
        self.store.set(key, encoded);
        Ok(())
    }

    /// Removes `key`; absent keys are ignored.
    pub fn remove(&mut self, key: &str) {
        self.store.remove(key);
    }

    /// Decodes the value under `key`, or returns `T::default()` when absent.
    pub fn get<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, OptionsError> {
        Ok(self.get_opt(key)?.unwrap_or_default())
    }

    /// Decodes the value under `key`, if present.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, OptionsError> {
        self.store
            .get(key)
            .map(|value| {
                T::deserialize(value).map_err(|source| OptionsError::Decode {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    // --- Sequences ---

    fn read_sequence(&self, key: &str) -> Result<Vec<Value>, OptionsError> {
        match self.store.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(other) => Err(OptionsError::ShapeMismatch {
                key: key.to_string(),
                expected: "sequence",
                found: shape_name(other),
            }),
        }
    }

    /// Appends `items` to the sequence under `key`.
    pub fn add_items<V, I>(&mut self, key: &str, items: I) -> Result<(), OptionsError>
    where
        V: Serialize,
        I: IntoIterator<Item = V>,
    {
        let mut sequence = self.read_sequence(key)?;
        for item in items {
            sequence.push(encode(key, item)?);
        }
        self.store.set(key, Value::Array(sequence));
        Ok(())
    }

    /// Removes every element equal to one of `items` from the sequence under `key`.
    pub fn remove_items<V, I>(&mut self, key: &str, items: I) -> Result<(), OptionsError>
    where
        V: Serialize,
        I: IntoIterator<Item = V>,
    {
        let doomed = items
            .into_iter()
            .map(|item| encode(key, item))
            .collect::<Result<Vec<_>, _>>()?;
        let mut sequence = self.read_sequence(key)?;
        sequence.retain(|item| !doomed.contains(item));
        self.store.set(key, Value::Array(sequence));
        Ok(())
    }

    /// Writes back an empty sequence under `key`.
    pub fn clear_items(&mut self, key: &str) -> Result<(), OptionsError> {
        self.read_sequence(key)?;
        self.store.set(key, Value::Array(Vec::new()));
        Ok(())
    }

    // --- Maps ---

    fn read_map(&self, key: &str) -> Result<Map<String, Value>, OptionsError> {
        match self.store.get(key) {
            None => Ok(Map::new()),
            Some(Value::Object(entries)) => Ok(entries.clone()),
            Some(other) => Err(OptionsError::ShapeMismatch {
                key: key.to_string(),
                expected: "map",
                found: shape_name(other),
            }),
        }
    }

    /// Sets `entry` in the map under `key`, overwriting any previous value.
    pub fn set_entry<V: Serialize>(
        &mut self,
        key: &str,
        entry: &str,
        value: V,
    ) -> Result<(), OptionsError> {
        let mut map = self.read_map(key)?;
        map.insert(entry.to_string(), encode(key, value)?);
        self.store.set(key, Value::Object(map));
        Ok(())
    }

    /// Adds `entry` to the map under `key`; fails if the entry already exists.
    pub fn add_entry<V: Serialize>(
        &mut self,
        key: &str,
        entry: &str,
        value: V,
    ) -> Result<(), OptionsError> {
        let mut map = self.read_map(key)?;
        if map.contains_key(entry) {
            return Err(OptionsError::DuplicateEntry {
                key: key.to_string(),
                entry: entry.to_string(),
            });
        }
        map.insert(entry.to_string(), encode(key, value)?);
        self.store.set(key, Value::Object(map));
        Ok(())
    }

    /// Removes `entry` from the map under `key`.
    pub fn remove_entry(&mut self, key: &str, entry: &str) -> Result<(), OptionsError> {
        let mut map = self.read_map(key)?;
        map.shift_remove(entry);
        self.store.set(key, Value::Object(map));
        Ok(())
    }

    /// Writes back an empty map under `key`.
    pub fn clear_map(&mut self, key: &str) -> Result<(), OptionsError> {
        self.read_map(key)?;
        self.store.set(key, Value::Object(Map::new()));
        Ok(())
    }

    // --- MultiMaps ---

    fn read_multi_map(&self, key: &str) -> Result<MultiMap<Value>, OptionsError> {
        match self.store.get(key) {
            None => Ok(MultiMap::new()),
            Some(value @ Value::Object(_)) => {
                MultiMap::deserialize(value).map_err(|source| OptionsError::Decode {
                    key: key.to_string(),
                    source,
                })
            }
            Some(other) => Err(OptionsError::ShapeMismatch {
                key: key.to_string(),
                expected: "multimap",
                found: shape_name(other),
            }),
        }
    }

    fn write_multi_map(&mut self, key: &str, map: &MultiMap<Value>) -> Result<(), OptionsError> {
        let encoded = encode(key, map)?;
        self.store.set(key, encoded);
        Ok(())
    }

    /// Replaces all values of `entry` in the multimap under `key`.
    pub fn set_multi_entry<V, I>(&mut self, key: &str, entry: &str, values: I) -> Result<(), OptionsError>
    where
        V: Serialize,
        I: IntoIterator<Item = V>,
    {
        let values = values
            .into_iter()
            .map(|value| encode(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        let mut map = self.read_multi_map(key)?;
        map.set(entry, values);
        self.write_multi_map(key, &map)
    }

    /// Appends `value` to the values of `entry`, creating the entry if absent.
    pub fn add_multi_entry<V: Serialize>(
        &mut self,
        key: &str,
        entry: &str,
        value: V,
    ) -> Result<(), OptionsError> {
        let value = encode(key, value)?;
        let mut map = self.read_multi_map(key)?;
        map.add(entry, value);
        self.write_multi_map(key, &map)
    }

    /// Drops `entry` and all of its values.
    pub fn remove_multi_entry(&mut self, key: &str, entry: &str) -> Result<(), OptionsError> {
        let mut map = self.read_multi_map(key)?;
        map.remove(entry);
        self.write_multi_map(key, &map)
    }

    /// Drops one value of `entry`; the entry disappears once it has no values left.
    pub fn remove_multi_value<V: Serialize>(
        &mut self,
        key: &str,
        entry: &str,
        value: V,
    ) -> Result<(), OptionsError> {
        let value = encode(key, value)?;
        let mut map = self.read_multi_map(key)?;
        map.remove_value(entry, &value);
        self.write_multi_map(key, &map)
    }

    /// Writes back an empty multimap under `key`.
    pub fn clear_multi_map(&mut self, key: &str) -> Result<(), OptionsError> {
        let mut map = self.read_multi_map(key)?;
        map.clear();
        self.write_multi_map(key, &map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_get_absent_returns_default() {
        let options = Options::new();
        assert_eq!(options.get::<String>("Missing").unwrap(), "");
        assert_eq!(options.get::<Option<bool>>("Missing").unwrap(), None);
        assert!(options.get::<Vec<String>>("Missing").unwrap().is_empty());
    }

    #[test]
    fn test_set_none_removes_key() {
        let mut options = Options::new();
        options.set("Framework", "net8.0").unwrap();
        options.set("Framework", None::<String>).unwrap();
        assert!(!options.contains("Framework"));
    }

    #[test]
    fn test_get_wrong_type_fails() {
        let mut options = Options::new();
        options.set("Verbosity", "loud").unwrap();
        let result = options.get::<u32>("Verbosity");
        assert!(matches!(result, Err(OptionsError::Decode { .. })));
    }

    #[test]
    fn test_sequence_helpers() {
        let mut options = Options::new();
        options.add_items("Sources", ["a", "b"]).unwrap();
        options.add_items("Sources", ["c", "a"]).unwrap();
        assert_eq!(
            options.get::<Vec<String>>("Sources").unwrap(),
            vec!["a", "b", "c", "a"]
        );

        options.remove_items("Sources", ["a"]).unwrap();
        assert_eq!(options.get::<Vec<String>>("Sources").unwrap(), vec!["b", "c"]);

        options.clear_items("Sources").unwrap();
        assert_eq!(options.raw("Sources"), Some(&json!([])));
    }

    #[test]
    fn test_sequence_helper_rejects_scalar() {
        let mut options = Options::new();
        options.set("Sources", "single").unwrap();
        let result = options.add_items("Sources", ["x"]);
        assert!(matches!(
            result,
            Err(OptionsError::ShapeMismatch {
                expected: "sequence",
                found: "scalar",
                ..
            })
        ));
    }

    #[test]
    fn test_map_helpers() {
        let mut options = Options::new();
        options.set_entry("Properties", "key1", 1).unwrap();
        options.add_entry("Properties", "key2", "foobar").unwrap();
        assert_eq!(
            options.raw("Properties"),
            Some(&json!({"key1": 1, "key2": "foobar"}))
        );

        let duplicate = options.add_entry("Properties", "key1", 2);
        assert!(matches!(duplicate, Err(OptionsError::DuplicateEntry { .. })));

        options.set_entry("Properties", "key1", 3).unwrap();
        options.remove_entry("Properties", "key2").unwrap();
        let map: BTreeMap<String, i64> = options.get("Properties").unwrap();
        assert_eq!(map.get("key1"), Some(&3));
        assert_eq!(map.len(), 1);

        options.clear_map("Properties").unwrap();
        assert_eq!(options.raw("Properties"), Some(&json!({})));
    }

    #[test]
    fn test_multi_map_helpers() {
        let mut options = Options::new();
        options.add_multi_entry("Loggers", "console", "v=q").unwrap();
        options.add_multi_entry("Loggers", "file", "out.log").unwrap();
        options.add_multi_entry("Loggers", "console", "summary").unwrap();
        assert_eq!(
            options.raw("Loggers"),
            Some(&json!({"console": ["v=q", "summary"], "file": ["out.log"]}))
        );

        options.remove_multi_value("Loggers", "file", "out.log").unwrap();
        let loggers: MultiMap<String> = options.get("Loggers").unwrap();
        assert_eq!(loggers.len(), 1);
        assert_eq!(
            loggers.get("console"),
            Some(&["v=q".to_string(), "summary".to_string()][..])
        );

        options.set_multi_entry("Loggers", "console", ["x"]).unwrap();
        options.remove_multi_entry("Loggers", "missing").unwrap();
        assert_eq!(options.raw("Loggers"), Some(&json!({"console": ["x"]})));

        options.clear_multi_map("Loggers").unwrap();
        assert_eq!(options.raw("Loggers"), Some(&json!({})));
    }

    #[test]
    fn test_options_encode_as_flat_object() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            name: String,
            options: Options,
        }

        let mut options = Options::new();
        options.set("Configuration", "Release").unwrap();
        options.add_items("Sources", ["a"]).unwrap();

        let holder = Holder {
            name: "build".to_string(),
            options: options.clone(),
        };
        let encoded = serde_json::to_value(&holder).unwrap();
        assert_eq!(
            encoded,
            json!({"name": "build", "options": {"Configuration": "Release", "Sources": ["a"]}})
        );

        let decoded: Holder = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.options, options);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut options = Options::new();
        options.set("Flag", true).unwrap();
        options.set_entry("Map", "k", "v").unwrap();
        options.add_multi_entry("Multi", "k", 1).unwrap();

        let decoded = Options::decode(&options.encode().unwrap()).unwrap();
        assert_eq!(decoded, options);
    }

    #[test]
    fn test_decoded_null_is_absent() {
        let mut options = Options::decode(r#"{"Features": null, "Jobs": 2}"#).unwrap();
        assert!(!options.contains("Features"));
        assert_eq!(options.get::<Vec<String>>("Features").unwrap(), Vec::<String>::new());

        options.add_items("Features", ["tls"]).unwrap();
        assert_eq!(options.get::<Vec<String>>("Features").unwrap(), vec!["tls"]);
    }
}
