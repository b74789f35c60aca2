// src/core/multimap.rs

//! Ordered key to many values container used for multimap properties.

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// An ordered key -> many values container.
///
/// Encodes as exactly its backing representation, `{"key": [values...]}`, so a
/// multimap read from a store and written back is indistinguishable from the raw
/// object of arrays. Keys keep first-insertion order, values keep append order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiMap<V> {
    entries: Vec<(String, Vec<V>)>,
}

impl<V> Default for MultiMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> MultiMap<V> {
    /// An empty multimap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values of `key`, creating the key if absent.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Replaces every value of `key`.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<V>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// Values of `key`, in append order.
    pub fn get(&self, key: &str) -> Option<&[V]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Removes `key` with all its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<V>> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys with their values, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[V])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }
}

impl<V: PartialEq> MultiMap<V> {
    /// Removes one occurrence of `value` under `key`. A key left without values is dropped.
    pub fn remove_value(&mut self, key: &str, value: &V) -> bool {
        let Some(index) = self.entries.iter().position(|(k, _)| k == key) else {
            return false;
        };
        let removed = match self.entries.get_mut(index) {
            Some((_, values)) => match values.iter().position(|v| v == value) {
                Some(pos) => {
                    values.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        };
        if self.entries.get(index).is_some_and(|(_, values)| values.is_empty()) {
            self.entries.remove(index);
        }
        removed
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for MultiMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.add(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for MultiMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

struct MultiMapVisitor<V> {
    marker: PhantomData<V>,
}

impl<'de, V: DeserializeOwned> Visitor<'de> for MultiMapVisitor<V> {
    type Value = MultiMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object mapping keys to arrays of values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = MultiMap::new();
        while let Some((key, values)) = access.next_entry::<String, Vec<V>>()? {
            map.set(key, values);
        }
        Ok(map)
    }
}

impl<'de, V: DeserializeOwned> Deserialize<'de> for MultiMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MultiMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_appends_per_key() {
        let mut map = MultiMap::new();
        map.add("logger", "console");
        map.add("define", "A");
        map.add("logger", "file");

        assert_eq!(map.get("logger"), Some(&["console", "file"][..]));
        assert_eq!(
            map.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["logger", "define"]
        );
    }

    #[test]
    fn test_encodes_as_backing_object() {
        let map: MultiMap<i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        let encoded = serde_json::to_value(&map).unwrap();
        assert_eq!(encoded, json!({"a": [1, 3], "b": [2]}));

        let decoded: MultiMap<i32> = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn test_remove_value_drops_empty_key() {
        let mut map: MultiMap<String> = [("k", "x".to_string())].into_iter().collect();
        assert!(map.remove_value("k", &"x".to_string()));
        assert!(map.is_empty());
        assert!(!map.remove_value("k", &"x".to_string()));
    }

    #[test]
    fn test_rejects_non_array_values() {
        let result = serde_json::from_value::<MultiMap<i32>>(json!({"a": 1}));
        assert!(result.is_err());
    }
}
