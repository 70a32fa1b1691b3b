//! Insertion-ordered maps used for every named collection of a document.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use indexmap::map::{Iter, IterMut, Keys, Values};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A string-keyed map that iterates in insertion order.
///
/// An entry keeps the position it was first inserted at, even when its value
/// is replaced. For component registries that position doubles as the
/// entry's [`Handle`](super::Handle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderedMap<V> {
    entries: IndexMap<String, V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> OrderedMap<V> {
    /// An empty map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The value under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Position of `key`, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Key and value at `index`.
    pub fn get_index(&self, index: usize) -> Option<(&str, &V)> {
        self.entries
            .get_index(index)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Key and mutable value at `index`.
    pub fn get_index_mut(&mut self, index: usize) -> Option<(&str, &mut V)> {
        self.entries
            .get_index_mut(index)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Inserts or replaces `key` and returns its position.
    ///
    /// A replaced entry keeps its original position; a new one is appended.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> usize {
        self.entries.insert_full(key.into(), value).0
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> Iter<'_, String, V> {
        self.entries.iter()
    }

    /// Entries in insertion order, values mutable.
    pub fn iter_mut(&mut self) -> IterMut<'_, String, V> {
        self.entries.iter_mut()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Keys<'_, String, V> {
        self.entries.keys()
    }

    /// Values in insertion order.
    pub fn values(&self) -> Values<'_, String, V> {
        self.entries.values()
    }

    /// A key derived from `desired` that is not yet taken.
    ///
    /// Returns `desired` itself when free, otherwise the first free of
    /// `desired2`, `desired3`, ... The map is not modified.
    pub fn unique_name(&self, desired: &str) -> String {
        if !self.contains_key(desired) {
            return desired.to_string();
        }
        let mut suffix = 2usize;
        loop {
            let candidate = format!("{desired}{suffix}");
            if !self.contains_key(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for MapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderedMap::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((ScalarString(key), value)) = access.next_entry::<ScalarString, V>()? {
                    entries.insert(key, value);
                }
                Ok(OrderedMap { entries })
            }
        }

        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}

/// A string read from any scalar, so YAML keys such as `200` come out as `"200"`.
#[derive(Debug)]
pub struct ScalarString(pub String);

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = ScalarString;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(ScalarString(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(ScalarString(value.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a OrderedMap<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut OrderedMap<V> {
    type Item = (&'a String, &'a mut V);
    type IntoIter = IterMut<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_position_of_existing_key() {
        let mut map = OrderedMap::new();
        assert_eq!(map.set("b", 1), 0);
        assert_eq!(map.set("a", 2), 1);
        assert_eq!(map.set("b", 3), 0);

        let entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, vec![("b", 3), ("a", 2)]);
    }

    #[test]
    fn test_unique_name() {
        let map: OrderedMap<()> = [("Widget", ()), ("Widget2", ()), ("Gadget3", ())]
            .into_iter()
            .collect();

        assert_eq!(map.unique_name("Gizmo"), "Gizmo");
        assert_eq!(map.unique_name("Widget"), "Widget3");
        assert_eq!(map.unique_name("Gadget"), "Gadget");
        assert!(!map.contains_key("Widget3"));
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let map: OrderedMap<u32> = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(map.index_of("m"), Some(2));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn test_deserialize_numeric_yaml_keys() {
        let map: OrderedMap<String> = serde_yaml::from_str("200: ok\n'404': missing\n").unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["200", "404"]);
    }
}
