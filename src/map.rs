//! Ordered map type for HOCON objects.
//!
//! This module provides [`ConfigObject`], a wrapper around [`IndexMap`] that
//! preserves insertion order for object entries. Order matters twice in this
//! crate: the cursor promises to visit entries in the object's stable
//! iteration order, and the emitter renders them in exactly that order.
//!
//! ## Examples
//!
//! ```rust
//! use serde_hocon::{ConfigObject, ConfigValue};
//!
//! let mut obj = ConfigObject::new();
//! obj.insert("host".to_string(), ConfigValue::from("localhost"));
//! obj.insert("port".to_string(), ConfigValue::from(8080));
//!
//! let keys: Vec<_> = obj.keys().cloned().collect();
//! assert_eq!(keys, vec!["host", "port"]);
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::ConfigValue;

/// An insertion-ordered map of string keys to configuration values.
///
/// Keys are unique; inserting an existing key replaces the value in place
/// without changing its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigObject(IndexMap<String, ConfigValue>);

impl ConfigObject {
    /// Creates an empty `ConfigObject`.
    #[must_use]
    pub fn new() -> Self {
        ConfigObject(IndexMap::new())
    }

    /// Creates an empty `ConfigObject` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ConfigObject(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// already existed. The key keeps its original position on replacement.
    pub fn insert(&mut self, key: String, value: ConfigValue) -> Option<ConfigValue> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, ConfigValue> {
        self.0.keys()
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, ConfigValue> {
        self.0.values()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.0.iter()
    }
}

impl From<HashMap<String, ConfigValue>> for ConfigObject {
    fn from(map: HashMap<String, ConfigValue>) -> Self {
        ConfigObject(map.into_iter().collect())
    }
}

impl IntoIterator for ConfigObject {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigObject {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigObject {
    fn from_iter<T: IntoIterator<Item = (String, ConfigValue)>>(iter: T) -> Self {
        ConfigObject(IndexMap::from_iter(iter))
    }
}
