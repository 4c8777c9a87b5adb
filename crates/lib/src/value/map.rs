//! Insertion-ordered field map.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::Value;

/// An insertion-ordered sequence of `(name, value)` pairs.
///
/// `FieldMap` is the object representation used for write payloads. Its JSON
/// encoding lists members in insertion order, which map-backed encoders do not
/// guarantee, so a record's fields reach the wire in declaration order and a
/// re-encoded payload is byte-identical to the first encoding.
///
/// Partial create/update bodies are assembled by hand with the chainable
/// [`set`](FieldMap::set). Setting a name that is already present replaces its
/// value in place; the pair keeps its original position.
///
/// # Example
///
/// ```
/// # use directus_client::value::FieldMap;
/// let body = FieldMap::new()
///     .set("name", "fred")
///     .set("price", 3.2)
///     .set("enabled", true);
///
/// assert_eq!(
///     serde_json::to_string(&body).unwrap(),
///     r#"{"name":"fred","price":3.2,"enabled":true}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    pairs: Vec<(String, Value)>,
}

impl FieldMap {
    /// Create an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty field map with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    /// Set a field, consuming and returning the map for chaining.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field in place.
    ///
    /// Appends the pair, or replaces the value at its original position if
    /// the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    /// Get the value for a field name, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Returns true if a field with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of fields in the map.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the map has no fields.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.pairs.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate over the field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
