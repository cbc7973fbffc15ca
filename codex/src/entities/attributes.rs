//! Typed attribute container and the legacy association text format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute that conventionally holds the comma-separated association names.
pub const ASSOCIATION_FIELD: &str = "associatedEntities";

/// Keys that identify an entity and never count as descriptive text.
pub const IDENTITY_FIELDS: [&str; 3] = ["id", "type", "name"];

/// Free-form text attributes of an entity, keyed by field name.
///
/// Keys are kept sorted so that any text derived from the attributes is
/// stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set an attribute, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenate every value except identity fields and the given excluded keys.
    pub fn descriptive_text(&self, excluded: &[&str]) -> String {
        self.0
            .iter()
            .filter(|(key, _)| {
                !IDENTITY_FIELDS.contains(&key.as_str()) && !excluded.contains(&key.as_str())
            })
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Split association text on commas, trimming and dropping empty entries.
pub fn split_names(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join association names back into their canonical text form.
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether a name survives a round trip through association text.
///
/// Blank names and names containing the list separator do not.
pub fn is_listable_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(',')
}

/// Case-insensitive comparison key for a display name.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
