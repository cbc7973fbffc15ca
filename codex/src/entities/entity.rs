//! The narrative entity record.

use serde::{Deserialize, Serialize};

use super::{split_names, Attributes, EntityId, ASSOCIATION_FIELD};

/// A typed, named record representing a narrative object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,

    /// Key into the type registry (e.g. "location", "monster").
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Display name. May change; references by name then go stale.
    pub name: String,

    #[serde(default)]
    pub attributes: Attributes,
}

impl Entity {
    /// Create a new entity with no attributes.
    pub fn new(
        id: impl Into<EntityId>,
        entity_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Set the raw association text.
    pub fn with_associations(self, text: impl Into<String>) -> Self {
        self.with_attribute(ASSOCIATION_FIELD, text)
    }

    /// Raw association text stored under `field`, empty when absent.
    pub fn association_text(&self, field: &str) -> &str {
        self.attributes.get(field).unwrap_or("")
    }

    /// Parsed association names stored under `field`.
    pub fn association_names(&self, field: &str) -> Vec<String> {
        split_names(self.association_text(field))
    }
}
