//! Entity definitions for the narrative world.

mod attributes;
mod entity;

pub use attributes::*;
pub use entity::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an entity. Never changes for the entity's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier of the form `<prefix>-<8 hex chars>`.
    pub fn generate(prefix: &str) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", prefix, &uuid[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uses_prefix() {
        let id = EntityId::generate("loc");
        assert!(id.as_str().starts_with("loc-"));
        assert_eq!(id.as_str().len(), "loc-".len() + 8);
        assert_ne!(id, EntityId::generate("loc"));
    }

    #[test]
    fn test_empty_id() {
        assert!(EntityId::new("  ").is_empty());
        assert!(!EntityId::new("chr-1").is_empty());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&EntityId::new("mon-1")).unwrap();
        assert_eq!(json, "\"mon-1\"");
    }
}
