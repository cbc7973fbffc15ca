//! Name index - case-insensitive lookup from display name to entity id.

use codex::{is_listable_name, name_key, Entity, EntityId};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::CollisionPolicy;
use crate::error::{GraphError, Result};

/// Two entities whose names are equal ignoring case and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub name: String,
    pub kept: EntityId,
    pub shadowed: EntityId,
}

/// Lookup from `name.trim().to_lowercase()` to entity id.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    ids: HashMap<String, EntityId>,
    collisions: Vec<NameCollision>,
}

impl NameIndex {
    /// Build an index where the first entity with a given name wins.
    pub fn build(entities: &[Entity]) -> Self {
        let mut index = Self::default();
        for entity in entities {
            index.insert(entity, CollisionPolicy::FirstWins);
        }
        index
    }

    /// Build an index using an explicit collision policy.
    pub fn with_policy(entities: &[Entity], policy: CollisionPolicy) -> Result<Self> {
        let mut index = Self::default();
        for entity in entities {
            if let Some(collision) = index.insert(entity, policy) {
                if policy == CollisionPolicy::Reject {
                    return Err(GraphError::DuplicateName {
                        name: collision.name,
                        first: collision.kept,
                        second: collision.shadowed,
                    });
                }
            }
        }
        Ok(index)
    }

    fn insert(&mut self, entity: &Entity, policy: CollisionPolicy) -> Option<NameCollision> {
        if !is_listable_name(&entity.name) {
            if !entity.name.trim().is_empty() {
                debug!(id = %entity.id, name = %entity.name, "name not indexable, skipped");
            }
            return None;
        }
        let key = name_key(&entity.name);

        let Some(existing) = self.ids.get(&key).cloned() else {
            self.ids.insert(key, entity.id.clone());
            return None;
        };
        if existing == entity.id {
            return None;
        }

        let collision = if policy == CollisionPolicy::LastWins {
            self.ids.insert(key.clone(), entity.id.clone());
            NameCollision {
                name: key,
                kept: entity.id.clone(),
                shadowed: existing,
            }
        } else {
            NameCollision {
                name: key,
                kept: existing,
                shadowed: entity.id.clone(),
            }
        };

        warn!(
            name = %collision.name,
            kept = %collision.kept,
            shadowed = %collision.shadowed,
            "duplicate entity name"
        );
        self.collisions.push(collision.clone());
        Some(collision)
    }

    /// Resolve a display name to an entity id.
    pub fn resolve(&self, name: &str) -> Option<&EntityId> {
        self.ids.get(&name_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Collisions seen while building, in snapshot order.
    pub fn collisions(&self) -> &[NameCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
