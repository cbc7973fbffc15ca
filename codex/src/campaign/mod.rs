//! Campaign - the entity list owned by the surrounding application.
//!
//! Derived data (associations, graph, layout) is computed elsewhere from a
//! snapshot of this list and written back with [`Campaign::apply`], which
//! replaces every entity at once.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::entities::{is_listable_name, join_names, name_key, Entity, EntityId};
use crate::error::{CodexError, Result};
use crate::registry::TypeRegistry;

/// How a rename treats other entities' association text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenamePolicy {
    /// References to the old name are left alone and become unresolved.
    #[default]
    LeaveStale,
    /// References to the old name are rewritten to the new name.
    RewriteReferences,
}

/// The complete set of entities for one campaign.
#[derive(Debug, Clone, Default)]
pub struct Campaign {
    registry: TypeRegistry,
    entities: Vec<Entity>,
}

impl Campaign {
    /// Create an empty campaign.
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            entities: Vec::new(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Copy of the entity list for derived computations.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.clone()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get entity by ID.
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    fn index_of(&self, id: &EntityId) -> Result<usize> {
        self.entities
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| CodexError::EntityNotFound(id.clone()))
    }

    /// Add a validated entity.
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId> {
        self.registry.validate(&entity)?;
        if self.get(&entity.id).is_some() {
            return Err(CodexError::DuplicateId(entity.id));
        }
        let id = entity.id.clone();
        self.entities.push(entity);
        Ok(id)
    }

    /// Remove an entity. References to it from other entities become unresolved.
    pub fn remove(&mut self, id: &EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| &e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Set one attribute on an entity, validated against its type.
    pub fn set_attribute(
        &mut self,
        id: &EntityId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        let mut updated = self.entities[index].clone();
        updated.attributes.set(key, value);
        self.registry.validate(&updated)?;
        self.entities[index] = updated;
        Ok(())
    }

    /// Rename an entity. Returns the ids of every entity that changed.
    pub fn rename(
        &mut self,
        id: &EntityId,
        new_name: &str,
        policy: RenamePolicy,
    ) -> Result<Vec<EntityId>> {
        let index = self.index_of(id)?;
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CodexError::EmptyName(id.clone()));
        }
        if !is_listable_name(new_name) {
            return Err(CodexError::InvalidName {
                id: id.clone(),
                name: new_name.to_string(),
            });
        }

        let old_key = name_key(&self.entities[index].name);
        self.entities[index].name = new_name.to_string();
        let mut changed = vec![id.clone()];

        if policy == RenamePolicy::RewriteReferences {
            let field = self.registry.association_field();
            for entity in self.entities.iter_mut().filter(|e| &e.id != id) {
                let names = entity.association_names(field);
                if !names.iter().any(|n| name_key(n) == old_key) {
                    continue;
                }
                let rewritten: Vec<&str> = names
                    .iter()
                    .map(|n| if name_key(n) == old_key { new_name } else { n.as_str() })
                    .collect();
                entity
                    .attributes
                    .set(field, join_names(&rewritten));
                changed.push(entity.id.clone());
            }
        }

        debug!(%id, new_name, ?policy, changed = changed.len(), "renamed entity");
        Ok(changed)
    }

    /// Replace the whole entity list at once.
    ///
    /// The snapshot is validated first; on error the campaign is unchanged.
    pub fn apply(&mut self, snapshot: Vec<Entity>) -> Result<()> {
        let mut seen = HashSet::new();
        for entity in &snapshot {
            self.registry.validate(entity)?;
            if !seen.insert(&entity.id) {
                return Err(CodexError::DuplicateId(entity.id.clone()));
            }
        }

        debug!(entities = snapshot.len(), "applied entity snapshot");
        self.entities = snapshot;
        Ok(())
    }
}
