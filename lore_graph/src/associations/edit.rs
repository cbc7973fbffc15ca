//! Manual association edits that keep both sides in step.

use codex::{is_listable_name, Entity, EntityId};
use tracing::debug;

use super::resolve::{positions, remove_name};
use super::{push_unique, AssociationInferer, AssociationResolver, NameIndex, Resolution};
use crate::error::{GraphError, Result};

impl AssociationResolver {
    /// Add `target_name` to `source`'s associations, and `source` to the target's.
    pub fn add_association(
        &self,
        entities: &[Entity],
        index: &NameIndex,
        source: &EntityId,
        target_name: &str,
    ) -> Result<Resolution> {
        let mut lists = self.current_lists(entities);
        let positions = positions(entities);
        let s = *positions
            .get(source)
            .ok_or_else(|| GraphError::EntityNotFound(source.clone()))?;

        push_unique(&mut lists[s], target_name);

        if let Some(target) = index.resolve(target_name).filter(|t| *t != source) {
            if let Some(&t) = positions.get(target) {
                if is_listable_name(&entities[s].name) {
                    push_unique(&mut lists[t], &entities[s].name);
                }
            }
        }

        let resolution = self.write_back(entities, lists);
        debug!(%source, target = target_name, changed = resolution.changed.len(), "added association");
        Ok(resolution)
    }

    /// Remove `target_name` from `source`'s associations, and `source` from the target's.
    ///
    /// The reverse side is kept when the target's own text still mentions the
    /// source, since the next resolution pass would infer it again anyway.
    pub fn remove_association(
        &self,
        entities: &[Entity],
        index: &NameIndex,
        source: &EntityId,
        target_name: &str,
    ) -> Result<Resolution> {
        let mut lists = self.current_lists(entities);
        let positions = positions(entities);
        let s = *positions
            .get(source)
            .ok_or_else(|| GraphError::EntityNotFound(source.clone()))?;

        remove_name(&mut lists[s], target_name);

        if let Some(target) = index.resolve(target_name).filter(|t| *t != source) {
            if let Some(&t) = positions.get(target) {
                let inferer = AssociationInferer::new(entities, self.field());
                let source_name = &entities[s].name;
                if inferer.mentions(&entities[t], source_name) {
                    debug!(%source, %target, "reverse association kept, still mentioned in text");
                } else {
                    remove_name(&mut lists[t], source_name);
                }
            }
        }

        let resolution = self.write_back(entities, lists);
        debug!(%source, target = target_name, changed = resolution.changed.len(), "removed association");
        Ok(resolution)
    }

    fn current_lists(&self, entities: &[Entity]) -> Vec<Vec<String>> {
        entities
            .iter()
            .map(|e| e.association_names(self.field()))
            .collect()
    }
}
