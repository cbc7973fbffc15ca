//! Mention inference - which other entities does an entity's own text name?
//!
//! Matching is a plain lowercase substring test, not word-boundary aware, so a
//! short or common name ("Ash", "The") can match inside unrelated words.

use codex::{is_listable_name, Entity, EntityId};
use tracing::trace;

struct Needle<'a> {
    id: &'a EntityId,
    name: &'a str,
    lowered: String,
}

/// Scans entity text for the names of other entities in the same snapshot.
pub struct AssociationInferer<'a> {
    field: &'a str,
    needles: Vec<Needle<'a>>,
}

impl<'a> AssociationInferer<'a> {
    /// Prepare an inferer over a snapshot. `field` is excluded from the scanned text.
    pub fn new(entities: &'a [Entity], field: &'a str) -> Self {
        let needles = entities
            .iter()
            .filter(|e| is_listable_name(&e.name))
            .map(|e| Needle {
                id: &e.id,
                name: e.name.trim(),
                lowered: e.name.trim().to_lowercase(),
            })
            .collect();
        Self { field, needles }
    }

    /// Lowercased descriptive text of an entity.
    pub fn haystack(&self, entity: &Entity) -> String {
        entity
            .attributes
            .descriptive_text(&[self.field])
            .to_lowercase()
    }

    /// Names of other entities mentioned in `entity`'s text, in snapshot order.
    pub fn infer(&self, entity: &Entity) -> Vec<String> {
        let haystack = self.haystack(entity);
        if haystack.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for needle in &self.needles {
            if needle.id == &entity.id || !haystack.contains(&needle.lowered) {
                continue;
            }
            trace!(source = %entity.id, target = %needle.id, "inferred mention");
            found.push(needle.name.to_string());
        }
        found
    }

    /// Whether `entity`'s text mentions `name` (ignoring case).
    pub fn mentions(&self, entity: &Entity, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        !needle.is_empty() && self.haystack(entity).contains(&needle)
    }
}
