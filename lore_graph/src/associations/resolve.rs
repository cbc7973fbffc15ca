//! Association resolution - canonical, symmetric association text for a snapshot.

use codex::{is_listable_name, join_names, name_key, Entity, EntityId};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::{merge_names, push_unique, AssociationInferer, NameIndex};

/// A new entity snapshot plus the ids whose association text changed.
///
/// Callers apply `entities` as one replacement so that no asymmetric
/// intermediate state is ever observed.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub entities: Vec<Entity>,
    pub changed: Vec<EntityId>,
}

impl Resolution {
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Merges explicit and inferred associations and enforces symmetry.
#[derive(Debug, Clone)]
pub struct AssociationResolver {
    field: String,
}

impl AssociationResolver {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Resolve every entity's associations.
    ///
    /// # Algorithm
    ///
    /// 1. Merge parsed association text with inferred mentions (case-insensitive,
    ///    first casing wins)
    /// 2. For each entity E in order, and each name resolving to T != E, append
    ///    E's name to T's list if missing
    /// 3. Write every list back joined with ", "
    ///
    /// Step 2 only adds names, so one forward pass is enough. A source whose name
    /// contains a comma cannot appear in a list and is never backfilled.
    pub fn resolve(&self, entities: &[Entity], index: &NameIndex) -> Resolution {
        let inferer = AssociationInferer::new(entities, &self.field);

        let mut lists: Vec<Vec<String>> = entities
            .iter()
            .map(|e| {
                let explicit = e.association_names(&self.field);
                merge_names(explicit.into_iter().chain(inferer.infer(e)))
            })
            .collect();

        let positions = positions(entities);
        let mut backfilled = 0usize;

        for (i, source) in entities.iter().enumerate() {
            if !is_listable_name(&source.name) {
                continue;
            }
            let names = lists[i].clone();
            for name in &names {
                let Some(target) = index.resolve(name) else {
                    continue;
                };
                if target == &source.id {
                    continue;
                }
                let Some(&t) = positions.get(target) else {
                    continue;
                };
                if push_unique(&mut lists[t], &source.name) {
                    backfilled += 1;
                }
            }
        }

        let resolution = self.write_back(entities, lists);
        debug!(
            entities = entities.len(),
            changed = resolution.changed.len(),
            backfilled,
            "resolved associations"
        );
        resolution
    }

    /// Store each list as the entity's association text.
    pub(crate) fn write_back(&self, entities: &[Entity], lists: Vec<Vec<String>>) -> Resolution {
        let mut changed = Vec::new();
        let entities = entities
            .iter()
            .zip(lists)
            .map(|(entity, names)| {
                let text = join_names(&names);
                if entity.association_text(&self.field) == text {
                    return entity.clone();
                }
                changed.push(entity.id.clone());
                let mut updated = entity.clone();
                updated.attributes.set(self.field.clone(), text);
                updated
            })
            .collect();

        Resolution { entities, changed }
    }

    /// Whether `source` lists a name resolving to `target`.
    pub fn lists(&self, source: &Entity, target: &Entity, index: &NameIndex) -> bool {
        source
            .association_names(&self.field)
            .iter()
            .any(|n| index.resolve(n) == Some(&target.id))
    }

    /// Names on `entity` that resolve to no known entity.
    pub fn unresolved(&self, entity: &Entity, index: &NameIndex) -> Vec<String> {
        entity
            .association_names(&self.field)
            .into_iter()
            .filter(|n| !index.contains(n))
            .collect()
    }
}

pub(crate) fn positions(entities: &[Entity]) -> HashMap<&EntityId, usize> {
    entities
        .iter()
        .enumerate()
        .map(|(i, e)| (&e.id, i))
        .collect()
}

pub(crate) fn remove_name(names: &mut Vec<String>, name: &str) -> bool {
    let key = name_key(name);
    let before = names.len();
    names.retain(|n| name_key(n) != key);
    names.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex::ASSOCIATION_FIELD;

    fn resolve(entities: &[Entity]) -> Resolution {
        let index = NameIndex::build(entities);
        AssociationResolver::new(ASSOCIATION_FIELD).resolve(entities, &index)
    }

    fn text<'a>(resolution: &'a Resolution, id: &str) -> &'a str {
        resolution
            .entities
            .iter()
            .find(|e| e.id.as_str() == id)
            .map(|e| e.association_text(ASSOCIATION_FIELD))
            .unwrap_or_default()
    }

    #[test]
    fn test_symmetric_backfill() {
        let entities = vec![
            Entity::new("loc-1", "location", "Sunken Temple").with_associations(""),
            Entity::new("chr-1", "character", "Baron Valdris").with_associations("Sunken Temple"),
        ];

        let resolution = resolve(&entities);
        assert_eq!(text(&resolution, "loc-1"), "Baron Valdris");
        assert_eq!(text(&resolution, "chr-1"), "Sunken Temple");
        assert_eq!(resolution.changed, vec![EntityId::new("loc-1")]);
    }

    #[test]
    fn test_merges_inferred_and_dedups_case_insensitively() {
        let entities = vec![
            Entity::new("loc-1", "location", "Sunken Temple")
                .with_attribute("description", "Gricklejaw nests here")
                .with_associations("gricklejaw, Baron Valdris, GRICKLEJAW"),
            Entity::new("chr-1", "character", "Baron Valdris"),
            Entity::new("mon-1", "monster", "Gricklejaw"),
        ];

        let resolution = resolve(&entities);
        assert_eq!(text(&resolution, "loc-1"), "gricklejaw, Baron Valdris");
        assert_eq!(text(&resolution, "chr-1"), "Sunken Temple");
        assert_eq!(text(&resolution, "mon-1"), "Sunken Temple");
    }

    #[test]
    fn test_unresolved_names_are_preserved() {
        let entities = vec![
            Entity::new("chr-1", "character", "Baron Valdris").with_associations("The Old King"),
        ];

        let resolution = resolve(&entities);
        assert_eq!(text(&resolution, "chr-1"), "The Old King");
        assert!(resolution.is_unchanged());

        let index = NameIndex::build(&resolution.entities);
        let resolver = AssociationResolver::new(ASSOCIATION_FIELD);
        assert_eq!(
            resolver.unresolved(&resolution.entities[0], &index),
            vec!["The Old King"]
        );
    }

    #[test]
    fn test_self_reference_is_not_backfilled() {
        let entities =
            vec![Entity::new("chr-1", "character", "Baron Valdris").with_associations("baron valdris")];
        let resolution = resolve(&entities);
        assert_eq!(text(&resolution, "chr-1"), "baron valdris");
    }

    #[test]
    fn test_symmetry_holds_after_one_pass() {
        let entities = vec![
            Entity::new("a", "character", "Alda").with_associations("Bram, Cole"),
            Entity::new("b", "character", "Bram"),
            Entity::new("c", "location", "Cole").with_attribute("description", "Home of Dunmore"),
            Entity::new("d", "location", "Dunmore").with_associations("Alda"),
        ];

        let resolution = resolve(&entities);
        let index = NameIndex::build(&resolution.entities);
        let resolver = AssociationResolver::new(ASSOCIATION_FIELD);

        for a in &resolution.entities {
            for b in &resolution.entities {
                if a.id == b.id {
                    continue;
                }
                assert_eq!(
                    resolver.lists(a, b, &index),
                    resolver.lists(b, a, &index),
                    "asymmetric pair {} / {}",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn test_comma_name_mentioned_in_text_stays_symmetric() {
        let entities = vec![
            Entity::new("loc-1", "location", "Sunken Temple")
                .with_attribute("description", "Smith, John guards the gate"),
            Entity::new("chr-1", "character", "Smith, John"),
        ];

        let resolution = resolve(&entities);
        assert_eq!(text(&resolution, "loc-1"), "");
        assert_eq!(text(&resolution, "chr-1"), "");

        let index = NameIndex::build(&resolution.entities);
        let resolver = AssociationResolver::new(ASSOCIATION_FIELD);
        let (temple, smith) = (&resolution.entities[0], &resolution.entities[1]);
        assert_eq!(
            resolver.lists(temple, smith, &index),
            resolver.lists(smith, temple, &index)
        );
    }

    #[test]
    fn test_comma_name_is_not_backfilled() {
        let entities = vec![
            Entity::new("loc-1", "location", "Sunken Temple"),
            Entity::new("chr-1", "character", "Smith, John").with_associations("Sunken Temple"),
        ];

        let resolution = resolve(&entities);
        assert_eq!(text(&resolution, "loc-1"), "");
        assert_eq!(text(&resolution, "chr-1"), "Sunken Temple");
        assert!(resolution.is_unchanged());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let entities = vec![
            Entity::new("loc-1", "location", "Sunken Temple"),
            Entity::new("chr-1", "character", "Baron Valdris").with_associations("Sunken Temple"),
        ];
        let first = resolve(&entities);
        let second = resolve(&first.entities);
        assert!(second.is_unchanged());
    }

    #[test]
    fn test_empty_snapshot() {
        let resolution = resolve(&[]);
        assert!(resolution.entities.is_empty());
        assert!(resolution.is_unchanged());
    }
}
