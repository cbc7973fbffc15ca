//! Id-based association links.
//!
//! The stored association text is name-based and goes stale on rename. Links
//! resolve it once into ids with a cached display label; rendering them back
//! refreshes each label from the entity's current name.

use codex::{join_names, Entity, EntityId};
use serde::{Deserialize, Serialize};

use super::NameIndex;

/// One entry of an entity's association list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssociationRef {
    /// Resolves to another entity.
    Linked { id: EntityId, label: String },
    /// Plain text that names no other entity.
    Unlinked { text: String },
}

impl AssociationRef {
    pub fn label(&self) -> &str {
        match self {
            AssociationRef::Linked { label, .. } => label,
            AssociationRef::Unlinked { text } => text,
        }
    }

    pub fn target(&self) -> Option<&EntityId> {
        match self {
            AssociationRef::Linked { id, .. } => Some(id),
            AssociationRef::Unlinked { .. } => None,
        }
    }
}

/// Convert an entity's association text into links.
///
/// Names resolving to the entity itself stay unlinked.
pub fn link_associations(entity: &Entity, index: &NameIndex, field: &str) -> Vec<AssociationRef> {
    entity
        .association_names(field)
        .into_iter()
        .map(|name| match index.resolve(&name) {
            Some(id) if id != &entity.id => AssociationRef::Linked {
                id: id.clone(),
                label: name,
            },
            _ => AssociationRef::Unlinked { text: name },
        })
        .collect()
}

/// Render links back into legacy association text using current names.
///
/// A link whose entity no longer exists falls back to its cached label.
pub fn render_links(links: &[AssociationRef], entities: &[Entity]) -> String {
    let names: Vec<&str> = links
        .iter()
        .map(|link| match link {
            AssociationRef::Linked { id, label } => entities
                .iter()
                .find(|e| &e.id == id)
                .map(|e| e.name.as_str())
                .unwrap_or(label.as_str()),
            AssociationRef::Unlinked { text } => text.as_str(),
        })
        .collect();
    join_names(&names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex::ASSOCIATION_FIELD;

    #[test]
    fn test_link_associations() {
        let entities = vec![
            Entity::new("loc-1", "location", "Sunken Temple"),
            Entity::new("chr-1", "character", "Baron Valdris")
                .with_associations("sunken temple, The Old King, Baron Valdris"),
        ];
        let index = NameIndex::build(&entities);

        let links = link_associations(&entities[1], &index, ASSOCIATION_FIELD);
        assert_eq!(
            links,
            vec![
                AssociationRef::Linked {
                    id: EntityId::new("loc-1"),
                    label: "sunken temple".to_string()
                },
                AssociationRef::Unlinked {
                    text: "The Old King".to_string()
                },
                AssociationRef::Unlinked {
                    text: "Baron Valdris".to_string()
                },
            ]
        );
        assert_eq!(links[0].target(), Some(&EntityId::new("loc-1")));
        assert_eq!(links[1].label(), "The Old King");
    }

    #[test]
    fn test_links_survive_rename() {
        let mut entities = vec![
            Entity::new("loc-1", "location", "Sunken Temple"),
            Entity::new("chr-1", "character", "Baron Valdris").with_associations("Sunken Temple"),
        ];
        let index = NameIndex::build(&entities);
        let links = link_associations(&entities[1], &index, ASSOCIATION_FIELD);

        entities[0].name = "Drowned Temple".to_string();
        assert_eq!(render_links(&links, &entities), "Drowned Temple");

        entities.remove(0);
        assert_eq!(render_links(&links, &entities), "Sunken Temple");
    }

    #[test]
    fn test_link_serialization() {
        let link = AssociationRef::Unlinked {
            text: "Rumor".to_string(),
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["kind"], "unlinked");
        assert_eq!(json["text"], "Rumor");
    }
}
