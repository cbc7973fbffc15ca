//! Import of entity drafts produced by extraction collaborators.
//!
//! Drafts use the flat legacy shape `{ "id"?, "type", "name", <key>: <any> }`.
//! Scalar values are stored as text; arrays of scalars are joined with ", "
//! (extractors often return `associatedEntities` as a list). Missing ids are
//! generated from the type key.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::entities::{join_names, Attributes, Entity, EntityId};
use crate::error::{CodexError, Result};
use crate::registry::TypeRegistry;

/// An unvalidated entity as it arrives from outside.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDraft {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub entity_type: String,

    pub name: String,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl EntityDraft {
    /// Convert the draft into an entity and validate it against the registry.
    pub fn into_entity(self, registry: &TypeRegistry) -> Result<Entity> {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => EntityId::new(id.trim()),
            _ => EntityId::generate(&self.entity_type),
        };

        let mut attributes = Attributes::new();
        for (key, value) in self.attributes {
            if let Some(text) = value_to_text(&key, &value)? {
                attributes.set(key, text);
            }
        }

        let entity = Entity {
            id,
            entity_type: self.entity_type,
            name: self.name.trim().to_string(),
            attributes,
        };
        registry.validate(&entity)?;
        Ok(entity)
    }
}

fn scalar_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_text(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let parts = items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| {
                    scalar_to_text(item).ok_or_else(|| CodexError::InvalidAttributeValue {
                        attribute: key.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(join_names(&parts)))
        }
        Value::Object(_) => Err(CodexError::InvalidAttributeValue {
            attribute: key.to_string(),
        }),
        scalar => Ok(scalar_to_text(scalar)),
    }
}

/// Validate a batch of drafts. The batch is rejected as a whole on the first error.
pub fn import_drafts(drafts: Vec<EntityDraft>, registry: &TypeRegistry) -> Result<Vec<Entity>> {
    let mut seen = HashSet::new();
    let mut entities = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let entity = draft.into_entity(registry).inspect_err(|err| {
            warn!(error = %err, "rejected entity draft");
        })?;
        if !seen.insert(entity.id.clone()) {
            warn!(id = %entity.id, "rejected duplicate entity id");
            return Err(CodexError::DuplicateId(entity.id));
        }
        entities.push(entity);
    }

    debug!(count = entities.len(), "imported entity drafts");
    Ok(entities)
}

/// Parse a JSON array of drafts and validate them.
pub fn import_drafts_json(json: &str, registry: &TypeRegistry) -> Result<Vec<Entity>> {
    let drafts: Vec<EntityDraft> = serde_json::from_str(json)?;
    import_drafts(drafts, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ASSOCIATION_FIELD;

    #[test]
    fn test_import_flat_drafts() {
        let json = r#"[
            {"id": "loc-1", "type": "location", "name": "Sunken Temple", "associatedEntities": ""},
            {"id": "chr-1", "type": "character", "name": " Baron Valdris ",
             "associatedEntities": ["Sunken Temple"], "description": "A drowned noble"}
        ]"#;

        let entities = import_drafts_json(json, &TypeRegistry::default()).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].name, "Baron Valdris");
        assert_eq!(
            entities[1].association_text(ASSOCIATION_FIELD),
            "Sunken Temple"
        );
        assert_eq!(
            entities[1].attributes.get("description"),
            Some("A drowned noble")
        );
    }

    #[test]
    fn test_import_generates_missing_id() {
        let json = r#"[{"type": "monster", "name": "Gricklejaw", "challenge": 5}]"#;
        let entities = import_drafts_json(json, &TypeRegistry::default()).unwrap();

        assert!(entities[0].id.as_str().starts_with("monster-"));
        assert_eq!(entities[0].attributes.get("challenge"), Some("5"));
    }

    #[test]
    fn test_import_skips_null_values() {
        let json = r#"[{"id": "itm-1", "type": "item", "name": "Lantern", "rarity": null}]"#;
        let entities = import_drafts_json(json, &TypeRegistry::default()).unwrap();
        assert!(!entities[0].attributes.contains("rarity"));
    }

    #[test]
    fn test_import_rejects_duplicate_ids() {
        let json = r#"[
            {"id": "e-1", "type": "event", "name": "Flood"},
            {"id": "e-1", "type": "event", "name": "Drought"}
        ]"#;
        let result = import_drafts_json(json, &TypeRegistry::default());
        assert!(matches!(result, Err(CodexError::DuplicateId(_))));
    }

    #[test]
    fn test_import_rejects_nested_objects() {
        let json = r#"[{"id": "e-1", "type": "event", "name": "Flood", "outcome": {"a": 1}}]"#;
        let result = import_drafts_json(json, &TypeRegistry::default());
        assert!(matches!(
            result,
            Err(CodexError::InvalidAttributeValue { .. })
        ));
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let result = import_drafts_json("not json", &TypeRegistry::default());
        assert!(matches!(result, Err(CodexError::Json(_))));
    }
}
