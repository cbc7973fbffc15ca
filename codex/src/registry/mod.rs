//! Type registry - the ordered list of entity types and their attribute schema.
//!
//! The registry order drives cluster order in the layout. Label and color are
//! carried for the presentation layer and are not interpreted here.

use serde::{Deserialize, Serialize};

use crate::entities::{is_listable_name, Entity, ASSOCIATION_FIELD};

fn default_association_field() -> String {
    ASSOCIATION_FIELD.to_string()
}
use crate::error::{CodexError, Result};

/// One registered entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeDef {
    pub key: String,
    pub label: String,
    pub color: String,

    /// Attribute keys allowed on entities of this type.
    /// An empty list accepts any attribute.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl EntityTypeDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            color: color.into(),
            fields: Vec::new(),
        }
    }

    /// Restrict the allowed attribute keys.
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Check whether an attribute key is listed for this type.
    pub fn allows(&self, attribute: &str) -> bool {
        self.fields.is_empty() || self.fields.iter().any(|f| f == attribute)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default = "default_association_field")]
    association_field: String,
    #[serde(default)]
    types: Vec<EntityTypeDef>,
}

/// Ordered collection of entity type definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRegistry {
    /// Attribute holding association text; allowed on every type.
    #[serde(default = "default_association_field")]
    association_field: String,
    types: Vec<EntityTypeDef>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(vec![
            EntityTypeDef::new("location", "Locations", "#4a90d9").with_fields(&[
                "description",
                "region",
                "atmosphere",
            ]),
            EntityTypeDef::new("character", "Characters", "#d9a04a").with_fields(&[
                "description",
                "role",
                "motivation",
                "appearance",
            ]),
            EntityTypeDef::new("monster", "Monsters", "#d94a4a").with_fields(&[
                "description",
                "challenge",
                "habitat",
                "abilities",
            ]),
            EntityTypeDef::new("item", "Items", "#4ad98a").with_fields(&[
                "description",
                "rarity",
                "properties",
            ]),
            EntityTypeDef::new("event", "Events", "#9a4ad9").with_fields(&[
                "description",
                "date",
                "outcome",
            ]),
        ])
    }
}

impl TypeRegistry {
    /// Create a registry from type definitions, in cluster order.
    ///
    /// Later definitions with an already registered key are ignored.
    pub fn new(types: Vec<EntityTypeDef>) -> Self {
        let mut unique: Vec<EntityTypeDef> = Vec::with_capacity(types.len());
        for def in types {
            if !unique.iter().any(|d| d.key == def.key) {
                unique.push(def);
            }
        }
        Self {
            association_field: default_association_field(),
            types: unique,
        }
    }

    /// Use a different attribute for association text.
    pub fn with_association_field(mut self, field: impl Into<String>) -> Self {
        self.association_field = field.into();
        self
    }

    /// Load a registry from TOML: an optional top-level `association_field`
    /// and `[[types]]` tables.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(source)?;
        Ok(Self::new(file.types).with_association_field(file.association_field))
    }

    pub fn association_field(&self) -> &str {
        &self.association_field
    }

    /// Get a type definition by key.
    pub fn get(&self, key: &str) -> Option<&EntityTypeDef> {
        self.types.iter().find(|d| d.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Position of a type in cluster order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.types.iter().position(|d| d.key == key)
    }

    /// Type keys in cluster order.
    pub fn order(&self) -> Vec<&str> {
        self.types.iter().map(|d| d.key.as_str()).collect()
    }

    pub fn types(&self) -> &[EntityTypeDef] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Validate an entity against the registry schema.
    pub fn validate(&self, entity: &Entity) -> Result<()> {
        if entity.id.is_empty() {
            return Err(CodexError::EmptyId);
        }
        if entity.name.trim().is_empty() {
            return Err(CodexError::EmptyName(entity.id.clone()));
        }
        if !is_listable_name(&entity.name) {
            return Err(CodexError::InvalidName {
                id: entity.id.clone(),
                name: entity.name.clone(),
            });
        }

        let def = self
            .get(&entity.entity_type)
            .ok_or_else(|| CodexError::UnknownType {
                id: entity.id.clone(),
                type_key: entity.entity_type.clone(),
            })?;

        if let Some(attribute) = entity
            .attributes
            .keys()
            .find(|key| *key != self.association_field && !def.allows(key))
        {
            return Err(CodexError::UnknownAttribute {
                type_key: def.key.clone(),
                attribute: attribute.to_string(),
            });
        }

        Ok(())
    }
}
