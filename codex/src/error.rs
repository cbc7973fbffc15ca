//! Error types raised at the codex boundary.

use thiserror::Error;

use crate::entities::EntityId;

/// Errors produced while validating, importing, or editing entities.
#[derive(Debug, Error)]
pub enum CodexError {
    #[error("entity id must not be empty")]
    EmptyId,

    #[error("entity {0} has an empty name")]
    EmptyName(EntityId),

    #[error("entity {id} name '{name}' contains a comma")]
    InvalidName { id: EntityId, name: String },

    #[error("unknown entity type '{type_key}' on entity {id}")]
    UnknownType { id: EntityId, type_key: String },

    #[error("attribute '{attribute}' is not defined for type '{type_key}'")]
    UnknownAttribute { type_key: String, attribute: String },

    #[error("duplicate entity id: {0}")]
    DuplicateId(EntityId),

    #[error("attribute '{attribute}' has a value that cannot be stored as text")]
    InvalidAttributeValue { attribute: String },

    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("invalid entity JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid registry config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CodexError>;
