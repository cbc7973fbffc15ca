//! Error types for the lore graph engine.
//!
//! Graph computation itself never fails; these cover explicit edits and
//! configuration.

use codex::EntityId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("entities {first} and {second} share the name '{name}'")]
    DuplicateName {
        name: String,
        first: EntityId,
        second: EntityId,
    },

    #[error(transparent)]
    Codex(#[from] codex::CodexError),

    #[error("invalid engine config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
