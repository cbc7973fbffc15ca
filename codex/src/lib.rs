//! # Codex
//!
//! The "World Bible" for the lore graph - narrative entities, the type registry
//! that describes them, and the validation applied where entities enter the
//! system. This crate holds data only; association inference and layout live
//! in `lore_graph`.

pub mod campaign;
pub mod entities;
pub mod error;
pub mod import;
pub mod registry;

pub use campaign::*;
pub use entities::*;
pub use error::*;
pub use import::*;
pub use registry::*;
