//! # Lore Graph
//!
//! The association engine behind the entity map. It reads narrative entities
//! from `codex`, infers which ones mention each other, keeps those references
//! symmetric, and lays the resulting graph out in 2-D.
//!
//! ## Core Components
//!
//! - **associations**: Name index, mention inference, symmetric resolution and edits
//! - **graph**: Adjacency sets, connection counts and the type visibility filter
//! - **layout**: Type clusters, spiral placement and midpoint relaxation
//! - **assembler**: The full pipeline from entity snapshot to positioned view
//!
//! ## Design Philosophy
//!
//! - **Snapshot-Driven**: Every function takes an explicit entity snapshot and returns fresh data
//! - **Rebuild, Don't Patch**: Any structural change recomputes the graph and layout wholesale
//! - **Degrade, Don't Fail**: Unresolved or ambiguous names become "no edge", never an error

pub mod assembler;
pub mod associations;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;

pub use assembler::*;
pub use associations::*;
pub use config::*;
pub use error::*;
pub use graph::*;
pub use layout::*;
