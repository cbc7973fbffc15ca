//! Associations - resolving free-text entity references into a symmetric graph input.
//!
//! Associations are stored on each entity as comma-separated display names:
//! - **NameIndex**: case-insensitive name to id lookup
//! - **AssociationInferer**: finds other entities' names inside an entity's text
//! - **AssociationResolver**: merges explicit and inferred names and enforces symmetry
//! - **Links**: id-based view of the same text, stable across renames

mod edit;
mod infer;
mod links;
mod names;
mod resolve;

pub use edit::*;
pub use infer::*;
pub use links::*;
pub use names::*;
pub use resolve::*;

use codex::name_key;

/// Append `name` unless an equal name (ignoring case) is already present.
pub(crate) fn push_unique(names: &mut Vec<String>, name: &str) -> bool {
    let key = name_key(name);
    if key.is_empty() || names.iter().any(|n| name_key(n) == key) {
        return false;
    }
    names.push(name.trim().to_string());
    true
}

/// Case-insensitive merge; the first occurrence's casing wins.
pub fn merge_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut merged = Vec::new();
    for name in names {
        push_unique(&mut merged, name.as_ref());
    }
    merged
}
