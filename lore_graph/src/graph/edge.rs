//! Undirected association edges.

use codex::EntityId;
use serde::{Deserialize, Serialize};

/// Unordered pair of distinct entity ids, stored with the smaller id first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssociationEdge {
    a: EntityId,
    b: EntityId,
}

impl AssociationEdge {
    /// Create an edge. Returns `None` for a self-edge.
    pub fn new(x: EntityId, y: EntityId) -> Option<Self> {
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Canonical key: both ids sorted and joined.
    pub fn key(&self) -> String {
        format!("{}|{}", self.a, self.b)
    }

    pub fn ends(&self) -> (&EntityId, &EntityId) {
        (&self.a, &self.b)
    }

    pub fn touches(&self, id: &EntityId) -> bool {
        &self.a == id || &self.b == id
    }
}

impl std::fmt::Display for AssociationEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_is_unordered() {
        let ab = AssociationEdge::new("chr-1".into(), "loc-1".into()).unwrap();
        let ba = AssociationEdge::new("loc-1".into(), "chr-1".into()).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.key(), "chr-1|loc-1");
        assert_eq!(ba.key(), "chr-1|loc-1");
    }

    #[test]
    fn test_no_self_edge() {
        assert!(AssociationEdge::new("loc-1".into(), "loc-1".into()).is_none());
    }

    #[test]
    fn test_touches() {
        let edge = AssociationEdge::new("a".into(), "b".into()).unwrap();
        assert!(edge.touches(&EntityId::new("a")));
        assert!(!edge.touches(&EntityId::new("c")));
    }
}
