//! Connection graph - symmetric adjacency built from resolved association text.

mod edge;
mod filter;

pub use edge::*;
pub use filter::*;

use codex::{is_listable_name, Entity, EntityId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

use crate::associations::NameIndex;

/// Adjacency sets plus per-entity connection counts.
///
/// Every entity in the source snapshot has an entry, so isolated entities
/// appear with an empty set and a count of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionGraph {
    adjacency: BTreeMap<EntityId, BTreeSet<EntityId>>,
    connection_count: BTreeMap<EntityId, usize>,
}

impl ConnectionGraph {
    /// Build the graph from each entity's association list.
    ///
    /// Unresolved names and self-references are skipped.
    pub fn build(entities: &[Entity], index: &NameIndex, field: &str) -> Self {
        let known: HashSet<&EntityId> = entities.iter().map(|e| &e.id).collect();
        let mut edges = BTreeSet::new();
        let mut skipped = 0usize;

        for entity in entities {
            // Nobody can list this entity back, so its own list adds no edges.
            if !is_listable_name(&entity.name) {
                continue;
            }
            for name in entity.association_names(field) {
                let Some(target) = index.resolve(&name).filter(|t| known.contains(t)) else {
                    skipped += 1;
                    continue;
                };
                if let Some(edge) = AssociationEdge::new(entity.id.clone(), target.clone()) {
                    edges.insert(edge);
                }
            }
        }

        let graph = Self::from_edges(entities.iter().map(|e| e.id.clone()), edges);
        debug!(
            entities = graph.node_count(),
            edges = graph.edge_count(),
            skipped,
            "built connection graph"
        );
        graph
    }

    /// Build a graph over `nodes` from a set of edges.
    ///
    /// Edges touching an id outside `nodes` are dropped.
    pub fn from_edges(
        nodes: impl IntoIterator<Item = EntityId>,
        edges: impl IntoIterator<Item = AssociationEdge>,
    ) -> Self {
        let mut adjacency: BTreeMap<EntityId, BTreeSet<EntityId>> = nodes
            .into_iter()
            .map(|id| (id, BTreeSet::new()))
            .collect();

        for edge in edges {
            let (a, b) = edge.ends();
            if !adjacency.contains_key(a) || !adjacency.contains_key(b) {
                continue;
            }
            if let Some(set) = adjacency.get_mut(a) {
                set.insert(b.clone());
            }
            if let Some(set) = adjacency.get_mut(b) {
                set.insert(a.clone());
            }
        }

        let connection_count = adjacency
            .iter()
            .map(|(id, set)| (id.clone(), set.len()))
            .collect();

        Self {
            adjacency,
            connection_count,
        }
    }

    /// Induced subgraph on the given ids.
    pub fn restrict(&self, keep: &HashSet<&EntityId>) -> Self {
        let nodes = self
            .adjacency
            .keys()
            .filter(|id| keep.contains(id))
            .cloned()
            .collect::<Vec<_>>();
        Self::from_edges(nodes, self.edges())
    }

    /// Neighbours of an entity, in id order.
    pub fn neighbors(&self, id: &EntityId) -> Option<&BTreeSet<EntityId>> {
        self.adjacency.get(id)
    }

    /// Number of distinct neighbours; zero for unknown ids.
    pub fn connection_count(&self, id: &EntityId) -> usize {
        self.connection_count.get(id).copied().unwrap_or(0)
    }

    pub fn adjacency(&self) -> &BTreeMap<EntityId, BTreeSet<EntityId>> {
        &self.adjacency
    }

    pub fn connection_counts(&self) -> &BTreeMap<EntityId, usize> {
        &self.connection_count
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn has_edge(&self, a: &EntityId, b: &EntityId) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(b))
    }

    /// All edges, each once, in canonical order.
    pub fn edges(&self) -> Vec<AssociationEdge> {
        self.adjacency
            .iter()
            .flat_map(|(a, set)| {
                set.iter()
                    .filter(move |b| a < *b)
                    .filter_map(move |b| AssociationEdge::new(a.clone(), b.clone()))
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.connection_count.values().sum::<usize>() / 2
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Entities with no connections.
    pub fn isolated(&self) -> Vec<&EntityId> {
        self.connection_count
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| id)
            .collect()
    }
}
