//! View filter - hide entity types and project the graph onto what remains.

use codex::{Entity, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::ConnectionGraph;

/// Set of hidden type keys, toggled by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    hidden: BTreeSet<String>,
}

impl ViewFilter {
    /// Create a filter that shows everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter hiding the given types.
    pub fn hiding<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hidden: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn hide(&mut self, type_key: impl Into<String>) {
        self.hidden.insert(type_key.into());
    }

    pub fn show(&mut self, type_key: &str) {
        self.hidden.remove(type_key);
    }

    /// Flip a type's visibility. Returns true if the type is now hidden.
    pub fn toggle(&mut self, type_key: &str) -> bool {
        if self.hidden.remove(type_key) {
            false
        } else {
            self.hidden.insert(type_key.to_string());
            true
        }
    }

    pub fn is_hidden(&self, type_key: &str) -> bool {
        self.hidden.contains(type_key)
    }

    pub fn hidden_types(&self) -> impl Iterator<Item = &str> {
        self.hidden.iter().map(String::as_str)
    }

    /// Project entities and graph onto the visible types.
    ///
    /// Connection counts in the result are degrees within the visible subgraph.
    pub fn apply(&self, entities: &[Entity], graph: &ConnectionGraph) -> FilteredView {
        let visible_entities: Vec<Entity> = entities
            .iter()
            .filter(|e| !self.is_hidden(&e.entity_type))
            .cloned()
            .collect();

        let keep: HashSet<&EntityId> = visible_entities.iter().map(|e| &e.id).collect();
        let graph = graph.restrict(&keep);

        debug!(
            hidden = self.hidden.len(),
            visible = visible_entities.len(),
            edges = graph.edge_count(),
            "applied view filter"
        );

        FilteredView {
            visible_entities,
            graph,
        }
    }
}

/// Visible entities and the graph induced on them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilteredView {
    pub visible_entities: Vec<Entity>,
    pub graph: ConnectionGraph,
}

impl FilteredView {
    pub fn is_empty(&self) -> bool {
        self.visible_entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::associations::NameIndex;
    use codex::ASSOCIATION_FIELD;

    fn world() -> (Vec<Entity>, ConnectionGraph) {
        let entities = vec![
            Entity::new("loc-1", "location", "Sunken Temple")
                .with_associations("Baron Valdris, Gricklejaw"),
            Entity::new("chr-1", "character", "Baron Valdris")
                .with_associations("Sunken Temple, Gricklejaw"),
            Entity::new("mon-1", "monster", "Gricklejaw"),
            Entity::new("itm-1", "item", "Lantern"),
        ];
        let index = NameIndex::build(&entities);
        let graph = ConnectionGraph::build(&entities, &index, ASSOCIATION_FIELD);
        (entities, graph)
    }

    #[test]
    fn test_no_hidden_types_is_identity() {
        let (entities, graph) = world();
        let view = ViewFilter::new().apply(&entities, &graph);
        assert_eq!(view.visible_entities, entities);
        assert_eq!(view.graph, graph);
    }

    #[test]
    fn test_hiding_recomputes_degrees() {
        let (entities, graph) = world();
        let view = ViewFilter::hiding(["monster"]).apply(&entities, &graph);

        assert_eq!(view.visible_entities.len(), 3);
        assert!(view.visible_entities.iter().all(|e| e.entity_type != "monster"));

        let mon = EntityId::new("mon-1");
        assert!(!view.graph.contains(&mon));
        assert!(view.graph.edges().iter().all(|e| !e.touches(&mon)));
        assert_eq!(view.graph.connection_count(&EntityId::new("loc-1")), 1);
        assert_eq!(view.graph.connection_count(&EntityId::new("chr-1")), 1);

        // The underlying graph is untouched.
        assert_eq!(graph.connection_count(&EntityId::new("loc-1")), 2);
    }

    #[test]
    fn test_hiding_everything() {
        let (entities, graph) = world();
        let filter = ViewFilter::hiding(["location", "character", "monster", "item"]);
        let view = filter.apply(&entities, &graph);
        assert!(view.is_empty());
        assert_eq!(view.graph.node_count(), 0);
    }

    #[test]
    fn test_toggle() {
        let mut filter = ViewFilter::new();
        assert!(filter.toggle("event"));
        assert!(filter.is_hidden("event"));
        assert!(!filter.toggle("event"));
        assert!(!filter.is_hidden("event"));

        filter.hide("item");
        filter.show("item");
        assert_eq!(filter.hidden_types().count(), 0);
    }
}
