//! Graph assembler - the full pipeline from an entity snapshot to a positioned view.
//!
//! 1. **Resolve**: merge explicit and inferred associations, enforce symmetry
//! 2. **Index**: build the name index under the configured collision policy
//! 3. **Connect**: build adjacency and connection counts
//! 4. **Filter**: project onto visible types
//! 5. **Layout**: cluster, spiral and relax
//!
//! Every call recomputes everything; nothing is cached between calls.

use codex::{Campaign, Entity, EntityId, TypeRegistry};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::associations::{AssociationResolver, NameIndex, Resolution};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::{AssociationEdge, ConnectionGraph, FilteredView, ViewFilter};
use crate::layout::{ClusterLayout, LayoutPosition};

/// Everything the presentation layer needs to draw the entity map.
#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    /// Entities with resolved, symmetric association text.
    pub entities: Vec<Entity>,

    /// Graph over all entities, before filtering.
    pub graph: ConnectionGraph,

    /// Visible entities and the graph induced on them.
    pub visible: FilteredView,

    /// One position per visible entity.
    pub positions: Vec<LayoutPosition>,

    /// Association names that resolve to no entity, per entity.
    pub unresolved: BTreeMap<EntityId, Vec<String>>,
}

impl GraphView {
    /// Position of a visible entity.
    pub fn position(&self, id: &EntityId) -> Option<&LayoutPosition> {
        self.positions.iter().find(|p| &p.entity_id == id)
    }

    /// Edges between visible entities.
    pub fn visible_edges(&self) -> Vec<AssociationEdge> {
        self.visible.graph.edges()
    }

    /// Get a resolved entity by ID.
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    /// Serialize the view for the presentation layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Runs the association and layout pipeline.
pub struct GraphAssembler {
    config: EngineConfig,
    resolver: AssociationResolver,
    layout: ClusterLayout,
}

impl GraphAssembler {
    /// Create an assembler with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        let resolver = AssociationResolver::new(config.association_field.clone());
        let layout = ClusterLayout::new(config.layout.clone());
        Self {
            config,
            resolver,
            layout,
        }
    }

    /// Create an assembler with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the name index under the configured collision policy.
    pub fn name_index(&self, entities: &[Entity]) -> Result<NameIndex> {
        NameIndex::with_policy(entities, self.config.names.collision_policy)
    }

    /// Resolve a snapshot's associations.
    pub fn resolve(&self, entities: &[Entity]) -> Result<Resolution> {
        let index = self.name_index(entities)?;
        Ok(self.resolver.resolve(entities, &index))
    }

    /// Build the connection graph for already resolved entities.
    pub fn build_graph(&self, entities: &[Entity]) -> Result<ConnectionGraph> {
        let index = self.name_index(entities)?;
        Ok(ConnectionGraph::build(
            entities,
            &index,
            &self.config.association_field,
        ))
    }

    /// Symmetric add of one association.
    pub fn add_association(
        &self,
        entities: &[Entity],
        source: &EntityId,
        target_name: &str,
    ) -> Result<Resolution> {
        let index = self.name_index(entities)?;
        self.resolver
            .add_association(entities, &index, source, target_name)
    }

    /// Best-effort symmetric removal of one association.
    pub fn remove_association(
        &self,
        entities: &[Entity],
        source: &EntityId,
        target_name: &str,
    ) -> Result<Resolution> {
        let index = self.name_index(entities)?;
        self.resolver
            .remove_association(entities, &index, source, target_name)
    }

    /// Run the full pipeline on a snapshot.
    pub fn assemble(
        &self,
        entities: &[Entity],
        registry: &TypeRegistry,
        filter: &ViewFilter,
    ) -> Result<GraphView> {
        let resolution = self.resolve(entities)?;
        self.view_of(resolution.entities, registry, filter)
    }

    /// Resolve a campaign's associations, write them back atomically, and
    /// assemble the view.
    ///
    /// The campaign's registry decides which attribute holds the association
    /// list; it overrides the configured field.
    pub fn refresh(&self, campaign: &mut Campaign, filter: &ViewFilter) -> Result<GraphView> {
        let field = campaign.registry().association_field();
        if field != self.config.association_field {
            debug!(field, "using the campaign's association field");
            let assembler = Self::new(EngineConfig {
                association_field: field.to_string(),
                ..self.config.clone()
            });
            return assembler.refresh(campaign, filter);
        }

        let resolution = self.resolve(campaign.entities())?;
        if !resolution.is_unchanged() {
            campaign.apply(resolution.entities.clone())?;
            info!(changed = resolution.changed.len(), "wrote back resolved associations");
        }
        self.view_of(resolution.entities, campaign.registry(), filter)
    }

    fn view_of(
        &self,
        entities: Vec<Entity>,
        registry: &TypeRegistry,
        filter: &ViewFilter,
    ) -> Result<GraphView> {
        let field = &self.config.association_field;
        let index = self.name_index(&entities)?;
        let graph = ConnectionGraph::build(&entities, &index, field);

        let unresolved = entities
            .iter()
            .map(|e| (e.id.clone(), self.resolver.unresolved(e, &index)))
            .filter(|(_, names)| !names.is_empty())
            .collect();

        let visible = filter.apply(&entities, &graph);
        let positions =
            self.layout
                .layout(&visible.visible_entities, &visible.graph, &registry.order());

        debug!(
            entities = entities.len(),
            edges = graph.edge_count(),
            visible = visible.visible_entities.len(),
            positions = positions.len(),
            "assembled graph view"
        );

        Ok(GraphView {
            entities,
            graph,
            visible,
            positions,
            unresolved,
        })
    }
}
