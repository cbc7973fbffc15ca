//! Cluster layout - deterministic 2-D placement without a physics simulation.
//!
//! The layout works as follows:
//! 1. **Clustering**: Group visible entities by type, in registry order
//! 2. **Centers**: Space cluster centers evenly on a circle, first one at the top
//! 3. **Ranking**: Order each cluster by descending connection count
//! 4. **Spiral**: Put a connected leader at the center and spiral the rest around it
//! 5. **Relaxation**: A few passes pulling connected entities toward each other
//!
//! Jitter is derived from the entity id, so identical inputs always produce
//! identical coordinates.

mod relax;

pub use relax::*;

use codex::{Entity, EntityId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::graph::ConnectionGraph;

/// A point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Final coordinates of one visible entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPosition {
    pub entity_id: EntityId,
    pub x: f64,
    pub y: f64,
}

/// Entities of one type sharing a cluster center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCluster {
    pub type_key: String,
    pub center: Point,
    /// Members by descending connection count; ties keep snapshot order.
    pub members: Vec<EntityId>,
}

/// Places entities in per-type clusters and relaxes the result.
#[derive(Debug, Clone, Default)]
pub struct ClusterLayout {
    config: LayoutConfig,
}

impl ClusterLayout {
    /// Create a layout with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Create a layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Group entities into clusters.
    ///
    /// Types follow `type_order`; types missing from it come after, in the
    /// order they are first seen. Empty types produce no cluster.
    pub fn clusters(
        &self,
        entities: &[Entity],
        graph: &ConnectionGraph,
        type_order: &[&str],
    ) -> Vec<TypeCluster> {
        let mut groups: Vec<(&str, Vec<&Entity>)> =
            type_order.iter().map(|key| (*key, Vec::new())).collect();

        for entity in entities {
            match groups
                .iter_mut()
                .find(|(key, _)| *key == entity.entity_type)
            {
                Some((_, members)) => members.push(entity),
                None => groups.push((entity.entity_type.as_str(), vec![entity])),
            }
        }
        groups.retain(|(_, members)| !members.is_empty());

        let count = groups.len();
        groups
            .into_iter()
            .enumerate()
            .map(|(t, (key, mut members))| {
                members.sort_by_key(|e| Reverse(graph.connection_count(&e.id)));
                TypeCluster {
                    type_key: key.to_string(),
                    center: self.cluster_center(t, count),
                    members: members.into_iter().map(|e| e.id.clone()).collect(),
                }
            })
            .collect()
    }

    /// Center of cluster `index` out of `count`.
    pub fn cluster_center(&self, index: usize, count: usize) -> Point {
        if count == 0 {
            return Point::default();
        }
        let theta = TAU * index as f64 / count as f64 - FRAC_PI_2;
        Point::new(
            self.config.cluster_radius * theta.cos(),
            self.config.cluster_radius * theta.sin(),
        )
    }

    /// Offset of the `i`-th spiral slot from its cluster center.
    pub fn spiral_offset(&self, i: usize) -> Point {
        let ring_size = self.config.ring_size.max(1);
        let layer = (i / ring_size + 1) as f64;
        let slot = (i % ring_size) as f64;
        let angle = slot * (TAU / ring_size as f64) + layer * self.config.ring_twist;
        let radius = layer * self.config.ring_spacing;
        Point::new(radius * angle.cos(), radius * angle.sin())
    }

    /// Deterministic jitter derived from the id's length.
    pub fn jitter(&self, id: &EntityId) -> Point {
        let len = id.as_str().chars().count() as f64;
        Point::new(
            self.config.jitter_amplitude * (self.config.jitter_frequency_x * len).sin(),
            self.config.jitter_amplitude * (self.config.jitter_frequency_y * len).cos(),
        )
    }

    /// Initial positions before relaxation.
    pub fn place(
        &self,
        clusters: &[TypeCluster],
        graph: &ConnectionGraph,
    ) -> BTreeMap<EntityId, Point> {
        let mut positions = BTreeMap::new();

        for cluster in clusters {
            let mut members = cluster.members.iter().peekable();

            if let Some(leader) = members.next_if(|id| graph.connection_count(id) > 0) {
                positions.insert(leader.clone(), cluster.center);
            }

            for (i, id) in members.enumerate() {
                let offset = self.spiral_offset(i);
                let jitter = self.jitter(id);
                positions.insert(
                    id.clone(),
                    Point::new(
                        cluster.center.x + offset.x + jitter.x,
                        cluster.center.y + offset.y + jitter.y,
                    ),
                );
            }
        }

        positions
    }

    /// Compute one position per entity.
    ///
    /// `graph` should cover the same entities (see `ViewFilter`); edges to
    /// entities outside `entities` are ignored.
    pub fn layout(
        &self,
        entities: &[Entity],
        graph: &ConnectionGraph,
        type_order: &[&str],
    ) -> Vec<LayoutPosition> {
        if entities.is_empty() {
            return Vec::new();
        }

        let clusters = self.clusters(entities, graph, type_order);
        let mut positions = self.place(&clusters, graph);
        relax(
            &mut positions,
            graph,
            self.config.relaxation_iterations,
            self.config.pull_factor,
        );

        let result: Vec<LayoutPosition> = clusters
            .iter()
            .flat_map(|c| c.members.iter())
            .filter_map(|id| {
                positions.get(id).map(|p| LayoutPosition {
                    entity_id: id.clone(),
                    x: p.x,
                    y: p.y,
                })
            })
            .collect();

        debug!(
            clusters = clusters.len(),
            positions = result.len(),
            "computed cluster layout"
        );
        result
    }
}
