//! Midpoint relaxation - nudges connected entities toward each other.

use codex::EntityId;
use std::collections::BTreeMap;

use super::Point;
use crate::graph::ConnectionGraph;

/// Pull every node toward the midpoints with its neighbours.
///
/// Each pass reads positions from a snapshot taken at the start of the pass,
/// so the result does not depend on visiting order. For a node `u` with
/// neighbour `v` the move is `pull * (midpoint(u, v) - u)`, summed over all
/// neighbours. Neighbours absent from `positions` are ignored.
pub fn relax(
    positions: &mut BTreeMap<EntityId, Point>,
    graph: &ConnectionGraph,
    iterations: u32,
    pull: f64,
) {
    for _ in 0..iterations {
        let start = positions.clone();

        for (id, point) in positions.iter_mut() {
            let Some(neighbors) = graph.neighbors(id) else {
                continue;
            };
            let Some(&origin) = start.get(id) else {
                continue;
            };

            for neighbor in neighbors {
                let Some(&other) = start.get(neighbor) else {
                    continue;
                };
                let mid = origin.midpoint(other);
                point.x += pull * (mid.x - origin.x);
                point.y += pull * (mid.y - origin.y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AssociationEdge;

    fn pair_graph() -> ConnectionGraph {
        let edge = AssociationEdge::new("a".into(), "b".into()).unwrap();
        let nodes = [EntityId::new("a"), EntityId::new("b"), EntityId::new("c")];
        ConnectionGraph::from_edges(nodes, [edge])
    }

    fn positions() -> BTreeMap<EntityId, Point> {
        [
            (EntityId::new("a"), Point::new(0.0, 0.0)),
            (EntityId::new("b"), Point::new(100.0, 0.0)),
            (EntityId::new("c"), Point::new(50.0, 50.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_single_pass_moves_five_percent_toward_midpoint() {
        let mut pos = positions();
        relax(&mut pos, &pair_graph(), 1, 0.05);

        let a = pos[&EntityId::new("a")];
        let b = pos[&EntityId::new("b")];
        assert!((a.x - 2.5).abs() < 1e-9);
        assert!((b.x - 97.5).abs() < 1e-9);
        assert!(a.y.abs() < 1e-9);
    }

    #[test]
    fn test_isolated_nodes_do_not_move() {
        let mut pos = positions();
        relax(&mut pos, &pair_graph(), 3, 0.05);
        assert_eq!(pos[&EntityId::new("c")], Point::new(50.0, 50.0));
    }

    #[test]
    fn test_passes_use_start_snapshot() {
        // Both ends move symmetrically; in-place updates would favour one side.
        let mut pos = positions();
        relax(&mut pos, &pair_graph(), 3, 0.05);

        let a = pos[&EntityId::new("a")];
        let b = pos[&EntityId::new("b")];
        assert!((a.x - (100.0 - b.x)).abs() < 1e-9);

        // Gap shrinks by a factor of 0.95 per pass.
        let expected_gap = 100.0 * 0.95f64.powi(3);
        assert!(((b.x - a.x) - expected_gap).abs() < 1e-9);
    }

    #[test]
    fn test_zero_iterations() {
        let mut pos = positions();
        relax(&mut pos, &pair_graph(), 0, 0.05);
        assert_eq!(pos, positions());
    }
}
