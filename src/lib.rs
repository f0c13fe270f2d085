//! Deterministic schematic layout for railway track topologies.
//!
//! Given a `Topology` (nodes with survey coordinates, edges with signals,
//! and track groupings), `layout` assigns every node and edge breakpoint a
//! schematic-grid position and rewrites each signal's `distance_edge`,
//! entirely in place. The algorithm is a two-pass DFS (vertical positioning
//! fixes rows, horizontal positioning fixes columns) followed by a handful
//! of post-processing steps; see the `layout` module for the stage-by-stage
//! breakdown.

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod topology;

pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use topology::Topology;

/// Runs the layout pipeline over `topology` in place, per `config`.
pub fn layout(topology: &mut Topology, config: &LayoutConfig) -> Result<()> {
    layout::layout(topology, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{GeoNode, TopologyEdge, TopologyNode};
    use uuid::Uuid;

    #[test]
    fn layout_places_a_two_node_edge_left_to_right() {
        let mut topology = Topology::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        topology.nodes.insert(
            a,
            TopologyNode {
                id: a,
                name: "A".into(),
                is_point: false,
                geo_node: GeoNode::new(0.0, 0.0),
            },
        );
        topology.nodes.insert(
            b,
            TopologyNode {
                id: b,
                name: "B".into(),
                is_point: false,
                geo_node: GeoNode::new(10.0, 0.0),
            },
        );
        topology.edges.insert(
            Uuid::new_v4(),
            TopologyEdge {
                id: Uuid::new_v4(),
                node_a: a,
                node_b: b,
                intermediate_geo_nodes: Vec::new(),
                signals: Vec::new(),
                length: 10.0,
            },
        );

        let config = LayoutConfig::default();
        layout(&mut topology, &config).expect("layout should succeed on a trivial edge");

        let new_a = topology.nodes[&a].geo_node;
        let new_b = topology.nodes[&b].geo_node;
        assert!(new_a.x < new_b.x, "A should end up to the left of B");
        assert_eq!(new_a.y, new_b.y, "a single edge has no row offset");
    }
}
