//! The layout pipeline: builds a working graph from a
//! `Topology`, runs vertical then horizontal positioning, post-processes
//! the result, and writes the final coordinates back.

mod common;
mod horizontal;
mod hungarian;
mod postprocess;
mod signals;
mod vertical;

use log::info;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::graph::WorkingGraph;
use crate::topology::{strip_non_ks_signals, Topology};

/// Runs the full deterministic layout pipeline over `topology` in place.
pub fn layout(topology: &mut Topology, config: &LayoutConfig) -> Result<()> {
    if config.remove_non_ks_signals {
        strip_non_ks_signals(topology);
        info!(target: "layouting", "stripped non-KS signals");
    }

    let mut graph = WorkingGraph::build(topology)?;
    info!(target: "layouting", "built working graph: {} nodes", graph.node_indices().count());

    vertical::generate_vertical_positions(&mut graph)?;
    info!(target: "layouting", "vertical positioning complete");

    horizontal::generate_horizontal_positions(&mut graph)?;
    info!(target: "layouting", "horizontal positioning complete");

    postprocess::stretch_main_tracks(&mut graph);
    info!(target: "layouting", "main tracks stretched to bounds");

    postprocess::shorten_normal_tracks(&mut graph)?;
    info!(target: "layouting", "side branches shortened");

    signals::process_signals(&graph, topology)?;
    info!(target: "layouting", "signals redistributed");

    postprocess::scale(&mut graph, topology, config.scale_factor);
    info!(target: "layouting", "scaled to output range");

    graph.emit(topology);
    info!(target: "layouting", "layout complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::topology::{GeoNode, Signal, SignalDirection, SignalSystem, Track, TopologyEdge, TopologyNode, TrackType};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn node(topology: &mut Topology, name: &str, x: f64, y: f64) -> Uuid {
        let id = Uuid::new_v4();
        topology.nodes.insert(
            id,
            TopologyNode {
                id,
                name: name.into(),
                is_point: false,
                geo_node: GeoNode::new(x, y),
            },
        );
        id
    }

    fn edge(topology: &mut Topology, a: Uuid, b: Uuid, length: f64, signals: Vec<Signal>) -> Uuid {
        let id = Uuid::new_v4();
        topology.edges.insert(
            id,
            TopologyEdge {
                id,
                node_a: a,
                node_b: b,
                intermediate_geo_nodes: Vec::new(),
                signals,
                length,
            },
        );
        id
    }

    fn signal(name: &str, distance_edge: f64, direction: SignalDirection) -> Signal {
        Signal {
            id: Uuid::new_v4(),
            name: name.into(),
            distance_edge,
            direction,
            system: SignalSystem::Ks,
            kind: "main".into(),
        }
    }

    /// A fork: one start node branching into two leaves, one of the branch
    /// edges carrying a signal on each side. Mirrors the general-shape
    /// invariants a junction layout always has to satisfy (at most one
    /// breakpoint per edge, and a breakpoint's legs forming a valid
    /// horizontal-then-diagonal or diagonal-then-horizontal path).
    fn build_fork() -> Topology {
        let mut topology = Topology::new();
        let start = node(&mut topology, "start", 0.0, 0.0);
        let left = node(&mut topology, "left", 1.0, -1.0);
        let right = node(&mut topology, "right", 1.0, 1.0);

        edge(
            &mut topology,
            start,
            left,
            10.0,
            vec![signal("60BS1", 4.0, SignalDirection::In)],
        );
        edge(&mut topology, start, right, 10.0, vec![signal("60AS1", 6.0, SignalDirection::Against)]);

        topology.tracks.insert(
            Uuid::new_v4(),
            Track {
                id: Uuid::new_v4(),
                track_type: TrackType::Other,
                nodes: vec![start, left, right],
            },
        );

        topology
    }

    #[test]
    fn fork_layout_respects_breakpoint_leg_invariant() {
        init_logging();
        let mut topology = build_fork();
        let config = LayoutConfig::default();
        layout(&mut topology, &config).expect("a simple fork should always lay out");

        for topo_edge in topology.edges.values() {
            assert!(topo_edge.intermediate_geo_nodes.len() <= 1, "at most one breakpoint per edge");

            let a = topology.nodes[&topo_edge.node_a].geo_node;
            let b = topology.nodes[&topo_edge.node_b].geo_node;

            if let Some(bp) = topo_edge.intermediate_geo_nodes.first() {
                let from_a = bp.y == a.y && (bp.y - b.y).abs() == (bp.x - b.x).abs();
                let from_b = bp.y == b.y && (bp.y - a.y).abs() == (bp.x - a.x).abs();
                assert!(from_a || from_b, "breakpoint must sit on one endpoint's row and run diagonal to the other");
            } else {
                assert_eq!(a.y, b.y, "an edge with no breakpoint must be perfectly horizontal");
            }
        }
    }

    #[test]
    fn fork_layout_keeps_signals_in_rank_order() {
        init_logging();
        let mut topology = build_fork();
        let config = LayoutConfig::default();
        layout(&mut topology, &config).expect("a simple fork should always lay out");

        for topo_edge in topology.edges.values() {
            for s in &topo_edge.signals {
                assert!(s.distance_edge >= 0.0, "signal distance must stay non-negative after redistribution");
            }
        }
    }

    #[test]
    fn fork_layout_assigns_every_node_a_distinct_grid_position() {
        init_logging();
        let mut topology = build_fork();
        let config = LayoutConfig::default();
        layout(&mut topology, &config).expect("a simple fork should always lay out");

        let positions: Vec<(u64, u64)> = topology
            .nodes
            .values()
            .map(|n| (n.geo_node.x.to_bits(), n.geo_node.y.to_bits()))
            .collect();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert_ne!(positions[i], positions[j], "no two nodes may share a grid position");
            }
        }
    }

    /// A degree-3 switch: one predecessor ("head") feeding a node that
    /// splits into two successors ("left"/"right" branches). The head
    /// neighbor must sit strictly on one side in X, and both branch
    /// neighbors strictly on the other.
    #[test]
    fn point_node_keeps_head_on_the_opposite_side_from_its_branches() {
        init_logging();
        let mut topology = Topology::new();
        let head = node(&mut topology, "head", 0.0, 0.0);
        let switch = node(&mut topology, "switch", 1.0, 0.5);
        let left = node(&mut topology, "left", 2.0, -0.5);
        let right = node(&mut topology, "right", 2.0, 1.5);

        edge(&mut topology, head, switch, 10.0, Vec::new());
        edge(&mut topology, switch, left, 10.0, Vec::new());
        edge(&mut topology, switch, right, 10.0, Vec::new());

        let config = LayoutConfig::default();
        layout(&mut topology, &config).expect("a simple switch should always lay out");

        let head_x = topology.nodes[&head].geo_node.x;
        let switch_x = topology.nodes[&switch].geo_node.x;
        let left_x = topology.nodes[&left].geo_node.x;
        let right_x = topology.nodes[&right].geo_node.x;

        assert!(head_x < switch_x, "the head neighbor must sit strictly left of the switch");
        assert!(switch_x < left_x, "branch neighbors must sit strictly right of the switch");
        assert!(switch_x < right_x, "branch neighbors must sit strictly right of the switch");
    }

    #[test]
    fn signals_on_one_side_keep_their_relative_rank_order() {
        init_logging();
        let mut topology = Topology::new();
        let a = node(&mut topology, "a", 0.0, 0.0);
        let b = node(&mut topology, "b", 1.0, 0.0);
        let edge_id = edge(
            &mut topology,
            a,
            b,
            10.0,
            vec![
                signal("60BS1", 1.0, SignalDirection::In),
                signal("60BS3", 5.0, SignalDirection::In),
                signal("60BS5", 9.0, SignalDirection::In),
            ],
        );

        let config = LayoutConfig::default();
        layout(&mut topology, &config).expect("three signals on a straight edge should always lay out");

        let distances: Vec<f64> = topology.edges[&edge_id].signals.iter().map(|s| s.distance_edge).collect();
        assert!(
            distances[0] < distances[1] && distances[1] < distances[2],
            "signals must keep the same relative order as their original distance_edge ranking: {distances:?}"
        );
    }

    #[test]
    fn non_ks_signals_are_dropped_when_configured() {
        init_logging();
        let mut topology = build_fork();
        let edge_id = *topology.edges.keys().next().unwrap();
        topology
            .edges
            .get_mut(&edge_id)
            .unwrap()
            .signals
            .push(signal("60LST1", 2.0, SignalDirection::In));
        topology.edges.get_mut(&edge_id).unwrap().signals[1].system = SignalSystem::Other("LST".into());

        let config = LayoutConfig {
            remove_non_ks_signals: true,
            ..LayoutConfig::default()
        };
        layout(&mut topology, &config).expect("layout should succeed once non-KS signals are stripped");

        assert!(topology.edges[&edge_id].signals.iter().all(|s| s.system == SignalSystem::Ks));
    }
}
