//! The input/output contract the layout engine is handed. The real
//! system builds this from a PlanPro import and later turns it into
//! draw-ready primitives with a separate render-model builder; both of
//! those are outside this crate. What's here is the narrow interface the
//! engine reads geometry and signals through, and writes schematic
//! coordinates back onto.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A 2D point in whatever coordinate space its owner currently lives in
/// (original survey coordinates, or schematic grid coordinates once the
/// engine has run).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoNode {
    pub x: f64,
    pub y: f64,
}

impl GeoNode {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    In,
    Against,
}

/// The signal's electronic system. Only `Ks` is distinguished by the engine
/// (for the `remove_non_ks_signals` filter); everything else is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalSystem {
    Ks,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: Uuid,
    pub name: String,
    pub distance_edge: f64,
    pub direction: SignalDirection,
    pub system: SignalSystem,
    pub kind: String,
}

/// Track types the engine cares about: `Main` tracks must end up strictly
/// horizontal and their nodes cannot belong to two of them at once. Every
/// other track type is treated uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackType {
    Main,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Uuid,
    pub track_type: TrackType,
    /// Nodes that belong to this track, in no particular order.
    pub nodes: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: Uuid,
    pub name: String,
    pub is_point: bool,
    pub geo_node: GeoNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyEdge {
    pub id: Uuid,
    pub node_a: Uuid,
    pub node_b: Uuid,
    pub intermediate_geo_nodes: Vec<GeoNode>,
    pub signals: Vec<Signal>,
    pub length: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    pub nodes: HashMap<Uuid, TopologyNode>,
    pub edges: HashMap<Uuid, TopologyEdge>,
    pub tracks: HashMap<Uuid, Track>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Removes every signal whose system isn't `Ks` from every edge. Run
/// before the working graph is built so the engine never sees them.
pub fn strip_non_ks_signals(topology: &mut Topology) {
    for edge in topology.edges.values_mut() {
        edge.signals.retain(|signal| matches!(signal.system, SignalSystem::Ks));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_non_ks_signals_keeps_only_ks() {
        let mut topology = Topology::new();
        let edge_id = Uuid::new_v4();
        topology.edges.insert(
            edge_id,
            TopologyEdge {
                id: edge_id,
                node_a: Uuid::new_v4(),
                node_b: Uuid::new_v4(),
                intermediate_geo_nodes: Vec::new(),
                signals: vec![
                    Signal {
                        id: Uuid::new_v4(),
                        name: "keep".into(),
                        distance_edge: 1.0,
                        direction: SignalDirection::In,
                        system: SignalSystem::Ks,
                        kind: "main".into(),
                    },
                    Signal {
                        id: Uuid::new_v4(),
                        name: "drop".into(),
                        distance_edge: 2.0,
                        direction: SignalDirection::In,
                        system: SignalSystem::Other("LST".into()),
                        kind: "main".into(),
                    },
                ],
                length: 10.0,
            },
        );

        strip_non_ks_signals(&mut topology);

        let signals = &topology.edges[&edge_id].signals;
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].name, "keep");
    }
}
