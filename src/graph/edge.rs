use uuid::Uuid;

use super::node::NodeIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIdx(pub usize);

/// A single auxiliary geometric point that bends an edge from horizontal to
/// a +-45 degree diagonal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub x: f64,
    pub y: f64,
}

/// A connection between two nodes. `source`/`target` are ordered
/// left-to-right by original `(x, y)`; signals are split into the two
/// directional partitions they draw on.
#[derive(Debug, Clone)]
pub struct WorkingEdge {
    pub topology_id: Uuid,
    pub source: NodeIdx,
    pub target: NodeIdx,

    /// Identities of the signals on each directional side, resolved back
    /// into the topology edge's `signals` vec by id when positions are
    /// assigned.
    pub signals_in: Vec<Uuid>,
    pub signals_against: Vec<Uuid>,

    pub breakpoint: Option<Breakpoint>,

    /// The edge's original (pre-schematic) geometric length, used only to
    /// compute a signal's relative position along the edge.
    pub original_length: f64,

    /// Whether `source` is the underlying topology edge's `node_a` (as
    /// opposed to `node_b`). Needed to reproduce the signal-offset
    /// direction in `WorkingGraph::signal_distance_edge`.
    pub source_is_node_a: bool,
}

impl WorkingEdge {
    pub fn max_num_signals(&self) -> usize {
        self.signals_in.len().max(self.signals_against.len())
    }

    pub fn connected_node(&self, node: NodeIdx) -> Option<NodeIdx> {
        if node == self.source {
            Some(self.target)
        } else if node == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}
