use std::collections::HashSet;
use uuid::Uuid;

use super::edge::EdgeIdx;

/// Dense index into `WorkingGraph::nodes`. Cross-references inside the
/// graph go through this rather than shared handles, so the graph is the
/// exclusive owner of everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

/// A vertex in the working graph, wrapping a topology node.
#[derive(Debug, Clone)]
pub struct WorkingNode {
    pub topology_id: Uuid,
    pub name: String,

    pub original_x: f64,
    pub original_y: f64,

    pub new_x: f64,
    pub new_y: f64,

    pub height: Option<u32>,
    pub depth: Option<u32>,

    tracks: HashSet<Uuid>,
    main_track: Option<Uuid>,

    pub predecessors: Vec<NodeIdx>,
    pub successors: Vec<NodeIdx>,
    pub connected_edges: Vec<EdgeIdx>,

    pub reachable_nodes: HashSet<NodeIdx>,
    pub reaching_nodes: HashSet<NodeIdx>,
}

impl WorkingNode {
    pub fn new(topology_id: Uuid, name: String, original_x: f64, original_y: f64) -> Self {
        Self {
            topology_id,
            name,
            original_x,
            original_y,
            new_x: original_x,
            new_y: original_y,
            height: None,
            depth: None,
            tracks: HashSet::new(),
            main_track: None,
            predecessors: Vec::new(),
            successors: Vec::new(),
            connected_edges: Vec::new(),
            reachable_nodes: HashSet::new(),
            reaching_nodes: HashSet::new(),
        }
    }

    pub fn original_coords(&self) -> (f64, f64) {
        (self.original_x, self.original_y)
    }

    pub fn num_predecessors(&self) -> usize {
        self.predecessors.len()
    }

    pub fn num_successors(&self) -> usize {
        self.successors.len()
    }

    pub fn is_start_node(&self) -> bool {
        self.predecessors.is_empty()
    }

    pub fn is_end_node(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn tracks(&self) -> &HashSet<Uuid> {
        &self.tracks
    }

    pub fn main_track(&self) -> Option<Uuid> {
        self.main_track
    }

    pub fn is_part_of_main_track(&self) -> bool {
        self.main_track.is_some()
    }

    /// Returns `false` (and leaves the node unchanged) if `track` would be
    /// this node's second main track; the caller is expected to turn that
    /// into `LayoutError::MainTrackCollision`.
    #[must_use]
    pub(crate) fn add_track(&mut self, track_id: Uuid, is_main: bool) -> bool {
        if is_main && self.main_track.is_some() {
            return false;
        }
        if is_main {
            self.main_track = Some(track_id);
        }
        self.tracks.insert(track_id);
        true
    }
}
