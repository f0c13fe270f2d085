pub mod edge;
pub mod geometry;
pub mod node;
mod ordering;
mod properties;

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::error::{LayoutError, Result};
use crate::topology::{GeoNode, SignalDirection, Topology, TrackType};

pub use edge::{Breakpoint, EdgeIdx, WorkingEdge};
pub use node::{NodeIdx, WorkingNode};

/// The working graph: built once from a `Topology`, mutated in place
/// through every pipeline stage, then discarded after `emit`. Exclusive
/// owner of its nodes and edges; everything else cross-references by
/// dense index.
#[derive(Debug)]
pub struct WorkingGraph {
    nodes: Vec<WorkingNode>,
    edges: Vec<WorkingEdge>,
    node_by_topology_id: HashMap<Uuid, NodeIdx>,
    edge_by_endpoints: HashMap<(NodeIdx, NodeIdx), EdgeIdx>,

    /// Nodes placed so far by the DFS currently running (vertical or
    /// horizontal positioning). Reset between stages.
    pub(crate) visited: HashSet<NodeIdx>,
    /// Per-row horizontal-index cap used to detect collisions before a
    /// shift during vertical positioning. Absent means "no cap yet".
    pub(crate) max_horizontal_idx: HashMap<i64, f64>,
}

impl WorkingGraph {
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        (0..self.nodes.len()).map(NodeIdx)
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        (0..self.edges.len()).map(EdgeIdx)
    }

    pub fn node(&self, idx: NodeIdx) -> &WorkingNode {
        &self.nodes[idx.0]
    }

    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut WorkingNode {
        &mut self.nodes[idx.0]
    }

    pub fn edge(&self, idx: EdgeIdx) -> &WorkingEdge {
        &self.edges[idx.0]
    }

    pub fn edge_mut(&mut self, idx: EdgeIdx) -> &mut WorkingEdge {
        &mut self.edges[idx.0]
    }

    pub fn get_edge(&self, a: NodeIdx, b: NodeIdx) -> Option<EdgeIdx> {
        self.edge_by_endpoints
            .get(&(a, b))
            .or_else(|| self.edge_by_endpoints.get(&(b, a)))
            .copied()
    }

    pub fn get_max_num_signals(&self, a: NodeIdx, b: NodeIdx) -> Result<usize> {
        let edge = self
            .get_edge(a, b)
            .ok_or_else(|| LayoutError::EdgeNotFound(self.nodes[a.0].topology_id, self.nodes[b.0].topology_id))?;
        Ok(self.edges[edge.0].max_num_signals())
    }

    /// `max(2, max_num_signals(a, b) + 1)`, the minimum horizontal spacing
    /// two nodes that aren't a main-to-main pair must keep (a global
    /// invariant).
    pub fn min_node_dist(&self, a: NodeIdx, b: NodeIdx) -> Result<f64> {
        Ok((2usize).max(self.get_max_num_signals(a, b)? + 1) as f64)
    }

    pub fn is_main_to_main_different(&self, a: NodeIdx, b: NodeIdx) -> bool {
        match (self.nodes[a.0].main_track(), self.nodes[b.0].main_track()) {
            (Some(ta), Some(tb)) => ta != tb,
            _ => false,
        }
    }

    pub fn both_part_of_main_track(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.nodes[a.0].is_part_of_main_track() && self.nodes[b.0].is_part_of_main_track()
    }

    pub fn slope_between(&self, from: NodeIdx, to: NodeIdx) -> Option<f64> {
        let a = &self.nodes[from.0];
        let b = &self.nodes[to.0];
        geometry::slope(a.original_x, a.original_y, b.original_x, b.original_y)
    }

    pub(crate) fn edge_intersects_any_other(&self, edge_idx: EdgeIdx) -> bool {
        let edge = &self.edges[edge_idx.0];
        let e1_source = self.nodes[edge.source.0].original_coords();
        let e1_target = self.nodes[edge.target.0].original_coords();

        self.edge_indices().any(|other_idx| {
            if other_idx == edge_idx {
                return false;
            }
            let other = &self.edges[other_idx.0];
            let e2_source = self.nodes[other.source.0].original_coords();
            let e2_target = self.nodes[other.target.0].original_coords();
            geometry::segments_intersect_strictly(e1_source, e1_target, e2_source, e2_target)
        })
    }

    pub fn horizontal_length(&self, edge_idx: EdgeIdx) -> f64 {
        let edge = &self.edges[edge_idx.0];
        (self.nodes[edge.target.0].new_x - self.nodes[edge.source.0].new_x).abs()
    }

    pub fn horizontal_only_length(&self, edge_idx: EdgeIdx) -> f64 {
        let edge = &self.edges[edge_idx.0];
        let source = &self.nodes[edge.source.0];
        let target = &self.nodes[edge.target.0];
        (source.new_x - target.new_x).abs() - (source.new_y - target.new_y).abs()
    }

    /// Computes a signal's new `distance_edge` from its assigned relative
    /// position, mirroring the original `set_signal_position`. `node_a`/
    /// `node_b` on the underlying topology edge don't necessarily match `source`/
    /// `target` (which are ordered left-to-right), so the offset applied
    /// when the breakpoint sits on the "far" leg depends on
    /// `source_is_node_a`.
    pub fn signal_distance_edge(&self, edge_idx: EdgeIdx, relative_distance: f64) -> Result<f64> {
        let edge = &self.edges[edge_idx.0];
        if !(0.0..=1.0).contains(&relative_distance) {
            return Err(LayoutError::BadRelativePosition(relative_distance, edge.topology_id));
        }

        let source = &self.nodes[edge.source.0];
        let target = &self.nodes[edge.target.0];

        match edge.breakpoint {
            Some(bp) => {
                let horizontal_length = self.horizontal_length(edge_idx);
                let horizontal_only_length = self.horizontal_only_length(edge_idx);
                let far_leg_offset = horizontal_length - horizontal_only_length;

                if source.new_y == bp.y {
                    let mut distance = relative_distance * (source.new_x - bp.x).abs();
                    if !edge.source_is_node_a {
                        distance += far_leg_offset;
                    }
                    Ok(distance)
                } else if target.new_y == bp.y {
                    let mut distance = relative_distance * (target.new_x - bp.x).abs();
                    if edge.source_is_node_a {
                        distance += far_leg_offset;
                    }
                    Ok(distance)
                } else {
                    Err(LayoutError::MalformedBreakpoint(edge.topology_id))
                }
            }
            None => Ok(relative_distance * (source.new_x - target.new_x).abs()),
        }
    }

    pub fn visited_node_indices(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.visited.iter().copied()
    }

    /// Highest Y any breakpoint currently sits at, or `-inf` if none exist.
    pub fn breakpoint_max_y(&self) -> f64 {
        self.edges
            .iter()
            .filter_map(|e| e.breakpoint.map(|bp| bp.y))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn set_breakpoint(&mut self, x: f64, y: f64, a: NodeIdx, b: NodeIdx) {
        if let Some(edge_idx) = self.get_edge(a, b) {
            self.edges[edge_idx.0].breakpoint = Some(Breakpoint { x, y });
        }
    }

    pub fn is_visited(&self, idx: NodeIdx) -> bool {
        self.visited.contains(&idx)
    }

    pub fn mark_visited(&mut self, idx: NodeIdx) {
        self.visited.insert(idx);
    }

    pub fn max_horizontal_idx_at(&self, y: f64) -> f64 {
        *self
            .max_horizontal_idx
            .get(&(y.round() as i64))
            .unwrap_or(&f64::NEG_INFINITY)
    }

    pub fn set_max_horizontal_idx(&mut self, y: f64, value: f64) {
        self.max_horizontal_idx.insert(y.round() as i64, value);
    }

    /// Frees vertical row `t`: every visited node with `new_y <= t` moves
    /// down one row, and so does every breakpoint `y <= t` on an edge
    /// incident to such a node (each breakpoint touched at most once).
    pub fn shift_existing_nodes(&mut self, threshold: f64) {
        let mut adjusted_breakpoints: HashSet<EdgeIdx> = HashSet::new();
        let visited: Vec<NodeIdx> = self.visited.iter().copied().collect();

        for node_idx in visited {
            if self.nodes[node_idx.0].new_y <= threshold {
                self.nodes[node_idx.0].new_y -= 1.0;

                let connected_edges = self.nodes[node_idx.0].connected_edges.clone();
                for edge_idx in connected_edges {
                    if adjusted_breakpoints.contains(&edge_idx) {
                        continue;
                    }
                    if let Some(bp) = self.edges[edge_idx.0].breakpoint.as_mut() {
                        if bp.y <= threshold {
                            adjusted_breakpoints.insert(edge_idx);
                            bp.y -= 1.0;
                        }
                    }
                }
            }
        }
    }

    pub fn reset_generation_helpers(&mut self) {
        self.visited.clear();
        self.max_horizontal_idx.clear();
    }

    /// Drops breakpoints placed purely for row coordination during vertical
    /// positioning; they are re-placed authoritatively (by X) during
    /// horizontal positioning.
    pub fn reset_intermediate_breakpoints(&mut self) {
        for edge in &mut self.edges {
            edge.breakpoint = None;
        }
    }

    // ---- construction -------------------------------------------

    pub fn build(topology: &Topology) -> Result<Self> {
        let mut graph = WorkingGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_by_topology_id: HashMap::new(),
            edge_by_endpoints: HashMap::new(),
            visited: HashSet::new(),
            max_horizontal_idx: HashMap::new(),
        };

        graph.build_nodes(topology);
        graph.build_edges(topology)?;
        graph.build_tracks(topology)?;

        graph.classify_predecessors_and_successors()?;
        graph.compute_heights();
        graph.compute_depths();
        graph.compute_reachability();

        Ok(graph)
    }

    fn build_nodes(&mut self, topology: &Topology) {
        let mut ids: Vec<&Uuid> = topology.nodes.keys().collect();
        ids.sort();

        for id in &ids {
            let node = &topology.nodes[*id];
            let idx = NodeIdx(self.nodes.len());
            self.nodes.push(WorkingNode::new(node.id, node.name.clone(), node.geo_node.x, node.geo_node.y));
            self.node_by_topology_id.insert(node.id, idx);
        }

        let xs: Vec<f64> = self.nodes.iter().map(|n| n.original_x).collect();
        let ys: Vec<f64> = self.nodes.iter().map(|n| n.original_y).collect();
        let (min_x, max_x) = min_max(&xs);
        let (min_y, max_y) = min_max(&ys);
        let x_span = if max_x - min_x == 0.0 { 1.0 } else { max_x - min_x };
        let y_span = if max_y - min_y == 0.0 { 1.0 } else { max_y - min_y };

        for node in &mut self.nodes {
            node.original_x = (node.original_x - min_x) / x_span;
            node.original_y = 1.0 - (node.original_y - min_y) / y_span;
            node.new_x = node.original_x;
            node.new_y = node.original_y;
        }
    }

    fn build_edges(&mut self, topology: &Topology) -> Result<()> {
        let mut ids: Vec<&Uuid> = topology.edges.keys().collect();
        ids.sort();

        for id in ids {
            let topo_edge = &topology.edges[id];
            let a = self.node_by_topology_id[&topo_edge.node_a];
            let b = self.node_by_topology_id[&topo_edge.node_b];

            let (source, target) = order_by_original_coords(&self.nodes, a, b);

            if self.nodes[source.0].original_x == self.nodes[target.0].original_x {
                return Err(LayoutError::VerticalEdge {
                    a: self.nodes[source.0].topology_id,
                    b: self.nodes[target.0].topology_id,
                });
            }

            let source_is_node_a = self.nodes[source.0].topology_id == topo_edge.node_a;

            let mut signals_in = Vec::new();
            let mut signals_against = Vec::new();
            for signal in &topo_edge.signals {
                let in_side = (signal.direction == SignalDirection::In && source_is_node_a)
                    || (signal.direction == SignalDirection::Against && !source_is_node_a);
                if in_side {
                    signals_in.push(signal.id);
                } else {
                    signals_against.push(signal.id);
                }
            }

            let edge_idx = EdgeIdx(self.edges.len());
            self.edges.push(WorkingEdge {
                topology_id: topo_edge.id,
                source,
                target,
                signals_in,
                signals_against,
                breakpoint: None,
                original_length: topo_edge.length,
                source_is_node_a,
            });

            self.nodes[source.0].connected_edges.push(edge_idx);
            self.nodes[target.0].connected_edges.push(edge_idx);
            self.edge_by_endpoints.insert((source, target), edge_idx);

            if self.nodes[source.0].connected_edges.len() > 3 {
                return Err(LayoutError::DegreeExceeded(self.nodes[source.0].topology_id));
            }
            if self.nodes[target.0].connected_edges.len() > 3 {
                return Err(LayoutError::DegreeExceeded(self.nodes[target.0].topology_id));
            }
        }

        Ok(())
    }

    fn build_tracks(&mut self, topology: &Topology) -> Result<()> {
        let mut track_ids: Vec<&Uuid> = topology.tracks.keys().collect();
        track_ids.sort();

        for track_id in track_ids {
            let track = &topology.tracks[track_id];
            let is_main = track.track_type == TrackType::Main;
            for node_topo_id in &track.nodes {
                let idx = self.node_by_topology_id[node_topo_id];
                if !self.nodes[idx.0].add_track(track.id, is_main) {
                    return Err(LayoutError::MainTrackCollision(self.nodes[idx.0].topology_id));
                }
            }
        }

        Ok(())
    }

    fn classify_predecessors_and_successors(&mut self) -> Result<()> {
        for idx in self.node_indices().collect::<Vec<_>>() {
            let connected_edges = self.nodes[idx.0].connected_edges.clone();
            for edge_idx in connected_edges {
                let neighbor = self.edges[edge_idx.0].connected_node(idx).unwrap();
                let here = self.nodes[idx.0].original_coords();
                let there = self.nodes[neighbor.0].original_coords();

                if there < here {
                    if self.nodes[idx.0].num_predecessors() >= 2 {
                        return Err(LayoutError::DegreeExceeded(self.nodes[idx.0].topology_id));
                    }
                    self.nodes[idx.0].predecessors.push(neighbor);
                } else if there > here {
                    if self.nodes[idx.0].num_successors() >= 2 {
                        return Err(LayoutError::DegreeExceeded(self.nodes[idx.0].topology_id));
                    }
                    self.nodes[idx.0].successors.push(neighbor);
                }
            }
        }
        Ok(())
    }

    // ---- emission ----------------------------------------------

    pub fn emit(&self, topology: &mut Topology) {
        for node in &self.nodes {
            if let Some(topo_node) = topology.nodes.get_mut(&node.topology_id) {
                topo_node.geo_node = GeoNode::new(node.new_x, node.new_y);
            }
        }

        for edge in &self.edges {
            if let Some(topo_edge) = topology.edges.get_mut(&edge.topology_id) {
                topo_edge.intermediate_geo_nodes = match edge.breakpoint {
                    Some(bp) => vec![GeoNode::new(bp.x, bp.y)],
                    None => Vec::new(),
                };
            }
        }
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

fn order_by_original_coords(nodes: &[WorkingNode], a: NodeIdx, b: NodeIdx) -> (NodeIdx, NodeIdx) {
    let coords_a = (nodes[a.0].original_x, nodes[a.0].original_y);
    let coords_b = (nodes[b.0].original_x, nodes[b.0].original_y);
    if coords_a <= coords_b {
        (a, b)
    } else {
        (b, a)
    }
}
