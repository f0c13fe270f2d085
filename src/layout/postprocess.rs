//! Post-processing (minus signal redistribution, which lives in
//! `layout::signals`): stretch main-track endpoints to the drawing
//! bounds, shorten side-branch overhang where it's safe to, and scale the
//! final integer grid to the caller's requested output range.

use std::collections::HashSet;

use log::debug;

use crate::error::Result;
use crate::graph::{EdgeIdx, NodeIdx, WorkingGraph};
use crate::topology::Topology;

/// Main-track nodes that are also start/end nodes get pulled out to the
/// drawing's global X bounds, so every main track reads as one continuous
/// horizontal spine.
pub fn stretch_main_tracks(graph: &mut WorkingGraph) {
    let (min_x, max_x) = x_bounds(graph);

    for idx in graph.node_indices().collect::<Vec<_>>() {
        let node = graph.node(idx);
        if node.is_part_of_main_track() && node.is_start_node() {
            graph.node_mut(idx).new_x = min_x;
        }
        let node = graph.node(idx);
        if node.is_part_of_main_track() && node.is_end_node() {
            graph.node_mut(idx).new_x = max_x;
        }
    }
}

fn x_bounds(graph: &WorkingGraph) -> (f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for idx in graph.node_indices() {
        let x = graph.node(idx).new_x;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    (min_x, max_x)
}

fn default_node_dist(graph: &WorkingGraph, a: NodeIdx, b: NodeIdx) -> Result<f64> {
    Ok(graph.min_node_dist(a, b)? + (graph.node(a).new_y - graph.node(b).new_y).abs())
}

/// BFS over the graph reachable from `start` without crossing `excluded`.
fn connected_component_without_edge(graph: &WorkingGraph, start: NodeIdx, excluded: EdgeIdx) -> HashSet<NodeIdx> {
    let mut visited = HashSet::new();
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        for &edge_idx in &graph.node(current).connected_edges {
            if edge_idx == excluded {
                continue;
            }
            if let Some(neighbor) = graph.edge(edge_idx).connected_node(current) {
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }
    }

    visited
}

/// Pulls side branches in when they overhang their required minimum
/// spacing and doing so can't create a main-track collision or reconnect
/// a cycle.
pub fn shorten_normal_tracks(graph: &mut WorkingGraph) -> Result<()> {
    for edge_idx in graph.edge_indices().collect::<Vec<_>>() {
        let edge = graph.edge(edge_idx);
        let (source, target) = (edge.source, edge.target);

        let actual_dist = graph.node(target).new_x - graph.node(source).new_x;
        let overhang = actual_dist - default_node_dist(graph, source, target)?;
        if overhang <= 0.0 {
            continue;
        }

        let component = connected_component_without_edge(graph, source, edge_idx);
        let truly_disconnects = !component.contains(&target);
        let contains_main_track_node = component.iter().any(|&n| graph.node(n).is_part_of_main_track());
        if !truly_disconnects || contains_main_track_node {
            continue;
        }

        debug!(target: "layouting", "shortening overhanging branch by {overhang}");
        for &node_idx in &component {
            let node_y = graph.node(node_idx).new_y;
            graph.node_mut(node_idx).new_x += overhang;

            for other_edge_idx in graph.node(node_idx).connected_edges.clone() {
                if graph.edge(other_edge_idx).source != node_idx {
                    continue;
                }
                let skip_this_breakpoint = other_edge_idx == edge_idx
                    && graph.edge(other_edge_idx).breakpoint.map(|bp| bp.y == node_y).unwrap_or(false);
                if skip_this_breakpoint {
                    continue;
                }
                if let Some(bp) = graph.edge_mut(other_edge_idx).breakpoint.as_mut() {
                    bp.x += overhang;
                }
            }
        }
    }

    Ok(())
}

/// Rescales every node, breakpoint and signal distance into the caller's
/// requested output range. X is divided by
/// `2 * scale_factor`, Y by `scale_factor`; signal positions are
/// rescaled by each edge's pre/post horizontal-length ratio so their
/// relative placement on the edge survives the transform.
pub fn scale(graph: &mut WorkingGraph, topology: &mut Topology, scale_factor: f64) {
    let (min_x, _) = x_bounds(graph);
    let min_y = graph
        .node_indices()
        .map(|idx| graph.node(idx).new_y)
        .fold(f64::INFINITY, f64::min);

    let old_horizontal_lengths: Vec<f64> = graph.edge_indices().map(|idx| graph.horizontal_length(idx)).collect();

    for idx in graph.node_indices().collect::<Vec<_>>() {
        let node = graph.node_mut(idx);
        node.new_x = (node.new_x - min_x) / (2.0 * scale_factor);
        node.new_y = (node.new_y - min_y) / scale_factor;
    }

    for edge_idx in graph.edge_indices().collect::<Vec<_>>() {
        if let Some(bp) = graph.edge_mut(edge_idx).breakpoint.as_mut() {
            bp.x = (bp.x - min_x) / (2.0 * scale_factor);
            bp.y = (bp.y - min_y) / scale_factor;
        }
    }

    for (i, edge_idx) in graph.edge_indices().enumerate() {
        let old_length = old_horizontal_lengths[i];
        if old_length == 0.0 {
            continue;
        }
        let ratio = graph.horizontal_length(edge_idx) / old_length;
        let topology_id = graph.edge(edge_idx).topology_id;
        if let Some(topo_edge) = topology.edges.get_mut(&topology_id) {
            for signal in topo_edge.signals.iter_mut() {
                signal.distance_edge *= ratio;
            }
        }
    }
}
