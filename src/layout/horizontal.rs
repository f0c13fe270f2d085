//! Horizontal positioning: the second DFS. Y is already fixed
//! by vertical positioning; this pass assigns integer X honoring the
//! minimum-spacing invariant and places the breakpoints that survive into
//! the final drawing.

use log::{debug, info};

use crate::error::{LayoutError, Result};
use crate::graph::{Breakpoint, NodeIdx, WorkingGraph};

use super::common::{generation_direction, order_by_slope};

pub fn generate_horizontal_positions(graph: &mut WorkingGraph) -> Result<()> {
    let mut starts = graph.start_nodes();
    starts.sort_by(|&a, &b| graph.node(a).new_y.partial_cmp(&graph.node(b).new_y).unwrap());
    info!(target: "layouting", "horizontal positioning: {} start nodes", starts.len());

    for start in starts {
        generate_from_node(graph, start, 0.0)?;
    }

    graph.reset_generation_helpers();
    Ok(())
}

fn generate_from_node(graph: &mut WorkingGraph, node: NodeIdx, mut horizontal_idx: f64) -> Result<()> {
    let predecessors = graph.node(node).predecessors.clone();
    if !predecessors.iter().all(|&p| graph.is_visited(p)) {
        return Ok(());
    }

    let node_y = graph.node(node).new_y;

    for &pred in &predecessors {
        let pred_new_y = graph.node(pred).new_y;
        let pred_new_x = graph.node(pred).new_x;
        let pred_dist = if graph.is_main_to_main_different(pred, node) {
            (pred_new_y - node_y).abs()
        } else {
            (pred_new_y - node_y).abs() + graph.min_node_dist(pred, node)?
        };
        horizontal_idx = horizontal_idx.max(pred_new_x + pred_dist);
    }

    for &pred in &predecessors {
        let pred_new_y = graph.node(pred).new_y;
        let both_main = graph.both_part_of_main_track(pred, node);
        if pred_new_y != node_y && !both_main {
            let edge_idx = graph
                .get_edge(pred, node)
                .ok_or_else(|| LayoutError::EdgeNotFound(graph.node(pred).topology_id, graph.node(node).topology_id))?;
            if graph.edge(edge_idx).breakpoint.is_none() {
                let bp_x = horizontal_idx - (pred_new_y - node_y).abs();
                graph.edge_mut(edge_idx).breakpoint = Some(Breakpoint { x: bp_x, y: pred_new_y });
            }
        }
    }

    graph.node_mut(node).new_x = horizontal_idx;
    graph.mark_visited(node);
    debug!(target: "layouting", "horizontal: placed {} at x={}", graph.node(node).name, horizontal_idx);

    let successors = graph.node(node).successors.clone();
    match successors.as_slice() {
        [] => Ok(()),

        [only] => {
            if !graph.is_visited(*only) {
                let next_horizontal = horizontal_idx + graph.min_node_dist(node, *only)?;
                generate_from_node(graph, *only, next_horizontal)?;
            }
            Ok(())
        }

        [n0, n1] => {
            let (higher, lower) = order_by_slope(graph, node, *n0, *n1);
            let (first, second, _dy) = generation_direction(graph, node, higher, lower);

            if !graph.is_visited(first) {
                let horizontal_offset = if graph.both_part_of_main_track(node, first) {
                    graph.min_node_dist(node, first)? - 1.0
                } else {
                    let first_y = graph.node(first).new_y;
                    let y_dist = (node_y - first_y).abs();
                    graph.set_breakpoint(horizontal_idx + y_dist, first_y, node, first);
                    graph.min_node_dist(node, first)? + y_dist
                };
                generate_from_node(graph, first, horizontal_idx + horizontal_offset)?;
            }

            if !graph.is_visited(second) {
                let next_horizontal = horizontal_idx + graph.min_node_dist(node, second)?;
                generate_from_node(graph, second, next_horizontal)?;
            }
            Ok(())
        }

        _ => unreachable!("node degree invariant enforces at most two successors"),
    }
}
