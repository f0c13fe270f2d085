//! Vertical positioning: the first DFS. Walks each start node
//! in the order computed by `graph::ordering`, assigning integer Y indices
//! and inserting breakpoints purely for row coordination. Those
//! breakpoints are dropped again at the end of the stage; horizontal
//! positioning re-places them authoritatively by X.

use log::{debug, info};

use crate::error::{LayoutError, Result};
use crate::graph::{Breakpoint, NodeIdx, WorkingGraph};

use super::common::{generation_direction, order_by_slope};

pub fn generate_vertical_positions(graph: &mut WorkingGraph) -> Result<()> {
    info!(target: "layouting", "vertical positioning: {} start nodes", graph.start_nodes().len());

    for start in graph.start_nodes_in_order() {
        let visited_max_y = graph
            .visited_node_indices()
            .map(|idx| graph.node(idx).new_y)
            .fold(f64::NEG_INFINITY, f64::max);
        let candidate = visited_max_y.max(graph.breakpoint_max_y());
        let vertical_idx = if candidate.is_finite() { candidate + 1.0 } else { 0.0 };

        generate_from_node(graph, start, 0.0, vertical_idx)?;
    }

    graph.reset_generation_helpers();
    graph.reset_intermediate_breakpoints();
    Ok(())
}

fn generate_from_node(graph: &mut WorkingGraph, node: NodeIdx, mut horizontal_idx: f64, mut vertical_idx: f64) -> Result<()> {
    let predecessors = graph.node(node).predecessors.clone();
    if !predecessors.iter().all(|&p| graph.is_visited(p)) {
        graph.set_max_horizontal_idx(vertical_idx, f64::INFINITY);
        return Ok(());
    }

    if predecessors.len() == 2 {
        let node_original_y = graph.node(node).original_y;
        let (p0, p1) = (predecessors[0], predecessors[1]);
        let (p0_original_y, p1_original_y) = (graph.node(p0).original_y, graph.node(p1).original_y);
        let (p0_new_y, p1_new_y) = (graph.node(p0).new_y, graph.node(p1).new_y);

        if node_original_y <= p0_original_y && node_original_y <= p1_original_y {
            vertical_idx = p0_new_y.min(p1_new_y);
        }
        if node_original_y >= p0_original_y && node_original_y >= p1_original_y {
            vertical_idx = p0_new_y.max(p1_new_y);
        }
        for &pred in &predecessors {
            if let Some(edge_idx) = graph.get_edge(pred, node) {
                if let Some(bp) = graph.edge(edge_idx).breakpoint {
                    vertical_idx = bp.y;
                }
            }
        }
    }

    for &pred in &predecessors {
        let pred_new_y = graph.node(pred).new_y;
        let pred_new_x = graph.node(pred).new_x;
        let pred_dist = if graph.is_main_to_main_different(pred, node) {
            (pred_new_y - vertical_idx).abs()
        } else {
            (pred_new_y - vertical_idx).abs() + graph.min_node_dist(pred, node)?
        };
        horizontal_idx = horizontal_idx.max(pred_new_x + pred_dist);
    }

    for &pred in &predecessors {
        let pred_new_y = graph.node(pred).new_y;
        let both_main = graph.both_part_of_main_track(pred, node);
        if pred_new_y != vertical_idx && !both_main {
            let edge_idx = graph
                .get_edge(pred, node)
                .ok_or_else(|| LayoutError::EdgeNotFound(graph.node(pred).topology_id, graph.node(node).topology_id))?;
            if graph.edge(edge_idx).breakpoint.is_none() {
                let bp_x = horizontal_idx - (pred_new_y - vertical_idx).abs();
                graph.edge_mut(edge_idx).breakpoint = Some(Breakpoint { x: bp_x, y: pred_new_y });
                graph.set_max_horizontal_idx(pred_new_y, bp_x);
            }
        }
    }

    graph.node_mut(node).new_x = horizontal_idx;
    graph.node_mut(node).new_y = vertical_idx;
    graph.mark_visited(node);
    debug!(
        target: "layouting",
        "vertical: placed {} at ({}, {})",
        graph.node(node).name,
        horizontal_idx,
        vertical_idx
    );

    let successors = graph.node(node).successors.clone();
    match successors.as_slice() {
        [] => Ok(()),

        [only] => {
            if !graph.is_visited(*only) {
                let mut next_vertical = vertical_idx;
                let next_horizontal = horizontal_idx + graph.min_node_dist(node, *only)?;

                let other_preds: Vec<NodeIdx> = graph.node(*only).predecessors.iter().copied().filter(|&p| p != node).collect();
                let other_pred_has_breakpoint = other_preds
                    .iter()
                    .any(|&p| graph.get_edge(p, *only).map(|e| graph.edge(e).breakpoint.is_some()).unwrap_or(false));
                if other_pred_has_breakpoint {
                    next_vertical -= 1.0;
                }

                generate_from_node(graph, *only, next_horizontal, next_vertical)?;
            }
            Ok(())
        }

        [n0, n1] => {
            let (higher, lower) = order_by_slope(graph, node, *n0, *n1);
            let (first, second, dy) = generation_direction(graph, node, higher, lower);

            if !graph.is_visited(first) {
                let (horizontal_offset, vertical_offset) = if graph.both_part_of_main_track(node, first) {
                    let horizontal_offset = graph.min_node_dist(node, first)? - 1.0;
                    (horizontal_offset, dy * horizontal_offset)
                } else {
                    let vertical_offset = dy;
                    let target_y = vertical_idx + vertical_offset;
                    if horizontal_idx < graph.max_horizontal_idx_at(target_y) {
                        graph.shift_existing_nodes(target_y);
                    }
                    graph.set_breakpoint(horizontal_idx + 1.0, target_y, node, first);
                    (graph.min_node_dist(node, first)? + 1.0, vertical_offset)
                };
                generate_from_node(graph, first, horizontal_idx + horizontal_offset, vertical_idx + vertical_offset)?;
            }

            if !graph.is_visited(second) {
                let next_horizontal = horizontal_idx + graph.min_node_dist(node, second)?;
                generate_from_node(graph, second, next_horizontal, vertical_idx)?;
            }
            Ok(())
        }

        _ => unreachable!("node degree invariant enforces at most two successors"),
    }
}
