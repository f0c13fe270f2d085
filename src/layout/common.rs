//! Successor-ordering helpers shared by vertical and horizontal
//! positioning; both stages use the identical tie-break.

use crate::graph::{NodeIdx, WorkingGraph};

/// Orders a node's two successors by ascending slope from `node`: the one
/// with the smaller slope is "higher". Vertical edges are ruled out at
/// construction time, so the slope is always defined here.
pub fn order_by_slope(graph: &WorkingGraph, node: NodeIdx, n0: NodeIdx, n1: NodeIdx) -> (NodeIdx, NodeIdx) {
    let slope0 = graph
        .slope_between(node, n0)
        .expect("VerticalEdge is rejected at construction");
    let slope1 = graph
        .slope_between(node, n1)
        .expect("VerticalEdge is rejected at construction");
    if slope0 < slope1 {
        (n0, n1)
    } else {
        (n1, n0)
    }
}

/// Returns `(first, second, dy)`: which successor to recurse into first,
/// which second, and the vertical-offset sign to apply for the first.
/// A node on a main track always recurses into its own track's neighbor
/// last; otherwise the taller-subtree successor goes first.
pub fn generation_direction(graph: &WorkingGraph, node: NodeIdx, higher: NodeIdx, lower: NodeIdx) -> (NodeIdx, NodeIdx, f64) {
    if graph.node(node).is_part_of_main_track() {
        let node_track = graph.node(node).main_track();
        if node_track == graph.node(higher).main_track() {
            return (lower, higher, 1.0);
        }
        if node_track == graph.node(lower).main_track() {
            return (higher, lower, -1.0);
        }
    }

    if graph.node(higher).height.unwrap_or(0) >= graph.node(lower).height.unwrap_or(0) {
        (lower, higher, 1.0)
    } else {
        (higher, lower, -1.0)
    }
}
