//! Signal redistribution. For each edge
//! side independently: build a grid of evenly spaced candidate positions,
//! solve a minimum-cost assignment between signals (by their current
//! fractional position) and grid slots, then write each signal's new
//! `distance_edge` back in rank order.

use log::debug;
use uuid::Uuid;

use crate::error::{LayoutError, Result};
use crate::graph::{EdgeIdx, WorkingGraph};
use crate::topology::{Signal, Topology, TopologyEdge};

use super::hungarian;

pub fn process_signals(graph: &WorkingGraph, topology: &mut Topology) -> Result<()> {
    for edge_idx in graph.edge_indices() {
        let signals_against = graph.edge(edge_idx).signals_against.clone();
        let signals_in = graph.edge(edge_idx).signals_in.clone();
        assign_side(graph, topology, edge_idx, &signals_against)?;
        assign_side(graph, topology, edge_idx, &signals_in)?;
    }
    Ok(())
}

/// The candidate grid for one edge side. Evenly spaced
/// positions strictly between the edge's endpoints, sized by the edge's
/// horizontal-only length, or, for a fully diagonal edge, by its full
/// horizontal length (capped to one signal per side).
fn candidate_grid(graph: &WorkingGraph, edge_idx: EdgeIdx, signal_count: usize) -> Result<Vec<f64>> {
    let horizontal_only_length = graph.horizontal_only_length(edge_idx);

    if horizontal_only_length > 0.0 {
        let epsilon = 1.0 / horizontal_only_length;
        let slots = (horizontal_only_length - 1.0).round().max(0.0) as usize;
        Ok(linspace(epsilon, 1.0 - epsilon, slots))
    } else {
        if signal_count > 1 {
            return Err(LayoutError::DiagonalSignalOverflow(graph.edge(edge_idx).topology_id));
        }
        let horizontal_length = graph.horizontal_length(edge_idx);
        let epsilon = 1.0 / (horizontal_length + 1.0);
        let slots = (horizontal_length + 2.0).round() as usize;
        Ok(linspace(epsilon, 1.0 - epsilon, slots))
    }
}

fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num as f64 - 1.0);
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}

fn assign_side(graph: &WorkingGraph, topology: &mut Topology, edge_idx: EdgeIdx, signal_ids: &[Uuid]) -> Result<()> {
    if signal_ids.is_empty() {
        return Ok(());
    }

    let topology_id = graph.edge(edge_idx).topology_id;
    let original_length = graph.edge(edge_idx).original_length;
    let positions = candidate_grid(graph, edge_idx, signal_ids.len())?;

    let inputs: Vec<f64> = {
        let topo_edge = topology
            .edges
            .get(&topology_id)
            .ok_or_else(|| edge_not_found(graph, edge_idx))?;
        signal_ids
            .iter()
            .map(|id| Ok(signal_on_edge(topo_edge, topology_id, *id)?.distance_edge / original_length))
            .collect::<Result<Vec<f64>>>()?
    };

    let cost: Vec<Vec<f64>> = inputs
        .iter()
        .map(|&input| positions.iter().map(|&slot| (input - slot).abs()).collect())
        .collect();
    let assignment = hungarian::min_cost_assignment(&cost);

    let mut assigned_positions: Vec<f64> = assignment.iter().map(|&col| positions[col]).collect();
    assigned_positions.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut rank_order: Vec<usize> = (0..signal_ids.len()).collect();
    rank_order.sort_by(|&a, &b| inputs[a].partial_cmp(&inputs[b]).unwrap_or(std::cmp::Ordering::Equal));

    for (rank, &slot_in_side) in rank_order.iter().enumerate() {
        let relative_position = assigned_positions[rank];
        let distance = graph.signal_distance_edge(edge_idx, relative_position)?;
        let signal_id = signal_ids[slot_in_side];
        let topo_edge = topology.edges.get_mut(&topology_id).ok_or_else(|| edge_not_found(graph, edge_idx))?;
        signal_on_edge_mut(topo_edge, topology_id, signal_id)?.distance_edge = distance;
        debug!(
            target: "layouting",
            "signal placement: edge {topology_id} signal {signal_id} -> relative position {relative_position}"
        );
    }

    Ok(())
}

/// Resolves a signal by id among an edge's signals, mirroring the
/// original's lookup-by-identity in `set_signal_position`.
fn signal_on_edge<'a>(topo_edge: &'a TopologyEdge, edge_id: Uuid, signal_id: Uuid) -> Result<&'a Signal> {
    topo_edge
        .signals
        .iter()
        .find(|s| s.id == signal_id)
        .ok_or(LayoutError::SignalNotOnEdge(signal_id, edge_id))
}

fn signal_on_edge_mut<'a>(topo_edge: &'a mut TopologyEdge, edge_id: Uuid, signal_id: Uuid) -> Result<&'a mut Signal> {
    topo_edge
        .signals
        .iter_mut()
        .find(|s| s.id == signal_id)
        .ok_or(LayoutError::SignalNotOnEdge(signal_id, edge_id))
}

fn edge_not_found(graph: &WorkingGraph, edge_idx: EdgeIdx) -> LayoutError {
    let edge = graph.edge(edge_idx);
    LayoutError::EdgeNotFound(graph.node(edge.source).topology_id, graph.node(edge.target).topology_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{SignalDirection, SignalSystem};

    fn edge_with_one_signal() -> TopologyEdge {
        TopologyEdge {
            id: Uuid::new_v4(),
            node_a: Uuid::new_v4(),
            node_b: Uuid::new_v4(),
            intermediate_geo_nodes: Vec::new(),
            signals: vec![Signal {
                id: Uuid::new_v4(),
                name: "60BS1".into(),
                distance_edge: 3.0,
                direction: SignalDirection::In,
                system: SignalSystem::Ks,
                kind: "main".into(),
            }],
            length: 10.0,
        }
    }

    #[test]
    fn signal_on_edge_finds_a_signal_by_id() {
        let edge = edge_with_one_signal();
        let signal_id = edge.signals[0].id;
        assert_eq!(signal_on_edge(&edge, edge.id, signal_id).unwrap().name, "60BS1");
    }

    #[test]
    fn signal_on_edge_reports_a_signal_missing_from_the_edge() {
        let edge = edge_with_one_signal();
        let stray_id = Uuid::new_v4();
        let err = signal_on_edge(&edge, edge.id, stray_id).unwrap_err();
        match err {
            LayoutError::SignalNotOnEdge(signal, edge_id) => {
                assert_eq!(signal, stray_id);
                assert_eq!(edge_id, edge.id);
            }
            other => panic!("expected SignalNotOnEdge, got {other:?}"),
        }
    }

    #[test]
    fn signal_on_edge_mut_reports_a_signal_missing_from_the_edge() {
        let mut edge = edge_with_one_signal();
        let stray_id = Uuid::new_v4();
        let edge_id = edge.id;
        assert!(matches!(
            signal_on_edge_mut(&mut edge, edge_id, stray_id),
            Err(LayoutError::SignalNotOnEdge(_, _))
        ));
    }
}
