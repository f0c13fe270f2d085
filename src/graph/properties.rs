//! Height, depth and reachability computation.
//! Each is computed once, right after predecessor/successor classification,
//! and never recomputed afterwards.

use std::collections::{HashSet, VecDeque};

use super::node::NodeIdx;
use super::WorkingGraph;

impl WorkingGraph {
    /// `height(n) = 0` if `n` has no successors, else `1 + max(height(s))`.
    /// Memoized DFS from every node.
    pub(crate) fn compute_heights(&mut self) {
        for idx in self.node_indices() {
            self.compute_height(idx);
        }
    }

    fn compute_height(&mut self, idx: NodeIdx) -> u32 {
        if let Some(h) = self.nodes[idx.0].height {
            return h;
        }
        let successors = self.nodes[idx.0].successors.clone();
        let height = if successors.is_empty() {
            0
        } else {
            1 + successors
                .iter()
                .map(|&s| self.compute_height(s))
                .max()
                .unwrap_or(0)
        };
        self.nodes[idx.0].height = Some(height);
        height
    }

    /// BFS from the start nodes; `depth(n) = current + 1` once every
    /// predecessor of `n` already has a depth.
    pub(crate) fn compute_depths(&mut self) {
        let mut queue = VecDeque::new();

        for idx in self.node_indices() {
            if self.nodes[idx.0].is_start_node() {
                self.nodes[idx.0].depth = Some(0);
                queue.push_back(idx);
            }
        }

        while let Some(current) = queue.pop_front() {
            let current_depth = self.nodes[current.0].depth.unwrap();
            let neighbors: Vec<NodeIdx> = self.nodes[current.0]
                .connected_edges
                .iter()
                .filter_map(|&e| self.edges[e.0].connected_node(current))
                .collect();

            for neighbor in neighbors {
                let already_has_depth = self.nodes[neighbor.0].depth.is_some();
                let all_preds_have_depth = self.nodes[neighbor.0]
                    .predecessors
                    .iter()
                    .all(|&p| self.nodes[p.0].depth.is_some());

                if !already_has_depth && all_preds_have_depth {
                    self.nodes[neighbor.0].depth = Some(current_depth + 1);
                    queue.push_back(neighbor);
                }
            }
        }
    }

    /// `reachable(n) = successors(n) U (union over s in successors) reachable(s)`;
    /// `reaching(n)` is built as the inverse once every forward set is known.
    pub(crate) fn compute_reachability(&mut self) {
        let mut memo: Vec<Option<HashSet<NodeIdx>>> = vec![None; self.nodes.len()];

        for idx in self.node_indices() {
            self.reachable_memoized(idx, &mut memo);
        }

        for idx in self.node_indices() {
            let reachable = memo[idx.0].clone().unwrap_or_default();
            for &r in &reachable {
                self.nodes[r.0].reaching_nodes.insert(idx);
            }
            self.nodes[idx.0].reachable_nodes = reachable;
        }
    }

    fn reachable_memoized(&self, idx: NodeIdx, memo: &mut Vec<Option<HashSet<NodeIdx>>>) -> HashSet<NodeIdx> {
        if let Some(set) = &memo[idx.0] {
            return set.clone();
        }
        let mut reachable = HashSet::new();
        for &succ in self.nodes[idx.0].successors.clone().iter() {
            reachable.insert(succ);
            reachable.extend(self.reachable_memoized(succ, memo));
        }
        memo[idx.0] = Some(reachable.clone());
        reachable
    }
}
