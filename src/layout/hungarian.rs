//! Minimum-cost bipartite assignment (Kuhn-Munkres / Hungarian algorithm),
//! O(n^2 * m) for an n x m cost matrix with n <= m. Signal placement uses
//! it to match each signal to a distinct grid slot. Vendored in-tree rather
//! than pulled from an external optimization crate: this repo's
//! graph-layout code already carries its own nontrivial algorithms in-tree
//! instead of depending on one.

const INF: f64 = f64::INFINITY;

/// Returns `assignment` of length `cost.len()` where `assignment[i]` is the
/// column assigned to row `i`, minimizing total assigned cost. Requires
/// `cost.len() <= cost[0].len()` (at least as many columns as rows) and
/// every row the same length.
pub fn min_cost_assignment(cost: &[Vec<f64>]) -> Vec<usize> {
    let n = cost.len();
    if n == 0 {
        return Vec::new();
    }
    let m = cost[0].len();
    debug_assert!(
        cost.iter().all(|row| row.len() == m),
        "cost matrix rows must all have the same length"
    );
    debug_assert!(n <= m, "min_cost_assignment requires at least as many columns as rows");

    // 1-indexed dual potentials and parent pointers, as in the classical
    // shortest-augmenting-path formulation of the algorithm.
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; m + 1];
    let mut p = vec![0usize; m + 1]; // p[j] = row currently matched to column j (0 = unmatched)
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![INF; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = INF;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let cur = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n + 1];
    for (j, &row) in p.iter().enumerate().skip(1) {
        if row != 0 {
            assignment[row] = j - 1;
        }
    }
    assignment[1..=n].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_each_row_a_distinct_column_minimizing_total_cost() {
        let cost = vec![vec![4.0, 1.0, 3.0], vec![2.0, 0.0, 5.0]];
        let assignment = min_cost_assignment(&cost);
        assert_eq!(assignment.len(), 2);
        assert_ne!(assignment[0], assignment[1]);
        let total: f64 = assignment.iter().enumerate().map(|(i, &j)| cost[i][j]).sum();
        assert_eq!(total, 1.0 + 2.0);
    }

    #[test]
    fn single_signal_picks_closest_position() {
        let cost = vec![vec![0.9, 0.1, 0.5, 0.8]];
        let assignment = min_cost_assignment(&cost);
        assert_eq!(assignment, vec![1]);
    }

    #[test]
    fn square_matrix_finds_optimal_permutation() {
        let cost = vec![vec![9.0, 2.0, 7.0], vec![6.0, 4.0, 3.0], vec![5.0, 8.0, 1.0]];
        let assignment = min_cost_assignment(&cost);
        let total: f64 = assignment.iter().enumerate().map(|(i, &j)| cost[i][j]).sum();
        assert_eq!(total, 2.0 + 6.0 + 1.0);
    }

    #[test]
    fn empty_input_returns_empty() {
        let cost: Vec<Vec<f64>> = Vec::new();
        assert!(min_cost_assignment(&cost).is_empty());
    }
}
