//! A minimum-cut primitive, played by this crate the same role
//! `lp/reference.rs` plays for the LP solver: spec §1/§6 list "Concorde's
//! ...min-cut...routines" as an assumed-available external primitive; this
//! module is the concrete stand-in.
//!
//! Implements the Stoer–Wagner global minimum cut algorithm on a dense,
//! nonnegative-weight undirected graph.

/// Computes a global minimum cut of `capacity` (a symmetric `n x n` weight
/// matrix, zero diagonal). Returns the cut's weight and a `true`/`false`
/// bipartition of the `n` nodes. Panics if `capacity` has fewer than 2 rows.
pub fn global_min_cut(capacity: &[Vec<f64>]) -> (f64, Vec<bool>) {
    let n = capacity.len();
    assert!(n >= 2, "min cut needs at least two nodes");

    let mut weights = capacity.to_vec();
    let mut active: Vec<usize> = (0..n).collect();
    let mut merged_into: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    let mut best_weight = f64::MAX;
    let mut best_side: Vec<usize> = Vec::new();

    while active.len() > 1 {
        let (cut_weight, last_two) = min_cut_phase(&weights, &active);
        if cut_weight < best_weight {
            best_weight = cut_weight;
            best_side = merged_into[last_two.1].clone();
        }
        merge_vertices(&mut weights, &mut active, &mut merged_into, last_two.0, last_two.1);
    }

    let mut partition = vec![false; n];
    for node in best_side {
        partition[node] = true;
    }
    (best_weight, partition)
}

/// One "minimum cut phase" (maximum adjacency ordering): grows an ordered
/// set `A` one most-tightly-connected vertex at a time; returns the weight
/// of the cut separating the last-added vertex from the rest, plus the
/// (second-to-last, last) pair to merge.
fn min_cut_phase(weights: &[Vec<f64>], active: &[usize]) -> (f64, (usize, usize)) {
    let mut in_a = vec![false; weights.len()];
    let start = active[0];
    in_a[start] = true;
    let mut order = vec![start];

    let mut conn: Vec<f64> = vec![0.0; weights.len()];
    for &v in active {
        conn[v] = weights[start][v];
    }

    let mut prev = start;
    let mut last = start;
    for _ in 1..active.len() {
        let &next = active
            .iter()
            .filter(|&&v| !in_a[v])
            .max_by(|&&a, &&b| conn[a].partial_cmp(&conn[b]).unwrap())
            .expect("active set nonempty");
        prev = last;
        last = next;
        in_a[next] = true;
        order.push(next);
        for &v in active {
            if !in_a[v] {
                conn[v] += weights[next][v];
            }
        }
    }

    let cut_weight = conn[last];
    (cut_weight, (prev, last))
}

/// Merges vertex `b` into vertex `a`: sums edge weights, removes `b` from
/// the active set, and records that `a`'s merged group now also covers
/// everything `b` covered.
fn merge_vertices(
    weights: &mut [Vec<f64>],
    active: &mut Vec<usize>,
    merged_into: &mut [Vec<usize>],
    a: usize,
    b: usize,
) {
    for v in 0..weights.len() {
        if v == a || v == b {
            continue;
        }
        let wb = weights[b][v];
        weights[a][v] += wb;
        weights[v][a] += wb;
    }
    let grown = std::mem::take(&mut merged_into[b]);
    merged_into[a].extend(grown);
    active.retain(|&v| v != b);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_separates_a_weakly_connected_pair() {
        // 0-1-2-3 path, 1-2 is the lightest edge.
        let mut w = vec![vec![0.0; 4]; 4];
        w[0][1] = 5.0;
        w[1][0] = 5.0;
        w[1][2] = 1.0;
        w[2][1] = 1.0;
        w[2][3] = 5.0;
        w[3][2] = 5.0;

        let (weight, side) = global_min_cut(&w);
        assert!((weight - 1.0).abs() < 1e-9);
        assert_ne!(side[0], side[3]);
        assert_eq!(side[0], side[1]);
        assert_eq!(side[2], side[3]);
    }
}
