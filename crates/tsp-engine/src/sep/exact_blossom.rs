//! Exact blossom separator (spec §4.3 step 6): for each fractional edge,
//! runs a min cut on capacities with tour-edge weights flipped to bias the
//! cut toward an odd handle separating that edge's endpoints.

use std::collections::HashSet;

use crate::hypergraph::HyperGraph;
use crate::lp::EPSILON;
use crate::sep::mincut::global_min_cut;
use crate::sep::{SeparationContext, Separator};

pub struct ExactBlossomSeparator;

impl Separator for ExactBlossomSeparator {
    fn name(&self) -> &'static str {
        "exact_blossom"
    }

    fn separate(&mut self, ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        let n = ctx.tour.node_count();
        if n < 6 {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        let mut tried: HashSet<(usize, usize)> = HashSet::new();

        for (idx, edge) in ctx.core_graph.edges().iter().enumerate() {
            let x = ctx.edge_value(idx);
            if !(EPSILON..=1.0 - EPSILON).contains(&x) {
                continue;
            }

            let pu = ctx.tour.position_of(edge.ends[0]);
            let pv = ctx.tour.position_of(edge.ends[1]);
            let key = (pu.min(pv), pu.max(pv));
            if !tried.insert(key) {
                continue;
            }

            if let Some(cut) = search_handle(ctx, pu, pv) {
                found.push(cut);
            }
        }

        Ok(found)
    }
}

fn search_handle(ctx: &SeparationContext<'_>, pu: usize, pv: usize) -> Option<HyperGraph> {
    let n = ctx.tour.node_count();
    let mut cap = vec![vec![0.0_f64; n]; n];

    for e in ctx.core_graph.edges() {
        let i = ctx.tour.position_of(e.ends[0]);
        let j = ctx.tour.position_of(e.ends[1]);
        let idx = ctx.core_graph.find_edge_index(e.ends[0], e.ends[1])?;
        let x = ctx.edge_value(idx);
        let is_tour_edge = (j + n - i) % n == 1 || (i + n - j) % n == 1;
        let weight = if is_tour_edge { 1.0 - x } else { x };
        cap[i][j] += weight;
        cap[j][i] += weight;
    }
    // Bias the cut toward separating pu from pv.
    cap[pu][pv] = 0.0;
    cap[pv][pu] = 0.0;

    let (weight, side) = global_min_cut(&cap);
    if weight >= 1.0 - EPSILON || side[pu] == side[pv] {
        return None;
    }

    let handle_side = side[pu];
    let handle_positions: Vec<usize> = (0..n).filter(|&p| side[p] == handle_side).collect();
    if handle_positions.len() % 2 == 0 || handle_positions.len() < 3 || handle_positions.len() >= n - 2 {
        return None;
    }

    super::singleton_teeth_comb(ctx, &handle_positions)
}
