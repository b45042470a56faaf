//! Fast (heuristic) blossom separator (spec §4.3 step 4): looks for odd
//! handles among the connected components of the "fractional support"
//! subgraph — the edges with `0 < x_e < 1` — and pairs each with a
//! singleton tooth at its most-fractional boundary edge.
//!
//! This is the heuristic Camargue runs before the exact min-cut based
//! search (`sep::exact_blossom`); it catches the common case where
//! fractional weight already clusters into an odd-sized blob touching the
//! rest of the graph through a handful of boundary edges.

use crate::hypergraph::HyperGraph;
use crate::lp::EPSILON;
use crate::sep::{SeparationContext, Separator};

pub struct FastBlossomSeparator;

impl Separator for FastBlossomSeparator {
    fn name(&self) -> &'static str {
        "fast_blossom"
    }

    fn separate(&mut self, ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        let n = ctx.tour.node_count();
        let mut seen = vec![false; n];
        let mut found = Vec::new();

        for start in 0..n {
            if seen[start] {
                continue;
            }
            let mut stack = vec![start];
            seen[start] = true;
            let mut comp = vec![start];
            while let Some(u) = stack.pop() {
                let node = ctx.tour.node_at(u);
                for adj in ctx.core_graph.adjacency(node) {
                    let x = ctx.edge_value(adj.edge_index);
                    if x > EPSILON && x < 1.0 - EPSILON {
                        let v = ctx.tour.position_of(adj.neighbor);
                        if !seen[v] {
                            seen[v] = true;
                            comp.push(v);
                            stack.push(v);
                        }
                    }
                }
            }

            if comp.len() % 2 == 1 && comp.len() >= 3 && comp.len() < n {
                if let Some(handle_cut) = super::singleton_teeth_comb(ctx, &comp) {
                    found.push(handle_cut);
                }
            }
        }

        Ok(found)
    }
}
