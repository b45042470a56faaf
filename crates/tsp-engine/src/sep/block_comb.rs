//! Block comb separator (spec §4.3 step 5): looks for odd handles among
//! the components formed by near-integral (`x ≈ 1`) edges — the blocks the
//! tour's near-tight structure already clusters into — distinct from
//! `fast_blossom`'s fractional-edge clustering.

use crate::lp::EPSILON;
use crate::sep::{SeparationContext, Separator};
use crate::hypergraph::HyperGraph;

pub struct BlockCombSeparator;

impl Separator for BlockCombSeparator {
    fn name(&self) -> &'static str {
        "block_comb"
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
                    if ctx.edge_value(adj.edge_index) > 1.0 - EPSILON {
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
                if let Some(cut) = super::singleton_teeth_comb(ctx, &comp) {
                    found.push(cut);
                }
            }
        }

        Ok(found)
    }
}
