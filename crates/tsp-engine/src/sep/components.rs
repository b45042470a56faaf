//! Connected-components SEC separator (spec §4.3 step 3): only fires when
//! the support graph of `x*` is disconnected, adding one SEC per component.

use crate::hypergraph::{CutSense, HyperGraph};
use crate::lp::EPSILON;
use crate::sep::{SeparationContext, Separator};

pub struct ComponentsSeparator;

impl Separator for ComponentsSeparator {
    fn name(&self) -> &'static str {
        "components"
    }

    fn separate(&mut self, ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        let n = ctx.tour.node_count();
        let mut seen = vec![false; n];
        let mut components: Vec<Vec<usize>> = Vec::new();

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
                    if ctx.edge_value(adj.edge_index) > EPSILON {
                        let v = ctx.tour.position_of(adj.neighbor);
                        if !seen[v] {
                            seen[v] = true;
                            comp.push(v);
                            stack.push(v);
                        }
                    }
                }
            }
            components.push(comp);
        }

        if components.len() < 2 {
            return Ok(Vec::new());
        }

        let cuts = components
            .into_iter()
            .map(|comp| {
                let nodes = comp.into_iter().map(|pos| ctx.tour.node_at(pos)).collect();
                HyperGraph::new_standard(CutSense::Greater, 2.0, vec![nodes], ctx.clique_bank)
            })
            .collect();
        Ok(cuts)
    }
}
