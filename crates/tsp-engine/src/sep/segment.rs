//! Segment SEC separator (spec §4.3 step 2): enumerates tour-consecutive
//! intervals looking for `x(δ(S)) < 2`.
//!
//! A faithful `linsub` runs this in amortized `O(n)` total using a clever
//! running-sum trick; this implementation keeps the same incremental
//! running-sum idea per starting position but re-seeds it for every start,
//! giving `O(n)` per start and `O(n^2)` overall — adequate at the instance
//! sizes this crate is exercised at (see `DESIGN.md`).

use crate::hypergraph::{CutSense, HyperGraph};
use crate::lp::EPSILON;
use crate::sep::{SeparationContext, Separator};

pub struct SegmentSeparator;

impl Separator for SegmentSeparator {
    fn name(&self) -> &'static str {
        "segment"
    }

    fn separate(&mut self, ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        let n = ctx.tour.node_count();
        let mut found = Vec::new();
        if n < 4 {
            return Ok(found);
        }

        for start in 0..n {
            let mut in_window = vec![false; n];
            in_window[start] = true;
            let mut internal = 0.0_f64;

            // Degree equations force every feasible x* to have exact
            // per-node degree 2, so x(delta(S)) = 2|S| - 2*internal(S).
            for len in 2..n {
                let pos = (start + len - 1) % n;
                let node = ctx.tour.node_at(pos);
                for adj in ctx.core_graph.adjacency(node) {
                    let npos = ctx.tour.position_of(adj.neighbor);
                    if in_window[npos] {
                        internal += ctx.edge_value(adj.edge_index);
                    }
                }
                in_window[pos] = true;

                let cut_value = 2.0 * len as f64 - 2.0 * internal;
                if cut_value < 2.0 - EPSILON {
                    let nodes = (0..len).map(|k| ctx.tour.node_at((start + k) % n)).collect();
                    found.push(HyperGraph::new_standard(
                        CutSense::Greater,
                        2.0,
                        vec![nodes],
                        ctx.clique_bank,
                    ));
                }
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clique::CliqueBank;
    use crate::config::EngineConfig;
    use crate::external_cuts::ExternalCuts;
    use crate::graph::{CoreGraph, GraphEdge};
    use crate::tooth::ToothBank;
    use crate::tour::TourBank;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tsp_core::instance::distance::Distance;
    use tsp_core::instance::node::Node;

    #[test]
    fn finds_violated_interval() {
        let mut g = CoreGraph::new(4);
        g.add_edge(GraphEdge::new(Node(0), Node(1), Distance(1)));
        g.add_edge(GraphEdge::new(Node(1), Node(2), Distance(1)));
        g.add_edge(GraphEdge::new(Node(2), Node(3), Distance(1)));
        g.add_edge(GraphEdge::new(Node(3), Node(0), Distance(1)));
        let tour =
            TourBank::from_node_order(&g, vec![Node(0), Node(1), Node(2), Node(3)]).unwrap();

        // x*: the 0-1 and 2-3 edges at 1.0, the 1-2 and 3-0 edges at 0.0,
        // with two half-weight chords closing each degree (not modeled
        // here — instead just drop 1-2 and 3-0 to 0.2 to keep degree sums
        // plausible for the test's purpose: violate the {0,1} cut).
        let x = vec![1.0, 0.2, 1.0, 0.2];

        let perm = tour.perm().to_vec();
        let clique_bank = Rc::new(RefCell::new(CliqueBank::new(tour.tour_nodes().to_vec(), perm.clone())));
        let tooth_bank = Rc::new(RefCell::new(ToothBank::new(tour.tour_nodes().to_vec(), perm)));
        let ext_cuts = ExternalCuts::new();
        let config = EngineConfig::default();

        let ctx = SeparationContext {
            x: &x,
            core_graph: &g,
            tour: &tour,
            clique_bank: &clique_bank,
            tooth_bank: &tooth_bank,
            ext_cuts: &ext_cuts,
            config: &config,
        };

        let mut sep = SegmentSeparator;
        let cuts = sep.separate(&ctx).unwrap();
        assert!(!cuts.is_empty());
    }
}
