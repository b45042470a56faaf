//! Tighten separator (spec §4.3 step 9, SPEC_FULL §C.2): the one cut
//! metamorphosis implemented concretely here. Shrinks an active comb's
//! handle by one tour position at a time and keeps the result only if it
//! re-verifies as tight at the incumbent tour and still violated by `x*` —
//! decker/handling/teething are left as documented extension points
//! (`DESIGN.md`), this transform is the one spec.md names that has a
//! simple, checkable acceptance criterion.

use crate::clique::CliqueHandle;
use crate::hypergraph::{CutSense, CutType, HyperGraph};
use crate::lp::EPSILON;
use crate::sep::{SeparationContext, Separator};
use tsp_core::instance::node::Node;

pub struct TightenSeparator;

impl Separator for TightenSeparator {
    fn name(&self) -> &'static str {
        "tighten"
    }

    fn separate(&mut self, ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        let tour_len = ctx.tour.node_count();
        let mut found = Vec::new();

        for cut in ctx.ext_cuts.cuts() {
            if cut.cut_type() != CutType::Comb {
                continue;
            }
            let Some(cliques) = cut.cliques() else {
                continue;
            };
            let Some(handle) = cliques.first() else {
                continue;
            };
            let segs = handle.segments();
            if segs.len() != 1 {
                continue;
            }
            let seg = segs[0];
            if seg.len(tour_len) <= 4 {
                continue;
            }

            let new_start = (seg.start + 1) % tour_len;
            let new_handle_nodes = positions_between(new_start, seg.end, tour_len)
                .into_iter()
                .map(|p| ctx.tour.node_at(p))
                .collect();

            let mut node_sets = vec![new_handle_nodes];
            for tooth_clq in &cliques[1..] {
                node_sets.push(clique_nodes(ctx, tooth_clq, tour_len));
            }

            let candidate = HyperGraph::new_standard(cut.sense(), cut.rhs(), node_sets, ctx.clique_bank);
            if re_verify(&candidate, ctx) {
                found.push(candidate);
            }
        }

        Ok(found)
    }
}

fn positions_between(start: usize, end: usize, tour_len: usize) -> Vec<usize> {
    let seg = crate::clique::Segment::new(start, end);
    (0..tour_len).filter(|&p| seg.contains_pos(p)).collect()
}

fn clique_nodes(ctx: &SeparationContext<'_>, clq: &CliqueHandle, tour_len: usize) -> Vec<Node> {
    (0..tour_len)
        .filter(|&p| clq.contains_pos(p))
        .map(|p| ctx.tour.node_at(p))
        .collect()
}

fn re_verify(candidate: &HyperGraph, ctx: &SeparationContext<'_>) -> bool {
    let mut lhs_x = 0.0;
    let mut lhs_tour = 0.0;
    for (idx, edge) in ctx.core_graph.edges().iter().enumerate() {
        let c = candidate.get_coeff(edge.ends[0], edge.ends[1]);
        if c == 0.0 {
            continue;
        }
        lhs_x += c * ctx.edge_value(idx);
        if ctx.tour.tour_edges()[idx] {
            lhs_tour += c;
        }
    }

    if (lhs_tour - candidate.rhs()).abs() > EPSILON {
        return false;
    }

    match candidate.sense() {
        CutSense::Greater => lhs_x < candidate.rhs() - EPSILON,
        CutSense::Less => lhs_x > candidate.rhs() + EPSILON,
        CutSense::Equal => false,
    }
}
