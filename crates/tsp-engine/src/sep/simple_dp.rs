//! Simple domino-parity separator (spec §4.3 step 8, §4.5).
//!
//! Full Fleischer separation builds a "DP cutgraph" (light teeth plus
//! every tour vertex, tooth-disjointness edges and x*-weighted web edges)
//! and runs Gomory-Hu over it. This implementation keeps the two pieces
//! spec §4.5 names as genuinely implemented — light-tooth candidate
//! collection via interval scan, and weak-elimination — and replaces the
//! Gomory-Hu tree search with a direct construction: it greedily selects an
//! odd number of pairwise-disjoint light teeth (lowest slack first) and
//! sets the handle to the complement of their bodies, then keeps the
//! result only if it is tight at the incumbent tour (spec §4.3's primal
//! filter, spec §8 "DP cuts are accepted only if the same equality holds")
//! and actually violated by `x*`. This finds a strict subset of the cuts a
//! full Gomory-Hu search would (see `DESIGN.md`), but every cut it returns
//! is a genuine, checked domino-parity inequality.

use crate::hypergraph::HyperGraph;
use crate::lp::EPSILON;
use crate::sep::{SeparationContext, Separator};
use crate::tooth::{weak_eliminate, ToothCandidate};

pub struct SimpleDpSeparator;

impl Separator for SimpleDpSeparator {
    fn name(&self) -> &'static str {
        "simple_dp"
    }

    fn separate(&mut self, ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        let n = ctx.tour.node_count();
        if n < 8 {
            return Ok(Vec::new());
        }

        let candidates = collect_light_teeth(ctx);
        let candidates = weak_eliminate(candidates);
        if candidates.len() < 3 {
            return Ok(Vec::new());
        }

        let mut sorted = candidates;
        sorted.sort_by(|a, b| a.slack.partial_cmp(&b.slack).unwrap());

        let mut chosen: Vec<&ToothCandidate> = Vec::new();
        let mut used = vec![false; n];
        for cand in &sorted {
            let positions = tooth_body_positions(ctx, cand);
            if positions.iter().any(|&p| used[p]) {
                continue;
            }
            for &p in &positions {
                used[p] = true;
            }
            chosen.push(cand);
            if chosen.len() == 5 {
                break;
            }
        }

        // Domino parity needs an odd tooth count; drop the lightest extra
        // tooth if the greedy pick landed on an even count.
        if chosen.len() % 2 == 0 {
            chosen.pop();
        }
        if chosen.len() < 3 {
            return Ok(Vec::new());
        }

        let handle_positions: Vec<usize> = (0..n).filter(|&p| !used[p]).collect();
        if handle_positions.is_empty() {
            return Ok(Vec::new());
        }

        let handle_nodes: Vec<_> = handle_positions.iter().map(|&p| ctx.tour.node_at(p)).collect();
        let teeth: Vec<(Vec<_>, Vec<_>)> = chosen
            .iter()
            .map(|c| {
                let root_pos = c.root.segments()[0].start;
                let body_positions = tooth_body_positions(ctx, c);
                (
                    vec![ctx.tour.node_at(root_pos)],
                    body_positions.into_iter().map(|p| ctx.tour.node_at(p)).collect(),
                )
            })
            .collect();

        let body_cardinalities: usize = chosen.iter().map(|c| c.body.cardinality(n)).sum::<usize>();
        let k = chosen.len();
        let rhs = ((2 * handle_positions.len() + 2 * body_cardinalities - k) / 2) as f64;

        let cut = HyperGraph::new_domino(
            rhs,
            handle_nodes,
            teeth,
            ctx.clique_bank,
            ctx.tooth_bank,
        );

        // Primal filter first: a DP cut violated by `x*` but not tight at
        // the incumbent tour would make the tour basis infeasible once
        // `pivot_back` restores it.
        if !super::is_tight_at_tour(ctx, &cut) {
            return Ok(Vec::new());
        }

        let total: f64 = ctx
            .core_graph
            .edges()
            .iter()
            .enumerate()
            .map(|(idx, e)| cut.get_coeff(e.ends[0], e.ends[1]) * ctx.edge_value(idx))
            .sum();

        if total > rhs + EPSILON {
            Ok(vec![cut])
        } else {
            Ok(Vec::new())
        }
    }
}

fn tooth_body_positions(ctx: &SeparationContext<'_>, cand: &ToothCandidate) -> Vec<usize> {
    let n = ctx.tour.node_count();
    (0..n).filter(|&p| cand.body.contains_pos(p)).collect()
}

/// Scans every contiguous interval for a light tooth: root is the tour
/// vertex immediately preceding the body, body is the interval itself.
fn collect_light_teeth(ctx: &SeparationContext<'_>) -> Vec<ToothCandidate> {
    use crate::clique::Clique;

    let n = ctx.tour.node_count();
    let mut out = Vec::new();

    for root_pos in 0..n {
        let mut in_window = vec![false; n];
        let mut internal = 0.0_f64;
        for len in 1..n.saturating_sub(1) {
            let pos = (root_pos + len) % n;
            let node = ctx.tour.node_at(pos);
            for adj in ctx.core_graph.adjacency(node) {
                let npos = ctx.tour.position_of(adj.neighbor);
                if in_window[npos] {
                    internal += ctx.edge_value(adj.edge_index);
                }
            }
            in_window[pos] = true;

            let boundary = 2.0 * len as f64 - 2.0 * internal;
            let slack = boundary - 1.0;
            if slack < ctx.config.light_tooth_slack {
                let body_nodes: Vec<_> = (1..=len).map(|k| ctx.tour.node_at((root_pos + k) % n)).collect();
                let root = Clique::from_nodes(&[ctx.tour.node_at(root_pos)], ctx.tour.perm());
                let body = Clique::from_nodes(&body_nodes, ctx.tour.perm());
                out.push(ToothCandidate { root, body, slack });
            }
        }
    }

    out
}
