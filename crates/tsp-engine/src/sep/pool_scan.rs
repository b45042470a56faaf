//! Pool scan separator (spec §4.3 step 1): before running any real
//! separation, rescan every cut the LP previously demoted (zero-slack
//! pruning in `CoreLP::handle_aug`) and re-promote any that `x*` violates
//! again — cheap relative to a fresh search since the row's coefficients
//! already exist, just against a clique bank that may predate the current
//! tour. Only [`CutType::Comb`] cuts are rebuilt here; [`CutType::Domino`]
//! cuts (the pool's other occupant, per `CutPool`'s demotion policy) have
//! no clique-list accessor yet and are left in the pool.

use crate::hypergraph::{CutSense, CutType, HyperGraph};
use crate::lp::EPSILON;
use crate::sep::{SeparationContext, Separator};
use tsp_core::instance::node::Node;

pub struct PoolScanSeparator;

impl Separator for PoolScanSeparator {
    fn name(&self) -> &'static str {
        "pool_scan"
    }

    fn separate(&mut self, ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        let mut found = Vec::new();

        for cut in ctx.ext_cuts.pool().cuts() {
            if cut.cut_type() != CutType::Comb {
                continue;
            }

            let lhs: f64 = ctx
                .core_graph
                .edges()
                .iter()
                .enumerate()
                .map(|(idx, e)| cut.get_coeff(e.ends[0], e.ends[1]) * ctx.edge_value(idx))
                .sum();

            let violated = match cut.sense() {
                CutSense::Greater => lhs < cut.rhs() - EPSILON,
                CutSense::Less => lhs > cut.rhs() + EPSILON,
                CutSense::Equal => false,
            };

            if !violated {
                continue;
            }

            if let Some(rebuilt) = rebuild(cut, ctx) {
                found.push(rebuilt);
            }
        }

        Ok(found)
    }
}

/// Reconstructs `cut`'s node sets against its original clique bank and
/// re-interns them against the current one, producing a fresh row with
/// identical coefficients.
fn rebuild(cut: &HyperGraph, ctx: &SeparationContext<'_>) -> Option<HyperGraph> {
    let cliques = cut.cliques()?;
    let bank = cut.clique_bank()?;
    let bank_ref = bank.borrow();
    let saved_tour = bank_ref.saved_tour();

    let node_sets: Vec<Vec<Node>> = cliques
        .iter()
        .map(|clq| {
            (0..saved_tour.len())
                .filter(|&p| clq.contains_pos(p))
                .map(|p| saved_tour[p])
                .collect()
        })
        .collect();
    drop(bank_ref);

    Some(HyperGraph::new_standard(cut.sense(), cut.rhs(), node_sets, ctx.clique_bank))
}
