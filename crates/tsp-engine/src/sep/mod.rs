//! The separation pipeline: a prioritized sequence of cut finders run over
//! the current fractional point (spec §4.3).
//!
//! Separators are pure functions of a [`SeparationContext`] snapshot — they
//! never touch the LP directly. The orchestration (pivot-back, add, pivot,
//! PH-ratio bookkeeping) lives in [`crate::solver`], which owns the
//! `CoreLP` these cuts get added to.

pub mod block_comb;
pub mod components;
pub mod exact_blossom;
pub mod fast_blossom;
pub mod local_cuts;
pub mod mincut;
pub mod pool_scan;
pub mod safe_gmi;
pub mod segment;
pub mod simple_dp;
pub mod tighten;

use std::cell::RefCell;
use std::rc::Rc;

use crate::clique::CliqueBank;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::external_cuts::ExternalCuts;
use crate::graph::CoreGraph;
use crate::hypergraph::HyperGraph;
use crate::lp::EPSILON;
use crate::tooth::ToothBank;
use crate::tour::TourBank;

/// A read-only snapshot handed to every separator: the current LP vector
/// plus the structures needed to build [`HyperGraph`]s against it.
pub struct SeparationContext<'a> {
    pub x: &'a [f64],
    pub core_graph: &'a CoreGraph,
    pub tour: &'a TourBank,
    pub clique_bank: &'a Rc<RefCell<CliqueBank>>,
    pub tooth_bank: &'a Rc<RefCell<ToothBank>>,
    pub ext_cuts: &'a ExternalCuts,
    pub config: &'a EngineConfig,
}

impl<'a> SeparationContext<'a> {
    /// The LP value currently assigned to edge `edge_index`.
    pub fn edge_value(&self, edge_index: usize) -> f64 {
        self.x[edge_index]
    }
}

/// One cut finder in the pipeline (spec §4.3). Implementations only read
/// `ctx`; any cut they return must be tight at the incumbent tour (the
/// "primal filter", checked via [`is_tight_at_tour`] by every separator that
/// doesn't get tightness for free by construction).
pub trait Separator {
    fn name(&self) -> &'static str;
    fn separate(&mut self, ctx: &SeparationContext<'_>) -> EngineResult<Vec<HyperGraph>>;
}

/// The fixed separator order from spec §4.3, steps 1-10 (minus the
/// metamorphoses/consecutive-1 steps, which `sep::tighten` covers as the one
/// concretely implemented metamorphosis — see `DESIGN.md`).
pub fn default_pipeline() -> Vec<Box<dyn Separator>> {
    vec![
        Box::new(pool_scan::PoolScanSeparator),
        Box::new(segment::SegmentSeparator),
        Box::new(components::ComponentsSeparator),
        Box::new(fast_blossom::FastBlossomSeparator),
        Box::new(block_comb::BlockCombSeparator),
        Box::new(exact_blossom::ExactBlossomSeparator),
        Box::new(simple_dp::SimpleDpSeparator),
        Box::new(tighten::TightenSeparator),
        Box::new(local_cuts::LocalCutsSeparator),
        Box::new(safe_gmi::SafeGmiSeparator),
    ]
}

/// Builds the comb/blossom inequality `x(δ(H)) + Σ_i x(δ(T_i)) ≥ 3k + 1`
/// (Grötschel–Padberg form, GLOSSARY "Blossom"/"Comb") as a [`HyperGraph`]
/// whose clique list is `[handle, teeth...]` — the Standard XOR-coefficient
/// formula reconstructs exactly this inequality's coefficients.
pub(crate) fn comb_inequality(
    handle: Vec<tsp_core::instance::node::Node>,
    teeth: Vec<Vec<tsp_core::instance::node::Node>>,
    clique_bank: &Rc<RefCell<CliqueBank>>,
) -> HyperGraph {
    let k = teeth.len();
    let mut node_sets = vec![handle];
    node_sets.extend(teeth);
    HyperGraph::new_standard(
        crate::hypergraph::CutSense::Greater,
        (3 * k + 1) as f64,
        node_sets,
        clique_bank,
    )
}

/// Given an odd-cardinality candidate handle (by tour position), picks the
/// heaviest boundary edge at each handle member as that member's 2-vertex
/// tooth (`{member, outside neighbor}`, intersecting the handle in exactly
/// one vertex) and assembles the comb inequality if it ends up with an odd
/// number of teeth. Shared by `fast_blossom`, `block_comb`, `exact_blossom`
/// and `local_cuts` — they differ only in how the handle itself is found.
///
/// External neighbors are claimed greedily in handle order: once a vertex
/// outside the handle has been picked as one member's tooth-mate, no later
/// member may reuse it, so the returned teeth are always pairwise disjoint
/// (a precondition of the Grötschel–Padberg comb inequality, without which
/// the assembled row isn't a valid TSP inequality). The assembled cut is
/// also checked tight at the incumbent tour (spec §4.3's primal filter)
/// before being returned, since a greedy tooth choice that still collides
/// on some other structural assumption would otherwise slip an invalid row
/// past the pivot-back step.
pub(crate) fn singleton_teeth_comb(
    ctx: &SeparationContext<'_>,
    handle_positions: &[usize],
) -> Option<HyperGraph> {
    let in_handle: std::collections::HashSet<usize> = handle_positions.iter().copied().collect();
    let mut claimed: std::collections::HashSet<usize> = std::collections::HashSet::new();
    let mut teeth = Vec::new();

    for &pos in handle_positions {
        let node = ctx.tour.node_at(pos);
        let mut best: Option<(usize, f64)> = None;
        for adj in ctx.core_graph.adjacency(node) {
            let npos = ctx.tour.position_of(adj.neighbor);
            if in_handle.contains(&npos) || claimed.contains(&npos) {
                continue;
            }
            let x = ctx.edge_value(adj.edge_index);
            if best.map_or(true, |(_, b)| x > b) {
                best = Some((npos, x));
            }
        }
        if let Some((npos, _)) = best {
            claimed.insert(npos);
            teeth.push(vec![node, ctx.tour.node_at(npos)]);
        }
    }

    if teeth.len() % 2 == 0 || teeth.len() < 3 {
        return None;
    }

    let handle_nodes: Vec<_> = handle_positions.iter().map(|&p| ctx.tour.node_at(p)).collect();
    let cut = comb_inequality(handle_nodes, teeth, ctx.clique_bank);
    is_tight_at_tour(ctx, &cut).then_some(cut)
}

/// The spec §4.3 primal filter: a cut must be tight at the incumbent tour,
/// `Σ coeff · best_tour_edges == rhs` (spec §8 "DP cuts are accepted only if
/// the same equality holds" — the same check applies to any constructed
/// cut, not only domino-parity ones). `sep::tighten` already checks this
/// inline for its handle-shrink candidates; this is the shared version for
/// every other separator that builds a fresh [`HyperGraph`].
pub(crate) fn is_tight_at_tour(ctx: &SeparationContext<'_>, cut: &HyperGraph) -> bool {
    let lhs_tour: f64 = ctx
        .core_graph
        .edges()
        .iter()
        .enumerate()
        .filter(|&(idx, _)| ctx.tour.tour_edges()[idx])
        .map(|(_, e)| cut.get_coeff(e.ends[0], e.ends[1]))
        .sum();
    (lhs_tour - cut.rhs()).abs() < EPSILON
}

/// Padberg–Hong progress measure: `|(new - prev) / (tour - prev)|` (spec
/// §4.3/GLOSSARY). Returns `0.0` when `tour == prev` to avoid division by
/// zero (no room left to progress is reported as no progress).
pub fn ph_delta(new: f64, prev: f64, tour: f64) -> f64 {
    let denom = tour - prev;
    if denom.abs() < 1e-12 {
        0.0
    } else {
        ((new - prev) / denom).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ph_delta_degenerate_denominator_is_zero() {
        assert_eq!(ph_delta(5.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn ph_delta_full_progress_is_one() {
        assert!((ph_delta(10.0, 0.0, 10.0) - 1.0).abs() < 1e-12);
    }
}
