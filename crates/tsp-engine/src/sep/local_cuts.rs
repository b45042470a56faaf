//! Local cuts separator (spec §4.3 step 10): restricts the search for an odd
//! handle to a bounded sliding window of `local_cuts_min_chunk..
//! local_cuts_max_chunk` consecutive tour positions — trading completeness
//! for tractability, which is the whole motivation of "local" cuts in the
//! source this crate is modeled on. Runs twice per window: once over
//! fractional support edges ("flat", same lens as `fast_blossom`) and once
//! over near-integral edges ("sphere", same lens as `block_comb`), since the
//! two find different handle shapes.

use std::collections::HashSet;

use crate::hypergraph::HyperGraph;
use crate::lp::EPSILON;
use crate::sep::{SeparationContext, Separator};

pub struct LocalCutsSeparator;

#[derive(Clone, Copy)]
enum Pass {
    Flat,
    Sphere,
}

impl Pass {
    fn edge_qualifies(self, x: f64) -> bool {
        match self {
            Pass::Flat => x > EPSILON && x < 1.0 - EPSILON,
            Pass::Sphere => x > 1.0 - EPSILON,
        }
    }
}

impl Separator for LocalCutsSeparator {
    fn name(&self) -> &'static str {
        "local_cuts"
    }

    fn separate(&mut self, ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        let mut found = Vec::new();
        found.extend(scan_chunks(ctx, Pass::Flat));
        found.extend(scan_chunks(ctx, Pass::Sphere));
        Ok(found)
    }
}

fn scan_chunks(ctx: &SeparationContext<'_>, pass: Pass) -> Vec<HyperGraph> {
    let n = ctx.tour.node_count();
    let min_chunk = ctx.config.local_cuts_min_chunk.max(3);
    let max_chunk = ctx.config.local_cuts_max_chunk.min(n.saturating_sub(1));
    let mut found = Vec::new();
    if min_chunk > max_chunk {
        return found;
    }

    for chunk_len in min_chunk..=max_chunk {
        for start in 0..n {
            let window: Vec<usize> = (0..chunk_len).map(|k| (start + k) % n).collect();
            if let Some(handle) = odd_subhandle(ctx, &window, pass) {
                if let Some(cut) = super::singleton_teeth_comb(ctx, &handle) {
                    found.push(cut);
                }
            }
        }
    }

    found
}

/// Finds a connected component, restricted to `window`, of edges qualifying
/// under `pass`, that is odd, of size >= 3, and a proper subset of the
/// window.
fn odd_subhandle(ctx: &SeparationContext<'_>, window: &[usize], pass: Pass) -> Option<Vec<usize>> {
    let in_window: HashSet<usize> = window.iter().copied().collect();
    let mut seen: HashSet<usize> = HashSet::new();

    for &start in window {
        if seen.contains(&start) {
            continue;
        }
        let mut stack = vec![start];
        seen.insert(start);
        let mut comp = vec![start];
        while let Some(p) = stack.pop() {
            let node = ctx.tour.node_at(p);
            for adj in ctx.core_graph.adjacency(node) {
                let npos = ctx.tour.position_of(adj.neighbor);
                if !in_window.contains(&npos) || seen.contains(&npos) {
                    continue;
                }
                if pass.edge_qualifies(ctx.edge_value(adj.edge_index)) {
                    seen.insert(npos);
                    comp.push(npos);
                    stack.push(npos);
                }
            }
        }

        if comp.len() % 2 == 1 && comp.len() >= 3 && comp.len() < window.len() {
            return Some(comp);
        }
    }

    None
}
