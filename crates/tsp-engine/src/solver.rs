//! Pivot-loop orchestration (spec §4.4): ties the separation pipeline to a
//! `CoreLP`, managing the pivot/separate/add/pivot cycle and PH-ratio
//! bookkeeping that `sep::SeparationContext` snapshots are built for.

use log::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::lp::{CoreLP, LpOracle, PivType};
use crate::sep::{ph_delta, SeparationContext, Separator};

/// Pivot/objective extrema collected across one `cutting_loop` call, for
/// diagnostics and logging only — none of these fields feed back into the
/// loop's own control flow (spec Design Notes `source/solver_loops.cpp`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivStats {
    /// Number of add-cuts-and-pivot rounds performed.
    pub rounds: usize,
    /// Lowest LP objective value observed across every pivot in this call.
    pub lowest_piv: f64,
    /// Largest single-round PH ratio observed.
    pub max_ratio: f64,
    /// PH ratio measured from the first successful cut round's starting
    /// objective to the most recent pivot's objective.
    pub first_last_ratio: f64,
}

impl PivStats {
    fn new(initial_obj: f64) -> Self {
        Self {
            rounds: 0,
            lowest_piv: initial_obj,
            max_ratio: 0.0,
            first_last_ratio: 0.0,
        }
    }

    fn record_round(&mut self, new_obj: f64, ratio: f64) {
        self.rounds += 1;
        self.lowest_piv = self.lowest_piv.min(new_obj);
        self.max_ratio = f64::max(self.max_ratio, ratio);
    }
}

/// Runs the pivot loop (spec §4.4) to completion: pivots, separates, adds
/// cuts, and repeats until the incumbent is fathomed or the separator
/// pipeline stops making progress.
///
/// A [`EngineError::Separator`] or [`EngineError::ConfigDisabled`] raised by
/// an individual separator is logged and treated as "this separator found
/// nothing this round" (spec §7 propagation policy); any other error aborts
/// the call.
pub fn cutting_loop<L: LpOracle>(
    core_lp: &mut CoreLP<L>,
    pipeline: &mut [Box<dyn Separator>],
    config: &EngineConfig,
) -> EngineResult<(PivType, PivStats)> {
    let tour_val = core_lp.tour().min_tour_value().0 as f64;
    let mut stats = PivStats::new(core_lp.oracle().get_objval());
    let mut first_obj: Option<f64> = None;

    'outer: loop {
        let mut piv = core_lp.primal_pivot()?;
        stats.lowest_piv = stats.lowest_piv.min(core_lp.oracle().get_objval());
        if matches!(piv, PivType::Tour | PivType::FathomedTour) {
            return Ok((piv, stats));
        }

        let mut found_cuts_this_pass = false;

        for sep in pipeline.iter_mut() {
            let x = core_lp.oracle().lp_vec();
            let ctx = SeparationContext {
                x: &x,
                core_graph: core_lp.core_graph(),
                tour: core_lp.tour(),
                clique_bank: core_lp.clique_bank(),
                tooth_bank: core_lp.tooth_bank(),
                ext_cuts: core_lp.ext_cuts(),
                config,
            };

            let cuts = match sep.separate(&ctx) {
                Ok(cuts) => cuts,
                Err(EngineError::Separator { name, reason }) => {
                    warn!("separator `{name}` failed: {reason}; skipping this round");
                    continue;
                }
                Err(EngineError::ConfigDisabled(feature)) => {
                    debug!("separator `{}` disabled ({feature})", sep.name());
                    continue;
                }
                Err(e) => return Err(e),
            };
            if cuts.is_empty() {
                continue;
            }

            found_cuts_this_pass = true;
            let prev_obj = core_lp.oracle().get_objval();
            if first_obj.is_none() {
                first_obj = Some(prev_obj);
            }

            core_lp.pivot_back()?;
            core_lp.add_cuts(cuts)?;
            piv = core_lp.primal_pivot()?;

            let new_obj = core_lp.oracle().get_objval();
            let ratio = ph_delta(new_obj, prev_obj, tour_val);
            stats.record_round(new_obj, ratio);
            stats.first_last_ratio = ph_delta(new_obj, first_obj.unwrap(), tour_val);

            debug!(
                "cutting_loop: `{}` added cuts, piv={piv:?}, objval={new_obj}, ratio={ratio:.4}",
                sep.name()
            );

            if matches!(piv, PivType::Tour | PivType::FathomedTour) {
                return Ok((piv, stats));
            }
            if matches!(piv, PivType::Subtour) || ratio >= config.ph_epsilon {
                continue 'outer;
            }
        }

        if !found_cuts_this_pass {
            return Ok((piv, stats));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineResult as Res;
    use crate::graph::{CoreGraph, GraphEdge};
    use crate::hypergraph::HyperGraph;
    use crate::lp::reference::DenseLp;
    use crate::tour::TourBank;
    use tsp_core::instance::{distance::Distance, node::Node};

    struct NoCutsSeparator;
    impl Separator for NoCutsSeparator {
        fn name(&self) -> &'static str {
            "no_cuts"
        }
        fn separate(&mut self, _ctx: &SeparationContext<'_>) -> Res<Vec<HyperGraph>> {
            Ok(Vec::new())
        }
    }

    fn triangle_lp() -> CoreLP<DenseLp> {
        let mut g = CoreGraph::new(3);
        g.add_edge(GraphEdge::new(Node(0), Node(1), Distance(1)));
        g.add_edge(GraphEdge::new(Node(1), Node(2), Distance(1)));
        g.add_edge(GraphEdge::new(Node(2), Node(0), Distance(1)));
        let tour = TourBank::from_node_order(&g, vec![Node(0), Node(1), Node(2)]).unwrap();
        CoreLP::new(DenseLp::new(), g, tour).unwrap()
    }

    #[test]
    fn stops_immediately_on_fathomed_tour() {
        let mut core_lp = triangle_lp();
        let config = EngineConfig::default();
        let mut pipeline: Vec<Box<dyn Separator>> = vec![Box::new(NoCutsSeparator)];
        let (piv, stats) = cutting_loop(&mut core_lp, &mut pipeline, &config).unwrap();
        assert!(matches!(piv, PivType::FathomedTour | PivType::Tour));
        assert_eq!(stats.rounds, 0);
    }
}
