//! `CoreLP`: the wrapper tying the core graph, the incumbent tour, the
//! separated-cut list, and the LP oracle together (spec §4.1).

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use tsp_core::instance::distance::Distance;
use tsp_core::instance::node::Node;

use crate::clique::CliqueBank;
use crate::error::{EngineError, EngineResult};
use crate::external_cuts::ExternalCuts;
use crate::graph::{CoreGraph, GraphEdge};
use crate::hypergraph::{CutSense, HyperGraph};
use crate::lp::{BStat, BoundSense, LpOracle, PivType, Sense, SparseRow, EPSILON};
use crate::branch::Direction;
use crate::tooth::ToothBank;
use crate::tour::TourBank;

fn lp_sense(sense: CutSense) -> Sense {
    match sense {
        CutSense::Greater => Sense::Greater,
        CutSense::Less => Sense::Less,
        CutSense::Equal => Sense::Equal,
    }
}

/// A non-degenerate starting basis derived from the incumbent tour (spec
/// §4.1 `TourBasis`).
///
/// Places the `n` tour edges `Basic`. For even `n` the degree system is
/// degenerate at the tour point unless one tour edge is pushed to its upper
/// bound and a non-tour chord is brought in as basic instead — the original
/// computes the chord edge `(tour_nodes[0], tour_nodes[ncount-2])` (Design
/// Notes: an earlier version of this constructor reused a stale `find_ind`
/// from the first lookup instead of refreshing it for the second one; this
/// implementation performs both lookups independently).
///
/// Every cut row past the `n` degree rows is given a `Basic` slack: the cut
/// rows were appended to the oracle after the degree rows and no structural
/// column has been chosen to cover them, so their own slack is the only
/// candidate that keeps the basis square. A cut tight at the tour leaves
/// that slack basic at value zero (degenerate, not a contradiction).
#[derive(Debug, Clone)]
pub struct TourBasis {
    pub colstat: Vec<BStat>,
    pub rowstat: Vec<BStat>,
}

impl TourBasis {
    pub fn build(core_graph: &CoreGraph, tour: &TourBank, num_cut_rows: usize) -> EngineResult<Self> {
        let ncount = core_graph.node_count();
        let mut colstat = vec![BStat::AtLower; core_graph.edge_count()];
        let mut rowstat = vec![BStat::AtLower; ncount];
        rowstat.extend(std::iter::repeat(BStat::Basic).take(num_cut_rows));

        let tour_nodes = tour.tour_nodes();
        for i in 0..ncount {
            let e0 = tour_nodes[i];
            let e1 = tour_nodes[(i + 1) % ncount];
            let idx = core_graph.find_edge_index(e0, e1).ok_or_else(|| {
                EngineError::InvariantBroken(format!(
                    "tour edge ({}, {}) not in core graph",
                    e0.0, e1.0
                ))
            })?;
            colstat[idx] = BStat::Basic;
        }

        if ncount % 2 == 0 {
            let wrap0 = tour_nodes[ncount - 2];
            let wrap1 = tour_nodes[ncount - 1];
            let wrap_idx = core_graph.find_edge_index(wrap0, wrap1).ok_or_else(|| {
                EngineError::InvariantBroken(format!(
                    "tour edge ({}, {}) not in core graph",
                    wrap0.0, wrap1.0
                ))
            })?;
            colstat[wrap_idx] = BStat::AtUpper;

            let chord0 = tour_nodes[0];
            let chord1 = tour_nodes[ncount - 2];
            let chord_idx = core_graph.find_edge_index(chord0, chord1).ok_or_else(|| {
                EngineError::InvariantBroken(format!(
                    "chord ({}, {}) not in core graph",
                    chord0.0, chord1.0
                ))
            })?;
            colstat[chord_idx] = BStat::Basic;
        }

        Ok(Self { colstat, rowstat })
    }
}

pub struct CoreLP<L: LpOracle> {
    oracle: L,
    core_graph: CoreGraph,
    tour: TourBank,
    ext_cuts: ExternalCuts,
    tour_base: TourBasis,
    clique_bank: Rc<RefCell<CliqueBank>>,
    tooth_bank: Rc<RefCell<ToothBank>>,
    branch_depth: usize,
}

impl<L: LpOracle> CoreLP<L> {
    /// Builds the degree-only LP from `core_graph`/`tour` and installs the
    /// tour basis (spec §4.1 constructor).
    pub fn new(mut oracle: L, core_graph: CoreGraph, tour: TourBank) -> EngineResult<Self> {
        let ncount = core_graph.node_count();
        for _ in 0..ncount {
            oracle.new_row(Sense::Equal, 2.0)?;
        }
        for edge in core_graph.edges() {
            let rows = [edge.ends[0].0, edge.ends[1].0];
            let vals = [1.0, 1.0];
            oracle.add_col(edge.len.0 as f64, &rows, &vals, 0.0, 1.0)?;
        }

        let tour_base = TourBasis::build(&core_graph, &tour, 0)?;

        let mut this = Self {
            oracle,
            core_graph,
            tour,
            ext_cuts: ExternalCuts::new(),
            tour_base,
            clique_bank: Rc::new(RefCell::new(CliqueBank::new(Vec::new(), Vec::new()))),
            tooth_bank: Rc::new(RefCell::new(ToothBank::new(Vec::new(), Vec::new()))),
            branch_depth: 0,
        };
        this.reset_banks();
        this.install_tour_basis()?;
        this.verify_tour_basis()?;
        Ok(this)
    }

    fn reset_banks(&mut self) {
        let tour_nodes = self.tour.tour_nodes().to_vec();
        let perm = self.tour.perm().to_vec();
        self.clique_bank = Rc::new(RefCell::new(CliqueBank::new(tour_nodes.clone(), perm.clone())));
        self.tooth_bank = Rc::new(RefCell::new(ToothBank::new(tour_nodes, perm)));
    }

    pub fn clique_bank(&self) -> &Rc<RefCell<CliqueBank>> {
        &self.clique_bank
    }

    pub fn tooth_bank(&self) -> &Rc<RefCell<ToothBank>> {
        &self.tooth_bank
    }

    pub fn core_graph(&self) -> &CoreGraph {
        &self.core_graph
    }

    pub fn tour(&self) -> &TourBank {
        &self.tour
    }

    pub fn ext_cuts(&self) -> &ExternalCuts {
        &self.ext_cuts
    }

    pub fn num_rows(&self) -> usize {
        self.oracle.num_rows()
    }

    pub fn oracle(&self) -> &L {
        &self.oracle
    }

    /// Direct mutable access to the oracle, for callers (the branch
    /// executor's strong-branching probes) that need single pivots or
    /// basis installs without going through [`Self::primal_pivot`]'s
    /// tour-augmentation bookkeeping.
    pub fn oracle_mut(&mut self) -> &mut L {
        &mut self.oracle
    }

    /// Fixes `edge_index` to 0 (`Direction::Down`) or 1 (`Direction::Up`)
    /// via a column bound change (spec §4.7 "clamp"). No new LP row is
    /// needed: unlike cuts, a branch decision is a bound on an existing
    /// column.
    pub fn clamp_edge(&mut self, edge_index: usize, direction: Direction) -> EngineResult<()> {
        match direction {
            Direction::Down => self.oracle.tighten_bound(edge_index, BoundSense::Upper, 0.0),
            Direction::Up => self.oracle.tighten_bound(edge_index, BoundSense::Lower, 1.0),
        }
    }

    /// Restores `edge_index` to its natural `[0, 1]` bounds.
    pub fn unclamp_edge(&mut self, edge_index: usize) -> EngineResult<()> {
        self.oracle.tighten_bound(edge_index, BoundSense::Lower, 0.0)?;
        self.oracle.tighten_bound(edge_index, BoundSense::Upper, 1.0)
    }

    /// Marks entry into a strong-branch probe. Branch decisions are plain
    /// bound changes (see [`Self::clamp_edge`]) and need no LP row of their
    /// own; this pair of calls exists purely as a nesting-depth guard so a
    /// probe can assert it unwound cleanly.
    pub fn push_branch_row(&mut self) -> EngineResult<()> {
        self.branch_depth += 1;
        Ok(())
    }

    pub fn pop_branch_row(&mut self) -> EngineResult<()> {
        self.branch_depth = self.branch_depth.checked_sub(1).ok_or_else(|| {
            EngineError::InvariantBroken("pop_branch_row called without a matching push".into())
        })?;
        Ok(())
    }

    fn tour_edge_vector(&self) -> Vec<f64> {
        self.tour
            .tour_edges()
            .iter()
            .map(|&b| if b { 1.0 } else { 0.0 })
            .collect()
    }

    fn install_tour_basis(&mut self) -> EngineResult<()> {
        self.oracle
            .copy_start(&self.tour_edge_vector(), &self.tour_base.colstat, &self.tour_base.rowstat)?;
        self.oracle.factor_basis()
    }

    /// Invariant check from spec §4.1: `objval == min_tour_value` and
    /// `lp_vec() == tour_edges` after construction.
    fn verify_tour_basis(&self) -> EngineResult<()> {
        let objval = self.oracle.get_objval();
        let expected = self.tour.min_tour_value().0 as f64;
        if (objval - expected).abs() > 1.0 + EPSILON {
            return Err(EngineError::InvariantBroken(format!(
                "objval {objval} != min_tour_value {expected} after construction"
            )));
        }
        let lp_edges = self.oracle.lp_vec();
        for (&b, &x) in self.tour.tour_edges().iter().zip(lp_edges.iter()) {
            let expected_x = if b { 1.0 } else { 0.0 };
            if (x - expected_x).abs() > EPSILON {
                return Err(EngineError::InvariantBroken(
                    "lp_vec() != tour_edges after construction".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn add_cuts(&mut self, cuts: Vec<HyperGraph>) -> EngineResult<()> {
        for cut in cuts {
            let mut row = SparseRow {
                indices: Vec::new(),
                values: Vec::new(),
                sense: lp_sense(cut.sense()),
                rhs: cut.rhs(),
            };
            for (idx, edge) in self.core_graph.edges().iter().enumerate() {
                let c = cut.get_coeff(edge.ends[0], edge.ends[1]);
                if c != 0.0 {
                    row.indices.push(idx);
                    row.values.push(c);
                }
            }
            self.oracle.add_cut(row)?;
            self.ext_cuts.add_cut(cut);
        }
        Ok(())
    }

    /// Deletes cut rows where `mask[i]` is set, keeping `ext_cuts` and the
    /// oracle's row numbering in lockstep (spec §5 resource policy).
    pub fn del_cut_rows(&mut self, mask: &[bool]) -> EngineResult<()> {
        let ncount = self.core_graph.node_count();
        let mut full_mask = vec![false; self.oracle.num_rows()];
        full_mask[ncount..].copy_from_slice(mask);
        self.oracle.del_set_rows(&full_mask)?;
        self.ext_cuts.del_cuts(mask);
        Ok(())
    }

    pub fn add_edges(&mut self, batch: Vec<GraphEdge>) -> EngineResult<()> {
        let old_count = self.core_graph.edge_count();
        let indices = self.core_graph.add_edges(batch.clone());
        self.tour.extend_edge_indicators(self.core_graph.edge_count());

        for (offset, edge) in batch.iter().enumerate() {
            let col_idx = indices[offset];
            debug_assert_eq!(col_idx, old_count + offset);
            let mut cmatind = vec![0usize; 2];
            let mut cmatval = vec![1.0, 1.0];
            cmatind[0] = self.degree_row(edge.ends[0]);
            cmatind[1] = self.degree_row(edge.ends[1]);
            for (i, c) in self.ext_cuts.get_col(edge.ends[0], edge.ends[1]) {
                cmatind.push(self.cut_row(i));
                cmatval.push(c);
            }
            self.oracle
                .add_col(edge.len.0 as f64, &cmatind, &cmatval, 0.0, 1.0)?;
        }

        self.rebuild_basis()
    }

    fn degree_row(&self, node: Node) -> usize {
        node.0
    }

    fn cut_row(&self, cut_offset: usize) -> usize {
        self.core_graph.node_count() + cut_offset
    }

    /// Reinstalls the tour solution on the current (possibly just-grown)
    /// column/row set without pivoting, and checks it is still feasible
    /// (spec §4.1 `rebuild_basis`).
    pub fn rebuild_basis(&mut self) -> EngineResult<()> {
        self.tour_base = TourBasis::build(&self.core_graph, &self.tour, self.ext_cuts.len())?;
        self.install_tour_basis()?;
        let lp_edges = self.oracle.lp_vec();
        for (&b, &x) in self.tour.tour_edges().iter().zip(lp_edges.iter()) {
            let expected = if b { 1.0 } else { 0.0 };
            if (x - expected).abs() > EPSILON {
                return Err(EngineError::InvariantBroken(
                    "tour not instated after basis rebuild".into(),
                ));
            }
        }
        Ok(())
    }

    /// Non-degenerate primal pivot bounded below by `min_tour_value - ε`
    /// (spec §4.1).
    pub fn primal_pivot(&mut self) -> EngineResult<PivType> {
        let low_limit = self.tour.min_tour_value().0 as f64 - EPSILON;
        self.oracle.nondegen_pivot(low_limit)?;

        let x = self.oracle.lp_vec();
        let edges: Vec<(usize, usize)> = self
            .core_graph
            .edges()
            .iter()
            .map(|e| (e.ends[0].0, e.ends[1].0))
            .collect();
        let piv = crate::lp::reference::classify_pivot(&x, &edges, self.core_graph.node_count());

        let result = match piv {
            PivType::Frac => PivType::Frac,
            PivType::Subtour => PivType::Subtour,
            PivType::Tour | PivType::FathomedTour => {
                if self.oracle.dual_feas() {
                    PivType::FathomedTour
                } else {
                    PivType::Tour
                }
            }
        };

        debug!("primal_pivot -> {result:?} (objval {})", self.oracle.get_objval());

        if result == PivType::Tour {
            self.handle_aug()?;
        }
        Ok(result)
    }

    /// Reinstalls the tour basis without pivoting (spec GLOSSARY
    /// "pivot-back"): used after adding cuts so the tour stays the
    /// reference primal-feasible point.
    ///
    /// Recomputes `tour_base` against the current cut-row count rather than
    /// reusing the cached one: a separation pass may call this more than
    /// once, with earlier rounds in the same pass having already grown
    /// `ext_cuts` since the last `rebuild_basis`.
    pub fn pivot_back(&mut self) -> EngineResult<()> {
        self.tour_base = TourBasis::build(&self.core_graph, &self.tour, self.ext_cuts.len())?;
        self.install_tour_basis()
    }

    /// Promotes the current LP vector to the incumbent tour, prunes cut
    /// rows with nonzero slack, and refactors (spec §4.1).
    fn handle_aug(&mut self) -> EngineResult<()> {
        let lp_edges = self.oracle.lp_vec();
        let mut new_tour_edges = vec![false; lp_edges.len()];
        let mut objval = Distance::ZERO;
        for (i, &x) in lp_edges.iter().enumerate() {
            if x > EPSILON {
                new_tour_edges[i] = true;
                objval += self.core_graph.edge(i).len;
            }
        }

        let node_order = reconstruct_tour_order(&self.core_graph, &new_tour_edges);
        let node_order = node_order.ok_or_else(|| {
            EngineError::InvariantBroken("augmented x is not a single Hamiltonian cycle".into())
        })?;

        self.tour.replace(node_order, new_tour_edges, objval)?;
        self.reset_banks();

        let ncount = self.core_graph.node_count();
        let dropped = if self.oracle.num_rows() > ncount {
            let slacks = self.oracle.row_slacks(ncount, self.oracle.num_rows() - 1);
            let drop_mask: Vec<bool> = slacks.iter().map(|&s| s.abs() > EPSILON).collect();
            let dropped = drop_mask.iter().filter(|&&d| d).count();
            self.del_cut_rows(&drop_mask)?;
            dropped
        } else {
            0
        };

        debug!("handle_aug: new tour value {}, pruned {dropped} cut rows", self.tour.min_tour_value().0);

        self.rebuild_basis()
    }
}

/// Walks `edges` (indicator vector over `core_graph`'s columns) as an
/// undirected 2-regular graph; returns the visiting order if it forms one
/// Hamiltonian cycle, `None` otherwise.
fn reconstruct_tour_order(core_graph: &CoreGraph, indicator: &[bool]) -> Option<Vec<Node>> {
    let n = core_graph.node_count();
    let mut adj = vec![Vec::new(); n];
    for (idx, &on) in indicator.iter().enumerate() {
        if on {
            let e = core_graph.edge(idx);
            adj[e.ends[0].0].push(e.ends[1]);
            adj[e.ends[1].0].push(e.ends[0]);
        }
    }
    if adj.iter().any(|a| a.len() != 2) {
        return None;
    }

    let mut order = Vec::with_capacity(n);
    let mut prev = Node(usize::MAX);
    let mut current = Node(0);
    for _ in 0..n {
        order.push(current);
        let [a, b] = [adj[current.0][0], adj[current.0][1]];
        let next = if a != prev { a } else { b };
        prev = current;
        current = next;
    }
    if order.len() == n && current == Node(0) {
        Some(order)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::reference::DenseLp;

    fn triangle() -> (CoreGraph, TourBank) {
        let mut g = CoreGraph::new(3);
        g.add_edge(GraphEdge::new(Node(0), Node(1), Distance(1)));
        g.add_edge(GraphEdge::new(Node(1), Node(2), Distance(1)));
        g.add_edge(GraphEdge::new(Node(2), Node(0), Distance(1)));
        let tour = TourBank::from_node_order(&g, vec![Node(0), Node(1), Node(2)]).unwrap();
        (g, tour)
    }

    #[test]
    fn construction_matches_tour_value() {
        let (g, tour) = triangle();
        let lp = CoreLP::new(DenseLp::new(), g, tour).unwrap();
        assert_eq!(lp.num_rows(), 3);
    }
}
