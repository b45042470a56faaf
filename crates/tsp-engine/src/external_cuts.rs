//! Ordered list of live separated cuts, 1:1 with LP rows past the `n`
//! degree rows, plus a demoted pool of long-lived cuts (spec §3
//! `ExternalCuts`).

use std::rc::Rc;

use tsp_core::instance::node::Node;

use crate::hypergraph::{CutType, HyperGraph};

/// Cuts demoted from active LP rows (zero slack pruning keeps them, any
/// nonzero slack drops them to here) are retained only if they were a
/// [`CutType::Comb`] or [`CutType::Domino`] — Design Notes: "the pool's
/// demotion policy only retains Comb and Domino types; Subtour cuts are
/// discarded on deletion."
#[derive(Default)]
pub struct CutPool {
    cuts: Vec<Rc<HyperGraph>>,
}

impl CutPool {
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn cuts(&self) -> &[Rc<HyperGraph>] {
        &self.cuts
    }

    fn demote(&mut self, cut: Rc<HyperGraph>) {
        match cut.cut_type() {
            CutType::Comb | CutType::Domino => self.cuts.push(cut),
            CutType::Subtour | CutType::Non => {}
        }
    }
}

#[derive(Default)]
pub struct ExternalCuts {
    /// `cuts[i]` corresponds to LP row `n + i`.
    cuts: Vec<Rc<HyperGraph>>,
    pool: CutPool,
}

impl ExternalCuts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn cut(&self, row_offset: usize) -> &Rc<HyperGraph> {
        &self.cuts[row_offset]
    }

    pub fn cuts(&self) -> &[Rc<HyperGraph>] {
        &self.cuts
    }

    pub fn pool(&self) -> &CutPool {
        &self.pool
    }

    pub fn add_cut(&mut self, cut: HyperGraph) {
        self.cuts.push(Rc::new(cut));
    }

    pub fn add_cuts(&mut self, cuts: impl IntoIterator<Item = HyperGraph>) {
        self.cuts.extend(cuts.into_iter().map(Rc::new));
    }

    /// Deletes cuts where `mask[i] != 0`, in lockstep with a matching
    /// `CoreLP::del_set_rows` call (spec §5 resource policy: every row
    /// deletion must be accompanied by this). Demotes survivors per
    /// [`CutPool`]'s policy.
    pub fn del_cuts(&mut self, mask: &[bool]) {
        debug_assert_eq!(mask.len(), self.cuts.len());
        let mut kept = Vec::with_capacity(self.cuts.len());
        for (cut, &drop) in self.cuts.drain(..).zip(mask) {
            if drop {
                self.pool.demote(cut);
            } else {
                kept.push(cut);
            }
        }
        self.cuts = kept;
    }

    /// Re-promotes `cut` from the pool back into the active row list,
    /// used by the pool-scan separator (spec §4.3 step 1).
    pub fn repromote(&mut self, index: usize) -> Rc<HyperGraph> {
        let cut = self.pool.cuts.remove(index);
        self.cuts.push(Rc::clone(&cut));
        cut
    }

    /// The column a new edge `(u, v)` contributes to every active cut row,
    /// in row order (used by `CoreLP::add_edges`/`add_col`, spec §4.1).
    pub fn get_col(&self, u: Node, v: Node) -> Vec<(usize, f64)> {
        self.cuts
            .iter()
            .enumerate()
            .filter_map(|(i, cut)| {
                let c = cut.get_coeff(u, v);
                (c != 0.0).then_some((i, c))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clique::CliqueBank;
    use crate::hypergraph::CutSense;
    use std::cell::RefCell;

    fn bank() -> Rc<RefCell<CliqueBank>> {
        let tour: Vec<Node> = (0..5).map(Node).collect();
        let perm: Vec<usize> = (0..5).collect();
        Rc::new(RefCell::new(CliqueBank::new(tour, perm)))
    }

    #[test]
    fn subtours_are_discarded_on_demotion_but_combs_survive() {
        let b = bank();
        let mut ext = ExternalCuts::new();
        ext.add_cut(HyperGraph::new_standard(
            CutSense::Greater,
            2.0,
            vec![vec![Node(0)]],
            &b,
        ));
        ext.add_cut(HyperGraph::new_standard(
            CutSense::Greater,
            2.0,
            vec![vec![Node(0), Node(1)], vec![Node(2), Node(3)]],
            &b,
        ));
        ext.del_cuts(&[true, true]);
        assert_eq!(ext.len(), 0);
        assert_eq!(ext.pool().len(), 1);
    }
}
