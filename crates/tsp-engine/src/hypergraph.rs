//! A separated cut, stored as an interned handle list rather than a
//! materialized sparse row (spec §3/§4.2 `HyperGraph`).
//!
//! Coefficient queries dereference clique/tooth handles against the bank
//! that produced them, using that bank's `perm` at the time of separation —
//! *not* the engine's current tour, which may have moved on since. This is
//! what makes interning worthwhile: the row can be reconstructed for any
//! edge without re-running the separator.

use std::cell::RefCell;
use std::rc::Rc;

use tsp_core::instance::node::Node;

use crate::clique::{Clique, CliqueBank, CliqueHandle};
use crate::tooth::{Tooth, ToothBank, ToothHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutSense {
    Greater,
    Less,
    Equal,
}

/// Which family a [`HyperGraph`] belongs to (Design Notes: "Polymorphism
/// across cut variants").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutType {
    Subtour,
    Comb,
    Domino,
    /// A placeholder row (e.g. a branching bound) with no cliques/teeth;
    /// never produces coefficients.
    Non,
}

enum Kind {
    Standard {
        cliques: Vec<CliqueHandle>,
        bank: Rc<RefCell<CliqueBank>>,
    },
    Domino {
        handle: CliqueHandle,
        teeth: Vec<ToothHandle>,
        clique_bank: Rc<RefCell<CliqueBank>>,
        tooth_bank: Rc<RefCell<ToothBank>>,
    },
    Non,
}

pub struct HyperGraph {
    sense: CutSense,
    rhs: f64,
    kind: Kind,
}

impl HyperGraph {
    pub fn new_standard(
        sense: CutSense,
        rhs: f64,
        node_sets: Vec<Vec<Node>>,
        bank: &Rc<RefCell<CliqueBank>>,
    ) -> Self {
        let perm = bank.borrow().perm().to_vec();
        let cliques = node_sets
            .into_iter()
            .map(|nodes| bank.borrow_mut().add(Clique::from_nodes(&nodes, &perm)))
            .collect();
        Self {
            sense,
            rhs,
            kind: Kind::Standard {
                cliques,
                bank: Rc::clone(bank),
            },
        }
    }

    pub fn new_domino(
        rhs: f64,
        handle_nodes: Vec<Node>,
        teeth: Vec<(Vec<Node>, Vec<Node>)>,
        clique_bank: &Rc<RefCell<CliqueBank>>,
        tooth_bank: &Rc<RefCell<ToothBank>>,
    ) -> Self {
        let clq_perm = clique_bank.borrow().perm().to_vec();
        let handle = clique_bank
            .borrow_mut()
            .add(Clique::from_nodes(&handle_nodes, &clq_perm));

        let tooth_perm = tooth_bank.borrow().perm().to_vec();
        let teeth = teeth
            .into_iter()
            .map(|(root, body)| {
                let root_clq = Clique::from_nodes(&root, &tooth_perm);
                let body_clq = Clique::from_nodes(&body, &tooth_perm);
                tooth_bank.borrow_mut().add(Tooth::new(root_clq, body_clq))
            })
            .collect();

        Self {
            sense: CutSense::Less,
            rhs,
            kind: Kind::Domino {
                handle,
                teeth,
                clique_bank: Rc::clone(clique_bank),
                tooth_bank: Rc::clone(tooth_bank),
            },
        }
    }

    pub fn new_non(sense: CutSense, rhs: f64) -> Self {
        Self {
            sense,
            rhs,
            kind: Kind::Non,
        }
    }

    pub fn sense(&self) -> CutSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// The clique list of a [`CutType::Subtour`]/[`CutType::Comb`] cut, for
    /// separators that rework existing cuts (e.g. `sep::tighten`). `None`
    /// for domino and placeholder cuts.
    pub fn cliques(&self) -> Option<&[CliqueHandle]> {
        match &self.kind {
            Kind::Standard { cliques, .. } => Some(cliques),
            _ => None,
        }
    }

    /// The bank a [`CutType::Subtour`]/[`CutType::Comb`] cut's cliques are
    /// interned against, for reconstructing its node sets against a bank
    /// that has since moved on (e.g. `sep::pool_scan` re-promoting a cut
    /// whose cliques predate the current tour's augmentation).
    pub fn clique_bank(&self) -> Option<&Rc<RefCell<CliqueBank>>> {
        match &self.kind {
            Kind::Standard { bank, .. } => Some(bank),
            _ => None,
        }
    }

    pub fn cut_type(&self) -> CutType {
        match &self.kind {
            Kind::Non => CutType::Non,
            Kind::Domino { .. } => CutType::Domino,
            Kind::Standard { cliques, .. } if cliques.len() == 1 => CutType::Subtour,
            Kind::Standard { .. } => CutType::Comb,
        }
    }

    /// Coefficient of the edge `(u, v)` in this cut's row (spec §4.2).
    ///
    /// # Panics
    /// Panics if called on a [`CutType::Non`] row, or if `u == v`.
    pub fn get_coeff(&self, u: Node, v: Node) -> f64 {
        assert_ne!(u, v, "edge has identical endpoints");
        match &self.kind {
            Kind::Non => panic!("tried get_coeff on a Non cut"),
            Kind::Standard { cliques, bank } => {
                let perm = bank.borrow().perm().to_vec();
                let pu = perm[u.0];
                let pv = perm[v.0];
                let mut total = 0.0;
                for clq in cliques {
                    let cu = clq.contains_pos(pu);
                    let cv = clq.contains_pos(pv);
                    if cu != cv {
                        total += 1.0;
                    }
                }
                total
            }
            Kind::Domino {
                handle,
                teeth,
                clique_bank,
                tooth_bank,
            } => {
                let handle_perm = clique_bank.borrow().perm().to_vec();
                let hu = handle.contains_pos(handle_perm[u.0]);
                let hv = handle.contains_pos(handle_perm[v.0]);

                let mut pre_result: i64 = if hu && hv {
                    2
                } else if hu != hv {
                    1
                } else {
                    0
                };

                let tooth_perm = tooth_bank.borrow().perm().to_vec();
                let tu = tooth_perm[u.0];
                let tv = tooth_perm[v.0];

                for tooth in teeth {
                    let [root, body] = tooth.set_pair();
                    let root_u = root.contains_pos(tu);
                    let root_v = root.contains_pos(tv);

                    if root_u && body.contains_pos(tv) {
                        pre_result += 1;
                        continue;
                    }
                    if root_v && body.contains_pos(tu) {
                        pre_result += 1;
                        continue;
                    }
                    if root_u || root_v {
                        continue;
                    }
                    if body.contains_pos(tu) && body.contains_pos(tv) {
                        pre_result += 2;
                    }
                }

                (pre_result / 2) as f64
            }
        }
    }

    /// Reconstructs this cut's full sparse row over `edges`, used for the
    /// §8 row-indexing testable property and for `CoreLP::add_edges`.
    pub fn sparse_row(&self, edges: &[(usize, Node, Node)]) -> Vec<(usize, f64)> {
        if matches!(self.kind, Kind::Non) {
            return Vec::new();
        }
        edges
            .iter()
            .filter_map(|&(idx, u, v)| {
                let c = self.get_coeff(u, v);
                (c != 0.0).then_some((idx, c))
            })
            .collect()
    }
}

impl Drop for HyperGraph {
    fn drop(&mut self) {
        match &self.kind {
            Kind::Standard { cliques, bank } => {
                let mut bank = bank.borrow_mut();
                for clq in cliques {
                    bank.del(clq);
                }
            }
            Kind::Domino {
                handle,
                teeth,
                clique_bank,
                tooth_bank,
            } => {
                clique_bank.borrow_mut().del(handle);
                let mut tb = tooth_bank.borrow_mut();
                for tooth in teeth {
                    tb.del(tooth);
                }
            }
            Kind::Non => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(n: usize) -> Rc<RefCell<CliqueBank>> {
        let tour: Vec<Node> = (0..n).map(Node).collect();
        let perm: Vec<usize> = (0..n).collect();
        Rc::new(RefCell::new(CliqueBank::new(tour, perm)))
    }

    #[test]
    fn subtour_coefficient_is_zero_or_one() {
        let b = bank(5);
        let cut = HyperGraph::new_standard(
            CutSense::Greater,
            2.0,
            vec![vec![Node(0), Node(1)]],
            &b,
        );
        assert_eq!(cut.cut_type(), CutType::Subtour);
        assert_eq!(cut.get_coeff(Node(0), Node(1)), 0.0);
        assert_eq!(cut.get_coeff(Node(0), Node(2)), 1.0);
        assert_eq!(cut.get_coeff(Node(2), Node(3)), 0.0);
    }

    #[test]
    fn drop_releases_bank_refcount() {
        let b = bank(5);
        {
            let _cut = HyperGraph::new_standard(
                CutSense::Greater,
                2.0,
                vec![vec![Node(0), Node(1)]],
                &b,
            );
            assert_eq!(b.borrow().len(), 1);
        }
        assert!(b.borrow().is_empty());
    }
}
