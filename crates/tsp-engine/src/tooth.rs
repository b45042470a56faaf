//! Simple teeth for domino-parity cuts (spec §3 `Tooth` / `ToothBank`).
//!
//! A [`Tooth`] pairs a non-empty "root" clique with a disjoint, non-empty
//! "body" clique whose union is not all of `V`. In practice (Camargue
//! `tooth.cpp`) the root is a single vertex and the body a contiguous tour
//! interval — a "simple" tooth, the only kind this engine separates.

use std::collections::HashMap;
use std::rc::Rc;

use crate::clique::Clique;

/// A candidate tooth found by the simple-DP separator (spec §4.5): a
/// singleton root, a contiguous body, and the slack `x(δ(body)) - 1` that
/// made it interesting (`< 0.5` ⇒ "light").
#[derive(Debug, Clone, PartialEq)]
pub struct ToothCandidate {
    pub root: Clique,
    pub body: Clique,
    pub slack: f64,
}

/// An interned root/body pair, equality by clique content only (slack is a
/// discovery-time property, not part of the key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tooth {
    root: Clique,
    body: Clique,
}

impl Tooth {
    pub fn new(root: Clique, body: Clique) -> Self {
        Self { root, body }
    }

    pub fn root(&self) -> &Clique {
        &self.root
    }

    pub fn body(&self) -> &Clique {
        &self.body
    }

    /// `[root, body]`, mirroring Camargue's `set_pair()`.
    pub fn set_pair(&self) -> [&Clique; 2] {
        [&self.root, &self.body]
    }
}

pub type ToothHandle = Rc<Tooth>;

#[derive(Debug)]
pub struct ToothBank {
    saved_tour: Vec<tsp_core::instance::node::Node>,
    perm: Vec<usize>,
    bank: HashMap<Tooth, (ToothHandle, usize)>,
}

impl ToothBank {
    pub fn new(saved_tour: Vec<tsp_core::instance::node::Node>, perm: Vec<usize>) -> Self {
        Self {
            saved_tour,
            perm,
            bank: HashMap::new(),
        }
    }

    pub fn saved_tour(&self) -> &[tsp_core::instance::node::Node] {
        &self.saved_tour
    }

    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    pub fn len(&self) -> usize {
        self.bank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    pub fn refcount(&self, tooth: &Tooth) -> usize {
        self.bank.get(tooth).map(|(_, rc)| *rc).unwrap_or(0)
    }

    pub fn add(&mut self, tooth: Tooth) -> ToothHandle {
        match self.bank.get_mut(&tooth) {
            Some((handle, rc)) => {
                *rc += 1;
                Rc::clone(handle)
            }
            None => {
                let handle: ToothHandle = Rc::new(tooth.clone());
                self.bank.insert(tooth, (Rc::clone(&handle), 1));
                handle
            }
        }
    }

    pub fn del(&mut self, handle: &ToothHandle) {
        let key = (**handle).clone();
        if let Some((_, rc)) = self.bank.get_mut(&key) {
            *rc -= 1;
            if *rc == 0 {
                self.bank.remove(&key);
            }
        }
    }
}

/// Drops teeth dominated by another candidate with the same root: a body
/// that is a superset of some other candidate's body, with no smaller slack,
/// contributes nothing a smaller tooth doesn't already (spec §4.5
/// "weak-elimination").
pub fn weak_eliminate(mut candidates: Vec<ToothCandidate>) -> Vec<ToothCandidate> {
    candidates.sort_by(|a, b| {
        a.slack
            .partial_cmp(&b.slack)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<ToothCandidate> = Vec::new();
    'outer: for cand in candidates {
        for prior in &kept {
            if prior.root == cand.root
                && prior.slack <= cand.slack
                && is_subset_body(&prior.body, &cand.body)
            {
                continue 'outer;
            }
        }
        kept.push(cand);
    }
    kept
}

fn is_subset_body(small: &Clique, big: &Clique) -> bool {
    // Bodies are single contiguous segments for simple teeth; containment
    // reduces to both endpoints of `small` lying in `big`.
    let Some(small_seg) = small.segments().first() else {
        return true;
    };
    big.contains_pos(small_seg.start) && big.contains_pos(small_seg.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clique::Segment;

    fn clq(start: usize, end: usize) -> Clique {
        Clique::from_segments(vec![Segment::new(start, end)])
    }

    #[test]
    fn bank_refcounts_round_trip() {
        let mut bank = ToothBank::new(vec![], vec![]);
        let tooth = Tooth::new(clq(0, 0), clq(1, 3));
        let h1 = bank.add(tooth.clone());
        let h2 = bank.add(tooth.clone());
        assert_eq!(bank.refcount(&tooth), 2);
        bank.del(&h1);
        bank.del(&h2);
        assert!(bank.is_empty());
    }

    #[test]
    fn weak_elimination_drops_dominated_superset_bodies() {
        let root = clq(0, 0);
        let narrow = ToothCandidate {
            root: root.clone(),
            body: clq(1, 2),
            slack: 0.1,
        };
        let wide = ToothCandidate {
            root: root.clone(),
            body: clq(1, 4),
            slack: 0.4,
        };
        let kept = weak_eliminate(vec![wide, narrow]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].body, clq(1, 2));
    }
}
