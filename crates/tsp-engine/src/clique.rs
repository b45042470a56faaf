//! Interned vertex subsets (spec §3 `Segment` / `Clique` / `CliqueBank`).
//!
//! A [`Clique`] is a list of disjoint tour-position ranges, interpreted
//! against a fixed "source tour" owned by the bank that interned it. Two
//! cliques are equal iff their segment lists are equal (Camargue
//! `Sep::Clique`, `includes/cliq.hpp`); the bank hands out reference-counted
//! handles so many [`crate::hypergraph::HyperGraph`]s can share one
//! `Clique` without copying its segment list.

use std::collections::HashMap;
use std::rc::Rc;

use tsp_core::instance::node::Node;

/// A contiguous range `[start, end]` of tour positions (inclusive). Order
/// within a clique's segment list does not matter for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self, tour_len: usize) -> usize {
        if self.start <= self.end {
            self.end - self.start + 1
        } else {
            // wraps around position 0
            tour_len - self.start + self.end + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether tour position `pos` falls inside this segment, handling wrap
    /// (`start > end`) per spec §4.2.
    pub fn contains_pos(&self, pos: usize) -> bool {
        if self.start <= self.end {
            self.start <= pos && pos <= self.end
        } else {
            pos >= self.start || pos <= self.end
        }
    }
}

/// An interned, ordered list of disjoint [`Segment`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clique {
    segments: Vec<Segment>,
}

impl Clique {
    pub fn from_segments(mut segments: Vec<Segment>) -> Self {
        segments.sort_by_key(|s| (s.start, s.end));
        Self { segments }
    }

    /// Builds the clique containing exactly `nodes`, expressed as segments
    /// of contiguous tour positions under `perm`.
    pub fn from_nodes(nodes: &[Node], perm: &[usize]) -> Self {
        let mut positions: Vec<usize> = nodes.iter().map(|n| perm[n.0]).collect();
        positions.sort_unstable();
        positions.dedup();

        let mut segments = Vec::new();
        let mut iter = positions.into_iter();
        if let Some(first) = iter.next() {
            let mut start = first;
            let mut prev = first;
            for pos in iter {
                if pos == prev + 1 {
                    prev = pos;
                } else {
                    segments.push(Segment::new(start, prev));
                    start = pos;
                    prev = pos;
                }
            }
            segments.push(Segment::new(start, prev));
        }
        Self::from_segments(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn cardinality(&self, tour_len: usize) -> usize {
        self.segments.iter().map(|s| s.len(tour_len)).sum()
    }

    pub fn contains_pos(&self, pos: usize) -> bool {
        self.segments.iter().any(|s| s.contains_pos(pos))
    }

    /// FNV-like hash over `(start, end)` pairs (Design Notes: "Interning
    /// with custom hash", mirroring `std::hash<CMR::Sep::Clique>`).
    pub fn fnv_like_hash(&self) -> u64 {
        let mut val: u64 = 0;
        for seg in &self.segments {
            val = val
                .wrapping_mul(65537)
                .wrapping_add((seg.start as u64) * 4099)
                .wrapping_add(seg.end as u64);
        }
        val
    }
}

/// A shared, reference-counted handle to an interned [`Clique`].
pub type CliqueHandle = Rc<Clique>;

/// Maps clique values to `(handle, refcount)`, dereferencing segments
/// against one fixed `saved_tour`/`perm` pair (spec §3).
#[derive(Debug)]
pub struct CliqueBank {
    saved_tour: Vec<Node>,
    perm: Vec<usize>,
    bank: HashMap<Clique, (CliqueHandle, usize)>,
}

impl CliqueBank {
    pub fn new(saved_tour: Vec<Node>, perm: Vec<usize>) -> Self {
        Self {
            saved_tour,
            perm,
            bank: HashMap::new(),
        }
    }

    pub fn saved_tour(&self) -> &[Node] {
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

    pub fn refcount(&self, clique: &Clique) -> usize {
        self.bank.get(clique).map(|(_, rc)| *rc).unwrap_or(0)
    }

    /// Interns `clique`, incrementing its refcount (inserting at 1 if new),
    /// and returns a shared handle.
    pub fn add(&mut self, clique: Clique) -> CliqueHandle {
        match self.bank.get_mut(&clique) {
            Some((handle, rc)) => {
                *rc += 1;
                Rc::clone(handle)
            }
            None => {
                let handle: CliqueHandle = Rc::new(clique.clone());
                self.bank.insert(clique, (Rc::clone(&handle), 1));
                handle
            }
        }
    }

    /// Decrements the refcount of `handle`'s clique, removing it from the
    /// bank once it reaches zero.
    pub fn del(&mut self, handle: &CliqueHandle) {
        let key = (**handle).clone();
        if let Some((_, rc)) = self.bank.get_mut(&key) {
            *rc -= 1;
            if *rc == 0 {
                self.bank.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_wrap_contains() {
        let seg = Segment::new(8, 1);
        assert!(seg.contains_pos(9));
        assert!(seg.contains_pos(0));
        assert!(!seg.contains_pos(5));
    }

    #[test]
    fn from_nodes_merges_contiguous_positions() {
        let perm = vec![0, 1, 2, 3, 4];
        let nodes = [Node(0), Node(1), Node(3)];
        let clq = Clique::from_nodes(&nodes, &perm);
        assert_eq!(clq.segments().len(), 2);
        assert_eq!(clq.cardinality(5), 3);
    }

    #[test]
    fn bank_refcounts_round_trip() {
        let mut bank = CliqueBank::new(vec![Node(0), Node(1), Node(2)], vec![0, 1, 2]);
        let clq = Clique::from_segments(vec![Segment::new(0, 1)]);
        let h1 = bank.add(clq.clone());
        let h2 = bank.add(clq.clone());
        assert_eq!(bank.refcount(&clq), 2);
        bank.del(&h1);
        assert_eq!(bank.refcount(&clq), 1);
        bank.del(&h2);
        assert_eq!(bank.refcount(&clq), 0);
        assert!(bank.is_empty());
    }
}
