//! The branching executor (spec §4.7): edge selection by strong branching,
//! contra-branch starting bases, and branch-tour compression.
//!
//! Branch-tour compression here interns each child's feasible tour as a
//! shared handle in a [`BranchTourBank`], the same refcounted-interning
//! pattern [`crate::clique::CliqueBank`] uses for cliques — cheap reuse
//! when sibling nodes share a parent's tour unchanged (spec Design Notes:
//! "tours are compressed by interning ... and expanded on demand"). This
//! keys on the node order itself rather than modeling Camargue's
//! single-global-tour Clique-segment trick, since distinct branch nodes
//! legitimately need distinct permutations, not sub-ranges of one fixed
//! order (see `DESIGN.md`).

use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use tsp_core::instance::distance::Distance;
use tsp_core::instance::node::Node;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::lp::{BStat, CoreLP, LpOracle, EPSILON};
use crate::pricer::DistanceOracle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down = 0,
    Up = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    NeedsCut,
    NeedsBranch,
    NeedsPrice,
    NeedsRecover,
    Pruned,
    Done,
}

/// One edge fixed to 0 (`Down`) or 1 (`Up`) on a node's path to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamp {
    pub edge: (Node, Node),
    pub direction: Direction,
}

pub type BranchTourHandle = Rc<Vec<Node>>;

/// Interns branch-node tours by node order (spec Design Notes).
#[derive(Default)]
pub struct BranchTourBank {
    bank: HashMap<Vec<Node>, (BranchTourHandle, usize)>,
}

impl BranchTourBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    pub fn add(&mut self, order: Vec<Node>) -> BranchTourHandle {
        match self.bank.get_mut(&order) {
            Some((handle, rc)) => {
                *rc += 1;
                Rc::clone(handle)
            }
            None => {
                let handle: BranchTourHandle = Rc::new(order.clone());
                self.bank.insert(order, (Rc::clone(&handle), 1));
                handle
            }
        }
    }

    pub fn del(&mut self, handle: &BranchTourHandle) {
        let key = (**handle).clone();
        if let Some((_, rc)) = self.bank.get_mut(&key) {
            *rc -= 1;
            if *rc == 0 {
                self.bank.remove(&key);
            }
        }
    }
}

/// A node in the branch-and-cut search tree (spec §3 `BranchNode`).
pub struct BranchNode {
    pub edge: (Node, Node),
    pub direction: Direction,
    pub status: NodeStatus,
    pub parent: Option<usize>,
    pub depth: usize,
    pub tour: BranchTourHandle,
    pub tour_len: Distance,
    pub maybe_infeas: bool,
    /// Cached contra-direction starting basis, populated on first strong-
    /// branch probe and reused for the rest of this node's lifetime (spec
    /// Design Notes "Primal strong branching").
    pub price_basis: Option<(Vec<BStat>, Vec<BStat>)>,
}

impl BranchNode {
    fn root(tour: BranchTourHandle, tour_len: Distance) -> Self {
        Self {
            edge: (Node(0), Node(0)),
            direction: Direction::Down,
            status: NodeStatus::NeedsCut,
            parent: None,
            depth: 0,
            tour,
            tour_len,
            maybe_infeas: false,
            price_basis: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Result of one strong-branch probe (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimateStat {
    Feas,
    Infeas,
    /// Objective already exceeds the current upper bound: pruneable
    /// without finishing the pivot.
    Prune,
}

#[derive(Debug, Clone, Copy)]
pub struct Estimate {
    pub value: f64,
    pub stat: EstimateStat,
}

/// Drives strong branching and the search-tree bookkeeping (spec §4.7).
pub struct BranchExecutor {
    config: EngineConfig,
    nodes: Vec<BranchNode>,
    tour_bank: BranchTourBank,
}

impl BranchExecutor {
    pub fn new(config: EngineConfig, root_tour: Vec<Node>, root_len: Distance) -> Self {
        let mut tour_bank = BranchTourBank::new();
        let handle = tour_bank.add(root_tour);
        Self {
            config,
            nodes: vec![BranchNode::root(handle, root_len)],
            tour_bank,
        }
    }

    pub fn node(&self, idx: usize) -> &BranchNode {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: usize) -> &mut BranchNode {
        &mut self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks `idx`'s ancestor chain (root excluded) collecting every clamp
    /// in effect at that node.
    pub fn clamps_of(&self, idx: usize) -> Vec<Clamp> {
        let mut out = Vec::new();
        let mut cur = idx;
        loop {
            let node = &self.nodes[cur];
            if node.is_root() {
                break;
            }
            out.push(Clamp {
                edge: node.edge,
                direction: node.direction,
            });
            cur = node.parent.unwrap();
        }
        out
    }

    /// Picks a fractional edge to branch on: the one whose reduced cost
    /// (rounded) combined with its distance from integrality gives the
    /// largest estimated objective degradation under either rounding (spec
    /// §4.7 `branch_edge`).
    pub fn select_edge<L: LpOracle>(core_lp: &CoreLP<L>) -> Option<usize> {
        let x = core_lp.oracle().lp_vec();
        let redcosts = core_lp.oracle().redcosts();
        x.iter()
            .enumerate()
            .filter(|&(_, &xi)| xi > EPSILON && xi < 1.0 - EPSILON)
            .max_by(|&(i, &xi), &(j, &xj)| {
                let score_i = redcosts[i].abs() * fractionality(xi);
                let score_j = redcosts[j].abs() * fractionality(xj);
                score_i.partial_cmp(&score_j).unwrap()
            })
            .map(|(idx, _)| idx)
    }

    /// Strong-branches `edge_index` in `direction`: clamps the bound,
    /// pivots from the tour basis if it already agrees with `direction`,
    /// else from the cached contra basis (or cold, installing one on
    /// first use), bounded by `strong_branch_iter_limit` one-pivot steps,
    /// then restores the bound (spec §4.7).
    pub fn strong_branch<L: LpOracle>(
        &mut self,
        node_idx: usize,
        core_lp: &mut CoreLP<L>,
        edge_index: usize,
        direction: Direction,
    ) -> EngineResult<Estimate> {
        let tour_has_edge = core_lp.tour().tour_edges()[edge_index];
        let agrees_with_tour = matches!(
            (tour_has_edge, direction),
            (true, Direction::Up) | (false, Direction::Down)
        );

        core_lp.push_branch_row()?;
        core_lp.clamp_edge(edge_index, direction)?;

        if agrees_with_tour {
            core_lp.pivot_back()?;
        } else if let Some((colstat, rowstat)) = self.nodes[node_idx].price_basis.clone() {
            core_lp.oracle_mut().copy_base(&colstat, &rowstat)?;
        } else {
            core_lp.pivot_back()?;
        }

        let limit = self.config.strong_branch_iter_limit;
        let mut iters = 0;
        let mut infeasible = false;
        loop {
            if !core_lp.oracle().primal_feas() {
                match core_lp.oracle_mut().primal_recover(|lp| lp.primal_feas()) {
                    Ok(()) => {}
                    Err(_) => {
                        infeasible = true;
                        break;
                    }
                }
            }
            if iters >= limit || infeasible {
                break;
            }
            let progressed = core_lp.oracle_mut().one_primal_pivot()?;
            iters += 1;
            if !progressed {
                break;
            }
        }

        let estimate = if infeasible || !core_lp.oracle().primal_feas() {
            Estimate {
                value: f64::INFINITY,
                stat: EstimateStat::Infeas,
            }
        } else {
            let value = core_lp.oracle().get_objval();
            let stat = if value >= core_lp.tour().min_tour_value().0 as f64 - EPSILON {
                EstimateStat::Prune
            } else {
                EstimateStat::Feas
            };
            Estimate { value, stat }
        };

        if !agrees_with_tour && self.nodes[node_idx].price_basis.is_none() {
            self.nodes[node_idx].price_basis = Some(core_lp.oracle().get_base());
        }

        core_lp.unclamp_edge(edge_index)?;
        core_lp.pop_branch_row()?;
        core_lp.pivot_back()?;

        Ok(estimate)
    }

    /// Splits `parent` into a `Down` and an `Up` child on `edge`, scored by
    /// `scores` (the strong-branch estimates for each direction). Each
    /// child's tour is repaired (or reused unchanged) to honor the new
    /// clamp (spec §4.7 `split_problem`).
    pub fn split_problem(
        &mut self,
        parent_idx: usize,
        edge: (Node, Node),
        scores: [Estimate; 2],
        dist: &dyn DistanceOracle,
    ) -> EngineResult<[usize; 2]> {
        let parent_depth = self.nodes[parent_idx].depth;
        let parent_tour = Rc::clone(&self.nodes[parent_idx].tour);

        let mut children = [0usize; 2];
        for (slot, direction) in [Direction::Down, Direction::Up].into_iter().enumerate() {
            let estimate = scores[slot];
            let mut clamps = self.clamps_of(parent_idx);
            clamps.push(Clamp { edge, direction });

            let (order, maybe_infeas) = match build_branch_tour(dist, &parent_tour, &clamps) {
                Some(order) => (order, false),
                None => ((*parent_tour).clone(), true),
            };
            let tour_len = tour_length(dist, &order);
            let handle = self.tour_bank.add(order);

            let child = BranchNode {
                edge,
                direction,
                status: if maybe_infeas || estimate.stat == EstimateStat::Infeas {
                    NodeStatus::Pruned
                } else {
                    NodeStatus::NeedsCut
                },
                parent: Some(parent_idx),
                depth: parent_depth + 1,
                tour: handle,
                tour_len,
                maybe_infeas,
                price_basis: None,
            };
            self.nodes.push(child);
            children[slot] = self.nodes.len() - 1;
        }

        debug!(
            "split_problem: edge ({}, {}) -> children {:?}",
            edge.0 .0, edge.1 .0, children
        );
        Ok(children)
    }
}

fn fractionality(x: f64) -> f64 {
    0.5 - (x - 0.5).abs()
}

fn tour_length(dist: &dyn DistanceOracle, order: &[Node]) -> Distance {
    let n = order.len();
    (0..n)
        .map(|i| dist.distance(order[i], order[(i + 1) % n]))
        .fold(Distance::ZERO, |acc, d| acc + d)
}

/// Builds a Hamiltonian cycle honoring every clamp in `clamps`, starting
/// from `base_order`'s edge set where possible (spec §4.7 "Branch tour").
///
/// Degrees are tracked with fix/avail counters: every `Up` clamp raises
/// its two endpoints' forced-degree by one (an endpoint reaching 2 is
/// done); every `Down` clamp removes that pair from consideration
/// entirely. The chains formed by forced edges are then closed into one
/// cycle by repeatedly joining the two (chain-endpoint) pairs with the
/// lowest distance, skipping excluded pairs and premature self-closures.
/// Returns `None` if the clamps are jointly infeasible (a node forced to
/// degree > 2, or every valid closing edge excluded).
pub fn build_branch_tour(
    dist: &dyn DistanceOracle,
    base_order: &[Node],
    clamps: &[Clamp],
) -> Option<Vec<Node>> {
    let n = base_order.len();
    if n == 0 {
        return None;
    }

    let mut excluded: std::collections::HashSet<(Node, Node)> = std::collections::HashSet::new();
    let mut forced: std::collections::HashSet<(Node, Node)> = std::collections::HashSet::new();
    for clamp in clamps {
        let key = norm(clamp.edge);
        match clamp.direction {
            Direction::Down => {
                excluded.insert(key);
            }
            Direction::Up => {
                forced.insert(key);
            }
        }
    }

    // If the base order already honors every clamp, reuse it untouched.
    if honors_clamps(base_order, &excluded, &forced) {
        return Some(base_order.to_vec());
    }

    // union-find-free chain builder: each node starts as its own
    // singleton chain; `ends[v]` holds the (up to two) chain-neighbors of
    // v once forced edges are folded in.
    let mut ends: Vec<Vec<Node>> = vec![Vec::new(); n];
    for &(u, v) in &forced {
        if ends[u.0].len() >= 2 || ends[v.0].len() >= 2 {
            return None;
        }
        ends[u.0].push(v);
        ends[v.0].push(u);
    }

    // Collect current chain endpoints: nodes with degree 0 or 1 in the
    // forced-edge graph. A degree-0 node is a singleton chain (both its
    // own endpoints).
    let mut chain_of = vec![usize::MAX; n];
    let mut chains: Vec<Vec<Node>> = Vec::new();
    for v in 0..n {
        if chain_of[v] != usize::MAX || ends[v].len() == 2 {
            continue;
        }
        // walk the chain starting at v (degree 0 or 1 endpoint)
        let mut chain = vec![Node(v)];
        chain_of[v] = chains.len();
        let mut prev = Node(v);
        let mut cur = ends[v].first().copied();
        while let Some(c) = cur {
            if chain_of[c.0] != usize::MAX {
                break;
            }
            chain.push(c);
            chain_of[c.0] = chains.len();
            let next = ends[c.0].iter().copied().find(|&x| x != prev);
            prev = c;
            cur = next;
        }
        chains.push(chain);
    }
    if chains.iter().map(|c| c.len()).sum::<usize>() != n {
        // a forced cycle shorter than n formed among the clamps
        return None;
    }

    // Greedily merge chains by their cheapest valid endpoint pairing until
    // one remains, then close it.
    while chains.len() > 1 {
        let mut best: Option<(usize, usize, bool, bool, Distance)> = None;
        for i in 0..chains.len() {
            for j in (i + 1)..chains.len() {
                for &rev_i in &[false, true] {
                    for &rev_j in &[false, true] {
                        let a = if rev_i { *chains[i].first().unwrap() } else { *chains[i].last().unwrap() };
                        let b = if rev_j { *chains[j].last().unwrap() } else { *chains[j].first().unwrap() };
                        if excluded.contains(&norm((a, b))) {
                            continue;
                        }
                        let d = dist.distance(a, b);
                        if best.map_or(true, |(.., best_d)| d < best_d) {
                            best = Some((i, j, rev_i, rev_j, d));
                        }
                    }
                }
            }
        }
        let (i, j, rev_i, rev_j, _) = best?;
        let mut chain_i = chains[i].clone();
        let mut chain_j = chains[j].clone();
        if rev_i {
            chain_i.reverse();
        }
        if rev_j {
            chain_j.reverse();
        }
        chain_i.extend(chain_j);
        let (lo, hi) = (i.min(j), i.max(j));
        chains.remove(hi);
        chains.remove(lo);
        chains.push(chain_i);
    }

    let closing = norm((*chains[0].first().unwrap(), *chains[0].last().unwrap()));
    if excluded.contains(&closing) && chains[0].len() > 1 {
        return None;
    }

    Some(chains.into_iter().next().unwrap())
}

fn norm(edge: (Node, Node)) -> (Node, Node) {
    if edge.0 <= edge.1 {
        edge
    } else {
        (edge.1, edge.0)
    }
}

fn honors_clamps(
    order: &[Node],
    excluded: &std::collections::HashSet<(Node, Node)>,
    forced: &std::collections::HashSet<(Node, Node)>,
) -> bool {
    let n = order.len();
    let mut present: std::collections::HashSet<(Node, Node)> = std::collections::HashSet::new();
    for i in 0..n {
        present.insert(norm((order[i], order[(i + 1) % n])));
    }
    if excluded.iter().any(|e| present.contains(e)) {
        return false;
    }
    forced.iter().all(|e| present.contains(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RingDist(usize);

    impl DistanceOracle for RingDist {
        fn node_count(&self) -> usize {
            self.0
        }
        fn distance(&self, u: Node, v: Node) -> Distance {
            let n = self.0 as i64;
            let diff = (u.0 as i64 - v.0 as i64).unsigned_abs() as i64;
            Distance(diff.min(n - diff) as i32)
        }
        fn nearest(&self, v: Node, k: usize) -> Vec<Node> {
            let mut others: Vec<Node> = (0..self.0).map(Node).filter(|&n| n != v).collect();
            others.sort_by_key(|&n| self.distance(v, n));
            others.truncate(k);
            others
        }
    }

    #[test]
    fn unchanged_tour_is_reused_when_clamps_already_hold() {
        let dist = RingDist(5);
        let base: Vec<Node> = (0..5).map(Node).collect();
        let clamps = [Clamp {
            edge: (Node(0), Node(1)),
            direction: Direction::Up,
        }];
        let out = build_branch_tour(&dist, &base, &clamps).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn down_clamp_on_tour_edge_forces_a_repair() {
        let dist = RingDist(5);
        let base: Vec<Node> = (0..5).map(Node).collect();
        let clamps = [Clamp {
            edge: (Node(0), Node(1)),
            direction: Direction::Down,
        }];
        let out = build_branch_tour(&dist, &base, &clamps).unwrap();
        assert_eq!(out.len(), 5);
        let n = out.len();
        let has_01 = (0..n).any(|i| {
            let a = out[i];
            let b = out[(i + 1) % n];
            norm((a, b)) == norm((Node(0), Node(1)))
        });
        assert!(!has_01);
    }

    #[test]
    fn branch_tour_bank_shares_identical_orders() {
        let mut bank = BranchTourBank::new();
        let order = vec![Node(0), Node(1), Node(2)];
        let h1 = bank.add(order.clone());
        let h2 = bank.add(order);
        assert_eq!(bank.len(), 1);
        bank.del(&h1);
        bank.del(&h2);
        assert!(bank.is_empty());
    }
}
