//! The incumbent tour and its position bookkeeping (spec §3 `TourBank`).

use tsp_core::instance::{distance::Distance, node::Node};

use crate::error::{EngineError, EngineResult};
use crate::graph::CoreGraph;

/// The best integral tour found so far, plus the data structures separators
/// and the clique/tooth banks dereference cliques against.
#[derive(Debug, Clone)]
pub struct TourBank {
    /// `best_tour_nodes[i]` is the node visited at tour position `i`.
    best_tour_nodes: Vec<Node>,
    /// `perm[v]` is the tour position of node `v`; the mutual inverse of
    /// `best_tour_nodes`.
    perm: Vec<usize>,
    /// Indicator vector over core-graph edge indices.
    best_tour_edges: Vec<bool>,
    min_tour_value: Distance,
}

impl TourBank {
    /// Builds a `TourBank` from a Hamiltonian node order, computing edge
    /// indicators and tour length against `core_graph`.
    pub fn from_node_order(
        core_graph: &CoreGraph,
        tour_nodes: Vec<Node>,
    ) -> EngineResult<Self> {
        let n = core_graph.node_count();
        if tour_nodes.len() != n {
            return Err(EngineError::InvariantBroken(format!(
                "tour has {} nodes, expected {n}",
                tour_nodes.len()
            )));
        }

        let mut perm = vec![usize::MAX; n];
        for (pos, &node) in tour_nodes.iter().enumerate() {
            if perm[node.0] != usize::MAX {
                return Err(EngineError::InvariantBroken(format!(
                    "node {} appears twice in tour",
                    node.0
                )));
            }
            perm[node.0] = pos;
        }

        let mut best_tour_edges = vec![false; core_graph.edge_count()];
        let mut min_tour_value = Distance::ZERO;
        for i in 0..n {
            let u = tour_nodes[i];
            let v = tour_nodes[(i + 1) % n];
            let idx = core_graph.find_edge_index(u, v).ok_or_else(|| {
                EngineError::InvariantBroken(format!(
                    "tour edge ({}, {}) missing from core graph",
                    u.0, v.0
                ))
            })?;
            best_tour_edges[idx] = true;
            min_tour_value += core_graph.edge(idx).len;
        }

        Ok(Self {
            best_tour_nodes: tour_nodes,
            perm,
            best_tour_edges,
            min_tour_value,
        })
    }

    pub fn node_count(&self) -> usize {
        self.best_tour_nodes.len()
    }

    pub fn tour_nodes(&self) -> &[Node] {
        &self.best_tour_nodes
    }

    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    pub fn tour_edges(&self) -> &[bool] {
        &self.best_tour_edges
    }

    pub fn min_tour_value(&self) -> Distance {
        self.min_tour_value
    }

    /// Position of `node` in the current tour.
    pub fn position_of(&self, node: Node) -> usize {
        self.perm[node.0]
    }

    pub fn node_at(&self, position: usize) -> Node {
        self.best_tour_nodes[position % self.best_tour_nodes.len()]
    }

    /// Resizes the edge indicator when new columns are appended to the core
    /// graph (new edges start out with indicator 0; the invariant that
    /// `Σ best_tour_edges = n` is preserved since new edges cannot be tour
    /// edges until an augmentation rebuilds the whole vector).
    pub fn extend_edge_indicators(&mut self, new_edge_count: usize) {
        self.best_tour_edges.resize(new_edge_count, false);
    }

    /// Replaces the tour wholesale after an augmenting pivot (`handle_aug`,
    /// spec §4.1). Caller is responsible for having checked that the new
    /// objective value is strictly smaller.
    pub fn replace(
        &mut self,
        tour_nodes: Vec<Node>,
        tour_edges: Vec<bool>,
        tour_value: Distance,
    ) -> EngineResult<()> {
        if tour_value >= self.min_tour_value {
            return Err(EngineError::InvariantBroken(
                "augmentation did not strictly decrease tour value".into(),
            ));
        }
        let n = tour_nodes.len();
        let mut perm = vec![usize::MAX; n];
        for (pos, &node) in tour_nodes.iter().enumerate() {
            perm[node.0] = pos;
        }
        self.best_tour_nodes = tour_nodes;
        self.perm = perm;
        self.best_tour_edges = tour_edges;
        self.min_tour_value = tour_value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphEdge;

    fn triangle() -> CoreGraph {
        let mut g = CoreGraph::new(3);
        g.add_edge(GraphEdge::new(Node(0), Node(1), Distance(1)));
        g.add_edge(GraphEdge::new(Node(1), Node(2), Distance(2)));
        g.add_edge(GraphEdge::new(Node(2), Node(0), Distance(3)));
        g
    }

    #[test]
    fn from_node_order_computes_length_and_perm() {
        let g = triangle();
        let bank = TourBank::from_node_order(&g, vec![Node(0), Node(1), Node(2)]).unwrap();
        assert_eq!(bank.min_tour_value(), Distance(6));
        assert_eq!(bank.position_of(Node(2)), 2);
        assert!(bank.tour_edges().iter().all(|&b| b));
    }

    #[test]
    fn rejects_non_hamiltonian_order() {
        let g = triangle();
        let err = TourBank::from_node_order(&g, vec![Node(0), Node(0), Node(2)]);
        assert!(err.is_err());
    }
}
