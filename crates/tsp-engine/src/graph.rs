//! The core graph: the LP's current column set (edges under consideration).
//!
//! Mirrors Camargue's `Graph::CoreGraph` (`includes/core_graph.hpp`): an
//! append-only edge list plus a `(min,max) -> index` lookup and adjacency
//! lists, rebuilt whenever an edge is appended. Edges are never removed —
//! the LP can send a column `AtLower` forever, but the graph keeps it.

use std::collections::HashMap;

use tsp_core::instance::{distance::Distance, node::Node};

/// One column of the core LP: an edge between two nodes with its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    pub ends: [Node; 2],
    pub len: Distance,
}

impl GraphEdge {
    pub fn new(u: Node, v: Node, len: Distance) -> Self {
        debug_assert_ne!(u, v, "core graph edges must be loopless");
        let (a, b) = if u <= v { (u, v) } else { (v, u) };
        Self { ends: [a, b], len }
    }
}

/// A neighbor reached through a specific core-graph edge index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adj {
    pub neighbor: Node,
    pub edge_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CoreGraph {
    edges: Vec<GraphEdge>,
    index_of: HashMap<(Node, Node), usize>,
    adjacency: Vec<Vec<Adj>>,
    node_count: usize,
}

impl CoreGraph {
    pub fn new(node_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            index_of: HashMap::new(),
            adjacency: vec![Vec::new(); node_count],
            node_count,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> GraphEdge {
        self.edges[index]
    }

    pub fn adjacency(&self, node: Node) -> &[Adj] {
        &self.adjacency[node.0]
    }

    /// Appends `edge`, returning its index. Keeps `index_of` and `adjacency`
    /// in lockstep with `edges` (invariant from spec §3).
    pub fn add_edge(&mut self, edge: GraphEdge) -> usize {
        let key = (edge.ends[0], edge.ends[1]);
        debug_assert!(
            !self.index_of.contains_key(&key),
            "core graph edges are appended, never replaced"
        );
        let index = self.edges.len();
        self.edges.push(edge);
        self.index_of.insert(key, index);
        self.adjacency[edge.ends[0].0].push(Adj {
            neighbor: edge.ends[1],
            edge_index: index,
        });
        self.adjacency[edge.ends[1].0].push(Adj {
            neighbor: edge.ends[0],
            edge_index: index,
        });
        index
    }

    /// Appends a whole batch in order; returns the assigned indices.
    pub fn add_edges(&mut self, batch: impl IntoIterator<Item = GraphEdge>) -> Vec<usize> {
        batch.into_iter().map(|e| self.add_edge(e)).collect()
    }

    pub fn find_edge_index(&self, u: Node, v: Node) -> Option<usize> {
        let key = if u <= v { (u, v) } else { (v, u) };
        self.index_of.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_updates_index_and_adjacency() {
        let mut g = CoreGraph::new(3);
        let i0 = g.add_edge(GraphEdge::new(Node(0), Node(1), Distance(5)));
        let i1 = g.add_edge(GraphEdge::new(Node(1), Node(2), Distance(7)));

        assert_eq!(g.find_edge_index(Node(1), Node(0)), Some(i0));
        assert_eq!(g.find_edge_index(Node(2), Node(1)), Some(i1));
        assert_eq!(g.find_edge_index(Node(0), Node(2)), None);

        let adj0 = g.adjacency(Node(1));
        assert_eq!(adj0.len(), 2);
    }

    #[test]
    fn edges_never_move_once_appended() {
        let mut g = CoreGraph::new(4);
        let i0 = g.add_edge(GraphEdge::new(Node(0), Node(1), Distance(1)));
        let _ = g.add_edge(GraphEdge::new(Node(2), Node(3), Distance(2)));
        assert_eq!(g.edge(i0).ends, [Node(0), Node(1)]);
    }
}
