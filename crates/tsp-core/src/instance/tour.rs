use crate::instance::distance::Distance;
use crate::instance::edge::UnEdge;
use crate::instance::node::Node;

/// A closed tour over an undirected edge set, together with its total cost.
///
/// Edges are stored in visiting order (`edges[i]` connects the `i`-th and
/// `(i+1)`-th visited node, wrapping around), which is what cut separators
/// and the branch executor need when walking the tour to find segments.
#[derive(Debug, Clone)]
pub struct UnTour {
    pub edges: Vec<UnEdge>,
    pub cost: Distance,
}

impl UnTour {
    pub fn new(edges: Vec<UnEdge>, cost: Distance) -> Self {
        Self { edges, cost }
    }

    pub fn num_nodes(&self) -> usize {
        self.edges.len()
    }

    /// Reconstructs the node-visiting order starting at `start`, by walking
    /// the edge set as an undirected cycle.
    pub fn node_order_from(&self, start: Node) -> Vec<Node> {
        let n = self.edges.len();
        let mut adjacency = vec![[Node(usize::MAX); 2]; n];
        for edge in &self.edges {
            push_neighbor(&mut adjacency, edge.from, edge.to);
            push_neighbor(&mut adjacency, edge.to, edge.from);
        }

        let mut order = Vec::with_capacity(n);
        let mut prev = Node(usize::MAX);
        let mut current = start;
        for _ in 0..n {
            order.push(current);
            let neighbors = adjacency[current.0];
            let next = if neighbors[0] != prev {
                neighbors[0]
            } else {
                neighbors[1]
            };
            prev = current;
            current = next;
        }
        order
    }
}

fn push_neighbor(adjacency: &mut [[Node; 2]], of: Node, neighbor: Node) {
    let slot = &mut adjacency[of.0];
    if slot[0] == Node(usize::MAX) {
        slot[0] = neighbor;
    } else {
        slot[1] = neighbor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_order_from_walks_the_cycle() {
        let edges = vec![
            UnEdge::new(Node(0), Node(1)),
            UnEdge::new(Node(1), Node(2)),
            UnEdge::new(Node(2), Node(0)),
        ];
        let tour = UnTour::new(edges, Distance(30));
        let order = tour.node_order_from(Node(0));
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], Node(0));
    }
}
