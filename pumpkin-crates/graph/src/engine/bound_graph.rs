use crate::containers::SparseSet;
use crate::pumpkin_assert_simple;

/// A graph over a fixed universe of nodes `0..num_nodes`, used as either bound of a
/// [`GraphVariable`](super::GraphVariable).
///
/// Adding an edge adds its endpoints; removing a node through [`BoundGraph::remove_node`] removes
/// its incident edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundGraph {
    directed: bool,
    nodes: SparseSet,
    /// The successors of every node; the neighbours if the graph is undirected.
    successors: Vec<SparseSet>,
    /// The predecessors of every node; empty if the graph is undirected.
    predecessors: Vec<SparseSet>,
}

impl BoundGraph {
    /// Creates a graph without nodes or edges.
    pub fn empty(num_nodes: usize, directed: bool) -> Self {
        BoundGraph {
            directed,
            nodes: SparseSet::empty(num_nodes),
            successors: vec![SparseSet::empty(num_nodes); num_nodes],
            predecessors: if directed {
                vec![SparseSet::empty(num_nodes); num_nodes]
            } else {
                vec![]
            },
        }
    }

    /// Creates the graph containing every node and every edge between two distinct nodes.
    pub fn complete(num_nodes: usize, directed: bool) -> Self {
        let mut graph = BoundGraph::empty(num_nodes, directed);
        for from in 0..num_nodes {
            for to in 0..num_nodes {
                if from != to {
                    let _ = graph.add_edge(from, to);
                }
            }
        }
        graph
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn nodes(&self) -> &SparseSet {
        &self.nodes
    }

    pub fn successors(&self, node: usize) -> &SparseSet {
        &self.successors[node]
    }

    pub fn predecessors(&self, node: usize) -> &SparseSet {
        if self.directed {
            &self.predecessors[node]
        } else {
            &self.successors[node]
        }
    }

    pub fn contains_node(&self, node: usize) -> bool {
        self.nodes.contains(node)
    }

    pub fn contains_edge(&self, from: usize, to: usize) -> bool {
        self.successors[from].contains(to)
    }

    /// The number of edges (arcs, if directed) in the graph.
    pub fn num_edges(&self) -> usize {
        let endpoints = self
            .successors
            .iter()
            .map(SparseSet::len)
            .sum::<usize>();
        if self.directed {
            endpoints
        } else {
            // A self-loop is stored once, every other edge twice.
            let loops = (0..self.num_nodes())
                .filter(|&node| self.successors[node].contains(node))
                .count();
            (endpoints + loops) / 2
        }
    }

    pub fn add_node(&mut self, node: usize) -> bool {
        self.nodes.insert(node)
    }

    /// Removes the node together with its incident edges.
    pub fn remove_node(&mut self, node: usize) -> bool {
        let incident = self.successors[node].iter().collect::<Vec<_>>();
        for other in incident {
            let _ = self.remove_edge(node, other);
        }
        if self.directed {
            let incident = self.predecessors[node].iter().collect::<Vec<_>>();
            for other in incident {
                let _ = self.remove_edge(other, node);
            }
        }
        self.remove_isolated_node(node)
    }

    /// Removes a node which has no incident edges left.
    pub(crate) fn remove_isolated_node(&mut self, node: usize) -> bool {
        pumpkin_assert_simple!(
            self.successors[node].is_empty() && self.predecessors(node).is_empty(),
            "node {node} still has incident edges"
        );
        self.nodes.remove(node)
    }

    /// Adds the edge and its endpoints; returns whether the edge is new.
    pub fn add_edge(&mut self, from: usize, to: usize) -> bool {
        let _ = self.nodes.insert(from);
        let _ = self.nodes.insert(to);
        if !self.successors[from].insert(to) {
            return false;
        }
        if self.directed {
            let _ = self.predecessors[to].insert(from);
        } else {
            let _ = self.successors[to].insert(from);
        }
        true
    }

    pub fn remove_edge(&mut self, from: usize, to: usize) -> bool {
        if !self.successors[from].remove(to) {
            return false;
        }
        if self.directed {
            let _ = self.predecessors[to].remove(from);
        } else {
            let _ = self.successors[to].remove(from);
        }
        true
    }

    /// Whether every node and edge of `self` is also in `other`.
    pub fn is_subgraph_of(&self, other: &BoundGraph) -> bool {
        self.nodes.iter().all(|node| other.contains_node(node))
            && self.nodes.iter().all(|from| {
                self.successors[from]
                    .iter()
                    .all(|to| other.contains_edge(from, to))
            })
    }
}
