use crate::basic_types::EmptyDomain;
use crate::containers::SparseSet;

/// Which incident edges of a node a per-node constraint counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Outgoing arcs of a directed graph.
    Successors,
    /// Incoming arcs of a directed graph.
    Predecessors,
    /// Incident edges of an undirected graph.
    Neighbours,
}

/// The domain of a graph variable: a lower bound graph of mandatory nodes and edges, contained in
/// an upper bound graph of potential nodes and edges, over the nodes `0..num_nodes`.
///
/// For undirected graphs the successors and the predecessors of a node are both its neighbours,
/// and an edge may be addressed as `(from, to)` or `(to, from)`.
///
/// The mutating operations return whether the domain changed, and an [`EmptyDomain`] if the
/// mutation is infeasible (e.g. removing a mandatory edge). Implementations are expected to be
/// backtrackable by the host; propagators never undo their own changes.
pub trait GraphDomain {
    /// The number of nodes in the universe of the graph.
    fn num_nodes(&self) -> usize;

    fn is_directed(&self) -> bool;

    fn mandatory_nodes(&self) -> &SparseSet;

    fn potential_nodes(&self) -> &SparseSet;

    fn mandatory_successors(&self, node: usize) -> &SparseSet;

    fn potential_successors(&self, node: usize) -> &SparseSet;

    fn mandatory_predecessors(&self, node: usize) -> &SparseSet;

    fn potential_predecessors(&self, node: usize) -> &SparseSet;

    fn enforce_node(&mut self, node: usize) -> Result<bool, EmptyDomain>;

    /// Removes the node, and all edges incident to it, from the upper bound.
    fn remove_node(&mut self, node: usize) -> Result<bool, EmptyDomain>;

    /// Adds the edge, and both its endpoints, to the lower bound.
    fn enforce_edge(&mut self, from: usize, to: usize) -> Result<bool, EmptyDomain>;

    fn remove_edge(&mut self, from: usize, to: usize) -> Result<bool, EmptyDomain>;

    /// Whether the lower bound equals the upper bound.
    fn is_instantiated(&self) -> bool;

    fn is_mandatory_edge(&self, from: usize, to: usize) -> bool {
        self.mandatory_successors(from).contains(to)
    }

    fn is_potential_edge(&self, from: usize, to: usize) -> bool {
        self.potential_successors(from).contains(to)
    }
}
