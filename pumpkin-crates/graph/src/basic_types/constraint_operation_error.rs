use thiserror::Error;

use crate::engine::Orientation;

/// Errors related to constructing a propagator. These are raised before any propagation takes
/// place and indicate that the arguments do not describe a valid constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// The lower bound graph is not contained in the upper bound graph, or the two bounds differ in
    /// size or directedness.
    #[error("the lower bound graph is not a subgraph of the upper bound graph")]
    InconsistentBounds,
    /// The number of per-node values does not match the number of nodes of the graph.
    #[error("expected {expected} per-node values but {actual} were provided")]
    MismatchedNodeCount { expected: usize, actual: usize },
    /// The orientation cannot be used with the kind of graph (directed or undirected) provided.
    #[error("orientation {orientation:?} is not supported on this graph (directed: {directed})")]
    UnsupportedOrientation {
        orientation: Orientation,
        directed: bool,
    },
    /// The cost matrix is not square.
    #[error("row {row} of the cost matrix has {actual} entries instead of {expected}")]
    NonSquareCostMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A tour constraint requires an undirected graph.
    #[error("a tour constraint requires an undirected graph")]
    DirectedTourGraph,
    /// A tour is only defined over at least three nodes.
    #[error("a tour requires at least 3 nodes, the graph has {0}")]
    TooFewNodes(usize),
}
