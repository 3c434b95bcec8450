//! Held-Karp reasoning for the constraint that an undirected graph is a Hamiltonian cycle whose
//! edge costs sum to a cost variable.
//!
//! The [`LagrangianOneTreePropagator`] bounds the cost variable from below with the cost of a
//! minimum one-tree under Lagrangian penalties, which are adjusted by sub-gradient ascent. The
//! [`PrimOneTreeFinder`] is used for the cheap iterations of the ascent, and the
//! [`KruskalOneTreeFilter`] for the iterations which also prune the graph.
mod kruskal_one_tree_filter;
mod lagrangian_one_tree;
mod one_tree;
mod prim_one_tree_finder;

pub use kruskal_one_tree_filter::*;
pub use lagrangian_one_tree::*;
pub use one_tree::*;
pub use prim_one_tree_finder::*;

/// The domains of a tour constraint: the graph which forms the tour and the variable which holds
/// its cost.
#[derive(Clone, Debug)]
pub struct TourDomains<Graph, Cost> {
    pub graph: Graph,
    pub cost: Cost,
}
