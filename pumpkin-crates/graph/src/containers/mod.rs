//! Contains containers which are used by the graph domains and the propagators.
mod disjoint_sets;
mod sparse_set;
mod tied_minimum_heap;

pub(crate) use disjoint_sets::*;
pub use sparse_set::*;
pub(crate) use tied_minimum_heap::*;
