//! The domains the propagators operate on.
//!
//! The propagators only depend on the [`GraphDomain`], [`DeltaSource`], [`BoundedInteger`] and
//! [`EnumeratedInteger`] traits; [`GraphVariable`], [`IntegerDomain`] and [`EnumeratedDomain`] are
//! checkpointed implementations of them which a host can use directly.
mod bound_graph;
mod delta;
mod enumerated_domain;
mod graph_domain;
mod graph_variable;
mod integer_domain;
#[cfg(test)]
pub(crate) mod test_solver;

pub use bound_graph::BoundGraph;
pub use delta::*;
pub use enumerated_domain::*;
pub use graph_domain::*;
pub use graph_variable::GraphVariable;
pub use integer_domain::*;
