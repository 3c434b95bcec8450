mod constraint_operation_error;
mod entailment;
mod propagation_status_graph;
mod trail;

pub use constraint_operation_error::ConstraintOperationError;
pub use entailment::Entailment;
pub use propagation_status_graph::*;
pub(crate) use trail::Trail;
