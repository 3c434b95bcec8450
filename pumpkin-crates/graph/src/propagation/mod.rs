//! Contains the interface which graph propagators implement.
//!
//! A propagator is created from its arguments through a [`PropagatorConstructor`], which checks
//! the arguments against the domains it will operate on. The host then calls
//! [`GraphPropagator::propagate_from_scratch`] on the first call and after backtracking, and
//! [`GraphPropagator::propagate`] whenever [`GraphPropagator::notify`] asked to be enqueued.
mod constructor;
mod propagator;

pub use constructor::PropagatorConstructor;
pub use propagator::*;
