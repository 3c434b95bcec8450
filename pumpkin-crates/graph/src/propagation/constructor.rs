use super::GraphPropagator;
use crate::basic_types::ConstraintOperationError;

/// The arguments of a propagator, from which the propagator is created.
pub trait PropagatorConstructor<Domains: ?Sized> {
    type PropagatorImpl: GraphPropagator<Domains>;

    /// Creates the propagator; fails if the arguments are not valid for `domains`.
    fn create(self, domains: &Domains) -> Result<Self::PropagatorImpl, ConstraintOperationError>;
}
