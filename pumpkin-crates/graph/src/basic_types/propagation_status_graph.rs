use thiserror::Error;

/// The result of invoking a graph propagator. The propagation can either succeed or identify an
/// inconsistency, in which case the current search branch has to be abandoned by the host.
pub type PropagationStatusGraph = Result<(), Inconsistency>;

/// Returned by a domain operation which would leave the domain without any value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("the domain became empty")]
pub struct EmptyDomain;

/// The reason for a failed propagation.
///
/// Neither variant is recovered from inside a propagator; the host restores the domains to an
/// earlier checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Inconsistency {
    /// A mutation of a domain wiped it out.
    #[error("domain wipeout")]
    EmptyDomain,
    /// The propagator established that the current domains admit no solution without mutating
    /// them.
    #[error("conflict detected by {0}")]
    Conflict(&'static str),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}
