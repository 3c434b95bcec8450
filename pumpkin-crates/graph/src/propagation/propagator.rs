use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatusGraph;
#[cfg(doc)]
use crate::engine::GraphDomain;
use crate::engine::GraphEvent;
use crate::statistics::StatisticLogger;

/// A propagator removes nodes and edges from the upper bound, and adds them to the lower bound, of
/// the graph domains it is posted on (and adjusts any other variable it involves), or reports that
/// the domains admit no solution.
///
/// `Domains` is the collection of variables the propagator operates on; for most graph
/// propagators it is a single [`GraphDomain`].
///
/// A call to one of the propagation methods runs to a fixed point of the propagator before it
/// returns. Any [`Inconsistency`](crate::basic_types::Inconsistency) is returned to the host
/// immediately; the propagator does not attempt to repair the domains.
pub trait GraphPropagator<Domains: ?Sized> {
    /// Return the name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// See [`Priority`]. By default the priority is [`Priority::VeryLow`].
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Returns whether the propagator should be enqueued because of `event`.
    ///
    /// By default every event enqueues the propagator.
    fn notify(&mut self, _event: GraphEvent) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Propagates without relying on incremental state, considering the whole domain.
    ///
    /// This is called on the first propagation and after the host backtracked.
    fn propagate_from_scratch(&mut self, domains: &mut Domains) -> PropagationStatusGraph;

    /// Propagates the changes which happened since the previous call.
    ///
    /// By default this calls [`GraphPropagator::propagate_from_scratch`].
    fn propagate(&mut self, domains: &mut Domains) -> PropagationStatusGraph {
        self.propagate_from_scratch(domains)
    }

    /// Called after the host backtracked, so that incremental state can be brought in line with the
    /// restored domains.
    fn synchronise(&mut self, _domains: &Domains) {}

    /// Whether the constraint is satisfied, violated or undetermined for the current domains.
    fn is_entailed(&self, domains: &Domains) -> Entailment;

    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    Enqueue,
    Skip,
}

/// The priority of a propagator, used for determining the order in which propagators are called.
///
/// Propagators with a low computational complexity should have a high priority, so that cheap
/// inferences are made before expensive propagators such as the Lagrangian relaxation run.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}
