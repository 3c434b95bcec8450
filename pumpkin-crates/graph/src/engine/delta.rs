use enumset::EnumSet;
use enumset::EnumSetType;

use crate::pumpkin_assert_simple;

/// A change to the domain of a graph variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphEvent {
    /// The edge was added to the lower bound.
    EdgeEnforced { from: usize, to: usize },
    /// The edge was removed from the upper bound.
    EdgeRemoved { from: usize, to: usize },
    /// The node was added to the lower bound.
    NodeEnforced(usize),
    /// The node was removed from the upper bound.
    NodeRemoved(usize),
}

impl GraphEvent {
    pub fn kind(&self) -> GraphEventKind {
        match self {
            GraphEvent::EdgeEnforced { .. } => GraphEventKind::EdgeEnforced,
            GraphEvent::EdgeRemoved { .. } => GraphEventKind::EdgeRemoved,
            GraphEvent::NodeEnforced(_) => GraphEventKind::NodeEnforced,
            GraphEvent::NodeRemoved(_) => GraphEventKind::NodeRemoved,
        }
    }
}

#[derive(Debug, EnumSetType, Hash)]
pub enum GraphEventKind {
    EdgeEnforced,
    EdgeRemoved,
    NodeEnforced,
    NodeRemoved,
}

impl GraphEventKind {
    pub fn edge_events() -> EnumSet<GraphEventKind> {
        GraphEventKind::EdgeEnforced | GraphEventKind::EdgeRemoved
    }
}

/// A domain which records its changes in an ordered log. After backtracking, the log only holds the
/// changes which were not undone.
pub trait DeltaSource {
    fn events(&self) -> &[GraphEvent];
}

/// A propagator's view on a [`DeltaSource`].
///
/// Between [`GraphDeltaMonitor::freeze`] and [`GraphDeltaMonitor::unfreeze`], the monitor replays
/// the events which happened since the previous window and before the freeze. Unfreezing skips
/// every event recorded during the window, so that a propagator does not observe its own changes
/// as incoming events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphDeltaMonitor {
    /// The first event which has not been observed yet.
    cursor: usize,
    /// The end (exclusive) of the events to replay in the current window.
    frozen_at: Option<usize>,
}

impl GraphDeltaMonitor {
    pub fn freeze(&mut self, delta: &(impl DeltaSource + ?Sized)) {
        pumpkin_assert_simple!(self.frozen_at.is_none(), "the monitor is already frozen");
        self.frozen_at = Some(delta.events().len());
    }

    /// Calls `procedure` on every event of one of the `kinds` in the current window, in the order in
    /// which the events happened.
    pub fn for_each_event(
        &self,
        delta: &(impl DeltaSource + ?Sized),
        kinds: EnumSet<GraphEventKind>,
        mut procedure: impl FnMut(GraphEvent),
    ) {
        let end = self
            .frozen_at
            .expect("events can only be replayed while the monitor is frozen");
        delta.events()[self.cursor.min(end)..end]
            .iter()
            .filter(|event| kinds.contains(event.kind()))
            .for_each(|&event| procedure(event));
    }

    pub fn unfreeze(&mut self, delta: &(impl DeltaSource + ?Sized)) {
        self.cursor = delta.events().len();
        self.frozen_at = None;
    }

    /// Called after the host backtracked; events which were undone are forgotten.
    pub fn synchronise(&mut self, delta: &(impl DeltaSource + ?Sized)) {
        self.cursor = self.cursor.min(delta.events().len());
        self.frozen_at = None;
    }
}
