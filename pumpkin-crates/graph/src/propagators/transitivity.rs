use log::trace;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatusGraph;
use crate::create_statistics_struct;
use crate::engine::DeltaSource;
use crate::engine::GraphDeltaMonitor;
use crate::engine::GraphDomain;
use crate::engine::GraphEvent;
use crate::engine::GraphEventKind;
use crate::propagation::EnqueueDecision;
use crate::propagation::GraphPropagator;
use crate::propagation::Priority;
use crate::propagation::PropagatorConstructor;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`PropagatorConstructor`] for the [`TransitivityPropagator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TransitivityArgs;

impl<Graph> PropagatorConstructor<Graph> for TransitivityArgs
where
    Graph: GraphDomain + DeltaSource,
{
    type PropagatorImpl = TransitivityPropagator;

    fn create(self, graph: &Graph) -> Result<TransitivityPropagator, ConstraintOperationError> {
        let num_nodes = graph.num_nodes();
        Ok(TransitivityPropagator {
            monitor: GraphDeltaMonitor::default(),
            enforced: Vec::with_capacity(num_nodes),
            removed: Vec::with_capacity(num_nodes),
            incident: Vec::with_capacity(num_nodes),
            full_pass_pending: true,
            statistics: TransitivityStatistics::default(),
        })
    }
}

create_statistics_struct!(TransitivityStatistics {
    num_full_propagations: usize,
    num_incremental_propagations: usize,
    num_edges_enforced: usize,
    num_edges_removed: usize,
});

/// Propagator for the constraint that the edge relation of a graph is transitive:
/// `(a, b)` and `(b, c)` imply `(a, c)` for distinct `a`, `b` and `c`.
///
/// Enforced and removed edges are processed from two worklists until no new obligations arise, so
/// the depth of a cascade does not affect the stack.
#[derive(Clone, Debug)]
pub struct TransitivityPropagator {
    monitor: GraphDeltaMonitor,
    /// Edges which became mandatory and whose consequences are pending.
    enforced: Vec<(usize, usize)>,
    /// Edges which were removed and whose consequences are pending.
    removed: Vec<(usize, usize)>,
    /// Scratch buffer for incidence sets which are iterated while the graph is modified.
    incident: Vec<usize>,
    /// Set after backtracking; the next call to `propagate` rescans the whole graph.
    full_pass_pending: bool,
    statistics: TransitivityStatistics,
}

impl<Graph> GraphPropagator<Graph> for TransitivityPropagator
where
    Graph: GraphDomain + DeltaSource,
{
    fn name(&self) -> &str {
        "Transitivity"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn notify(&mut self, event: GraphEvent) -> EnqueueDecision {
        if GraphEventKind::edge_events().contains(event.kind()) {
            EnqueueDecision::Enqueue
        } else {
            EnqueueDecision::Skip
        }
    }

    fn propagate_from_scratch(&mut self, graph: &mut Graph) -> PropagationStatusGraph {
        self.statistics.num_full_propagations += 1;
        self.full_pass_pending = false;
        self.enforced.clear();
        self.removed.clear();

        let num_nodes = graph.num_nodes();
        for from in graph.potential_nodes().iter() {
            for to in 0..num_nodes {
                if graph.is_mandatory_edge(from, to) {
                    self.enforced.push((from, to));
                } else if !graph.is_potential_edge(from, to) {
                    self.removed.push((from, to));
                }
            }
        }

        let status = self.filter(graph);
        self.monitor.unfreeze(&*graph);
        status
    }

    fn propagate(&mut self, graph: &mut Graph) -> PropagationStatusGraph {
        if self.full_pass_pending {
            return self.propagate_from_scratch(graph);
        }
        self.statistics.num_incremental_propagations += 1;
        self.enforced.clear();
        self.removed.clear();

        self.monitor.freeze(&*graph);
        let (enforced, removed) = (&mut self.enforced, &mut self.removed);
        self.monitor
            .for_each_event(&*graph, GraphEventKind::edge_events(), |event| match event {
                GraphEvent::EdgeEnforced { from, to } => enforced.push((from, to)),
                GraphEvent::EdgeRemoved { from, to } => removed.push((from, to)),
                GraphEvent::NodeEnforced(_) | GraphEvent::NodeRemoved(_) => {}
            });

        let status = self.filter(graph);
        self.monitor.unfreeze(&*graph);
        status
    }

    fn synchronise(&mut self, graph: &Graph) {
        self.monitor.synchronise(graph);
        self.full_pass_pending = true;
    }

    fn is_entailed(&self, graph: &Graph) -> Entailment {
        let num_nodes = graph.num_nodes();
        for first in 0..num_nodes {
            for second in graph.mandatory_successors(first).iter() {
                if second == first {
                    continue;
                }
                let witness = graph.mandatory_successors(second).iter().any(|third| {
                    third != first && third != second && !graph.is_potential_edge(first, third)
                });
                if witness {
                    return Entailment::Violated;
                }
            }
        }

        if graph.is_instantiated() {
            Entailment::Satisfied
        } else {
            Entailment::Undetermined
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

impl TransitivityPropagator {
    /// Drains both worklists until neither holds pending edges.
    fn filter<Graph: GraphDomain>(&mut self, graph: &mut Graph) -> PropagationStatusGraph {
        loop {
            while let Some((from, to)) = self.enforced.pop() {
                self.edge_enforced(graph, from, to)?;
            }
            while let Some((from, to)) = self.removed.pop() {
                self.edge_removed(graph, from, to)?;
            }
            if self.enforced.is_empty() {
                return Ok(());
            }
        }
    }

    fn edge_enforced<Graph: GraphDomain>(
        &mut self,
        graph: &mut Graph,
        from: usize,
        to: usize,
    ) -> PropagationStatusGraph {
        if from == to {
            return Ok(());
        }
        trace!("transitivity: ({from}, {to}) is mandatory");

        // (from, to) and (to, i) imply (from, i).
        self.incident.clear();
        self.incident.extend(graph.potential_successors(to).iter());
        for index in 0..self.incident.len() {
            let other = self.incident[index];
            if other == to || other == from {
                continue;
            }
            if graph.is_mandatory_edge(to, other) {
                if graph.enforce_edge(from, other)? {
                    self.statistics.num_edges_enforced += 1;
                    self.enforced.push((from, other));
                }
            } else if !graph.is_potential_edge(from, other) && graph.remove_edge(to, other)? {
                self.statistics.num_edges_removed += 1;
                self.removed.push((to, other));
            }
        }

        // (i, from) and (from, to) imply (i, to).
        self.incident.clear();
        self.incident.extend(graph.potential_predecessors(from).iter());
        for index in 0..self.incident.len() {
            let other = self.incident[index];
            if other == to || other == from {
                continue;
            }
            if graph.is_mandatory_edge(other, from) {
                if graph.enforce_edge(other, to)? {
                    self.statistics.num_edges_enforced += 1;
                    self.enforced.push((other, to));
                }
            } else if !graph.is_potential_edge(other, to) && graph.remove_edge(other, from)? {
                self.statistics.num_edges_removed += 1;
                self.removed.push((other, from));
            }
        }
        Ok(())
    }

    fn edge_removed<Graph: GraphDomain>(
        &mut self,
        graph: &mut Graph,
        from: usize,
        to: usize,
    ) -> PropagationStatusGraph {
        if from == to {
            return Ok(());
        }
        trace!("transitivity: ({from}, {to}) is removed");

        // (from, i) mandatory and (i, to) would imply (from, to).
        self.incident.clear();
        self.incident.extend(graph.mandatory_successors(from).iter());
        for index in 0..self.incident.len() {
            let other = self.incident[index];
            if graph.remove_edge(other, to)? {
                self.statistics.num_edges_removed += 1;
                self.removed.push((other, to));
            }
        }

        // (i, to) mandatory and (from, i) would imply (from, to).
        self.incident.clear();
        self.incident.extend(graph.mandatory_predecessors(to).iter());
        for index in 0..self.incident.len() {
            let other = self.incident[index];
            if graph.remove_edge(from, other)? {
                self.statistics.num_edges_removed += 1;
                self.removed.push((from, other));
            }
        }
        Ok(())
    }
}
