use log::trace;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatusGraph;
use crate::create_statistics_struct;
use crate::engine::EnumeratedInteger;
use crate::engine::GraphDomain;
use crate::engine::GraphEvent;
use crate::engine::Orientation;
use crate::propagation::EnqueueDecision;
use crate::propagation::GraphPropagator;
use crate::propagation::Priority;
use crate::propagation::PropagatorConstructor;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The domains of a channel between an undirected graph and one successor variable per node.
#[derive(Clone, Debug)]
pub struct ChannelDomains<Graph, Successor> {
    pub graph: Graph,
    /// `successors[node]` holds the successor of `node`.
    pub successors: Vec<Successor>,
}

/// The [`PropagatorConstructor`] for the [`NeighbourSuccessorChannelPropagator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NeighbourSuccessorChannelArgs;

impl<Graph, Successor> PropagatorConstructor<ChannelDomains<Graph, Successor>>
    for NeighbourSuccessorChannelArgs
where
    Graph: GraphDomain,
    Successor: EnumeratedInteger,
{
    type PropagatorImpl = NeighbourSuccessorChannelPropagator;

    fn create(
        self,
        domains: &ChannelDomains<Graph, Successor>,
    ) -> Result<NeighbourSuccessorChannelPropagator, ConstraintOperationError> {
        if domains.graph.is_directed() {
            return Err(ConstraintOperationError::UnsupportedOrientation {
                orientation: Orientation::Neighbours,
                directed: true,
            });
        }
        let num_nodes = domains.graph.num_nodes();
        if domains.successors.len() != num_nodes {
            return Err(ConstraintOperationError::MismatchedNodeCount {
                expected: num_nodes,
                actual: domains.successors.len(),
            });
        }

        Ok(NeighbourSuccessorChannelPropagator {
            values: Vec::with_capacity(num_nodes),
            statistics: NeighbourSuccessorChannelStatistics::default(),
        })
    }
}

create_statistics_struct!(NeighbourSuccessorChannelStatistics {
    num_propagations: usize,
    num_successors_assigned: usize,
    num_values_removed: usize,
});

/// Channels an undirected graph to successor variables: the successor of every node is one of its
/// neighbours, and of every mandatory edge `{i, j}` either `j` is the successor of `i` or `i` is
/// the successor of `j`.
///
/// Only the graph reports its changes through [`GraphPropagator::notify`]; the host enqueues the
/// propagator after any change to a successor variable.
#[derive(Clone, Debug)]
pub struct NeighbourSuccessorChannelPropagator {
    values: Vec<usize>,
    statistics: NeighbourSuccessorChannelStatistics,
}

impl<Graph, Successor> GraphPropagator<ChannelDomains<Graph, Successor>>
    for NeighbourSuccessorChannelPropagator
where
    Graph: GraphDomain,
    Successor: EnumeratedInteger,
{
    fn name(&self) -> &str {
        "NeighbourSuccessorChannel"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn notify(&mut self, event: GraphEvent) -> EnqueueDecision {
        match event {
            GraphEvent::EdgeEnforced { .. } | GraphEvent::EdgeRemoved { .. } => {
                EnqueueDecision::Enqueue
            }
            GraphEvent::NodeEnforced(_) | GraphEvent::NodeRemoved(_) => EnqueueDecision::Skip,
        }
    }

    fn propagate_from_scratch(
        &mut self,
        domains: &mut ChannelDomains<Graph, Successor>,
    ) -> PropagationStatusGraph {
        self.statistics.num_propagations += 1;
        let ChannelDomains { graph, successors } = domains;
        let num_nodes = graph.num_nodes();

        for node in 0..num_nodes {
            self.values.clear();
            self.values.extend(graph.mandatory_successors(node).iter());
            for &neighbour in &self.values {
                let assigned = if !successors[node].contains(neighbour) {
                    successors[neighbour].assign(node)?
                } else if !successors[neighbour].contains(node) {
                    successors[node].assign(neighbour)?
                } else {
                    false
                };
                if assigned {
                    trace!("channel: the edge {{{node}, {neighbour}}} fixes a successor");
                    self.statistics.num_successors_assigned += 1;
                }
            }

            self.values.clear();
            self.values.extend(
                successors[node]
                    .values()
                    .filter(|&value| value >= num_nodes || !graph.is_potential_edge(node, value)),
            );
            for &value in &self.values {
                if successors[node].remove(value)? {
                    self.statistics.num_values_removed += 1;
                }
            }
        }
        Ok(())
    }

    fn is_entailed(&self, domains: &ChannelDomains<Graph, Successor>) -> Entailment {
        let ChannelDomains { graph, successors } = domains;
        let num_nodes = graph.num_nodes();

        for node in 0..num_nodes {
            let outside_neighbourhood = successors[node]
                .value()
                .is_some_and(|value| value >= num_nodes || !graph.is_potential_edge(node, value));
            let uncovered_edge = graph.mandatory_successors(node).iter().any(|neighbour| {
                !successors[node].contains(neighbour) && !successors[neighbour].contains(node)
            });
            if outside_neighbourhood || uncovered_edge {
                return Entailment::Violated;
            }
        }

        if graph.is_instantiated() && successors.iter().all(EnumeratedInteger::is_fixed) {
            Entailment::Satisfied
        } else {
            Entailment::Undetermined
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
