use log::trace;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Entailment;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusGraph;
use crate::create_statistics_struct;
use crate::engine::GraphDomain;
use crate::engine::GraphEvent;
use crate::propagation::EnqueueDecision;
use crate::propagation::GraphPropagator;
use crate::propagation::Priority;
use crate::propagation::PropagatorConstructor;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`PropagatorConstructor`] for the [`ConnectedPropagator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectedArgs;

impl<Graph: GraphDomain> PropagatorConstructor<Graph> for ConnectedArgs {
    type PropagatorImpl = ConnectedPropagator;

    fn create(self, graph: &Graph) -> Result<ConnectedPropagator, ConstraintOperationError> {
        let num_nodes = graph.num_nodes();
        Ok(ConnectedPropagator {
            reached: vec![false; num_nodes],
            queue: Vec::with_capacity(num_nodes),
            candidates: Vec::with_capacity(num_nodes),
            statistics: ConnectedStatistics::default(),
        })
    }
}

create_statistics_struct!(ConnectedStatistics {
    num_propagations: usize,
    num_nodes_removed: usize,
    num_nodes_enforced: usize,
});

/// Propagator for the constraint that the graph consists of a single connected component, where
/// arcs of a directed graph are followed in both directions.
///
/// Nodes which cannot be reached from the mandatory nodes in the upper bound are removed, and
/// potential nodes which separate two mandatory nodes become mandatory.
#[derive(Clone, Debug)]
pub struct ConnectedPropagator {
    reached: Vec<bool>,
    queue: Vec<usize>,
    candidates: Vec<usize>,
    statistics: ConnectedStatistics,
}

/// Marks the nodes reachable from `root` in the upper bound without passing through `excluded`.
fn explore<Graph: GraphDomain>(
    graph: &Graph,
    root: usize,
    excluded: Option<usize>,
    reached: &mut [bool],
    queue: &mut Vec<usize>,
) {
    reached.iter_mut().for_each(|reached| *reached = false);
    queue.clear();

    reached[root] = true;
    queue.push(root);
    while let Some(node) = queue.pop() {
        let neighbours = graph
            .potential_successors(node)
            .iter()
            .chain(graph.potential_predecessors(node).iter());
        for neighbour in neighbours {
            if !reached[neighbour] && Some(neighbour) != excluded {
                reached[neighbour] = true;
                queue.push(neighbour);
            }
        }
    }
}

fn reaches_all_mandatory_nodes<Graph: GraphDomain>(graph: &Graph, reached: &[bool]) -> bool {
    graph.mandatory_nodes().iter().all(|node| reached[node])
}

impl<Graph: GraphDomain> GraphPropagator<Graph> for ConnectedPropagator {
    fn name(&self) -> &str {
        "Connected"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn notify(&mut self, event: GraphEvent) -> EnqueueDecision {
        match event {
            GraphEvent::EdgeEnforced { .. } => EnqueueDecision::Skip,
            _ => EnqueueDecision::Enqueue,
        }
    }

    fn propagate_from_scratch(&mut self, graph: &mut Graph) -> PropagationStatusGraph {
        self.statistics.num_propagations += 1;

        let Some(root) = graph.mandatory_nodes().iter().next() else {
            return Ok(());
        };

        explore(&*graph, root, None, &mut self.reached, &mut self.queue);
        if !reaches_all_mandatory_nodes(&*graph, &self.reached) {
            return Err(Inconsistency::Conflict("Connected"));
        }

        self.candidates.clear();
        self.candidates.extend(
            graph
                .potential_nodes()
                .iter()
                .filter(|&node| !self.reached[node]),
        );
        for &node in &self.candidates {
            trace!("connected: {node} cannot reach {root}");
            let _ = graph.remove_node(node)?;
            self.statistics.num_nodes_removed += 1;
        }

        if graph.mandatory_nodes().len() < 2 {
            return Ok(());
        }

        // A node separating two mandatory nodes has to be part of every solution. Enforcing such a
        // node does not change which other nodes separate the mandatory nodes, so one pass suffices.
        self.candidates.clear();
        self.candidates.extend(
            graph
                .potential_nodes()
                .iter()
                .filter(|&node| !graph.mandatory_nodes().contains(node)),
        );
        for index in 0..self.candidates.len() {
            let node = self.candidates[index];
            explore(&*graph, root, Some(node), &mut self.reached, &mut self.queue);
            if !reaches_all_mandatory_nodes(&*graph, &self.reached) {
                trace!("connected: {node} is an articulation point");
                let _ = graph.enforce_node(node)?;
                self.statistics.num_nodes_enforced += 1;
            }
        }
        Ok(())
    }

    fn is_entailed(&self, graph: &Graph) -> Entailment {
        // The graph without nodes counts as connected.
        let Some(root) = graph.mandatory_nodes().iter().next() else {
            return if graph.is_instantiated() {
                Entailment::Satisfied
            } else {
                Entailment::Undetermined
            };
        };

        let mut reached = vec![false; graph.num_nodes()];
        explore(graph, root, None, &mut reached, &mut Vec::new());
        if !reaches_all_mandatory_nodes(graph, &reached) {
            Entailment::Violated
        } else if graph.is_instantiated() {
            Entailment::Satisfied
        } else {
            Entailment::Undetermined
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
