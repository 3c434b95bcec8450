use log::trace;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatusGraph;
use crate::containers::SparseSet;
use crate::create_statistics_struct;
use crate::engine::GraphDomain;
use crate::engine::GraphEvent;
use crate::engine::Orientation;
use crate::propagation::EnqueueDecision;
use crate::propagation::GraphPropagator;
use crate::propagation::Priority;
use crate::propagation::PropagatorConstructor;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The maximum number of incident edges of the nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DegreeBound {
    /// Every node has the same bound.
    Uniform(usize),
    /// `bounds[node]` is the bound of `node`.
    PerNode(Vec<usize>),
}

/// The [`PropagatorConstructor`] for the [`NodeDegreeAtMostPropagator`].
#[derive(Clone, Debug)]
pub struct NodeDegreeAtMostArgs {
    pub orientation: Orientation,
    pub bound: DegreeBound,
}

impl NodeDegreeAtMostArgs {
    pub fn uniform(orientation: Orientation, bound: usize) -> Self {
        NodeDegreeAtMostArgs {
            orientation,
            bound: DegreeBound::Uniform(bound),
        }
    }

    pub fn per_node(orientation: Orientation, bounds: Vec<usize>) -> Self {
        NodeDegreeAtMostArgs {
            orientation,
            bound: DegreeBound::PerNode(bounds),
        }
    }
}

impl<Graph: GraphDomain> PropagatorConstructor<Graph> for NodeDegreeAtMostArgs {
    type PropagatorImpl = NodeDegreeAtMostPropagator;

    fn create(self, graph: &Graph) -> Result<NodeDegreeAtMostPropagator, ConstraintOperationError> {
        let directed = graph.is_directed();
        if directed == (self.orientation == Orientation::Neighbours) {
            return Err(ConstraintOperationError::UnsupportedOrientation {
                orientation: self.orientation,
                directed,
            });
        }

        let num_nodes = graph.num_nodes();
        let bounds = match self.bound {
            DegreeBound::Uniform(bound) => vec![bound; num_nodes],
            DegreeBound::PerNode(bounds) => {
                if bounds.len() != num_nodes {
                    return Err(ConstraintOperationError::MismatchedNodeCount {
                        expected: num_nodes,
                        actual: bounds.len(),
                    });
                }
                bounds
            }
        };

        Ok(NodeDegreeAtMostPropagator {
            orientation: self.orientation,
            bounds,
            nodes: Vec::with_capacity(num_nodes),
            incident: Vec::with_capacity(num_nodes),
            statistics: NodeDegreeAtMostStatistics::default(),
        })
    }
}

create_statistics_struct!(NodeDegreeAtMostStatistics {
    num_propagations: usize,
    num_nodes_removed: usize,
    num_edges_removed: usize,
});

/// Bounds the number of successors, predecessors or neighbours of every node from above.
///
/// A node with more mandatory incident edges than its bound is removed; a node which reached its
/// bound loses every incident edge which is not mandatory. Only the addition of mandatory edges can
/// lead to new inferences.
#[derive(Clone, Debug)]
pub struct NodeDegreeAtMostPropagator {
    orientation: Orientation,
    bounds: Vec<usize>,
    nodes: Vec<usize>,
    incident: Vec<usize>,
    statistics: NodeDegreeAtMostStatistics,
}

fn mandatory_incident<Graph: GraphDomain>(
    orientation: Orientation,
    graph: &Graph,
    node: usize,
) -> &SparseSet {
    match orientation {
        Orientation::Successors | Orientation::Neighbours => graph.mandatory_successors(node),
        Orientation::Predecessors => graph.mandatory_predecessors(node),
    }
}

fn potential_incident<Graph: GraphDomain>(
    orientation: Orientation,
    graph: &Graph,
    node: usize,
) -> &SparseSet {
    match orientation {
        Orientation::Successors | Orientation::Neighbours => graph.potential_successors(node),
        Orientation::Predecessors => graph.potential_predecessors(node),
    }
}

fn remove_incident_edge<Graph: GraphDomain>(
    orientation: Orientation,
    graph: &mut Graph,
    node: usize,
    other: usize,
) -> Result<bool, EmptyDomain> {
    match orientation {
        Orientation::Successors | Orientation::Neighbours => graph.remove_edge(node, other),
        Orientation::Predecessors => graph.remove_edge(other, node),
    }
}

impl<Graph: GraphDomain> GraphPropagator<Graph> for NodeDegreeAtMostPropagator {
    fn name(&self) -> &str {
        "NodeDegreeAtMost"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn notify(&mut self, event: GraphEvent) -> EnqueueDecision {
        match event {
            GraphEvent::EdgeEnforced { .. } => EnqueueDecision::Enqueue,
            _ => EnqueueDecision::Skip,
        }
    }

    fn propagate_from_scratch(&mut self, graph: &mut Graph) -> PropagationStatusGraph {
        self.statistics.num_propagations += 1;

        self.nodes.clear();
        self.nodes.extend(graph.potential_nodes().iter());
        for index in 0..self.nodes.len() {
            let node = self.nodes[index];
            let bound = self.bounds[node];
            let mandatory_degree = mandatory_incident(self.orientation, &*graph, node).len();

            if mandatory_degree > bound {
                trace!("degree of {node} exceeds {bound}, removing the node");
                let _ = graph.remove_node(node)?;
                self.statistics.num_nodes_removed += 1;
            } else if mandatory_degree == bound
                && potential_incident(self.orientation, &*graph, node).len() > mandatory_degree
            {
                let orientation = self.orientation;
                self.incident.clear();
                let mandatory = mandatory_incident(orientation, &*graph, node);
                self.incident.extend(
                    potential_incident(orientation, &*graph, node)
                        .iter()
                        .filter(|&other| !mandatory.contains(other)),
                );
                for &other in &self.incident {
                    if remove_incident_edge(orientation, graph, node, other)? {
                        self.statistics.num_edges_removed += 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn is_entailed(&self, graph: &Graph) -> Entailment {
        let exceeded = graph
            .mandatory_nodes()
            .iter()
            .any(|node| {
                mandatory_incident(self.orientation, graph, node).len() > self.bounds[node]
            });
        if exceeded {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Inconsistency;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::BoundGraph;
    use crate::engine::DeltaSource;
    use crate::engine::GraphVariable;

    fn notify(propagator: &mut NodeDegreeAtMostPropagator, event: GraphEvent) -> EnqueueDecision {
        GraphPropagator::<GraphVariable>::notify(propagator, event)
    }

    #[test]
    fn saturated_node_loses_undecided_edges() {
        let mut solver = TestSolver::new(BoundGraph::empty(4, false), BoundGraph::complete(4, false));
        let _ = solver.graph.enforce_edge(0, 1).expect("edge is potential");
        let _ = solver.graph.enforce_edge(0, 2).expect("edge is potential");

        let _ = solver
            .new_propagator(NodeDegreeAtMostArgs::uniform(Orientation::Neighbours, 2))
            .expect("no conflict");

        solver.assert_removed_edge(0, 3);
        solver.assert_undecided_edge(1, 2);
        solver.assert_undecided_edge(1, 3);
    }

    #[test]
    fn node_over_its_bound_is_removed() {
        let mut solver = TestSolver::with_potential_edges(3, true, &[(0, 1), (0, 2), (1, 2)]);
        let mut propagator = solver
            .new_propagator(NodeDegreeAtMostArgs::per_node(
                Orientation::Successors,
                vec![1, 1, 1],
            ))
            .expect("no conflict");

        let since = solver.graph.events().len();
        let _ = solver.graph.enforce_edge(1, 2).expect("edge is potential");
        solver
            .notify_and_propagate(&mut propagator, since)
            .expect("no conflict");

        // 0 still has two potential successors, but neither is mandatory.
        solver.assert_undecided_edge(0, 1);
        solver.assert_undecided_edge(0, 2);
        assert_eq!(propagator.is_entailed(&solver.graph), Entailment::Undetermined);

        let _ = solver.graph.enforce_edge(0, 1).expect("edge is potential");
        let _ = solver.graph.enforce_edge(0, 2).expect("edge is potential");
        assert!(propagator.is_entailed(&solver.graph).is_violated());
        let result = propagator.propagate(&mut solver.graph);
        assert_eq!(result, Err(Inconsistency::EmptyDomain));
    }

    #[test]
    fn predecessors_are_counted_when_requested() {
        let mut solver = TestSolver::new(BoundGraph::empty(3, true), BoundGraph::complete(3, true));
        let _ = solver.graph.enforce_edge(1, 0).expect("edge is potential");

        let _ = solver
            .new_propagator(NodeDegreeAtMostArgs::uniform(Orientation::Predecessors, 1))
            .expect("no conflict");

        solver.assert_removed_edge(2, 0);
        solver.assert_undecided_edge(0, 2);
    }

    #[test]
    fn only_enforced_edges_enqueue() {
        let mut propagator = NodeDegreeAtMostArgs::uniform(Orientation::Neighbours, 2)
            .create(&GraphVariable::unconstrained(3, false))
            .expect("valid arguments");

        let enforced = notify(&mut propagator, GraphEvent::EdgeEnforced { from: 0, to: 1 });
        let removed = notify(&mut propagator, GraphEvent::EdgeRemoved { from: 0, to: 1 });

        assert_eq!(enforced, EnqueueDecision::Enqueue);
        assert_eq!(removed, EnqueueDecision::Skip);
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        let graph = GraphVariable::unconstrained(3, true);

        let neighbours = NodeDegreeAtMostArgs::uniform(Orientation::Neighbours, 1).create(&graph);
        let mismatched =
            NodeDegreeAtMostArgs::per_node(Orientation::Successors, vec![1, 2]).create(&graph);

        assert_eq!(
            neighbours.unwrap_err(),
            ConstraintOperationError::UnsupportedOrientation {
                orientation: Orientation::Neighbours,
                directed: true
            }
        );
        assert_eq!(
            mismatched.unwrap_err(),
            ConstraintOperationError::MismatchedNodeCount {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn satisfied_once_instantiated_within_bounds() {
        let mut solver = TestSolver::with_potential_edges(3, false, &[(0, 1), (1, 2)]);
        let mut propagator = solver
            .new_propagator(NodeDegreeAtMostArgs::uniform(Orientation::Neighbours, 2))
            .expect("no conflict");
        let _ = solver.graph.enforce_edge(0, 1).expect("edge is potential");
        let _ = solver.graph.enforce_edge(1, 2).expect("edge is potential");

        propagator
            .propagate_from_scratch(&mut solver.graph)
            .expect("no conflict");

        assert_eq!(propagator.is_entailed(&solver.graph), Entailment::Satisfied);
    }
}
