//! Helpers for testing graph propagators. The [`TestSolver`] owns a [`GraphVariable`] and plays
//! the part of the host: it creates propagators, runs them to a common fixed point and backtracks.
use super::BoundGraph;
use super::DeltaSource;
use super::GraphDomain;
use super::GraphVariable;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusGraph;
use crate::propagation::EnqueueDecision;
use crate::propagation::GraphPropagator;
use crate::propagation::PropagatorConstructor;

#[derive(Debug)]
pub(crate) struct TestSolver {
    pub(crate) graph: GraphVariable,
}

impl TestSolver {
    pub(crate) fn new(lower_bound: BoundGraph, upper_bound: BoundGraph) -> TestSolver {
        TestSolver {
            graph: GraphVariable::new(lower_bound, upper_bound).expect("bounds are nested"),
        }
    }

    /// A solver whose upper bound contains exactly the given edges and whose lower bound is empty.
    pub(crate) fn with_potential_edges(
        num_nodes: usize,
        directed: bool,
        edges: &[(usize, usize)],
    ) -> TestSolver {
        let mut upper_bound = BoundGraph::empty(num_nodes, directed);
        for node in 0..num_nodes {
            let _ = upper_bound.add_node(node);
        }
        for &(from, to) in edges {
            let _ = upper_bound.add_edge(from, to);
        }
        TestSolver::new(BoundGraph::empty(num_nodes, directed), upper_bound)
    }

    /// Creates the propagator and performs its initial propagation.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<Constructor::PropagatorImpl, Inconsistency>
    where
        Constructor: PropagatorConstructor<GraphVariable>,
    {
        let mut propagator = constructor
            .create(&self.graph)
            .expect("the arguments are valid for the graph");
        propagator.propagate_from_scratch(&mut self.graph)?;
        Ok(propagator)
    }

    /// Notifies the propagator of the events since `since` and propagates if it asks to be
    /// enqueued.
    pub(crate) fn notify_and_propagate(
        &mut self,
        propagator: &mut dyn GraphPropagator<GraphVariable>,
        since: usize,
    ) -> PropagationStatusGraph {
        let events = self.graph.events()[since..].to_vec();
        let decisions = events
            .into_iter()
            .map(|event| propagator.notify(event))
            .collect::<Vec<_>>();
        if decisions.contains(&EnqueueDecision::Enqueue) {
            propagator.propagate(&mut self.graph)?;
        }
        Ok(())
    }

    /// Runs the propagators until none of them is enqueued by the events of the others.
    pub(crate) fn propagate_until_fixed_point(
        &mut self,
        propagators: &mut [&mut dyn GraphPropagator<GraphVariable>],
    ) -> PropagationStatusGraph {
        let mut seen = vec![0; propagators.len()];
        for (propagator, seen) in propagators.iter_mut().zip(seen.iter_mut()) {
            propagator.propagate_from_scratch(&mut self.graph)?;
            *seen = self.graph.events().len();
        }

        loop {
            let mut enqueued_any = false;
            for (propagator, seen) in propagators.iter_mut().zip(seen.iter_mut()) {
                let events = self.graph.events()[*seen..].to_vec();
                let mut enqueue = false;
                for event in events {
                    enqueue |= propagator.notify(event) == EnqueueDecision::Enqueue;
                }
                if enqueue {
                    enqueued_any = true;
                    propagator.propagate(&mut self.graph)?;
                }
                *seen = self.graph.events().len();
            }
            if !enqueued_any {
                return Ok(());
            }
        }
    }

    pub(crate) fn backtrack(
        &mut self,
        checkpoint: usize,
        propagator: &mut dyn GraphPropagator<GraphVariable>,
    ) {
        self.graph.synchronise(checkpoint);
        propagator.synchronise(&self.graph);
    }

    pub(crate) fn assert_mandatory_edge(&self, from: usize, to: usize) {
        assert!(
            self.graph.is_mandatory_edge(from, to),
            "expected ({from}, {to}) to be mandatory"
        );
    }

    pub(crate) fn assert_removed_edge(&self, from: usize, to: usize) {
        assert!(
            !self.graph.is_potential_edge(from, to),
            "expected ({from}, {to}) to be removed"
        );
    }

    pub(crate) fn assert_undecided_edge(&self, from: usize, to: usize) {
        assert!(
            self.graph.is_potential_edge(from, to) && !self.graph.is_mandatory_edge(from, to),
            "expected ({from}, {to}) to be potential but not mandatory"
        );
    }
}
