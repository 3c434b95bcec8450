use super::BoundGraph;
use super::DeltaSource;
use super::GraphDomain;
use super::GraphEvent;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Trail;
use crate::containers::SparseSet;
use crate::pumpkin_assert_advanced;

/// A checkpointed graph variable.
///
/// Every change is pushed on a [`Trail`] of [`GraphEvent`]s. The trail is both the undo log used
/// by [`GraphVariable::synchronise`] and the event log exposed through [`DeltaSource`].
#[derive(Clone, Debug)]
pub struct GraphVariable {
    lower_bound: BoundGraph,
    upper_bound: BoundGraph,
    trail: Trail<GraphEvent>,
}

impl GraphVariable {
    /// Creates a variable with the given bounds. The lower bound has to be a subgraph of the upper
    /// bound over the same nodes.
    pub fn new(
        lower_bound: BoundGraph,
        upper_bound: BoundGraph,
    ) -> Result<GraphVariable, ConstraintOperationError> {
        if lower_bound.num_nodes() != upper_bound.num_nodes()
            || lower_bound.is_directed() != upper_bound.is_directed()
            || !lower_bound.is_subgraph_of(&upper_bound)
        {
            return Err(ConstraintOperationError::InconsistentBounds);
        }

        Ok(GraphVariable {
            lower_bound,
            upper_bound,
            trail: Trail::default(),
        })
    }

    /// A variable whose domain contains every subgraph of the complete graph over `num_nodes`
    /// nodes.
    pub fn unconstrained(num_nodes: usize, directed: bool) -> GraphVariable {
        GraphVariable {
            lower_bound: BoundGraph::empty(num_nodes, directed),
            upper_bound: BoundGraph::complete(num_nodes, directed),
            trail: Trail::default(),
        }
    }

    pub fn lower_bound(&self) -> &BoundGraph {
        &self.lower_bound
    }

    pub fn upper_bound(&self) -> &BoundGraph {
        &self.upper_bound
    }

    pub fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
    }

    pub fn checkpoint(&self) -> usize {
        self.trail.checkpoint()
    }

    /// Undoes every change made after `checkpoint` was created.
    pub fn synchronise(&mut self, checkpoint: usize) {
        for event in self.trail.synchronise(checkpoint) {
            match event {
                GraphEvent::EdgeEnforced { from, to } => {
                    let _ = self.lower_bound.remove_edge(from, to);
                }
                GraphEvent::EdgeRemoved { from, to } => {
                    let _ = self.upper_bound.add_edge(from, to);
                }
                GraphEvent::NodeEnforced(node) => {
                    let _ = self.lower_bound.remove_isolated_node(node);
                }
                GraphEvent::NodeRemoved(node) => {
                    let _ = self.upper_bound.add_node(node);
                }
            }
        }
        pumpkin_assert_advanced!(self.lower_bound.is_subgraph_of(&self.upper_bound));
    }
}

impl GraphDomain for GraphVariable {
    fn num_nodes(&self) -> usize {
        self.upper_bound.num_nodes()
    }

    fn is_directed(&self) -> bool {
        self.upper_bound.is_directed()
    }

    fn mandatory_nodes(&self) -> &SparseSet {
        self.lower_bound.nodes()
    }

    fn potential_nodes(&self) -> &SparseSet {
        self.upper_bound.nodes()
    }

    fn mandatory_successors(&self, node: usize) -> &SparseSet {
        self.lower_bound.successors(node)
    }

    fn potential_successors(&self, node: usize) -> &SparseSet {
        self.upper_bound.successors(node)
    }

    fn mandatory_predecessors(&self, node: usize) -> &SparseSet {
        self.lower_bound.predecessors(node)
    }

    fn potential_predecessors(&self, node: usize) -> &SparseSet {
        self.upper_bound.predecessors(node)
    }

    fn enforce_node(&mut self, node: usize) -> Result<bool, EmptyDomain> {
        if !self.upper_bound.contains_node(node) {
            return Err(EmptyDomain);
        }
        if !self.lower_bound.add_node(node) {
            return Ok(false);
        }
        self.trail.push(GraphEvent::NodeEnforced(node));
        Ok(true)
    }

    fn remove_node(&mut self, node: usize) -> Result<bool, EmptyDomain> {
        if self.lower_bound.contains_node(node) {
            return Err(EmptyDomain);
        }
        if !self.upper_bound.contains_node(node) {
            return Ok(false);
        }

        // The incident edges are removed one by one so that each removal is logged.
        let successors = self.upper_bound.successors(node).iter().collect::<Vec<_>>();
        for to in successors {
            let _ = self.remove_edge(node, to)?;
        }
        if self.is_directed() {
            let predecessors = self
                .upper_bound
                .predecessors(node)
                .iter()
                .collect::<Vec<_>>();
            for from in predecessors {
                let _ = self.remove_edge(from, node)?;
            }
        }

        let _ = self.upper_bound.remove_isolated_node(node);
        self.trail.push(GraphEvent::NodeRemoved(node));
        Ok(true)
    }

    fn enforce_edge(&mut self, from: usize, to: usize) -> Result<bool, EmptyDomain> {
        if !self.upper_bound.contains_edge(from, to) {
            return Err(EmptyDomain);
        }
        if self.lower_bound.contains_edge(from, to) {
            return Ok(false);
        }

        let _ = self.enforce_node(from)?;
        let _ = self.enforce_node(to)?;
        let _ = self.lower_bound.add_edge(from, to);
        self.trail.push(GraphEvent::EdgeEnforced { from, to });
        Ok(true)
    }

    fn remove_edge(&mut self, from: usize, to: usize) -> Result<bool, EmptyDomain> {
        if self.lower_bound.contains_edge(from, to) {
            return Err(EmptyDomain);
        }
        if !self.upper_bound.remove_edge(from, to) {
            return Ok(false);
        }
        self.trail.push(GraphEvent::EdgeRemoved { from, to });
        Ok(true)
    }

    fn is_instantiated(&self) -> bool {
        self.lower_bound.nodes().len() == self.upper_bound.nodes().len()
            && self.upper_bound.nodes().iter().all(|node| {
                self.lower_bound.successors(node).len() == self.upper_bound.successors(node).len()
            })
    }
}

impl DeltaSource for GraphVariable {
    fn events(&self) -> &[GraphEvent] {
        &self.trail
    }
}
