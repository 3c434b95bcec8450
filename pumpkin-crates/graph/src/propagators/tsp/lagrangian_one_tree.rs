use log::debug;
use log::warn;

use super::KruskalOneTreeFilter;
use super::OneTree;
use super::OneTreeFinder;
use super::PrimOneTreeFinder;
use super::TourDomains;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Entailment;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusGraph;
use crate::create_statistics_struct;
use crate::engine::BoundedInteger;
use crate::engine::GraphDomain;
use crate::engine::GraphEvent;
use crate::engine::IntDomainEvent;
use crate::propagation::EnqueueDecision;
use crate::propagation::GraphPropagator;
use crate::propagation::PropagatorConstructor;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The parameters of the sub-gradient method.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LagrangianOptions {
    /// Skip propagation until [`LagrangianOneTreePropagator::on_solution`] is called; without an
    /// upper bound on the cost hardly any edge can be pruned.
    pub wait_for_first_solution: bool,
    /// The number of iterations with the fast finder between two pruning iterations.
    pub num_sprints: usize,
    /// The number of batches of sprints per relaxation.
    pub num_outer_iterations: usize,
    pub initial_alpha: f64,
    /// The factor by which alpha is multiplied after each batch; halved after each batch as well.
    pub initial_beta: f64,
    /// A bound whose fractional part is below this tolerance is rounded down before it is used.
    pub integrality_tolerance: f64,
    /// Added to the pruning budget.
    pub pruning_epsilon: f64,
    /// The amount by which a bound has to exceed the best bound to replace it.
    pub improvement_threshold: f64,
    /// The distance of the step target above the bound when the upper bound of the cost is below
    /// the bound.
    pub stagnation_offset: f64,
}

impl Default for LagrangianOptions {
    fn default() -> Self {
        LagrangianOptions {
            wait_for_first_solution: false,
            num_sprints: 30,
            num_outer_iterations: 5,
            initial_alpha: 2.0,
            initial_beta: 0.5,
            integrality_tolerance: 0.001,
            pruning_epsilon: 0.001,
            improvement_threshold: 1.0,
            stagnation_offset: 0.1,
        }
    }
}

/// The [`PropagatorConstructor`] for the [`LagrangianOneTreePropagator`].
#[derive(Clone, Debug)]
pub struct LagrangianOneTreeArgs {
    /// The symmetric matrix of edge costs.
    pub costs: Vec<Vec<i32>>,
    pub options: LagrangianOptions,
}

impl<Graph, Cost> PropagatorConstructor<TourDomains<Graph, Cost>> for LagrangianOneTreeArgs
where
    Graph: GraphDomain,
    Cost: BoundedInteger,
{
    type PropagatorImpl = LagrangianOneTreePropagator;

    fn create(
        self,
        domains: &TourDomains<Graph, Cost>,
    ) -> Result<LagrangianOneTreePropagator, ConstraintOperationError> {
        if domains.graph.is_directed() {
            return Err(ConstraintOperationError::DirectedTourGraph);
        }
        let num_nodes = domains.graph.num_nodes();
        if num_nodes < 3 {
            return Err(ConstraintOperationError::TooFewNodes(num_nodes));
        }
        if self.costs.len() != num_nodes {
            return Err(ConstraintOperationError::MismatchedNodeCount {
                expected: num_nodes,
                actual: self.costs.len(),
            });
        }
        if let Some((row, costs)) = self
            .costs
            .iter()
            .enumerate()
            .find(|(_, costs)| costs.len() != num_nodes)
        {
            return Err(ConstraintOperationError::NonSquareCostMatrix {
                row,
                expected: num_nodes,
                actual: costs.len(),
            });
        }

        Ok(LagrangianOneTreePropagator {
            options: self.options,
            original_costs: self.costs,
            costs: vec![vec![0.0; num_nodes]; num_nodes],
            penalties: vec![0.0; num_nodes],
            total_penalty: 0.0,
            step: 0.0,
            best_bound: f64::NEG_INFINITY,
            mandatory_edges: Vec::new(),
            solution_found: false,
            fast_finder: PrimOneTreeFinder::new(num_nodes),
            filter: KruskalOneTreeFilter::new(num_nodes),
            support: Support::None,
            statistics: LagrangianOneTreeStatistics::default(),
        })
    }
}

create_statistics_struct!(LagrangianOneTreeStatistics {
    num_propagations: usize,
    num_relaxations: usize,
    num_fast_iterations: usize,
    num_pruning_iterations: usize,
    num_edges_removed: usize,
    num_edges_enforced: usize,
    num_extreme_penalties: usize,
});

/// Which finder computed the last one-tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Support {
    None,
    Fast,
    Filter,
}

/// Held-Karp bound for the constraint that an undirected graph is a Hamiltonian cycle over all of
/// its nodes whose total edge cost equals a cost variable.
///
/// Every relaxation alternates batches of sub-gradient iterations with the
/// [`PrimOneTreeFinder`] and pruning iterations with the [`KruskalOneTreeFilter`]. The penalties
/// persist across propagations, so that later relaxations start from the multipliers found
/// before. The propagator only prunes, so it is always entailed.
///
/// Changes to the graph are routed through [`GraphPropagator::notify`], changes to the bounds of
/// the cost variable through [`LagrangianOneTreePropagator::notify_cost`].
#[derive(Clone, Debug)]
pub struct LagrangianOneTreePropagator {
    options: LagrangianOptions,
    original_costs: Vec<Vec<i32>>,
    /// The original costs adjusted by the penalties of both endpoints.
    costs: Vec<Vec<f64>>,
    penalties: Vec<f64>,
    /// Twice the sum of the penalties, i.e. the amount the one-tree cost overestimates the bound.
    total_penalty: f64,
    step: f64,
    best_bound: f64,
    mandatory_edges: Vec<(usize, usize)>,
    solution_found: bool,
    fast_finder: PrimOneTreeFinder,
    filter: KruskalOneTreeFilter,
    support: Support,
    statistics: LagrangianOneTreeStatistics,
}

impl LagrangianOneTreePropagator {
    /// Signals that the host found a solution, which opens the gate of
    /// [`LagrangianOptions::wait_for_first_solution`].
    pub fn on_solution(&mut self) {
        self.solution_found = true;
    }

    /// Decides whether a change to the domain of the cost variable calls for a new relaxation. Only a
    /// lower upper bound tightens the pruning budget.
    pub fn notify_cost(&mut self, event: IntDomainEvent) -> EnqueueDecision {
        if self.is_waiting() {
            return EnqueueDecision::Skip;
        }
        match event {
            IntDomainEvent::Assign | IntDomainEvent::UpperBound => EnqueueDecision::Enqueue,
            IntDomainEvent::LowerBound | IntDomainEvent::Removal => EnqueueDecision::Skip,
        }
    }

    /// The mandatory edges `(i, j)` with `i < j` at the start of the last propagation.
    pub fn mandatory_edges(&self) -> &[(usize, usize)] {
        &self.mandatory_edges
    }

    /// Whether the edge is mandatory in the current domain of `graph`, which may have changed since
    /// [`LagrangianOneTreePropagator::mandatory_edges`] was taken.
    pub fn is_mandatory(&self, graph: &impl GraphDomain, from: usize, to: usize) -> bool {
        graph.is_mandatory_edge(from, to)
    }

    /// Whether the edge is part of the last one-tree; every edge is before a one-tree exists.
    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.support().map_or(true, |tree| tree.contains(from, to))
    }

    /// The last computed one-tree.
    pub fn support(&self) -> Option<&OneTree> {
        match self.support {
            Support::None => None,
            Support::Fast => Some(self.fast_finder.tree()),
            Support::Filter => Some(self.filter.tree()),
        }
    }

    /// See [`KruskalOneTreeFilter::marginal_cost`].
    pub fn replacement_cost(&self, from: usize, to: usize) -> f64 {
        self.filter.marginal_cost(from, to)
    }

    /// See [`KruskalOneTreeFilter::marginal_cost`].
    pub fn marginal_cost(&self, from: usize, to: usize) -> f64 {
        self.filter.marginal_cost(from, to)
    }

    /// A lower bound on the penalised cost of an edge which can still be part of a tour within the
    /// upper bound of `cost`.
    pub fn min_edge_value(&self, cost: &impl BoundedInteger) -> f64 {
        -(f64::from(cost.upper_bound()) + self.total_penalty)
    }

    pub fn penalties(&self) -> &[f64] {
        &self.penalties
    }

    pub fn total_penalty(&self) -> f64 {
        self.total_penalty
    }

    fn rebuild_mandatory_edges<Graph: GraphDomain>(&mut self, graph: &Graph) {
        self.mandatory_edges.clear();
        for from in 0..graph.num_nodes() {
            self.mandatory_edges.extend(
                graph
                    .mandatory_successors(from)
                    .iter()
                    .filter(|&to| from < to)
                    .map(|to| (from, to)),
            );
        }
    }

    fn is_waiting(&self) -> bool {
        self.options.wait_for_first_solution && !self.solution_found
    }

    fn update_costs(&mut self) {
        for (from, row) in self.costs.iter_mut().enumerate() {
            for (to, cost) in row.iter_mut().enumerate() {
                *cost = f64::from(self.original_costs[from][to])
                    + self.penalties[from]
                    + self.penalties[to];
            }
        }
    }

    fn track_best_bound(&mut self, bound: f64) {
        if bound > self.best_bound + self.options.improvement_threshold {
            self.best_bound = bound;
        }
    }

    /// Rounds `bound` down if it is within the integrality tolerance of an integer, and raises the
    /// lower bound of `cost` to its ceiling.
    fn raise_lower_bound(
        &self,
        bound: f64,
        cost: &mut impl BoundedInteger,
    ) -> Result<f64, EmptyDomain> {
        let bound = if bound - bound.floor() < self.options.integrality_tolerance {
            bound.floor()
        } else {
            bound
        };
        let _ = cost.raise_lower_bound(bound.ceil() as i32)?;
        Ok(bound)
    }

    fn fast_iteration<Graph, Cost>(
        &mut self,
        domains: &mut TourDomains<Graph, Cost>,
    ) -> Result<f64, Inconsistency>
    where
        Graph: GraphDomain,
        Cost: BoundedInteger,
    {
        self.statistics.num_fast_iterations += 1;
        self.fast_finder.compute(&self.costs, &domains.graph)?;
        self.support = Support::Fast;

        let bound = self.fast_finder.bound() - self.total_penalty;
        self.track_best_bound(bound);
        self.raise_lower_bound(bound, &mut domains.cost)
            .map_err(Inconsistency::from)
    }

    fn pruning_iteration<Graph, Cost>(
        &mut self,
        domains: &mut TourDomains<Graph, Cost>,
    ) -> Result<f64, Inconsistency>
    where
        Graph: GraphDomain,
        Cost: BoundedInteger,
    {
        self.statistics.num_pruning_iterations += 1;
        self.filter.compute(&self.costs, &domains.graph)?;
        self.support = Support::Filter;

        let bound = self.filter.bound() - self.total_penalty;
        self.track_best_bound(bound);
        let bound = self.raise_lower_bound(bound, &mut domains.cost)?;

        let budget = f64::from(domains.cost.upper_bound())
            + self.total_penalty
            + self.options.pruning_epsilon;
        let outcome = self.filter.prune(budget, &mut domains.graph)?;
        self.statistics.num_edges_removed += outcome.num_removed;
        self.statistics.num_edges_enforced += outcome.num_enforced;
        Ok(bound)
    }

    /// Computes the step of the sub-gradient method from the degrees in the last one-tree. The step
    /// is zero if the one-tree is a tour.
    fn update_step(&mut self, bound: f64, alpha: f64, upper_bound: i32) {
        let mut target = f64::from(upper_bound);
        if target < bound {
            target = bound + self.options.stagnation_offset;
        }

        let Some(tree) = self.support() else {
            self.step = 0.0;
            return;
        };
        let sum_of_squared_violations = (0..tree.num_nodes())
            .map(|node| {
                let violation = 2.0 - tree.degree(node) as f64;
                violation * violation
            })
            .sum::<f64>();

        self.step = if sum_of_squared_violations == 0.0 {
            0.0
        } else {
            alpha * (target - bound) / sum_of_squared_violations
        };
    }

    /// Moves every penalty by the step in the direction of its degree violation, then updates the
    /// penalised costs.
    fn update_penalties(&mut self) {
        if self.step == 0.0 {
            return;
        }
        let Some(tree) = self.support() else {
            return;
        };
        let degrees = (0..tree.num_nodes())
            .map(|node| tree.degree(node) as f64)
            .collect::<Vec<_>>();

        let limit = f64::MAX / (self.penalties.len() - 1) as f64;
        for (penalty, degree) in self.penalties.iter_mut().zip(degrees) {
            *penalty += (degree - 2.0) * self.step;
            if penalty.abs() > limit {
                warn!("Lagrangian multiplier {penalty} is close to the range of f64");
                self.statistics.num_extreme_penalties += 1;
            }
        }
        self.total_penalty = 2.0 * self.penalties.iter().sum::<f64>();
        self.update_costs();
    }

    fn lagrangian_relaxation<Graph, Cost>(
        &mut self,
        domains: &mut TourDomains<Graph, Cost>,
    ) -> PropagationStatusGraph
    where
        Graph: GraphDomain,
        Cost: BoundedInteger,
    {
        self.statistics.num_relaxations += 1;
        let mut alpha = self.options.initial_alpha;
        let mut beta = self.options.initial_beta;

        self.best_bound = f64::NEG_INFINITY;
        let _ = self.pruning_iteration(domains)?;

        for _ in 0..self.options.num_outer_iterations {
            for _ in 0..self.options.num_sprints {
                let bound = self.fast_iteration(domains)?;
                self.update_step(bound, alpha, domains.cost.upper_bound());
                self.update_penalties();
            }

            let bound = self.pruning_iteration(domains)?;
            self.update_step(bound, alpha, domains.cost.upper_bound());
            self.update_penalties();

            alpha *= beta;
            beta /= 2.0;
        }

        debug!(
            "Lagrangian relaxation: best bound {}, cost in [{}, {}], total penalty {}",
            self.best_bound,
            domains.cost.lower_bound(),
            domains.cost.upper_bound(),
            self.total_penalty
        );
        Ok(())
    }
}

impl<Graph, Cost> GraphPropagator<TourDomains<Graph, Cost>> for LagrangianOneTreePropagator
where
    Graph: GraphDomain,
    Cost: BoundedInteger,
{
    fn name(&self) -> &str {
        "LagrangianOneTree"
    }

    fn notify(&mut self, event: GraphEvent) -> EnqueueDecision {
        if self.is_waiting() {
            return EnqueueDecision::Skip;
        }
        match event {
            GraphEvent::EdgeEnforced { .. } | GraphEvent::EdgeRemoved { .. } => {
                EnqueueDecision::Enqueue
            }
            GraphEvent::NodeEnforced(_) | GraphEvent::NodeRemoved(_) => EnqueueDecision::Skip,
        }
    }

    fn propagate_from_scratch(
        &mut self,
        domains: &mut TourDomains<Graph, Cost>,
    ) -> PropagationStatusGraph {
        if self.is_waiting() {
            return Ok(());
        }
        self.statistics.num_propagations += 1;

        self.rebuild_mandatory_edges(&domains.graph);
        self.update_costs();
        loop {
            let lower_bound = domains.cost.lower_bound();
            self.lagrangian_relaxation(domains)?;
            if domains.cost.lower_bound() <= lower_bound {
                return Ok(());
            }
        }
    }

    fn is_entailed(&self, _domains: &TourDomains<Graph, Cost>) -> Entailment {
        Entailment::Satisfied
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GraphVariable;
    use crate::engine::IntegerDomain;

    type Domains = TourDomains<GraphVariable, IntegerDomain>;

    /// The unique optimal tour is 0-1-2-3-4-0 with cost 5; every other edge costs 10.
    fn cycle_costs() -> Vec<Vec<i32>> {
        (0..5)
            .map(|from: usize| {
                (0..5)
                    .map(|to: usize| match from.abs_diff(to) {
                        0 => 0,
                        1 | 4 => 1,
                        _ => 10,
                    })
                    .collect()
            })
            .collect()
    }

    fn domains(num_nodes: usize, lower_bound: i32, upper_bound: i32) -> Domains {
        TourDomains {
            graph: GraphVariable::unconstrained(num_nodes, false),
            cost: IntegerDomain::new(lower_bound, upper_bound).expect("non-empty domain"),
        }
    }

    fn propagator(domains: &Domains, options: LagrangianOptions) -> LagrangianOneTreePropagator {
        LagrangianOneTreeArgs {
            costs: cycle_costs(),
            options,
        }
        .create(domains)
        .expect("valid arguments")
    }

    #[test]
    fn bound_reaches_the_optimal_tour_cost() {
        let mut domains = domains(5, 0, 100);
        let mut propagator = propagator(&domains, LagrangianOptions::default());
        assert!(propagator.contains(1, 3));

        propagator
            .propagate_from_scratch(&mut domains)
            .expect("no conflict");

        assert_eq!(domains.cost.lower_bound(), 5);
        assert!(propagator.contains(1, 2));
        assert!(!propagator.contains(1, 3));
        assert_eq!(propagator.total_penalty(), 0.0);
        assert_eq!(propagator.min_edge_value(&domains.cost), -100.0);
        assert!(propagator.mandatory_edges().is_empty());
    }

    #[test]
    fn optimal_upper_bound_fixes_the_tour() {
        let mut domains = domains(5, 0, 5);
        let mut propagator = propagator(&domains, LagrangianOptions::default());

        propagator
            .propagate_from_scratch(&mut domains)
            .expect("no conflict");

        assert!(domains.graph.is_instantiated());
        for node in 0..5 {
            assert!(propagator.is_mandatory(&domains.graph, node, (node + 1) % 5));
        }
        assert!(!propagator.is_mandatory(&domains.graph, 0, 2));
        assert!(propagator.mandatory_edges().is_empty());
        assert_eq!(propagator.marginal_cost(0, 2), f64::INFINITY);

        propagator
            .propagate_from_scratch(&mut domains)
            .expect("no conflict");
        assert_eq!(propagator.mandatory_edges().len(), 5);
        assert_eq!(propagator.replacement_cost(3, 4), f64::INFINITY);
    }

    #[test]
    fn lowering_the_cost_upper_bound_enqueues_and_prunes() {
        let mut domains = domains(5, 0, 100);
        let mut propagator = propagator(&domains, LagrangianOptions::default());
        propagator
            .propagate_from_scratch(&mut domains)
            .expect("no conflict");
        assert!(domains.graph.is_potential_edge(0, 2));

        assert_eq!(
            propagator.notify_cost(IntDomainEvent::LowerBound),
            EnqueueDecision::Skip
        );
        assert_eq!(domains.cost.lower_upper_bound(5), Ok(true));
        assert_eq!(
            propagator.notify_cost(IntDomainEvent::UpperBound),
            EnqueueDecision::Enqueue
        );
        propagator.propagate(&mut domains).expect("no conflict");

        assert!(domains.graph.is_instantiated());
        assert!(!domains.graph.is_potential_edge(0, 2));
    }

    #[test]
    fn upper_bound_below_the_optimum_is_a_wipeout() {
        let mut domains = domains(5, 0, 4);
        let mut propagator = propagator(&domains, LagrangianOptions::default());

        let result = propagator.propagate_from_scratch(&mut domains);

        assert_eq!(result, Err(Inconsistency::EmptyDomain));
    }

    #[test]
    fn waits_for_the_first_solution_when_asked() {
        let mut domains = domains(5, 0, 100);
        let options = LagrangianOptions {
            wait_for_first_solution: true,
            ..LagrangianOptions::default()
        };
        let mut propagator = propagator(&domains, options);

        propagator
            .propagate_from_scratch(&mut domains)
            .expect("no conflict");
        assert_eq!(domains.cost.lower_bound(), 0);
        assert!(propagator.support().is_none());
        assert_eq!(
            propagator.notify_cost(IntDomainEvent::UpperBound),
            EnqueueDecision::Skip
        );

        propagator.on_solution();
        assert_eq!(
            propagator.notify_cost(IntDomainEvent::UpperBound),
            EnqueueDecision::Enqueue
        );
        propagator
            .propagate_from_scratch(&mut domains)
            .expect("no conflict");
        assert_eq!(domains.cost.lower_bound(), 5);
    }

    #[test]
    fn penalties_raise_the_bound_above_the_plain_one_tree() {
        // The cheap edges are 0-1, 0-2, 1-3 and 1-4. The cheapest one-tree uses all of them, but
        // a tour can use at most two of the three at node 1, so the optimum is 3 + 2 * 20.
        let costs = vec![
            vec![0, 1, 1, 20, 20],
            vec![1, 0, 20, 1, 1],
            vec![1, 20, 0, 20, 20],
            vec![20, 1, 20, 0, 20],
            vec![20, 1, 20, 20, 0],
        ];
        let mut domains = domains(5, 0, 43);
        let mut plain = KruskalOneTreeFilter::new(5);
        let float_costs = costs
            .iter()
            .map(|row| row.iter().map(|&cost| f64::from(cost)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        plain
            .compute(&float_costs, &domains.graph)
            .expect("graph is connected");
        let mut propagator = LagrangianOneTreeArgs {
            costs,
            options: LagrangianOptions::default(),
        }
        .create(&domains)
        .expect("valid arguments");

        propagator
            .propagate_from_scratch(&mut domains)
            .expect("no conflict");

        assert!(plain.bound() < 43.0);
        assert_eq!(domains.cost.lower_bound(), 43);
        assert!(propagator.penalties().iter().any(|&penalty| penalty != 0.0));
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        let directed = TourDomains {
            graph: GraphVariable::unconstrained(5, true),
            cost: IntegerDomain::new(0, 10).expect("non-empty domain"),
        };
        let mut ragged = cycle_costs();
        ragged[3].pop();

        let directed_error = LagrangianOneTreeArgs {
            costs: cycle_costs(),
            options: LagrangianOptions::default(),
        }
        .create(&directed)
        .unwrap_err();
        let too_few_error = LagrangianOneTreeArgs {
            costs: vec![vec![0; 2]; 2],
            options: LagrangianOptions::default(),
        }
        .create(&domains(2, 0, 10))
        .unwrap_err();
        let ragged_error = LagrangianOneTreeArgs {
            costs: ragged,
            options: LagrangianOptions::default(),
        }
        .create(&domains(5, 0, 10))
        .unwrap_err();

        assert_eq!(directed_error, ConstraintOperationError::DirectedTourGraph);
        assert_eq!(too_few_error, ConstraintOperationError::TooFewNodes(2));
        assert_eq!(
            ragged_error,
            ConstraintOperationError::NonSquareCostMatrix {
                row: 3,
                expected: 5,
                actual: 4
            }
        );
    }
}
