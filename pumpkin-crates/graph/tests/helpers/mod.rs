//! Shared fixtures for the integration tests of the graph propagators.
#![allow(
    dead_code,
    reason = "each test file uses a different part of the helpers"
)]

use itertools::Itertools;
use pumpkin_graph::basic_types::Inconsistency;
use pumpkin_graph::engine::DeltaSource;
use pumpkin_graph::engine::GraphDomain;
use pumpkin_graph::engine::GraphVariable;
use pumpkin_graph::propagation::GraphPropagator;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An undirected graph which contains at least one Hamiltonian cycle, with symmetric edge costs and
/// the cost of its cheapest tour.
#[derive(Debug)]
pub(crate) struct Instance {
    pub(crate) graph: GraphVariable,
    pub(crate) costs: Vec<Vec<i32>>,
    pub(crate) optimum: i32,
    /// A tour of cost `optimum`, starting at node 0.
    pub(crate) optimal_tour: Vec<usize>,
}

impl Instance {
    pub(crate) fn num_nodes(&self) -> usize {
        self.costs.len()
    }

    /// The edges `(i, j)` with `i < j` of the optimal tour.
    pub(crate) fn optimal_tour_edges(&self) -> Vec<(usize, usize)> {
        tour_edges(&self.optimal_tour)
    }
}

fn tour_edges(tour: &[usize]) -> Vec<(usize, usize)> {
    tour.iter()
        .circular_tuple_windows()
        .map(|(&from, &to)| (from.min(to), from.max(to)))
        .collect()
}

/// Generates an instance over 4 to 8 nodes. A hidden tour keeps the graph Hamiltonian, every other
/// edge is removed with probability 0.3, and up to two edges of an optimal tour are enforced.
pub(crate) fn random_instance(rng: &mut SmallRng) -> Instance {
    let num_nodes = rng.gen_range(4..=8);

    let mut costs = vec![vec![0; num_nodes]; num_nodes];
    for (from, to) in (0..num_nodes).tuple_combinations() {
        let cost = rng.gen_range(1..=100);
        costs[from][to] = cost;
        costs[to][from] = cost;
    }

    let mut hidden_tour = (0..num_nodes).collect::<Vec<_>>();
    hidden_tour.shuffle(rng);
    let hidden_edges = tour_edges(&hidden_tour);

    let mut graph = GraphVariable::unconstrained(num_nodes, false);
    for (from, to) in (0..num_nodes).tuple_combinations() {
        if !hidden_edges.contains(&(from, to)) && rng.gen_bool(0.3) {
            let _ = graph.remove_edge(from, to).expect("no edge is mandatory yet");
        }
    }

    let (optimum, optimal_tour) =
        cheapest_tour(&costs, &graph).expect("the hidden tour is in the graph");
    for (from, to) in tour_edges(&optimal_tour).into_iter().take(rng.gen_range(0..=2)) {
        let _ = graph.enforce_edge(from, to).expect("edge is potential");
    }

    Instance {
        graph,
        costs,
        optimum,
        optimal_tour,
    }
}

/// Enumerates the tours of `graph` which use all of its mandatory edges, and returns the cost of
/// the cheapest one together with the tour.
pub(crate) fn cheapest_tour(
    costs: &[Vec<i32>],
    graph: &impl GraphDomain,
) -> Option<(i32, Vec<usize>)> {
    let num_nodes = graph.num_nodes();
    let mandatory_edges = (0..num_nodes)
        .tuple_combinations()
        .filter(|&(from, to)| graph.is_mandatory_edge(from, to))
        .collect::<Vec<(usize, usize)>>();

    (1..num_nodes)
        .permutations(num_nodes - 1)
        .map(|rest| std::iter::once(0).chain(rest).collect::<Vec<_>>())
        .filter(|tour| {
            let edges = tour_edges(tour);
            edges
                .iter()
                .all(|&(from, to)| graph.is_potential_edge(from, to))
                && mandatory_edges.iter().all(|edge| edges.contains(edge))
        })
        .map(|tour| {
            let cost = tour_edges(&tour)
                .iter()
                .map(|&(from, to)| costs[from][to])
                .sum::<i32>();
            (cost, tour)
        })
        .min_by_key(|(cost, _)| *cost)
}

/// Calls every propagator from scratch until none of them changes the graph anymore.
pub(crate) fn propagate_to_fixed_point(
    graph: &mut GraphVariable,
    propagators: &mut [&mut dyn GraphPropagator<GraphVariable>],
) -> Result<(), Inconsistency> {
    loop {
        let num_events = graph.events().len();
        for propagator in propagators.iter_mut() {
            propagator.propagate_from_scratch(graph)?;
        }
        if graph.events().len() == num_events {
            return Ok(());
        }
    }
}
