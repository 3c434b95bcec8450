use itertools::Itertools;
use log::trace;

use super::attach_designated_node;
use super::OneTree;
use super::OneTreeFinder;
use super::DESIGNATED_NODE;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusGraph;
use crate::containers::DisjointSets;
use crate::engine::GraphDomain;
use crate::pumpkin_assert_eq_simple;
use crate::pumpkin_assert_extreme;

/// The changes made to the graph by [`KruskalOneTreeFilter::prune`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PruningOutcome {
    pub num_removed: usize,
    pub num_enforced: usize,
}

/// Computes a minimum one-tree with Kruskal's algorithm and performs sensitivity analysis on it.
///
/// After [`OneTreeFinder::compute`], [`KruskalOneTreeFilter::prune`] removes the edges whose
/// inclusion raises the bound above a budget and enforces the tree edges whose exclusion does.
#[derive(Clone, Debug)]
pub struct KruskalOneTreeFilter {
    tree: OneTree,
    sets: DisjointSets,
    /// The potential edges between nodes other than the designated node which are not part of
    /// the tree, sorted by increasing cost.
    non_tree_edges: Vec<(usize, usize)>,
    costs: Vec<Vec<f64>>,

    /// The tree over the nodes other than the designated node, rooted at node 1.
    tree_neighbours: Vec<Vec<usize>>,
    parent: Vec<usize>,
    depth: Vec<usize>,
    /// `path_maxima[i][j]` is the largest cost of a non-mandatory edge on the tree path between `i`
    /// and `j`, or `-inf` if every edge on the path is mandatory.
    path_maxima: Vec<Vec<f64>>,
    /// `replacements[node]` is the cost of the cheapest non-tree edge whose tree path contains the
    /// edge between `node` and its parent.
    replacements: Vec<f64>,
    jumps: Vec<usize>,
    stack: Vec<usize>,

    /// The increase of the bound caused by including an edge outside of the tree, or by excluding
    /// an edge of the tree.
    marginal_costs: Vec<Vec<f64>>,
    to_remove: Vec<(usize, usize)>,
    to_enforce: Vec<(usize, usize)>,
}

impl KruskalOneTreeFilter {
    pub fn new(num_nodes: usize) -> Self {
        KruskalOneTreeFilter {
            tree: OneTree::new(num_nodes),
            sets: DisjointSets::new(num_nodes),
            non_tree_edges: Vec::new(),
            costs: vec![vec![0.0; num_nodes]; num_nodes],
            tree_neighbours: vec![Vec::new(); num_nodes],
            parent: vec![0; num_nodes],
            depth: vec![0; num_nodes],
            path_maxima: vec![vec![f64::NEG_INFINITY; num_nodes]; num_nodes],
            replacements: vec![f64::INFINITY; num_nodes],
            jumps: vec![0; num_nodes],
            stack: Vec::with_capacity(num_nodes),
            marginal_costs: vec![vec![f64::INFINITY; num_nodes]; num_nodes],
            to_remove: Vec::new(),
            to_enforce: Vec::new(),
        }
    }

    /// The marginal cost of the edge computed by the last call to
    /// [`KruskalOneTreeFilter::prune`]: for an edge outside of the one-tree, the increase of the
    /// bound when it is included; for an edge of the one-tree, the increase when it is excluded.
    /// Edges which cannot be included or excluded have an infinite marginal cost.
    pub fn marginal_cost(&self, from: usize, to: usize) -> f64 {
        self.marginal_costs[from][to]
    }

    /// Removes every potential edge whose inclusion raises the bound above `budget`, and enforces
    /// every edge of the one-tree whose exclusion raises the bound above `budget`.
    ///
    /// Requires the one-tree to be computed on the current domain of `graph`.
    pub fn prune<Graph: GraphDomain>(
        &mut self,
        budget: f64,
        graph: &mut Graph,
    ) -> Result<PruningOutcome, Inconsistency> {
        let num_nodes = self.tree.num_nodes();
        self.root_tree();
        self.compute_path_maxima(&*graph);
        self.compute_replacements();
        self.marginal_costs
            .iter_mut()
            .for_each(|row| row.fill(f64::INFINITY));
        self.to_remove.clear();
        self.to_enforce.clear();

        let bound = self.tree.cost();

        for &(from, to) in &self.non_tree_edges {
            let path_maximum = self.path_maxima[from][to];
            let marginal_cost = if path_maximum == f64::NEG_INFINITY {
                f64::INFINITY
            } else {
                self.costs[from][to] - path_maximum
            };
            self.marginal_costs[from][to] = marginal_cost;
            self.marginal_costs[to][from] = marginal_cost;
            if exceeds(bound, marginal_cost, budget) {
                self.to_remove.push((from, to));
            }
        }

        for node in 0..num_nodes {
            if node == DESIGNATED_NODE || node == 1 {
                continue;
            }
            let parent = self.parent[node];
            if graph.is_mandatory_edge(node, parent) {
                continue;
            }
            let marginal_cost = self.replacements[node] - self.costs[node][parent];
            self.marginal_costs[node][parent] = marginal_cost;
            self.marginal_costs[parent][node] = marginal_cost;
            if exceeds(bound, marginal_cost, budget) {
                self.to_enforce.push((node, parent));
            }
        }

        self.analyse_designated_node(&*graph, bound, budget);

        let mut outcome = PruningOutcome::default();
        for &(from, to) in &self.to_remove {
            if graph.remove_edge(from, to)? {
                outcome.num_removed += 1;
            }
        }
        for &(from, to) in &self.to_enforce {
            if graph.enforce_edge(from, to)? {
                outcome.num_enforced += 1;
            }
        }
        trace!(
            "one-tree pruning against {budget}: {} removed, {} enforced",
            outcome.num_removed,
            outcome.num_enforced
        );
        Ok(outcome)
    }

    /// An edge of the designated node outside of the one-tree replaces the most expensive chosen
    /// edge which is not mandatory; a chosen edge is replaced by the cheapest edge which is not
    /// chosen.
    fn analyse_designated_node<Graph: GraphDomain>(
        &mut self,
        graph: &Graph,
        bound: f64,
        budget: f64,
    ) {
        let costs = &self.costs[DESIGNATED_NODE];

        let mut most_expensive_chosen = f64::NEG_INFINITY;
        let mut cheapest_unchosen = f64::INFINITY;
        for node in graph.potential_successors(DESIGNATED_NODE).iter() {
            if self.tree.contains(DESIGNATED_NODE, node) {
                if !graph.is_mandatory_edge(DESIGNATED_NODE, node) {
                    most_expensive_chosen = most_expensive_chosen.max(costs[node]);
                }
            } else {
                cheapest_unchosen = cheapest_unchosen.min(costs[node]);
            }
        }

        for node in graph.potential_successors(DESIGNATED_NODE).iter() {
            if graph.is_mandatory_edge(DESIGNATED_NODE, node) {
                continue;
            }
            let marginal_cost = if self.tree.contains(DESIGNATED_NODE, node) {
                cheapest_unchosen - costs[node]
            } else if most_expensive_chosen == f64::NEG_INFINITY {
                f64::INFINITY
            } else {
                costs[node] - most_expensive_chosen
            };

            self.marginal_costs[DESIGNATED_NODE][node] = marginal_cost;
            self.marginal_costs[node][DESIGNATED_NODE] = marginal_cost;
            if exceeds(bound, marginal_cost, budget) {
                if self.tree.contains(DESIGNATED_NODE, node) {
                    self.to_enforce.push((DESIGNATED_NODE, node));
                } else {
                    self.to_remove.push((DESIGNATED_NODE, node));
                }
            }
        }
    }

    /// Computes the parent and depth of every node in the tree over the nodes other than the
    /// designated node, rooted at node 1.
    fn root_tree(&mut self) {
        self.tree_neighbours.iter_mut().for_each(Vec::clear);
        for &(from, to) in self.tree.edges() {
            if from != DESIGNATED_NODE && to != DESIGNATED_NODE {
                self.tree_neighbours[from].push(to);
                self.tree_neighbours[to].push(from);
            }
        }

        self.parent[1] = 1;
        self.depth[1] = 0;
        self.stack.clear();
        self.stack.push(1);
        while let Some(node) = self.stack.pop() {
            for index in 0..self.tree_neighbours[node].len() {
                let child = self.tree_neighbours[node][index];
                if child != self.parent[node] {
                    self.parent[child] = node;
                    self.depth[child] = self.depth[node] + 1;
                    self.stack.push(child);
                }
            }
        }
    }

    fn compute_path_maxima<Graph: GraphDomain>(&mut self, graph: &Graph) {
        let num_nodes = self.tree.num_nodes();
        for source in 1..num_nodes {
            self.path_maxima[source][source] = f64::NEG_INFINITY;
            self.stack.clear();
            self.stack.push(source);
            // Nodes are visited once; `jumps` holds the node from which each was reached.
            self.jumps[source] = source;
            while let Some(node) = self.stack.pop() {
                for index in 0..self.tree_neighbours[node].len() {
                    let next = self.tree_neighbours[node][index];
                    if next == self.jumps[node] {
                        continue;
                    }
                    let edge_value = if graph.is_mandatory_edge(node, next) {
                        f64::NEG_INFINITY
                    } else {
                        self.costs[node][next]
                    };
                    self.path_maxima[source][next] =
                        self.path_maxima[source][node].max(edge_value);
                    self.jumps[next] = node;
                    self.stack.push(next);
                }
            }
        }
    }

    /// Assigns to every tree edge the cheapest non-tree edge covering it. The non-tree edges are
    /// processed by increasing cost, and tree edges which received a replacement are contracted
    /// into their parent, so that every tree edge is visited once.
    fn compute_replacements(&mut self) {
        let num_nodes = self.tree.num_nodes();
        self.replacements.fill(f64::INFINITY);
        for node in 0..num_nodes {
            self.jumps[node] = node;
        }

        for index in 0..self.non_tree_edges.len() {
            let (from, to) = self.non_tree_edges[index];
            let cost = self.costs[from][to];
            let mut first = self.climb(from);
            let mut second = self.climb(to);
            while first != second {
                if self.depth[first] < self.depth[second] {
                    std::mem::swap(&mut first, &mut second);
                }
                self.replacements[first] = cost;
                self.jumps[first] = self.parent[first];
                first = self.climb(first);
            }
        }
    }

    /// The topmost ancestor of `node` reachable through contracted tree edges.
    fn climb(&mut self, mut node: usize) -> usize {
        while self.jumps[node] != node {
            let next = self.jumps[self.jumps[node]];
            self.jumps[node] = next;
            node = next;
        }
        node
    }
}

/// Whether changing the one-tree by an edge with `marginal_cost` leads to a bound above `budget`.
/// An infinite marginal cost means that no such one-tree exists.
fn exceeds(bound: f64, marginal_cost: f64, budget: f64) -> bool {
    marginal_cost == f64::INFINITY || bound + marginal_cost > budget
}

impl OneTreeFinder for KruskalOneTreeFilter {
    fn compute<Graph: GraphDomain>(
        &mut self,
        costs: &[Vec<f64>],
        graph: &Graph,
    ) -> PropagationStatusGraph {
        let num_nodes = self.tree.num_nodes();
        self.tree.clear();
        self.sets.reset();
        self.non_tree_edges.clear();
        for (row, source) in self.costs.iter_mut().zip(costs) {
            row.copy_from_slice(source);
        }

        // Mandatory edges first; a cycle of mandatory edges admits no tour.
        let mut candidates = Vec::new();
        for (from, to) in (1..num_nodes).tuple_combinations() {
            if !graph.is_potential_edge(from, to) {
                continue;
            }
            if graph.is_mandatory_edge(from, to) {
                if !self.sets.union(from, to) {
                    return Err(Inconsistency::Conflict("OneTree"));
                }
                self.tree.add_edge(from, to, costs[from][to]);
            } else {
                candidates.push((from, to));
            }
        }

        candidates.sort_by(|&(a, b), &(c, d)| costs[a][b].total_cmp(&costs[c][d]));
        for (from, to) in candidates {
            if self.sets.union(from, to) {
                self.tree.add_edge(from, to, costs[from][to]);
            } else {
                self.non_tree_edges.push((from, to));
            }
        }

        if self.tree.edges().len() != num_nodes - 2 {
            return Err(Inconsistency::Conflict("OneTree"));
        }
        attach_designated_node(&mut self.tree, costs, graph)?;

        pumpkin_assert_eq_simple!(self.tree.edges().len(), num_nodes);
        pumpkin_assert_extreme!(
            (0..num_nodes)
                .map(|node| self.tree.degree(node))
                .sum::<usize>()
                == 2 * num_nodes
        );
        Ok(())
    }

    fn tree(&self) -> &OneTree {
        &self.tree
    }
}
