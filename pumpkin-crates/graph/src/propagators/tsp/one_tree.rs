use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusGraph;
use crate::engine::GraphDomain;

/// The node which is attached to the spanning tree through two edges.
pub const DESIGNATED_NODE: usize = 0;

/// A one-tree: a spanning tree over the nodes other than [`DESIGNATED_NODE`], together with two
/// edges incident to [`DESIGNATED_NODE`].
///
/// The cost of a minimum one-tree is a lower bound on the cost of every Hamiltonian cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct OneTree {
    num_nodes: usize,
    adjacency: Vec<bool>,
    degrees: Vec<usize>,
    edges: Vec<(usize, usize)>,
    cost: f64,
}

impl OneTree {
    pub fn new(num_nodes: usize) -> Self {
        OneTree {
            num_nodes,
            adjacency: vec![false; num_nodes * num_nodes],
            degrees: vec![0; num_nodes],
            edges: Vec::with_capacity(num_nodes),
            cost: 0.0,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.adjacency[from * self.num_nodes + to]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.degrees[node]
    }

    /// The edges in the order in which they were added.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// The sum of the costs of the edges, as given when they were added.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub(crate) fn add_edge(&mut self, from: usize, to: usize, cost: f64) {
        self.adjacency[from * self.num_nodes + to] = true;
        self.adjacency[to * self.num_nodes + from] = true;
        self.degrees[from] += 1;
        self.degrees[to] += 1;
        self.edges.push((from, to));
        self.cost += cost;
    }

    pub(crate) fn clear(&mut self) {
        for &(from, to) in &self.edges {
            self.adjacency[from * self.num_nodes + to] = false;
            self.adjacency[to * self.num_nodes + from] = false;
        }
        self.degrees.iter_mut().for_each(|degree| *degree = 0);
        self.edges.clear();
        self.cost = 0.0;
    }
}

/// Computes a minimum one-tree of the upper bound of an undirected graph which contains the
/// mandatory edges of the graph.
pub trait OneTreeFinder {
    /// Computes the one-tree under the (penalised) edge `costs`; fails if the upper bound admits
    /// no one-tree containing the mandatory edges.
    fn compute<Graph: GraphDomain>(
        &mut self,
        costs: &[Vec<f64>],
        graph: &Graph,
    ) -> PropagationStatusGraph;

    /// The cost of the last computed one-tree.
    fn bound(&self) -> f64 {
        self.tree().cost()
    }

    fn tree(&self) -> &OneTree;
}

/// Adds the two edges of [`DESIGNATED_NODE`] to `tree`: its mandatory edges, completed with its
/// cheapest potential edges.
pub(crate) fn attach_designated_node<Graph: GraphDomain>(
    tree: &mut OneTree,
    costs: &[Vec<f64>],
    graph: &Graph,
) -> PropagationStatusGraph {
    let mandatory = graph.mandatory_successors(DESIGNATED_NODE);
    if mandatory.len() > 2 {
        return Err(Inconsistency::Conflict("OneTree"));
    }
    for node in mandatory.iter() {
        tree.add_edge(DESIGNATED_NODE, node, costs[DESIGNATED_NODE][node]);
    }

    let mut cheapest: [Option<usize>; 2] = [None, None];
    for node in graph.potential_successors(DESIGNATED_NODE).iter() {
        if mandatory.contains(node) {
            continue;
        }
        let cost = costs[DESIGNATED_NODE][node];
        match cheapest {
            [Some(first), _] if cost < costs[DESIGNATED_NODE][first] => {
                cheapest = [Some(node), Some(first)];
            }
            [None, _] => cheapest[0] = Some(node),
            [_, Some(second)] if cost >= costs[DESIGNATED_NODE][second] => {}
            [_, _] => cheapest[1] = Some(node),
        }
    }

    for node in cheapest.into_iter().flatten() {
        if tree.degree(DESIGNATED_NODE) == 2 {
            break;
        }
        tree.add_edge(DESIGNATED_NODE, node, costs[DESIGNATED_NODE][node]);
    }

    if tree.degree(DESIGNATED_NODE) < 2 {
        return Err(Inconsistency::Conflict("OneTree"));
    }
    Ok(())
}
