use super::attach_designated_node;
use super::OneTree;
use super::OneTreeFinder;
use super::DESIGNATED_NODE;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusGraph;
use crate::containers::TiedMinimumHeap;
use crate::engine::GraphDomain;
use crate::pumpkin_assert_moderate;

/// Computes a minimum one-tree by growing the spanning tree from node 1, as in Prim's algorithm.
///
/// Mandatory edges are attached with the value `-inf`, which forces them into the tree as long as
/// they do not form a cycle; the bound is computed with their actual cost. No sensitivity analysis
/// is performed, which makes this finder suited for the many iterations of the sub-gradient
/// method.
#[derive(Clone, Debug)]
pub struct PrimOneTreeFinder {
    tree: OneTree,
    heap: TiedMinimumHeap,
    in_tree: Vec<bool>,
    /// `parent[node]` is the tree node through which `node` is attached when it is popped.
    parent: Vec<usize>,
}

impl PrimOneTreeFinder {
    pub fn new(num_nodes: usize) -> Self {
        PrimOneTreeFinder {
            tree: OneTree::new(num_nodes),
            heap: TiedMinimumHeap::new(num_nodes),
            in_tree: vec![false; num_nodes],
            parent: vec![0; num_nodes],
        }
    }

    fn add_to_tree<Graph: GraphDomain>(&mut self, node: usize, costs: &[Vec<f64>], graph: &Graph) {
        self.in_tree[node] = true;
        for neighbour in graph.potential_successors(node).iter() {
            if neighbour == DESIGNATED_NODE || self.in_tree[neighbour] {
                continue;
            }
            let value = if graph.is_mandatory_edge(node, neighbour) {
                f64::NEG_INFINITY
            } else {
                costs[node][neighbour]
            };
            if self.heap.insert_or_decrease(neighbour, value) {
                self.parent[neighbour] = node;
            }
        }
    }
}

impl OneTreeFinder for PrimOneTreeFinder {
    fn compute<Graph: GraphDomain>(
        &mut self,
        costs: &[Vec<f64>],
        graph: &Graph,
    ) -> PropagationStatusGraph {
        let num_nodes = self.tree.num_nodes();
        pumpkin_assert_moderate!(num_nodes >= 3 && costs.len() == num_nodes);

        self.tree.clear();
        self.heap.clear();
        self.in_tree.iter_mut().for_each(|in_tree| *in_tree = false);

        self.add_to_tree(1, costs, graph);
        let mut num_spanned = 1;
        while let Some(node) = self.heap.pop_min() {
            let parent = self.parent[node];
            self.tree.add_edge(parent, node, costs[parent][node]);
            num_spanned += 1;
            self.add_to_tree(node, costs, graph);
        }

        if num_spanned != num_nodes - 1 {
            return Err(Inconsistency::Conflict("OneTree"));
        }
        attach_designated_node(&mut self.tree, costs, graph)
    }

    fn tree(&self) -> &OneTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GraphVariable;

    fn symmetric(costs: &[&[i32]]) -> Vec<Vec<f64>> {
        costs
            .iter()
            .map(|row| row.iter().map(|&cost| cost as f64).collect())
            .collect()
    }

    #[test]
    fn minimum_one_tree_of_a_complete_graph() {
        let costs = symmetric(&[
            &[0, 1, 4, 4, 2],
            &[1, 0, 3, 5, 5],
            &[4, 3, 0, 1, 6],
            &[4, 5, 1, 0, 2],
            &[2, 5, 6, 2, 0],
        ]);
        let graph = GraphVariable::unconstrained(5, false);
        let mut finder = PrimOneTreeFinder::new(5);

        finder.compute(&costs, &graph).expect("graph is connected");

        // Tree over {1, 2, 3, 4}: 2-3 (1), 3-4 (2), 1-2 (3); designated edges 0-1 (1), 0-4 (2).
        assert_eq!(finder.bound(), 9.0);
        assert!(finder.tree().contains(1, 2));
        assert!(finder.tree().contains(0, 4));
        assert_eq!(finder.tree().edges().len(), 5);
    }

    #[test]
    fn mandatory_edges_are_part_of_the_tree() {
        let costs = symmetric(&[
            &[0, 1, 1, 1],
            &[1, 0, 1, 9],
            &[1, 1, 0, 1],
            &[1, 9, 1, 0],
        ]);
        let mut graph = GraphVariable::unconstrained(4, false);
        let _ = graph.enforce_edge(1, 3).expect("edge is potential");
        let mut finder = PrimOneTreeFinder::new(4);

        finder.compute(&costs, &graph).expect("graph is connected");

        assert!(finder.tree().contains(1, 3));
        assert_eq!(finder.bound(), 9.0 + 1.0 + 2.0);
    }

    #[test]
    fn disconnected_support_is_a_conflict() {
        let costs = symmetric(&[&[0, 1, 1, 1], &[1, 0, 1, 1], &[1, 1, 0, 1], &[1, 1, 1, 0]]);
        let mut graph = GraphVariable::unconstrained(4, false);
        let _ = graph.remove_edge(1, 3).expect("edge is not mandatory");
        let _ = graph.remove_edge(2, 3).expect("edge is not mandatory");
        let mut finder = PrimOneTreeFinder::new(4);

        let result = finder.compute(&costs, &graph);

        assert_eq!(result, Err(Inconsistency::Conflict("OneTree")));
    }
}
