/// Union-find over the elements `0..n` with union by rank and path halving.
#[derive(Clone, Debug)]
pub(crate) struct DisjointSets {
    parents: Vec<usize>,
    ranks: Vec<u8>,
}

impl DisjointSets {
    pub(crate) fn new(num_elements: usize) -> Self {
        DisjointSets {
            parents: (0..num_elements).collect(),
            ranks: vec![0; num_elements],
        }
    }

    /// Puts every element back into its own singleton set.
    pub(crate) fn reset(&mut self) {
        self.parents
            .iter_mut()
            .enumerate()
            .for_each(|(element, parent)| *parent = element);
        self.ranks.fill(0);
    }

    pub(crate) fn find(&mut self, mut element: usize) -> usize {
        while self.parents[element] != element {
            let grandparent = self.parents[self.parents[element]];
            self.parents[element] = grandparent;
            element = grandparent;
        }
        element
    }

    /// Merges the sets of `a` and `b`; returns false if they were already in the same set.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        match self.ranks[root_a].cmp(&self.ranks[root_b]) {
            std::cmp::Ordering::Less => self.parents[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parents[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parents[root_b] = root_a;
                self.ranks[root_a] += 1;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::DisjointSets;

    #[test]
    fn union_merges_sets() {
        let mut sets = DisjointSets::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(sets.union(1, 4));

        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(2));
    }

    #[test]
    fn union_within_a_set_is_rejected() {
        let mut sets = DisjointSets::new(3);
        let _ = sets.union(0, 1);
        let _ = sets.union(1, 2);

        assert!(!sets.union(0, 2));
    }

    #[test]
    fn reset_separates_all_elements() {
        let mut sets = DisjointSets::new(3);
        let _ = sets.union(0, 1);
        sets.reset();

        assert!(sets.union(0, 1));
    }
}
