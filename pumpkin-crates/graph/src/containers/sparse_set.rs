//! A set over the universe `0..n` which supports O(1) insertion, removal and membership queries,
//! and O(|S|) iteration over its members.
//!
//! # Theoretical
//! The universe is kept in a single array; the first [`SparseSet::len`] entries of that array are
//! the members of the set, the remaining entries are the non-members. A second array maps every
//! element to its position in the first one. Inserting or removing an element swaps it with the
//! element at the boundary and moves the boundary by one.
//!
//! # Bibliography
//! \[1\] V. le C. de Saint-Marcq, P. Schaus, C. Solnon, and C. Lecoutre, ‘Sparse-sets for domain
//! implementation’, in CP workshop on Techniques foR Implementing Constraint programming Systems
//! (TRICS), 2013, pp. 1–10.

use crate::pumpkin_assert_moderate;
use crate::pumpkin_assert_simple;

/// A set of nodes drawn from a fixed universe `0..capacity`, see the module level documentation.
#[derive(Clone, Debug)]
pub struct SparseSet {
    /// The number of members; the members are `elements[..size]`.
    size: usize,
    /// A permutation of the universe.
    elements: Vec<usize>,
    /// `positions[e]` is the index of `e` in [`SparseSet::elements`].
    positions: Vec<usize>,
}

impl SparseSet {
    /// Creates an empty set over the universe `0..capacity`.
    pub fn empty(capacity: usize) -> Self {
        SparseSet {
            size: 0,
            elements: (0..capacity).collect(),
            positions: (0..capacity).collect(),
        }
    }

    /// Creates the set containing the whole universe `0..capacity`.
    pub fn full(capacity: usize) -> Self {
        SparseSet {
            size: capacity,
            ..SparseSet::empty(capacity)
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The size of the universe.
    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    pub fn contains(&self, element: usize) -> bool {
        element < self.positions.len() && self.positions[element] < self.size
    }

    /// Adds `element` to the set; returns whether it was absent before.
    pub fn insert(&mut self, element: usize) -> bool {
        pumpkin_assert_simple!(
            element < self.capacity(),
            "element {element} is outside of the universe of size {}",
            self.capacity()
        );
        if self.contains(element) {
            return false;
        }
        self.swap(self.positions[element], self.size);
        self.size += 1;
        true
    }

    /// Removes `element` from the set; returns whether it was present before.
    pub fn remove(&mut self, element: usize) -> bool {
        if !self.contains(element) {
            return false;
        }
        self.size -= 1;
        self.swap(self.positions[element], self.size);
        true
    }

    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Iterates over the members. The order is unspecified and changes after mutation.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements[..self.size].iter().copied()
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.elements.swap(i, j);
        self.positions[self.elements[i]] = i;
        self.positions[self.elements[j]] = j;
        pumpkin_assert_moderate!(
            self.elements[self.positions[self.elements[i]]] == self.elements[i]
                && self.elements[self.positions[self.elements[j]]] == self.elements[j]
        );
    }
}

/// Two sets are equal if they have the same universe and the same members, regardless of the
/// internal order of the elements.
impl PartialEq for SparseSet {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity()
            && self.len() == other.len()
            && self.iter().all(|element| other.contains(element))
    }
}

impl Eq for SparseSet {}

impl<'a> IntoIterator for &'a SparseSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements[..self.size].iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::SparseSet;

    #[test]
    fn empty_set_contains_nothing() {
        let set = SparseSet::empty(4);
        assert!(set.is_empty());
        assert!((0..4).all(|element| !set.contains(element)));
        assert!(!set.contains(7));
    }

    #[test]
    fn insert_reports_whether_element_was_new() {
        let mut set = SparseSet::empty(4);
        assert!(set.insert(2));
        assert!(!set.insert(2));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn removal_keeps_other_members() {
        let mut set = SparseSet::full(5);
        assert!(set.remove(1));
        assert!(set.remove(4));
        assert!(!set.remove(4));

        let mut members = set.iter().collect::<Vec<_>>();
        members.sort();
        assert_eq!(members, vec![0, 2, 3]);
    }

    #[test]
    fn equality_ignores_internal_order() {
        let mut first = SparseSet::empty(4);
        let _ = first.insert(3);
        let _ = first.insert(1);
        let mut second = SparseSet::full(4);
        let _ = second.remove(0);
        let _ = second.remove(2);

        assert_eq!(first, second);
    }

    #[test]
    fn removed_elements_can_be_reinserted() {
        let mut set = SparseSet::full(3);
        let _ = set.remove(0);
        let _ = set.remove(2);
        let _ = set.insert(0);

        assert!(set.contains(0));
        assert!(set.contains(1));
        assert!(!set.contains(2));
    }
}
