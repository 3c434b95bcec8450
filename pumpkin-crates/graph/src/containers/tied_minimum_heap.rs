//! A min-heap over the keys `0..n` with floating point values, which supports decrease-key and
//! remembers the group of keys which are tied for the minimum value.
//!
//! When growing a one-tree, many nodes are often attached through edges of the same extreme value
//! (e.g. mandatory edges, which are given the value `-inf`). Such keys are handed out from the tied
//! group in O(1); their entries in the underlying binary heap are discarded lazily when they reach
//! the root.

use crate::pumpkin_assert_moderate;

const ABSENT: usize = usize::MAX;

#[derive(Clone, Debug)]
pub(crate) struct TiedMinimumHeap {
    /// `values[key]` is the last value assigned to `key`.
    values: Vec<f64>,
    /// The binary heap of keys ordered by [`TiedMinimumHeap::values`]; may contain keys which
    /// have already been popped through the tied group.
    heap: Vec<usize>,
    /// `positions[key]` is the index of `key` in [`TiedMinimumHeap::heap`], or [`ABSENT`].
    positions: Vec<usize>,
    /// Whether the key is currently in the heap, independently of lazily deleted entries.
    present: Vec<bool>,
    /// The number of keys for which `present` holds.
    len: usize,
    /// Keys whose value equals [`TiedMinimumHeap::tied_value`]; every present key has a value of
    /// at least [`TiedMinimumHeap::tied_value`].
    tied: Vec<usize>,
    tied_value: f64,
}

impl TiedMinimumHeap {
    pub(crate) fn new(num_keys: usize) -> Self {
        TiedMinimumHeap {
            values: vec![f64::INFINITY; num_keys],
            heap: Vec::with_capacity(num_keys),
            positions: vec![ABSENT; num_keys],
            present: vec![false; num_keys],
            len: 0,
            tied: Vec::with_capacity(num_keys),
            tied_value: f64::INFINITY,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `key` with `value`, or lowers its value if it is already present with a larger
    /// value. Returns whether the heap changed.
    pub(crate) fn insert_or_decrease(&mut self, key: usize, value: f64) -> bool {
        if self.present[key] && value >= self.values[key] {
            return false;
        }

        if self.is_empty() || value < self.tied_value {
            self.tied_value = value;
            self.tied.clear();
            self.tied.push(key);
        } else if value == self.tied_value {
            self.tied.push(key);
        }

        if !self.present[key] {
            self.present[key] = true;
            self.len += 1;
        }
        let previous = self.values[key];
        self.values[key] = value;

        if self.positions[key] == ABSENT {
            self.positions[key] = self.heap.len();
            self.heap.push(key);
            self.sift_up(self.heap.len() - 1);
        } else if value < previous {
            self.sift_up(self.positions[key]);
        } else {
            // A lazily deleted entry is being reused with a larger value.
            self.sift_down(self.positions[key]);
        }
        true
    }

    /// Removes and returns a key with the minimum value.
    pub(crate) fn pop_min(&mut self) -> Option<usize> {
        if let Some(key) = self.tied.pop() {
            pumpkin_assert_moderate!(self.present[key] && self.values[key] == self.tied_value);
            self.present[key] = false;
            self.len -= 1;
            return Some(key);
        }

        while !self.heap.is_empty() {
            let key = self.remove_root();
            if self.present[key] {
                self.present[key] = false;
                self.len -= 1;
                return Some(key);
            }
        }
        None
    }

    pub(crate) fn clear(&mut self) {
        for key in self.heap.drain(..) {
            self.positions[key] = ABSENT;
            self.present[key] = false;
        }
        self.tied.clear();
        self.tied_value = f64::INFINITY;
        self.len = 0;
    }

    fn remove_root(&mut self) -> usize {
        let root = self.heap[0];
        let last = self.heap.len() - 1;
        self.swap_positions(0, last);
        let _ = self.heap.pop();
        self.positions[root] = ABSENT;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        root
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a]] = a;
        self.positions[self.heap[b]] = b;
    }

    fn value_at(&self, position: usize) -> f64 {
        self.values[self.heap[position]]
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if self.value_at(parent) <= self.value_at(position) {
                break;
            }
            self.swap_positions(parent, position);
            position = parent;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut smallest = position;
            if left < self.heap.len() && self.value_at(left) < self.value_at(smallest) {
                smallest = left;
            }
            if right < self.heap.len() && self.value_at(right) < self.value_at(smallest) {
                smallest = right;
            }
            if smallest == position {
                break;
            }
            self.swap_positions(smallest, position);
            position = smallest;
        }
    }
}
