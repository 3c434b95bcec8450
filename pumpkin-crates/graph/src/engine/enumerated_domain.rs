use crate::basic_types::EmptyDomain;
use crate::basic_types::Trail;
use crate::containers::SparseSet;

/// An integer variable over the values `0..capacity` whose domain may contain holes, e.g. the
/// successor of a node.
pub trait EnumeratedInteger {
    fn contains(&self, value: usize) -> bool;

    /// The number of values in the domain.
    fn size(&self) -> usize;

    /// The values in the domain, in no particular order.
    fn values(&self) -> impl Iterator<Item = usize> + '_;

    /// Removes `value`; returns whether it was in the domain, or an [`EmptyDomain`] if it was the
    /// last value.
    fn remove(&mut self, value: usize) -> Result<bool, EmptyDomain>;

    /// Removes every value other than `value`; returns whether the domain changed, or an
    /// [`EmptyDomain`] if `value` is not in the domain.
    fn assign(&mut self, value: usize) -> Result<bool, EmptyDomain>;

    fn is_fixed(&self) -> bool {
        self.size() == 1
    }

    /// The value of the variable if it is fixed.
    fn value(&self) -> Option<usize> {
        if self.is_fixed() {
            self.values().next()
        } else {
            None
        }
    }
}

/// A checkpointed [`EnumeratedInteger`] backed by a [`SparseSet`].
#[derive(Clone, Debug)]
pub struct EnumeratedDomain {
    values: SparseSet,
    /// The removed values.
    trail: Trail<usize>,
}

impl EnumeratedDomain {
    /// The domain holding `values`, each of which has to lie in `0..capacity`.
    pub fn new(
        capacity: usize,
        values: impl IntoIterator<Item = usize>,
    ) -> Result<EnumeratedDomain, EmptyDomain> {
        let mut set = SparseSet::empty(capacity);
        for value in values {
            let _ = set.insert(value);
        }
        if set.is_empty() {
            return Err(EmptyDomain);
        }
        Ok(EnumeratedDomain {
            values: set,
            trail: Trail::default(),
        })
    }

    pub fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
    }

    pub fn synchronise(&mut self, checkpoint: usize) {
        for value in self.trail.synchronise(checkpoint) {
            let _ = self.values.insert(value);
        }
    }
}

impl EnumeratedInteger for EnumeratedDomain {
    fn contains(&self, value: usize) -> bool {
        self.values.contains(value)
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn values(&self) -> impl Iterator<Item = usize> + '_ {
        self.values.iter()
    }

    fn remove(&mut self, value: usize) -> Result<bool, EmptyDomain> {
        if !self.values.contains(value) {
            return Ok(false);
        }
        if self.values.len() == 1 {
            return Err(EmptyDomain);
        }
        let _ = self.values.remove(value);
        self.trail.push(value);
        Ok(true)
    }

    fn assign(&mut self, value: usize) -> Result<bool, EmptyDomain> {
        if !self.values.contains(value) {
            return Err(EmptyDomain);
        }
        if self.values.len() == 1 {
            return Ok(false);
        }
        let others = self
            .values
            .iter()
            .filter(|&other| other != value)
            .collect::<Vec<_>>();
        for other in others {
            let _ = self.values.remove(other);
            self.trail.push(other);
        }
        Ok(true)
    }
}
