use enumset::EnumSetType;

use crate::basic_types::EmptyDomain;
use crate::basic_types::Trail;

/// A change to the domain of an integer variable, as reported by the host to the propagators which
/// depend on the variable.
#[derive(Debug, EnumSetType, Hash)]
pub enum IntDomainEvent {
    /// The variable became fixed.
    Assign,
    LowerBound,
    UpperBound,
    /// A value strictly between the bounds was removed.
    Removal,
}

/// A bounded integer variable, e.g. the cost of a tour.
pub trait BoundedInteger {
    fn lower_bound(&self) -> i32;

    fn upper_bound(&self) -> i32;

    /// Raises the lower bound to `bound`; returns whether the bound changed, or an
    /// [`EmptyDomain`] if `bound` exceeds the upper bound.
    fn raise_lower_bound(&mut self, bound: i32) -> Result<bool, EmptyDomain>;

    fn is_fixed(&self) -> bool {
        self.lower_bound() == self.upper_bound()
    }

    /// The value of the variable if it is fixed.
    fn value(&self) -> Option<i32> {
        self.is_fixed().then_some(self.lower_bound())
    }
}

/// A checkpointed interval domain `[lower_bound, upper_bound]`.
#[derive(Clone, Debug)]
pub struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
    /// The bounds before each change.
    trail: Trail<(i32, i32)>,
}

impl IntegerDomain {
    pub fn new(lower_bound: i32, upper_bound: i32) -> Result<IntegerDomain, EmptyDomain> {
        if lower_bound > upper_bound {
            return Err(EmptyDomain);
        }
        Ok(IntegerDomain {
            lower_bound,
            upper_bound,
            trail: Trail::default(),
        })
    }

    /// Lowers the upper bound to `bound`, as a host does when a new incumbent solution is found.
    pub fn lower_upper_bound(&mut self, bound: i32) -> Result<bool, EmptyDomain> {
        if bound < self.lower_bound {
            return Err(EmptyDomain);
        }
        if bound >= self.upper_bound {
            return Ok(false);
        }
        self.trail.push((self.lower_bound, self.upper_bound));
        self.upper_bound = bound;
        Ok(true)
    }

    pub fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
    }

    pub fn synchronise(&mut self, checkpoint: usize) {
        if let Some((lower_bound, upper_bound)) = self.trail.synchronise(checkpoint).last() {
            self.lower_bound = lower_bound;
            self.upper_bound = upper_bound;
        }
    }
}

impl BoundedInteger for IntegerDomain {
    fn lower_bound(&self) -> i32 {
        self.lower_bound
    }

    fn upper_bound(&self) -> i32 {
        self.upper_bound
    }

    fn raise_lower_bound(&mut self, bound: i32) -> Result<bool, EmptyDomain> {
        if bound > self.upper_bound {
            return Err(EmptyDomain);
        }
        if bound <= self.lower_bound {
            return Ok(false);
        }
        self.trail.push((self.lower_bound, self.upper_bound));
        self.lower_bound = bound;
        Ok(true)
    }
}
