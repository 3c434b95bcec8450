/// Whether a constraint is satisfied by every completion of the current domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entailment {
    /// Every instantiation of the current domains satisfies the constraint.
    Satisfied,
    /// No instantiation of the current domains satisfies the constraint.
    Violated,
    /// Neither of the above can be established yet.
    Undetermined,
}

impl Entailment {
    pub fn is_violated(self) -> bool {
        matches!(self, Entailment::Violated)
    }
}
