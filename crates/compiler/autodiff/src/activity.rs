//! The activity oracle.
//!
//! Deciding whether a value is varied and useful is the job of the activity
//! analysis run by the host. The utilities here only ask it questions through
//! [`ActivityOracle`].

use diffsil_compiler_mir::{Value, ValueId};
use rustc_hash::FxHashSet;

use crate::AutoDiffIndices;

/// Answers whether a value is active for a differentiation request.
///
/// Queries must be pure. Implementations may be expensive, callers ask at most
/// once per value they need.
pub trait ActivityOracle {
    fn is_active(&self, value: Value, indices: &AutoDiffIndices) -> bool;
}

impl<F> ActivityOracle for F
where
    F: Fn(Value, &AutoDiffIndices) -> bool,
{
    fn is_active(&self, value: Value, indices: &AutoDiffIndices) -> bool {
        self(value, indices)
    }
}

/// A precomputed activity result for one differentiation request: the set of
/// active SSA values. Literals are never active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveValues {
    active: FxHashSet<ValueId>,
}

impl ActiveValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: ValueId) -> bool {
        self.active.insert(value)
    }

    pub fn contains(&self, value: ValueId) -> bool {
        self.active.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl FromIterator<ValueId> for ActiveValues {
    fn from_iter<I: IntoIterator<Item = ValueId>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().collect(),
        }
    }
}

impl ActivityOracle for ActiveValues {
    fn is_active(&self, value: Value, _indices: &AutoDiffIndices) -> bool {
        value.as_operand().is_some_and(|id| self.contains(id))
    }
}
