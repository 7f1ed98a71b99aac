//! Differentiation index specifications.
//!
//! An [`IndexSubset`] is a set of positions inside a signature of known size.
//! Positions always refer to the full signature, including parameters and
//! results that are not differentiable.

use smallvec::SmallVec;

/// A sorted set of positions below `capacity`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IndexSubset {
    capacity: usize,
    indices: SmallVec<[usize; 4]>,
}

impl IndexSubset {
    /// The empty subset of a signature with `capacity` positions
    pub fn empty(capacity: usize) -> Self {
        Self {
            capacity,
            indices: SmallVec::new(),
        }
    }

    /// Every position of a signature with `capacity` positions
    pub fn all(capacity: usize) -> Self {
        Self {
            capacity,
            indices: (0..capacity).collect(),
        }
    }

    /// Builds a subset from arbitrary positions; duplicates are merged.
    ///
    /// Panics if a position is not below `capacity`.
    pub fn from_indices(capacity: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut subset = Self::empty(capacity);
        for index in indices {
            subset.insert(index);
        }
        subset
    }

    /// Adds `index`, keeping the set sorted.
    ///
    /// Panics if `index` is not below the capacity.
    pub fn insert(&mut self, index: usize) {
        assert!(
            index < self.capacity,
            "index {index} out of range for a subset of capacity {}",
            self.capacity
        );
        if let Err(position) = self.indices.binary_search(&index) {
            self.indices.insert(position, index);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions in increasing order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

impl std::fmt::Display for IndexSubset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self
            .indices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{inner}}}/{}", self.capacity)
    }
}

/// Which parameters a derivative is taken with respect to, and which results
/// it is taken of
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AutoDiffIndices {
    pub parameters: IndexSubset,
    pub results: IndexSubset,
}

impl AutoDiffIndices {
    pub const fn new(parameters: IndexSubset, results: IndexSubset) -> Self {
        Self {
            parameters,
            results,
        }
    }
}

impl std::fmt::Display for AutoDiffIndices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(params: {}, results: {})", self.parameters, self.results)
    }
}
