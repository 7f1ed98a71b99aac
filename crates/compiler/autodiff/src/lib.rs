//! # Differentiation Utilities
//!
//! Analyses used by the automatic differentiation transform of the MIR. Given
//! a call inside a function being differentiated, they work out which of the
//! call's parameters and results are active, so that the callee's derivative
//! is requested only where it is needed.
//!
//! The pieces, leaves first:
//!
//! - [`enumerate_results`] lists a call's results in the callee's declared
//!   order, merging direct and indirect results.
//! - [`find_tuple_decomposition`] finds the one `destructure_tuple` of a tuple.
//! - [`find_array_allocation`] traces an array element address back to the
//!   allocating call.
//! - [`collect_minimal_indices`] computes the active parameter and result sets.
//!
//! Activity itself is decided elsewhere and consulted through
//! [`ActivityOracle`]. Broken invariants in the IR are reported as
//! [`ContractViolation`] and must abort the transform.

pub mod activity;
pub mod array;
pub mod collector;
pub mod config;
pub mod errors;
pub mod indices;
pub mod results;
pub mod tuple;

pub use activity::{ActiveValues, ActivityOracle};
pub use array::{
    find_array_allocation, find_array_allocation_with, get_allocate_uninitialized_array_intrinsic,
    is_array_literal_intrinsic,
};
pub use collector::{collect_minimal_indices, collect_minimal_indices_at, MinimalIndices};
pub use config::{AutoDiffConfig, ARRAY_UNINITIALIZED_INTRINSIC};
pub use errors::{AdResult, ContractViolation};
pub use indices::{AutoDiffIndices, IndexSubset};
pub use results::{
    collect_all_formal_results_in_type_order, collect_results, enumerate_results,
    for_each_direct_result, FormalResults,
};
pub use tuple::{find_tuple_decomposition, TupleDecomposition};

/// Log target of every message emitted by this crate
pub const AD_LOG_TARGET: &str = "autodiff";
