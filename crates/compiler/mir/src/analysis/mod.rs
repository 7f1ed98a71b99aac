//! # Analysis Module
//!
//! Read-only views over a function that analyses share. The def-use index is
//! the back-reference structure: it records, for every SSA value, where it is
//! defined and which instructions consume it.

pub mod def_use;

#[cfg(test)]
mod tests;

pub use def_use::{DefUseIndex, FunctionGraph, UseSite, ValueDef};
