//! # MIR Builder Components
//!
//! Builders used by hosts and tests to assemble well-formed SSA functions.

mod instr_builder;

pub use instr_builder::FunctionBuilder;
