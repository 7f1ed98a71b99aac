//! # Diffsil Intermediate Representation (MIR)
//!
//! This crate defines the SSA graph consumed by the automatic-differentiation
//! utilities. Functions are control flow graphs of basic blocks, every value is
//! defined exactly once, and calls carry the calling convention of their callee
//! so that direct and indirect results can be told apart.
//!
//! ## Architecture
//!
//! ```text
//! MirModule
//! functions: IndexVec<FunctionId, MirFunction>
//!
//! MirFunction
//! signature: FunctionSignature
//! parameters / indirect_results: Vec<ValueId>
//! basic_blocks: IndexVec<BasicBlockId, BasicBlock>
//!
//! BasicBlock
//! instructions: Vec<Instruction>
//! terminator: Terminator
//! ```
//!
//! The graph is read-only for analyses. Consumers of a value are found through
//! [`analysis::DefUseIndex`], which is built once per function and never owns
//! anything it points at.

#![allow(clippy::option_if_let_else)]

pub use analysis::{DefUseIndex, FunctionGraph, UseSite, ValueDef};
pub use basic_block::BasicBlock;
pub use builder::FunctionBuilder;
pub use function::MirFunction;
pub use instruction::{
    BinaryOp, CallSite, Callee, FunctionSignature, InstrLocation, Instruction, InstructionKind,
    ResultConvention, ResultInfo,
};
pub use mir_types::MirType;
pub use module::MirModule;
pub use terminator::Terminator;
pub use value::{Literal, Value};

pub mod analysis;
pub mod basic_block;
pub mod builder;
pub mod function;
pub mod instruction;
pub mod mir_types;
pub mod module;
pub mod terminator;
pub mod value;


// --- Core Identifiers ---

index_vec::define_index_type! {
    /// Unique identifier for a function within a MIR module
    pub struct FunctionId = usize;
}

index_vec::define_index_type! {
    /// Unique identifier for a basic block within a function
    pub struct BasicBlockId = usize;
}

index_vec::define_index_type! {
    /// Unique identifier for a value (virtual register) within a function
    pub struct ValueId = usize;
}

// --- Pretty Printing Support ---

/// Trait for pretty-printing MIR constructs
pub trait PrettyPrint {
    fn pretty_print(&self, indent: usize) -> String;
}

/// Helper function to create indentation
pub(crate) fn indent_str(level: usize) -> String {
    "  ".repeat(level)
}
