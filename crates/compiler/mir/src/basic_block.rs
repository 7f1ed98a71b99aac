//! # MIR Basic Block

use crate::{indent_str, Instruction, PrettyPrint, Terminator};

/// Straight-line instructions closed by one terminator
///
/// Instruction indices are stable once pushed: an [`crate::InstrLocation`]
/// keeps pointing at the same instruction for the lifetime of the block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicBlock {
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

impl BasicBlock {
    /// An empty block, terminated by the `unreachable` placeholder
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `instruction`, returning its index in the block
    pub fn push_instruction(&mut self, instruction: Instruction) -> usize {
        let index = self.instructions.len();
        self.instructions.push(instruction);
        index
    }

    pub fn set_terminator(&mut self, terminator: Terminator) {
        self.terminator = terminator;
    }
}

impl PrettyPrint for BasicBlock {
    fn pretty_print(&self, indent: usize) -> String {
        let prefix = indent_str(indent);
        self.instructions
            .iter()
            .map(|instruction| instruction.pretty_print(0))
            .chain(std::iter::once(self.terminator.pretty_print(0)))
            .map(|line| format!("{prefix}{line}\n"))
            .collect()
    }
}
