//! # MIR Function
//!
//! A function is its lowered signature, the SSA values defined on entry and a
//! graph of basic blocks.

use index_vec::IndexVec;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    indent_str, BasicBlock, BasicBlockId, FunctionSignature, InstrLocation, Instruction,
    InstructionKind, MirType, PrettyPrint, Value, ValueId,
};

/// Formal parameters and indirect-result addresses are SSA values defined on
/// entry, in signature order. Every other value is defined by exactly one
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirFunction {
    pub name: String,

    /// The lowered signature, including result conventions
    pub signature: FunctionSignature,

    pub basic_blocks: IndexVec<BasicBlockId, BasicBlock>,

    pub entry_block: BasicBlockId,

    /// Formal parameters, in signature order
    pub parameters: Vec<ValueId>,

    /// Addresses the caller provides for the indirect results, in declared order
    pub indirect_results: Vec<ValueId>,

    /// Semantics tags attached to this function (e.g. intrinsic markers)
    pub semantics: Vec<String>,

    pub value_types: FxHashMap<ValueId, MirType>,

    pub(crate) next_value_id: u32,

    /// Values already given a definition, parameters included
    pub(crate) defined_values: FxHashSet<ValueId>,
}

impl MirFunction {
    /// Creates a new empty function with the given name and no signature
    pub fn new(name: String) -> Self {
        Self::with_signature(name, FunctionSignature::default())
    }

    /// Creates a new function whose parameters and indirect-result addresses
    /// are allocated from `signature`
    pub fn with_signature(name: String, signature: FunctionSignature) -> Self {
        let mut basic_blocks = IndexVec::new();
        let entry_block = basic_blocks.push(BasicBlock::new());

        let mut function = Self {
            name,
            signature: FunctionSignature::default(),
            basic_blocks,
            entry_block,
            parameters: Vec::new(),
            indirect_results: Vec::new(),
            semantics: Vec::new(),
            value_types: FxHashMap::default(),
            next_value_id: 0,
            defined_values: FxHashSet::default(),
        };

        for ty in &signature.params {
            let param = function.new_typed_value_id(ty.clone());
            function.defined_values.insert(param);
            function.parameters.push(param);
        }
        for ty in signature.indirect_result_types() {
            let out = function.new_typed_value_id(ty);
            function.defined_values.insert(out);
            function.indirect_results.push(out);
        }
        function.signature = signature;
        function
    }

    pub fn add_basic_block(&mut self) -> BasicBlockId {
        self.basic_blocks.push(BasicBlock::new())
    }

    pub fn get_basic_block_mut(&mut self, id: BasicBlockId) -> Option<&mut BasicBlock> {
        self.basic_blocks.get_mut(id)
    }

    /// Returns the instruction at `location`, if any
    pub fn instruction(&self, location: InstrLocation) -> Option<&Instruction> {
        self.basic_blocks
            .get(location.block)
            .and_then(|block| block.instructions.get(location.index))
    }

    /// A fresh value id, not yet typed or defined
    pub fn new_value_id(&mut self) -> ValueId {
        let id = ValueId::new(self.next_value_id as usize);
        self.next_value_id += 1;
        id
    }

    pub fn new_typed_value_id(&mut self, mir_type: MirType) -> ValueId {
        let id = self.new_value_id();
        self.value_types.insert(id, mir_type);
        id
    }

    pub fn get_value_type(&self, value_id: ValueId) -> Option<&MirType> {
        self.value_types.get(&value_id)
    }

    /// Returns an iterator over all basic blocks
    pub fn basic_blocks(&self) -> impl Iterator<Item = (BasicBlockId, &BasicBlock)> {
        self.basic_blocks.iter_enumerated()
    }

    /// Returns an iterator over every instruction with its location
    pub fn instructions(&self) -> impl Iterator<Item = (InstrLocation, &Instruction)> {
        self.basic_blocks().flat_map(|(block_id, block)| {
            block
                .instructions
                .iter()
                .enumerate()
                .map(move |(index, instr)| (InstrLocation::new(block_id, index), instr))
        })
    }

    /// Returns every block ending in a return
    pub fn return_blocks(&self) -> Vec<BasicBlockId> {
        self.basic_blocks()
            .filter(|(_, block)| block.terminator.is_return())
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the return block if the function has exactly one
    pub fn find_return_block(&self) -> Option<BasicBlockId> {
        match self.return_blocks().as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Checks SSA form, call arities against their signatures and that every
    /// tuple decomposition has one destination per element.
    pub fn validate(&self) -> Result<(), String> {
        if self.basic_blocks.get(self.entry_block).is_none() {
            return Err(format!("Entry block {:?} does not exist", self.entry_block));
        }

        let mut defined: FxHashSet<ValueId> = FxHashSet::default();
        for &value in self.parameters.iter().chain(&self.indirect_results) {
            if !defined.insert(value) {
                return Err(format!("Entry value {value:?} is defined twice"));
            }
        }
        for (location, instruction) in self.instructions() {
            for dest in instruction.destinations() {
                if !defined.insert(dest) {
                    return Err(format!(
                        "{location}: SSA violation, {dest:?} is defined more than once"
                    ));
                }
            }
        }

        for (block_id, block) in self.basic_blocks() {
            for used in block.terminator.used_values() {
                if !defined.contains(&used) {
                    return Err(format!(
                        "Block {block_id:?}: terminator uses undefined value {used:?}"
                    ));
                }
            }
        }

        for (location, instruction) in self.instructions() {
            for used in instruction.used_values() {
                if !defined.contains(&used) {
                    return Err(format!("{location}: use of undefined value {used:?}"));
                }
            }
            self.validate_instruction(location, instruction)?;
        }

        Ok(())
    }

    fn validate_instruction(
        &self,
        location: InstrLocation,
        instruction: &Instruction,
    ) -> Result<(), String> {
        match &instruction.kind {
            InstructionKind::Call {
                callee,
                args,
                signature,
                ..
            } => {
                let expected = signature.num_params() + signature.num_indirect_results();
                if args.len() != expected {
                    return Err(format!(
                        "{location}: call to '{}' has {} arguments, signature expects {}",
                        callee.name,
                        args.len(),
                        expected
                    ));
                }
            }
            InstructionKind::DestructureTuple {
                dests,
                tuple: Value::Operand(tuple),
            } => {
                if let Some(elements) = self.get_value_type(*tuple).and_then(MirType::tuple_elements)
                {
                    if elements.len() != dests.len() {
                        return Err(format!(
                            "{location}: destructure of a {}-tuple has {} destinations",
                            elements.len(),
                            dests.len()
                        ));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl PrettyPrint for MirFunction {
    fn pretty_print(&self, indent: usize) -> String {
        let mut result = String::new();
        let base_indent = indent_str(indent);

        result.push_str(&format!("{}fn {} {{\n", base_indent, self.name));

        if !self.parameters.is_empty() {
            let params = self
                .parameters
                .iter()
                .map(|p| p.pretty_print(0))
                .collect::<Vec<_>>()
                .join(", ");
            result.push_str(&format!("{base_indent}  parameters: {params}\n"));
        }

        if !self.indirect_results.is_empty() {
            let outs = self
                .indirect_results
                .iter()
                .map(|p| p.pretty_print(0))
                .collect::<Vec<_>>()
                .join(", ");
            result.push_str(&format!("{base_indent}  indirect results: {outs}\n"));
        }

        for (block_id, block) in self.basic_blocks() {
            result.push_str(&format!("{base_indent}  bb{}:\n", block_id.index()));
            result.push_str(&block.pretty_print(indent + 2));
        }

        result.push_str(&format!("{base_indent}}}\n"));
        result
    }
}

impl std::fmt::Display for MirFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_print(0))
    }
}

#[cfg(test)]
#[path = "function_tests.rs"]
mod tests;
