//! # Def-Use Index
//!
//! Instructions reference their operands by `ValueId`, so finding the
//! consumers of a value means scanning the function. [`DefUseIndex`] does that
//! scan once and keeps, per value, its definition site and its use sites in
//! program order. It stores locations only and never owns the instructions it
//! points at.
//!
//! [`FunctionGraph`] pairs a function with its index and is the handle the
//! differentiation utilities take.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    BasicBlockId, CallSite, InstrLocation, Instruction, MirFunction, MirType, Value, ValueId,
};

/// Where an SSA value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueDef {
    /// The `n`-th formal parameter
    Parameter(usize),
    /// The `n`-th indirect-result address of the function
    IndirectResult(usize),
    /// The `result`-th destination of the instruction at `location`
    Instruction {
        location: InstrLocation,
        result: usize,
    },
}

/// One consumer edge of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseSite {
    /// Operand `operand` of the instruction at `location`
    Instruction {
        location: InstrLocation,
        operand: usize,
    },
    /// The terminator of `block`
    Terminator { block: BasicBlockId },
}

type UseList = SmallVec<[UseSite; 2]>;

/// Definition and use sites of every value of one function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefUseIndex {
    defs: FxHashMap<ValueId, ValueDef>,
    uses: FxHashMap<ValueId, UseList>,
}

impl DefUseIndex {
    /// Scans `function` once, in block then instruction order
    pub fn build(function: &MirFunction) -> Self {
        let mut index = Self::default();

        for (i, &param) in function.parameters.iter().enumerate() {
            index.defs.insert(param, ValueDef::Parameter(i));
        }
        for (i, &out) in function.indirect_results.iter().enumerate() {
            index.defs.insert(out, ValueDef::IndirectResult(i));
        }

        for (block_id, block) in function.basic_blocks() {
            for (i, instruction) in block.instructions.iter().enumerate() {
                let location = InstrLocation::new(block_id, i);
                for (result, dest) in instruction.destinations().into_iter().enumerate() {
                    index
                        .defs
                        .insert(dest, ValueDef::Instruction { location, result });
                }
                for (operand, value) in instruction.operands().into_iter().enumerate() {
                    if let Value::Operand(id) = value {
                        index
                            .uses
                            .entry(id)
                            .or_default()
                            .push(UseSite::Instruction { location, operand });
                    }
                }
            }
            for used in block.terminator.used_values() {
                index
                    .uses
                    .entry(used)
                    .or_default()
                    .push(UseSite::Terminator { block: block_id });
            }
        }

        index
    }

    pub fn def(&self, value: ValueId) -> Option<ValueDef> {
        self.defs.get(&value).copied()
    }

    /// Use sites of `value`, in program order
    pub fn uses(&self, value: ValueId) -> &[UseSite] {
        match self.uses.get(&value) {
            Some(uses) => uses.as_slice(),
            None => &[],
        }
    }

    pub fn has_uses(&self, value: ValueId) -> bool {
        !self.uses(value).is_empty()
    }
}

/// A function together with its def-use index
#[derive(Debug, Clone)]
pub struct FunctionGraph<'f> {
    function: &'f MirFunction,
    index: DefUseIndex,
}

impl<'f> FunctionGraph<'f> {
    pub fn new(function: &'f MirFunction) -> Self {
        Self {
            function,
            index: DefUseIndex::build(function),
        }
    }

    pub const fn function(&self) -> &'f MirFunction {
        self.function
    }

    pub const fn def_use(&self) -> &DefUseIndex {
        &self.index
    }

    pub fn value_type(&self, value: ValueId) -> Option<&'f MirType> {
        self.function.get_value_type(value)
    }

    pub fn instruction(&self, location: InstrLocation) -> Option<&'f Instruction> {
        self.function.instruction(location)
    }

    pub fn uses(&self, value: ValueId) -> &[UseSite] {
        self.index.uses(value)
    }

    /// The instruction defining `value`, with its location and the index of
    /// `value` among its destinations. `None` for parameters and values the
    /// function does not define.
    pub fn defining_instruction(
        &self,
        value: ValueId,
    ) -> Option<(InstrLocation, usize, &'f Instruction)> {
        match self.index.def(value)? {
            ValueDef::Instruction { location, result } => self
                .instruction(location)
                .map(|instruction| (location, result, instruction)),
            ValueDef::Parameter(_) | ValueDef::IndirectResult(_) => None,
        }
    }

    /// A call view of the instruction at `location`
    pub fn call_site(&self, location: InstrLocation) -> Option<CallSite<'f>> {
        self.instruction(location)
            .and_then(|instruction| CallSite::from_instruction(location, instruction))
    }

    /// The call whose direct result is `value`
    pub fn defining_call(&self, value: ValueId) -> Option<CallSite<'f>> {
        let (location, _, instruction) = self.defining_instruction(value)?;
        CallSite::from_instruction(location, instruction)
    }
}
