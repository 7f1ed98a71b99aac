//! # Instruction Builder
//!
//! A fluent API for appending typed instructions to a function. The builder
//! allocates every destination, records its type and marks it defined, so the
//! functions it produces satisfy the SSA invariants `MirFunction::validate`
//! checks.

use crate::{
    BasicBlockId, BinaryOp, Callee, FunctionSignature, InstrLocation, Instruction, Literal,
    MirFunction, MirType, Terminator, Value, ValueId,
};

/// Appends instructions to the current block of a function
pub struct FunctionBuilder<'f> {
    function: &'f mut MirFunction,
    current_block: BasicBlockId,
    last_location: Option<InstrLocation>,
}

impl<'f> FunctionBuilder<'f> {
    /// Creates a builder positioned at the function's entry block
    pub fn new(function: &'f mut MirFunction) -> Self {
        let current_block = function.entry_block;
        Self {
            function,
            current_block,
            last_location: None,
        }
    }

    /// Location of the most recently appended instruction
    pub const fn last_location(&self) -> Option<InstrLocation> {
        self.last_location
    }

    /// Appends an instruction to the current block, marking its destinations
    /// as defined
    pub fn push(&mut self, instruction: Instruction) -> InstrLocation {
        for dest in instruction.destinations() {
            self.function.defined_values.insert(dest);
        }
        let index = self.function.basic_blocks[self.current_block].push_instruction(instruction);
        let location = InstrLocation::new(self.current_block, index);
        self.last_location = Some(location);
        location
    }

    fn fresh(&mut self, ty: MirType) -> ValueId {
        self.function.new_typed_value_id(ty)
    }

    /// The static type of an operand
    pub fn type_of(&self, value: Value) -> MirType {
        match value {
            Value::Operand(id) => self
                .function
                .get_value_type(id)
                .cloned()
                .unwrap_or(MirType::Unknown),
            Value::Literal(Literal::Integer(_)) => MirType::Int,
            Value::Literal(Literal::Unit) => MirType::unit(),
        }
    }

    pub fn assign(&mut self, source: Value, ty: MirType) -> ValueId {
        let dest = self.fresh(ty.clone());
        self.push(Instruction::assign(dest, source, ty));
        dest
    }

    pub fn binary_op(&mut self, op: BinaryOp, left: Value, right: Value) -> ValueId {
        let ty = self.type_of(left);
        let dest = self.fresh(ty);
        self.push(Instruction::binary_op(op, dest, left, right));
        dest
    }

    /// Appends a call; `args` must already end with the indirect-result
    /// addresses. Returns the direct result value.
    pub fn call(
        &mut self,
        callee: Callee,
        args: Vec<Value>,
        signature: FunctionSignature,
    ) -> ValueId {
        let dest = self.fresh(signature.direct_result_type());
        self.push(Instruction::call(dest, callee, args, signature));
        dest
    }

    pub fn store(&mut self, address: Value, value: Value) -> InstrLocation {
        self.push(Instruction::store(address, value))
    }

    /// Allocates a local of type `ty`, returning its address
    pub fn stack_alloc(&mut self, ty: MirType) -> ValueId {
        let dest = self.fresh(MirType::address(ty.clone()));
        self.push(Instruction::stack_alloc(dest, ty));
        dest
    }

    pub fn make_tuple(&mut self, elements: Vec<Value>) -> ValueId {
        let ty = MirType::tuple(elements.iter().map(|e| self.type_of(*e)).collect());
        let dest = self.fresh(ty);
        self.push(Instruction::make_tuple(dest, elements));
        dest
    }

    /// Splits `tuple` into one fresh value per element
    pub fn destructure_tuple(&mut self, tuple: ValueId) -> Vec<ValueId> {
        let elements = self
            .type_of(Value::operand(tuple))
            .tuple_elements()
            .map(<[MirType]>::to_vec)
            .unwrap_or_default();
        let dests = elements
            .into_iter()
            .map(|ty| self.fresh(ty))
            .collect::<Vec<_>>();
        self.push(Instruction::destructure_tuple(
            dests.clone(),
            Value::operand(tuple),
        ));
        dests
    }

    /// Converts a raw pointer into an address of `element`
    pub fn pointer_to_address(&mut self, pointer: Value, element: MirType) -> ValueId {
        let ty = MirType::address(element);
        let dest = self.fresh(ty.clone());
        self.push(Instruction::pointer_to_address(dest, pointer, ty));
        dest
    }

    pub fn index_addr(&mut self, base: Value, index: Value) -> ValueId {
        let ty = self.type_of(base);
        let dest = self.fresh(ty);
        self.push(Instruction::index_addr(dest, base, index));
        dest
    }

    pub fn terminate(&mut self, terminator: Terminator) {
        self.function.basic_blocks[self.current_block].set_terminator(terminator);
    }

    pub fn ret(&mut self, value: Value) {
        self.terminate(Terminator::return_value(value));
    }
}
