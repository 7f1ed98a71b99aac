//! # MIR Instructions
//!
//! Straight-line instructions, the signatures calls are typed with, and a
//! borrowed [`CallSite`] view over call instructions.

use crate::{BasicBlockId, FunctionId, MirType, PrettyPrint, Value, ValueId};

/// Position of an instruction inside a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrLocation {
    pub block: BasicBlockId,
    pub index: usize,
}

impl InstrLocation {
    pub const fn new(block: BasicBlockId, index: usize) -> Self {
        Self { block, index }
    }
}

impl std::fmt::Display for InstrLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bb{}:{}", self.block.index(), self.index)
    }
}

/// Binary operators on scalars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// How a callee hands one of its results back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultConvention {
    /// Returned in a virtual register, as part of the call's own result
    Direct,
    /// Written through an address the caller appends to the arguments
    Indirect,
}

/// One declared result of a function signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultInfo {
    pub ty: MirType,
    pub convention: ResultConvention,
}

impl ResultInfo {
    pub const fn direct(ty: MirType) -> Self {
        Self {
            ty,
            convention: ResultConvention::Direct,
        }
    }

    pub const fn indirect(ty: MirType) -> Self {
        Self {
            ty,
            convention: ResultConvention::Indirect,
        }
    }

    pub const fn is_formal_direct(&self) -> bool {
        matches!(self.convention, ResultConvention::Direct)
    }

    pub const fn is_formal_indirect(&self) -> bool {
        matches!(self.convention, ResultConvention::Indirect)
    }
}

/// The lowered type of a function: ordered parameters and ordered results,
/// each result tagged with its convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FunctionSignature {
    pub params: Vec<MirType>,
    pub results: Vec<ResultInfo>,
}

impl FunctionSignature {
    pub const fn new(params: Vec<MirType>, results: Vec<ResultInfo>) -> Self {
        Self { params, results }
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn num_results(&self) -> usize {
        self.results.len()
    }

    pub fn num_direct_results(&self) -> usize {
        self.results.iter().filter(|r| r.is_formal_direct()).count()
    }

    pub fn num_indirect_results(&self) -> usize {
        self.results.iter().filter(|r| r.is_formal_indirect()).count()
    }

    /// The type of the single SSA value a call of this signature produces.
    ///
    /// Exactly one direct result is returned bare; any other count is packed
    /// into a tuple, so no direct results gives unit.
    pub fn direct_result_type(&self) -> MirType {
        let mut direct = self
            .results
            .iter()
            .filter(|r| r.is_formal_direct())
            .map(|r| r.ty.clone())
            .collect::<Vec<_>>();
        if direct.len() == 1 {
            direct.remove(0)
        } else {
            MirType::tuple(direct)
        }
    }

    /// Types of the addresses a caller must append for indirect results
    pub fn indirect_result_types(&self) -> impl Iterator<Item = MirType> + '_ {
        self.results
            .iter()
            .filter(|r| r.is_formal_indirect())
            .map(|r| MirType::address(r.ty.clone()))
    }
}

/// The function a call targets, with the semantics tags attached to it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Callee {
    pub function: FunctionId,
    pub name: String,
    pub semantics: Vec<String>,
}

impl Callee {
    pub fn new(function: FunctionId, name: impl Into<String>) -> Self {
        Self {
            function,
            name: name.into(),
            semantics: Vec::new(),
        }
    }

    /// Attaches a semantics tag, returning the updated callee
    pub fn with_semantics(mut self, tag: impl Into<String>) -> Self {
        self.semantics.push(tag.into());
        self
    }

    pub fn has_semantics(&self, tag: &str) -> bool {
        self.semantics.iter().any(|s| s == tag)
    }
}

/// An instruction performs an operation but does NOT transfer control
///
/// Unlike terminators, instructions always fall through to the next
/// instruction in the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The kind of instruction and its operands
    pub kind: InstructionKind,
}

/// The different kinds of instructions available in MIR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    /// Simple assignment: `dest = source`
    Assign {
        dest: ValueId,
        source: Value,
        ty: MirType,
    },

    /// Binary operation: `dest = left op right`
    BinaryOp {
        op: BinaryOp,
        dest: ValueId,
        left: Value,
        right: Value,
    },

    /// Function call: `dest = call callee(args)`
    ///
    /// `dest` is the single direct result; its type is the signature's
    /// direct result type (a tuple when there is not exactly one). The
    /// addresses receiving indirect results follow the formal arguments at
    /// the end of `args`.
    Call {
        dest: ValueId,
        callee: Callee,
        args: Vec<Value>,
        signature: FunctionSignature,
    },

    /// Store to memory: `store address, value`
    Store { address: Value, value: Value },

    /// Allocate a local variable: `dest = stackalloc ty`
    /// `dest` has type `Address(ty)`
    StackAlloc { dest: ValueId, ty: MirType },

    /// Build a tuple: `dest = make_tuple (elements...)`
    MakeTuple { dest: ValueId, elements: Vec<Value> },

    /// Split a tuple into its elements: `dests... = destructure_tuple tuple`
    /// One destination per tuple element, in element order
    DestructureTuple { dests: Vec<ValueId>, tuple: Value },

    /// Reinterpret a raw pointer as a typed address:
    /// `dest = pointer_to_address pointer to ty`
    PointerToAddress {
        dest: ValueId,
        pointer: Value,
        ty: MirType,
    },

    /// Offset an address by a number of elements: `dest = index_addr base, index`
    IndexAddr {
        dest: ValueId,
        base: Value,
        index: Value,
    },
}

impl Instruction {
    const fn from_kind(kind: InstructionKind) -> Self {
        Self { kind }
    }

    /// Creates a new assignment instruction
    pub const fn assign(dest: ValueId, source: Value, ty: MirType) -> Self {
        Self::from_kind(InstructionKind::Assign { dest, source, ty })
    }

    /// Creates a new binary operation instruction
    pub const fn binary_op(op: BinaryOp, dest: ValueId, left: Value, right: Value) -> Self {
        Self::from_kind(InstructionKind::BinaryOp {
            op,
            dest,
            left,
            right,
        })
    }

    /// Creates a new call instruction
    pub const fn call(
        dest: ValueId,
        callee: Callee,
        args: Vec<Value>,
        signature: FunctionSignature,
    ) -> Self {
        Self::from_kind(InstructionKind::Call {
            dest,
            callee,
            args,
            signature,
        })
    }

    /// Creates a new store instruction
    pub const fn store(address: Value, value: Value) -> Self {
        Self::from_kind(InstructionKind::Store { address, value })
    }

    /// Creates a new stack allocation instruction
    pub const fn stack_alloc(dest: ValueId, ty: MirType) -> Self {
        Self::from_kind(InstructionKind::StackAlloc { dest, ty })
    }

    /// Creates a new tuple construction instruction
    pub const fn make_tuple(dest: ValueId, elements: Vec<Value>) -> Self {
        Self::from_kind(InstructionKind::MakeTuple { dest, elements })
    }

    /// Creates a new tuple decomposition instruction
    pub const fn destructure_tuple(dests: Vec<ValueId>, tuple: Value) -> Self {
        Self::from_kind(InstructionKind::DestructureTuple { dests, tuple })
    }

    /// Creates a new pointer-to-address conversion
    pub const fn pointer_to_address(dest: ValueId, pointer: Value, ty: MirType) -> Self {
        Self::from_kind(InstructionKind::PointerToAddress { dest, pointer, ty })
    }

    /// Creates a new element offset computation
    pub const fn index_addr(dest: ValueId, base: Value, index: Value) -> Self {
        Self::from_kind(InstructionKind::IndexAddr { dest, base, index })
    }

    /// Returns the destination values if this instruction defines any
    pub fn destinations(&self) -> Vec<ValueId> {
        match &self.kind {
            InstructionKind::Assign { dest, .. }
            | InstructionKind::BinaryOp { dest, .. }
            | InstructionKind::Call { dest, .. }
            | InstructionKind::StackAlloc { dest, .. }
            | InstructionKind::MakeTuple { dest, .. }
            | InstructionKind::PointerToAddress { dest, .. }
            | InstructionKind::IndexAddr { dest, .. } => vec![*dest],

            InstructionKind::DestructureTuple { dests, .. } => dests.clone(),

            InstructionKind::Store { .. } => vec![],
        }
    }

    /// Returns the destination value if this instruction defines exactly one
    pub fn destination(&self) -> Option<ValueId> {
        let dests = self.destinations();
        if dests.len() == 1 {
            Some(dests[0])
        } else {
            None
        }
    }

    /// Returns the operands of this instruction in operand order
    pub fn operands(&self) -> Vec<Value> {
        match &self.kind {
            InstructionKind::Assign { source, .. } => vec![*source],
            InstructionKind::BinaryOp { left, right, .. } => vec![*left, *right],
            InstructionKind::Call { args, .. } => args.clone(),
            InstructionKind::Store { address, value } => vec![*address, *value],
            InstructionKind::StackAlloc { .. } => vec![],
            InstructionKind::MakeTuple { elements, .. } => elements.clone(),
            InstructionKind::DestructureTuple { tuple, .. } => vec![*tuple],
            InstructionKind::PointerToAddress { pointer, .. } => vec![*pointer],
            InstructionKind::IndexAddr { base, index, .. } => vec![*base, *index],
        }
    }

    /// Returns the SSA values used by this instruction, in operand order
    ///
    /// A value used twice appears twice.
    pub fn used_values(&self) -> Vec<ValueId> {
        self.operands()
            .iter()
            .filter_map(Value::as_operand)
            .collect()
    }
}

/// A borrowed view of a call instruction
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    pub location: InstrLocation,
    pub dest: ValueId,
    pub callee: &'a Callee,
    pub args: &'a [Value],
    pub signature: &'a FunctionSignature,
}

impl<'a> CallSite<'a> {
    /// Returns a view of `instruction` if it is a call
    pub fn from_instruction(location: InstrLocation, instruction: &'a Instruction) -> Option<Self> {
        match &instruction.kind {
            InstructionKind::Call {
                dest,
                callee,
                args,
                signature,
            } => Some(Self {
                location,
                dest: *dest,
                callee,
                args,
                signature,
            }),
            _ => None,
        }
    }

    /// All arguments, indirect-result addresses included
    pub const fn arguments(&self) -> &'a [Value] {
        self.args
    }

    fn first_indirect_result_index(&self) -> usize {
        self.args
            .len()
            .saturating_sub(self.signature.num_indirect_results())
    }

    /// The formal arguments, in callee parameter order
    pub fn arguments_without_indirect_results(&self) -> &'a [Value] {
        &self.args[..self.first_indirect_result_index()]
    }

    /// The addresses receiving the indirect results, in declared order
    pub fn indirect_result_arguments(&self) -> &'a [Value] {
        &self.args[self.first_indirect_result_index()..]
    }

    pub fn has_semantics(&self, tag: &str) -> bool {
        self.callee.has_semantics(tag)
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.pretty_print(0))
        .collect::<Vec<_>>()
        .join(", ")
}

impl PrettyPrint for Instruction {
    fn pretty_print(&self, _indent: usize) -> String {
        let mut result = String::new();

        match &self.kind {
            InstructionKind::Assign { dest, source, .. } => {
                result.push_str(&format!(
                    "{} = {}",
                    dest.pretty_print(0),
                    source.pretty_print(0)
                ));
            }

            InstructionKind::BinaryOp {
                op,
                dest,
                left,
                right,
            } => {
                result.push_str(&format!(
                    "{} = {} {:?} {}",
                    dest.pretty_print(0),
                    left.pretty_print(0),
                    op,
                    right.pretty_print(0)
                ));
            }

            InstructionKind::Call {
                dest, callee, args, ..
            } => {
                result.push_str(&format!(
                    "{} = call @{}({})",
                    dest.pretty_print(0),
                    callee.name,
                    join_values(args)
                ));
            }

            InstructionKind::Store { address, value } => {
                result.push_str(&format!(
                    "store {}, {}",
                    address.pretty_print(0),
                    value.pretty_print(0)
                ));
            }

            InstructionKind::StackAlloc { dest, ty } => {
                result.push_str(&format!(
                    "{} = stackalloc {}",
                    dest.pretty_print(0),
                    ty.pretty_print(0)
                ));
            }

            InstructionKind::MakeTuple { dest, elements } => {
                result.push_str(&format!(
                    "{} = make_tuple ({})",
                    dest.pretty_print(0),
                    join_values(elements)
                ));
            }

            InstructionKind::DestructureTuple { dests, tuple } => {
                if dests.is_empty() {
                    result.push_str(&format!("destructure_tuple {}", tuple.pretty_print(0)));
                } else {
                    let dests_str = dests
                        .iter()
                        .map(|d| d.pretty_print(0))
                        .collect::<Vec<_>>()
                        .join(", ");
                    result.push_str(&format!(
                        "{} = destructure_tuple {}",
                        dests_str,
                        tuple.pretty_print(0)
                    ));
                }
            }

            InstructionKind::PointerToAddress { dest, pointer, ty } => {
                result.push_str(&format!(
                    "{} = pointer_to_address {} to {}",
                    dest.pretty_print(0),
                    pointer.pretty_print(0),
                    ty.pretty_print(0)
                ));
            }

            InstructionKind::IndexAddr { dest, base, index } => {
                result.push_str(&format!(
                    "{} = index_addr {}, {}",
                    dest.pretty_print(0),
                    base.pretty_print(0),
                    index.pretty_print(0)
                ));
            }
        }

        result
    }
}

impl PrettyPrint for ValueId {
    fn pretty_print(&self, _indent: usize) -> String {
        format!("%{}", self.index())
    }
}
