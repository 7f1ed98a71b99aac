//! Tracing array element addresses back to their allocation.
//!
//! An array literal is lowered to a call of the uninitialized-array primitive,
//! which returns the array together with a raw pointer to its storage. The
//! elements are then written through addresses derived from that pointer:
//!
//! ```text
//! %1 = call @allocate_uninitialized_array(3)
//! %2, %3 = destructure_tuple %1
//! %4 = pointer_to_address %3 to *float
//! %5 = index_addr %4, 1
//! store %5, %x
//! ```
//!
//! Matching is structural and best effort. An address of any other shape is
//! simply not array storage.

use diffsil_compiler_mir::{CallSite, FunctionGraph, InstructionKind, Value, ValueId};

use crate::config::ARRAY_UNINITIALIZED_INTRINSIC;
use crate::{AutoDiffConfig, AD_LOG_TARGET};

/// Returns true if `call` invokes the uninitialized-array primitive
pub fn is_array_literal_intrinsic(call: &CallSite<'_>) -> bool {
    call.has_semantics(ARRAY_UNINITIALIZED_INTRINSIC)
}

/// The uninitialized-array call whose direct result is `value`, if any
pub fn get_allocate_uninitialized_array_intrinsic<'f>(
    graph: &FunctionGraph<'f>,
    value: ValueId,
) -> Option<CallSite<'f>> {
    graph
        .defining_call(value)
        .filter(|call| is_array_literal_intrinsic(call))
}

/// Finds the call that allocated the array storage `address` points into.
pub fn find_array_allocation<'f>(
    graph: &FunctionGraph<'f>,
    address: ValueId,
) -> Option<CallSite<'f>> {
    find_array_allocation_with(graph, address, &AutoDiffConfig::default())
}

/// [`find_array_allocation`] with the allocation primitive taken from `config`.
///
/// Accepts `pointer_to_address` directly, or one `index_addr` whose base is a
/// `pointer_to_address`. The pointer must be an output of a
/// `destructure_tuple` of the allocating call's result.
pub fn find_array_allocation_with<'f>(
    graph: &FunctionGraph<'f>,
    address: ValueId,
    config: &AutoDiffConfig,
) -> Option<CallSite<'f>> {
    let (_, _, instruction) = graph.defining_instruction(address)?;
    let pointer = match &instruction.kind {
        InstructionKind::PointerToAddress { pointer, .. } => *pointer,
        InstructionKind::IndexAddr { base, .. } => storage_pointer(graph, *base)?,
        _ => return None,
    };

    let (_, _, decomposition) = graph.defining_instruction(pointer.as_operand()?)?;
    let InstructionKind::DestructureTuple { tuple, .. } = &decomposition.kind else {
        return None;
    };

    let call = graph.defining_call(tuple.as_operand()?)?;
    if !config.is_array_literal_intrinsic(&call) {
        return None;
    }

    log::debug!(
        target: AD_LOG_TARGET,
        "[AD] address {address:?} points into array allocated at {}",
        call.location
    );
    Some(call)
}

/// The pointer operand of the `pointer_to_address` defining `base`
fn storage_pointer(graph: &FunctionGraph<'_>, base: Value) -> Option<Value> {
    let (_, _, instruction) = graph.defining_instruction(base.as_operand()?)?;
    match &instruction.kind {
        InstructionKind::PointerToAddress { pointer, .. } => Some(*pointer),
        _ => None,
    }
}
