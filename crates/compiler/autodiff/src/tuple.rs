//! Locating the decomposition of a tuple value.
//!
//! A multi-result call produces one tuple value; its elements only become
//! individual SSA values through a `destructure_tuple` user. Well-formed IR has
//! at most one such user per tuple.

use diffsil_compiler_mir::{FunctionGraph, InstrLocation, InstructionKind, UseSite, ValueId};

use crate::{AdResult, ContractViolation, AD_LOG_TARGET};

/// The `destructure_tuple` instruction consuming a tuple value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleDecomposition<'f> {
    pub location: InstrLocation,
    /// One value per tuple element, in element order
    pub results: &'f [ValueId],
}

/// Finds the unique `destructure_tuple` user of `value`.
///
/// Non-tuple values answer `None` without looking at their uses. A tuple with
/// two decompositions is malformed IR and reported as a contract violation.
pub fn find_tuple_decomposition<'f>(
    graph: &FunctionGraph<'f>,
    value: ValueId,
) -> AdResult<Option<TupleDecomposition<'f>>> {
    if !graph.value_type(value).is_some_and(|ty| ty.is_tuple()) {
        return Ok(None);
    }

    let mut found: Option<TupleDecomposition<'f>> = None;
    for site in graph.uses(value) {
        let UseSite::Instruction { location, .. } = *site else {
            continue;
        };
        let Some(instruction) = graph.instruction(location) else {
            continue;
        };
        if let InstructionKind::DestructureTuple { dests, .. } = &instruction.kind {
            if let Some(first) = found {
                return Err(ContractViolation::DuplicateTupleDecomposition {
                    value,
                    first: first.location,
                    second: location,
                });
            }
            found = Some(TupleDecomposition {
                location,
                results: dests,
            });
        }
    }

    if found.is_none() {
        log::trace!(target: AD_LOG_TARGET, "[AD] tuple {value:?} is never decomposed");
    }
    Ok(found)
}
