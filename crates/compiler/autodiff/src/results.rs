//! # Formal Result Enumeration
//!
//! A call hands its results back two ways. Formally direct results come out of
//! the call's single SSA destination, packed into a tuple when there is not
//! exactly one of them and unpacked by a `destructure_tuple`. Formally
//! indirect results are written through addresses the caller appends to the
//! argument list. The functions here put both back into the callee's declared
//! result order.

use std::iter::FusedIterator;
use std::slice;

use diffsil_compiler_mir::{
    CallSite, FunctionGraph, InstructionKind, Literal, ResultConvention, ResultInfo, Value,
    ValueId,
};

use crate::tuple::find_tuple_decomposition;
use crate::{AdResult, ContractViolation, AD_LOG_TARGET};

/// What the call's direct destination contributes to the result list
#[derive(Debug, Clone, Copy)]
enum DirectContribution<'f> {
    /// A non-tuple destination is the one direct result
    Bare(ValueId),
    /// The outputs of the tuple's decomposition, in element order
    Decomposed(&'f [ValueId]),
    /// A tuple nobody decomposes: its fields are never used on their own
    Undecomposed,
}

impl<'f> DirectContribution<'f> {
    fn of_call(graph: &FunctionGraph<'f>, call: &CallSite<'f>) -> AdResult<Self> {
        let is_tuple = match graph.value_type(call.dest) {
            Some(ty) => ty.is_tuple(),
            None => call.signature.direct_result_type().is_tuple(),
        };
        if !is_tuple {
            return Ok(Self::Bare(call.dest));
        }
        Ok(match find_tuple_decomposition(graph, call.dest)? {
            Some(decomposition) => Self::Decomposed(decomposition.results),
            None => Self::Undecomposed,
        })
    }

    /// How many direct results can be drawn
    fn available(&self) -> usize {
        match self {
            Self::Bare(_) => 1,
            Self::Decomposed(results) => results.len(),
            Self::Undecomposed => 0,
        }
    }

    fn get(&self, position: usize) -> Option<ValueId> {
        match self {
            Self::Bare(value) => (position == 0).then_some(*value),
            Self::Decomposed(results) => results.get(position).copied(),
            Self::Undecomposed => None,
        }
    }
}

/// Calls `f` with every direct result of `call`, in order.
///
/// That is the destination itself when it is not a tuple, or the outputs of
/// its decomposition. A tuple that is never decomposed contributes nothing.
pub fn for_each_direct_result<'f, F>(
    graph: &FunctionGraph<'f>,
    call: &CallSite<'f>,
    mut f: F,
) -> AdResult<()>
where
    F: FnMut(ValueId),
{
    match DirectContribution::of_call(graph, call)? {
        DirectContribution::Bare(value) => f(value),
        DirectContribution::Decomposed(results) => results.iter().copied().for_each(f),
        DirectContribution::Undecomposed => {}
    }
    Ok(())
}

/// The results of one call in declared order.
///
/// Yields exactly one entry per declared result. An entry is `None` only for an
/// indirect result written through a literal.
#[derive(Debug, Clone)]
pub struct FormalResults<'f> {
    declared: slice::Iter<'f, ResultInfo>,
    direct: DirectContribution<'f>,
    indirect: slice::Iter<'f, Value>,
    next_direct: usize,
}

impl Iterator for FormalResults<'_> {
    type Item = Option<ValueId>;

    fn next(&mut self) -> Option<Self::Item> {
        let info = self.declared.next()?;
        Some(match info.convention {
            ResultConvention::Direct => {
                let value = self.direct.get(self.next_direct);
                self.next_direct += 1;
                value
            }
            ResultConvention::Indirect => self.indirect.next().and_then(Value::as_operand),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.declared.size_hint()
    }
}

impl ExactSizeIterator for FormalResults<'_> {}

impl FusedIterator for FormalResults<'_> {}

/// Enumerates the results of `call` in the callee's declared order.
///
/// Counts are checked before anything is yielded: the direct contribution must
/// cover every formally direct result and the call must pass one address per
/// formally indirect result. A tuple that is never decomposed contributes no
/// direct results, so it only passes when the callee declares none. Calling
/// this twice on the same call yields the same sequence.
pub fn enumerate_results<'f>(
    graph: &FunctionGraph<'f>,
    call: &CallSite<'f>,
) -> AdResult<FormalResults<'f>> {
    let signature = call.signature;
    let direct = DirectContribution::of_call(graph, call)?;

    let expected_direct = signature.num_direct_results();
    let available = direct.available();
    if available < expected_direct {
        return Err(ContractViolation::DirectResultsExhausted {
            call: call.location,
            expected: expected_direct,
            available,
        });
    }

    let expected_indirect = signature.num_indirect_results();
    let indirect = call.indirect_result_arguments();
    if indirect.len() < expected_indirect {
        return Err(ContractViolation::IndirectResultsExhausted {
            call: call.location,
            expected: expected_indirect,
            available: indirect.len(),
        });
    }

    Ok(FormalResults {
        declared: signature.results.iter(),
        direct,
        indirect: indirect.iter(),
        next_direct: 0,
    })
}

/// [`enumerate_results`], collected
pub fn collect_results<'f>(
    graph: &FunctionGraph<'f>,
    call: &CallSite<'f>,
) -> AdResult<Vec<Option<ValueId>>> {
    Ok(enumerate_results(graph, call)?.collect())
}

/// The formal results of the function itself, in its declared result order.
///
/// Direct results are read from the operand of the unique `return`: the
/// elements of a `make_tuple` when the function has other than one direct
/// result, the returned value otherwise. Indirect results are the function's
/// own result addresses.
pub fn collect_all_formal_results_in_type_order(
    graph: &FunctionGraph<'_>,
) -> AdResult<Vec<Value>> {
    let function = graph.function();
    let missing_return = || ContractViolation::MissingReturn {
        function: function.name.clone(),
    };

    let block = function.find_return_block().ok_or_else(missing_return)?;
    let returned = function.basic_blocks[block]
        .terminator
        .return_operand()
        .ok_or_else(missing_return)?;

    let signature = &function.signature;
    let num_direct = signature.num_direct_results();
    let direct = if num_direct == 1 {
        vec![returned]
    } else {
        unpack_returned_tuple(graph, returned)
    };
    if direct.len() != num_direct {
        return Err(ContractViolation::ReturnArityMismatch {
            function: function.name.clone(),
            expected: num_direct,
            found: direct.len(),
        });
    }
    if function.indirect_results.len() != signature.num_indirect_results() {
        return Err(ContractViolation::ReturnArityMismatch {
            function: function.name.clone(),
            expected: signature.num_indirect_results(),
            found: function.indirect_results.len(),
        });
    }

    let mut direct = direct.into_iter();
    let mut indirect = function.indirect_results.iter().copied();
    let results = signature
        .results
        .iter()
        .filter_map(|info| match info.convention {
            ResultConvention::Direct => direct.next(),
            ResultConvention::Indirect => indirect.next().map(Value::operand),
        })
        .collect::<Vec<_>>();

    log::trace!(
        target: AD_LOG_TARGET,
        "[AD] formal results of '{}': {} values",
        function.name,
        results.len()
    );
    Ok(results)
}

fn unpack_returned_tuple(graph: &FunctionGraph<'_>, returned: Value) -> Vec<Value> {
    match returned {
        Value::Literal(Literal::Unit) => Vec::new(),
        Value::Operand(id) => match graph.defining_instruction(id) {
            Some((_, _, instruction)) => match &instruction.kind {
                InstructionKind::MakeTuple { elements, .. } => elements.clone(),
                _ => vec![returned],
            },
            None => vec![returned],
        },
        _ => vec![returned],
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
