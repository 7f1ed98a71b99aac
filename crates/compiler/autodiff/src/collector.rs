//! # Minimal Index Collection
//!
//! When the differentiation transform reaches an active call it needs the
//! derivative of the callee, but only with respect to the arguments that are
//! active and only of the results that are active. This module computes that
//! pair of index sets in the callee's own parameter and result order.

use diffsil_compiler_mir::{CallSite, FunctionGraph, InstrLocation, Value, ValueId};
use rustc_hash::FxHashMap;

use crate::results::enumerate_results;
use crate::{
    ActivityOracle, AdResult, AutoDiffIndices, ContractViolation, IndexSubset, AD_LOG_TARGET,
};

/// The indices a call must be differentiated at, plus the call's results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimalIndices {
    /// Every formal result in the callee's declared order
    pub results: Vec<Option<ValueId>>,
    /// Active arguments, by parameter position
    pub parameter_indices: IndexSubset,
    /// Active results, by declared result position
    pub result_indices: IndexSubset,
}

impl MinimalIndices {
    /// The index specification to request the callee's derivative with
    pub fn indices(&self) -> AutoDiffIndices {
        AutoDiffIndices::new(self.parameter_indices.clone(), self.result_indices.clone())
    }
}

/// Computes the minimal indices of `call` under the enclosing request `parent`.
///
/// The oracle is asked at most once per distinct value, across arguments and
/// results alike; results without an SSA value are never asked about. Callers
/// must only pass calls with at least one active result, anything else is
/// reported as [`ContractViolation::NoActiveResults`].
pub fn collect_minimal_indices<'f, O>(
    graph: &FunctionGraph<'f>,
    call: &CallSite<'f>,
    parent: &AutoDiffIndices,
    oracle: &O,
) -> AdResult<MinimalIndices>
where
    O: ActivityOracle + ?Sized,
{
    log::debug!(
        target: AD_LOG_TARGET,
        "[AD] collecting minimal indices of call to '{}' at {} under {parent}",
        call.callee.name,
        call.location
    );

    let signature = call.signature;
    let arguments = call.arguments_without_indirect_results();
    if arguments.len() != signature.num_params() {
        return Err(ContractViolation::ArgumentCountMismatch {
            call: call.location,
            expected: signature.num_params(),
            found: arguments.len(),
        });
    }

    let mut answers: FxHashMap<Value, bool> = FxHashMap::default();
    let mut is_active = |value: Value| {
        *answers
            .entry(value)
            .or_insert_with(|| oracle.is_active(value, parent))
    };

    let mut parameter_indices = IndexSubset::empty(signature.num_params());
    for (position, argument) in arguments.iter().enumerate() {
        if is_active(*argument) {
            parameter_indices.insert(position);
        }
    }

    let results = enumerate_results(graph, call)?.collect::<Vec<_>>();
    if results.len() != signature.num_results() {
        return Err(ContractViolation::ResultCountMismatch {
            call: call.location,
            expected: signature.num_results(),
            found: results.len(),
        });
    }

    let mut result_indices = IndexSubset::empty(signature.num_results());
    for (position, result) in results.iter().enumerate() {
        let Some(value) = *result else {
            continue;
        };
        if is_active(Value::operand(value)) {
            result_indices.insert(position);
        }
    }

    if result_indices.is_empty() {
        return Err(ContractViolation::NoActiveResults {
            call: call.location,
        });
    }

    log::debug!(
        target: AD_LOG_TARGET,
        "[AD] minimal indices of call at {}: params {parameter_indices}, results {result_indices}",
        call.location
    );
    Ok(MinimalIndices {
        results,
        parameter_indices,
        result_indices,
    })
}

/// [`collect_minimal_indices`] for the instruction at `location`, which must
/// be a call
pub fn collect_minimal_indices_at<O>(
    graph: &FunctionGraph<'_>,
    location: InstrLocation,
    parent: &AutoDiffIndices,
    oracle: &O,
) -> AdResult<MinimalIndices>
where
    O: ActivityOracle + ?Sized,
{
    let call = graph
        .call_site(location)
        .ok_or(ContractViolation::NotACall(location))?;
    collect_minimal_indices(graph, &call, parent, oracle)
}

#[cfg(test)]
mod tests {
    use diffsil_compiler_mir::{
        Callee, FunctionBuilder, FunctionGraph, FunctionId, FunctionSignature, MirFunction,
        MirType, ResultInfo, Value,
    };

    use std::cell::RefCell;

    use super::*;
    use crate::ActiveValues;

    #[test]
    fn test_non_call_location_is_rejected() {
        let mut function = MirFunction::new("f".to_string());
        let mut builder = FunctionBuilder::new(&mut function);
        builder.assign(Value::integer(1), MirType::Int);
        let location = builder.last_location().unwrap();
        builder.ret(Value::unit());

        let graph = FunctionGraph::new(&function);
        let result = collect_minimal_indices_at(
            &graph,
            location,
            &AutoDiffIndices::default(),
            &ActiveValues::new(),
        );
        assert_eq!(result, Err(ContractViolation::NotACall(location)));
    }

    #[test]
    fn test_literal_arguments_are_never_active() {
        let signature = FunctionSignature::new(
            vec![MirType::Float, MirType::Float],
            vec![ResultInfo::direct(MirType::Float)],
        );
        let mut function = MirFunction::with_signature(
            "outer".to_string(),
            FunctionSignature::new(vec![MirType::Float], vec![ResultInfo::direct(MirType::Float)]),
        );
        let x = function.parameters[0];
        let mut builder = FunctionBuilder::new(&mut function);
        let y = builder.call(
            Callee::new(FunctionId::new(1), "scale"),
            vec![Value::integer(2), Value::operand(x)],
            signature,
        );
        let location = builder.last_location().unwrap();
        builder.ret(Value::operand(y));

        let graph = FunctionGraph::new(&function);
        let oracle: ActiveValues = [x, y].into_iter().collect();
        let minimal = collect_minimal_indices_at(
            &graph,
            location,
            &AutoDiffIndices::new(IndexSubset::all(1), IndexSubset::all(1)),
            &oracle,
        )
        .unwrap();
        assert_eq!(minimal.parameter_indices.as_slice(), &[1]);
        assert_eq!(minimal.result_indices.as_slice(), &[0]);
        assert_eq!(minimal.results, vec![Some(y)]);
        assert_eq!(
            minimal.indices().to_string(),
            "(params: {1}/2, results: {0}/1)"
        );
    }

    #[test]
    fn test_repeated_argument_is_queried_once() {
        let signature = FunctionSignature::new(
            vec![MirType::Float, MirType::Float],
            vec![ResultInfo::direct(MirType::Float)],
        );
        let mut function = MirFunction::with_signature(
            "square".to_string(),
            FunctionSignature::new(vec![MirType::Float], vec![ResultInfo::direct(MirType::Float)]),
        );
        let x = function.parameters[0];
        let mut builder = FunctionBuilder::new(&mut function);
        let y = builder.call(
            Callee::new(FunctionId::new(1), "mul"),
            vec![Value::operand(x), Value::operand(x)],
            signature,
        );
        let location = builder.last_location().unwrap();
        builder.ret(Value::operand(y));

        let graph = FunctionGraph::new(&function);
        let queries = RefCell::new(Vec::new());
        let oracle = |value: Value, _: &AutoDiffIndices| {
            queries.borrow_mut().push(value);
            true
        };
        let minimal = collect_minimal_indices_at(
            &graph,
            location,
            &AutoDiffIndices::new(IndexSubset::all(1), IndexSubset::all(1)),
            &oracle,
        )
        .unwrap();

        assert_eq!(minimal.parameter_indices.as_slice(), &[0, 1]);
        assert_eq!(minimal.result_indices.as_slice(), &[0]);
        assert_eq!(
            queries.into_inner(),
            vec![Value::operand(x), Value::operand(y)]
        );
    }

    #[test]
    fn test_argument_count_mismatch() {
        let mut function = MirFunction::new("f".to_string());
        let mut builder = FunctionBuilder::new(&mut function);
        builder.call(
            Callee::new(FunctionId::new(1), "unary"),
            vec![Value::integer(1), Value::integer(2)],
            FunctionSignature::new(vec![MirType::Int], vec![ResultInfo::direct(MirType::Int)]),
        );
        let location = builder.last_location().unwrap();
        builder.ret(Value::unit());

        let graph = FunctionGraph::new(&function);
        let always = |_: Value, _: &AutoDiffIndices| true;
        assert_eq!(
            collect_minimal_indices_at(&graph, location, &AutoDiffIndices::default(), &always),
            Err(ContractViolation::ArgumentCountMismatch {
                call: location,
                expected: 1,
                found: 2,
            })
        );
    }
}
