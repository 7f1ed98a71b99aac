//! End-to-end minimal index collection over small call sites.

mod common;

use std::cell::RefCell;

use common::CallFixture;
use diffsil_compiler_autodiff::{
    collect_minimal_indices_at, collect_results, ActiveValues, ActivityOracle, AutoDiffIndices,
    ContractViolation, IndexSubset,
};
use diffsil_compiler_mir::{FunctionGraph, MirType, ResultInfo, Value};

/// Records every query and answers from a fixed set
struct CountingOracle {
    active: ActiveValues,
    queries: RefCell<Vec<Value>>,
}

impl CountingOracle {
    fn new(active: ActiveValues) -> Self {
        Self {
            active,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl ActivityOracle for CountingOracle {
    fn is_active(&self, value: Value, indices: &AutoDiffIndices) -> bool {
        self.queries.borrow_mut().push(value);
        self.active.is_active(value, indices)
    }
}

fn parent() -> AutoDiffIndices {
    AutoDiffIndices::new(
        IndexSubset::from_indices(2, [0]),
        IndexSubset::from_indices(2, [1]),
    )
}

/// `(int, float) -> (int, float)`, both results direct and decomposed
fn scenario_a() -> CallFixture {
    CallFixture::new(
        &[MirType::Int, MirType::Float],
        &[
            ResultInfo::direct(MirType::Int),
            ResultInfo::direct(MirType::Float),
        ],
        true,
    )
}

/// `(float, float) -> (direct float, indirect float)`
fn scenario_b() -> CallFixture {
    CallFixture::new(
        &[MirType::Float, MirType::Float],
        &[
            ResultInfo::direct(MirType::Float),
            ResultInfo::indirect(MirType::Float),
        ],
        false,
    )
}

#[test]
fn test_scenario_a_decomposed_direct_results() {
    let fixture = scenario_a();
    let graph = FunctionGraph::new(&fixture.function);
    let oracle: ActiveValues = [fixture.arguments[0], fixture.direct_parts[1]]
        .into_iter()
        .collect();

    let minimal = collect_minimal_indices_at(&graph, fixture.call, &parent(), &oracle).unwrap();

    assert_eq!(minimal.parameter_indices, IndexSubset::from_indices(2, [0]));
    assert_eq!(minimal.result_indices, IndexSubset::from_indices(2, [1]));
    assert_eq!(minimal.results, fixture.expected_results());
}

#[test]
fn test_scenario_b_only_indirect_result_active() {
    let fixture = scenario_b();
    let graph = FunctionGraph::new(&fixture.function);
    let oracle: ActiveValues = [fixture.arguments[1], fixture.result_addresses[0]]
        .into_iter()
        .collect();

    let minimal = collect_minimal_indices_at(&graph, fixture.call, &parent(), &oracle).unwrap();

    assert_eq!(minimal.parameter_indices.as_slice(), &[1]);
    assert_eq!(minimal.result_indices.as_slice(), &[1]);
    assert_eq!(
        minimal.results,
        vec![Some(fixture.dest), Some(fixture.result_addresses[0])]
    );
}

#[test]
fn test_scenario_c_no_active_results_is_fatal() {
    let fixture = scenario_a();
    let graph = FunctionGraph::new(&fixture.function);
    let oracle: ActiveValues = fixture.arguments.iter().copied().collect();

    let result = collect_minimal_indices_at(&graph, fixture.call, &parent(), &oracle);

    assert_eq!(
        result,
        Err(ContractViolation::NoActiveResults { call: fixture.call })
    );
}

#[test]
fn test_undecomposed_multi_result_call_is_fatal() {
    let fixture = scenario_a_undecomposed();
    let graph = FunctionGraph::new(&fixture.function);
    let oracle = CountingOracle::new(fixture.arguments.iter().copied().collect());

    let result = collect_minimal_indices_at(&graph, fixture.call, &parent(), &oracle);

    assert_eq!(
        result,
        Err(ContractViolation::DirectResultsExhausted {
            call: fixture.call,
            expected: 2,
            available: 0,
        })
    );
    let queried = oracle.queries.borrow().clone();
    assert_eq!(
        queried,
        fixture
            .arguments
            .iter()
            .map(|id| Value::operand(*id))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_undecomposed_float_pair_has_no_results() {
    let fixture = CallFixture::new(
        &[MirType::Float],
        &[
            ResultInfo::direct(MirType::Float),
            ResultInfo::direct(MirType::Float),
        ],
        false,
    );
    let graph = FunctionGraph::new(&fixture.function);
    let call = graph.call_site(fixture.call).unwrap();

    assert!(matches!(
        collect_results(&graph, &call),
        Err(ContractViolation::DirectResultsExhausted { .. })
    ));
}

fn scenario_a_undecomposed() -> CallFixture {
    CallFixture::new(
        &[MirType::Int, MirType::Float],
        &[
            ResultInfo::direct(MirType::Int),
            ResultInfo::direct(MirType::Float),
        ],
        false,
    )
}

#[test]
fn test_oracle_is_asked_once_per_value() {
    let fixture = CallFixture::new(
        &[MirType::Float, MirType::Int, MirType::Float],
        &[
            ResultInfo::indirect(MirType::Float),
            ResultInfo::direct(MirType::Float),
            ResultInfo::direct(MirType::Int),
            ResultInfo::indirect(MirType::Float),
        ],
        true,
    );
    let graph = FunctionGraph::new(&fixture.function);
    let oracle = CountingOracle::new(
        [fixture.arguments[2], fixture.result_addresses[1]]
            .into_iter()
            .collect(),
    );

    let minimal = collect_minimal_indices_at(&graph, fixture.call, &parent(), &oracle).unwrap();

    assert_eq!(minimal.parameter_indices.as_slice(), &[2]);
    assert_eq!(minimal.result_indices.as_slice(), &[3]);

    let queries = oracle.queries.borrow();
    assert_eq!(queries.len(), 3 + 4);
    let mut unique = queries.clone();
    unique.sort_by_key(|value| value.as_operand());
    unique.dedup();
    assert_eq!(unique.len(), queries.len());
}

#[test]
fn test_collection_is_idempotent() {
    let fixture = scenario_a();
    let graph = FunctionGraph::new(&fixture.function);
    let oracle: ActiveValues = [fixture.arguments[1], fixture.direct_parts[0]]
        .into_iter()
        .collect();

    let first = collect_minimal_indices_at(&graph, fixture.call, &parent(), &oracle).unwrap();
    let second = collect_minimal_indices_at(&graph, fixture.call, &parent(), &oracle).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.indices().to_string(), "(params: {1}/2, results: {0}/2)");
}

#[test]
fn test_closure_oracle() {
    let fixture = scenario_b();
    let graph = FunctionGraph::new(&fixture.function);
    let dest = fixture.dest;
    let oracle = move |value: Value, _: &AutoDiffIndices| value == Value::operand(dest);

    let minimal = collect_minimal_indices_at(&graph, fixture.call, &parent(), &oracle).unwrap();

    assert!(minimal.parameter_indices.is_empty());
    assert_eq!(minimal.result_indices.as_slice(), &[0]);
    assert_eq!(
        collect_results(&graph, &graph.call_site(fixture.call).unwrap()).unwrap(),
        minimal.results
    );
}
