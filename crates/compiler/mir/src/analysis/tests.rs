//! # Tests for Analysis Module

use super::def_use::{DefUseIndex, FunctionGraph, UseSite, ValueDef};
use crate::{
    BinaryOp, Callee, FunctionBuilder, FunctionId, FunctionSignature, InstrLocation, MirFunction,
    MirType, ResultInfo, Value,
};

/// `fn f(a: float, out: *float) -> float`:
///   %2 = a + a
///   store out, %2
///   return %2
fn create_store_function() -> MirFunction {
    let signature = FunctionSignature::new(
        vec![MirType::Float],
        vec![
            ResultInfo::direct(MirType::Float),
            ResultInfo::indirect(MirType::Float),
        ],
    );
    let mut function = MirFunction::with_signature("store".to_string(), signature);
    let a = function.parameters[0];
    let out = function.indirect_results[0];

    let mut builder = FunctionBuilder::new(&mut function);
    let sum = builder.binary_op(BinaryOp::Add, Value::operand(a), Value::operand(a));
    builder.store(Value::operand(out), Value::operand(sum));
    builder.ret(Value::operand(sum));
    function
}

#[test]
fn test_defs_of_entry_values_and_instructions() {
    let function = create_store_function();
    let index = DefUseIndex::build(&function);
    let entry = function.entry_block;

    assert_eq!(index.def(function.parameters[0]), Some(ValueDef::Parameter(0)));
    assert_eq!(
        index.def(function.indirect_results[0]),
        Some(ValueDef::IndirectResult(0))
    );

    let sum = function.basic_blocks[entry].instructions[0]
        .destination()
        .unwrap();
    assert_eq!(
        index.def(sum),
        Some(ValueDef::Instruction {
            location: InstrLocation::new(entry, 0),
            result: 0,
        })
    );
}

#[test]
fn test_uses_are_recorded_per_operand_in_order() {
    let function = create_store_function();
    let index = DefUseIndex::build(&function);
    let entry = function.entry_block;
    let a = function.parameters[0];
    let sum = function.basic_blocks[entry].instructions[0]
        .destination()
        .unwrap();

    // `a + a` uses the parameter twice
    assert_eq!(
        index.uses(a),
        &[
            UseSite::Instruction {
                location: InstrLocation::new(entry, 0),
                operand: 0,
            },
            UseSite::Instruction {
                location: InstrLocation::new(entry, 0),
                operand: 1,
            },
        ]
    );

    assert_eq!(
        index.uses(sum),
        &[
            UseSite::Instruction {
                location: InstrLocation::new(entry, 1),
                operand: 1,
            },
            UseSite::Terminator { block: entry },
        ]
    );
}

#[test]
fn test_unused_value_has_no_uses() {
    let mut function = MirFunction::new("unused".to_string());
    let mut builder = FunctionBuilder::new(&mut function);
    let dead = builder.assign(Value::integer(1), MirType::Int);
    builder.ret(Value::unit());

    let index = DefUseIndex::build(&function);
    assert!(index.uses(dead).is_empty());
    assert!(!index.has_uses(dead));
}

#[test]
fn test_graph_finds_defining_call() {
    let mut function = MirFunction::new("caller".to_string());
    let mut builder = FunctionBuilder::new(&mut function);
    let result = builder.call(
        Callee::new(FunctionId::new(3), "get"),
        vec![],
        FunctionSignature::new(vec![], vec![ResultInfo::direct(MirType::Float)]),
    );
    let call_location = builder.last_location().unwrap();
    let doubled = builder.binary_op(BinaryOp::Mul, Value::operand(result), Value::integer(2));
    builder.ret(Value::operand(doubled));

    let graph = FunctionGraph::new(&function);
    let call = graph.defining_call(result).unwrap();
    assert_eq!(call.location, call_location);
    assert_eq!(call.callee.name, "get");
    assert!(graph.defining_call(doubled).is_none());
    assert_eq!(graph.call_site(call_location).unwrap().dest, result);
    assert_eq!(graph.value_type(result), Some(&MirType::Float));
}
