//! Shared fixtures: a caller function around a single call site.

#![allow(dead_code)]

use diffsil_compiler_mir::{
    Callee, FunctionBuilder, FunctionId, FunctionSignature, InstrLocation, MirFunction, MirType,
    ResultConvention, ResultInfo, Value, ValueId,
};

/// A caller whose body is one call, with everything a test needs to know
/// about the values involved
pub struct CallFixture {
    pub function: MirFunction,
    pub call: InstrLocation,
    pub signature: FunctionSignature,
    /// The formal arguments, one per callee parameter
    pub arguments: Vec<ValueId>,
    /// The call's direct destination
    pub dest: ValueId,
    /// Outputs of the destination's decomposition, if one was emitted
    pub direct_parts: Vec<ValueId>,
    /// Addresses passed for the indirect results, in declared order
    pub result_addresses: Vec<ValueId>,
}

impl CallFixture {
    /// Builds `caller(params...)` calling `callee(params...) -> results`.
    ///
    /// Parameters are forwarded from the caller, indirect results are written
    /// to fresh locals, and a packed direct result is decomposed when
    /// `decompose` is set.
    pub fn new(params: &[MirType], results: &[ResultInfo], decompose: bool) -> Self {
        let signature = FunctionSignature::new(params.to_vec(), results.to_vec());
        let caller_signature = FunctionSignature::new(params.to_vec(), vec![]);
        let mut function = MirFunction::with_signature("caller".to_string(), caller_signature);
        let arguments = function.parameters.clone();

        let mut builder = FunctionBuilder::new(&mut function);
        let result_addresses = results
            .iter()
            .filter(|info| info.is_formal_indirect())
            .map(|info| builder.stack_alloc(info.ty.clone()))
            .collect::<Vec<_>>();

        let args = arguments
            .iter()
            .chain(&result_addresses)
            .map(|id| Value::operand(*id))
            .collect();
        let dest = builder.call(
            Callee::new(FunctionId::new(1), "callee"),
            args,
            signature.clone(),
        );
        let call = builder.last_location().unwrap();

        let direct_parts = if decompose && signature.direct_result_type().is_tuple() {
            builder.destructure_tuple(dest)
        } else {
            Vec::new()
        };
        builder.ret(Value::unit());
        function.validate().unwrap();

        Self {
            function,
            call,
            signature,
            arguments,
            dest,
            direct_parts,
            result_addresses,
        }
    }

    /// The result list a correct enumeration must produce
    pub fn expected_results(&self) -> Vec<Option<ValueId>> {
        let packed = self.signature.num_direct_results() != 1;

        let mut direct = 0;
        let mut indirect = 0;
        self.signature
            .results
            .iter()
            .map(|info| match info.convention {
                ResultConvention::Direct => {
                    let value = if packed {
                        self.direct_parts.get(direct).copied()
                    } else {
                        Some(self.dest)
                    };
                    direct += 1;
                    value
                }
                ResultConvention::Indirect => {
                    let value = self.result_addresses[indirect];
                    indirect += 1;
                    Some(value)
                }
            })
            .collect()
    }
}
