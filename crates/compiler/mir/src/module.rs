//! # MIR Module
//!
//! The functions of one compilation unit. Calls only carry a [`Callee`], so the
//! module is where a callee's signature and semantics tags are resolved.

use index_vec::IndexVec;
use rustc_hash::FxHashMap;

use crate::{indent_str, Callee, FunctionId, MirFunction, PrettyPrint};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirModule {
    pub functions: IndexVec<FunctionId, MirFunction>,
    by_name: FxHashMap<String, FunctionId>,
}

impl MirModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function`; a later function with the same name shadows the
    /// earlier one in [`Self::lookup_function`]
    pub fn add_function(&mut self, function: MirFunction) -> FunctionId {
        let name = function.name.clone();
        let id = self.functions.push(function);
        self.by_name.insert(name, id);
        id
    }

    pub fn get_function(&self, id: FunctionId) -> Option<&MirFunction> {
        self.functions.get(id)
    }

    pub fn lookup_function(&self, name: &str) -> Option<FunctionId> {
        self.by_name.get(name).copied()
    }

    /// The callee reference a call to `id` carries, semantics tags included
    pub fn callee(&self, id: FunctionId) -> Option<Callee> {
        let function = self.functions.get(id)?;
        Some(Callee {
            function: id,
            name: function.name.clone(),
            semantics: function.semantics.clone(),
        })
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Validates every function, reporting the first one that is malformed
    pub fn validate(&self) -> Result<(), String> {
        self.functions.iter().try_for_each(|function| {
            function
                .validate()
                .map_err(|err| format!("Function {} validation failed: {err}", function.name))
        })
    }
}

impl PrettyPrint for MirModule {
    fn pretty_print(&self, indent: usize) -> String {
        let prefix = indent_str(indent);
        let body: String = self
            .functions
            .iter()
            .map(|function| function.pretty_print(indent + 1))
            .collect();
        format!("{prefix}module {{\n{body}{prefix}}}\n")
    }
}
