//! Configuration for the differentiation utilities.

use std::borrow::Cow;

use diffsil_compiler_mir::CallSite;

/// Semantics tag of the primitive allocating the storage of an array literal
pub const ARRAY_UNINITIALIZED_INTRINSIC: &str = "array.uninitialized_intrinsic";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoDiffConfig {
    /// Semantics tag identifying the array allocation primitive
    pub array_literal_semantics: Cow<'static, str>,
}

impl AutoDiffConfig {
    /// Returns true if `call` invokes the array allocation primitive
    pub fn is_array_literal_intrinsic(&self, call: &CallSite<'_>) -> bool {
        call.has_semantics(&self.array_literal_semantics)
    }
}

impl Default for AutoDiffConfig {
    fn default() -> Self {
        Self {
            array_literal_semantics: Cow::Borrowed(ARRAY_UNINITIALIZED_INTRINSIC),
        }
    }
}
