//! # MIR Terminators
//!
//! Every basic block ends in exactly one terminator. The analyses only need to
//! find the block that returns and read the value it returns.

use crate::{PrettyPrint, Value, ValueId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Terminator {
    /// Function return: `return value`
    ///
    /// Multiple direct results are returned as one tuple value; a function
    /// without direct results returns unit.
    Return { value: Value },

    /// Placeholder of a block that has not been finished
    #[default]
    Unreachable,
}

impl Terminator {
    pub const fn return_value(value: Value) -> Self {
        Self::Return { value }
    }

    /// A return of unit
    pub const fn return_void() -> Self {
        Self::return_value(Value::unit())
    }

    /// The SSA values this terminator reads
    pub fn used_values(&self) -> Vec<ValueId> {
        self.return_operand()
            .and_then(|value| value.as_operand())
            .into_iter()
            .collect()
    }

    pub const fn is_return(&self) -> bool {
        matches!(self, Self::Return { .. })
    }

    /// Returns the returned value if this is a return
    pub const fn return_operand(&self) -> Option<Value> {
        match self {
            Self::Return { value } => Some(*value),
            Self::Unreachable => None,
        }
    }
}

impl PrettyPrint for Terminator {
    fn pretty_print(&self, _indent: usize) -> String {
        match self {
            Self::Return { value } => format!("return {}", value.pretty_print(0)),
            Self::Unreachable => "unreachable".to_string(),
        }
    }
}
