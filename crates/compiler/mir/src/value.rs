//! # Operands
//!
//! Instructions consume either an SSA value by id or an inline constant.

use crate::{PrettyPrint, ValueId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Literal(Literal),
    /// An SSA value defined by an instruction, a parameter or an indirect
    /// result address
    Operand(ValueId),
}

/// Inline constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    Integer(i64),
    Unit,
}

impl Value {
    pub const fn integer(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    /// The empty tuple, returned by functions without direct results
    pub const fn unit() -> Self {
        Self::Literal(Literal::Unit)
    }

    pub const fn operand(id: ValueId) -> Self {
        Self::Operand(id)
    }

    /// The SSA value this operand refers to, `None` for constants
    pub const fn as_operand(&self) -> Option<ValueId> {
        match self {
            Self::Operand(id) => Some(*id),
            Self::Literal(_) => None,
        }
    }
}

impl PrettyPrint for Value {
    fn pretty_print(&self, _indent: usize) -> String {
        match self {
            Self::Literal(Literal::Integer(value)) => value.to_string(),
            Self::Literal(Literal::Unit) => "()".to_string(),
            Self::Operand(id) => id.pretty_print(0),
        }
    }
}
