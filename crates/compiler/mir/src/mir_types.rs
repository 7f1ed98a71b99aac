//! # MIR Type System
//!
//! A small structural type system. It only carries what analyses need to tell
//! aggregates, addresses and scalars apart.

use crate::PrettyPrint;

/// A type attached to every SSA value of a function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MirType {
    /// Signed machine integer
    Int,

    /// Floating point scalar, the usual differentiable type
    Float,

    Bool,

    /// An untyped pointer word
    ///
    /// Array allocation hands back the element storage as a raw pointer that
    /// has to be converted into a typed address before it can be written.
    RawPointer,

    /// The address of a memory location holding a value of `element` type
    Address(Box<MirType>),

    /// A growable array of `element`
    Array(Box<MirType>),

    /// Tuple type with element types. The empty tuple is the unit type.
    Tuple(Vec<MirType>),

    /// Operand of a value the function never typed
    Unknown,
}

impl MirType {
    /// The unit type, represented as the empty tuple
    pub const fn unit() -> Self {
        Self::Tuple(Vec::new())
    }

    pub const fn tuple(types: Vec<Self>) -> Self {
        Self::Tuple(types)
    }

    pub fn address(element: Self) -> Self {
        Self::Address(Box::new(element))
    }

    pub fn array(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns true for tuple types, including unit
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }

    /// Returns the element types if this is a tuple
    pub fn tuple_elements(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(elements) => Some(elements),
            _ => None,
        }
    }
}

impl PrettyPrint for MirType {
    fn pretty_print(&self, _indent: usize) -> String {
        match self {
            Self::Int => "int".to_string(),
            Self::Float => "float".to_string(),
            Self::Bool => "bool".to_string(),
            Self::RawPointer => "rawptr".to_string(),
            Self::Address(element) => format!("*{}", element.pretty_print(0)),
            Self::Array(element) => format!("[{}]", element.pretty_print(0)),
            Self::Tuple(elements) => {
                let inner = elements
                    .iter()
                    .map(|ty| ty.pretty_print(0))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({inner})")
            }
            Self::Unknown => "<unknown>".to_string(),
        }
    }
}

impl std::fmt::Display for MirType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_print(0))
    }
}
