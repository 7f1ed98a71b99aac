//! Contract violations raised by the differentiation utilities.
//!
//! These never describe a user mistake. Each one means the IR handed over by
//! the host is malformed or a caller broke the calling contract, and the
//! surrounding transformation must stop instead of emitting a wrong derivative.
//! An analysis that merely finds nothing (an address that is not array
//! storage, a tuple nobody decomposes) answers `Ok(None)` or `None` instead.

use diffsil_compiler_mir::{InstrLocation, ValueId};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("instruction at {0} is not a call")]
    NotACall(InstrLocation),

    #[error(
        "tuple {value:?} has more than one destructure_tuple user (at {first} and {second})"
    )]
    DuplicateTupleDecomposition {
        value: ValueId,
        first: InstrLocation,
        second: InstrLocation,
    },

    #[error("call at {call} declares {expected} direct results but only {available} were produced")]
    DirectResultsExhausted {
        call: InstrLocation,
        expected: usize,
        available: usize,
    },

    #[error(
        "call at {call} declares {expected} indirect results but passes {available} result addresses"
    )]
    IndirectResultsExhausted {
        call: InstrLocation,
        expected: usize,
        available: usize,
    },

    #[error("call at {call} passes {found} formal arguments, callee declares {expected} parameters")]
    ArgumentCountMismatch {
        call: InstrLocation,
        expected: usize,
        found: usize,
    },

    #[error("call at {call} enumerated {found} results, callee declares {expected}")]
    ResultCountMismatch {
        call: InstrLocation,
        expected: usize,
        found: usize,
    },

    #[error("call at {call} has no active results")]
    NoActiveResults { call: InstrLocation },

    #[error("function '{function}' does not have exactly one return block")]
    MissingReturn { function: String },

    #[error("function '{function}' returns {found} results where its signature declares {expected}")]
    ReturnArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },
}

pub type AdResult<T> = Result<T, ContractViolation>;
