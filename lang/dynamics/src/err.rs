use crate::store::Location;
use juba_syntax::{PrimOp, VarName};
use thiserror::Error;

/// A malformed program. These abort evaluation outright; only `Exn` values
/// flow through the installed handler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unbound variable `{0}`")]
    UnboundVar(VarName),
    #[error("applied a value that is not a function")]
    NotAFunction,
    #[error("field access on a value that is not a record")]
    NotARecord,
    #[error("record projection {0} out of bounds")]
    BadProjection(i64),
    #[error("subscript {0} out of bounds")]
    BadSubscript(i64),
    #[error("switch on a value that is not an integer")]
    SwitchScrutinee,
    #[error("switch index {got} out of range for {arms} arms")]
    SwitchOutOfRange { got: i64, arms: usize },
    #[error("bound {expected} names to {got} values")]
    Arity { expected: usize, got: usize },
    #[error("stored {0}, which does not fit in a byte")]
    ByteRange(i64),
    #[error("fetch from uninitialized location {0}")]
    UninitLocation(Location),
    #[error("cannot decode real literal `{0}`")]
    BadRealLiteral(String),
    #[error("equality on function values is undefined")]
    FunEq,
    #[error("`{0}` applied to ill-typed operands")]
    PrimType(PrimOp),
    #[error("shift count {0} out of range")]
    ShiftRange(i64),
    #[error("installed exception handler is not a function")]
    BadHandler,
}

pub type Result<T> = std::result::Result<T, EvalError>;
