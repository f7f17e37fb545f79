#![doc = include_str!("README.md")]

/// Runtime syntax: denotable values, continuations, machine states.
pub mod syntax;
pub use syntax::{Answer, Exn, Host, Oracle, Runtime, SemFun, SemValue, Step};
/// Variable environments.
pub mod env;
pub use env::Env;
/// The simulated heap.
pub mod store;
pub use store::{Location, Store};
/// Host continuations for seeding toplevel environments.
pub mod builtin;
/// Evaluation errors.
pub mod err;
pub use err::{EvalError, Result};
/// Trampolined evaluator for continuation expressions.
pub mod eval;
pub use eval::*;
/// Primitive operator evaluation.
mod prim;
/// Formatting for runtime values and machine states.
pub mod fmt;
