pub use juba_syntax::*;

use crate::{
    env::Env,
    err::{EvalError, Result},
    store::{Location, Store},
};
use derive_more::From;
use std::rc::Rc;

/* ------------------------------- Exceptions ------------------------------- */

/// Exceptions the machine itself can deliver to the installed handler.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Exn {
    Overflow,
    DivZero,
}

/* ----------------------------- Denotable values --------------------------- */

/// A record pointer: shared elements viewed from a base offset.
#[derive(Clone, Debug)]
pub struct RecordVal {
    pub elems: Rc<Vec<SemValue>>,
    pub off: i64,
}

impl RecordVal {
    /// The field at `idx` relative to the current base.
    pub fn get(&self, idx: i64) -> Result<&SemValue> {
        usize::try_from(self.off + idx)
            .ok()
            .and_then(|i| self.elems.get(i))
            .ok_or(EvalError::BadProjection(idx))
    }
    /// The same elements viewed from a shifted base.
    pub fn rebase(&self, idx: i64) -> RecordVal {
        RecordVal { elems: self.elems.clone(), off: self.off + idx }
    }
}

/// A mutable string: a block of byte cells in the integer plane.
#[derive(Clone, Debug)]
pub struct ByteArr(pub Rc<Vec<Location>>);

/// A boxed array: its cells live in the value plane.
#[derive(Clone, Debug)]
pub struct Arr(pub Rc<Vec<Location>>);

/// An integer array: its cells live in the integer plane.
#[derive(Clone, Debug)]
pub struct UnboxedArr(pub Rc<Vec<Location>>);

/// A value a variable can denote at runtime.
#[derive(From, Clone, Debug)]
pub enum SemValue {
    Record(RecordVal),
    Int(i64),
    Real(f64),
    String(Rc<str>),
    ByteArray(ByteArr),
    Array(Arr),
    UnboxedArray(UnboxedArr),
    Fun(SemFun),
    Exn(Exn),
}

/* --------------------------- Function denotations ------------------------- */

/// One member of a `fix` group, closed over the environment outside the
/// group. Applying it re-enters the whole group, so in-group calls always
/// resolve to these very definitions.
#[derive(Clone)]
pub struct Closure {
    pub defs: Rc<Vec<FnDef>>,
    pub idx: usize,
    pub env: Env,
}

/// A host continuation; how toplevel continuations enter the value space.
/// The body sees the final argument values and the store at the moment of
/// the call.
#[derive(Clone)]
pub struct PrimFun {
    pub name: &'static str,
    pub body: Rc<dyn Fn(Vec<SemValue>, &Store) -> Answer>,
}

#[derive(From, Clone)]
pub enum SemFun {
    Closure(Closure),
    Prim(PrimFun),
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Closure({})", self.defs[self.idx].name)
    }
}
impl std::fmt::Debug for PrimFun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Prim({})", self.name)
    }
}
impl std::fmt::Debug for SemFun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | SemFun::Closure(clo) => std::fmt::Debug::fmt(clo, f),
            | SemFun::Prim(prim) => std::fmt::Debug::fmt(prim, f),
        }
    }
}

/* ------------------------------ Continuations ----------------------------- */

/// A primop arm, one binder/argument zip away from evaluation.
#[derive(Clone, Debug)]
pub struct Kont {
    pub binders: Vec<VarName>,
    pub body: RcCExp,
    pub env: Env,
}

/* --------------------------------- Answer --------------------------------- */

/// The terminal result of a run. Produced only by host continuations; the
/// machine passes it through without inspection.
#[derive(Clone, Debug)]
pub struct Answer(pub Vec<SemValue>);

/* ---------------------------------- Host ---------------------------------- */

/// Numeric limits of the simulated machine and the real-literal decoder.
#[derive(Clone, Debug)]
pub struct Host {
    pub minint: i64,
    pub maxint: i64,
    pub minreal: f64,
    pub maxreal: f64,
}

impl Default for Host {
    fn default() -> Self {
        Host { minint: i64::MIN, maxint: i64::MAX, minreal: f64::MIN, maxreal: f64::MAX }
    }
}

impl Host {
    /// Decode a decimal literal as carried by the syntax.
    pub fn string2real(&self, lit: &str) -> Result<f64> {
        lit.parse().map_err(|_| EvalError::BadRealLiteral(lit.to_string()))
    }
}

/* --------------------------------- Oracle --------------------------------- */

/// Arbiter for equality tests that depend on pointer identity. Both answers
/// are deterministic so tests can pin either behavior.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Oracle {
    /// Answer with structural equality.
    #[default]
    Left,
    /// Claim distinct allocations regardless of structure.
    Right,
}

impl Oracle {
    pub fn arbitrarily(&self, a: bool, b: bool) -> bool {
        match self {
            | Oracle::Left => a,
            | Oracle::Right => b,
        }
    }
}

/* --------------------------------- Machine -------------------------------- */

/// One bounce of the trampoline.
#[derive(Clone, Debug)]
pub enum Step {
    Eval(RcCExp, Env),
    Call(SemFun, Vec<SemValue>),
    Done(Answer),
}

/// Evaluator state: the current store version plus host parameters. The
/// store outlives a run, so callers can inspect the heap afterwards.
pub struct Runtime {
    pub store: Store,
    pub host: Host,
    pub oracle: Oracle,
}
