pub mod fmt;
pub use fmt::*;

mod impls;

use derive_more::From;
use std::rc::Rc;

/* --------------------------------- Binder --------------------------------- */

/// The unique token naming a binder. Two occurrences refer to the same
/// binding iff the names are equal.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarName(pub String);

/* ---------------------------------- Value --------------------------------- */

/// An atomic argument position. `Var` and `Label` both resolve through the
/// environment; the literal forms denote themselves.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Value {
    Var(VarName),
    Label(VarName),
    Int(i64),
    /// The decimal literal, kept as written; decoding is a host concern.
    Real(String),
    String(String),
}

/* ------------------------------- Access path ------------------------------ */

/// A static projection out of a record: rebase the pointer (`Off`) or select
/// a field and keep going (`Sel`).
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum AccessPath {
    Off(i64),
    Sel(i64, Rc<AccessPath>),
}

/* --------------------------------- Primops -------------------------------- */

/// The closed set of built-in operators.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum PrimOp {
    Mul,            // *
    Add,            // +
    Sub,            // -
    Div,            // div
    Neg,            // ~
    IEq,            // ieql
    INe,            // ineq
    Lt,             // <
    Le,             // <=
    Gt,             // >
    Ge,             // >=
    /// Unsigned `0 <= i < j` expressed over signed words.
    RangeChk,       // rangechk
    Boxed,          // boxed
    /// `!a`, the same as `subscript a 0`.
    Deref,          // !
    Subscript,      // subscript
    OrdOf,          // ordof
    /// `a := v`, the same as `update a 0 v`.
    Assign,         // :=
    Update,         // update
    UnboxedAssign,  // unboxedassign
    UnboxedUpdate,  // unboxedupdate
    Store,          // store
    MakeRef,        // makeref
    MakeRefUnboxed, // makerefunboxed
    ALength,        // alength
    SLength,        // slength
    GetHdlr,        // gethdlr
    SetHdlr,        // sethdlr
    FAdd,           // fadd
    FSub,           // fsub
    FMul,           // fmul
    FDiv,           // fdiv
    FEq,            // feql
    FNe,            // fneq
    FLt,            // flt
    FLe,            // fle
    FGt,            // fgt
    FGe,            // fge
    RShift,         // rshift
    LShift,         // lshift
    OrB,            // orb
    AndB,           // andb
    XorB,           // xorb
    NotB,           // notb
}

/* ------------------------ Continuation expressions ------------------------ */

pub type RcCExp = Rc<CExp>;

/// `record [(v, p), ...] w e` — gather the projected fields into a fresh
/// record bound to `w`; the scope of `w` is `tail`.
#[derive(Clone, Debug)]
pub struct Record {
    pub fields: Vec<(Value, AccessPath)>,
    pub binder: VarName,
    pub tail: RcCExp,
}

/// `select i v w e` — bind field `i` of the record `v` to `w` in `tail`.
#[derive(Clone, Debug)]
pub struct Select {
    pub idx: i64,
    pub value: Value,
    pub binder: VarName,
    pub tail: RcCExp,
}

/// `offset i v w e` — rebase the record pointer `v` by `i`, bound to `w` in
/// `tail`.
#[derive(Clone, Debug)]
pub struct Offset {
    pub idx: i64,
    pub value: Value,
    pub binder: VarName,
    pub tail: RcCExp,
}

/// `f(a_1, ..., a_n)` — transfer control; binds nothing and never returns.
#[derive(Clone, Debug)]
pub struct App {
    pub fun: Value,
    pub args: Vec<Value>,
}

/// One member of a mutually recursive function group.
#[derive(Clone, Debug)]
pub struct FnDef {
    pub name: VarName,
    pub params: Vec<VarName>,
    pub body: RcCExp,
}

/// `fix f_1 ... f_n in e` — every `f_i` is in scope in every body and in
/// `tail`; each `f_i`'s parameters scope only over its own body.
#[derive(Clone, Debug)]
pub struct Fix {
    pub defs: Rc<Vec<FnDef>>,
    pub tail: RcCExp,
}

/// `switch v [e_0, ..., e_{n-1}]` — dispatch on an integer scrutinee.
#[derive(Clone, Debug)]
pub struct Switch {
    pub scrut: Value,
    pub arms: Vec<RcCExp>,
}

/// `p(a_1, ...) [w ...] [e_1, ...]` — a primitive operation; the binders
/// scope over every arm.
#[derive(Clone, Debug)]
pub struct Primop {
    pub op: PrimOp,
    pub args: Vec<Value>,
    pub binders: Vec<VarName>,
    pub arms: Vec<RcCExp>,
}

#[derive(From, Clone, Debug)]
pub enum CExp {
    Record(Record),
    Select(Select),
    Offset(Offset),
    App(App),
    Fix(Fix),
    Switch(Switch),
    Primop(Primop),
}
