//! The primitive-operator evaluator: one rule per operator, mapping operand
//! values and arm continuations to the next machine state.

use crate::{
    err::{EvalError, Result},
    store::Location,
    syntax::*,
};
use std::rc::Rc;

impl Runtime {
    /// Dispatch a primitive over denotable operands. Single-result operators
    /// take one continuation `c`; branching operators take the pair `[t, f]`
    /// and call the chosen arm with no values.
    pub(crate) fn prim(&mut self, op: PrimOp, args: Vec<SemValue>, konts: Vec<Kont>) -> Result<Step> {
        use PrimOp as P;
        use SemValue as V;
        match (op, args.as_slice(), konts.as_slice()) {
            /* integer arithmetic, gated against the host window */
            | (P::Add, [V::Int(i), V::Int(j)], [c]) => self.overflow(*i as i128 + *j as i128, c),
            | (P::Sub, [V::Int(i), V::Int(j)], [c]) => self.overflow(*i as i128 - *j as i128, c),
            | (P::Mul, [V::Int(i), V::Int(j)], [c]) => self.overflow(*i as i128 * *j as i128, c),
            | (P::Div, [V::Int(_), V::Int(0)], _) => self.raise(Exn::DivZero),
            | (P::Div, [V::Int(i), V::Int(j)], [c]) => self.overflow(*i as i128 / *j as i128, c),
            | (P::Neg, [V::Int(i)], [c]) => self.overflow(-(*i as i128), c),

            /* integer comparison */
            | (P::Lt, [V::Int(i), V::Int(j)], [t, f]) => branch(i < j, t, f),
            | (P::Le, [V::Int(i), V::Int(j)], [t, f]) => branch(i <= j, t, f),
            | (P::Gt, [V::Int(i), V::Int(j)], [t, f]) => branch(i > j, t, f),
            | (P::Ge, [V::Int(i), V::Int(j)], [t, f]) => branch(i >= j, t, f),
            | (P::IEq, [a, b], [t, f]) => branch(self.sem_eq(a, b)?, t, f),
            | (P::INe, [a, b], [t, f]) => branch(!self.sem_eq(a, b)?, t, f),
            | (P::RangeChk, [V::Int(i), V::Int(j)], [t, f]) => {
                // unsigned i < unsigned j, phrased over signed words
                let hit = if *j < 0 {
                    if *i < 0 {
                        i < j
                    } else {
                        true
                    }
                } else if *i < 0 {
                    false
                } else {
                    i < j
                };
                branch(hit, t, f)
            }

            /* representation test */
            | (P::Boxed, [V::Int(_)], [_t, f]) => f.apply(vec![]),
            | (P::Boxed, [_], [t, _f]) => t.apply(vec![]),

            /* dereference and subscript */
            | (P::Deref, [a], [c]) => {
                self.prim(P::Subscript, vec![a.clone(), V::Int(0)], vec![c.clone()])
            }
            | (P::Subscript, [V::Record(rec), V::Int(j)], [c]) => {
                c.apply(vec![rec.get(*j)?.clone()])
            }
            | (P::Subscript, [V::Array(Arr(cells)), V::Int(n)], [c]) => {
                let l = cell(cells, *n)?;
                c.apply(vec![self.store.fetch(l)?.clone()])
            }
            | (P::Subscript, [V::UnboxedArray(UnboxedArr(cells)), V::Int(n)], [c]) => {
                let l = cell(cells, *n)?;
                c.apply(vec![V::Int(self.store.fetchi(l)?)])
            }
            | (P::OrdOf, [V::String(s), V::Int(i)], [c]) => {
                let b = usize::try_from(*i)
                    .ok()
                    .and_then(|i| s.as_bytes().get(i))
                    .ok_or(EvalError::BadSubscript(*i))?;
                c.apply(vec![V::Int(*b as i64)])
            }
            | (P::OrdOf, [V::ByteArray(ByteArr(cells)), V::Int(i)], [c]) => {
                let l = cell(cells, *i)?;
                c.apply(vec![V::Int(self.store.fetchi(l)?)])
            }

            /* assignment and update */
            | (P::Assign, [a, v], [c]) => {
                self.prim(P::Update, vec![a.clone(), V::Int(0), v.clone()], vec![c.clone()])
            }
            | (P::UnboxedAssign, [a, v], [c]) => {
                self.prim(P::UnboxedUpdate, vec![a.clone(), V::Int(0), v.clone()], vec![c.clone()])
            }
            | (P::Update, [V::Array(Arr(cells)), V::Int(n), v], [c]) => {
                let l = cell(cells, *n)?;
                self.store = self.store.upd(l, v.clone());
                c.apply(vec![])
            }
            | (P::Update, [V::UnboxedArray(UnboxedArr(cells)), V::Int(n), V::Int(v)], [c]) => {
                let l = cell(cells, *n)?;
                self.store = self.store.updi(l, *v);
                c.apply(vec![])
            }
            | (P::UnboxedUpdate, [V::Array(Arr(cells)), V::Int(n), V::Int(v)], [c]) => {
                let l = cell(cells, *n)?;
                self.store = self.store.upd(l, V::Int(*v));
                c.apply(vec![])
            }
            | (P::UnboxedUpdate, [V::UnboxedArray(UnboxedArr(cells)), V::Int(n), V::Int(v)], [c]) => {
                let l = cell(cells, *n)?;
                self.store = self.store.updi(l, *v);
                c.apply(vec![])
            }
            | (P::Store, [V::ByteArray(ByteArr(cells)), V::Int(i), V::Int(v)], [c]) => {
                if *v < 0 || *v >= 256 {
                    return Err(EvalError::ByteRange(*v));
                }
                let l = cell(cells, *i)?;
                self.store = self.store.updi(l, *v);
                c.apply(vec![])
            }

            /* allocation */
            | (P::MakeRef, [v], [c]) => {
                let (l, store) = self.store.alloc();
                self.store = store.upd(l, v.clone());
                c.apply(vec![V::Array(Arr(Rc::new(vec![l])))])
            }
            | (P::MakeRefUnboxed, [V::Int(v)], [c]) => {
                let (l, store) = self.store.alloc();
                self.store = store.updi(l, *v);
                c.apply(vec![V::UnboxedArray(UnboxedArr(Rc::new(vec![l])))])
            }

            /* lengths */
            | (P::ALength, [V::Array(Arr(cells))], [c])
            | (P::ALength, [V::UnboxedArray(UnboxedArr(cells))], [c]) => {
                c.apply(vec![V::Int(cells.len() as i64)])
            }
            | (P::SLength, [V::ByteArray(ByteArr(cells))], [c]) => {
                c.apply(vec![V::Int(cells.len() as i64)])
            }
            | (P::SLength, [V::String(s)], [c]) => c.apply(vec![V::Int(s.len() as i64)]),

            /* exception handler */
            | (P::GetHdlr, [], [c]) => {
                let h = self.store.fetch(self.store.hdlr())?.clone();
                c.apply(vec![h])
            }
            | (P::SetHdlr, [h], [c]) => {
                self.store = self.store.upd(self.store.hdlr(), h.clone());
                c.apply(vec![])
            }

            /* real arithmetic, gated like the integers */
            | (P::FAdd, [V::Real(a), V::Real(b)], [c]) => self.overflowr(a + b, c),
            | (P::FSub, [V::Real(a), V::Real(b)], [c]) => self.overflowr(a - b, c),
            | (P::FMul, [V::Real(a), V::Real(b)], [c]) => self.overflowr(a * b, c),
            | (P::FDiv, [V::Real(_), V::Real(b)], _) if *b == 0.0 => self.raise(Exn::DivZero),
            | (P::FDiv, [V::Real(a), V::Real(b)], [c]) => self.overflowr(a / b, c),

            /* real comparison; equality consults the oracle */
            | (P::FEq, [V::Real(a), V::Real(b)], [t, f]) => {
                branch(self.oracle.arbitrarily(a == b, false), t, f)
            }
            | (P::FNe, [V::Real(a), V::Real(b)], [t, f]) => {
                branch(!self.oracle.arbitrarily(a == b, false), t, f)
            }
            | (P::FLt, [V::Real(a), V::Real(b)], [t, f]) => branch(a < b, t, f),
            | (P::FLe, [V::Real(a), V::Real(b)], [t, f]) => branch(a <= b, t, f),
            | (P::FGt, [V::Real(a), V::Real(b)], [t, f]) => branch(a > b, t, f),
            | (P::FGe, [V::Real(a), V::Real(b)], [t, f]) => branch(a >= b, t, f),

            /* word operations; no overflow gating */
            | (P::RShift, [V::Int(i), V::Int(j)], [c]) => c.apply(vec![V::Int(i >> shift(*j)?)]),
            | (P::LShift, [V::Int(i), V::Int(j)], [c]) => c.apply(vec![V::Int(i << shift(*j)?)]),
            | (P::OrB, [V::Int(i), V::Int(j)], [c]) => c.apply(vec![V::Int(i | j)]),
            | (P::AndB, [V::Int(i), V::Int(j)], [c]) => c.apply(vec![V::Int(i & j)]),
            | (P::XorB, [V::Int(i), V::Int(j)], [c]) => c.apply(vec![V::Int(i ^ j)]),
            | (P::NotB, [V::Int(i)], [c]) => c.apply(vec![V::Int(!i)]),

            | (op, _, _) => Err(EvalError::PrimType(op)),
        }
    }

    /// Gate an exact integer result against the host window; out-of-window
    /// results go to the handler instead of the continuation.
    fn overflow(&mut self, n: i128, c: &Kont) -> Result<Step> {
        if n < self.host.minint as i128 || n > self.host.maxint as i128 {
            self.raise(Exn::Overflow)
        } else {
            c.apply(vec![SemValue::Int(n as i64)])
        }
    }

    /// Gate a real result; non-finite counts as out of the window.
    fn overflowr(&mut self, r: f64, c: &Kont) -> Result<Step> {
        if !r.is_finite() || r < self.host.minreal || r > self.host.maxreal {
            self.raise(Exn::Overflow)
        } else {
            c.apply(vec![SemValue::Real(r)])
        }
    }

    /// Deliver an exception to the installed handler with the current store.
    pub fn raise(&mut self, exn: Exn) -> Result<Step> {
        let SemValue::Fun(hdlr) = self.store.fetch(self.store.hdlr())?.clone() else {
            return Err(EvalError::BadHandler);
        };
        Ok(Step::Call(hdlr, vec![SemValue::Exn(exn)]))
    }

    /// Equality over denotable values. Identity-dependent cases go through
    /// the oracle; function equality is undefined.
    pub fn sem_eq(&self, lhs: &SemValue, rhs: &SemValue) -> Result<bool> {
        use SemValue as V;
        match (lhs, rhs) {
            | (V::Int(a), V::Int(b)) => Ok(a == b),
            | (V::Real(a), V::Real(b)) => Ok(self.oracle.arbitrarily(a == b, false)),
            | (V::String(a), V::String(b)) => Ok(self.oracle.arbitrarily(a == b, false)),
            | (V::ByteArray(ByteArr(a)), V::ByteArray(ByteArr(b)))
            | (V::Array(Arr(a)), V::Array(Arr(b)))
            | (V::UnboxedArray(UnboxedArr(a)), V::UnboxedArray(UnboxedArr(b))) => {
                if a.is_empty() && b.is_empty() {
                    Ok(true)
                } else {
                    Ok(self.oracle.arbitrarily(a == b, false))
                }
            }
            | (V::Record(a), V::Record(b)) => {
                let mut eq = a.off == b.off && a.elems.len() == b.elems.len();
                if eq {
                    for (x, y) in a.elems.iter().zip(b.elems.iter()) {
                        eq = self.sem_eq(x, y)?;
                        if !eq {
                            break;
                        }
                    }
                }
                Ok(self.oracle.arbitrarily(eq, false))
            }
            | (V::Exn(a), V::Exn(b)) => Ok(a == b),
            | (V::Fun(_), V::Fun(_)) => Err(EvalError::FunEq),
            | (_, _) => Ok(false),
        }
    }
}

/// Pick a branch continuation; both are called with no values.
fn branch(hit: bool, t: &Kont, f: &Kont) -> Result<Step> {
    if hit {
        t.apply(vec![])
    } else {
        f.apply(vec![])
    }
}

/// The cell behind index `n` of an array.
fn cell(cells: &Rc<Vec<Location>>, n: i64) -> Result<Location> {
    usize::try_from(n)
        .ok()
        .and_then(|n| cells.get(n).copied())
        .ok_or(EvalError::BadSubscript(n))
}

/// Word shifts only make sense by less than the word size.
fn shift(j: i64) -> Result<u32> {
    if (0..64).contains(&j) {
        Ok(j as u32)
    } else {
        Err(EvalError::ShiftRange(j))
    }
}
