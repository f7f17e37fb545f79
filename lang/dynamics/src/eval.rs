use crate::{
    env::Env,
    err::{EvalError, Result},
    store::Store,
    syntax::*,
};
use std::rc::Rc;

pub trait Eval: Sized {
    fn step(self, runtime: &mut Runtime) -> Result<Step>;
}

impl Runtime {
    pub fn new(store: Store) -> Self {
        Runtime { store, host: Host::default(), oracle: Oracle::default() }
    }
    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }
    pub fn with_oracle(mut self, oracle: Oracle) -> Self {
        self.oracle = oracle;
        self
    }

    /// Bind `params` to `args` in the empty environment and run `exp` to an
    /// answer. The final store stays on the runtime.
    pub fn eval(&mut self, params: &[VarName], exp: RcCExp, args: Vec<SemValue>) -> Result<Answer> {
        let env = bindn(Env::new(), params, args)?;
        self.run(Step::Eval(exp, env))
    }

    /// The trampoline. Every continuation invocation is one bounce; no host
    /// recursion, so arbitrarily deep programs run in constant Rust stack.
    pub fn run(&mut self, mut step: Step) -> Result<Answer> {
        loop {
            if log::log_enabled!(log::Level::Trace) {
                use crate::fmt::{Formatter, Ugly};
                log::trace!("{}", step.ugly(&Formatter::new(&self.store)));
            }
            step = match step {
                | Step::Done(ans) => return Ok(ans),
                | step => step.step(self)?,
            };
        }
    }

    /// Syntactic value to denotable value.
    pub fn denote(&self, env: &Env, value: &Value) -> Result<SemValue> {
        match value {
            | Value::Var(x) | Value::Label(x) => {
                env.get(x).cloned().ok_or_else(|| EvalError::UnboundVar(x.clone()))
            }
            | Value::Int(i) => Ok(SemValue::Int(*i)),
            | Value::Real(lit) => Ok(SemValue::Real(self.host.string2real(lit)?)),
            | Value::String(s) => Ok(SemValue::String(Rc::from(s.as_str()))),
        }
    }
}

impl Eval for Step {
    fn step(self, runtime: &mut Runtime) -> Result<Step> {
        match self {
            | Step::Eval(exp, env) => (exp, env).step(runtime),
            | Step::Call(fun, args) => (fun, args).step(runtime),
            | Step::Done(ans) => Ok(Step::Done(ans)),
        }
    }
}

impl Eval for (RcCExp, Env) {
    fn step(self, runtime: &mut Runtime) -> Result<Step> {
        let (exp, env) = self;
        match exp.as_ref() {
            | CExp::Record(Record { fields, binder, tail }) => {
                let mut elems = Vec::with_capacity(fields.len());
                for (v, p) in fields {
                    elems.push(resolve(runtime.denote(&env, v)?, p)?);
                }
                let rec = SemValue::Record(RecordVal { elems: Rc::new(elems), off: 0 });
                Ok(Step::Eval(tail.clone(), env + [(binder.clone(), rec)]))
            }
            | CExp::Select(Select { idx, value, binder, tail }) => {
                let SemValue::Record(rec) = runtime.denote(&env, value)? else {
                    return Err(EvalError::NotARecord);
                };
                let elem = rec.get(*idx)?.clone();
                Ok(Step::Eval(tail.clone(), env + [(binder.clone(), elem)]))
            }
            | CExp::Offset(Offset { idx, value, binder, tail }) => {
                let SemValue::Record(rec) = runtime.denote(&env, value)? else {
                    return Err(EvalError::NotARecord);
                };
                let rec = SemValue::Record(rec.rebase(*idx));
                Ok(Step::Eval(tail.clone(), env + [(binder.clone(), rec)]))
            }
            | CExp::App(App { fun, args }) => {
                let SemValue::Fun(fun) = runtime.denote(&env, fun)? else {
                    return Err(EvalError::NotAFunction);
                };
                let args =
                    args.iter().map(|a| runtime.denote(&env, a)).collect::<Result<Vec<_>>>()?;
                Ok(Step::Call(fun, args))
            }
            | CExp::Fix(Fix { defs, tail }) => {
                Ok(Step::Eval(tail.clone(), fix_env(env, defs)))
            }
            | CExp::Switch(Switch { scrut, arms }) => {
                let SemValue::Int(i) = runtime.denote(&env, scrut)? else {
                    return Err(EvalError::SwitchScrutinee);
                };
                let arm = usize::try_from(i)
                    .ok()
                    .and_then(|i| arms.get(i))
                    .ok_or(EvalError::SwitchOutOfRange { got: i, arms: arms.len() })?;
                Ok(Step::Eval(arm.clone(), env))
            }
            | CExp::Primop(Primop { op, args, binders, arms }) => {
                let args =
                    args.iter().map(|a| runtime.denote(&env, a)).collect::<Result<Vec<_>>>()?;
                let konts = arms
                    .iter()
                    .map(|arm| Kont {
                        binders: binders.clone(),
                        body: arm.clone(),
                        env: env.clone(),
                    })
                    .collect();
                runtime.prim(*op, args, konts)
            }
        }
    }
}

impl Eval for (SemFun, Vec<SemValue>) {
    fn step(self, runtime: &mut Runtime) -> Result<Step> {
        let (fun, args) = self;
        match fun {
            | SemFun::Closure(clo) => {
                let def = &clo.defs[clo.idx];
                let env = fix_env(clo.env.clone(), &clo.defs);
                let env = bindn(env, &def.params, args)?;
                Ok(Step::Eval(def.body.clone(), env))
            }
            | SemFun::Prim(prim) => Ok(Step::Done((prim.body)(args, &runtime.store))),
        }
    }
}

impl Kont {
    /// Deliver values to the arm: one binder/argument zip, then evaluation.
    pub fn apply(&self, vals: Vec<SemValue>) -> Result<Step> {
        Ok(Step::Eval(self.body.clone(), bindn(self.env.clone(), &self.binders, vals)?))
    }
}

/// Zip-extend; the name and value lists must line up.
pub(crate) fn bindn(env: Env, names: &[VarName], vals: Vec<SemValue>) -> Result<Env> {
    if names.len() != vals.len() {
        return Err(EvalError::Arity { expected: names.len(), got: vals.len() });
    }
    Ok(env + names.iter().cloned().zip(vals))
}

/// Close every name of a `fix` group over the same shared group. The group
/// is re-entered on every call, never copied half-built.
fn fix_env(env: Env, defs: &Rc<Vec<FnDef>>) -> Env {
    let closures = defs
        .iter()
        .enumerate()
        .map(|(idx, def)| {
            let clo = Closure { defs: defs.clone(), idx, env: env.clone() };
            (def.name.clone(), SemValue::Fun(SemFun::Closure(clo)))
        })
        .collect::<Vec<_>>();
    env + closures
}

/// Chase an access path through record values. Paths are static syntax, so
/// the recursion depth is bounded by the program text.
pub fn resolve(value: SemValue, path: &AccessPath) -> Result<SemValue> {
    match (value, path) {
        | (v, AccessPath::Off(0)) => Ok(v),
        | (SemValue::Record(rec), AccessPath::Off(j)) => Ok(SemValue::Record(rec.rebase(*j))),
        | (SemValue::Record(rec), AccessPath::Sel(j, rest)) => {
            resolve(rec.get(*j)?.clone(), rest)
        }
        | (_, _) => Err(EvalError::NotARecord),
    }
}
