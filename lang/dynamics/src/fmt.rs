use crate::store::Store;
use crate::syntax::*;

pub use juba_syntax::Ugly;

/// Renders runtime values; borrows the store so heap objects can show the
/// contents of their cells.
pub struct Formatter<'a> {
    store: &'a Store,
}
impl<'a> Formatter<'a> {
    pub fn new(store: &'a Store) -> Self {
        Formatter { store }
    }
}

impl<'a> Formatter<'a> {
    fn cells(&self, cells: &[crate::store::Location], unboxed: bool) -> String {
        cells
            .iter()
            .map(|l| {
                if unboxed {
                    match self.store.fetchi(*l) {
                        | Ok(i) => format!("{}", i),
                        | Err(_) => "?".to_string(),
                    }
                } else {
                    match self.store.fetch(*l) {
                        | Ok(v) => v.ugly(self),
                        | Err(_) => "?".to_string(),
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for SemValue {
    fn ugly(&self, f: &'a Formatter) -> String {
        match self {
            | SemValue::Record(rec) => rec.ugly(f),
            | SemValue::Int(i) => format!("{}", i),
            | SemValue::Real(r) => format!("{}", r),
            | SemValue::String(s) => format!("{:?}", s),
            | SemValue::ByteArray(ByteArr(cells)) => format!("bytes[{}]", f.cells(cells, true)),
            | SemValue::Array(Arr(cells)) => format!("array[{}]", f.cells(cells, false)),
            | SemValue::UnboxedArray(UnboxedArr(cells)) => {
                format!("uarray[{}]", f.cells(cells, true))
            }
            | SemValue::Fun(fun) => fun.ugly(f),
            | SemValue::Exn(exn) => exn.ugly(f),
        }
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for RecordVal {
    fn ugly(&self, f: &'a Formatter) -> String {
        let elems = self.elems.iter().map(|v| v.ugly(f)).collect::<Vec<_>>().join(", ");
        format!("{{{}}}+{}", elems, self.off)
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for SemFun {
    fn ugly(&self, _: &'a Formatter) -> String {
        match self {
            | SemFun::Closure(clo) => format!("fn {}", clo.defs[clo.idx].name),
            | SemFun::Prim(prim) => format!("prim {}", prim.name),
        }
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for Exn {
    fn ugly(&self, _: &'a Formatter) -> String {
        match self {
            | Exn::Overflow => "exn overflow".to_string(),
            | Exn::DivZero => "exn div".to_string(),
        }
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for Answer {
    fn ugly(&self, f: &'a Formatter) -> String {
        let Answer(vals) = self;
        let vals = vals.iter().map(|v| v.ugly(f)).collect::<Vec<_>>().join(", ");
        format!("answer({})", vals)
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for Step {
    fn ugly(&self, f: &'a Formatter) -> String {
        match self {
            | Step::Eval(exp, _env) => {
                format!("|> {}", exp.ugly(&juba_syntax::Formatter))
            }
            | Step::Call(fun, args) => {
                let args = args.iter().map(|v| v.ugly(f)).collect::<Vec<_>>().join(", ");
                format!("=> {}({})", fun.ugly(f), args)
            }
            | Step::Done(ans) => format!("<| {}", ans.ugly(f)),
        }
    }
}
