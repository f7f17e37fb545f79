//! The formatter trait.

use crate::*;

#[impl_tools::autoimpl(for<T: trait + ?Sized> &T, &mut T, Box<T>, std::rc::Rc<T>, std::sync::Arc<T>)]
pub trait Ugly<'a, Fmter> {
    fn ugly(&self, f: &'a Fmter) -> String;
}

/// The syntax is fully named, so the formatter carries no state.
pub struct Formatter;

impl<'a> Ugly<'a, Formatter> for VarName {
    fn ugly(&self, _: &'a Formatter) -> String {
        let VarName(name) = self;
        name.clone()
    }
}

impl<'a> Ugly<'a, Formatter> for Value {
    fn ugly(&self, f: &'a Formatter) -> String {
        match self {
            | Value::Var(x) => x.ugly(f),
            | Value::Label(x) => format!("'{}", x.ugly(f)),
            | Value::Int(i) => format!("{}", i),
            | Value::Real(lit) => lit.clone(),
            | Value::String(s) => format!("{:?}", s),
        }
    }
}

impl<'a> Ugly<'a, Formatter> for AccessPath {
    fn ugly(&self, f: &'a Formatter) -> String {
        match self {
            | AccessPath::Off(i) => format!("+{}", i),
            | AccessPath::Sel(i, rest) => format!(".{}{}", i, rest.ugly(f)),
        }
    }
}

impl<'a> Ugly<'a, Formatter> for FnDef {
    fn ugly(&self, f: &'a Formatter) -> String {
        let FnDef { name, params, body } = self;
        let params = params.iter().map(|p| p.ugly(f)).collect::<Vec<_>>().join(", ");
        format!("{}({}) = {}", name.ugly(f), params, body.ugly(f))
    }
}

impl<'a> Ugly<'a, Formatter> for CExp {
    fn ugly(&self, f: &'a Formatter) -> String {
        match self {
            | CExp::Record(Record { fields, binder, tail }) => {
                let fields = fields
                    .iter()
                    .map(|(v, p)| format!("{}{}", v.ugly(f), p.ugly(f)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("record {{{}}} {}; {}", fields, binder.ugly(f), tail.ugly(f))
            }
            | CExp::Select(Select { idx, value, binder, tail }) => {
                format!("select {} {} {}; {}", idx, value.ugly(f), binder.ugly(f), tail.ugly(f))
            }
            | CExp::Offset(Offset { idx, value, binder, tail }) => {
                format!("offset {} {} {}; {}", idx, value.ugly(f), binder.ugly(f), tail.ugly(f))
            }
            | CExp::App(App { fun, args }) => {
                let args = args.iter().map(|a| a.ugly(f)).collect::<Vec<_>>().join(", ");
                format!("{}({})", fun.ugly(f), args)
            }
            | CExp::Fix(Fix { defs, tail }) => {
                let defs = defs.iter().map(|d| d.ugly(f)).collect::<Vec<_>>().join(" and ");
                format!("fix {} in {}", defs, tail.ugly(f))
            }
            | CExp::Switch(Switch { scrut, arms }) => {
                let arms = arms.iter().map(|e| e.ugly(f)).collect::<Vec<_>>().join(" | ");
                format!("switch {} {{ {} }}", scrut.ugly(f), arms)
            }
            | CExp::Primop(Primop { op, args, binders, arms }) => {
                let args = args.iter().map(|a| a.ugly(f)).collect::<Vec<_>>().join(", ");
                let binders =
                    binders.iter().map(|w| w.ugly(f)).collect::<Vec<_>>().join(", ");
                let arms = arms.iter().map(|e| e.ugly(f)).collect::<Vec<_>>().join(" | ");
                format!("{}({}) [{}] {{ {} }}", op.token(), args, binders, arms)
            }
        }
    }
}
