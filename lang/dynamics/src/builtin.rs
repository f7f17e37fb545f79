//! Host continuations for seeding toplevel environments. Programs end by
//! tail-calling one of these; nothing in the language can observe an
//! `Answer` once it is produced.

use crate::syntax::{Answer, PrimFun, SemFun, SemValue};
use std::rc::Rc;

/// The canonical toplevel continuation: package the delivered values as the
/// final answer.
pub fn halt() -> SemValue {
    SemValue::Fun(SemFun::Prim(PrimFun {
        name: "halt",
        body: Rc::new(|args, _| Answer(args)),
    }))
}

/// Like [`halt`], but prefix a tag so a harness wiring several exits can
/// tell which one fired.
pub fn tagged(tag: i64) -> SemValue {
    SemValue::Fun(SemFun::Prim(PrimFun {
        name: "tagged",
        body: Rc::new(move |mut args, _| {
            args.insert(0, SemValue::Int(tag));
            Answer(args)
        }),
    }))
}
