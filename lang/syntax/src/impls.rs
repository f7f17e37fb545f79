use crate::*;
use std::fmt;
use std::rc::Rc;

impl<T: AsRef<str>> From<T> for VarName {
    fn from(name: T) -> Self {
        VarName(name.as_ref().to_string())
    }
}
impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let VarName(name) = self;
        write!(f, "{}", name)
    }
}

impl AccessPath {
    /// `Sel` with the boxing folded in.
    pub fn sel(idx: i64, rest: AccessPath) -> AccessPath {
        AccessPath::Sel(idx, Rc::new(rest))
    }

    /// Concatenation: following `self` and then `rest` is the same as
    /// following `self.append(rest)`. Leading offsets shift whatever comes
    /// next; selections are untouched.
    pub fn append(&self, rest: &AccessPath) -> AccessPath {
        match (self, rest) {
            | (AccessPath::Off(i), AccessPath::Off(j)) => AccessPath::Off(i + j),
            | (AccessPath::Off(i), AccessPath::Sel(j, p)) => AccessPath::Sel(i + j, p.clone()),
            | (AccessPath::Sel(i, p), rest) => AccessPath::sel(*i, p.append(rest)),
        }
    }
}

impl PrimOp {
    /// The operator's concrete token.
    pub fn token(&self) -> &'static str {
        match self {
            | PrimOp::Mul => "*",
            | PrimOp::Add => "+",
            | PrimOp::Sub => "-",
            | PrimOp::Div => "div",
            | PrimOp::Neg => "~",
            | PrimOp::IEq => "ieql",
            | PrimOp::INe => "ineq",
            | PrimOp::Lt => "<",
            | PrimOp::Le => "<=",
            | PrimOp::Gt => ">",
            | PrimOp::Ge => ">=",
            | PrimOp::RangeChk => "rangechk",
            | PrimOp::Boxed => "boxed",
            | PrimOp::Deref => "!",
            | PrimOp::Subscript => "subscript",
            | PrimOp::OrdOf => "ordof",
            | PrimOp::Assign => ":=",
            | PrimOp::Update => "update",
            | PrimOp::UnboxedAssign => "unboxedassign",
            | PrimOp::UnboxedUpdate => "unboxedupdate",
            | PrimOp::Store => "store",
            | PrimOp::MakeRef => "makeref",
            | PrimOp::MakeRefUnboxed => "makerefunboxed",
            | PrimOp::ALength => "alength",
            | PrimOp::SLength => "slength",
            | PrimOp::GetHdlr => "gethdlr",
            | PrimOp::SetHdlr => "sethdlr",
            | PrimOp::FAdd => "fadd",
            | PrimOp::FSub => "fsub",
            | PrimOp::FMul => "fmul",
            | PrimOp::FDiv => "fdiv",
            | PrimOp::FEq => "feql",
            | PrimOp::FNe => "fneq",
            | PrimOp::FLt => "flt",
            | PrimOp::FLe => "fle",
            | PrimOp::FGt => "fgt",
            | PrimOp::FGe => "fge",
            | PrimOp::RShift => "rshift",
            | PrimOp::LShift => "lshift",
            | PrimOp::OrB => "orb",
            | PrimOp::AndB => "andb",
            | PrimOp::XorB => "xorb",
            | PrimOp::NotB => "notb",
        }
    }
}
impl fmt::Display for PrimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_offsets_add() {
        let p = AccessPath::Off(2).append(&AccessPath::Off(3));
        assert_eq!(p, AccessPath::Off(5));
    }

    #[test]
    fn append_offset_shifts_selection() {
        let p = AccessPath::Off(1).append(&AccessPath::sel(2, AccessPath::Off(0)));
        assert_eq!(p, AccessPath::sel(3, AccessPath::Off(0)));
    }

    #[test]
    fn append_is_associative() {
        let p1 = AccessPath::sel(1, AccessPath::Off(2));
        let p2 = AccessPath::Off(3);
        let p3 = AccessPath::sel(4, AccessPath::Off(0));
        let left = p1.append(&p2).append(&p3);
        let right = p1.append(&p2.append(&p3));
        assert_eq!(left, right);
    }
}
