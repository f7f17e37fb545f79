//! The simulated heap: two planes of cells plus the handler cell, threaded
//! value-wise through evaluation. Every update yields a fresh logical
//! version; nothing is ever deallocated.

use crate::{
    err::{EvalError, Result},
    syntax::{Arr, ByteArr, SemValue, UnboxedArr},
};
use std::fmt;
use std::rc::Rc;

/* -------------------------------- Location -------------------------------- */

/// An abstract heap address. Allocation only ever moves forward.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location(pub usize);

impl Location {
    pub fn next(self) -> Location {
        let Location(n) = self;
        Location(n + 1)
    }
}
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Location(n) = self;
        write!(f, "@{}", n)
    }
}

/* ---------------------------------- Store --------------------------------- */

/// Next free location, the two cell planes, and the handler cell. The
/// handler cell is allocated by the constructor and fixed for the run.
#[derive(Clone, Debug)]
pub struct Store {
    next: Location,
    values: im::HashMap<Location, SemValue>,
    ints: im::HashMap<Location, i64>,
    hdlr: Location,
}

impl Store {
    /// A fresh store with `handler` installed in the handler cell.
    pub fn new(handler: SemValue) -> Store {
        let hdlr = Location(0);
        Store {
            next: hdlr.next(),
            values: im::HashMap::unit(hdlr, handler),
            ints: im::HashMap::new(),
            hdlr,
        }
    }

    /// The handler cell.
    pub fn hdlr(&self) -> Location {
        self.hdlr
    }

    /// The next location `alloc` will hand out.
    pub fn next_free(&self) -> Location {
        self.next
    }

    /// The value-plane cell at `l`. Reading a cell that was never written is
    /// a malformed program.
    pub fn fetch(&self, l: Location) -> Result<&SemValue> {
        self.values.get(&l).ok_or(EvalError::UninitLocation(l))
    }

    /// The integer-plane cell at `l`.
    pub fn fetchi(&self, l: Location) -> Result<i64> {
        self.ints.get(&l).copied().ok_or(EvalError::UninitLocation(l))
    }

    /// A version with the value-plane cell at `l` replaced.
    pub fn upd(&self, l: Location, v: SemValue) -> Store {
        Store { values: self.values.update(l, v), ..self.clone() }
    }

    /// A version with the integer-plane cell at `l` replaced.
    pub fn updi(&self, l: Location, i: i64) -> Store {
        Store { ints: self.ints.update(l, i), ..self.clone() }
    }

    /// Hand out the next free location. No cell is written; both planes see
    /// the location as uninitialized until an update.
    pub fn alloc(&self) -> (Location, Store) {
        (self.next, Store { next: self.next.next(), ..self.clone() })
    }
}

/* ------------------------------ Heap builders ----------------------------- */

/// Host-side seeding: the language itself allocates only through `makeref`,
/// so the containing harness uses these to lay out arrays.
impl Store {
    /// A block of consecutive value-plane cells, returned as an array value.
    pub fn alloc_array(&self, vals: Vec<SemValue>) -> (SemValue, Store) {
        let mut store = self.clone();
        let mut cells = Vec::with_capacity(vals.len());
        for v in vals {
            let (l, s) = store.alloc();
            store = s.upd(l, v);
            cells.push(l);
        }
        (SemValue::Array(Arr(Rc::new(cells))), store)
    }

    /// A block of consecutive integer-plane cells, as an unboxed array.
    pub fn alloc_unboxed_array(&self, vals: Vec<i64>) -> (SemValue, Store) {
        let mut store = self.clone();
        let mut cells = Vec::with_capacity(vals.len());
        for i in vals {
            let (l, s) = store.alloc();
            store = s.updi(l, i);
            cells.push(l);
        }
        (SemValue::UnboxedArray(UnboxedArr(Rc::new(cells))), store)
    }

    /// A block of byte cells in the integer plane, as a byte array.
    pub fn alloc_byte_array(&self, bytes: &[u8]) -> (SemValue, Store) {
        let mut store = self.clone();
        let mut cells = Vec::with_capacity(bytes.len());
        for b in bytes {
            let (l, s) = store.alloc();
            store = s.updi(l, *b as i64);
            cells.push(l);
        }
        (SemValue::ByteArray(ByteArr(Rc::new(cells))), store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> Store {
        // any value works as a handler placeholder here
        Store::new(SemValue::Int(0))
    }

    #[test]
    fn allocation_is_monotonic() {
        let s0 = store();
        let (l1, s1) = s0.alloc();
        let (l2, s2) = s1.alloc();
        assert_eq!(l1.next(), l2);
        assert_eq!(s1.next_free(), l1.next());
        assert_eq!(s2.next_free(), l2.next());
        assert!(l2 > l1);
    }

    #[test]
    fn allocation_leaves_cells_untouched() {
        let s0 = store();
        let (l, s1) = s0.alloc();
        let s2 = s1.upd(l, SemValue::Int(7));
        let (_, s3) = s2.alloc();
        assert!(matches!(s3.fetch(l), Ok(SemValue::Int(7))));
    }

    #[test]
    fn planes_are_independent() {
        let s0 = store();
        let (l, s1) = s0.alloc();
        let s2 = s1.upd(l, SemValue::Int(1)).updi(l, 2);
        assert!(matches!(s2.fetch(l), Ok(SemValue::Int(1))));
        assert_eq!(s2.fetchi(l), Ok(2));
    }

    #[test]
    fn updates_do_not_disturb_older_versions() {
        let s0 = store();
        let (l, s1) = s0.alloc();
        let s2 = s1.upd(l, SemValue::Int(1));
        let s3 = s2.upd(l, SemValue::Int(2));
        assert!(matches!(s2.fetch(l), Ok(SemValue::Int(1))));
        assert!(matches!(s3.fetch(l), Ok(SemValue::Int(2))));
    }

    #[test]
    fn uninitialized_fetch_is_an_error() {
        let s = store();
        assert_eq!(s.fetch(Location(99)).unwrap_err(), EvalError::UninitLocation(Location(99)));
        assert_eq!(s.fetchi(Location(0)).unwrap_err(), EvalError::UninitLocation(Location(0)));
    }

    #[test]
    fn byte_array_builder_fills_the_integer_plane() {
        let s = store();
        let (arr, s) = s.alloc_byte_array(b"hi");
        let SemValue::ByteArray(ByteArr(cells)) = arr else { panic!("not a byte array") };
        assert_eq!(cells.len(), 2);
        assert_eq!(s.fetchi(cells[0]), Ok(b'h' as i64));
        assert_eq!(s.fetchi(cells[1]), Ok(b'i' as i64));
    }
}
