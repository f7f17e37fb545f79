use crate::syntax::SemValue;
use derive_more::{Deref, DerefMut, From, Into};
use juba_syntax::VarName;
use std::ops::{Add, AddAssign};

/// Bindings of variables to denotable values. Extension produces a new
/// environment; the persistent map keeps it cheap.
#[derive(Clone, Debug, From, Into, Deref, DerefMut)]
pub struct Env(im::HashMap<VarName, SemValue>);

impl Env {
    pub fn new() -> Self {
        Self(im::HashMap::new())
    }
}
impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl<Iter> Add<Iter> for Env
where
    Iter: IntoIterator<Item = (VarName, SemValue)>,
{
    type Output = Self;
    fn add(self, iter: Iter) -> Self {
        let Env(mut defs) = self;
        for (x, v) in iter {
            defs.insert(x, v);
        }
        Self(defs)
    }
}
impl<Iter> AddAssign<Iter> for Env
where
    Iter: IntoIterator<Item = (VarName, SemValue)>,
{
    fn add_assign(&mut self, iter: Iter) {
        for (x, v) in iter {
            self.0.insert(x, v);
        }
    }
}

impl FromIterator<(VarName, SemValue)> for Env {
    fn from_iter<I: IntoIterator<Item = (VarName, SemValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> VarName {
        VarName::from("x")
    }

    #[test]
    fn later_bindings_shadow() {
        let env = Env::new() + [(x(), SemValue::Int(1))] + [(x(), SemValue::Int(2))];
        assert!(matches!(env.get(&x()), Some(SemValue::Int(2))));
    }

    #[test]
    fn other_bindings_survive_extension() {
        let y = VarName::from("y");
        let env = Env::new() + [(x(), SemValue::Int(1))];
        let extended = env.clone() + [(y.clone(), SemValue::Int(2))];
        assert!(matches!(extended.get(&x()), Some(SemValue::Int(1))));
        assert!(matches!(extended.get(&y), Some(SemValue::Int(2))));
        // the parent is untouched
        assert!(env.get(&y).is_none());
    }
}
