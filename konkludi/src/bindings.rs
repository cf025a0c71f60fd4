//! Variable bindings as a persistent chain of plies.

use crate::ply::Ply;
use crate::{equal, Value, Variable};
use core::fmt::{self, Display};
use fnv::FnvHashSet;
use std::rc::Rc;

/// The head of a chain of [`Ply`] frames.
///
/// Bindings are persistent: [`bind`](Self::bind) allocates one new ply
/// and shares the rest of the chain, so old heads stay valid and
/// cloning is constant-time.
///
/// ~~~
/// # use konkludi::{Bindings, Scope, Value};
/// let s = Scope::new();
/// let (x, y) = (s.lookup("x"), s.lookup("y"));
///
/// let b = Bindings::new();
/// let b = b.bind(&x, y.clone()).unwrap();
/// assert_eq!(b.get(&x), None); // equated, but no value yet
///
/// let b = b.bind(&y, 4i32).unwrap();
/// assert_eq!(b.get(&x), Some(Value::I32(4)));
/// assert!(b.bind(&x, 5i32).is_none()); // contradiction
/// ~~~
#[derive(Clone, Debug, Default)]
pub struct Bindings(Option<Rc<Ply>>);

impl Bindings {
    /// The empty bindings: no variable is known.
    pub fn new() -> Self {
        Default::default()
    }

    fn plies(&self) -> Plies {
        Plies(self.0.as_ref())
    }

    /// The value of `v`, if it has one.
    ///
    /// Walks the chain from the head; the first ply containing `v`
    /// decides. A variable that is equated to others but not yet to a
    /// value has no value.
    pub fn get(&self, v: &Variable) -> Option<Value> {
        for ply in self.plies() {
            if ply.has(v) {
                return ply.value().cloned();
            }
        }
        None
    }

    /// Associate `v` with `other`, which is either a value or another
    /// variable. Returns the extended bindings, or `None` if the new
    /// association contradicts an existing value.
    ///
    /// There is no occurs check: equating a variable with itself is
    /// harmless, and lookup always stops at the first ply containing
    /// the variable.
    pub fn bind(&self, v: &Variable, other: impl Into<Value>) -> Option<Self> {
        let mut variables = FnvHashSet::default();
        variables.insert(v.clone());
        let mut value = match other.into() {
            Value::Var(w) => {
                variables.insert(w);
                None
            }
            val => Some(val),
        };

        // Collect everything already equated to the new set. Each ply
        // sharing a variable contributes its variables, and its value
        // must agree with the one collected so far.
        for ply in self.plies() {
            if !ply.has_any(&variables) {
                continue;
            }
            for w in ply.variables() {
                variables.insert(w.clone());
            }
            if let Some(pv) = ply.value() {
                if let Some(cur) = &value {
                    match equal(pv, cur) {
                        Ok(true) => (),
                        Ok(false) => return None,
                        Err(e) => {
                            warn!("bind of {}: {}", v, e);
                            return None;
                        }
                    }
                }
                value = Some(pv.clone());
            }
        }

        Some(Self(Some(Ply::new(variables, value, self.0.clone()))))
    }

    /// Merge the associations of `self` and `other` into `base`.
    ///
    /// Every ply of both chains is replayed against `base`: variables
    /// with a value are bound to it, valueless plies have their
    /// variables chained together. `None` on any contradiction.
    pub fn merge(&self, other: &Self, base: &Self) -> Option<Self> {
        let mut merged = base.clone();
        for chain in [self, other].iter() {
            for ply in chain.plies() {
                if let Some(val) = ply.value() {
                    for v in ply.variables() {
                        merged = merged.bind(v, val.clone())?;
                    }
                } else if let Some((first, rest)) = ply.variables().split_first() {
                    for v in rest {
                        merged = merged.bind(first, v.clone())?;
                    }
                }
            }
        }
        Some(merged)
    }
}

struct Plies<'a>(Option<&'a Rc<Ply>>);

impl<'a> Iterator for Plies<'a> {
    type Item = &'a Ply;

    fn next(&mut self) -> Option<Self::Item> {
        let ply = self.0?;
        self.0 = ply.previous();
        Some(ply)
    }
}

impl Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, ply) in self.plies().enumerate() {
            write!(f, "{:2}:", i)?;
            for v in ply.variables() {
                write!(f, " {}", v)?;
            }
            match ply.value() {
                Some(val) => writeln!(f, " = {}", val)?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}
