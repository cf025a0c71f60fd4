//! Immutable frames of a binding chain.

use crate::{Value, Variable};
use fnv::FnvHashSet;
use std::rc::Rc;

/// One frame in a binding chain: a set of mutually equated variables,
/// optionally the value they are bound to, and the previous frame.
/// Never modified once constructed; chains share tails.
#[derive(Debug)]
pub struct Ply {
    variables: Vec<Variable>,
    value: Option<Value>,
    previous: Option<Rc<Ply>>,
}

impl Ply {
    pub(crate) fn new(
        variables: FnvHashSet<Variable>,
        value: Option<Value>,
        previous: Option<Rc<Ply>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            variables: variables.into_iter().collect(),
            value,
            previous,
        })
    }

    pub fn has(&self, v: &Variable) -> bool {
        self.variables.iter().any(|w| w.same_as(v))
    }

    pub fn has_any(&self, set: &FnvHashSet<Variable>) -> bool {
        self.variables.iter().any(|w| set.contains(w))
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn previous(&self) -> Option<&Rc<Ply>> {
        self.previous.as_ref()
    }
}
