//! Structural patterns over record types.

use crate::{unify, Bindings, RecordType, Value, Variable};
use core::fmt::{self, Display};
use std::rc::Rc;

/// A pattern that tests some fields of a record while extracting
/// others into variables.
///
/// Each matcher is a literal to test against or a variable to bind;
/// the optional self variable is bound to the matched record itself.
/// Fields without a matcher are not constrained.
///
/// ~~~
/// # use konkludi::{unify, Bindings, Query, RecordType, Scope, Value};
/// let ty = RecordType::new("Point", vec!["x", "y"]);
/// let s = Scope::new();
/// let v = s.lookup("v");
///
/// let q = Query::new(&ty, None, vec![("x", Value::from(1i32)), ("y", v.clone().into())]);
/// let p = ty.make(vec![Value::from(1i32), Value::from(2i32)]);
/// let b = unify(&q.into(), &p, &Bindings::new()).unwrap();
/// assert_eq!(b.get(&v), Some(Value::I32(2)));
/// ~~~
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    ty: Rc<RecordType>,
    itself: Option<Variable>,
    matchers: Vec<(String, Value)>,
}

impl Query {
    /// Build a query against records of type `ty`.
    ///
    /// Naming a field that `ty` does not declare is a programming
    /// error and panics.
    pub fn new<I, S>(ty: &Rc<RecordType>, itself: Option<Variable>, matchers: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let matchers: Vec<(String, Value)> = matchers
            .into_iter()
            .map(|(name, val)| (name.into(), val))
            .collect();
        for (name, _) in &matchers {
            assert!(
                ty.index(name).is_some(),
                "no field {} in record type {}",
                name,
                ty.name()
            );
        }
        Self {
            ty: ty.clone(),
            itself,
            matchers,
        }
    }

    pub fn record_type(&self) -> &Rc<RecordType> {
        &self.ty
    }

    fn matcher(&self, field: &str) -> Option<&Value> {
        self.matchers
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, val)| val)
    }

    /// Unify the query against another value.
    ///
    /// Against a record of the query's type, each matcher is unified
    /// with the corresponding field value, and the self variable (if
    /// any) is then bound to the record. Against another query of the
    /// same type, matchers are unified for each field constrained by
    /// both; fields constrained by only one side are ignored.
    pub fn unify(&self, other: &Value, bindings: &Bindings) -> Option<Bindings> {
        match other {
            Value::Query(q) => {
                if self.ty != q.ty {
                    return None;
                }
                let mut b = bindings.clone();
                for (name, mine) in &self.matchers {
                    if let Some(theirs) = q.matcher(name) {
                        b = unify(mine, theirs, &b)?;
                    }
                }
                Some(b)
            }
            Value::Record(r) => {
                if &self.ty != r.record_type() {
                    return None;
                }
                let mut b = bindings.clone();
                for (name, matcher) in &self.matchers {
                    b = unify(matcher, r.get(name)?, &b)?;
                }
                match &self.itself {
                    None => Some(b),
                    Some(v) => match b.bind(v, other.clone()) {
                        Some(b) => Some(b),
                        None => {
                            debug!("binding {} to the matched record failed", v);
                            None
                        }
                    },
                }
            }
            _ => None,
        }
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}?{{", self.ty.name())?;
        let mut first = true;
        for (name, matcher) in &self.matchers {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}: {}", name, matcher)?;
        }
        write!(f, "}}")
    }
}
