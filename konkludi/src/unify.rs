//! Unification over values.
//!
//! Unification is single-shot: there are no choice points, so the
//! continuation-passing interface collapses to an `Option` return.
//! `Some(b)` plays the role of calling the continuation once with `b`;
//! `None` means the continuation is never called.

use crate::{equal, Bindings, Value, Variable};

/// Attempt to unify two values under the given bindings.
///
/// Variables and queries take precedence and decide the outcome
/// themselves; otherwise the first matching type unifier applies:
/// numbers and strings unify when [`equal`], sequences element-wise
/// when of the same length, records field-wise when of the same type.
/// Values no unifier accepts never unify.
///
/// ~~~
/// # use konkludi::{unify, Bindings, Scope, Value};
/// let s = Scope::new();
/// let v = s.lookup("v");
/// let b = unify(&Value::from(5i32), &v.clone().into(), &Bindings::new()).unwrap();
/// assert_eq!(b.get(&v), Some(Value::I32(5)));
/// assert!(unify(&Value::from(1i32), &Value::from(2i32), &b).is_none());
/// ~~~
pub fn unify(a: &Value, b: &Value, bindings: &Bindings) -> Option<Bindings> {
    if let Value::Var(v) = a {
        return unify_variable(v, b, bindings);
    }
    if let Value::Var(v) = b {
        return unify_variable(v, a, bindings);
    }
    if let Value::Query(q) = a {
        return q.unify(b, bindings);
    }
    if let Value::Query(q) = b {
        return q.unify(a, bindings);
    }

    let unifiers: &[(fn(&Value) -> bool, Unifier)] = &[
        (Value::is_numeric, equal_or_fail),
        (is_string, equal_or_fail),
        (is_seq, unify_seqs),
        (is_record, unify_records),
    ];
    let (_, u) = unifiers
        .iter()
        .find(|(accepts, _)| accepts(a) && accepts(b))?;
    u(a, b, bindings)
}

fn unify_variable(v: &Variable, other: &Value, b: &Bindings) -> Option<Bindings> {
    match b.bind(v, other.clone()) {
        Some(b) => Some(b),
        None => {
            debug!("binding {} failed, its value is {:?}", v, b.get(v));
            None
        }
    }
}

type Unifier = fn(&Value, &Value, &Bindings) -> Option<Bindings>;

fn is_string(v: &Value) -> bool {
    matches!(v, Value::Str(_))
}

fn is_seq(v: &Value) -> bool {
    matches!(v, Value::Seq(_))
}

fn is_record(v: &Value) -> bool {
    matches!(v, Value::Record(_))
}

/// Values of kinds without inner structure unify exactly if equal.
fn equal_or_fail(a: &Value, b: &Value, bindings: &Bindings) -> Option<Bindings> {
    match equal(a, b) {
        Ok(true) => Some(bindings.clone()),
        Ok(false) => None,
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

fn unify_seqs(a: &Value, b: &Value, bindings: &Bindings) -> Option<Bindings> {
    let (xs, ys) = (a.as_seq()?, b.as_seq()?);
    if xs.len() != ys.len() {
        return None;
    }
    let mut b = bindings.clone();
    for (x, y) in xs.iter().zip(ys) {
        b = unify(x, y, &b)?;
    }
    Some(b)
}

fn unify_records(a: &Value, b: &Value, bindings: &Bindings) -> Option<Bindings> {
    let (x, y) = (a.as_record()?, b.as_record()?);
    if x.record_type() != y.record_type() {
        return None;
    }
    let mut b = bindings.clone();
    for (xv, yv) in x.values().iter().zip(y.values()) {
        b = unify(xv, yv, &b)?;
    }
    Some(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordType, Scope};

    fn empty() -> Bindings {
        Bindings::new()
    }

    #[test]
    fn idempotent() {
        let s = Scope::new();
        let ty = RecordType::new("T", vec!["a"]);
        let vals = [
            Value::from(1i32),
            Value::from("foo"),
            Value::seq(vec![Value::from(1i32), Value::from("x")]),
            ty.make(vec![Value::from(4i64)]),
            s.lookup("v").into(),
        ];
        for v in &vals {
            assert!(unify(v, v, &empty()).is_some(), "{} with itself", v);
        }
    }

    #[test]
    fn unequal_numbers() {
        assert!(unify(&Value::from(1i32), &Value::from(2i32), &empty()).is_none());
        assert!(unify(&Value::from(1i8), &Value::from(1i64), &empty()).is_some());
    }

    #[test]
    fn strings() {
        assert!(unify(&Value::from("foo"), &Value::from("foo"), &empty()).is_some());
        assert!(unify(&Value::from("foo"), &Value::from("bar"), &empty()).is_none());
    }

    #[test]
    fn mixed_kinds_fail() {
        assert!(unify(&Value::from("1"), &Value::from(1i32), &empty()).is_none());
    }

    #[test]
    fn variable_binding() {
        let s = Scope::new();
        let v = s.lookup("v");
        let b = unify(&Value::from(5i32), &v.clone().into(), &empty()).unwrap();
        assert!(equal(&b.get(&v).unwrap(), &Value::from(5i32)).unwrap());
    }

    #[test]
    fn variable_with_equal_value() {
        let s = Scope::new();
        let v = s.lookup("v");
        let b = empty().bind(&v, 5i32).unwrap();
        assert!(unify(&Value::from(5i32), &v.clone().into(), &b).is_some());
    }

    #[test]
    fn variable_with_different_value() {
        let s = Scope::new();
        let v = s.lookup("v");
        let b = empty().bind(&v, 0i32).unwrap();
        assert!(unify(&Value::from(5i32), &v.clone().into(), &b).is_none());
    }

    #[test]
    fn two_variables() {
        let s = Scope::new();
        let (v1, v2) = (s.lookup("v1"), s.lookup("v2"));
        let both = |x: i32, y: i32| {
            let b = empty().bind(&v1, x).unwrap().bind(&v2, y).unwrap();
            unify(&v1.clone().into(), &v2.clone().into(), &b)
        };
        assert!(both(4, 4).is_some());
        assert!(both(4, 5).is_none());
    }

    #[test]
    fn symmetry() {
        let s = Scope::new();
        let v = s.lookup("v");
        let pairs = [
            (Value::from(1i32), Value::from(1u8)),
            (Value::from("a"), Value::from("a")),
            (Value::from(3i32), Value::Var(v)),
        ];
        for (a, b) in &pairs {
            assert_eq!(
                unify(a, b, &empty()).is_some(),
                unify(b, a, &empty()).is_some()
            );
        }
    }

    #[test]
    fn sequences() {
        let xs = Value::seq(vec![Value::from(1i32), Value::from("a")]);
        let ys = Value::seq(vec![Value::from(1i64), Value::from("a")]);
        assert!(unify(&xs, &ys, &empty()).is_some());

        let shorter = Value::seq(vec![Value::from(1i32)]);
        assert!(unify(&xs, &shorter, &empty()).is_none());

        let differs = Value::seq(vec![Value::from(2i32), Value::from("a")]);
        assert!(unify(&xs, &differs, &empty()).is_none());
    }

    #[test]
    fn sequence_binds_variables() {
        let s = Scope::new();
        let v = s.lookup("v");
        let xs = Value::seq(vec![Value::from(1i32), v.clone().into()]);
        let ys = Value::seq(vec![Value::from(1i32), Value::from("tail")]);
        let b = unify(&xs, &ys, &empty()).unwrap();
        assert!(equal(&b.get(&v).unwrap(), &Value::from("tail")).unwrap());
    }

    #[test]
    fn records() {
        let s = Scope::new();
        let v = s.lookup("v");
        let ty = RecordType::new("T", vec!["a", "b"]);
        let x = ty.make(vec![Value::from(1i32), v.clone().into()]);
        let y = ty.make(vec![Value::from(1i64), Value::from("foo")]);
        let b = unify(&x, &y, &empty()).unwrap();
        assert!(equal(&b.get(&v).unwrap(), &Value::from("foo")).unwrap());

        let other = RecordType::new("U", vec!["a", "b"]);
        let z = other.make(vec![Value::from(1i32), Value::from("foo")]);
        assert!(unify(&x, &z, &empty()).is_none());
    }
}
