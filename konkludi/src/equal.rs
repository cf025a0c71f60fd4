//! Equality across value kinds.
//!
//! The engine cannot use `==` alone: facts drawn from heterogeneous
//! sources may carry the same number at different widths, and `i8(5)`
//! must be equal to `i32(5)` when both appear inside records. Equality
//! is dispatched on the pair of runtime kinds; asking about a pair with
//! no registered meaning is an error, distinct from inequality.

use crate::error::EqualError;
use crate::{Record, Value};
use std::rc::Rc;

/// Decide whether two values are equal.
///
/// Supported pairs: integers of any width and signedness, floats,
/// booleans, strings, and records. Every other pair yields an
/// [`EqualError`].
///
/// ~~~
/// # use konkludi::{equal, Value};
/// assert_eq!(equal(&Value::I8(5), &Value::I32(5)), Ok(true));
/// assert_eq!(equal(&Value::I8(-1), &Value::U8(255)), Ok(false));
/// assert!(equal(&Value::I8(0), &Value::from("0")).is_err());
/// ~~~
pub fn equal(a: &Value, b: &Value) -> Result<bool, EqualError> {
    // Dispatch is symmetric: try one direction, then the other.
    match directed(a, b).or_else(|| directed(b, a)) {
        Some(eq) => Ok(eq),
        None => Err(EqualError::new(a.kind(), b.kind())),
    }
}

fn directed(a: &Value, b: &Value) -> Option<bool> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x == y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x == y);
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_u64()) {
        return Some(x >= 0 && x as u64 == y);
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        // Bitwise after widening: never a tolerance comparison.
        return Some(x.to_bits() == y.to_bits());
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => Some(x == y),
        (Value::Str(x), Value::Str(y)) => Some(x == y),
        (Value::Record(x), Value::Record(y)) => Some(records_equal(x, y)),
        _ => None,
    }
}

fn records_equal(a: &Rc<Record>, b: &Rc<Record>) -> bool {
    if Rc::ptr_eq(a, b) {
        return true;
    }
    if a.record_type() != b.record_type() {
        return false;
    }
    // A field pair that cannot be compared makes the records unequal.
    a.values()
        .iter()
        .zip(b.values())
        .all(|(x, y)| equal(x, y).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordType;

    #[test]
    fn reflexive_on_supported_kinds() {
        let ty = RecordType::new("T", vec!["a"]);
        let vals = [
            Value::Bool(true),
            Value::I8(-3),
            Value::I64(1 << 40),
            Value::U16(9),
            Value::F32(2.5),
            Value::F64(-0.0),
            Value::from("foo"),
            ty.make(vec![Value::I32(1)]),
        ];
        for v in &vals {
            assert_eq!(equal(v, v), Ok(true), "{} should equal itself", v);
        }
    }

    #[test]
    fn symmetric_on_supported_pairs() {
        let pairs = [
            (Value::I8(5), Value::I32(5)),
            (Value::I16(7), Value::U64(7)),
            (Value::F32(1.5), Value::F64(1.5)),
            (Value::from("a"), Value::from("b")),
        ];
        for (a, b) in &pairs {
            assert_eq!(equal(a, b), equal(b, a));
        }
    }

    #[test]
    fn integer_widths() {
        for n in -128..=127i64 {
            assert_eq!(equal(&Value::I8(n as i8), &Value::I32(n as i32)), Ok(true));
        }
        assert_eq!(equal(&Value::I8(1), &Value::I8(2)), Ok(false));
        assert_eq!(equal(&Value::U8(200), &Value::U32(200)), Ok(true));
    }

    #[test]
    fn signed_unsigned_edges() {
        assert_eq!(equal(&Value::I8(-1), &Value::U8(255)), Ok(false));
        assert_eq!(equal(&Value::U8(255), &Value::I8(-1)), Ok(false));
        assert_eq!(equal(&Value::I32(255), &Value::U8(255)), Ok(true));
        assert_eq!(equal(&Value::U64(u64::MAX), &Value::I64(-1)), Ok(false));
        assert_eq!(equal(&Value::I64(0), &Value::U64(0)), Ok(true));
    }

    #[test]
    fn floats_are_bitwise_after_widening() {
        assert_eq!(equal(&Value::F32(0.5), &Value::F64(0.5)), Ok(true));
        assert_eq!(equal(&Value::F64(0.0), &Value::F64(-0.0)), Ok(false));
        let nan = f64::NAN;
        assert_eq!(equal(&Value::F64(nan), &Value::F64(nan)), Ok(true));
    }

    #[test]
    fn records_by_fields() {
        let ty = RecordType::new("T", vec!["a", "b"]);
        let x = ty.make(vec![Value::I8(5), Value::from("s")]);
        let y = ty.make(vec![Value::I64(5), Value::from("s")]);
        let z = ty.make(vec![Value::I64(6), Value::from("s")]);
        assert_eq!(equal(&x, &y), Ok(true));
        assert_eq!(equal(&x, &z), Ok(false));

        let other = RecordType::new("U", vec!["a", "b"]);
        let w = other.make(vec![Value::I8(5), Value::from("s")]);
        assert_eq!(equal(&x, &w), Ok(false));
    }

    #[test]
    fn incomparable_fields_make_records_unequal() {
        let ty = RecordType::new("T", vec!["a"]);
        let x = ty.make(vec![Value::from("s")]);
        let y = ty.make(vec![Value::I8(0)]);
        assert_eq!(equal(&x, &y), Ok(false));
    }

    #[test]
    fn unknown_pairs_are_errors() {
        let err = equal(&Value::I8(0), &Value::from("0")).unwrap_err();
        assert_eq!(err, EqualError::new(crate::Kind::I8, crate::Kind::Str));
        assert!(equal(&Value::seq(vec![]), &Value::seq(vec![])).is_err());
        assert!(equal(&Value::Bool(true), &Value::I8(1)).is_err());
    }
}
