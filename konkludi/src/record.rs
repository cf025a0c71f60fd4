//! Record types, record values, and the type registry.

use crate::error::TypesError as Error;
use crate::Value;
use core::fmt::{self, Display};
use fnv::FnvHashMap;
use std::rc::Rc;

/// Declared shape of a record: a type name and ordered field names.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordType {
    name: String,
    fields: Vec<String>,
}

impl RecordType {
    pub fn new<I, S>(name: &str, fields: I) -> Rc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rc::new(Self {
            name: name.into(),
            fields: fields.into_iter().map(|f| f.into()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Position of a field in the declared order.
    pub fn index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Construct a record of this type.
    ///
    /// The number of values must match the number of declared fields;
    /// anything else is a programming error and panics.
    pub fn make(&self, values: Vec<Value>) -> Value {
        assert_eq!(
            values.len(),
            self.fields.len(),
            "record {} declares {} fields",
            self.name,
            self.fields.len()
        );
        Value::Record(Rc::new(Record {
            ty: Rc::new(self.clone()),
            values,
        }))
    }
}

/// A record value: its type and one value per declared field.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    ty: Rc<RecordType>,
    values: Vec<Value>,
}

impl Record {
    pub fn record_type(&self) -> &Rc<RecordType> {
        &self.ty
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The value of the named field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(self.ty.index(field)?)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{{", self.ty.name)?;
        let mut first = true;
        for (name, value) in self.ty.fields.iter().zip(&self.values) {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

/// Map from type names to record types.
///
/// Rule bodies and catalog consumers look record types up by name here,
/// so that generated code can construct records without carrying the
/// type values themselves.
#[derive(Default)]
pub struct Types {
    index: FnvHashMap<String, Rc<RecordType>>,
}

impl Types {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&mut self, ty: Rc<RecordType>) -> Result<(), Error> {
        if self.index.insert(ty.name().into(), ty).is_some() {
            return Err(Error::Reinsertion);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Rc<RecordType>> {
        self.index.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_access() {
        let ty = RecordType::new("Point", vec!["x", "y"]);
        let p = ty.make(vec![Value::from(1i32), Value::from(2i32)]);
        let r = p.as_record().unwrap();
        assert_eq!(r.get("x"), Some(&Value::from(1i32)));
        assert_eq!(r.get("y"), Some(&Value::from(2i32)));
        assert_eq!(r.get("z"), None);
        assert_eq!(p.kind_name(), "Point");
    }

    #[test]
    #[should_panic]
    fn arity_mismatch_panics() {
        let ty = RecordType::new("Point", vec!["x", "y"]);
        ty.make(vec![Value::from(1i32)]);
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut types = Types::new();
        types.insert(RecordType::new("A", vec!["x"])).unwrap();
        assert!(types.insert(RecordType::new("A", vec!["y"])).is_err());
        assert!(types.get("A").is_some());
        assert!(types.get("B").is_none());
    }
}
