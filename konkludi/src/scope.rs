//! Scopes interning logic variables by name.

use core::cell::RefCell;
use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use fnv::FnvHashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static SCOPE_IDS: AtomicU64 = AtomicU64::new(0);

/// A namespace for logic variables.
///
/// Looking a name up twice in the same scope yields the same variable;
/// equal names in different scopes yield distinct variables.
pub struct Scope {
    id: u64,
    index: RefCell<FnvHashMap<String, Variable>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            id: SCOPE_IDS.fetch_add(1, Ordering::Relaxed),
            index: RefCell::new(FnvHashMap::default()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The unique variable with the given name in this scope,
    /// created if absent.
    pub fn lookup(&self, name: &str) -> Variable {
        if let Some(v) = self.index.borrow().get(name) {
            return v.clone();
        }
        let v = Variable(Rc::new(VarData {
            scope: self.id,
            name: name.into(),
        }));
        self.index.borrow_mut().insert(name.into(), v.clone());
        v
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct VarData {
    scope: u64,
    name: String,
}

/// A logic variable, identified by its scope and name.
///
/// This is a shared pointer; cloning, hashing, and equality checking
/// are performed on the address of the pointer, making them
/// constant-time operations. Two variables are equal exactly if they
/// came from the same name in the same scope:
///
/// ~~~
/// # use konkludi::Scope;
/// let s1 = Scope::new();
/// let s2 = Scope::new();
/// assert_eq!(s1.lookup("x"), s1.lookup("x"));
/// assert_ne!(s1.lookup("x"), s1.lookup("y"));
/// assert_ne!(s1.lookup("x"), s2.lookup("x"));
/// ~~~
#[derive(Clone, Debug)]
pub struct Variable(Rc<VarData>);

impl Variable {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn scope_id(&self) -> u64 {
        self.0.scope
    }

    /// True if the two references denote the exact same variable.
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(Rc::as_ptr(&self.0), state)
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Variable {}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "?{}", self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning() {
        let s = Scope::new();
        let a = s.lookup("a");
        assert!(a.same_as(&s.lookup("a")));
        assert_eq!(a.name(), "a");
        assert_eq!(a.to_string(), "?a");
    }

    #[test]
    fn scope_ids_are_unique() {
        assert_ne!(Scope::new().id(), Scope::new().id());
    }
}
