#![forbid(unsafe_code)]

//! Forward-chaining inference over dynamic records.
//!
//! This library combines a unification-based pattern matcher with a
//! discrimination network that computes rule activations incrementally
//! as facts are asserted.
//!
//! # Usage
//!
//! Values are dynamic: numbers of several widths, strings, sequences,
//! records of declared [`RecordType`]s, logic [`Variable`]s and
//! structural [`Query`] patterns, all under one [`Value`] union with a
//! cross-width notion of [`equal`]ity. Variables live in a [`Scope`];
//! associating them with values or with each other yields persistent
//! [`Bindings`], and [`unify`] grows bindings by matching two values
//! structurally.
//!
//! Facts are records asserted into a [`Rete`](rete::Rete): a graph of
//! filter, buffer, join and rule nodes. Installing a
//! [`Rule`](rete::Rule) wires one buffer per parameter type; each
//! newly asserted fact activates the rule once per parameter
//! combination involving it, and emitted conclusions flow back into
//! the network until nothing more follows.
//!
//! ~~~
//! # use konkludi::rete::{Node, NodeArena, Rete, Rule, Rules};
//! # use konkludi::{RecordType, Value};
//! // every Person fact produces a Greeting fact
//! fn greet(node: &Node, item: &Value) {
//!     let args = item.as_seq().expect("one value per parameter");
//!     let name = args[0].as_record().unwrap().get("name").unwrap();
//!     let greeting = RecordType::new("Greeting", vec!["to"]);
//!     node.emit(&greeting.make(vec![name.clone()]));
//! }
//!
//! let person = RecordType::new("Person", vec!["name"]);
//!
//! let mut rules = Rules::new();
//! rules.insert(Rule::new("greet", &["Person"], &["Greeting"], |_| {}, greet))?;
//!
//! let arena = NodeArena::new();
//! let rete = Rete::new(&arena);
//! for rule in rules.iter() {
//!     rete.install(rule);
//! }
//!
//! rete.assert(person.make(vec![Value::from("ada")]));
//! rete.assert(person.make(vec![Value::from("grace")]));
//!
//! let buffer = rete.buffer_for("Greeting").unwrap();
//! assert_eq!(buffer.count(), 2);
//! # Ok::<_, konkludi::error::RulesError>(())
//! ~~~
//!
//! # Organisation
//!
//! * [`value`](Value), [`record`](Record) and [`equal`] carry the
//!   dynamic value model,
//! * [`scope`](Scope), [`bindings`](Bindings), [`unify`] and
//!   [`query`](Query) carry variables and matching, and
//! * [`rete`] carries the network, the rule model and the catalog.
//!
//! Unification failure is silent (no continuation, no error); only
//! structural defects and registry misuse surface as [`Error`]s.

#[macro_use]
extern crate log;

mod bindings;
mod equal;
pub mod error;
mod ply;
mod query;
mod record;
pub mod rete;
mod scope;
mod unify;
mod value;

pub use bindings::Bindings;
pub use equal::equal;
pub use error::Error;
pub use query::Query;
pub use record::{Record, RecordType, Types};
pub use scope::{Scope, Variable};
pub use unify::unify;
pub use value::{Kind, Value};
