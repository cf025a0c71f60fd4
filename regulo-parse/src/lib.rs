//! Lexing and parsing of rule source files.
//!
//! A rule source file is Rust-like item source. Top-level `fn`
//! declarations whose name starts with `rule_` are rule declarations;
//! everything else passes through untouched. Only rule declarations
//! are parsed: their parameter list is the rule's signature, their
//! return type names the record types the rule can emit, and their
//! brace-balanced body is carried verbatim.

pub mod lex;
pub mod parse;

pub use lex::Token;
pub use parse::{Error, Item, Items, RuleDecl};

/// Rule declarations are recognized by this name prefix.
pub const RULE_PREFIX: &str = "rule_";
