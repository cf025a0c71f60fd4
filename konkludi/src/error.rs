//! Common error types.

use crate::Kind;
use core::fmt::{self, Display};

/// Common error type.
#[derive(Debug)]
pub enum Error {
    Equal(EqualError),
    Graph(Vec<GraphError>),
    Types(TypesError),
    Rules(RulesError),
}

/// Two values of kinds with no registered equality.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EqualError {
    left: Kind,
    right: Kind,
}

impl EqualError {
    pub fn new(left: Kind, right: Kind) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> Kind {
        self.left
    }

    pub fn right(&self) -> Kind {
        self.right
    }
}

impl Display for EqualError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cannot compare {} with {}", self.left, self.right)
    }
}

/// Structural defect of a node graph, found by validation.
#[derive(Debug, Eq, PartialEq)]
pub enum GraphError {
    /// A node is missing from the input list of one of its outputs.
    NotInputOfOutput { node: String, output: String },
    /// A node is missing from the output list of one of its inputs.
    NotOutputOfInput { node: String, input: String },
    /// A non-root node without inputs can never receive anything.
    NoInputs { node: String },
    /// A join must have exactly two inputs.
    JoinInputs { node: String, count: usize },
    /// A join input must be a side adapter, one per side.
    JoinSides { node: String },
    /// A rule input must be a rule parameter buffer.
    RuleInput { node: String, input: String },
    /// The type feeding a rule parameter differs from the declared
    /// parameter type at that position.
    ParamType {
        node: String,
        want: String,
        got: String,
    },
    /// A rule parameter buffer must be fed by exactly one type filter.
    ParamInput { node: String },
}

impl Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotInputOfOutput { node, output } => {
                write!(f, "node {} is not an input of its output {}", node, output)
            }
            Self::NotOutputOfInput { node, input } => {
                write!(f, "node {} is not an output of its input {}", node, input)
            }
            Self::NoInputs { node } => write!(f, "node {} has no inputs", node),
            Self::JoinInputs { node, count } => {
                write!(f, "join {} has {} inputs instead of two", node, count)
            }
            Self::JoinSides { node } => {
                write!(f, "join {} is not fed by one left and one right side", node)
            }
            Self::RuleInput { node, input } => {
                write!(f, "input {} of rule {} is not a parameter buffer", input, node)
            }
            Self::ParamType { node, want, got } => {
                write!(f, "rule {} expects a {} parameter, but is fed {}", node, want, got)
            }
            Self::ParamInput { node } => {
                write!(f, "parameter buffer {} is not fed by exactly one type filter", node)
            }
        }
    }
}

/// Errors of the record type registry.
#[derive(Debug, Eq, PartialEq)]
pub enum TypesError {
    Reinsertion,
}

/// Errors of the rule catalog.
#[derive(Debug, Eq, PartialEq)]
pub enum RulesError {
    Reinsertion,
}

impl From<EqualError> for Error {
    fn from(err: EqualError) -> Self {
        Self::Equal(err)
    }
}

impl From<Vec<GraphError>> for Error {
    fn from(errs: Vec<GraphError>) -> Self {
        Self::Graph(errs)
    }
}

impl From<TypesError> for Error {
    fn from(err: TypesError) -> Self {
        Self::Types(err)
    }
}

impl From<RulesError> for Error {
    fn from(err: RulesError) -> Self {
        Self::Rules(err)
    }
}
