//! Nodes of the discrimination network.

use super::rule::{self, Rule};
use super::Side;
use crate::error::GraphError;
use crate::Value;
use core::cell::RefCell;
use std::rc::Rc;

/// An element of the dataflow graph.
///
/// A node has a label, edge lists, and kind-specific state. Nodes are
/// arena-allocated and compared by address; the graph is a DAG except
/// for the feedback edge from rule outputs back to the root.
pub struct Node<'r> {
    label: String,
    kind: NodeKind<'r>,
    inputs: RefCell<Vec<&'r Node<'r>>>,
    outputs: RefCell<Vec<&'r Node<'r>>>,
}

/// What a node does with the items it receives.
pub enum NodeKind<'r> {
    /// Entry point; fans every item out unchanged.
    Root,
    /// Passes on items whose [`kind_name`](Value::kind_name) matches.
    TypeTest(String),
    /// Passes on items satisfying a predicate.
    Test(Box<dyn Fn(&Value) -> bool + 'r>),
    /// Runs a side effect, then passes the item on.
    Action(Box<dyn Fn(&Value) + 'r>),
    /// An arbitrary transform; the function decides what to emit.
    Function(Box<dyn Fn(&'r Node<'r>, &Value) + 'r>),
    /// Accumulates items for downstream consumers.
    Buffer(RefCell<Vec<Value>>),
    /// Accumulates items no other stored item is `alike` to.
    UniqueBuffer {
        items: RefCell<Vec<Value>>,
        alike: Box<dyn Fn(&Value, &Value) -> bool + 'r>,
    },
    /// Feeds one side of a join.
    JoinSide(Side),
    /// Pairs every item of one side with every item of the other.
    Join {
        left: RefCell<Vec<Value>>,
        right: RefCell<Vec<Value>>,
    },
    /// Accumulates the facts for one rule parameter type and drives
    /// the activation of downstream rule nodes.
    RuleParameter(RefCell<Vec<Value>>),
    /// The activation site of an installed rule.
    Rule(Rc<Rule>),
}

impl<'r> Node<'r> {
    pub(crate) fn new(label: String, kind: NodeKind<'r>) -> Self {
        Self {
            label,
            kind,
            inputs: RefCell::new(Vec::new()),
            outputs: RefCell::new(Vec::new()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &NodeKind<'r> {
        &self.kind
    }

    /// The nodes that send items to this node.
    pub fn inputs(&self) -> Vec<&'r Node<'r>> {
        self.inputs.borrow().clone()
    }

    /// The nodes this node sends items to.
    pub fn outputs(&self) -> Vec<&'r Node<'r>> {
        self.outputs.borrow().clone()
    }

    pub(crate) fn add_input(&self, n: &'r Node<'r>) {
        self.inputs.borrow_mut().push(n);
    }

    pub(crate) fn add_output(&self, n: &'r Node<'r>) {
        self.outputs.borrow_mut().push(n);
    }

    pub(crate) fn id(&self) -> usize {
        self as *const Self as usize
    }

    /// Send an item to every output, in edge insertion order.
    pub fn emit(&self, item: &Value) {
        for o in self.outputs() {
            o.receive(item);
        }
    }

    /// Process one incoming item, driving all downstream emissions to
    /// completion before returning.
    pub fn receive(&'r self, item: &Value) {
        match &self.kind {
            NodeKind::Root => self.emit(item),
            NodeKind::TypeTest(name) => {
                if item.kind_name() == name {
                    self.emit(item)
                }
            }
            NodeKind::Test(test) => {
                if test(item) {
                    self.emit(item)
                }
            }
            NodeKind::Action(act) => {
                act(item);
                self.emit(item)
            }
            NodeKind::Function(f) => f(self, item),
            NodeKind::Buffer(items) => {
                items.borrow_mut().push(item.clone());
                self.emit(item)
            }
            NodeKind::UniqueBuffer { items, alike } => {
                if items.borrow().iter().any(|stored| alike(stored, item)) {
                    return;
                }
                items.borrow_mut().push(item.clone());
                self.emit(item)
            }
            NodeKind::JoinSide(side) => {
                let side = *side;
                for o in self.outputs() {
                    o.receive_side(side, item);
                }
            }
            NodeKind::Join { .. } => {
                panic!("join {} receives through its side adapters", self.label)
            }
            NodeKind::RuleParameter(items) => rule::receive_parameter(self, items, item),
            NodeKind::Rule(_) => {
                panic!("rule {} is driven by its parameter buffers", self.label)
            }
        }
    }

    fn store(&self) -> Option<&RefCell<Vec<Value>>> {
        match &self.kind {
            NodeKind::Buffer(items)
            | NodeKind::UniqueBuffer { items, .. }
            | NodeKind::RuleParameter(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this node stores the items it receives.
    pub fn is_buffer(&self) -> bool {
        self.store().is_some()
    }

    /// Number of stored items; zero for nodes without storage.
    pub fn count(&self) -> usize {
        self.store().map_or(0, |s| s.borrow().len())
    }

    /// Snapshot of the stored items.
    pub fn items(&self) -> Vec<Value> {
        self.store().map_or_else(Vec::new, |s| s.borrow().clone())
    }

    /// Forget all stored items. Nodes without storage ignore this.
    pub fn clear(&self) {
        if let Some(s) = self.store() {
            s.borrow_mut().clear();
        }
        if let NodeKind::Join { left, right } = &self.kind {
            left.borrow_mut().clear();
            right.borrow_mut().clear();
        }
    }

    /// Structural checks for this node.
    pub fn validate(&self) -> Vec<GraphError> {
        let mut errors = self.validate_connectivity();
        match &self.kind {
            NodeKind::Join { .. } => self.validate_join(&mut errors),
            NodeKind::RuleParameter(_) => self.validate_parameter(&mut errors),
            NodeKind::Rule(rule) => self.validate_rule(rule, &mut errors),
            _ => {}
        }
        errors
    }

    fn validate_connectivity(&self) -> Vec<GraphError> {
        let mut errors = Vec::new();
        for input in self.inputs() {
            if !input.outputs().iter().any(|o| core::ptr::eq(*o, self)) {
                errors.push(GraphError::NotOutputOfInput {
                    node: self.label.clone(),
                    input: input.label().into(),
                });
            }
        }
        for output in self.outputs() {
            if !output.inputs().iter().any(|i| core::ptr::eq(*i, self)) {
                errors.push(GraphError::NotInputOfOutput {
                    node: self.label.clone(),
                    output: output.label().into(),
                });
            }
        }
        if !matches!(self.kind, NodeKind::Root) && self.inputs.borrow().is_empty() {
            errors.push(GraphError::NoInputs {
                node: self.label.clone(),
            });
        }
        errors
    }

    fn validate_join(&self, errors: &mut Vec<GraphError>) {
        let inputs = self.inputs();
        if inputs.len() != 2 {
            errors.push(GraphError::JoinInputs {
                node: self.label.clone(),
                count: inputs.len(),
            });
            return;
        }
        let sides: Vec<Side> = inputs
            .iter()
            .filter_map(|i| match i.kind() {
                NodeKind::JoinSide(side) => Some(*side),
                _ => None,
            })
            .collect();
        if !(sides.contains(&Side::Left) && sides.contains(&Side::Right)) {
            errors.push(GraphError::JoinSides {
                node: self.label.clone(),
            });
        }
    }

    fn validate_parameter(&self, errors: &mut Vec<GraphError>) {
        let inputs = self.inputs();
        let ok = inputs.len() == 1 && matches!(inputs[0].kind(), NodeKind::TypeTest(_));
        if !ok {
            errors.push(GraphError::ParamInput {
                node: self.label.clone(),
            });
        }
    }

    fn validate_rule(&self, rule: &Rule, errors: &mut Vec<GraphError>) {
        for (input, want) in self.inputs().iter().zip(rule.param_types()) {
            match input.kind() {
                NodeKind::RuleParameter(_) => {
                    let fed_by = input.inputs();
                    let got = fed_by.first().and_then(|tt| match tt.kind() {
                        NodeKind::TypeTest(name) => Some(name.clone()),
                        _ => None,
                    });
                    match got {
                        Some(got) if &got == want => {}
                        got => errors.push(GraphError::ParamType {
                            node: self.label.clone(),
                            want: want.clone(),
                            got: got.unwrap_or_default(),
                        }),
                    }
                }
                _ => errors.push(GraphError::RuleInput {
                    node: self.label.clone(),
                    input: input.label().into(),
                }),
            }
        }
    }
}
