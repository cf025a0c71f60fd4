//! Rules, their incremental activation, and the catalog.

use super::{Node, NodeKind, Rete};
use crate::error::RulesError as Error;
use crate::Value;
use core::cell::RefCell;
use fnv::FnvHashSet;
use std::rc::Rc;

/// Adds the node subgraph implementing a rule to a rete.
pub type Installer = Rc<dyn for<'r> Fn(&Rete<'r>)>;

/// Invoked once per activation with the rule's node and the combined
/// parameters.
///
/// The argument shape is decided by the installer that wired the rule:
/// parameter-buffer topologies deliver a flat sequence with one value
/// per parameter, join topologies deliver right-nested pairs (and the
/// bare item for single-parameter rules).
pub type Caller = Rc<dyn for<'r, 'v> Fn(&'r Node<'r>, &'v Value)>;

/// A declarative rule: name, typed parameters, emitted types, and the
/// functions that install and run it.
#[derive(Clone)]
pub struct Rule {
    name: String,
    param_types: Vec<String>,
    emit_types: Vec<String>,
    installer: Installer,
    caller: Caller,
}

impl Rule {
    pub fn new(
        name: &str,
        param_types: &[&str],
        emit_types: &[&str],
        installer: impl for<'r> Fn(&Rete<'r>) + 'static,
        caller: impl for<'r, 'v> Fn(&'r Node<'r>, &'v Value) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            param_types: param_types.iter().map(|&t| t.into()).collect(),
            emit_types: emit_types.iter().map(|&t| t.into()).collect(),
            installer: Rc::new(installer),
            caller: Rc::new(caller),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[String] {
        &self.param_types
    }

    pub fn emit_types(&self) -> &[String] {
        &self.emit_types
    }

    pub fn installer(&self) -> &Installer {
        &self.installer
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    /// Whether the rule can conclude facts of the given type.
    pub fn emits(&self, name: &str) -> bool {
        self.emit_types.iter().any(|t| t == name)
    }
}

/// The rule catalog: an append-only list of rules, rejecting duplicate
/// names. Consumers iterate it at startup to install every rule.
#[derive(Default)]
pub struct Rules {
    list: Vec<Rc<Rule>>,
}

impl Rules {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&mut self, rule: Rule) -> Result<(), Error> {
        if self.get(rule.name()).is_some() {
            return Err(Error::Reinsertion);
        }
        self.list.push(Rc::new(rule));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Rule>> {
        self.list.iter().find(|r| r.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Rule>> {
        self.list.iter()
    }

    /// Run every rule's installer against the rete and make sure each
    /// emitted type has an observation buffer.
    pub fn install_all<'r>(&self, rete: &Rete<'r>) {
        for rule in &self.list {
            info!("installing rule {}", rule.name());
            (rule.installer())(rete);
            for t in rule.emit_types() {
                rete.observe(t);
            }
        }
    }
}

/// Receive behavior of a rule parameter buffer.
///
/// The buffer stores the new item, then drives each distinct
/// downstream rule node. A rule with several parameters of one type is
/// fed by the same buffer at each of those positions, so the buffer
/// may list the same rule node as an output more than once.
pub(crate) fn receive_parameter<'r>(
    node: &'r Node<'r>,
    store: &RefCell<Vec<Value>>,
    item: &Value,
) {
    store.borrow_mut().push(item.clone());
    let mut seen = FnvHashSet::default();
    for output in node.outputs() {
        if !seen.insert(output.id()) {
            continue;
        }
        match output.kind() {
            NodeKind::Rule(rule) => fill_and_call(item, output, rule),
            _ => output.receive(item),
        }
    }
}

/// Enumerate every parameter combination involving the new item and
/// invoke the rule once per combination.
///
/// Combinations not involving the new item were already considered
/// when earlier items arrived, so activation stays incremental and
/// never fires twice for the same combination.
fn fill_and_call<'r>(item: &Value, rule_node: &'r Node<'r>, rule: &Rc<Rule>) {
    let inputs = rule_node.inputs();
    let mut chosen = Vec::with_capacity(inputs.len());
    fill(&inputs, item, rule_node, rule, &mut chosen, false);
}

fn fill<'r>(
    inputs: &[&'r Node<'r>],
    item: &Value,
    rule_node: &'r Node<'r>,
    rule: &Rc<Rule>,
    chosen: &mut Vec<Value>,
    includes_new: bool,
) {
    let position = chosen.len();
    if position == inputs.len() {
        if includes_new {
            (rule.caller())(rule_node, &Value::seq(chosen.clone()));
        }
        return;
    }
    for candidate in inputs[position].items() {
        let includes = includes_new || candidate.same(item);
        chosen.push(candidate);
        fill(inputs, item, rule_node, rule, chosen, includes);
        chosen.pop();
    }
}
