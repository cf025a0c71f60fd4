//! The discrimination network.
//!
//! A rete is a graph of typed nodes rooted at a single entry point.
//! Asserting a fact injects it at the root; type filters fan it out to
//! the buffers and joins of the installed rules, whose conclusions are
//! fed back to the root until no more follow. Propagation is
//! synchronous and single-threaded: when [`Rete::assert`] returns,
//! every downstream conclusion has been drawn.

mod graphviz;
mod join;
mod node;
mod rule;

pub use graphviz::{missing_conclusion, to_dot, MissingConclusion};
pub use join::Side;
pub use node::{Node, NodeKind};
pub use rule::{Caller, Installer, Rule, Rules};

use crate::error::GraphError;
use crate::{equal, unify, Bindings, Value};
use colosseum::unsync::Arena;
use core::cell::Cell;
use core::fmt::Write;
use fnv::FnvHashSet;
use std::rc::Rc;

/// Arena owning the nodes of a [`Rete`].
pub type NodeArena<'r> = Arena<Node<'r>>;

/// A rete: the root node plus the arena its nodes live in.
///
/// The topology is built during setup and read-only afterwards; only
/// buffer contents change while facts are asserted.
///
/// ~~~
/// # use konkludi::rete::{NodeArena, Rete};
/// # use konkludi::{RecordType, Value};
/// let ty = RecordType::new("Reading", vec!["sensor", "value"]);
/// let arena = NodeArena::new();
/// let rete = Rete::new(&arena);
/// rete.observe("Reading");
/// rete.assert(ty.make(vec![Value::from("t-1"), Value::from(20i32)]));
/// assert_eq!(rete.buffer_for("Reading").unwrap().count(), 1);
/// ~~~
pub struct Rete<'r> {
    arena: &'r NodeArena<'r>,
    root: &'r Node<'r>,
    fresh: Cell<usize>,
}

impl<'r> Rete<'r> {
    /// A new rete containing only a root node.
    pub fn new(arena: &'r NodeArena<'r>) -> Self {
        let root = &*arena.alloc(Node::new("root".into(), NodeKind::Root));
        Self {
            arena,
            root,
            fresh: Cell::new(0),
        }
    }

    pub fn root(&self) -> &'r Node<'r> {
        self.root
    }

    /// Assert a fact. All conclusions that follow from it are drawn
    /// before this returns.
    pub fn assert(&self, fact: Value) {
        self.root.receive(&fact)
    }

    /// Allocate a node. The caller connects it.
    pub fn add(&self, label: String, kind: NodeKind<'r>) -> &'r Node<'r> {
        &*self.arena.alloc(Node::new(label, kind))
    }

    fn fresh_label(&self, kind: &str) -> String {
        let n = self.fresh.get();
        self.fresh.set(n + 1);
        format!("{} {}", kind, n)
    }

    /// The type filter for `name` directly under the root, created on
    /// first use.
    pub fn type_test(&self, name: &str) -> &'r Node<'r> {
        if let Some(tt) = self.find_type_test(name) {
            return tt;
        }
        let n = self.add(format!("type {}", name), NodeKind::TypeTest(name.into()));
        connect(self.root, n);
        n
    }

    fn find_type_test(&self, name: &str) -> Option<&'r Node<'r>> {
        self.root.outputs().into_iter().find(|o| match o.kind() {
            NodeKind::TypeTest(t) => t == name,
            _ => false,
        })
    }

    /// A predicate filter. Unconnected.
    pub fn test(&self, f: impl Fn(&Value) -> bool + 'r) -> &'r Node<'r> {
        self.add(self.fresh_label("test"), NodeKind::Test(Box::new(f)))
    }

    /// A side-effect node passing items through. Unconnected.
    pub fn action(&self, f: impl Fn(&Value) + 'r) -> &'r Node<'r> {
        self.add(self.fresh_label("action"), NodeKind::Action(Box::new(f)))
    }

    /// An arbitrary transform node. Unconnected.
    pub fn function(&self, label: &str, f: impl Fn(&'r Node<'r>, &Value) + 'r) -> &'r Node<'r> {
        self.add(label.into(), NodeKind::Function(Box::new(f)))
    }

    /// A buffer collecting the output of `from`, created on first use.
    pub fn buffered(&self, from: &'r Node<'r>) -> &'r Node<'r> {
        if let NodeKind::Buffer(_) = from.kind() {
            return from;
        }
        if let Some(b) = from
            .outputs()
            .into_iter()
            .find(|o| matches!(o.kind(), NodeKind::Buffer(_)))
        {
            return b;
        }
        let n = self.add(
            format!("{} - buffered", from.label()),
            NodeKind::Buffer(Default::default()),
        );
        connect(from, n);
        n
    }

    /// A buffer keeping only items unique under `alike`, created on
    /// first use.
    pub fn unique_buffered(
        &self,
        from: &'r Node<'r>,
        alike: impl Fn(&Value, &Value) -> bool + 'r,
    ) -> &'r Node<'r> {
        if let NodeKind::UniqueBuffer { .. } = from.kind() {
            return from;
        }
        if let Some(b) = from
            .outputs()
            .into_iter()
            .find(|o| matches!(o.kind(), NodeKind::UniqueBuffer { .. }))
        {
            return b;
        }
        let n = self.add(
            format!("{} - unique", from.label()),
            NodeKind::UniqueBuffer {
                items: Default::default(),
                alike: Box::new(alike),
            },
        );
        connect(from, n);
        n
    }

    /// A unique buffer under the engine's semantic equality.
    pub fn unique(&self, from: &'r Node<'r>) -> &'r Node<'r> {
        self.unique_buffered(from, |a, b| equal(a, b).unwrap_or(false))
    }

    /// The parameter buffer fed by the given type filter, created on
    /// first use.
    pub fn rule_parameter(&self, tt: &'r Node<'r>) -> &'r Node<'r> {
        if let Some(rp) = tt
            .outputs()
            .into_iter()
            .find(|o| matches!(o.kind(), NodeKind::RuleParameter(_)))
        {
            return rp;
        }
        let n = self.add(
            format!("{} input", tt.label()),
            NodeKind::RuleParameter(Default::default()),
        );
        connect(tt, n);
        n
    }

    /// Join the outputs of `a` and `b`. Emitted pairs carry `a`'s item
    /// first regardless of which side fired.
    pub fn join(&self, label: &str, a: &'r Node<'r>, b: &'r Node<'r>) -> &'r Node<'r> {
        let j = self.add(
            label.into(),
            NodeKind::Join {
                left: Default::default(),
                right: Default::default(),
            },
        );
        let l = self.add(format!("{} left", label), NodeKind::JoinSide(Side::Left));
        let r = self.add(format!("{} right", label), NodeKind::JoinSide(Side::Right));
        connect(a, l);
        connect(l, j);
        connect(b, r);
        connect(r, j);
        j
    }

    /// Install a rule as one parameter buffer per parameter type
    /// feeding a rule node, with its conclusions fed back to the root.
    pub fn install(&self, rule: &Rc<Rule>) {
        let rule_node = self.add(format!("rule {}", rule.name()), NodeKind::Rule(rule.clone()));
        for t in rule.param_types() {
            let tt = self.type_test(t);
            let rp = self.rule_parameter(tt);
            connect(rp, rule_node);
        }
        for t in rule.emit_types() {
            self.observe(t);
        }
        connect(rule_node, self.root);
    }

    /// Make sure facts of the given type are collected in a buffer.
    pub fn observe(&self, name: &str) -> &'r Node<'r> {
        let tt = self.type_test(name);
        self.buffered(tt)
    }

    /// The observation buffer for the given type, if one exists.
    pub fn buffer_for(&self, name: &str) -> Option<&'r Node<'r>> {
        self.find_type_test(name)?
            .outputs()
            .into_iter()
            .find(|o| matches!(o.kind(), NodeKind::Buffer(_) | NodeKind::UniqueBuffer { .. }))
    }

    /// Unify `query` against every buffered fact, calling `found` once
    /// per successful match.
    pub fn ask(&self, query: &Value, bindings: &Bindings, mut found: impl FnMut(Bindings)) {
        self.walk(|n| {
            if let NodeKind::Buffer(_) | NodeKind::UniqueBuffer { .. } = n.kind() {
                for item in n.items() {
                    if let Some(b) = unify(query, &item, bindings) {
                        found(b);
                    }
                }
            }
        })
    }

    /// Depth-first traversal from the root, visiting each node once.
    pub fn walk(&self, mut f: impl FnMut(&'r Node<'r>)) {
        walk(self.root, &mut f)
    }

    /// Forget every stored item, leaving the topology in place.
    pub fn clear(&self) {
        self.walk(|n| n.clear())
    }

    /// Run the structural checks of every reachable node.
    pub fn validate(&self) -> Vec<GraphError> {
        let mut errors = Vec::new();
        self.walk(|n| errors.append(&mut n.validate()));
        errors
    }

    /// Render the contents of every buffer, for debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.walk(|n| {
            if n.is_buffer() {
                let _ = writeln!(out, "node {}: {} items", n.label(), n.count());
                for item in n.items() {
                    let _ = writeln!(out, "    {}", item);
                }
            }
        });
        out
    }
}

/// Arrange for `from` to send its emissions to `to`.
pub fn connect<'r>(from: &'r Node<'r>, to: &'r Node<'r>) {
    from.add_output(to);
    to.add_input(from);
}

/// Depth-first traversal over outputs, visiting each node at most once
/// despite the feedback edges.
pub fn walk<'r>(start: &'r Node<'r>, f: &mut impl FnMut(&'r Node<'r>)) {
    fn visit<'r>(
        n: &'r Node<'r>,
        f: &mut impl FnMut(&'r Node<'r>),
        visited: &mut FnvHashSet<usize>,
    ) {
        if !visited.insert(n.id()) {
            return;
        }
        f(n);
        for o in n.outputs() {
            visit(o, f, visited);
        }
    }
    let mut visited = FnvHashSet::default();
    visit(start, f, &mut visited);
}
