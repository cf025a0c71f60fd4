//! GraphViz rendering of node graphs.

use super::{NodeKind, Rete, Rules};
use fnv::FnvHashMap;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Render the node-and-edge structure as a GraphViz digraph.
///
/// Buffers are drawn as boxes and rules as ovals; everything else uses
/// the default shape.
pub fn to_dot(rete: &Rete) -> String {
    let mut out = String::from("digraph rete {\n");
    let mut ids = FnvHashMap::default();
    rete.walk(|n| {
        let id = ids.len();
        ids.insert(n.id(), id);
        let shape = match n.kind() {
            NodeKind::Buffer(_) | NodeKind::UniqueBuffer { .. } | NodeKind::RuleParameter(_) => {
                " shape=box"
            }
            NodeKind::Rule(_) => " shape=oval",
            _ => "",
        };
        out.push_str(&format!(
            "  n{} [label={}{}];\n",
            id,
            quote(n.label()),
            shape
        ));
    });
    rete.walk(|n| {
        for o in n.outputs() {
            out.push_str(&format!("  n{} -> n{};\n", ids[&n.id()], ids[&o.id()]));
        }
    });
    out.push_str("}\n");
    out
}

/// Result of graphing the rules and data that failed to conclude an
/// expected type.
pub struct MissingConclusion {
    /// The GraphViz source.
    pub dot: String,
    /// Number of rule nodes in the graph.
    pub rules: usize,
    /// Number of type nodes in the graph.
    pub types: usize,
}

/// Render the subgraph of catalog rules that could have produced the
/// expected type, with per-type buffer counts from the rete.
///
/// Starting from the expected type, every rule emitting it is added,
/// together with its parameter types, transitively. Reading the counts
/// off the resulting graph usually shows which input never arrived.
pub fn missing_conclusion(rete: &Rete, rules: &Rules, expected: &str) -> MissingConclusion {
    let mut counts: FnvHashMap<String, usize> = FnvHashMap::default();
    rete.walk(|n| {
        if let NodeKind::TypeTest(name) = n.kind() {
            let buffered = n.outputs().iter().find(|o| o.is_buffer()).map(|o| o.count());
            if let Some(count) = buffered {
                counts.insert(name.clone(), count);
            }
        }
    });

    let mut out = format!("digraph {} {{\n", quote(&format!("missing-{}", expected)));
    let mut graphed_types: Vec<String> = Vec::new();
    let mut graphed_rules: Vec<String> = Vec::new();
    let mut want = vec![expected.to_string()];

    while let Some(ty) = want.pop() {
        if graphed_types.contains(&ty) {
            continue;
        }
        let label = match counts.get(&ty) {
            Some(n) => format!("{}: {} items", ty, n),
            None => format!("{}: no buffer", ty),
        };
        out.push_str(&format!(
            "  {} [shape=box label={}];\n",
            quote(&ty),
            quote(&label)
        ));
        graphed_types.push(ty.clone());

        for rule in rules.iter().filter(|r| r.emits(&ty)) {
            if graphed_rules.contains(&rule.name().to_string()) {
                continue;
            }
            graphed_rules.push(rule.name().into());
            out.push_str(&format!("  {} [shape=oval];\n", quote(rule.name())));
            for t in rule.param_types() {
                out.push_str(&format!("  {} -> {};\n", quote(t), quote(rule.name())));
                want.push(t.clone());
            }
            for t in rule.emit_types() {
                out.push_str(&format!("  {} -> {};\n", quote(rule.name()), quote(t)));
            }
        }
    }
    out.push_str("}\n");

    MissingConclusion {
        dot: out,
        rules: graphed_rules.len(),
        types: graphed_types.len(),
    }
}
