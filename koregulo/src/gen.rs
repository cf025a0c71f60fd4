//! Rust source generation for rule declarations.

use core::fmt::Write;
use regulo_parse::{Item, RuleDecl};

/// Generate the Rust source for the items of one rule source file.
///
/// Rule declarations are replaced by their installer and body-caller
/// functions, everything else is emitted unchanged, and a `register`
/// function appending every rule to a catalog closes the file.
pub fn generate(file: &str, items: &[Item]) -> String {
    let mut out = format!("// Generated by koregulo from {}. Do not edit.\n", file);
    let mut rules = Vec::new();
    for item in items {
        match item {
            Item::Verbatim(text) => out.push_str(text),
            Item::Rule(rule) => {
                installer(&mut out, rule);
                caller(&mut out, rule);
                rules.push(rule);
            }
        }
    }
    register(&mut out, &rules);
    out
}

/// The function wiring the rule into a rete: one type filter per
/// parameter, joined right-associatively, feeding a function node
/// whose output is fed back to the root.
fn installer(out: &mut String, rule: &RuleDecl) {
    let w = out;
    let _ = writeln!(w, "\npub fn {}(rete: &konkludi::rete::Rete) {{", rule.name);
    for (i, (_, ty)) in rule.params.iter().enumerate() {
        let _ = writeln!(w, "    let p{} = rete.type_test(\"{}\");", i, ty);
    }
    let last = rule.params.len() - 1;
    if last == 0 {
        let _ = writeln!(w, "    let previous = p0;");
    } else {
        let _ = writeln!(w, "    let mut previous = p{};", last);
        for i in (0..last).rev() {
            let _ = writeln!(
                w,
                "    previous = rete.join(\"{}-{}\", p{}, previous);",
                rule.name, i, i
            );
        }
    }
    let _ = writeln!(
        w,
        "    let rule = rete.function(\"{}\", {}_body);",
        rule.name, rule.name
    );
    let _ = writeln!(w, "    konkludi::rete::connect(previous, rule);");
    let _ = writeln!(w, "    konkludi::rete::connect(rule, rete.root());");
    let _ = writeln!(w, "}}");
}

/// The function run once per activation: it destructures the nested
/// join pairs into the declared parameter names, checks their types,
/// and runs the rule body verbatim.
fn caller(out: &mut String, rule: &RuleDecl) {
    let w = out;
    let _ = writeln!(
        w,
        "\npub fn {}_body({}: &konkludi::rete::Node, item: &konkludi::Value) {{",
        rule.name, rule.handle
    );
    if let [(name, ty)] = rule.params.as_slice() {
        let _ = writeln!(w, "    let {} = item;", name);
        let _ = writeln!(w, "    assert_eq!({}.kind_name(), \"{}\");", name, ty);
    } else {
        let _ = writeln!(w, "    let jr = item.as_seq().expect(\"join result\");");
        let last = rule.params.len() - 1;
        for (i, (name, ty)) in rule.params.iter().enumerate() {
            if i == last {
                let _ = writeln!(w, "    let {} = &jr[1];", name);
            } else {
                if i > 0 {
                    let _ =
                        writeln!(w, "    let jr = jr[1].as_seq().expect(\"join result\");");
                }
                let _ = writeln!(w, "    let {} = &jr[0];", name);
            }
            let _ = writeln!(w, "    assert_eq!({}.kind_name(), \"{}\");", name, ty);
        }
    }
    let _ = writeln!(w, "    {}", rule.body);
    let _ = writeln!(w, "}}");
}

/// The function appending every rule of the file to a catalog.
fn register(out: &mut String, rules: &[&RuleDecl]) {
    let w = out;
    let _ = writeln!(
        w,
        "\npub fn register(rules: &mut konkludi::rete::Rules) -> Result<(), konkludi::error::RulesError> {{"
    );
    for rule in rules {
        let params: Vec<String> = rule
            .params
            .iter()
            .map(|(_, ty)| format!("\"{}\"", ty))
            .collect();
        let emits: Vec<String> = rule.emits.iter().map(|ty| format!("\"{}\"", ty)).collect();
        let _ = writeln!(w, "    rules.insert(konkludi::rete::Rule::new(");
        let _ = writeln!(w, "        \"{}\",", rule.name);
        let _ = writeln!(w, "        &[{}],", params.join(", "));
        let _ = writeln!(w, "        &[{}],", emits.join(", "));
        let _ = writeln!(w, "        {},", rule.name);
        let _ = writeln!(w, "        {}_body,", rule.name);
        let _ = writeln!(w, "    ))?;");
    }
    let _ = writeln!(w, "    Ok(())");
    let _ = writeln!(w, "}}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use regulo_parse::Items;

    fn gen(src: &str) -> String {
        let items: Vec<Item> = Items::new(src).collect::<Result<_, _>>().expect("parse");
        generate("test.regulo", &items)
    }

    #[test]
    fn two_parameter_rule() {
        let got = gen("fn rule_pair(node, a: Thing1, b: Thing2) -> Pair { body(a, b) }");
        let want = r#"// Generated by koregulo from test.regulo. Do not edit.

pub fn pair(rete: &konkludi::rete::Rete) {
    let p0 = rete.type_test("Thing1");
    let p1 = rete.type_test("Thing2");
    let mut previous = p1;
    previous = rete.join("pair-0", p0, previous);
    let rule = rete.function("pair", pair_body);
    konkludi::rete::connect(previous, rule);
    konkludi::rete::connect(rule, rete.root());
}

pub fn pair_body(node: &konkludi::rete::Node, item: &konkludi::Value) {
    let jr = item.as_seq().expect("join result");
    let a = &jr[0];
    assert_eq!(a.kind_name(), "Thing1");
    let b = &jr[1];
    assert_eq!(b.kind_name(), "Thing2");
    { body(a, b) }
}

pub fn register(rules: &mut konkludi::rete::Rules) -> Result<(), konkludi::error::RulesError> {
    rules.insert(konkludi::rete::Rule::new(
        "pair",
        &["Thing1", "Thing2"],
        &["Pair"],
        pair,
        pair_body,
    ))?;
    Ok(())
}
"#;
        assert_eq!(got, want);
    }

    #[test]
    fn three_parameters_nest_to_the_right() {
        let got = gen("fn rule_r(node, a: A, b: B, c: C) { }");
        assert!(got.contains("previous = rete.join(\"r-1\", p1, previous);"));
        assert!(got.contains("previous = rete.join(\"r-0\", p0, previous);"));
        assert!(got.contains("let a = &jr[0];"));
        assert!(got.contains("let jr = jr[1].as_seq().expect(\"join result\");"));
        assert!(got.contains("let c = &jr[1];"));
    }

    #[test]
    fn single_parameter_rule_is_not_joined() {
        let got = gen("fn rule_r(node, a: A) { }");
        assert!(!got.contains("rete.join"));
        assert!(got.contains("let previous = p0;"));
        assert!(got.contains("let a = item;"));
    }

    #[test]
    fn passthrough_and_registration_order() {
        let got = gen("pub struct S;\nfn rule_r(node, a: A) { }\npub struct T;\n");
        let s = got.find("pub struct S;").unwrap();
        let r = got.find("pub fn r(").unwrap();
        let t = got.find("pub struct T;").unwrap();
        let reg = got.find("pub fn register(").unwrap();
        assert!(s < r && r < t && t < reg);
    }
}
