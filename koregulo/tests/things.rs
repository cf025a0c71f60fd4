//! Translation of the demonstration rule file.

use koregulo::generate;
use regulo_parse::{Item, Items};

#[test]
fn demo_rules_translate() {
    let src = include_str!("../../demos/things.regulo");
    let items: Vec<Item> = Items::new(src).collect::<Result<_, _>>().expect("parse");
    assert_eq!(
        items.iter().filter(|i| matches!(i, Item::Rule(_))).count(),
        1
    );

    let code = generate("things.regulo", &items);
    assert!(code.contains("pub fn thing3(rete: &konkludi::rete::Rete)"));
    assert!(code.contains("previous = rete.join(\"thing3-0\", p0, previous);"));
    assert!(code.contains("pub fn thing3_body(node: &konkludi::rete::Node, item: &konkludi::Value)"));
    assert!(code.contains("&[\"Thing1\", \"Thing2\", \"Thing2\"],"));
    assert!(code.contains("&[\"Thing3\"],"));
    // the type helpers pass through unchanged
    assert!(code.contains("pub fn thing1_type() -> Rc<RecordType>"));
}
