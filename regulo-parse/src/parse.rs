//! Parsing of rule declarations out of item source.

use crate::lex::Token;
use crate::RULE_PREFIX;
use core::fmt::{self, Display};
use core::ops::Range;
use logos::Logos;

/// One top-level item of a rule source file.
#[derive(Debug, PartialEq)]
pub enum Item<'s> {
    /// A rule declaration.
    Rule(RuleDecl<'s>),
    /// Source text that is not part of any rule declaration,
    /// passed through unchanged.
    Verbatim(&'s str),
}

/// A parsed rule declaration.
///
/// For `fn rule_alarm(node, s: Sensor, r: Reading) -> Alarm { … }`,
/// the name is `alarm`, the handle is `node`, the parameters are
/// `[("s", "Sensor"), ("r", "Reading")]`, the emitted types are
/// `["Alarm"]`, and the body is the braced block, verbatim.
#[derive(Debug, PartialEq)]
pub struct RuleDecl<'s> {
    pub name: &'s str,
    pub handle: &'s str,
    pub params: Vec<(&'s str, &'s str)>,
    pub emits: Vec<&'s str>,
    pub body: &'s str,
}

/// Parse error, with the byte offset of the offending token.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    Expected { what: &'static str, offset: usize },
    NoParameters { offset: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Expected { what, offset } => {
                write!(f, "expected {} at byte {}", what, offset)
            }
            Self::NoParameters { offset } => {
                write!(f, "rule at byte {} declares no parameters", offset)
            }
        }
    }
}

/// Iterator over the items of a rule source file.
///
/// Text outside rule declarations is yielded verbatim, in order, so
/// concatenating the verbatim items and the declarations' source spans
/// reconstructs the input.
pub struct Items<'s> {
    src: &'s str,
    tokens: Tokens<'s>,
    /// end of the last item handed out
    mark: usize,
    /// rule waiting to be yielded after the text preceding it
    pending: Option<RuleDecl<'s>>,
    failed: bool,
}

impl<'s> Items<'s> {
    pub fn new(src: &'s str) -> Self {
        Self {
            src,
            tokens: Tokens::new(src),
            mark: 0,
            pending: None,
            failed: false,
        }
    }
}

impl<'s> Iterator for Items<'s> {
    type Item = Result<Item<'s>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(rule) = self.pending.take() {
            return Some(Ok(Item::Rule(rule)));
        }
        loop {
            let (token, span) = match self.tokens.next() {
                Some(t) => t,
                None => {
                    let rest = &self.src[self.mark..];
                    self.mark = self.src.len();
                    if rest.is_empty() {
                        return None;
                    }
                    return Some(Ok(Item::Verbatim(rest)));
                }
            };
            if token != Token::Fn {
                continue;
            }
            // a `fn` not declaring a rule flows into the verbatim text
            let name = match self.tokens.peek() {
                Some((Token::Ident(name), _)) if name.starts_with(RULE_PREFIX) => *name,
                _ => continue,
            };
            self.tokens.next();
            let rule = match rule_decl(&mut self.tokens, &name[RULE_PREFIX.len()..], span.start) {
                Ok(rule) => rule,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };
            let before = &self.src[self.mark..span.start];
            self.mark = self.tokens.offset();
            if before.is_empty() {
                return Some(Ok(Item::Rule(rule)));
            }
            self.pending = Some(rule);
            return Some(Ok(Item::Verbatim(before)));
        }
    }
}

fn rule_decl<'s>(
    tokens: &mut Tokens<'s>,
    name: &'s str,
    start: usize,
) -> Result<RuleDecl<'s>, Error> {
    tokens.expect(Token::LPar, "(")?;
    let handle = tokens.ident("emitter handle")?;
    if tokens.eat(Token::Colon) {
        type_name(tokens)?;
    }
    let mut params = Vec::new();
    while tokens.eat(Token::Comma) {
        let param = tokens.ident("parameter name")?;
        tokens.expect(Token::Colon, ":")?;
        let ty = type_name(tokens)?;
        params.push((param, ty));
    }
    tokens.expect(Token::RPar, ")")?;
    if params.is_empty() {
        return Err(Error::NoParameters { offset: start });
    }

    let mut emits = Vec::new();
    if tokens.eat(Token::Arrow) {
        if tokens.eat(Token::LPar) {
            emits.push(type_name(tokens)?);
            while tokens.eat(Token::Comma) {
                emits.push(type_name(tokens)?);
            }
            tokens.expect(Token::RPar, ")")?;
        } else {
            emits.push(type_name(tokens)?);
        }
    }

    let body = tokens.block()?;
    Ok(RuleDecl {
        name,
        handle,
        params,
        emits,
        body,
    })
}

/// A type reference: an optional `&`, then a possibly `::`-separated
/// path. The final segment names the record type.
fn type_name<'s>(tokens: &mut Tokens<'s>) -> Result<&'s str, Error> {
    tokens.eat(Token::Amp);
    let mut name = tokens.ident("type name")?;
    while tokens.eat(Token::PathSep) {
        name = tokens.ident("type name")?;
    }
    Ok(name)
}

/// Token stream with one token of lookahead, skipping whitespace and
/// comments.
struct Tokens<'s> {
    lexer: logos::Lexer<'s, Token<&'s str>>,
    peeked: Option<(Token<&'s str>, Range<usize>)>,
}

impl<'s> Tokens<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            lexer: Token::lexer(src),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Option<&(Token<&'s str>, Range<usize>)> {
        if self.peeked.is_none() {
            loop {
                let token = self.lexer.next()?;
                if token == Token::Space {
                    continue;
                }
                self.peeked = Some((token, self.lexer.span()));
                break;
            }
        }
        self.peeked.as_ref()
    }

    fn next(&mut self) -> Option<(Token<&'s str>, Range<usize>)> {
        self.peek();
        self.peeked.take()
    }

    /// Byte offset right after the last consumed token.
    fn offset(&self) -> usize {
        match &self.peeked {
            Some((_, span)) => span.start,
            None => self.lexer.span().end,
        }
    }

    fn at(&mut self) -> usize {
        match self.peek() {
            Some((_, span)) => span.start,
            None => self.lexer.span().end,
        }
    }

    fn eat(&mut self, want: Token<&'s str>) -> bool {
        if matches!(self.peek(), Some((token, _)) if *token == want) {
            self.peeked = None;
            return true;
        }
        false
    }

    fn expect(&mut self, want: Token<&'s str>, what: &'static str) -> Result<(), Error> {
        if self.eat(want) {
            return Ok(());
        }
        Err(Error::Expected {
            what,
            offset: self.at(),
        })
    }

    fn ident(&mut self, what: &'static str) -> Result<&'s str, Error> {
        if let Some((Token::Ident(name), _)) = self.peek() {
            let name = *name;
            self.peeked = None;
            return Ok(name);
        }
        Err(Error::Expected {
            what,
            offset: self.at(),
        })
    }

    fn block(&mut self) -> Result<&'s str, Error> {
        if let Some((Token::Block(body), _)) = self.peek() {
            let body = *body;
            self.peeked = None;
            return Ok(body);
        }
        Err(Error::Expected {
            what: "rule body",
            offset: self.at(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(src: &str) -> Vec<Item> {
        Items::new(src).collect::<Result<_, _>>().expect("parse")
    }

    #[test]
    fn plain_source_passes_through() {
        let src = "struct Thing1 { id: String }\n\nfn helper() -> u32 { 4 }\n";
        assert_eq!(items(src), vec![Item::Verbatim(src)]);
    }

    #[test]
    fn rule_declaration() {
        let src = "fn rule_thing3(node, t1: Thing1, t2a: Thing2, t2b: Thing2) -> Thing3 {\n    body()\n}";
        let got = items(src);
        assert_eq!(got.len(), 1);
        match &got[0] {
            Item::Rule(rule) => {
                assert_eq!(rule.name, "thing3");
                assert_eq!(rule.handle, "node");
                assert_eq!(
                    rule.params,
                    vec![("t1", "Thing1"), ("t2a", "Thing2"), ("t2b", "Thing2")]
                );
                assert_eq!(rule.emits, vec!["Thing3"]);
                assert_eq!(rule.body, "{\n    body()\n}");
            }
            other => panic!("expected a rule, got {:?}", other),
        }
    }

    #[test]
    fn typed_handle_and_paths() {
        let src = "fn rule_r(node: &rete::Node, a: demo::Thing) { }";
        match &items(src)[0] {
            Item::Rule(rule) => {
                assert_eq!(rule.handle, "node");
                assert_eq!(rule.params, vec![("a", "Thing")]);
                assert_eq!(rule.emits, Vec::<&str>::new());
            }
            other => panic!("expected a rule, got {:?}", other),
        }
    }

    #[test]
    fn emit_tuples() {
        let src = "fn rule_r(node, a: T) -> (U, V) { }";
        match &items(src)[0] {
            Item::Rule(rule) => assert_eq!(rule.emits, vec!["U", "V"]),
            other => panic!("expected a rule, got {:?}", other),
        }
    }

    #[test]
    fn text_around_rules_is_preserved() {
        let src = "before();\nfn rule_r(node, a: T) { x() }\nafter();\n";
        let got = items(src);
        assert_eq!(got.len(), 3);
        assert_eq!(got[0], Item::Verbatim("before();\n"));
        assert!(matches!(got[1], Item::Rule(_)));
        assert_eq!(got[2], Item::Verbatim("\nafter();\n"));
    }

    #[test]
    fn non_rule_fns_are_verbatim() {
        let src = "fn helper(x: u32) -> u32 { x }";
        assert_eq!(items(src), vec![Item::Verbatim(src)]);
    }

    #[test]
    fn nested_fns_inside_bodies_are_invisible() {
        let src = "impl T { fn rule_not_top_level(node, a: T) { } }";
        assert_eq!(items(src), vec![Item::Verbatim(src)]);
    }

    #[test]
    fn missing_parameters() {
        let err = Items::new("fn rule_r(node) { }")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert_eq!(err, Error::NoParameters { offset: 0 });
    }

    #[test]
    fn broken_signature() {
        let err = Items::new("fn rule_r(node, a T) { }")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert!(matches!(err, Error::Expected { what: ":", .. }));
    }
}
