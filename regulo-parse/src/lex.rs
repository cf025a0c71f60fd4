//! Tokens of rule source files.

use logos::{Lexer, Logos};

#[derive(Logos, Debug, PartialEq)]
#[logos(type S = &str)]
pub enum Token<S> {
    #[token("fn")]
    Fn,

    #[token("(")]
    LPar,

    #[token(")")]
    RPar,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("&")]
    Amp,

    #[token("::")]
    PathSep,

    #[token("->")]
    Arrow,

    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident(S),

    /// A brace-balanced block, braces included.
    ///
    /// Balancing counts brace characters only; braces inside string
    /// literals are not understood, so bodies must keep them balanced.
    #[token("{", block)]
    Block(S),

    #[regex(r"[ \t\n\f\r]+")]
    #[regex("//[^\n]*")]
    #[token("/*", comment)]
    Space,

    // Logos requires one token variant to handle errors. Rule files
    // contain arbitrary host source between rule declarations, so
    // unknown characters are expected and skipped outside of rule
    // signatures.
    #[error]
    Error,
}

fn block<'s>(lex: &mut Lexer<'s, Token<&'s str>>) -> Option<&'s str> {
    let mut open = 1;
    let braces: &[_] = &['{', '}'];
    while open > 0 {
        lex.bump(lex.remainder().find(braces)?);
        if lex.remainder().starts_with('{') {
            open += 1;
        } else {
            open -= 1;
        }
        lex.bump(1);
    }
    Some(lex.slice())
}

fn comment<'s>(lex: &mut Lexer<'s, Token<&'s str>>) -> Option<()> {
    // number of open comments
    let mut open = 1;
    let prefix: &[_] = &['/', '*'];
    while open > 0 {
        lex.bump(lex.remainder().find(prefix)?);
        if lex.remainder().starts_with("/*") {
            open += 1;
            lex.bump(2);
        } else if lex.remainder().starts_with("*/") {
            open -= 1;
            lex.bump(2);
        } else {
            lex.bump(1);
        }
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    fn tokens(s: &str) -> Vec<Token<&str>> {
        Token::lexer(s).filter(|t| *t != Token::Space).collect()
    }

    #[test]
    fn signature_tokens() {
        assert_eq!(
            tokens("fn foo(a: T) -> U"),
            vec![
                Token::Fn,
                Token::Ident("foo"),
                Token::LPar,
                Token::Ident("a"),
                Token::Colon,
                Token::Ident("T"),
                Token::RPar,
                Token::Arrow,
                Token::Ident("U"),
            ]
        );
    }

    #[test]
    fn blocks_balance_nested_braces() {
        assert_eq!(
            tokens("{ a { b } c }"),
            vec![Token::Block("{ a { b } c }")]
        );
    }

    #[test]
    fn unbalanced_block_is_an_error() {
        assert!(tokens("{ a {").contains(&Token::Error));
    }

    #[test]
    fn comments_are_space() {
        assert_eq!(tokens("// line\nfn"), vec![Token::Fn]);
        assert_eq!(tokens("/* a /* nested */ b */ fn"), vec![Token::Fn]);
    }
}
