use logos::Logos;
use std::fmt;

use super::SnbtError;

/// SNBT token.
///
/// Numbers, booleans and unquoted strings are all `Token::Word`; the parser
/// decides what a word means from its suffix.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Left brace `{`.
    LBrace,
    /// Right brace `}`.
    RBrace,
    /// Left bracket `[`.
    LBracket,
    /// Right bracket `]`.
    RBracket,
    /// Key separator `:`.
    Colon,
    /// Array type separator `;`.
    Semicolon,
    /// Element separator `,`.
    Comma,
    /// Quoted string, escapes already processed.
    Str(String),
    /// Unquoted word.
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Word(w) => write!(f, "{w}"),
        }
    }
}

#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r"'([^'\\]|\\.)*'")]
    SingleQuoted,

    #[regex(r"[A-Za-z0-9._+\-]+")]
    Word,
}

/// Lex SNBT into `(Token, Span)` pairs, collecting every error instead of
/// stopping at the first one.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<SnbtError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = match result {
            Ok(RawToken::LBrace) => Token::LBrace,
            Ok(RawToken::RBrace) => Token::RBrace,
            Ok(RawToken::LBracket) => Token::LBracket,
            Ok(RawToken::RBracket) => Token::RBracket,
            Ok(RawToken::Colon) => Token::Colon,
            Ok(RawToken::Semicolon) => Token::Semicolon,
            Ok(RawToken::Comma) => Token::Comma,
            Ok(RawToken::DoubleQuoted) | Ok(RawToken::SingleQuoted) => {
                let slice = lexer.slice();
                Token::Str(unescape(&slice[1..slice.len() - 1]))
            }
            Ok(RawToken::Word) => Token::Word(lexer.slice().to_string()),
            Err(()) => {
                errors.push(SnbtError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span]),
                });
                continue;
            }
        };
        tokens.push((token, span));
    }

    (tokens, errors)
}

/// Drop the backslash from every escape pair.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
