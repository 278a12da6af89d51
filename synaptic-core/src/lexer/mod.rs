//! Character-level tokenizer
//!
//! A single left-to-right scan over a statement buffer. The scan never
//! fails: unrecognized characters become [`TokenKind::Invalid`] tokens and
//! scanning continues.

mod token;

pub use token::{Token, TokenKind, TokenList};

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::trace;

use crate::hub::{HubContext, ServiceKind, SynapticService};

/// The closed, case-sensitive keyword set
static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "proc", "input", "body", "if", "then", "else", "var", "call", "with", "while", "do",
        "for", "in", "match", "case",
    ]
    .into_iter()
    .collect()
});

//  Symbols: [ ] ( ) { } : ,
fn is_symbol(c: char) -> bool {
    matches!(c, '[' | ']' | '(' | ')' | '{' | '}' | ':' | ',')
}

//  Operators: + - * / % = ! < > ^
fn is_operator(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '^'
    )
}

/// Tokenize one statement buffer
///
/// Whitespace runs are skipped without emitting tokens; empty or
/// all-whitespace input yields an empty list sharing the given buffer.
pub fn tokenize(source: Arc<str>) -> TokenList {
    let tokens = scan(&source);
    trace!(target: "synaptic::lexer", tokens = tokens.len(), "scanned statement");
    TokenList::new(source, tokens)
}

fn scan(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((at, c)) = chars.next() {
        //  skip white space
        if c.is_whitespace() {
            continue;
        }
        //  recognize "[=" as a single two-character operator
        if c == '[' && matches!(chars.peek(), Some(&(_, '='))) {
            chars.next();
            tokens.push(Token::new(TokenKind::Operator, at, 2));
            continue;
        }
        //  recognize operators & symbols
        if is_symbol(c) || is_operator(c) {
            //  TODO: handle multi-character operators other than "[="
            tokens.push(Token::new(TokenKind::Operator, at, c.len_utf8()));
            continue;
        }
        //  recognize identifiers or keywords
        if c.is_alphabetic() || c == '_' {
            let mut length = c.len_utf8();
            while let Some(&(_, next)) = chars.peek() {
                if next.is_alphanumeric() || next == '_' {
                    length += next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let kind = if KEYWORDS.contains(&source[at..at + length]) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, at, length));
            continue;
        }
        //  recognize numbers: consecutive digits only
        if c.is_ascii_digit() {
            let mut length = 1;
            while let Some(&(_, next)) = chars.peek() {
                if next.is_ascii_digit() {
                    length += 1;
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::new(TokenKind::Number, at, length));
            continue;
        }
        //  fall through: invalid character, keep scanning
        tokens.push(Token::new(TokenKind::Invalid, at, c.len_utf8()));
    }

    tokens
}

/// Tokenizer service registered with the hub
///
/// The scan itself is stateless; the service exists so callers locate the
/// tokenizer by capability like every other component.
#[derive(Debug, Default)]
pub struct LexerService {}

impl LexerService {
    pub fn new() -> Self {
        Self {}
    }

    /// Tokenize the given statement buffer
    pub fn tokenize(&self, source: Arc<str>) -> TokenList {
        tokenize(source)
    }
}

impl SynapticService for LexerService {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Lexer
    }

    fn on_registered(&self, _hub: &HubContext<'_>) -> Result<(), crate::error::HubError> {
        //  nothing to wire up
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
        self
    }
}
