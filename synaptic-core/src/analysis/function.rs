//! Minimal function-definition grammar
//!
//! A nested helper over the narrowed token span of a `Create`/`Function`
//! descriptor: `name ":" input {param [","]}* ":" body "(" ... ")"`. Its
//! outcome does not feed back into the descriptor classification.

use crate::lexer::{Token, TokenKind, TokenList};

/// A declared function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Declared type; `None` means "not yet inferred"
    pub ty: Option<String>,
}

impl Parameter {
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }
}

/// A structurally recognized function definition
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// Body tokens, relative to the descriptor's narrowed buffer
    pub body: Vec<Token>,
}

/// Attempt to read a function definition from a narrowed token span
///
/// Returns `None` on the first grammar violation; the caller decides
/// whether that matters.
pub fn parse_function(data: &TokenList) -> Option<Function> {
    let mut cursor = Cursor::new(data);

    let name = cursor.identifier()?;
    cursor.operator(":")?;
    let parameters = cursor.parameters()?;
    cursor.operator(":")?;
    let body = cursor.body()?;

    Some(Function {
        name,
        parameters,
        body,
    })
}

//  token-list cursor with single-token lookahead consumption
struct Cursor<'a> {
    data: &'a TokenList,
    index: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a TokenList) -> Self {
        Self { data, index: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.data.get(self.index)
    }

    //  consume a token matching kind (and text, when given)
    fn eat(&mut self, kind: TokenKind, text: Option<&str>) -> Option<&'a Token> {
        let token = self.peek()?;
        if token.kind != kind {
            return None;
        }
        if let Some(expected) = text {
            if self.data.text(token) != expected {
                return None;
            }
        }
        self.index += 1;
        Some(token)
    }

    fn operator(&mut self, text: &str) -> Option<()> {
        self.eat(TokenKind::Operator, Some(text)).map(|_| ())
    }

    fn identifier(&mut self) -> Option<String> {
        let token = self.eat(TokenKind::Identifier, None)?;
        Some(self.data.text(token).to_string())
    }

    //  parameter list: prefix `input`, then identifiers with optional commas
    fn parameters(&mut self) -> Option<Vec<Parameter>> {
        self.eat(TokenKind::Keyword, Some("input"))?;

        let mut parameters = Vec::new();
        while self.peek().is_some_and(|t| t.kind != TokenKind::Operator) {
            let name = self.identifier()?;
            parameters.push(Parameter::untyped(name));
            self.operator(",");
        }
        Some(parameters)
    }

    //  body: prefix `body`, then a balanced-paren token run
    fn body(&mut self) -> Option<Vec<Token>> {
        self.eat(TokenKind::Keyword, Some("body"))?;
        self.operator("(")?;

        let mut body = Vec::new();
        let mut balance = 1;
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Operator {
                match self.data.text(token) {
                    "(" => balance += 1,
                    ")" => balance -= 1,
                    _ => {}
                }
            }
            if balance == 0 {
                break;
            }
            body.push(*token);
            self.index += 1;
        }
        if balance != 0 {
            return None; //  unbalanced parens
        }
        self.operator(")")?;
        Some(body)
    }
}
