//! Token types
//!
//! A [`Token`] is a `(kind, offset, length)` view into a shared source
//! buffer; it never owns text. Many tokens share one buffer, and a token is
//! only meaningful together with the [`TokenList`] it belongs to.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// The lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A character (or run) the lexer could not classify
    Invalid,
    /// Identifier: letter or underscore start, alphanumeric/underscore run
    Identifier,
    /// Symbol or operator character, or the compound `[=`
    Operator,
    /// One of the closed keyword set
    Keyword,
    /// Consecutive digit run
    Number,
}

/// A classified view into a source buffer
///
/// `offset` and `length` are byte positions into the owning buffer's UTF-8
/// text and always fall on character boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    pub length: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }

    /// Byte offset one past the end of this token
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// An ordered token sequence together with the buffer it indexes
///
/// This is the unit of work flowing through the pipeline: the parse stage
/// consumes whole token lists, and narrowing produces a fresh list backed by
/// its own rebuilt buffer.
#[derive(Debug, Clone)]
pub struct TokenList {
    source: Arc<str>,
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(source: Arc<str>, tokens: Vec<Token>) -> Self {
        Self { source, tokens }
    }

    /// A list with no tokens and an empty backing buffer
    pub fn empty() -> Self {
        Self {
            source: Arc::from(""),
            tokens: Vec::new(),
        }
    }

    /// The full text of the backing buffer
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The text covered by one of this list's tokens
    pub fn text(&self, token: &Token) -> &str {
        &self.source[token.offset..token.end()]
    }

    /// Narrow to a subset of tokens, rebuilding the backing buffer
    ///
    /// The bytes covered by the subset (first token start to last token end)
    /// are copied exactly once into a fresh buffer, and every retained
    /// token's offset is re-based onto the new buffer's origin. An empty
    /// range yields an empty list.
    pub fn narrow(&self, range: Range<usize>) -> TokenList {
        let subset = &self.tokens[range];
        let (Some(first), Some(last)) = (subset.first(), subset.last()) else {
            return TokenList::empty();
        };
        let start = first.offset;
        let source: Arc<str> = Arc::from(&self.source[start..last.end()]);
        let tokens = subset
            .iter()
            .map(|t| Token::new(t.kind, t.offset - start, t.length))
            .collect();
        TokenList::new(source, tokens)
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(source: &str, tokens: Vec<Token>) -> TokenList {
        TokenList::new(Arc::from(source), tokens)
    }

    #[test]
    fn test_token_text() {
        let l = list(
            "ab cd",
            vec![
                Token::new(TokenKind::Identifier, 0, 2),
                Token::new(TokenKind::Identifier, 3, 2),
            ],
        );
        assert_eq!(l.text(&l.tokens()[0]), "ab");
        assert_eq!(l.text(&l.tokens()[1]), "cd");
    }

    #[test]
    fn test_narrow_rebases_offsets() {
        let l = list(
            "[= proc name ]",
            vec![
                Token::new(TokenKind::Operator, 0, 2),
                Token::new(TokenKind::Keyword, 3, 4),
                Token::new(TokenKind::Identifier, 8, 4),
                Token::new(TokenKind::Operator, 13, 1),
            ],
        );
        let narrowed = l.narrow(2..3);
        assert_eq!(narrowed.source(), "name");
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed.tokens()[0].offset, 0);
        assert_eq!(narrowed.text(&narrowed.tokens()[0]), "name");
    }

    #[test]
    fn test_narrow_keeps_interior_gaps() {
        let l = list(
            "a  +  b",
            vec![
                Token::new(TokenKind::Identifier, 0, 1),
                Token::new(TokenKind::Operator, 3, 1),
                Token::new(TokenKind::Identifier, 6, 1),
            ],
        );
        let narrowed = l.narrow(0..3);
        assert_eq!(narrowed.source(), "a  +  b");
        assert_eq!(narrowed.text(&narrowed.tokens()[1]), "+");
    }

    #[test]
    fn test_narrow_empty_range() {
        let l = list("ab", vec![Token::new(TokenKind::Identifier, 0, 2)]);
        let narrowed = l.narrow(1..1);
        assert!(narrowed.is_empty());
        assert_eq!(narrowed.source(), "");
    }
}
