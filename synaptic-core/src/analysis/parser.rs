//! Structural parser
//!
//! Stage-one parsing recognizes only the outer function-definition
//! envelope: the statement must open with `[=` followed by the keyword
//! `proc` and close with `]`. Everything between those boundary tokens is
//! narrowed onto a fresh buffer and forwarded; full grammar recognition is
//! deliberately left to later stages.

use crate::lexer::{TokenKind, TokenList};

use super::{ContextAction, ContextDescriptor, ContextTarget};

/// Classify one token list into a context descriptor
///
/// On success the descriptor carries `Create`/`Function` and the token span
/// between the boundary tokens, re-based onto its own buffer. If either
/// boundary check fails the descriptor is `Error`/`None` with empty data —
/// failure is represented as data and still forwarded downstream.
pub fn classify(tokens: &TokenList) -> ContextDescriptor {
    let count = tokens.len();

    //  statement must open with `[=` then keyword `proc` ...
    let opens = expect(tokens, 0, TokenKind::Operator, "[=")
        && expect(tokens, 1, TokenKind::Keyword, "proc");
    //  ... and close with `]`
    let closes = count >= 3 && expect(tokens, count - 1, TokenKind::Operator, "]");

    if opens && closes {
        ContextDescriptor::new(
            ContextAction::Create,
            ContextTarget::Function,
            tokens.narrow(2..count - 1),
        )
    } else {
        ContextDescriptor::error()
    }
}

//  check the token at `index` for an exact kind and text match
fn expect(tokens: &TokenList, index: usize, kind: TokenKind, text: &str) -> bool {
    tokens
        .get(index)
        .is_some_and(|t| t.kind == kind && tokens.text(t) == text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use std::sync::Arc;

    fn classify_source(input: &str) -> ContextDescriptor {
        classify(&tokenize(Arc::from(input)))
    }

    #[test]
    fn test_function_definition_envelope() {
        let d = classify_source("[=proc simpleFunc :input :body ()]");
        assert_eq!(d.action, ContextAction::Create);
        assert_eq!(d.target, ContextTarget::Function);
        assert_eq!(d.data.source(), "simpleFunc :input :body ()");
    }

    #[test]
    fn test_narrowed_tokens_are_rebased() {
        let d = classify_source("[=proc f :input :body ()]");
        let first = d.data.tokens()[0];
        assert_eq!(first.offset, 0);
        assert_eq!(d.data.text(&first), "f");
    }

    #[test]
    fn test_missing_closing_bracket() {
        let d = classify_source("[=proc simpleFunc :input :body ()");
        assert_eq!(d.action, ContextAction::Error);
        assert_eq!(d.target, ContextTarget::None);
        assert!(d.data.is_empty());
    }

    #[test]
    fn test_missing_opening_envelope() {
        let d = classify_source("proc simpleFunc :input :body ()]");
        assert_eq!(d.action, ContextAction::Error);
        assert!(d.data.is_empty());
    }

    #[test]
    fn test_wrong_keyword_after_open() {
        let d = classify_source("[=var x]");
        assert_eq!(d.action, ContextAction::Error);
    }

    #[test]
    fn test_empty_statement() {
        let d = classify_source("");
        assert_eq!(d.action, ContextAction::Error);
        assert!(d.data.is_empty());
    }

    #[test]
    fn test_minimal_envelope() {
        //  nothing between the boundary tokens narrows to an empty list
        let d = classify_source("[=proc]");
        assert_eq!(d.action, ContextAction::Create);
        assert!(d.data.is_empty());
    }
}
