//! Parser-internal error accumulation.
//!
//! The parser's own notion of a failure is "unexpected token" plus a
//! position (§7's syntactic error kinds); `ember_common::EmberError` is the
//! crate-crossing representation it gets converted into once parsing is
//! done, at which point §7's "first error only" rule applies.

use ember_common::{EmberError, ParseErrorKind, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn unexpected_token(expected: impl Into<String>, found: impl Into<String>, position: Position) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found.into(),
            },
            position,
        )
    }

    pub fn primary_expression_expected(found: impl Into<String>, position: Position) -> Self {
        Self::new(ParseErrorKind::PrimaryExpressionExpected { found: found.into() }, position)
    }

    pub fn missing_terminator(expected: impl Into<String>, position: Position) -> Self {
        Self::new(ParseErrorKind::MissingTerminator { expected: expected.into() }, position)
    }
}

impl From<ParseError> for EmberError {
    fn from(err: ParseError) -> Self {
        EmberError::Parse(err.kind, err.position)
    }
}
