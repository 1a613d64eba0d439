//! Error taxonomy shared across every pipeline stage.
//!
//! Each stage owns its own `kind` enum; `EmberError` is the aggregate that
//! crosses crate boundaries so `emberc` has one type to match on and one
//! `Display` format to render, following `mesh-common::error::LexError` and
//! `mesh-parser::error::ParseError`.

use std::fmt;

use crate::position::Position;

/// Lexical-stage failures (C1, C2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// No matcher accepted any prefix of the remaining input.
    CandidatesNotFound,
    /// More than one matcher produced a longest match of equal length.
    AmbiguousMatch { candidates: Vec<String> },
    /// A single token exceeded the scanner's maximum token length.
    TokenTooLong { max_len: usize },
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::CandidatesNotFound => write!(f, "no matching token"),
            LexErrorKind::AmbiguousMatch { candidates } => {
                write!(f, "ambiguous match among [{}]", candidates.join(", "))
            }
            LexErrorKind::TokenTooLong { max_len } => {
                write!(f, "token exceeds maximum length of {max_len}")
            }
        }
    }
}

/// Syntactic-stage failures (C4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Saw one token kind where the grammar demanded another.
    UnexpectedToken { expected: String, found: String },
    /// A primary expression was required but the next token starts no known one.
    PrimaryExpressionExpected { found: String },
    /// A statement or block is missing its required terminator.
    MissingTerminator { expected: String },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ParseErrorKind::PrimaryExpressionExpected { found } => {
                write!(f, "expected a primary expression, found {found}")
            }
            ParseErrorKind::MissingTerminator { expected } => {
                write!(f, "missing {expected}")
            }
        }
    }
}

/// Semantic-stage failures (C8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticErrorKind {
    /// A name was referenced with no declaration visible in the closure chain.
    DeclarationNotFound { name: String },
    /// A name was declared twice in the same scope.
    InvalidRedeclaration { name: String },
    /// A `let`-bound name was the target of an assignment.
    Reassign { name: String },
    /// Two unit types failed to match where the grammar requires agreement.
    TypeMismatch { expected: String, found: String },
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticErrorKind::DeclarationNotFound { name } => {
                write!(f, "'{name}' is not declared")
            }
            SemanticErrorKind::InvalidRedeclaration { name } => {
                write!(f, "'{name}' is already declared in this scope")
            }
            SemanticErrorKind::Reassign { name } => {
                write!(f, "cannot reassign '{name}' declared with let")
            }
            SemanticErrorKind::TypeMismatch { expected, found } => {
                write!(f, "expected type {expected}, found {found}")
            }
        }
    }
}

/// Evaluation-stage failures (C9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// A call target was not a callable value.
    NotCallable,
    /// A `for ... in` target was not an iterable value.
    NotIterable,
    /// An index into a list fell outside its bounds.
    IndexOutOfRange { index: i64, len: usize },
    /// Integer or float division by zero.
    DivideByZero,
    /// An arithmetic or comparison operator received operands of mismatched
    /// runtime type.
    ArithmeticTypeMismatch { operator: String },
    /// A builtin or operator recognized the shape but not this combination.
    NotImplemented { what: String },
    /// An identifier had no binding visible at evaluation time. Unreachable
    /// once semantic analysis has run (it validates every identifier first);
    /// kept as a distinct kind rather than folded into `NotImplemented` so it
    /// can't be mistaken for the navigation-suffix case that kind is for.
    DeclarationNotFound { name: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErrorKind::NotCallable => write!(f, "value is not callable"),
            EvalErrorKind::NotIterable => write!(f, "value is not iterable"),
            EvalErrorKind::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            EvalErrorKind::DivideByZero => write!(f, "division by zero"),
            EvalErrorKind::ArithmeticTypeMismatch { operator } => {
                write!(f, "operator '{operator}' applied to mismatched types")
            }
            EvalErrorKind::NotImplemented { what } => write!(f, "not implemented: {what}"),
            EvalErrorKind::DeclarationNotFound { name } => write!(f, "'{name}' is not declared"),
        }
    }
}

/// A single point-of-failure error, tagged with the stage it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmberError {
    Lex(LexErrorKind, Position),
    Parse(ParseErrorKind, Position),
    Semantic(SemanticErrorKind, Position),
    Eval(EvalErrorKind, Position),
}

impl EmberError {
    pub fn position(&self) -> Position {
        match self {
            EmberError::Lex(_, p) => *p,
            EmberError::Parse(_, p) => *p,
            EmberError::Semantic(_, p) => *p,
            EmberError::Eval(_, p) => *p,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            EmberError::Lex(..) => "lex",
            EmberError::Parse(..) => "parse",
            EmberError::Semantic(..) => "semantic",
            EmberError::Eval(..) => "eval",
        }
    }
}

impl fmt::Display for EmberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.position();
        match self {
            EmberError::Lex(kind, _) => write!(f, "{}: {kind} at {pos}", self.stage()),
            EmberError::Parse(kind, _) => write!(f, "{}: {kind} at {pos}", self.stage()),
            EmberError::Semantic(kind, _) => write!(f, "{}: {kind} at {pos}", self.stage()),
            EmberError::Eval(kind, _) => write!(f, "{}: {kind} at {pos}", self.stage()),
        }
    }
}

impl std::error::Error for EmberError {}

impl From<(LexErrorKind, Position)> for EmberError {
    fn from((kind, pos): (LexErrorKind, Position)) -> Self {
        EmberError::Lex(kind, pos)
    }
}

impl From<(ParseErrorKind, Position)> for EmberError {
    fn from((kind, pos): (ParseErrorKind, Position)) -> Self {
        EmberError::Parse(kind, pos)
    }
}

impl From<(SemanticErrorKind, Position)> for EmberError {
    fn from((kind, pos): (SemanticErrorKind, Position)) -> Self {
        EmberError::Semantic(kind, pos)
    }
}

impl From<(EvalErrorKind, Position)> for EmberError {
    fn from((kind, pos): (EvalErrorKind, Position)) -> Self {
        EmberError::Eval(kind, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format_is_stage_kind_at_position() {
        let err = EmberError::Semantic(
            SemanticErrorKind::DeclarationNotFound {
                name: "x".to_string(),
            },
            Position::new(3, 4),
        );
        assert_eq!(err.to_string(), "semantic: 'x' is not declared at 3:4");
    }

    #[test]
    fn position_is_extracted_regardless_of_stage() {
        let err = EmberError::Eval(EvalErrorKind::DivideByZero, Position::new(10, 1));
        assert_eq!(err.position(), Position::new(10, 1));
        assert_eq!(err.stage(), "eval");
    }

    #[test]
    fn from_tuple_conversions() {
        let err: EmberError = (LexErrorKind::CandidatesNotFound, Position::start()).into();
        assert!(matches!(
            err,
            EmberError::Lex(LexErrorKind::CandidatesNotFound, _)
        ));
    }
}
