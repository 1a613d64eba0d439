//! Semantic-analysis error type: a `kind` plus the source position it was
//! raised at, converting into `ember_common::EmberError` at the crate
//! boundary — same shape as `ember_parser::error::ParseError`.

use ember_common::{EmberError, Position, SemanticErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub struct SemaError {
    pub kind: SemanticErrorKind,
    pub position: Position,
}

impl SemaError {
    pub fn new(kind: SemanticErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn declaration_not_found(name: impl Into<String>, line: u32) -> Self {
        Self::new(SemanticErrorKind::DeclarationNotFound { name: name.into() }, Position::new(line, 0))
    }

    pub fn invalid_redeclaration(name: impl Into<String>, line: u32) -> Self {
        Self::new(SemanticErrorKind::InvalidRedeclaration { name: name.into() }, Position::new(line, 0))
    }

    pub fn reassign(name: impl Into<String>, line: u32) -> Self {
        Self::new(SemanticErrorKind::Reassign { name: name.into() }, Position::new(line, 0))
    }

    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>, line: u32) -> Self {
        Self::new(
            SemanticErrorKind::TypeMismatch { expected: expected.into(), found: found.into() },
            Position::new(line, 0),
        )
    }
}

impl From<SemaError> for EmberError {
    fn from(err: SemaError) -> Self {
        EmberError::Semantic(err.kind, err.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_ember_error_semantic_variant() {
        let err = SemaError::reassign("x", 3);
        let ember: EmberError = err.into();
        assert_eq!(ember.stage(), "semantic");
    }
}
