//! Evaluation error type: a `kind` plus the source position it was raised
//! at, same shape as `ember_sema::error::SemaError`.

use ember_common::{EmberError, EvalErrorKind, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub position: Position,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, line: u32) -> Self {
        Self { kind, position: Position::new(line, 0) }
    }

    pub fn not_callable(line: u32) -> Self {
        Self::new(EvalErrorKind::NotCallable, line)
    }

    pub fn not_iterable(line: u32) -> Self {
        Self::new(EvalErrorKind::NotIterable, line)
    }

    pub fn index_out_of_range(index: i64, len: usize, line: u32) -> Self {
        Self::new(EvalErrorKind::IndexOutOfRange { index, len }, line)
    }

    pub fn divide_by_zero(line: u32) -> Self {
        Self::new(EvalErrorKind::DivideByZero, line)
    }

    pub fn arithmetic_type_mismatch(operator: impl Into<String>, line: u32) -> Self {
        Self::new(EvalErrorKind::ArithmeticTypeMismatch { operator: operator.into() }, line)
    }

    pub fn not_implemented(what: impl Into<String>, line: u32) -> Self {
        Self::new(EvalErrorKind::NotImplemented { what: what.into() }, line)
    }

    pub fn declaration_not_found(name: impl Into<String>, line: u32) -> Self {
        Self::new(EvalErrorKind::DeclarationNotFound { name: name.into() }, line)
    }
}

impl From<EvalError> for EmberError {
    fn from(err: EvalError) -> Self {
        EmberError::Eval(err.kind, err.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_ember_error_eval_variant() {
        let err = EvalError::divide_by_zero(4);
        let ember: EmberError = err.into();
        assert_eq!(ember.stage(), "eval");
    }
}
