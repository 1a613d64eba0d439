//! Operator semantics for the additive/multiplicative/comparison/equality
//! operand sequences (§4.7): each level left-folds its operand list through
//! one of these functions.

use crate::error::EvalError;
use crate::value::Value;

pub fn additive(operator: &str, left: Value, right: Value, line: u32) -> Result<Value, EvalError> {
    match (operator, left, right) {
        ("+", Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
        ("+", Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        ("+", Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        ("-", Value::Int(a), Value::Int(b)) => Ok(Value::Int(a - b)),
        ("-", Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        (op, ..) => Err(EvalError::arithmetic_type_mismatch(op, line)),
    }
}

pub fn multiplicative(operator: &str, left: Value, right: Value, line: u32) -> Result<Value, EvalError> {
    match (operator, left, right) {
        ("*", Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
        ("*", Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        ("/", Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                Err(EvalError::divide_by_zero(line))
            } else {
                Ok(Value::Int(a / b))
            }
        }
        ("/", Value::Float(a), Value::Float(b)) => {
            if b == 0.0 {
                Err(EvalError::divide_by_zero(line))
            } else {
                Ok(Value::Float(a / b))
            }
        }
        ("%", Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                Err(EvalError::divide_by_zero(line))
            } else {
                Ok(Value::Int(a % b))
            }
        }
        ("%", Value::Float(a), Value::Float(b)) => {
            if b == 0.0 {
                Err(EvalError::divide_by_zero(line))
            } else {
                Ok(Value::Float(a % b))
            }
        }
        (op, ..) => Err(EvalError::arithmetic_type_mismatch(op, line)),
    }
}

pub fn comparison(operator: &str, left: Value, right: Value, line: u32) -> Result<Value, EvalError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(&b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(&b),
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(&b),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return Err(EvalError::arithmetic_type_mismatch(operator, line));
    };
    let result = match operator {
        "<" => ordering.is_lt(),
        ">" => ordering.is_gt(),
        "<=" => ordering.is_le(),
        ">=" => ordering.is_ge(),
        _ => return Err(EvalError::arithmetic_type_mismatch(operator, line)),
    };
    Ok(Value::Bool(result))
}

pub fn equality(operator: &str, left: &Value, right: &Value) -> Value {
    let equal = left == right;
    Value::Bool(if operator == "==" { equal } else { !equal })
}

pub fn negate(value: Value, line: u32) -> Result<Value, EvalError> {
    match value {
        Value::Int(n) => Ok(Value::Int(-n)),
        Value::Float(n) => Ok(Value::Float(-n)),
        _ => Err(EvalError::arithmetic_type_mismatch("-", line)),
    }
}

pub fn identity(value: Value, line: u32) -> Result<Value, EvalError> {
    match value {
        Value::Int(_) | Value::Float(_) => Ok(value),
        _ => Err(EvalError::arithmetic_type_mismatch("+", line)),
    }
}

pub fn logical_not(value: Value, line: u32) -> Result<Value, EvalError> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        _ => Err(EvalError::arithmetic_type_mismatch("!", line)),
    }
}
