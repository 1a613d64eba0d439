//! Bootstrap builtins (§4.7): installed into the root closure before any
//! user code runs. `print` and `test_print` need access to the evaluator's
//! output sinks, so they're dispatched here rather than stored as ordinary
//! closures over captured state.

use crate::closure::Closure;
use crate::error::EvalError;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinId {
    Print,
    Str,
    Len,
    Range,
    Append,
    Remove,
    TestPrint,
}

pub fn register(closure: &mut Closure) {
    closure.declare_function("print", Value::Builtin(BuiltinId::Print));
    closure.declare_function("str", Value::Builtin(BuiltinId::Str));
    closure.declare_function("len", Value::Builtin(BuiltinId::Len));
    closure.declare_function("range", Value::Builtin(BuiltinId::Range));
    closure.declare_function("append", Value::Builtin(BuiltinId::Append));
    closure.declare_function("remove", Value::Builtin(BuiltinId::Remove));
    closure.declare_function("test_print", Value::Builtin(BuiltinId::TestPrint));
}

/// Arguments are already evaluated, left-to-right (§5's ordering rule).
/// Missing an expected argument surfaces as `NotImplemented` — the semantic
/// analyzer doesn't arity-check calls (§9's note on C8's scope), so a
/// malformed builtin call can only be caught here, and the error taxonomy
/// (§7) has no dedicated arity-mismatch kind.
pub fn call(
    id: BuiltinId,
    mut args: Vec<Value>,
    stdout: &mut dyn std::io::Write,
    test_output: &mut Vec<String>,
    line: u32,
) -> Result<Value, EvalError> {
    match id {
        BuiltinId::Print => {
            let value = arg(&mut args, 0, line)?;
            writeln!(stdout, "{value}").map_err(|_| EvalError::not_implemented("stdout write failed", line))?;
            Ok(Value::None)
        }
        BuiltinId::TestPrint => {
            let value = arg(&mut args, 0, line)?;
            test_output.push(value.to_string());
            Ok(Value::None)
        }
        BuiltinId::Str => {
            let value = arg(&mut args, 0, line)?;
            Ok(Value::Str(value.to_string()))
        }
        BuiltinId::Len => match arg(&mut args, 0, line)? {
            Value::List(items) => Ok(Value::Int(items.borrow().len() as i64)),
            Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
            other => Err(EvalError::not_implemented(format!("len() of a {}", other.type_name()), line)),
        },
        BuiltinId::Range => match arg(&mut args, 0, line)? {
            Value::Int(n) => Ok(Value::list((0..n).map(Value::Int).collect())),
            other => Err(EvalError::not_implemented(format!("range() over a {}", other.type_name()), line)),
        },
        BuiltinId::Append => {
            let value = arg(&mut args, 0, line)?;
            match arg(&mut args, 1, line)? {
                Value::List(items) => {
                    items.borrow_mut().push(value);
                    Ok(Value::None)
                }
                other => Err(EvalError::not_implemented(format!("append() into a {}", other.type_name()), line)),
            }
        }
        BuiltinId::Remove => {
            let value = arg(&mut args, 0, line)?;
            match arg(&mut args, 1, line)? {
                Value::List(items) => {
                    let mut items = items.borrow_mut();
                    match items.iter().position(|item| *item == value) {
                        Some(pos) => {
                            items.remove(pos);
                            Ok(Value::None)
                        }
                        // Mirrors `list.remove`'s ValueError on a value not present.
                        None => Err(EvalError::not_implemented(format!("remove() of absent value {value}"), line)),
                    }
                }
                other => Err(EvalError::not_implemented(format!("remove() from a {}", other.type_name()), line)),
            }
        }
    }
}

fn arg(args: &mut Vec<Value>, index: usize, line: u32) -> Result<Value, EvalError> {
    if index >= args.len() {
        return Err(EvalError::not_implemented("missing builtin argument", line));
    }
    Ok(std::mem::replace(&mut args[index], Value::None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_builds_a_list_of_ints() {
        let mut out = Vec::new();
        let mut sink = std::io::sink();
        let v = call(BuiltinId::Range, vec![Value::Int(3)], &mut sink, &mut out, 1).unwrap();
        assert_eq!(v, Value::list(vec![Value::Int(0), Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn append_mutates_the_shared_list() {
        let mut out = Vec::new();
        let mut sink = std::io::sink();
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        call(BuiltinId::Append, vec![Value::Int(3), list.clone()], &mut sink, &mut out, 1).unwrap();
        assert_eq!(list.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn remove_drops_first_matching_value() {
        let mut out = Vec::new();
        let mut sink = std::io::sink();
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
        call(BuiltinId::Remove, vec![Value::Int(1), list.clone()], &mut sink, &mut out, 1).unwrap();
        assert_eq!(list.to_string(), "[2, 1]");
    }

    #[test]
    fn remove_of_absent_value_is_an_error() {
        let mut out = Vec::new();
        let mut sink = std::io::sink();
        let list = Value::list(vec![Value::Int(1)]);
        let err = call(BuiltinId::Remove, vec![Value::Int(9), list.clone()], &mut sink, &mut out, 1).unwrap_err();
        assert!(matches!(err.kind, ember_common::EvalErrorKind::NotImplemented { .. }));
        assert_eq!(list.to_string(), "[1]");
    }

    #[test]
    fn test_print_appends_to_the_capture_sink() {
        let mut out = Vec::new();
        let mut sink = std::io::sink();
        call(BuiltinId::TestPrint, vec![Value::Int(10)], &mut sink, &mut out, 1).unwrap();
        assert_eq!(out, vec!["10".to_string()]);
    }
}
