//! The tree-walking evaluator itself (§4.7's node-evaluation contract).
//!
//! A loop's break flag is a plain `bool` on a stack, one entry per
//! dynamically-enclosing `for`/`while` (§2's "`LoopContext` is a simple
//! linked flag, not a value stack" — only the innermost is ever read or
//! set). Every nested statements-block's own execution loop rechecks the
//! innermost flag before continuing to its next statement, so a `break`
//! buried inside an `if` unwinds every enclosing block without any explicit
//! propagation value — it just stops each level's iteration in turn as
//! control returns up to it.
//!
//! A `return` does *not* stop its enclosing block early (§4.7: "the value
//! of the block is the value of its **last** return statement, if any") —
//! matching the original, which keeps overwriting a `return_value` variable
//! as it runs every remaining statement in the block.

use std::io::Write;

use ember_parser::ast::{LiteralValue, Node, OperandSeq, Suffix};

use crate::builtins;
use crate::closure::{Closure, FunctionValue};
use crate::error::EvalError;
use crate::ops;
use crate::value::Value;

pub(crate) struct Evaluator<'a> {
    closure: Closure,
    loop_break_stack: Vec<bool>,
    test_output: Vec<String>,
    stdout: &'a mut dyn Write,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(closure: Closure, stdout: &'a mut dyn Write) -> Self {
        Self { closure, loop_break_stack: Vec::new(), test_output: Vec::new(), stdout }
    }

    pub(crate) fn into_test_output(self) -> Vec<String> {
        self.test_output
    }

    pub(crate) fn invoke(&mut self, callee: Value, args: Vec<Value>, line: u32) -> Result<Value, EvalError> {
        self.call_value(callee, args, line)
    }

    fn call_value(&mut self, callee: Value, args: Vec<Value>, line: u32) -> Result<Value, EvalError> {
        match callee {
            Value::Function(f) => self.call_function(&f, args, line),
            Value::Builtin(id) => builtins::call(id, args, self.stdout, &mut self.test_output, line),
            _ => Err(EvalError::not_callable(line)),
        }
    }

    fn call_function(&mut self, function: &FunctionValue, args: Vec<Value>, line: u32) -> Result<Value, EvalError> {
        let Node::FunctionDecl { params, body, .. } = function.decl.as_ref() else {
            panic!("FunctionValue always wraps a FunctionDecl node");
        };
        let caller_closure = std::mem::replace(&mut self.closure, Closure::enter_function(function));
        self.closure.push_scope();
        for (param, value) in params.iter().zip(args) {
            let Node::Param { name, .. } = param else { panic!("function params are Param nodes") };
            self.closure.declare_variable(name.clone(), value);
        }
        let result = self.eval_statements_block(body);
        let _ = line;
        self.closure = caller_closure;
        result
    }

    fn eval_statements_block(&mut self, block: &Node) -> Result<Value, EvalError> {
        let Node::StatementsBlock { statements, .. } = block else {
            panic!("eval_statements_block expects a StatementsBlock node");
        };
        self.closure.push_scope();
        let mut return_value = Value::None;
        let mut failure = None;
        for stmt in statements {
            if *self.loop_break_stack.last().unwrap_or(&false) {
                break;
            }
            match self.eval_statement(stmt) {
                Ok(value) => {
                    if matches!(stmt, Node::Return { .. }) {
                        return_value = value;
                    }
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        self.closure.pop_scope();
        match failure {
            Some(err) => Err(err),
            None => Ok(return_value),
        }
    }

    fn eval_statement(&mut self, stmt: &Node) -> Result<Value, EvalError> {
        match stmt {
            Node::Assignment { .. } => self.eval_assignment(stmt),
            Node::Return { value, .. } => match value {
                Some(expr) => self.eval_expression(expr),
                None => Ok(Value::None),
            },
            Node::Break { .. } => {
                if let Some(flag) = self.loop_break_stack.last_mut() {
                    *flag = true;
                }
                Ok(Value::None)
            }
            Node::For { binding, iterable, body, line, .. } => self.eval_for(binding, iterable, body, *line),
            Node::While { condition, body, .. } => self.eval_while(condition, body),
            other => self.eval_expression(other),
        }
    }

    fn eval_assignment(&mut self, stmt: &Node) -> Result<Value, EvalError> {
        let Node::Assignment { target, compound_operator, value, line, .. } = stmt else {
            panic!("eval_assignment expects an Assignment node");
        };
        let evaluated = self.eval_expression(value)?;
        match target.as_ref() {
            Node::VariableDecl { name, .. } => {
                self.closure.declare_variable(name.clone(), evaluated);
            }
            Node::Identifier { name, .. } => {
                let final_value = match compound_operator {
                    Some(op) => {
                        let current = self.closure.lookup(name).unwrap_or(Value::None);
                        apply_compound(op, current, evaluated, *line)?
                    }
                    None => evaluated,
                };
                self.closure.reassign(name, final_value);
            }
            other => panic!("assignment target is neither a declaration nor a bare name: {other:?}"),
        }
        Ok(Value::None)
    }

    fn eval_for(&mut self, binding: &str, iterable: &Node, body: &Node, line: u32) -> Result<Value, EvalError> {
        let iterable_value = self.eval_expression(iterable)?;
        let items: Vec<Value> = match iterable_value {
            Value::List(items) => items.borrow().clone(),
            Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
            _ => return Err(EvalError::not_iterable(line)),
        };
        self.loop_break_stack.push(false);
        let mut failure = None;
        for item in items {
            if *self.loop_break_stack.last().unwrap() {
                break;
            }
            self.closure.push_scope();
            self.closure.declare_variable(binding.to_string(), item);
            let outcome = self.eval_statements_block(body);
            self.closure.pop_scope();
            if let Err(err) = outcome {
                failure = Some(err);
                break;
            }
        }
        self.loop_break_stack.pop();
        match failure {
            Some(err) => Err(err),
            None => Ok(Value::None),
        }
    }

    fn eval_while(&mut self, condition: &Node, body: &Node) -> Result<Value, EvalError> {
        self.loop_break_stack.push(false);
        let mut failure = None;
        loop {
            let should_continue = match self.eval_expression(condition) {
                Ok(value) => truthy(&value),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            };
            if !should_continue || *self.loop_break_stack.last().unwrap() {
                break;
            }
            if let Err(err) = self.eval_statements_block(body) {
                failure = Some(err);
                break;
            }
        }
        self.loop_break_stack.pop();
        match failure {
            Some(err) => Err(err),
            None => Ok(Value::None),
        }
    }

    fn eval_expression(&mut self, node: &Node) -> Result<Value, EvalError> {
        match node {
            Node::Literal { value, .. } => Ok(match value {
                LiteralValue::Int(n) => Value::Int(*n),
                LiteralValue::Float(n) => Value::Float(*n),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Str(s) => Value::Str(s.clone()),
            }),
            Node::Identifier { name, line, .. } => self
                .closure
                .lookup(name)
                .ok_or_else(|| EvalError::declaration_not_found(name.clone(), *line)),
            Node::PrefixUnary { operator, operand, line, .. } => {
                let value = self.eval_expression(operand)?;
                match operator.as_str() {
                    "-" => ops::negate(value, *line),
                    "+" => ops::identity(value, *line),
                    "!" => ops::logical_not(value, *line),
                    _ => Err(EvalError::arithmetic_type_mismatch(operator.clone(), *line)),
                }
            }
            Node::Additive(seq) => self.eval_operand_seq(seq, ops::additive),
            Node::Multiplicative(seq) => self.eval_operand_seq(seq, ops::multiplicative),
            Node::Comparison(seq) => self.eval_operand_seq(seq, ops::comparison),
            Node::Equality(seq) => self.eval_equality(seq),
            Node::Conjunction(seq) => self.eval_conjunction(seq),
            Node::Disjunction(seq) => self.eval_disjunction(seq),
            Node::PostfixUnary { operand, suffixes, line, .. } => {
                let mut value = self.eval_expression(operand)?;
                for suffix in suffixes {
                    value = match suffix {
                        Suffix::Call(args) => {
                            let mut evaluated_args = Vec::with_capacity(args.len());
                            for arg in args {
                                evaluated_args.push(self.eval_expression(arg)?);
                            }
                            self.call_value(value, evaluated_args, *line)?
                        }
                        Suffix::Index(index_expr) => {
                            let index = self.eval_expression(index_expr)?;
                            index_value(value, index, *line)?
                        }
                        Suffix::Navigation(_) => {
                            return Err(EvalError::not_implemented("navigation suffix", *line));
                        }
                    };
                }
                Ok(value)
            }
            Node::Parenthesized { inner, .. } => self.eval_expression(inner),
            Node::CollectionLiteral { items, .. } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expression(item)?);
                }
                Ok(Value::list(values))
            }
            Node::If { condition, then_block, elifs, else_block, .. } => {
                if truthy(&self.eval_expression(condition)?) {
                    return self.eval_statements_block(then_block);
                }
                for (cond, block) in elifs {
                    if truthy(&self.eval_expression(cond)?) {
                        return self.eval_statements_block(block);
                    }
                }
                match else_block {
                    Some(block) => self.eval_statements_block(block),
                    None => Ok(Value::None),
                }
            }
            other => panic!("eval_expression called on a non-expression node: {other:?}"),
        }
    }

    fn eval_operand_seq(
        &mut self,
        seq: &OperandSeq,
        apply: fn(&str, Value, Value, u32) -> Result<Value, EvalError>,
    ) -> Result<Value, EvalError> {
        let mut operands = seq.operands.iter();
        let mut value =
            self.eval_expression(operands.next().expect("operand sequence always has at least one operand"))?;
        for operator in &seq.operators {
            let next = operands.next().expect("operators.len() == operands.len() - 1");
            let next_value = self.eval_expression(next)?;
            value = apply(operator, value, next_value, seq.line)?;
        }
        Ok(value)
    }

    fn eval_equality(&mut self, seq: &OperandSeq) -> Result<Value, EvalError> {
        let mut operands = seq.operands.iter();
        let left = self.eval_expression(operands.next().expect("equality always has a left operand"))?;
        match seq.operators.first() {
            Some(operator) => {
                let right = self.eval_expression(operands.next().expect("equality op implies a right operand"))?;
                Ok(ops::equality(operator, &left, &right))
            }
            None => Ok(left),
        }
    }

    fn eval_conjunction(&mut self, seq: &OperandSeq) -> Result<Value, EvalError> {
        for operand in &seq.operands {
            let value = self.eval_expression(operand)?;
            if !truthy(&value) {
                return Ok(Value::Bool(false));
            }
        }
        Ok(Value::Bool(true))
    }

    fn eval_disjunction(&mut self, seq: &OperandSeq) -> Result<Value, EvalError> {
        for operand in &seq.operands {
            let value = self.eval_expression(operand)?;
            if truthy(&value) {
                return Ok(Value::Bool(true));
            }
        }
        Ok(Value::Bool(false))
    }
}

fn apply_compound(operator: &str, current: Value, value: Value, line: u32) -> Result<Value, EvalError> {
    let base = &operator[..operator.len() - 1];
    match base {
        "+" | "-" => ops::additive(base, current, value, line),
        "*" | "/" | "%" => ops::multiplicative(base, current, value, line),
        _ => Err(EvalError::arithmetic_type_mismatch(operator, line)),
    }
}

fn index_value(target: Value, index: Value, line: u32) -> Result<Value, EvalError> {
    let Value::Int(i) = index else {
        return Err(EvalError::arithmetic_type_mismatch("[]", line));
    };
    match target {
        Value::List(items) => {
            let items = items.borrow();
            match normalize_index(i, items.len()).and_then(|idx| items.get(idx).cloned()) {
                Some(value) => Ok(value),
                None => Err(EvalError::index_out_of_range(i, items.len(), line)),
            }
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            match normalize_index(i, chars.len()).and_then(|idx| chars.get(idx)) {
                Some(c) => Ok(Value::Str(c.to_string())),
                None => Err(EvalError::index_out_of_range(i, chars.len(), line)),
            }
        }
        _ => Err(EvalError::not_iterable(line)),
    }
}

/// Negative indices count from the end, matching the host list semantics
/// the original interpreter inherits from Python's `__getitem__`.
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let resolved = if index < 0 { index + len } else { index };
    if resolved >= 0 && resolved < len {
        Some(resolved as usize)
    } else {
        None
    }
}

/// Host-native truthiness (§4.7 leaves `if`/`while` conditions untyped by
/// the analyzer, so evaluation falls back to the same coercion the dynamic
/// source language uses rather than demanding a strict `bool`).
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::Float(n) => *n != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::List(items) => !items.borrow().is_empty(),
        Value::None => false,
        Value::Function(_) | Value::Builtin(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::sink;

    fn run_source(src: &str) -> Vec<String> {
        let tokens = ember_lexer::tokenize(ember_grammar::DEFAULT_GRAMMAR, src).unwrap();
        let (ast, errors) = ember_parser::parse(tokens);
        assert!(errors.is_empty(), "{errors:?}");
        ember_sema::analyze(&ast).unwrap();
        let mut out = sink();
        crate::run(&ast, &mut out).unwrap()
    }

    #[test]
    fn str_of_int_capture() {
        assert_eq!(run_source("main() None { let a int = 10  test_print(str(a)) }"), vec!["10"]);
    }

    #[test]
    fn nested_function_calls() {
        assert_eq!(
            run_source("sum(a int, b int) int { ret a + b }  main() None { test_print(str(sum(sum(1,2),3))) }"),
            vec!["6"]
        );
    }

    #[test]
    fn for_loop_over_string_list() {
        assert_eq!(
            run_source("main() None { for x in [\"Hello\",\"world\"] { test_print(x) } }"),
            vec!["Hello", "world"]
        );
    }

    #[test]
    fn while_loop_counts_up() {
        assert_eq!(
            run_source("main() None { var x int = 0  while x < 5 { test_print(str(x))  x = x + 1 } }"),
            vec!["0", "1", "2", "3", "4"]
        );
    }

    #[test]
    fn break_stops_only_the_innermost_loop() {
        assert_eq!(
            run_source(
                "main() None { var x int = 0  while x < 5 { if x > 2 { break }  test_print(str(x))  x = x + 1 } }"
            ),
            vec!["0", "1", "2"]
        );
    }

    #[test]
    fn append_mutates_declared_list() {
        assert_eq!(
            run_source("main() None { let xs IntList = [1,2]  append(3, xs)  test_print(str(xs)) }"),
            vec!["[1, 2, 3]"]
        );
    }

    #[test]
    fn recursive_function_calls_work() {
        // A bare `if` used as a statement is just an expression whose value
        // is discarded (§4.7: only a statement that *is* a `ret` updates the
        // enclosing block's return value) — so the base case has to be an
        // explicit `ret if ...`, not a bare `if { ret ... }` followed by
        // unconditional code.
        assert_eq!(
            run_source(
                "fact(n int) int { ret if n <= 1 { ret 1 } else { ret n * fact(n - 1) } }  main() None { test_print(str(fact(5))) }"
            ),
            vec!["120"]
        );
    }

    #[test]
    fn divide_by_zero_is_fatal() {
        let tokens =
            ember_lexer::tokenize(ember_grammar::DEFAULT_GRAMMAR, "main() None { let a int = 1 / 0 }").unwrap();
        let (ast, errors) = ember_parser::parse(tokens);
        assert!(errors.is_empty());
        ember_sema::analyze(&ast).unwrap();
        let mut out = sink();
        let err = crate::run(&ast, &mut out).unwrap_err();
        assert_eq!(err.kind, ember_common::EvalErrorKind::DivideByZero);
    }
}
