//! Tree-walking evaluator (C9) over the runtime closure chain (C7's
//! run-time half). Consumes the AST exactly as `ember_sema` left it —
//! the analyzer's resolved-type side table isn't consulted here; values
//! carry their own type at runtime and operators re-check it themselves.

mod builtins;
mod closure;
mod error;
mod evaluator;
mod ops;
mod value;

use std::io::Write;
use std::rc::Rc;

use ember_parser::ast::Node;

pub use closure::{Closure, FunctionValue};
pub use error::EvalError;
pub use value::Value;

/// Run a parsed program to completion: install the bootstrap builtins,
/// bind every top-level function into the root closure, then invoke
/// `main`. Returns whatever `test_print` accumulated — ignored by a real
/// CLI run, used as the result by anything exercising the language
/// embeddably.
pub fn run(ast: &Node, stdout: &mut dyn Write) -> Result<Vec<String>, EvalError> {
    let Node::Start { functions, .. } = ast else {
        panic!("run expects the Start node produced by ember_parser::parse");
    };

    let mut root = Closure::root();
    builtins::register(&mut root);
    for function_decl in functions {
        let Node::FunctionDecl { name, .. } = function_decl else {
            panic!("every top-level declaration is a FunctionDecl node");
        };
        let function = root.make_function(Rc::new(function_decl.clone()));
        root.declare_function(name.clone(), Value::Function(function));
    }

    let main = root.lookup("main").ok_or_else(|| EvalError::not_implemented("no 'main' function declared", 1))?;

    let mut evaluator = evaluator::Evaluator::new(root, stdout);
    evaluator.invoke(main, Vec::new(), 1)?;
    Ok(evaluator.into_test_output())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::sink;

    #[test]
    fn missing_main_is_reported_rather_than_panicking() {
        let tokens = ember_lexer::tokenize(ember_grammar::DEFAULT_GRAMMAR, "noop() None { }").unwrap();
        let (ast, errors) = ember_parser::parse(tokens);
        assert!(errors.is_empty());
        ember_sema::analyze(&ast).unwrap();
        let mut out = sink();
        let err = run(&ast, &mut out).unwrap_err();
        assert_eq!(err.kind, ember_common::EvalErrorKind::NotImplemented { what: "no 'main' function declared".to_string() });
    }
}
