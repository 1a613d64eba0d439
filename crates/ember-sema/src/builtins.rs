//! Builtin signature registration (§4.7's bootstrap list, typed side).
//!
//! `ember-eval`'s evaluator installs the same six names as runtime
//! callables; the analyzer needs to see them too so a call like
//! `print(x)` resolves `print` to a `FunctionType` instead of failing
//! `DeclarationNotFound`. Argument types are left permissive (`List` /
//! unknown) since the spec doesn't ask C8 to arity- or type-check calls —
//! only C9's `NotCallable`/arithmetic checks are load-bearing there.

use ember_parser::ast::UnitType;

use crate::closure::{ClosureItem, ClosureStack};

pub fn register(closure: &mut ClosureStack) {
    let none = || UnitType::Simple("None".to_string());
    let any = || UnitType::IterableUnknown;

    closure.declare(
        "print",
        ClosureItem::Function { params: vec![any()], return_type: none() },
    );
    closure.declare(
        "str",
        ClosureItem::Function { params: vec![any()], return_type: UnitType::Simple("str".to_string()) },
    );
    closure.declare(
        "len",
        ClosureItem::Function { params: vec![any()], return_type: UnitType::Simple("int".to_string()) },
    );
    closure.declare(
        "range",
        ClosureItem::Function {
            params: vec![UnitType::Simple("int".to_string())],
            return_type: UnitType::Iterable(Box::new(UnitType::Simple("int".to_string()))),
        },
    );
    closure.declare(
        "append",
        ClosureItem::Function { params: vec![any(), any()], return_type: none() },
    );
    closure.declare(
        "remove",
        ClosureItem::Function { params: vec![any(), any()], return_type: none() },
    );
    closure.declare(
        "test_print",
        ClosureItem::Function { params: vec![any()], return_type: none() },
    );
}
