//! Declaration registration, type resolution, and assignment validation
//! (§4.6's two conceptual passes, realized as described in the module doc
//! comment: function signatures are registered before any body is walked,
//! then each body is declared-and-validated in one traversal).

use std::collections::HashMap;

use ember_parser::ast::{LiteralValue, Node, NodeId, Suffix, UnitType};

use crate::closure::{ClosureItem, ClosureStack};
use crate::error::SemaError;

type BlockReturn = HashMap<NodeId, NodeId>;
type ResolvedTypes = HashMap<NodeId, UnitType>;

/// Step A: install every top-level function's signature into the root
/// scope before any body is validated, so mutual/forward calls between
/// top-level functions resolve regardless of declaration order.
pub fn register_function_signature(closure: &mut ClosureStack, function: &Node) -> Result<(), SemaError> {
    let Node::FunctionDecl { name, params, return_type, line, .. } = function else {
        panic!("register_function_signature expects a FunctionDecl node");
    };
    if closure.declared_in_current_scope(name) {
        return Err(SemaError::invalid_redeclaration(name.clone(), *line));
    }
    let param_types = params
        .iter()
        .map(|p| {
            let Node::Param { declared_type, .. } = p else { panic!("function params are Param nodes") };
            declared_type.clone()
        })
        .collect();
    closure.declare(
        name.clone(),
        ClosureItem::Function { params: param_types, return_type: return_type.clone() },
    );
    Ok(())
}

/// Validate one function body: push its call frame (params bound
/// immediately), walk the statements block, pop the frame.
pub fn validate_function(
    closure: &mut ClosureStack,
    block_return: &BlockReturn,
    resolved: &mut ResolvedTypes,
    function: &Node,
) -> Result<(), SemaError> {
    let Node::FunctionDecl { params, body, return_type, .. } = function else {
        panic!("validate_function expects a FunctionDecl node");
    };
    closure.push_scope();
    for p in params {
        let Node::Param { id, name, declared_type, .. } = p else { panic!("function params are Param nodes") };
        closure.declare(
            name.clone(),
            ClosureItem::Variable { ty: declared_type.clone(), is_bound: true, is_const: false },
        );
        resolved.insert(*id, declared_type.clone());
    }
    validate_block(closure, block_return, resolved, return_type, body)?;
    closure.pop_scope();
    Ok(())
}

/// Execute a statements block in a fresh scope (§3: "created on entry to a
/// statements block"), validating each statement in source order.
/// `expected_return` is the enclosing function's declared return type,
/// threaded through so a `return` at any nesting depth (inside `if`/`for`/
/// `while`) can be checked against it (§3: "each `return` expression's type
/// equals the function's declared return type").
fn validate_block(
    closure: &mut ClosureStack,
    block_return: &BlockReturn,
    resolved: &mut ResolvedTypes,
    expected_return: &UnitType,
    block: &Node,
) -> Result<(), SemaError> {
    let Node::StatementsBlock { statements, .. } = block else {
        panic!("validate_block expects a StatementsBlock node");
    };
    closure.push_scope();
    for stmt in statements {
        validate_statement(closure, block_return, resolved, expected_return, stmt)?;
    }
    closure.pop_scope();
    Ok(())
}

fn validate_statement(
    closure: &mut ClosureStack,
    block_return: &BlockReturn,
    resolved: &mut ResolvedTypes,
    expected_return: &UnitType,
    node: &Node,
) -> Result<(), SemaError> {
    match node {
        Node::Assignment { target, value, line, .. } => {
            let value_ty = resolve_type(closure, block_return, resolved, expected_return, value)?;
            resolved.insert(value.id(), value_ty.clone());
            validate_assignment_target(closure, resolved, target, &value_ty, *line)?;
            Ok(())
        }
        Node::Return { value, line, .. } => {
            let actual = match value {
                Some(value) => resolve_type(closure, block_return, resolved, expected_return, value)?,
                None => UnitType::Simple("None".to_string()),
            };
            if !types_compatible(expected_return, &actual) && !types_compatible(&actual, expected_return) {
                return Err(SemaError::type_mismatch(expected_return.to_string(), actual.to_string(), *line));
            }
            Ok(())
        }
        Node::Break { .. } => Ok(()),
        Node::For { binding, iterable, body, .. } => {
            let iter_ty = resolve_type(closure, block_return, resolved, expected_return, iterable)?;
            let item_ty = match iter_ty {
                UnitType::Iterable(item) => *item,
                other => other,
            };
            closure.push_scope();
            closure.declare(binding.clone(), ClosureItem::Variable { ty: item_ty, is_bound: true, is_const: false });
            validate_block(closure, block_return, resolved, expected_return, body)?;
            closure.pop_scope();
            Ok(())
        }
        Node::While { condition, body, .. } => {
            resolve_type(closure, block_return, resolved, expected_return, condition)?;
            validate_block(closure, block_return, resolved, expected_return, body)?;
            Ok(())
        }
        other => {
            resolve_type(closure, block_return, resolved, expected_return, other)?;
            Ok(())
        }
    }
}

/// §4.6 pass-2's four delayed tasks for an assignment, run immediately
/// since nothing downstream needs them deferred once scoping is explicit.
fn validate_assignment_target(
    closure: &mut ClosureStack,
    resolved: &mut ResolvedTypes,
    target: &Node,
    value_ty: &UnitType,
    line: u32,
) -> Result<(), SemaError> {
    match target {
        Node::VariableDecl { id, keyword, name, declared_type, .. } => {
            // (a) refine a `List`-declared (IterableUnknown) binding from the
            // right-hand side's resolved type.
            let final_type =
                if matches!(declared_type, UnitType::IterableUnknown) { value_ty.clone() } else { declared_type.clone() };
            // (b) match declared (or refined) type against the value's type.
            if !types_compatible(&final_type, value_ty) {
                return Err(SemaError::type_mismatch(final_type.to_string(), value_ty.to_string(), line));
            }
            // (c) a second declaration of the same name in this scope is an
            // error regardless of keyword.
            if closure.declared_in_current_scope(name) {
                return Err(SemaError::invalid_redeclaration(name.clone(), line));
            }
            // (d) declare + mark bound.
            closure.declare(
                name.clone(),
                ClosureItem::Variable { ty: final_type.clone(), is_bound: true, is_const: keyword.is_const() },
            );
            resolved.insert(*id, final_type.clone());
            resolved.insert(target.id(), final_type);
            Ok(())
        }
        Node::Identifier { name, .. } => {
            let item = closure.lookup_mut(name).ok_or_else(|| SemaError::declaration_not_found(name.clone(), line))?;
            match item {
                ClosureItem::Variable { ty, is_bound, is_const } => {
                    // (c) a `let` binding, once bound, can never be
                    // reassigned (§3, §7).
                    if *is_const && *is_bound {
                        return Err(SemaError::reassign(name.clone(), line));
                    }
                    // (b) match.
                    if !types_compatible(ty, value_ty) {
                        return Err(SemaError::type_mismatch(ty.to_string(), value_ty.to_string(), line));
                    }
                    // (d) mark bound.
                    *is_bound = true;
                    Ok(())
                }
                ClosureItem::Function { .. } => {
                    Err(SemaError::type_mismatch("function", value_ty.to_string(), line))
                }
            }
        }
        other => panic!("assignment target is neither a declaration nor a bare name: {other:?}"),
    }
}

/// Structural type equality (§3), except a still-unrefined `List` matches
/// anything — it's only ever compared before refinement happens on the
/// same assignment, so this branch exists for callers that pre-check
/// before calling (a); `validate_assignment_target` never hits it itself.
fn types_compatible(declared: &UnitType, found: &UnitType) -> bool {
    matches!(declared, UnitType::IterableUnknown) || declared == found
}

/// §4.6's `resolve_type`: single dispatch on node kind. Recurses into every
/// sub-expression so a `DeclarationNotFound` anywhere inside surfaces, even
/// when the enclosing expression's own type doesn't depend on that operand.
/// `expected_return` is threaded through purely so an if-expression nested
/// anywhere in the tree can validate the `return` statements inside its
/// branches against the enclosing function's declared return type (§3).
fn resolve_type(
    closure: &mut ClosureStack,
    block_return: &BlockReturn,
    resolved: &mut ResolvedTypes,
    expected_return: &UnitType,
    node: &Node,
) -> Result<UnitType, SemaError> {
    let ty = resolve_type_inner(closure, block_return, resolved, expected_return, node)?;
    resolved.insert(node.id(), ty.clone());
    Ok(ty)
}

fn resolve_type_inner(
    closure: &mut ClosureStack,
    block_return: &BlockReturn,
    resolved: &mut ResolvedTypes,
    expected_return: &UnitType,
    node: &Node,
) -> Result<UnitType, SemaError> {
    match node {
        Node::Literal { value, .. } => Ok(match value {
            LiteralValue::Int(_) => UnitType::Simple("int".to_string()),
            LiteralValue::Float(_) => UnitType::Simple("float".to_string()),
            LiteralValue::Bool(_) => UnitType::Simple("bool".to_string()),
            LiteralValue::Str(_) => UnitType::Simple("str".to_string()),
        }),
        Node::Identifier { name, line, .. } => {
            let item =
                closure.lookup(name).ok_or_else(|| SemaError::declaration_not_found(name.clone(), *line))?;
            Ok(item.as_type())
        }
        Node::PrefixUnary { operand, .. } => resolve_type(closure, block_return, resolved, expected_return, operand),
        Node::Multiplicative(seq)
        | Node::Additive(seq)
        | Node::Comparison(seq)
        | Node::Equality(seq)
        | Node::Conjunction(seq)
        | Node::Disjunction(seq) => {
            let mut operands = seq.operands.iter();
            let first = operands.next().expect("operand sequence always has at least one operand");
            let first_ty = resolve_type(closure, block_return, resolved, expected_return, first)?;
            for rest in operands {
                resolve_type(closure, block_return, resolved, expected_return, rest)?;
            }
            Ok(first_ty)
        }
        Node::PostfixUnary { operand, suffixes, .. } => {
            let mut ty = resolve_type(closure, block_return, resolved, expected_return, operand)?;
            for suffix in suffixes {
                ty = match suffix {
                    Suffix::Call(args) => {
                        for arg in args {
                            resolve_type(closure, block_return, resolved, expected_return, arg)?;
                        }
                        match ty {
                            UnitType::Function { ret, .. } => *ret,
                            other => other,
                        }
                    }
                    Suffix::Index(index_expr) => {
                        resolve_type(closure, block_return, resolved, expected_return, index_expr)?;
                        match ty {
                            UnitType::Iterable(item) => *item,
                            other => other,
                        }
                    }
                    // Navigation is unspecified (§4.6); leave the type as-is
                    // so the rest of the pipeline can still run past it —
                    // evaluation is what actually rejects it (NotImplemented).
                    Suffix::Navigation(_) => ty,
                };
            }
            Ok(ty)
        }
        Node::Parenthesized { inner, .. } => resolve_type(closure, block_return, resolved, expected_return, inner),
        Node::CollectionLiteral { items, .. } => {
            let mut iter = items.iter();
            match iter.next() {
                Some(first) => {
                    let item_ty = resolve_type(closure, block_return, resolved, expected_return, first)?;
                    for rest in iter {
                        resolve_type(closure, block_return, resolved, expected_return, rest)?;
                    }
                    Ok(UnitType::Iterable(Box::new(item_ty)))
                }
                None => Ok(UnitType::IterableUnknown),
            }
        }
        Node::If { condition, then_block, elifs, else_block, .. } => {
            // An if-expression's branches may themselves contain `return`
            // statements belonging to the enclosing function (§4.6 only
            // types the *if-expression* from its then-block's tail return;
            // a bare `return` anywhere inside a branch still answers to the
            // function's declared return type, hence threading
            // `expected_return` straight through rather than relaxing it).
            resolve_type(closure, block_return, resolved, expected_return, condition)?;
            validate_block(closure, block_return, resolved, expected_return, then_block)?;
            for (cond, block) in elifs {
                resolve_type(closure, block_return, resolved, expected_return, cond)?;
                validate_block(closure, block_return, resolved, expected_return, block)?;
            }
            if let Some(block) = else_block {
                validate_block(closure, block_return, resolved, expected_return, block)?;
            }
            let Node::StatementsBlock { id: then_id, .. } = then_block.as_ref() else { unreachable!() };
            Ok(match block_return.get(then_id) {
                Some(return_expr_id) => {
                    resolved.get(return_expr_id).cloned().unwrap_or(UnitType::Simple("None".to_string()))
                }
                None => UnitType::Simple("None".to_string()),
            })
        }
        // TypeExpr / declarations / statements never reach resolve_type
        // directly — they're handled by their own statement-level rules.
        other => panic!("resolve_type called on a non-expression node: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(src: &str) -> Result<crate::SemaResult, SemaError> {
        let tokens = ember_lexer::tokenize(ember_grammar::DEFAULT_GRAMMAR, src).unwrap();
        let (ast, errors) = ember_parser::parse(tokens);
        assert!(errors.is_empty(), "{errors:?}");
        crate::analyze(&ast)
    }

    #[test]
    fn let_binding_resolves_declared_type() {
        let result = analyze("main() None { let a int = 10 }").unwrap();
        assert!(!result.resolved_types.is_empty());
    }

    #[test]
    fn type_mismatch_on_declared_vs_value_type() {
        let err = analyze("main() None { let a int = \"x\" }").unwrap_err();
        assert!(matches!(err.kind, ember_common::SemanticErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn reassigning_a_let_binding_fails() {
        let err = analyze("main() None { let a int = 1\n a = 2 }").unwrap_err();
        assert!(matches!(err.kind, ember_common::SemanticErrorKind::Reassign { .. }));
    }

    #[test]
    fn var_binding_may_be_reassigned_with_matching_type() {
        analyze("main() None { var a int = 1\n a = 2 }").unwrap();
    }

    #[test]
    fn var_reassigned_with_mismatched_type_fails() {
        let err = analyze("main() None { var a int = 1\n a = \"x\" }").unwrap_err();
        assert!(matches!(err.kind, ember_common::SemanticErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn unresolved_identifier_fails_declaration_not_found() {
        let err = analyze("main() None { let a int = b }").unwrap_err();
        assert!(matches!(err.kind, ember_common::SemanticErrorKind::DeclarationNotFound { .. }));
    }

    #[test]
    fn empty_collection_literal_stays_unknown_until_refined() {
        analyze("main() None { let xs List = [] }").unwrap();
    }

    #[test]
    fn collection_literal_infers_item_type() {
        analyze("main() None { let xs IntList = [1, 2, 3] }").unwrap();
    }

    #[test]
    fn forward_reference_between_top_level_functions_resolves() {
        analyze("a() int { ret b() }  b() int { ret 1 }  main() None { let x int = a() }").unwrap();
    }

    #[test]
    fn second_declaration_in_same_scope_is_invalid_redeclaration() {
        let err = analyze("main() None { let a int = 1\n let a int = 2 }").unwrap_err();
        assert!(matches!(err.kind, ember_common::SemanticErrorKind::InvalidRedeclaration { .. }));
    }

    #[test]
    fn return_expression_type_must_match_declared_return_type() {
        let err = analyze("f() int { ret \"x\" }  main() None { let a int = f() }").unwrap_err();
        assert!(matches!(err.kind, ember_common::SemanticErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn return_inside_a_branch_nested_under_if_is_still_checked() {
        let err =
            analyze("f(n int) int { if n > 0 { ret \"x\" }  ret 1 }  main() None { let a int = f(1) }").unwrap_err();
        assert!(matches!(err.kind, ember_common::SemanticErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn return_matching_declared_type_at_every_nesting_depth_succeeds() {
        analyze(
            "f(n int) int { if n > 0 { ret 1 } elif n < 0 { ret -1 } else { ret 0 } }  main() None { let a int = f(1) }",
        )
        .unwrap();
    }
}
