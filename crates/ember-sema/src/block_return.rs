//! Block-return side table (§4.6 pass 1's second responsibility): "for each
//! statements block whose last statement is a return, remember the
//! return-expression node id keyed by the block's id". Used later, during
//! validation, to type an if-expression from its then-block's tail return
//! without re-deriving it at every use site.
//!
//! This doesn't need scope information at all — it's a pure structural scan
//! — so it runs once, ahead of the declare+validate walk, over every
//! statements block reachable from a function body.

use std::collections::HashMap;

use ember_parser::ast::{Node, NodeId};

pub fn collect(function: &Node, table: &mut HashMap<NodeId, NodeId>) {
    let Node::FunctionDecl { body, .. } = function else {
        panic!("collect expects a FunctionDecl node");
    };
    collect_block(body, table);
}

fn collect_block(block: &Node, table: &mut HashMap<NodeId, NodeId>) {
    let Node::StatementsBlock { id, statements, .. } = block else {
        panic!("collect_block expects a StatementsBlock node");
    };
    if let Some(Node::Return { value: Some(value), .. }) = statements.last() {
        table.insert(*id, value.id());
    }
    for stmt in statements {
        collect_statement(stmt, table);
    }
}

fn collect_statement(node: &Node, table: &mut HashMap<NodeId, NodeId>) {
    match node {
        Node::For { body, .. } | Node::While { body, .. } => collect_block(body, table),
        Node::If { then_block, elifs, else_block, condition, .. } => {
            collect_block(then_block, table);
            for (cond, block) in elifs {
                collect_expr(cond, table);
                collect_block(block, table);
            }
            if let Some(block) = else_block {
                collect_block(block, table);
            }
            collect_expr(condition, table);
        }
        Node::Assignment { value, .. } => collect_expr(value, table),
        other => collect_expr(other, table),
    }
}

/// If-expressions can appear nested inside any expression position (e.g. as
/// a call argument); recurse into the handful of expression shapes that can
/// contain a statements block.
fn collect_expr(node: &Node, table: &mut HashMap<NodeId, NodeId>) {
    match node {
        Node::If { .. } => collect_statement(node, table),
        Node::PostfixUnary { operand, suffixes, .. } => {
            collect_expr(operand, table);
            for suffix in suffixes {
                if let ember_parser::ast::Suffix::Call(args) = suffix {
                    for arg in args {
                        collect_expr(arg, table);
                    }
                } else if let ember_parser::ast::Suffix::Index(idx) = suffix {
                    collect_expr(idx, table);
                }
            }
        }
        Node::PrefixUnary { operand, .. } | Node::Parenthesized { inner: operand, .. } => {
            collect_expr(operand, table)
        }
        Node::Multiplicative(seq)
        | Node::Additive(seq)
        | Node::Comparison(seq)
        | Node::Equality(seq)
        | Node::Conjunction(seq)
        | Node::Disjunction(seq) => {
            for operand in &seq.operands {
                collect_expr(operand, table);
            }
        }
        Node::CollectionLiteral { items, .. } => {
            for item in items {
                collect_expr(item, table);
            }
        }
        _ => {}
    }
}
