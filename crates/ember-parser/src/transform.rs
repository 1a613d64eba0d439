//! Tree transformer (C5): lowers the rowan CST into the tagged-variant AST
//! (C6, §3). Each CST rule has a deterministic mapping to a node kind; this
//! module also assigns every AST node a fresh, monotonically increasing
//! [`NodeId`] and a source line, mirroring `tree_transformer.py`'s
//! `next_id()` counter and its `get_line()` helper.
//!
//! rowan tracks byte offsets, not line/column — the scanner's positions are
//! the only source of truth for line numbers. [`token_lines`] recovers them
//! by zipping the tree's leaf tokens (which appear in exactly the order the
//! parser's `advance()` consumed them) against the scanner's per-token
//! [`Position`] list, once, up front.

use std::collections::HashMap;

use ember_common::Position;
use rowan::TextSize;

use crate::ast::{parse_type_name, DeclKeyword, LiteralValue, Node, NodeId, OperandSeq, Suffix};
use crate::cst::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

struct Ctx {
    next_id: u32,
    lines: HashMap<TextSize, u32>,
}

impl Ctx {
    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn line_of(&self, node: &SyntaxNode) -> u32 {
        node.first_token()
            .and_then(|t| self.lines.get(&t.text_range().start()).copied())
            .unwrap_or(0)
    }
}

/// Build the `leaf token start offset -> source line` table described above.
fn token_lines(root: &SyntaxNode, positions: &[Position]) -> HashMap<TextSize, u32> {
    root.descendants_with_tokens()
        .filter_map(|el| el.into_token())
        .zip(positions.iter())
        .map(|(tok, pos)| (tok.text_range().start(), pos.line))
        .collect()
}

pub fn lower(root: &SyntaxNode, positions: &[Position]) -> Node {
    let mut ctx = Ctx { next_id: 0, lines: token_lines(root, positions) };
    lower_source_file(&mut ctx, root)
}

fn children_nodes(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
    node.children()
}

fn child_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|c| c.kind() == kind)
}

fn first_token_text(node: &SyntaxNode, kind: SyntaxKind) -> String {
    node.children_with_tokens()
        .filter_map(|el| el.into_token())
        .find(|t| t.kind() == kind)
        .map(|t| t.text().to_string())
        .unwrap_or_default()
}

fn lower_source_file(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let functions = children_nodes(node)
        .filter(|c| c.kind() == SyntaxKind::FUNCTION_DECL)
        .map(|c| lower_function_decl(ctx, &c))
        .collect();
    Node::Start { id, line, functions }
}

fn lower_function_decl(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let name = first_token_text(node, SyntaxKind::NAME);
    let params = child_of_kind(node, SyntaxKind::PARAM_LIST)
        .map(|pl| children_nodes(&pl).map(|p| lower_param(ctx, &p)).collect())
        .unwrap_or_default();
    let return_type = child_of_kind(node, SyntaxKind::TYPE_EXPR)
        .map(|t| parse_type_name(&first_token_text(&t, SyntaxKind::NAME)))
        .unwrap_or(crate::ast::UnitType::Simple("None".to_string()));
    let body = child_of_kind(node, SyntaxKind::STATEMENTS_BLOCK)
        .map(|b| Box::new(lower_statements_block(ctx, &b)))
        .unwrap_or_else(|| Box::new(Node::StatementsBlock { id: ctx.alloc(), line, statements: vec![] }));
    Node::FunctionDecl { id, line, name, params, return_type, body }
}

fn lower_param(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let name = first_token_text(node, SyntaxKind::NAME);
    let declared_type = child_of_kind(node, SyntaxKind::TYPE_EXPR)
        .map(|t| parse_type_name(&first_token_text(&t, SyntaxKind::NAME)))
        .unwrap_or(crate::ast::UnitType::IterableUnknown);
    Node::Param { id, line, name, declared_type }
}

fn lower_statements_block(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let statements = children_nodes(node).map(|c| lower_statement(ctx, &c)).collect();
    Node::StatementsBlock { id, line, statements }
}

fn lower_statement(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    match node.kind() {
        SyntaxKind::VARIABLE_DECL => lower_variable_decl(ctx, node),
        SyntaxKind::ASSIGNMENT => lower_assignment(ctx, node),
        SyntaxKind::RETURN_STMT => lower_return(ctx, node),
        SyntaxKind::BREAK_STMT => {
            let id = ctx.alloc();
            let line = ctx.line_of(node);
            Node::Break { id, line }
        }
        SyntaxKind::FOR_STMT => lower_for(ctx, node),
        SyntaxKind::WHILE_STMT => lower_while(ctx, node),
        _ => lower_expression(ctx, node),
    }
}

fn lower_variable_decl(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let keyword = if !first_token_text(node, SyntaxKind::VAR).is_empty() {
        DeclKeyword::Var
    } else {
        DeclKeyword::Let
    };
    let name = first_token_text(node, SyntaxKind::NAME);
    let declared_type = child_of_kind(node, SyntaxKind::TYPE_EXPR)
        .map(|t| parse_type_name(&first_token_text(&t, SyntaxKind::NAME)))
        .unwrap_or(crate::ast::UnitType::IterableUnknown);
    Node::VariableDecl { id, line, keyword, name, declared_type }
}

fn lower_assignment(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let mut children = children_nodes(node);
    let left = children.next().expect("assignment always has a target child");
    let target = if left.kind() == SyntaxKind::VARIABLE_DECL {
        Box::new(lower_variable_decl(ctx, &left))
    } else {
        Box::new(lower_expression(ctx, &left))
    };
    let compound_operator = {
        let text = first_token_text(node, SyntaxKind::ASSIGNMENT_AND_OPERATOR);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    };
    let value = children.next().map(|v| Box::new(lower_expression(ctx, &v))).unwrap_or_else(|| {
        Box::new(Node::Literal { id: ctx.alloc(), line, value: LiteralValue::Bool(false) })
    });
    Node::Assignment { id, line, target, compound_operator, value }
}

fn lower_return(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let value = children_nodes(node).next().map(|v| Box::new(lower_expression(ctx, &v)));
    Node::Return { id, line, value }
}

fn lower_for(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let binding = first_token_text(node, SyntaxKind::NAME);
    let mut children = children_nodes(node);
    let iterable = Box::new(lower_expression(ctx, &children.next().expect("for has an iterable")));
    let body = Box::new(lower_statements_block(ctx, &children.next().expect("for has a body")));
    Node::For { id, line, binding, iterable, body }
}

fn lower_while(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let mut children = children_nodes(node);
    let condition = Box::new(lower_expression(ctx, &children.next().expect("while has a condition")));
    let body = Box::new(lower_statements_block(ctx, &children.next().expect("while has a body")));
    Node::While { id, line, condition, body }
}

// ── Expressions ─────────────────────────────────────────────────────────

fn lower_expression(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    match node.kind() {
        SyntaxKind::DISJUNCTION => lower_operand_seq(ctx, node, Node::Disjunction as fn(OperandSeq) -> Node, SyntaxKind::OR),
        SyntaxKind::CONJUNCTION => lower_operand_seq(ctx, node, Node::Conjunction as fn(OperandSeq) -> Node, SyntaxKind::AND),
        SyntaxKind::EQUALITY => {
            lower_operand_seq(ctx, node, Node::Equality as fn(OperandSeq) -> Node, SyntaxKind::EQUALITY_OPERATOR)
        }
        SyntaxKind::COMPARISON => lower_operand_seq(
            ctx,
            node,
            Node::Comparison as fn(OperandSeq) -> Node,
            SyntaxKind::COMPARISON_OPERATOR,
        ),
        SyntaxKind::ADDITIVE => {
            lower_operand_seq(ctx, node, Node::Additive as fn(OperandSeq) -> Node, SyntaxKind::ADDITIVE_OPERATOR)
        }
        SyntaxKind::MULTIPLICATIVE => lower_operand_seq(
            ctx,
            node,
            Node::Multiplicative as fn(OperandSeq) -> Node,
            SyntaxKind::MULTIPLICATIVE_OPERATOR,
        ),
        SyntaxKind::PREFIX_UNARY => lower_prefix_unary(ctx, node),
        SyntaxKind::CALL_SUFFIX | SyntaxKind::INDEX_SUFFIX | SyntaxKind::NAVIGATION_SUFFIX => {
            lower_postfix(ctx, node)
        }
        SyntaxKind::PAREN_EXPR => lower_paren(ctx, node),
        SyntaxKind::NAME_REF => lower_name_ref(ctx, node),
        SyntaxKind::LITERAL => lower_literal(ctx, node),
        SyntaxKind::COLLECTION_LITERAL => lower_collection(ctx, node),
        SyntaxKind::IF_EXPR => lower_if(ctx, node),
        SyntaxKind::ERROR_NODE => {
            let id = ctx.alloc();
            let line = ctx.line_of(node);
            Node::Identifier { id, line, name: node.text().to_string() }
        }
        other => unreachable!("not an expression node kind: {other:?}"),
    }
}

/// Lower a flat operand/operator level (§3: "ordered operand/operator
/// sequence", never a binary tree). `operator_kind` names the single token
/// kind this level's operator is tagged with; every non-token child is an
/// operand lowered in order.
fn lower_operand_seq(
    ctx: &mut Ctx,
    node: &SyntaxNode,
    build: fn(OperandSeq) -> Node,
    operator_kind: SyntaxKind,
) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let operands = children_nodes(node).map(|c| lower_expression(ctx, &c)).collect();
    let operators = node
        .children_with_tokens()
        .filter_map(|el| el.into_token())
        .filter(|t| t.kind() == operator_kind)
        .map(|t| t.text().to_string())
        .collect();
    build(OperandSeq { id, line, operands, operators })
}

fn lower_prefix_unary(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let operator = node
        .children_with_tokens()
        .filter_map(|el| el.into_token())
        .find(|t| matches!(t.kind(), SyntaxKind::NEGATION | SyntaxKind::ADDITIVE_OPERATOR))
        .map(|t| t.text().to_string())
        .unwrap_or_default();
    let inner = children_nodes(node).next().expect("prefix unary always wraps an operand");
    let operand = Box::new(lower_expression(ctx, &inner));
    Node::PrefixUnary { id, line, operator, operand }
}

/// Suffix nodes nest target-first (`open_before`): the outermost node is the
/// *last* suffix applied. Unwrap down to the primary, collecting suffixes
/// innermost-first, then reverse to get left-to-right application order
/// matching §3's "postfix-unary expression (primary + ordered suffixes)".
fn lower_postfix(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let mut suffixes_rev = Vec::new();
    let mut current = node.clone();
    loop {
        match current.kind() {
            SyntaxKind::CALL_SUFFIX => {
                let target = children_nodes(&current).next().expect("call suffix has a target");
                let args = child_of_kind(&current, SyntaxKind::ARG_LIST)
                    .map(|a| children_nodes(&a).map(|e| lower_expression(ctx, &e)).collect())
                    .unwrap_or_default();
                suffixes_rev.push(Suffix::Call(args));
                current = target;
            }
            SyntaxKind::INDEX_SUFFIX => {
                let mut children = children_nodes(&current);
                let target = children.next().expect("index suffix has a target");
                let index_expr = children.next().expect("index suffix has an index expression");
                suffixes_rev.push(Suffix::Index(lower_expression(ctx, &index_expr)));
                current = target;
            }
            SyntaxKind::NAVIGATION_SUFFIX => {
                let target = children_nodes(&current).next().expect("navigation suffix has a target");
                let field = first_token_text(&current, SyntaxKind::NAME);
                suffixes_rev.push(Suffix::Navigation(field));
                current = target;
            }
            _ => break,
        }
    }
    let operand = Box::new(lower_expression(ctx, &current));
    suffixes_rev.reverse();
    Node::PostfixUnary { id, line, operand, suffixes: suffixes_rev }
}

fn lower_paren(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let inner_node = children_nodes(node).next().expect("parenthesized expression has an inner expression");
    let inner = Box::new(lower_expression(ctx, &inner_node));
    Node::Parenthesized { id, line, inner }
}

fn lower_name_ref(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let name = first_token_text(node, SyntaxKind::NAME);
    Node::Identifier { id, line, name }
}

fn lower_literal(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let token = node.children_with_tokens().filter_map(|el| el.into_token()).next().expect("literal wraps one token");
    let value = match token.kind() {
        SyntaxKind::DEC_NUMBER => LiteralValue::Int(token.text().parse().unwrap_or(0)),
        SyntaxKind::FLOAT_NUMBER => LiteralValue::Float(token.text().parse().unwrap_or(0.0)),
        SyntaxKind::BOOLEAN => LiteralValue::Bool(token.text() == "true"),
        SyntaxKind::STRING => {
            let text = token.text();
            LiteralValue::Str(text.trim_matches('"').to_string())
        }
        other => unreachable!("literal token is not a literal kind: {other:?}"),
    };
    Node::Literal { id, line, value }
}

fn lower_collection(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let items = children_nodes(node).map(|c| lower_expression(ctx, &c)).collect();
    Node::CollectionLiteral { id, line, items }
}

fn lower_if(ctx: &mut Ctx, node: &SyntaxNode) -> Node {
    let id = ctx.alloc();
    let line = ctx.line_of(node);
    let mut top_level = node.children().filter(|c| {
        !matches!(c.kind(), SyntaxKind::ELIF_CLAUSE | SyntaxKind::ELSE_CLAUSE)
    });
    let condition = Box::new(lower_expression(ctx, &top_level.next().expect("if has a condition")));
    let then_block = Box::new(lower_statements_block(ctx, &top_level.next().expect("if has a then-block")));

    let elifs = node
        .children()
        .filter(|c| c.kind() == SyntaxKind::ELIF_CLAUSE)
        .map(|clause| {
            let mut cc = children_nodes(&clause);
            let cond = lower_expression(ctx, &cc.next().expect("elif has a condition"));
            let block = lower_statements_block(ctx, &cc.next().expect("elif has a body"));
            (cond, block)
        })
        .collect();

    let else_block = node
        .children()
        .find(|c| c.kind() == SyntaxKind::ELSE_CLAUSE)
        .map(|clause| {
            let body = children_nodes(&clause).next().expect("else has a body");
            Box::new(lower_statements_block(ctx, &body))
        });

    Node::If { id, line, condition, then_block, elifs, else_block }
}
