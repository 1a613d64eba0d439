//! Grammar functions for §4.4's precedence cascade.
//!
//! Each binary level is split into two functions: the "from scratch" entry
//! point (`additive`, `comparison`, ...) that parses its first operand by
//! calling down to the next-higher level, and a `*_continue` function that
//! takes an already-parsed operand and decides whether to wrap it. This
//! split exists for one reason: §4.4's compound-assignment disambiguation
//! parses a single `prefix` expression, and only *after* seeing whether an
//! `ASSIGNMENT_AND_OPERATOR` follows does it know whether to keep climbing
//! the ladder (ordinary expression statement) or stop and treat what it
//! already built as the assignment target. Threading the already-built mark
//! back into `multiplicative_continue`, `additive_continue`, etc. is what
//! the spec calls "reinterpreted... by threading the already-built
//! expression back into the assignment rule (NOT re-parsed)".
//!
//! Every level node (DISJUNCTION, CONJUNCTION, ADDITIVE, ...) is a flat
//! operand/operator sequence per §3, not a binary tree: a `*_continue` only
//! opens a wrapper node once it has seen at least one operator at its level,
//! and otherwise returns the operand mark untouched so no single-child
//! wrapper ever appears.

use ember_common::{ParseErrorKind, TokenKind};

use super::{MarkClosed, Parser};
use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

pub fn parse_source_file(
    tokens: Vec<ember_common::Token>,
) -> (rowan::GreenNode, Vec<ParseError>, Vec<ember_common::Position>) {
    let mut p = Parser::new(tokens);
    source_file(&mut p);
    p.build_tree()
}

fn source_file(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    while !p.at(SyntaxKind::EOF) && !p.has_error() {
        function_decl(p);
    }
    p.close(m, SyntaxKind::SOURCE_FILE)
}

fn function_decl(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::NAME);
    p.expect(SyntaxKind::LEFT_PAREN);
    let params = p.open();
    if !p.at(SyntaxKind::RIGHT_PAREN) {
        param(p);
        while p.eat(SyntaxKind::COMMA) && !p.has_error() {
            param(p);
        }
    }
    p.close(params, SyntaxKind::PARAM_LIST);
    p.expect(SyntaxKind::RIGHT_PAREN);
    type_expr(p);
    statements_block(p);
    p.close(m, SyntaxKind::FUNCTION_DECL)
}

fn param(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::NAME);
    type_expr(p);
    p.close(m, SyntaxKind::PARAM)
}

/// A type expression is lexically just a `NAME` (`int`, `StrList`, `None`,
/// a bare `List`, ...); the `X` prefix of an `XList` name is resolved to an
/// item type during lowering (C5), not here.
fn type_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::NAME);
    p.close(m, SyntaxKind::TYPE_EXPR)
}

fn statements_block(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::LEFT_CURLY_BR);
    while !p.at(SyntaxKind::RIGHT_CURLY_BR) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        statement(p);
    }
    p.expect(SyntaxKind::RIGHT_CURLY_BR);
    p.close(m, SyntaxKind::STATEMENTS_BLOCK)
}

// ── Statements ────────────────────────────────────────────────────────────

fn statement(p: &mut Parser) -> MarkClosed {
    match p.current_token_kind() {
        TokenKind::Let | TokenKind::Var => declaration_assignment(p),
        TokenKind::Return => return_stmt(p),
        TokenKind::Break => break_stmt(p),
        TokenKind::For => for_stmt(p),
        TokenKind::While => while_stmt(p),
        _ => expression_or_compound_assignment(p),
    }
}

fn declaration_assignment(p: &mut Parser) -> MarkClosed {
    let decl = p.open();
    p.advance(); // `let` or `var`
    p.expect(SyntaxKind::NAME);
    type_expr(p);
    let decl_closed = p.close(decl, SyntaxKind::VARIABLE_DECL);

    let assign = p.open_before(decl_closed);
    p.expect(SyntaxKind::ASSIGNMENT_OPERATOR);
    expression(p);
    p.close(assign, SyntaxKind::ASSIGNMENT)
}

/// Parses one `prefix` expression and, depending on what follows, either
/// wraps it as a compound assignment target or keeps climbing the
/// precedence ladder from where that prefix expression left off.
fn expression_or_compound_assignment(p: &mut Parser) -> MarkClosed {
    let prefix_mark = prefix_unary(p);
    if p.at(SyntaxKind::ASSIGNMENT_AND_OPERATOR) {
        let m = p.open_before(prefix_mark);
        p.advance();
        expression(p);
        p.close(m, SyntaxKind::ASSIGNMENT)
    } else {
        let m = multiplicative_continue(p, prefix_mark);
        let m = additive_continue(p, m);
        let m = comparison_continue(p, m);
        let m = equality_continue(p, m);
        let m = conjunction_continue(p, m);
        disjunction_continue(p, m)
    }
}

fn return_stmt(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // return
    let bare = p.peek_includes_newline() || p.at(SyntaxKind::RIGHT_CURLY_BR) || p.at(SyntaxKind::EOF);
    if !bare {
        expression(p);
    }
    p.close(m, SyntaxKind::RETURN_STMT)
}

fn break_stmt(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // break
    p.close(m, SyntaxKind::BREAK_STMT)
}

fn for_stmt(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // for
    p.expect(SyntaxKind::NAME);
    p.expect(SyntaxKind::IN);
    expression(p);
    statements_block(p);
    p.close(m, SyntaxKind::FOR_STMT)
}

fn while_stmt(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // while
    expression(p);
    statements_block(p);
    p.close(m, SyntaxKind::WHILE_STMT)
}

// ── Expressions: precedence cascade ────────────────────────────────────────

pub(crate) fn expression(p: &mut Parser) -> MarkClosed {
    disjunction(p)
}

fn disjunction(p: &mut Parser) -> MarkClosed {
    let first = conjunction(p);
    disjunction_continue(p, first)
}

fn disjunction_continue(p: &mut Parser, first: MarkClosed) -> MarkClosed {
    if !p.at(SyntaxKind::OR) {
        return first;
    }
    let m = p.open_before(first);
    while p.eat(SyntaxKind::OR) && !p.has_error() {
        conjunction(p);
    }
    p.close(m, SyntaxKind::DISJUNCTION)
}

fn conjunction(p: &mut Parser) -> MarkClosed {
    let first = equality(p);
    conjunction_continue(p, first)
}

fn conjunction_continue(p: &mut Parser, first: MarkClosed) -> MarkClosed {
    if !p.at(SyntaxKind::AND) {
        return first;
    }
    let m = p.open_before(first);
    while p.eat(SyntaxKind::AND) && !p.has_error() {
        equality(p);
    }
    p.close(m, SyntaxKind::CONJUNCTION)
}

fn equality(p: &mut Parser) -> MarkClosed {
    let first = comparison(p);
    equality_continue(p, first)
}

/// At most one `EQUALITY_OPERATOR` per §4.4's `(EQ-OP comparison)?`.
fn equality_continue(p: &mut Parser, first: MarkClosed) -> MarkClosed {
    if !p.at(SyntaxKind::EQUALITY_OPERATOR) {
        return first;
    }
    let m = p.open_before(first);
    p.advance();
    comparison(p);
    p.close(m, SyntaxKind::EQUALITY)
}

fn comparison(p: &mut Parser) -> MarkClosed {
    let first = additive(p);
    comparison_continue(p, first)
}

fn comparison_continue(p: &mut Parser, first: MarkClosed) -> MarkClosed {
    if !p.at(SyntaxKind::COMPARISON_OPERATOR) {
        return first;
    }
    let m = p.open_before(first);
    while p.eat(SyntaxKind::COMPARISON_OPERATOR) && !p.has_error() {
        additive(p);
    }
    p.close(m, SyntaxKind::COMPARISON)
}

fn additive(p: &mut Parser) -> MarkClosed {
    let first = multiplicative(p);
    additive_continue(p, first)
}

fn additive_continue(p: &mut Parser, first: MarkClosed) -> MarkClosed {
    if !p.at(SyntaxKind::ADDITIVE_OPERATOR) {
        return first;
    }
    let m = p.open_before(first);
    while p.eat(SyntaxKind::ADDITIVE_OPERATOR) && !p.has_error() {
        multiplicative(p);
    }
    p.close(m, SyntaxKind::ADDITIVE)
}

fn multiplicative(p: &mut Parser) -> MarkClosed {
    let first = prefix_unary(p);
    multiplicative_continue(p, first)
}

fn multiplicative_continue(p: &mut Parser, first: MarkClosed) -> MarkClosed {
    if !p.at(SyntaxKind::MULTIPLICATIVE_OPERATOR) {
        return first;
    }
    let m = p.open_before(first);
    while p.eat(SyntaxKind::MULTIPLICATIVE_OPERATOR) && !p.has_error() {
        prefix_unary(p);
    }
    p.close(m, SyntaxKind::MULTIPLICATIVE)
}

fn prefix_unary(p: &mut Parser) -> MarkClosed {
    if p.at(SyntaxKind::NEGATION) || p.at(SyntaxKind::ADDITIVE_OPERATOR) {
        let m = p.open();
        p.advance();
        postfix(p);
        p.close(m, SyntaxKind::PREFIX_UNARY)
    } else {
        postfix(p)
    }
}

fn postfix(p: &mut Parser) -> MarkClosed {
    let mut mark = primary(p);
    loop {
        mark = match p.current() {
            SyntaxKind::LEFT_PAREN => call_suffix(p, mark),
            SyntaxKind::LEFT_SQR_BR => index_suffix(p, mark),
            SyntaxKind::DOT => navigation_suffix(p, mark),
            _ => break,
        };
    }
    mark
}

fn call_suffix(p: &mut Parser, target: MarkClosed) -> MarkClosed {
    let m = p.open_before(target);
    p.expect(SyntaxKind::LEFT_PAREN);
    let args = p.open();
    if !p.at(SyntaxKind::RIGHT_PAREN) {
        expression(p);
        while p.eat(SyntaxKind::COMMA) && !p.has_error() {
            expression(p);
        }
    }
    p.close(args, SyntaxKind::ARG_LIST);
    p.expect(SyntaxKind::RIGHT_PAREN);
    p.close(m, SyntaxKind::CALL_SUFFIX)
}

fn index_suffix(p: &mut Parser, target: MarkClosed) -> MarkClosed {
    let m = p.open_before(target);
    p.expect(SyntaxKind::LEFT_SQR_BR);
    expression(p);
    p.expect(SyntaxKind::RIGHT_SQR_BR);
    p.close(m, SyntaxKind::INDEX_SUFFIX)
}

fn navigation_suffix(p: &mut Parser, target: MarkClosed) -> MarkClosed {
    let m = p.open_before(target);
    p.expect(SyntaxKind::DOT);
    p.expect(SyntaxKind::NAME);
    p.close(m, SyntaxKind::NAVIGATION_SUFFIX)
}

fn primary(p: &mut Parser) -> MarkClosed {
    match p.current() {
        SyntaxKind::LEFT_PAREN => paren_expr(p),
        SyntaxKind::NAME => name_ref(p),
        SyntaxKind::DEC_NUMBER | SyntaxKind::FLOAT_NUMBER | SyntaxKind::BOOLEAN | SyntaxKind::STRING => literal(p),
        SyntaxKind::LEFT_SQR_BR => collection_literal(p),
        SyntaxKind::IF => if_expr(p),
        _ => {
            let found = p.current_text();
            p.error(ParseErrorKind::PrimaryExpressionExpected { found });
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::ERROR_NODE)
        }
    }
}

/// A CST node is kept around `expression` even though rowan doesn't need the
/// grouping to parse correctly, so type resolution (C8) can tell `(a)` apart
/// from `a` when deciding what an assignment's left side names (§4.4).
fn paren_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::LEFT_PAREN);
    expression(p);
    p.expect(SyntaxKind::RIGHT_PAREN);
    p.close(m, SyntaxKind::PAREN_EXPR)
}

fn name_ref(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance();
    p.close(m, SyntaxKind::NAME_REF)
}

fn literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance();
    p.close(m, SyntaxKind::LITERAL)
}

fn collection_literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::LEFT_SQR_BR);
    if !p.at(SyntaxKind::RIGHT_SQR_BR) {
        expression(p);
        while p.eat(SyntaxKind::COMMA) && !p.has_error() {
            if p.at(SyntaxKind::RIGHT_SQR_BR) {
                break;
            }
            expression(p);
        }
    }
    p.expect(SyntaxKind::RIGHT_SQR_BR);
    p.close(m, SyntaxKind::COLLECTION_LITERAL)
}

fn if_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // if
    expression(p);
    statements_block(p);
    while p.at(SyntaxKind::ELIF) && !p.has_error() {
        let em = p.open();
        p.advance();
        expression(p);
        statements_block(p);
        p.close(em, SyntaxKind::ELIF_CLAUSE);
    }
    if p.at(SyntaxKind::ELSE) {
        let em = p.open();
        p.advance();
        statements_block(p);
        p.close(em, SyntaxKind::ELSE_CLAUSE);
    }
    p.close(m, SyntaxKind::IF_EXPR)
}
