//! CST-shape snapshot tests (C4/§4.4): each test parses a tiny program,
//! locates the node under test, and prints it as a flat `KIND(child child
//! ...)` S-expression — a token is `KIND:text`, a childless node is just
//! `KIND`. This intentionally drops rowan's byte-offset `Debug` output (not
//! useful to eyeball in a snapshot) and trivia (hidden by the token
//! controller's `ignore_newlines` mode, so it never reaches the tree at
//! all — see `parser/mod.rs`). Snapshots are inline (`@"..."`), the way the
//! teacher's `snow-parser` suite pins a tree shape without a separate
//! reviewed `.snap` file per case.

use ember_parser::cst::{SyntaxElement, SyntaxNode};
use ember_parser::{parse_cst, SyntaxKind};
use insta::assert_snapshot;
use rowan::NodeOrToken;

fn parse_program(source: &str) -> SyntaxNode {
    let tokens = ember_lexer::tokenize(ember_grammar::DEFAULT_GRAMMAR, source).expect("scan");
    let (root, errors) = parse_cst(tokens);
    assert!(errors.is_empty(), "unexpected parse errors for {source:?}: {errors:?}");
    root
}

fn format_tree(element: SyntaxElement) -> String {
    match element {
        NodeOrToken::Node(node) => {
            let children: Vec<String> = node.children_with_tokens().map(format_tree).collect();
            if children.is_empty() {
                format!("{:?}", node.kind())
            } else {
                format!("{:?}({})", node.kind(), children.join(" "))
            }
        }
        NodeOrToken::Token(token) => format!("{:?}:{}", token.kind(), token.text()),
    }
}

/// Parses `expr_src` as a `ret` expression inside a throwaway function body
/// and returns the flat S-expression for just that expression's subtree.
fn expr_tree(expr_src: &str) -> String {
    let source = format!("f() None {{ ret {expr_src} }}");
    let root = parse_program(&source);
    let return_stmt = root
        .descendants()
        .find(|n| n.kind() == SyntaxKind::RETURN_STMT)
        .expect("return_stmt");
    let expr = return_stmt.children().next().expect("return has a value");
    format_tree(NodeOrToken::Node(expr))
}

#[test]
fn literal_int() {
    assert_snapshot!(expr_tree("42"), @"LITERAL(DEC_NUMBER:42)");
}

#[test]
fn literal_float() {
    assert_snapshot!(expr_tree("3.5"), @"LITERAL(FLOAT_NUMBER:3.5)");
}

#[test]
fn literal_string_keeps_its_quotes() {
    assert_snapshot!(expr_tree(r#""hi""#), @r#"LITERAL(STRING:"hi")"#);
}

#[test]
fn name_ref() {
    assert_snapshot!(expr_tree("x"), @"NAME_REF(NAME:x)");
}

#[test]
fn binary_add() {
    assert_snapshot!(
        expr_tree("1 + 2"),
        @"ADDITIVE(LITERAL(DEC_NUMBER:1) ADDITIVE_OPERATOR:+ LITERAL(DEC_NUMBER:2))"
    );
}

#[test]
fn binary_mul_add_precedence() {
    // `*` binds tighter than `+`, so the MULTIPLICATIVE node nests inside
    // the ADDITIVE one rather than the reverse.
    assert_snapshot!(
        expr_tree("a * b + c"),
        @"ADDITIVE(MULTIPLICATIVE(NAME_REF(NAME:a) MULTIPLICATIVE_OPERATOR:* NAME_REF(NAME:b)) ADDITIVE_OPERATOR:+ NAME_REF(NAME:c))"
    );
}

#[test]
fn unwrapped_single_operand_has_no_level_wrapper() {
    // A bare name at additive position produces no ADDITIVE/MULTIPLICATIVE
    // wrapper at all, per the "flat sequence, not a binary tree" rule.
    assert_snapshot!(expr_tree("a"), @"NAME_REF(NAME:a)");
}

#[test]
fn prefix_negative_uses_the_additive_operator_token() {
    assert_snapshot!(expr_tree("-x"), @"PREFIX_UNARY(ADDITIVE_OPERATOR:- NAME_REF(NAME:x))");
}

#[test]
fn prefix_logical_negation() {
    assert_snapshot!(expr_tree("!flag"), @"PREFIX_UNARY(NEGATION:! NAME_REF(NAME:flag))");
}

#[test]
fn comparison() {
    assert_snapshot!(
        expr_tree("a < b"),
        @"COMPARISON(NAME_REF(NAME:a) COMPARISON_OPERATOR:< NAME_REF(NAME:b))"
    );
}

#[test]
fn equality() {
    assert_snapshot!(
        expr_tree("a == b"),
        @"EQUALITY(NAME_REF(NAME:a) EQUALITY_OPERATOR:== NAME_REF(NAME:b))"
    );
}

#[test]
fn conjunction_nests_inside_disjunction() {
    assert_snapshot!(
        expr_tree("a and b or c"),
        @"DISJUNCTION(CONJUNCTION(NAME_REF(NAME:a) AND:and NAME_REF(NAME:b)) OR:or NAME_REF(NAME:c))"
    );
}

#[test]
fn paren_expr_keeps_its_grouping_node() {
    assert_snapshot!(
        expr_tree("(1 + 2)"),
        @"PAREN_EXPR(LEFT_PAREN:( ADDITIVE(LITERAL(DEC_NUMBER:1) ADDITIVE_OPERATOR:+ LITERAL(DEC_NUMBER:2)) RIGHT_PAREN:))"
    );
}

#[test]
fn call_suffix_wraps_the_target_via_open_before() {
    assert_snapshot!(
        expr_tree("f(x, y)"),
        @"CALL_SUFFIX(NAME_REF(NAME:f) LEFT_PAREN:( ARG_LIST(NAME_REF(NAME:x) COMMA:, NAME_REF(NAME:y)) RIGHT_PAREN:))"
    );
}

#[test]
fn index_suffix() {
    assert_snapshot!(
        expr_tree("xs[0]"),
        @"INDEX_SUFFIX(NAME_REF(NAME:xs) LEFT_SQR_BR:[ LITERAL(DEC_NUMBER:0) RIGHT_SQR_BR:])"
    );
}

#[test]
fn collection_literal() {
    assert_snapshot!(
        expr_tree("[1,2,3]"),
        @"COLLECTION_LITERAL(LEFT_SQR_BR:[ LITERAL(DEC_NUMBER:1) COMMA:, LITERAL(DEC_NUMBER:2) COMMA:, LITERAL(DEC_NUMBER:3) RIGHT_SQR_BR:])"
    );
}

#[test]
fn if_expr_with_else_clause() {
    assert_snapshot!(
        expr_tree("if a { ret 1 } else { ret 0 }"),
        @"IF_EXPR(IF:if NAME_REF(NAME:a) STATEMENTS_BLOCK(LEFT_CURLY_BR:{ RETURN_STMT(RETURN:ret LITERAL(DEC_NUMBER:1)) RIGHT_CURLY_BR:}) ELSE_CLAUSE(ELSE:else STATEMENTS_BLOCK(LEFT_CURLY_BR:{ RETURN_STMT(RETURN:ret LITERAL(DEC_NUMBER:0)) RIGHT_CURLY_BR:})))"
    );
}

#[test]
fn function_decl_shape() {
    let root = parse_program("add(a int, b int) int { ret a + b }");
    let function_decl = root.children().next().expect("one function");
    assert_snapshot!(
        format_tree(NodeOrToken::Node(function_decl)),
        @"FUNCTION_DECL(NAME:add LEFT_PAREN:( PARAM_LIST(PARAM(NAME:a TYPE_EXPR(NAME:int)) COMMA:, PARAM(NAME:b TYPE_EXPR(NAME:int))) RIGHT_PAREN:) TYPE_EXPR(NAME:int) STATEMENTS_BLOCK(LEFT_CURLY_BR:{ RETURN_STMT(RETURN:ret ADDITIVE(NAME_REF(NAME:a) ADDITIVE_OPERATOR:+ NAME_REF(NAME:b))) RIGHT_CURLY_BR:}))"
    );
}

#[test]
fn bare_return_on_its_own_line_does_not_swallow_the_closing_brace() {
    // The ordinary way to write a bare `ret` is on its own line, with `}` on
    // the next one. `peek_includes_newline` (§4.4) has to see that NEWLINE
    // without letting it leak past the block's closing brace, or this whole
    // function fails to parse.
    let root = parse_program("f() None {\n    ret\n}");
    let function_decl = root.children().next().expect("one function");
    assert_snapshot!(
        format_tree(NodeOrToken::Node(function_decl)),
        @"FUNCTION_DECL(NAME:f LEFT_PAREN:( PARAM_LIST RIGHT_PAREN:) TYPE_EXPR(NAME:None) STATEMENTS_BLOCK(LEFT_CURLY_BR:{ RETURN_STMT(RETURN:ret) RIGHT_CURLY_BR:}))"
    );
}
