//! `SyntaxKind` — the closed set of node and token kinds that make up
//! ember's concrete syntax tree.
//!
//! The token half mirrors `ember_common::TokenKind` one for one (§6.2's
//! closed terminal vocabulary); the node half is the CST rule-name set
//! implied by §4.4's grammar and §3's AST node kinds. Grouped the way the
//! token/node split reads in a hand-rolled recursive-descent grammar: trivia
//! and punctuation first, then keywords and operators, then the composite
//! rule nodes the parser actually builds.

use ember_common::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    /// Placeholder kind patched over by `close()`; never reaches the tree.
    TOMBSTONE,
    /// Wraps a token the parser couldn't place anywhere sensible.
    ERROR_NODE,

    // ── Trivia ──────────────────────────────────────────────────────────
    WS,
    COMMENT,
    NEWLINE,

    // ── Punctuation ─────────────────────────────────────────────────────
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_CURLY_BR,
    RIGHT_CURLY_BR,
    LEFT_SQR_BR,
    RIGHT_SQR_BR,
    COMMA,
    DOT,

    // ── Keywords ─────────────────────────────────────────────────────────
    LET,
    VAR,
    FOR,
    WHILE,
    IF,
    ELIF,
    ELSE,
    IN,
    RETURN,
    BREAK,
    OR,
    AND,

    // ── Operators ────────────────────────────────────────────────────────
    NEGATION,
    ADDITIVE_OPERATOR,
    MULTIPLICATIVE_OPERATOR,
    COMPARISON_OPERATOR,
    EQUALITY_OPERATOR,
    ASSIGNMENT_OPERATOR,
    ASSIGNMENT_AND_OPERATOR,

    // ── Literals & names ─────────────────────────────────────────────────
    NAME,
    DEC_NUMBER,
    FLOAT_NUMBER,
    BOOLEAN,
    STRING,

    // ── Special ──────────────────────────────────────────────────────────
    EOF,

    // ── Composite node kinds: declarations ───────────────────────────────
    /// Top-level `start` node: a sequence of function declarations.
    SOURCE_FILE,
    FUNCTION_DECL,
    PARAM_LIST,
    PARAM,
    /// A type name, an `XList` iterable-of-X, or a bare `List`.
    TYPE_EXPR,

    // ── Composite node kinds: statements ──────────────────────────────────
    STATEMENTS_BLOCK,
    VARIABLE_DECL,
    ASSIGNMENT,
    RETURN_STMT,
    BREAK_STMT,
    FOR_STMT,
    WHILE_STMT,

    // ── Composite node kinds: expressions ─────────────────────────────────
    IF_EXPR,
    ELIF_CLAUSE,
    ELSE_CLAUSE,
    /// Flat operand/operator sequence, not a binary tree (§3).
    DISJUNCTION,
    CONJUNCTION,
    EQUALITY,
    COMPARISON,
    ADDITIVE,
    MULTIPLICATIVE,
    PREFIX_UNARY,
    POSTFIX_UNARY,
    CALL_SUFFIX,
    ARG_LIST,
    INDEX_SUFFIX,
    NAVIGATION_SUFFIX,
    PAREN_EXPR,
    COLLECTION_LITERAL,
    NAME_REF,
    LITERAL,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WS | SyntaxKind::COMMENT | SyntaxKind::NEWLINE)
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Name => SyntaxKind::NAME,
            TokenKind::DecNumber => SyntaxKind::DEC_NUMBER,
            TokenKind::FloatNumber => SyntaxKind::FLOAT_NUMBER,
            TokenKind::Boolean => SyntaxKind::BOOLEAN,
            TokenKind::String => SyntaxKind::STRING,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Ws => SyntaxKind::WS,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::LeftParen => SyntaxKind::LEFT_PAREN,
            TokenKind::RightParen => SyntaxKind::RIGHT_PAREN,
            TokenKind::LeftCurlyBr => SyntaxKind::LEFT_CURLY_BR,
            TokenKind::RightCurlyBr => SyntaxKind::RIGHT_CURLY_BR,
            TokenKind::LeftSqrBr => SyntaxKind::LEFT_SQR_BR,
            TokenKind::RightSqrBr => SyntaxKind::RIGHT_SQR_BR,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Let => SyntaxKind::LET,
            TokenKind::Var => SyntaxKind::VAR,
            TokenKind::For => SyntaxKind::FOR,
            TokenKind::While => SyntaxKind::WHILE,
            TokenKind::If => SyntaxKind::IF,
            TokenKind::Elif => SyntaxKind::ELIF,
            TokenKind::Else => SyntaxKind::ELSE,
            TokenKind::In => SyntaxKind::IN,
            TokenKind::Return => SyntaxKind::RETURN,
            TokenKind::Break => SyntaxKind::BREAK,
            TokenKind::Or => SyntaxKind::OR,
            TokenKind::And => SyntaxKind::AND,
            TokenKind::Negation => SyntaxKind::NEGATION,
            TokenKind::AdditiveOperator => SyntaxKind::ADDITIVE_OPERATOR,
            TokenKind::MultiplicativeOperator => SyntaxKind::MULTIPLICATIVE_OPERATOR,
            TokenKind::ComparisonOperator => SyntaxKind::COMPARISON_OPERATOR,
            TokenKind::EqualityOperator => SyntaxKind::EQUALITY_OPERATOR,
            TokenKind::AssignmentOperator => SyntaxKind::ASSIGNMENT_OPERATOR,
            TokenKind::AssignmentAndOperator => SyntaxKind::ASSIGNMENT_AND_OPERATOR,
            TokenKind::Eof => SyntaxKind::EOF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kinds_round_trip_through_from() {
        assert_eq!(SyntaxKind::from(TokenKind::Let), SyntaxKind::LET);
        assert_eq!(SyntaxKind::from(TokenKind::Eof), SyntaxKind::EOF);
    }

    #[test]
    fn trivia_kinds_are_flagged() {
        assert!(SyntaxKind::WS.is_trivia());
        assert!(SyntaxKind::COMMENT.is_trivia());
        assert!(SyntaxKind::NEWLINE.is_trivia());
        assert!(!SyntaxKind::NAME.is_trivia());
    }
}
