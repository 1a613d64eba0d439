//! Rowan-based concrete syntax tree types for ember.

use crate::syntax_kind::SyntaxKind;

/// Marker type connecting [`SyntaxKind`] to rowan's generic tree machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmberLanguage {}

impl rowan::Language for EmberLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        KIND_TABLE
            .get(raw.0 as usize)
            .copied()
            .unwrap_or_else(|| panic!("rowan::SyntaxKind {} has no SyntaxKind mapping", raw.0))
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// `SyntaxKind` is `#[repr(u16)]` with no gaps, so the raw discriminant is a
/// valid index into a table built by declaration order. Built once, matched
/// against in `kind_from_raw` instead of transmuting the raw value straight
/// back into the enum.
const KIND_TABLE: &[SyntaxKind] = &[
    SyntaxKind::TOMBSTONE,
    SyntaxKind::ERROR_NODE,
    SyntaxKind::WS,
    SyntaxKind::COMMENT,
    SyntaxKind::NEWLINE,
    SyntaxKind::LEFT_PAREN,
    SyntaxKind::RIGHT_PAREN,
    SyntaxKind::LEFT_CURLY_BR,
    SyntaxKind::RIGHT_CURLY_BR,
    SyntaxKind::LEFT_SQR_BR,
    SyntaxKind::RIGHT_SQR_BR,
    SyntaxKind::COMMA,
    SyntaxKind::DOT,
    SyntaxKind::LET,
    SyntaxKind::VAR,
    SyntaxKind::FOR,
    SyntaxKind::WHILE,
    SyntaxKind::IF,
    SyntaxKind::ELIF,
    SyntaxKind::ELSE,
    SyntaxKind::IN,
    SyntaxKind::RETURN,
    SyntaxKind::BREAK,
    SyntaxKind::OR,
    SyntaxKind::AND,
    SyntaxKind::NEGATION,
    SyntaxKind::ADDITIVE_OPERATOR,
    SyntaxKind::MULTIPLICATIVE_OPERATOR,
    SyntaxKind::COMPARISON_OPERATOR,
    SyntaxKind::EQUALITY_OPERATOR,
    SyntaxKind::ASSIGNMENT_OPERATOR,
    SyntaxKind::ASSIGNMENT_AND_OPERATOR,
    SyntaxKind::NAME,
    SyntaxKind::DEC_NUMBER,
    SyntaxKind::FLOAT_NUMBER,
    SyntaxKind::BOOLEAN,
    SyntaxKind::STRING,
    SyntaxKind::EOF,
    SyntaxKind::SOURCE_FILE,
    SyntaxKind::FUNCTION_DECL,
    SyntaxKind::PARAM_LIST,
    SyntaxKind::PARAM,
    SyntaxKind::TYPE_EXPR,
    SyntaxKind::STATEMENTS_BLOCK,
    SyntaxKind::VARIABLE_DECL,
    SyntaxKind::ASSIGNMENT,
    SyntaxKind::RETURN_STMT,
    SyntaxKind::BREAK_STMT,
    SyntaxKind::FOR_STMT,
    SyntaxKind::WHILE_STMT,
    SyntaxKind::IF_EXPR,
    SyntaxKind::ELIF_CLAUSE,
    SyntaxKind::ELSE_CLAUSE,
    SyntaxKind::DISJUNCTION,
    SyntaxKind::CONJUNCTION,
    SyntaxKind::EQUALITY,
    SyntaxKind::COMPARISON,
    SyntaxKind::ADDITIVE,
    SyntaxKind::MULTIPLICATIVE,
    SyntaxKind::PREFIX_UNARY,
    SyntaxKind::POSTFIX_UNARY,
    SyntaxKind::CALL_SUFFIX,
    SyntaxKind::ARG_LIST,
    SyntaxKind::INDEX_SUFFIX,
    SyntaxKind::NAVIGATION_SUFFIX,
    SyntaxKind::PAREN_EXPR,
    SyntaxKind::COLLECTION_LITERAL,
    SyntaxKind::NAME_REF,
    SyntaxKind::LITERAL,
];

/// A CST node (interior node with children).
pub type SyntaxNode = rowan::SyntaxNode<EmberLanguage>;
/// A CST token (leaf node with text).
pub type SyntaxToken = rowan::SyntaxToken<EmberLanguage>;
/// Either a node or a token in the CST.
pub type SyntaxElement = rowan::SyntaxElement<EmberLanguage>;
