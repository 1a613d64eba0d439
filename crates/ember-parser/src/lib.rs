//! Recursive-descent parser (C4), rowan CST (C4/C6), tree transformer (C5),
//! and the AST/unit-type model (C6) for the ember interpreter.

mod error;
mod parser;
mod transform;

pub mod ast;
pub mod cst;
pub mod syntax_kind;

pub use ast::{DeclKeyword, LiteralValue, Node, NodeId, Suffix, UnitType};
pub use cst::{EmberLanguage, SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use ember_common::Token;

/// Run the parser (C4) and the tree transformer (C5) over an already-scanned
/// token stream, producing the AST the rest of the pipeline (C8, C9) walks.
///
/// Per §7 ("only the first error is reported"), a non-empty error list means
/// the caller should report `errors[0]` and stop; the returned tree is still
/// handed back so tooling that wants best-effort recovery (an `--emit-ast`
/// debug dump, say) can inspect it.
pub fn parse(tokens: Vec<Token>) -> (Node, Vec<ParseError>) {
    let (green, errors, positions) = parser::parse_source_file(tokens);
    let root = SyntaxNode::new_root(green);
    let ast = transform::lower(&root, &positions);
    (ast, errors)
}

/// Parse into the raw rowan tree alone, without lowering to an AST. Exposed
/// for `--emit-cst` debug dumps and for CST-shape snapshot tests.
pub fn parse_cst(tokens: Vec<Token>) -> (SyntaxNode, Vec<ParseError>) {
    let (green, errors, _positions) = parser::parse_source_file(tokens);
    (SyntaxNode::new_root(green), errors)
}
