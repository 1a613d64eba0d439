//! The longest-match scanner (C2) and the buffered token controller (C3)
//! that sits over it.

mod controller;
mod scanner;

pub use controller::TokenController;
pub use scanner::{Scanner, MAX_TOKEN_LEN};

use ember_common::error::LexErrorKind;
use ember_common::{Position, Token};

/// Load `grammar_text` into matchers and scan `source` into a token vector
/// in one call — the shape every pipeline stage above C2/C3 actually wants,
/// and what test fixtures across the workspace use to avoid re-deriving a
/// grammar file by hand.
pub fn tokenize(grammar_text: &str, source: &str) -> Result<Vec<Token>, (LexErrorKind, Position)> {
    let matchers = ember_grammar::load_grammar(grammar_text);
    Scanner::new(&matchers).scan(source)
}

