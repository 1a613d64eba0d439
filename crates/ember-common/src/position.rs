//! Source positions.
//!
//! Unlike a byte-offset + line index scheme, the ember scanner tracks
//! line/column directly as it consumes characters (spec: "Cursor"), so
//! positions here are always a ready-made 1-based `(line, column)` pair
//! rather than something recovered after the fact.

use std::fmt;

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position before any character has been consumed.
    pub fn start() -> Self {
        Self { line: 1, column: 0 }
    }

    /// Advance past one non-newline character.
    pub fn advance_column(&mut self) {
        self.column += 1;
    }

    /// Advance past a newline (`\n` or `\r`): bump the line, reset the column.
    pub fn advance_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
