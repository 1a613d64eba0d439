//! Event-based recursive-descent parser (C4): token stream in, events out,
//! events replayed into a rowan green tree by [`Parser::build_tree`].
//!
//! Follows the teacher's three-event shape (`Open`/`Close`/`Advance`) and its
//! forward-parent trick (`open_before`) for wrapping an already-closed node
//! — used here for postfix suffixes (`a(x)`, `a[i]`, `a.b`), which are only
//! recognized after the primary expression they attach to has already
//! closed. Unlike the teacher, newline significance needs no delimiter-depth
//! tracking: §4.3 says the token controller hides NEWLINE unconditionally
//! except for the one spot (`return`) that asks to see it, so `current`/`nth`
//! just defer to the controller's own mode flag.

mod grammar;

use ember_common::{ParseErrorKind, Position, Token, TokenKind};
use ember_lexer::TokenController;

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

#[derive(Debug)]
enum Event {
    Open { kind: SyntaxKind, forward_parent: Option<usize> },
    Close,
    Advance,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

pub(crate) struct Parser {
    controller: TokenController,
    events: Vec<Event>,
    /// Tokens in the order `advance()` consumed them, replayed as CST leaves.
    consumed: Vec<Token>,
    errors: Vec<ParseError>,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            controller: TokenController::new(tokens),
            events: Vec::new(),
            consumed: Vec::new(),
            errors: Vec::new(),
        }
    }

    // ── Lookahead ────────────────────────────────────────────────────────

    pub(crate) fn current(&mut self) -> SyntaxKind {
        self.controller
            .peek()
            .map(|t| SyntaxKind::from(t.kind))
            .unwrap_or(SyntaxKind::EOF)
    }

    pub(crate) fn current_token_kind(&mut self) -> TokenKind {
        self.controller.peek().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn current_text(&mut self) -> String {
        self.controller.peek().map(|t| t.text.clone()).unwrap_or_default()
    }

    pub(crate) fn current_position(&mut self) -> Position {
        self.controller.peek().map(|t| t.position).unwrap_or_else(Position::start)
    }

    pub(crate) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Run `f` with NEWLINE tokens exposed to `current`/`peek`, used only by
    /// the `return`-with-optional-expression production (§4.4) to test "is
    /// the very next token a newline?" without consuming it.
    pub(crate) fn peek_includes_newline(&mut self) -> bool {
        self.controller
            .include_newlines(|c| c.peek().map(|t| t.kind == TokenKind::Newline).unwrap_or(false))
    }

    // ── Node management ──────────────────────────────────────────────────

    pub(crate) fn open(&mut self) -> MarkOpened {
        let mark = MarkOpened { index: self.events.len() };
        self.events.push(Event::Open { kind: SyntaxKind::TOMBSTONE, forward_parent: None });
        mark
    }

    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened { index: self.events.len() };
        self.events.push(Event::Open { kind: SyntaxKind::TOMBSTONE, forward_parent: None });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open { kind: slot, .. } = &mut self.events[m.index] {
            *slot = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    // ── Token consumption ─────────────────────────────────────────────────

    /// Consume the current (non-newline, per the controller's default mode)
    /// token, recording it as a CST leaf.
    pub(crate) fn advance(&mut self) {
        if let Some(token) = self.controller.next() {
            self.consumed.push(token);
            self.events.push(Event::Advance);
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) {
        if self.at(kind) {
            self.advance();
        } else {
            let found = self.current_text();
            let position = self.current_position();
            self.errors.push(ParseError::unexpected_token(format!("{kind:?}"), found, position));
            self.advance();
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn error(&mut self, kind: ParseErrorKind) {
        let position = self.current_position();
        self.errors.push(ParseError::new(kind, position));
    }

    pub(crate) fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    // ── Tree building ──────────────────────────────────────────────────────

    /// Replay recorded events into a rowan green tree. Alongside the tree and
    /// any accumulated errors, returns the consumed tokens' positions in the
    /// same order their text appears as leaves in the tree — rowan itself
    /// only keeps text and byte offsets, so this is how the transformer (C5)
    /// recovers a source line for each AST node without re-scanning.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>, Vec<Position>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos = 0usize;
        let mut forward_parents: Vec<(usize, SyntaxKind)> = Vec::new();

        let mut i = 0;
        while i < self.events.len() {
            match self.events[i] {
                Event::Open { kind, forward_parent } => {
                    if forward_parent.is_some() {
                        forward_parents.clear();
                        let mut current = i;
                        loop {
                            let (fk, fp) = match self.events[current] {
                                Event::Open { kind, forward_parent } => (kind, forward_parent),
                                _ => unreachable!("forward_parent always points at an Open event"),
                            };
                            forward_parents.push((current, fk));
                            match fp {
                                Some(next) => current = next,
                                None => break,
                            }
                        }
                        for &(fp_idx, _) in forward_parents.iter().skip(1) {
                            if let Event::Open { kind, forward_parent } = &mut self.events[fp_idx] {
                                *kind = SyntaxKind::TOMBSTONE;
                                *forward_parent = None;
                            }
                        }
                        if let Event::Open { forward_parent, .. } = &mut self.events[i] {
                            *forward_parent = None;
                        }
                        for &(_, fk) in forward_parents.iter().rev() {
                            if fk != SyntaxKind::TOMBSTONE {
                                builder.start_node(rowan::SyntaxKind(fk as u16));
                            }
                        }
                    } else if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => builder.finish_node(),
                Event::Advance => {
                    if let Some(token) = self.consumed.get(token_pos) {
                        let kind = SyntaxKind::from(token.kind);
                        builder.token(rowan::SyntaxKind(kind as u16), &token.text);
                        token_pos += 1;
                    }
                }
            }
            i += 1;
        }

        let positions = self.consumed.iter().map(|t| t.position).collect();
        (builder.finish(), self.errors, positions)
    }
}

pub use grammar::parse_source_file;
