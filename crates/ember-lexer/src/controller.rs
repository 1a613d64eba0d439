//! Buffered one-token lookahead over a scanned token stream (C3).
//!
//! Mirrors `TokensController`: a `peek`/`next` pair with a mode flag that
//! transparently hides NEWLINE tokens, and a scoped override
//! (`include_newlines`) for the handful of productions that need to see
//! them (the optional-expression `return`, §4.4).

use ember_common::{Token, TokenKind};

pub struct TokenController {
    tokens: std::vec::IntoIter<Token>,
    ignore_newlines: bool,
    peeked: Option<Option<Token>>,
    cached: Vec<Token>,
}

impl TokenController {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            ignore_newlines: true,
            peeked: None,
            cached: Vec::new(),
        }
    }

    /// Reset to a fresh token stream, same as constructing anew.
    pub fn reload(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens.into_iter();
        self.ignore_newlines = true;
        self.peeked = None;
        self.cached.clear();
    }

    /// Run `f` with NEWLINE tokens exposed, restoring the previous mode
    /// afterward on every exit path (including `f` unwinding, which in Rust
    /// a `Drop` guard handles automatically).
    pub fn include_newlines<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let prev = self.ignore_newlines;
        self.ignore_newlines = false;
        struct Restore<'a> {
            ctrl: &'a mut TokenController,
            prev: bool,
        }
        impl Drop for Restore<'_> {
            fn drop(&mut self) {
                self.ctrl.ignore_newlines = self.prev;
                // A peek taken while newlines were exposed may have cached one;
                // re-run it through the restored mode instead of handing back
                // a NEWLINE the caller should never have seen.
                if self.ctrl.ignore_newlines {
                    if let Some(peeked) = self.ctrl.peeked.take() {
                        self.ctrl.peeked = Some(self.ctrl.skip_newlines_from(peeked));
                    }
                }
            }
        }
        let mut guard = Restore { ctrl: self, prev };
        f(guard.ctrl)
    }

    /// Consume and return the next logical token, skipping NEWLINEs when
    /// `ignore_newlines` is set.
    pub fn next(&mut self) -> Option<Token> {
        let token = match self.peeked.take() {
            Some(t) => t,
            None => self.tokens.next(),
        };
        let token = if self.ignore_newlines {
            self.skip_newlines_from(token)
        } else {
            token
        };
        if let Some(t) = &token {
            self.cached.push(t.clone());
        }
        token
    }

    /// Return the next logical token without consuming it.
    pub fn peek(&mut self) -> Option<&Token> {
        if self.peeked.is_none() {
            let next = self.next_raw_respecting_mode();
            self.peeked = Some(next);
        }
        self.peeked.as_ref().and_then(|t| t.as_ref())
    }

    pub fn cached_tokens(&self) -> &[Token] {
        &self.cached
    }

    fn next_raw_respecting_mode(&mut self) -> Option<Token> {
        let token = self.tokens.next();
        if self.ignore_newlines {
            self.skip_newlines_from(token)
        } else {
            token
        }
    }

    fn skip_newlines_from(&mut self, mut token: Option<Token>) -> Option<Token> {
        while matches!(&token, Some(t) if t.kind == TokenKind::Newline) {
            token = self.tokens.next();
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::Position;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Position::start())
    }

    #[test]
    fn peek_does_not_consume() {
        let mut ctrl = TokenController::new(vec![tok(TokenKind::Name, "a")]);
        assert_eq!(ctrl.peek().unwrap().text, "a");
        assert_eq!(ctrl.next().unwrap().text, "a");
        assert!(ctrl.next().is_none());
    }

    #[test]
    fn newlines_are_hidden_by_default() {
        let mut ctrl = TokenController::new(vec![
            tok(TokenKind::Newline, "\n"),
            tok(TokenKind::Name, "a"),
        ]);
        assert_eq!(ctrl.next().unwrap().kind, TokenKind::Name);
    }

    #[test]
    fn include_newlines_exposes_them_then_restores() {
        let mut ctrl = TokenController::new(vec![
            tok(TokenKind::Newline, "\n"),
            tok(TokenKind::Name, "a"),
        ]);
        let seen_kind = ctrl.include_newlines(|c| c.peek().map(|t| t.kind));
        assert_eq!(seen_kind, Some(TokenKind::Newline));
        // mode restored: a fresh peek again skips the newline
        assert_eq!(ctrl.peek().unwrap().kind, TokenKind::Name);
    }

    #[test]
    fn cached_tokens_records_delivered_tokens() {
        let mut ctrl = TokenController::new(vec![tok(TokenKind::Name, "a"), tok(TokenKind::Name, "b")]);
        ctrl.next();
        ctrl.next();
        assert_eq!(ctrl.cached_tokens().len(), 2);
    }
}
