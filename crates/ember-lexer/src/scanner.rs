//! Longest-match tokenizer (C2).
//!
//! An explicit state machine rather than the recurse-per-character shape of
//! the original: feed one char at a time into `buf`, track the longest
//! buffer any matcher has accepted (`last_matched`) and which matchers
//! accepted it (`carry_candidates`), and emit as soon as the next char makes
//! every matcher reject.

use ember_common::error::LexErrorKind;
use ember_common::{Position, Token};
use ember_grammar::NamedMatcher;

/// Maximum accumulated token length before scanning gives up (§4.2).
pub const MAX_TOKEN_LEN: usize = 255;

struct LastMatch {
    text: String,
    position: Position,
    candidate_names: Vec<String>,
    candidate_kind: ember_common::TokenKind,
}

/// Scans a full source string into a vector of tokens in one pass.
///
/// Returns on the first lexical error, carrying its position, per §7's
/// "only the first error is reported" rule.
pub struct Scanner<'g> {
    matchers: &'g [NamedMatcher],
    ignore_ws: bool,
    ignore_comments: bool,
}

impl<'g> Scanner<'g> {
    pub fn new(matchers: &'g [NamedMatcher]) -> Self {
        Self {
            matchers,
            ignore_ws: true,
            ignore_comments: true,
        }
    }

    pub fn keep_trivia(mut self) -> Self {
        self.ignore_ws = false;
        self.ignore_comments = false;
        self
    }

    /// Tokenize `source` in full. NEWLINE tokens are always kept (the token
    /// controller, not the scanner, decides whether to hide them).
    pub fn scan(&self, source: &str) -> Result<Vec<Token>, (LexErrorKind, Position)> {
        let mut tokens = Vec::new();
        let mut chars = source.chars().peekable();

        let mut pos = Position::start();
        let mut buf = String::new();
        let mut last: Option<LastMatch> = None;

        loop {
            if buf.is_empty() {
                match chars.next() {
                    Some(c) => {
                        advance(&mut pos, c);
                        buf.push(c);
                    }
                    None => break,
                }
            }

            let now = matching(self.matchers, &buf);

            if !now.is_empty() {
                last = Some(LastMatch {
                    text: buf.clone(),
                    position: pos,
                    candidate_names: now.iter().map(|m| m.name.clone()).collect(),
                    candidate_kind: now[0].kind,
                });

                match chars.peek().copied() {
                    Some(c) => {
                        chars.next();
                        advance(&mut pos, c);
                        buf.push(c);
                        if buf.chars().count() > MAX_TOKEN_LEN {
                            return Err((
                                LexErrorKind::TokenTooLong {
                                    max_len: MAX_TOKEN_LEN,
                                },
                                pos,
                            ));
                        }
                    }
                    None => {
                        let m = last.take().unwrap();
                        if m.candidate_names.len() > 1 {
                            return Err((
                                LexErrorKind::AmbiguousMatch {
                                    candidates: m.candidate_names,
                                },
                                m.position,
                            ));
                        }
                        push_token(&mut tokens, m.candidate_kind, m.text, m.position);
                        break;
                    }
                }
            } else {
                match last.take() {
                    None => return Err((LexErrorKind::CandidatesNotFound, pos)),
                    Some(m) => {
                        if m.candidate_names.len() > 1 {
                            return Err((
                                LexErrorKind::AmbiguousMatch {
                                    candidates: m.candidate_names,
                                },
                                m.position,
                            ));
                        }
                        push_token(&mut tokens, m.candidate_kind, m.text, m.position);
                        // roll back: buf currently holds last_matched_text plus
                        // the one char that broke the match. Keep only that
                        // char as the seed of the next token.
                        let rollback = buf.chars().last().expect("buf extended by one char");
                        buf = rollback.to_string();
                    }
                }
            }
        }

        let filtered = tokens
            .into_iter()
            .filter(|t| !(self.ignore_ws && t.kind == ember_common::TokenKind::Ws))
            .filter(|t| !(self.ignore_comments && t.kind == ember_common::TokenKind::Comment))
            .collect();
        Ok(filtered)
    }
}

fn push_token(tokens: &mut Vec<Token>, kind: ember_common::TokenKind, text: String, position: Position) {
    tokens.push(Token::new(kind, text, position));
}

fn matching<'a>(matchers: &'a [NamedMatcher], buf: &str) -> Vec<&'a NamedMatcher> {
    matchers.iter().filter(|m| m.matches(buf)).collect()
}

fn advance(pos: &mut Position, c: char) {
    if c == '\n' || c == '\r' {
        pos.advance_line();
    } else {
        pos.advance_column();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_grammar::load_grammar;

    fn default_matchers() -> Vec<NamedMatcher> {
        load_grammar(
            "NAME:/(?!let\\b)[a-zA-Z_][a-zA-Z0-9_]*/\n\
             DEC_NUMBER:/[0-9]+/\n\
             WS:/[ \\t]+/\n\
             NEWLINE:/[\\n\\r]+/\n\
             LET:\"let\"\n\
             ASSIGNMENT_OPERATOR:\"=\"",
        )
    }

    #[test]
    fn reports_end_of_token_column() {
        let matchers = default_matchers();
        let scanner = Scanner::new(&matchers);
        let tokens = scanner.scan("let a = 5").unwrap();
        let cols: Vec<u32> = tokens.iter().map(|t| t.position.column).collect();
        // "let"(1-3) "a"(5) "="(7) "5"(9) with single spaces between
        assert_eq!(cols, vec![3, 5, 7, 9]);
    }

    #[test]
    fn empty_source_has_no_tokens() {
        let matchers = default_matchers();
        let scanner = Scanner::new(&matchers);
        assert_eq!(scanner.scan("").unwrap(), vec![]);
    }

    #[test]
    fn unsupported_chars_fail_with_candidates_not_found() {
        let matchers = default_matchers();
        let scanner = Scanner::new(&matchers);
        let err = scanner.scan("$$$$$$").unwrap_err();
        assert_eq!(err.0, LexErrorKind::CandidatesNotFound);
    }

    #[test]
    fn ambiguous_grammar_reports_all_candidate_names() {
        // both LET and NAME accept "kk"
        let matchers = load_grammar("LET:\"kk\"\nNAME:/k.*/");
        let scanner = Scanner::new(&matchers);
        let err = scanner.scan("kk").unwrap_err();
        match err.0 {
            LexErrorKind::AmbiguousMatch { candidates } => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected AmbiguousMatch, got {other:?}"),
        }
    }

    #[test]
    fn ws_and_comment_are_filtered_by_default() {
        let matchers = default_matchers();
        let scanner = Scanner::new(&matchers);
        let tokens = scanner.scan("let  a").unwrap();
        assert!(tokens.iter().all(|t| t.kind != ember_common::TokenKind::Ws));
    }
}
