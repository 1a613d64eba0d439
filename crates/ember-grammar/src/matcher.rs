//! The three matcher shapes a terminal definition line can compile to.

use ember_common::TokenKind;
use fancy_regex::Regex;

/// A compiled terminal definition, able to test whether a candidate string
/// is (so far) consistent with the terminal it names.
pub enum Matcher {
    /// `/pattern/` or `/pattern/i` — matched with `fullmatch` semantics, so a
    /// candidate only qualifies once the whole accumulated text matches.
    /// Backed by `fancy-regex` rather than the plain `regex` crate so a
    /// terminal like `NAME` can exclude reserved words with a lookahead
    /// (`(?!let\b|var\b|...)...`), which a non-backtracking engine can't do.
    Regex(Regex),
    /// One or more `"literal"` alternatives separated by `|`.
    Alternative(Vec<String>),
    /// The hard-coded `STRING` terminal: accepts an opening quote alone (the
    /// scanner is still accumulating) or a complete `"..."` pair.
    String,
}

impl Matcher {
    pub fn matches(&self, s: &str) -> bool {
        match self {
            Matcher::Regex(re) => is_full_match(re, s),
            Matcher::Alternative(alts) => alts.iter().any(|a| a == s),
            Matcher::String => matches_string_literal(s),
        }
    }
}

/// `fancy_regex::Regex` has no `fullmatch`; emulate it by requiring the
/// match found to span the entire input. A lookaround evaluation error is
/// treated as "no match" rather than propagated — the scanner's contract has
/// no room for a third matcher outcome.
fn is_full_match(re: &Regex, s: &str) -> bool {
    match re.find(s) {
        Ok(Some(m)) => m.start() == 0 && m.end() == s.len(),
        _ => false,
    }
}

/// Bit-exact port of the original `StringMatcher`: a candidate qualifies
/// while it is exactly one `"` (still open) or exactly two `"` with the
/// second one at the very end (closed).
fn matches_string_literal(s: &str) -> bool {
    let count = s.matches('"').count();
    s.starts_with('"') && (count == 1 || (count == 2 && s.ends_with('"')))
}

/// A matcher bound to the terminal name and closed-set kind it produces.
pub struct NamedMatcher {
    pub name: String,
    pub kind: TokenKind,
    pub matcher: Matcher,
}

impl NamedMatcher {
    pub fn new(name: impl Into<String>, kind: TokenKind, matcher: Matcher) -> Self {
        Self {
            name: name.into(),
            kind,
            matcher,
        }
    }

    pub fn matches(&self, s: &str) -> bool {
        self.matcher.matches(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_matcher_accepts_open_quote() {
        assert!(matches_string_literal("\""));
    }

    #[test]
    fn string_matcher_accepts_closed_pair() {
        assert!(matches_string_literal("\"hello\""));
    }

    #[test]
    fn string_matcher_rejects_unclosed_with_internal_quote_missing_close() {
        // three quote chars total, never matches regardless of trailing char
        assert!(!matches_string_literal("\"a\"b\""));
    }

    #[test]
    fn string_matcher_rejects_not_starting_with_quote() {
        assert!(!matches_string_literal("a\""));
    }

    #[test]
    fn alternative_matcher_exact_match_only() {
        let m = Matcher::Alternative(vec!["let".to_string(), "var".to_string()]);
        assert!(m.matches("let"));
        assert!(!m.matches("le"));
        assert!(!m.matches("letx"));
    }

    #[test]
    fn regex_matcher_requires_full_match() {
        let m = Matcher::Regex(Regex::new(r"[0-9]+").unwrap());
        assert!(m.matches("123"));
        assert!(!m.matches("12a"));
    }

    #[test]
    fn regex_matcher_case_insensitive_flag() {
        let re = Regex::new(r"(?i)true|false").unwrap();
        let m = Matcher::Regex(re);
        assert!(m.matches("TRUE"));
        assert!(m.matches("false"));
    }

    #[test]
    fn regex_matcher_excludes_keyword_via_lookahead() {
        let re = Regex::new(r"(?!let\b)[a-zA-Z_][a-zA-Z0-9_]*").unwrap();
        let m = Matcher::Regex(re);
        assert!(!m.matches("let"));
        assert!(m.matches("letter"));
    }
}
