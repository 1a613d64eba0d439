//! Compiles a grammar file's terminal definitions into matchers.
//!
//! A grammar file is a sequence of lines `NAME:definition`. Names are
//! uppercase-and-underscore only; any line that doesn't match that shape
//! (blank lines, comments, anything else) is skipped. Eight punctuation
//! terminals are always present ahead of the file's own lines, exactly as
//! the original scanner's `DEFAULT_TERMINAL_ENTRIES` prepends them.

use ember_common::TokenKind;
use fancy_regex::Regex;

use crate::matcher::{Matcher, NamedMatcher};

const DEFAULT_TERMINAL_ENTRIES: &[(&str, &str)] = &[
    ("LEFT_PAREN", "\"(\""),
    ("RIGHT_PAREN", "\")\""),
    ("LEFT_CURLY_BR", "\"{\""),
    ("RIGHT_CURLY_BR", "\"}\""),
    ("LEFT_SQR_BR", "\"[\""),
    ("RIGHT_SQR_BR", "\"]\""),
    ("COMMA", "\",\""),
    ("DOT", "\".\""),
];

/// Load a grammar file's text into an ordered list of named matchers,
/// default punctuation terminals first, then the file's own entries in the
/// order they appear.
pub fn load_grammar(grammar: &str) -> Vec<NamedMatcher> {
    let entry_re = Regex::new(r"^([A-Z_]*):(.*)$").unwrap();
    let mut matchers = Vec::new();

    for (name, def) in DEFAULT_TERMINAL_ENTRIES.iter().copied() {
        push_matcher(&mut matchers, name, def);
    }

    for line in grammar.lines() {
        let Ok(Some(caps)) = entry_re.captures(line) else {
            continue;
        };
        let name = caps[1].trim().to_string();
        let def = caps[2].trim().to_string();
        if name.is_empty() {
            continue;
        }
        push_matcher(&mut matchers, &name, &def);
    }

    matchers
}

/// Resolve `name` against the closed terminal vocabulary and, if it's a
/// recognized kind, compile and append its matcher. Unrecognized names are
/// silently skipped, same as any other non-matching grammar line.
fn push_matcher(matchers: &mut Vec<NamedMatcher>, name: &str, def: &str) {
    if let Some(kind) = TokenKind::from_grammar_name(name) {
        matchers.push(NamedMatcher::new(name, kind, build_matcher(name, def)));
    }
}

fn build_matcher(name: &str, def: &str) -> Matcher {
    if name == "STRING" {
        return Matcher::String;
    }

    if let Some(rest) = def.strip_prefix('/') {
        if let Some(last_slash) = rest.rfind('/') {
            let pattern = &rest[..last_slash];
            let flags = &rest[last_slash + 1..];
            let compiled = if flags.contains('i') {
                Regex::new(&format!("(?i){pattern}"))
            } else {
                Regex::new(pattern)
            };
            return Matcher::Regex(
                compiled.unwrap_or_else(|e| panic!("invalid regex in grammar for {name}: {e}")),
            );
        }
    }

    let alternatives = def
        .split('|')
        .map(str::trim)
        .filter(|it| it.starts_with('"') && it.ends_with('"') && it.len() >= 2)
        .map(|it| it[1..it.len() - 1].to_string())
        .collect::<Vec<_>>();
    Matcher::Alternative(alternatives)
}
