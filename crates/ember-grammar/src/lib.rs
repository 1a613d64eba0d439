//! Grammar-file loading: compiles a terminal-definition file into the
//! ordered list of matchers the scanner tests candidate text against.

mod loader;
mod matcher;

pub use loader::load_grammar;
pub use matcher::{Matcher, NamedMatcher};

/// The grammar file `emberc` embeds when no `--grammar` override is given
/// (spec §6.3's surface language, expressed as §6.2 terminal definitions).
pub const DEFAULT_GRAMMAR: &str = include_str!("default_grammar.txt");
