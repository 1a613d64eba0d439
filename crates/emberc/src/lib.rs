//! Embeddable entry point for the ember interpreter (§6.4).
//!
//! The library surface is deliberately small: [`interpret`] runs the whole
//! `Scanner → Parser → TreeTransformer → SemanticAnalyzer → Evaluator`
//! pipeline (spec §2) against a grammar and a source string and returns
//! whatever `test_print` captured, exactly as an embedder exercising test
//! scenarios wants. [`run`] is the same pipeline pointed at a real
//! `Write` sink for `print`, for the CLI binary and for anyone else who
//! wants the program's real stdout rather than its test capture.
//!
//! Neither function prints or formats anything itself — that's `main.rs`'s
//! job (§9's "the top-level driver is the only place that prints or
//! converts").

use std::io::Write;

use ember_common::EmberError;
use ember_parser::{Node, ParseError, SyntaxNode};

/// Run the full pipeline against the embedded default grammar (§6.3),
/// discarding real stdout, and return the `test_print` capture buffer.
/// This is the "test-capture mode" of §6.4.
pub fn interpret(source_text: &str) -> Result<Vec<String>, EmberError> {
    interpret_with_grammar(ember_grammar::DEFAULT_GRAMMAR, source_text)
}

/// Same as [`interpret`] but with an explicit grammar override (for
/// `--grammar` or for anyone embedding a dialect of the terminal set).
pub fn interpret_with_grammar(grammar_text: &str, source_text: &str) -> Result<Vec<String>, EmberError> {
    let mut sink = std::io::sink();
    run(grammar_text, source_text, &mut sink)
}

/// Run the full pipeline, writing real `print` output to `stdout`, and
/// return the `test_print` capture buffer alongside it (§6.4's
/// "real-output mode"). Used by `main.rs`; also usable by an embedder that
/// wants both a live stream and the capture.
pub fn run(grammar_text: &str, source_text: &str, stdout: &mut dyn Write) -> Result<Vec<String>, EmberError> {
    let tokens = ember_lexer::tokenize(grammar_text, source_text).map_err(EmberError::from)?;
    let (ast, mut errors) = ember_parser::parse(tokens);
    if !errors.is_empty() {
        return Err(errors.remove(0).into());
    }
    ember_sema::analyze(&ast)?;
    let output = ember_eval::run(&ast, stdout)?;
    Ok(output)
}

/// Scan `source_text` into a token vector without parsing it. Exposed for
/// `--emit-tokens` debug dumps.
pub fn tokens(grammar_text: &str, source_text: &str) -> Result<Vec<ember_common::Token>, EmberError> {
    ember_lexer::tokenize(grammar_text, source_text).map_err(EmberError::from)
}

/// Scan and parse `source_text` into the raw CST, without lowering to an
/// AST. Exposed for `--emit-cst` debug dumps. Parse errors, if any, are
/// returned alongside the best-effort tree (§7: the caller reports only
/// the first one).
pub fn cst(grammar_text: &str, source_text: &str) -> Result<(SyntaxNode, Vec<ParseError>), EmberError> {
    let tokens = ember_lexer::tokenize(grammar_text, source_text).map_err(EmberError::from)?;
    Ok(ember_parser::parse_cst(tokens))
}

/// Scan, parse, and analyze `source_text` into the annotated AST. Exposed
/// for `--emit-ast` debug dumps.
pub fn ast(grammar_text: &str, source_text: &str) -> Result<Node, EmberError> {
    let tokens = ember_lexer::tokenize(grammar_text, source_text).map_err(EmberError::from)?;
    let (ast, mut errors) = ember_parser::parse(tokens);
    if !errors.is_empty() {
        return Err(errors.remove(0).into());
    }
    ember_sema::analyze(&ast)?;
    Ok(ast)
}
