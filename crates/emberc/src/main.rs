//! The ember interpreter CLI.
//!
//! Provides the `emberc` command with the following subcommand:
//!
//! - `emberc run <file>` - Interpret an ember source file
//!
//! Options:
//! - `--grammar <path>` - Override the embedded terminal-definition grammar
//! - `--emit-tokens` - Dump the scanned token stream instead of running
//! - `--emit-cst` - Dump the parsed concrete syntax tree instead of running
//! - `--emit-ast` - Dump the lowered, analyzed AST instead of running

use std::path::PathBuf;
use std::process;

use ariadne::{Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use ember_common::EmberError;

#[derive(Parser)]
#[command(name = "emberc", version, about = "The ember interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret an ember source file
    Run {
        /// Path to the source file
        file: PathBuf,

        /// Path to a terminal-definition grammar file (default: the embedded grammar)
        #[arg(long)]
        grammar: Option<PathBuf>,

        /// Dump the scanned token stream instead of running
        #[arg(long = "emit-tokens")]
        emit_tokens: bool,

        /// Dump the parsed concrete syntax tree instead of running
        #[arg(long = "emit-cst")]
        emit_cst: bool,

        /// Dump the lowered, analyzed AST instead of running
        #[arg(long = "emit-ast")]
        emit_ast: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, grammar, emit_tokens, emit_cst, emit_ast } => {
            if run(&file, grammar.as_deref(), emit_tokens, emit_cst, emit_ast).is_err() {
                process::exit(1);
            }
        }
    }
}

/// Execute one of the CLI's four modes: run, or one of the three debug
/// dumps. Returns `Err(())` after rendering a diagnostic, so `main` only
/// has to decide the exit code.
fn run(
    file: &std::path::Path,
    grammar_path: Option<&std::path::Path>,
    emit_tokens: bool,
    emit_cst: bool,
    emit_ast: bool,
) -> Result<(), ()> {
    let source = std::fs::read_to_string(file).map_err(|e| {
        eprintln!("error: failed to read '{}': {}", file.display(), e);
    })?;

    let grammar_text = match grammar_path {
        Some(p) => std::fs::read_to_string(p).map_err(|e| {
            eprintln!("error: failed to read grammar '{}': {}", p.display(), e);
        })?,
        None => ember_grammar::DEFAULT_GRAMMAR.to_string(),
    };

    let file_name = file.display().to_string();

    if emit_tokens {
        let tokens = emberc::tokens(&grammar_text, &source)
            .map_err(|e| report_diagnostic(&e, &source, &file_name))?;
        for tok in &tokens {
            println!("{tok}");
        }
        return Ok(());
    }

    if emit_cst {
        let (root, errors) = emberc::cst(&grammar_text, &source)
            .map_err(|e| report_diagnostic(&e, &source, &file_name))?;
        if let Some(first) = errors.into_iter().next() {
            return Err(report_diagnostic(&first.into(), &source, &file_name));
        }
        println!("{:#?}", root);
        return Ok(());
    }

    if emit_ast {
        let ast = emberc::ast(&grammar_text, &source)
            .map_err(|e| report_diagnostic(&e, &source, &file_name))?;
        println!("{:#?}", ast);
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    emberc::run(&grammar_text, &source, &mut handle)
        .map_err(|e| report_diagnostic(&e, &source, &file_name))?;
    Ok(())
}

/// Render a fatal error using `ariadne`, pointed at the failing
/// `line:column` (§6.4's "diagnostic line containing kind, message, and
/// `line:column`"). `ariadne` wants a byte span, not a line/column pair, so
/// this resolves the position back to a byte offset in `source` first.
fn report_diagnostic(err: &EmberError, source: &str, file_name: &str) {
    let pos = err.position();
    let offset = byte_offset(source, pos.line, pos.column).min(source.len());
    let span = offset..(offset + 1).min(source.len().max(1));

    let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, span.clone())
        .with_message(format!("{} ({})", err, file_name))
        .with_label(Label::new(span).with_message(err.to_string()))
        .finish()
        .eprint(Source::from(source));
}

/// Resolve a 1-based `(line, column)` pair to a byte offset into `source`.
/// Falls back to the end of the source if the position is out of range
/// (best-effort: diagnostics still print the `line:column` in their text
/// regardless of span accuracy).
fn byte_offset(source: &str, line: u32, column: u32) -> usize {
    let mut offset = 0usize;
    for (idx, l) in source.split_inclusive('\n').enumerate() {
        if idx as u32 + 1 == line {
            return offset + (column as usize).min(l.len());
        }
        offset += l.len();
    }
    source.len()
}
