//! End-to-end tests for the `emberc` binary itself (§6.4): argument
//! parsing, the three `--emit-*` debug dumps, the `--grammar` override, and
//! the exit-code contract (0 on success, 1 on any unrecoverable error).
//! Grounded on the teacher's `snowc/tests/tooling_e2e.rs` shape: spawn the
//! built binary via `CARGO_BIN_EXE_emberc`, write fixtures to a `tempfile`
//! scratch directory, assert on `Output`.

use std::path::PathBuf;
use std::process::Command;

fn emberc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_emberc"))
}

fn write_source(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn run_executes_the_program_and_prints_to_real_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "main.ember", r#"main() None { print("hi") }"#);

    let output = Command::new(emberc_bin()).args(["run", file.to_str().unwrap()]).output().unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\n");
}

#[test]
fn run_exits_1_and_reports_a_diagnostic_on_a_semantic_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "main.ember", r#"main() None { let a int = "x" }"#);

    let output = Command::new(emberc_bin()).args(["run", file.to_str().unwrap()]).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty(), "expected a diagnostic on stderr");
}

#[test]
fn run_exits_1_when_the_file_does_not_exist() {
    let output = Command::new(emberc_bin()).args(["run", "/no/such/file.ember"]).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn emit_tokens_dumps_the_token_stream() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "main.ember", "main() None { }");

    let output =
        Command::new(emberc_bin()).args(["run", file.to_str().unwrap(), "--emit-tokens"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Name(\"main\")"), "got:\n{stdout}");
}

#[test]
fn emit_cst_dumps_the_concrete_syntax_tree() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "main.ember", "main() None { }");

    let output = Command::new(emberc_bin()).args(["run", file.to_str().unwrap(), "--emit-cst"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SOURCE_FILE"), "got:\n{stdout}");
    assert!(stdout.contains("FUNCTION_DECL"), "got:\n{stdout}");
}

#[test]
fn emit_ast_dumps_the_lowered_ast() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "main.ember", "main() None { }");

    let output = Command::new(emberc_bin()).args(["run", file.to_str().unwrap(), "--emit-ast"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Start"), "got:\n{stdout}");
}

#[test]
fn grammar_override_accepts_an_external_grammar_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "main.ember", r#"main() None { test_print("ok") }"#);
    let grammar = dir.path().join("grammar.txt");
    std::fs::write(&grammar, ember_grammar::DEFAULT_GRAMMAR).unwrap();

    let output = Command::new(emberc_bin())
        .args(["run", file.to_str().unwrap(), "--grammar", grammar.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn grammar_override_reports_an_error_for_a_missing_grammar_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_source(&dir, "main.ember", "main() None { }");

    let output = Command::new(emberc_bin())
        .args(["run", file.to_str().unwrap(), "--grammar", "/no/such/grammar.txt"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}
