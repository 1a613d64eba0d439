//! End-to-end tests for the embeddable `interpret()` entry point (§6.4),
//! driving the concrete scenarios from spec.md §8 straight through the
//! whole pipeline: scan, parse, analyze, evaluate.

fn run(source: &str) -> Vec<String> {
    emberc::interpret(source).unwrap_or_else(|e| panic!("interpret failed: {e}"))
}

fn run_err(source: &str) -> ember_common::EmberError {
    emberc::interpret(source).expect_err("expected interpret to fail")
}

#[test]
fn e2e_let_binding_and_str_conversion() {
    let out = run(r#"main() None { let a int = 10  test_print(str(a)) }"#);
    assert_eq!(out, vec!["10".to_string()]);
}

#[test]
fn e2e_function_calls_compose() {
    let out = run(
        r#"
sum(a int, b int) int { ret a + b }
main() None { test_print(str(sum(sum(1,2),3))) }
"#,
    );
    assert_eq!(out, vec!["6".to_string()]);
}

#[test]
fn e2e_for_loop_over_a_string_list() {
    let out = run(r#"main() None { for x in ["Hello","world"] { test_print(x) } }"#);
    assert_eq!(out, vec!["Hello".to_string(), "world".to_string()]);
}

#[test]
fn e2e_while_loop_counts_up() {
    let out = run(
        r#"main() None { var x int = 0  while x < 5 { test_print(str(x))  x = x + 1 } }"#,
    );
    assert_eq!(out, vec!["0", "1", "2", "3", "4"]);
}

#[test]
fn e2e_break_stops_only_the_innermost_loop() {
    let out = run(
        r#"
main() None {
  var x int = 0
  while x < 5 {
    if x > 2 { break }
    test_print(str(x))
    x = x + 1
  }
}
"#,
    );
    assert_eq!(out, vec!["0", "1", "2"]);
}

#[test]
fn e2e_append_mutates_an_int_list_in_place() {
    let out = run(
        r#"main() None { let xs IntList = [1,2]  append(3, xs)  test_print(str(xs)) }"#,
    );
    assert_eq!(out, vec!["[1, 2, 3]"]);
}

#[test]
fn e2e_type_mismatch_on_declaration() {
    let err = run_err(r#"main() None { let a int = "x" }"#);
    assert_eq!(err.stage(), "semantic");
    assert!(err.to_string().contains("expected type int"));
}

#[test]
fn e2e_reassigning_a_let_binding_is_an_error() {
    let err = run_err(r#"main() None { let a int = 1  a = 2 }"#);
    assert_eq!(err.stage(), "semantic");
    assert!(err.to_string().contains("cannot reassign"));
}

#[test]
fn e2e_missing_return_type_is_a_parse_error() {
    let err = run_err("test() { ret a or b }");
    assert_eq!(err.stage(), "parse");
}

#[test]
fn e2e_comma_expression_is_not_a_primary() {
    let err = run_err("test() void { ret a,b }");
    assert_eq!(err.stage(), "parse");
}

#[test]
fn e2e_unrecognized_input_is_a_lex_error() {
    let err = run_err("$$$$$$");
    assert_eq!(err.stage(), "lex");
}

#[test]
fn e2e_nested_loops_break_only_the_inner_for() {
    let out = run(
        r#"
main() None {
  for row in [1,2] {
    for col in [1,2,3] {
      if col > 1 { break }
      test_print(str(row))
    }
  }
}
"#,
    );
    assert_eq!(out, vec!["1", "2"]);
}

#[test]
fn e2e_var_reassignment_with_matching_type_succeeds() {
    let out = run(
        r#"main() None { var x int = 1  x = 2  x = 3  test_print(str(x)) }"#,
    );
    assert_eq!(out, vec!["3"]);
}

#[test]
fn e2e_if_expression_as_a_value() {
    let out = run(
        r#"
classify(n int) str {
  ret if n > 0 { ret "pos" } elif n < 0 { ret "neg" } else { ret "zero" }
}
main() None {
  test_print(classify(5))
  test_print(classify(-5))
  test_print(classify(0))
}
"#,
    );
    assert_eq!(out, vec!["pos", "neg", "zero"]);
}

#[test]
fn e2e_bare_return_on_its_own_line_terminates_the_function() {
    // The ordinary way to write a bare `ret` is on its own line, `}` on the
    // next — exercises the token controller's newline-lookahead restoration.
    let out = run(
        r#"
greet() None {
    test_print("hi")
    ret
}
main() None { greet() }
"#,
    );
    assert_eq!(out, vec!["hi"]);
}

#[test]
fn e2e_remove_of_an_absent_value_is_an_error() {
    let err = run_err(r#"main() None { var xs IntList = [1,2,3]  remove(9, xs) }"#);
    assert_eq!(err.stage(), "eval");
}
