use super::*;
use crate::config::UnusedPolicy;
use crate::diagnostic::Severity;

fn run_with(src: &str, rule: RuleId, config: &LintConfig) -> Vec<Diagnostic> {
    let source = SourceFile::new(src);
    let symbols = SymbolTable::collect(&source);
    let ctx = RuleContext::new(&source, &symbols, config);
    run_one(&ctx, rule)
}

fn run(src: &str, rule: RuleId) -> Vec<Diagnostic> {
    run_with(src, rule, &LintConfig::default())
}

fn spans(diags: &[Diagnostic]) -> Vec<(usize, usize, usize)> {
    diags.iter().map(|d| (d.line, d.start, d.end)).collect()
}

#[test]
fn test_split_args_respects_nesting() {
    assert_eq!(split_args("a, f(b, c), [1, 2]"), vec!["a", "f(b, c)", "[1, 2]"]);
    assert!(split_args("   ").is_empty());
    assert_eq!(split_args("1,"), vec!["1"]);
}

#[test]
fn test_find_calls_handles_nested_parens() {
    let calls = find_calls("x = f(g(1), 2);");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].name, "f");
    assert_eq!(calls[0].args, Some("g(1), 2"));
    assert_eq!((calls[0].col, calls[0].end), (4, 14));
    assert_eq!(calls[1].name, "g");
    assert_eq!(calls[1].args, Some("1"));

    let open = find_calls("total = sum(1,");
    assert_eq!(open[0].args, None);
}

#[test]
fn test_mode_directive() {
    let d = run("#mode strict;", RuleId::ModeDirective);
    assert_eq!(d.len(), 1);
    assert_eq!(d[0].severity, Severity::Error);

    let d = run("#mode static", RuleId::ModeDirective);
    assert_eq!(d.len(), 1);
    assert_eq!(d[0].severity, Severity::Warning);
    assert_eq!(d[0].message, "Missing semicolon after #mode directive.");

    assert!(run("#mode both;\nx = 1;", RuleId::ModeDirective).is_empty());
}

#[test]
fn test_brackets() {
    let d = run("x = (1 + 2;", RuleId::BracketMismatch);
    assert_eq!(spans(&d), vec![(0, 4, 5)]);
    assert_eq!(d[0].message, "Unclosed '('.");

    let d = run(")", RuleId::BracketMismatch);
    assert_eq!(d[0].message, "Unexpected ')': no matching opener.");

    let d = run("a = [1, 2);", RuleId::BracketMismatch);
    assert_eq!(spans(&d), vec![(0, 9, 10)]);
    assert!(d[0].message.contains("expected closing for '[' from line 1"));

    assert!(run(r#"s = "(";  // {"#, RuleId::BracketMismatch).is_empty());
    assert!(run("tantrum f(a) {\n  if (a) { x = [1]; }\n}", RuleId::BracketMismatch).is_empty());
}

#[test]
fn test_unterminated_string() {
    let d = run(r#"x = "abc"#, RuleId::UnterminatedString);
    assert_eq!(spans(&d), vec![(0, 4, 8)]);
    assert!(run(r#"x = "abc"; // "open"#, RuleId::UnterminatedString).is_empty());
}

#[test]
fn test_escape_sequences() {
    let d = run(r#"s = "\q";"#, RuleId::InvalidEscape);
    assert_eq!(spans(&d), vec![(0, 5, 7)]);
    assert!(d[0].message.starts_with(r"Invalid escape sequence '\q'."));

    assert!(run(r#"s = "\n\t\\\"\r\0";"#, RuleId::InvalidEscape).is_empty());
    // backslashes outside strings are not escapes
    assert!(run(r"x = a \q b; // \z", RuleId::InvalidEscape).is_empty());
}

#[test]
fn test_missing_semicolon() {
    let d = run("x = 1", RuleId::MissingSemicolon);
    assert_eq!(spans(&d), vec![(0, 5, 5)]);

    let d = run("print(x)   // trailing", RuleId::MissingSemicolon);
    assert_eq!(spans(&d), vec![(0, 8, 8)]);

    let exempt = "if (x) {\n} else {\n}\nwhile (y)\ntantrum f()\ntry\ncatch (e)\n#mode both;\nx = 1; // ok\nfoo(1,\n  2);";
    assert!(run(exempt, RuleId::MissingSemicolon).is_empty());
}

#[test]
fn test_empty_condition() {
    let d = run("if () {\n}\nwhile(  ) {\n}", RuleId::EmptyCondition);
    assert_eq!(spans(&d), vec![(0, 0, 5), (2, 0, 9)]);
    assert_eq!(d[1].message, "Empty condition in 'while' statement.");
}

const ADD: &str = "tantrum int add(int a, int b) { return a + b; }\n";

#[test]
fn test_call_arity_and_types() {
    let src = format!("{ADD}add(\"x\", 1);\nadd(1, 2);\nadd(1);");
    let d = run(&src, RuleId::CallMismatch);
    assert_eq!(d.len(), 2);
    assert_eq!(d[0].message, "'add' param 1 ('a') expects 'int' but got 'string'.");
    assert_eq!(spans(&d[..1]), vec![(1, 0, 11)]);
    assert_eq!(d[1].line, 3);
    assert_eq!(d[1].message, "'add' expects 2 arg(s) but got 1.");
}

#[test]
fn test_dynamic_mode_checks_only_arity() {
    let src = format!("#mode dynamic;\n{ADD}add(\"x\", 1);\nadd(1);");
    let d = run(&src, RuleId::CallMismatch);
    assert_eq!(d.len(), 1);
    assert!(d[0].message.contains("expects 2 arg(s)"));
}

#[test]
fn test_nested_calls_and_widening() {
    let src = "tantrum f(a) { return a; }\ntantrum g(float v) { return v; }\nx = f(f(1));\ng(1);\ng(\"a, b\");";
    let d = run(src, RuleId::CallMismatch);
    assert_eq!(d.len(), 1);
    assert_eq!(d[0].line, 4);
    assert!(d[0].message.contains("expects 'float' but got 'string'"));
}

#[test]
fn test_assignment_types() {
    let d = run(r#"int x = "hello";"#, RuleId::AssignmentType);
    assert_eq!(spans(&d), vec![(0, 8, 15)]);
    assert_eq!(d[0].message, "Cannot assign 'string' to 'int' variable 'x'.");

    assert!(run("float f = 1;", RuleId::AssignmentType).is_empty());

    let d = run("int x = 1;\nx = \"s\";\ny = 1;\ny = \"s\";", RuleId::AssignmentType);
    assert_eq!(d.len(), 1);
    assert_eq!(d[0].line, 1);

    let d = run("tantrum f(int a) {\n  a = 2.5;\n}", RuleId::AssignmentType);
    assert_eq!(d.len(), 1);
    assert!(d[0].message.contains("'float' to 'int' variable 'a'"));

    assert!(run("#mode dynamic;\nint x = \"s\";", RuleId::AssignmentType).is_empty());
}

#[test]
fn test_duplicate_function() {
    let d = run("tantrum f() { }\ntantrum f() { }\ntantrum f() { }", RuleId::DuplicateFunction);
    assert_eq!(spans(&d), vec![(1, 8, 9), (2, 8, 9)]);
    assert_eq!(d[0].message, "Duplicate function 'f': already defined on line 1.");
}

#[test]
fn test_duplicate_variable_same_block_only() {
    let src = "int x = 1;\nint x = 2;\nif (x) {\n  int x = 3;\n}";
    let d = run(src, RuleId::DuplicateVariable);
    assert_eq!(spans(&d), vec![(1, 4, 5)]);
    assert_eq!(d[0].message, "Variable 'x' already declared in this scope (line 1).");
}

#[test]
fn test_undefined_function() {
    let d = run("foo(1);", RuleId::UndefinedFunction);
    assert_eq!(spans(&d), vec![(0, 0, 3)]);
    assert_eq!(
        d[0].message,
        "'foo' is not defined. Did you forget to declare it with 'tantrum'?"
    );

    let d = run("tantrum main() { helper(); print(len(x)); }", RuleId::UndefinedFunction);
    assert_eq!(spans(&d), vec![(0, 17, 23)]);

    assert!(run("x = alloc int(5);\nif (x) {\n}", RuleId::UndefinedFunction).is_empty());
}

#[test]
fn test_undefined_variable() {
    let d = run("x = y + 1;", RuleId::UndefinedVariable);
    assert_eq!(spans(&d), vec![(0, 4, 5)]);
    assert_eq!(d[0].message, "'y' may be undefined.");

    let d = run("print(z);", RuleId::UndefinedVariable);
    assert_eq!(spans(&d), vec![(0, 6, 7)]);

    // string-literal lines are skipped entirely
    assert!(run(r#"print("a", z);"#, RuleId::UndefinedVariable).is_empty());
    // calls are left to the undefined-function rule
    assert!(run("x = foo(1);", RuleId::UndefinedVariable).is_empty());

    let bound = "tantrum f(n) {\n  return n;\n}\nfor item in items {\n  print(item);\n}\ntry {\n} catch (e) {\n  print(e);\n}";
    assert!(run(bound, RuleId::UndefinedVariable).is_empty());
}

#[test]
fn test_undefined_variable_skips_any_line_with_a_string() {
    let src = "tantrum main() {\n  m[\"k\"] = zz;\n  print(m);\n}";
    let d = run(src, RuleId::UndefinedVariable);
    assert!(d.iter().all(|d| d.line != 1), "{d:?}");
}

#[test]
fn test_header_with_params_on_two_lines() {
    let src = "tantrum int add(int a,\n                int b) {\n    return a + b;\n}\nprint(add(1, 2));";
    assert!(run(src, RuleId::UndefinedFunction).is_empty());
    assert!(run(src, RuleId::ReturnOutsideFunction).is_empty());
    assert!(run(src, RuleId::CallMismatch).is_empty());
    assert!(run(src, RuleId::MissingReturn).is_empty());
    assert!(run(src, RuleId::MissingSemicolon).is_empty());

    let d = run(&format!("{src}\nprint(add(1));"), RuleId::CallMismatch);
    assert_eq!(d.len(), 1);
    assert_eq!(d[0].line, 5);
}

#[test]
fn test_return_outside_function() {
    let d = run("return 1;", RuleId::ReturnOutsideFunction);
    assert_eq!(spans(&d), vec![(0, 0, 6)]);
    assert!(run("tantrum f() {\n  return 1;\n}", RuleId::ReturnOutsideFunction).is_empty());
    assert!(run("tantrum f()\n{\n  if (x) { return; }\n}", RuleId::ReturnOutsideFunction).is_empty());
}

#[test]
fn test_dead_code() {
    let d = run("tantrum int f() {\n  return 1;\n  print(2);\n}", RuleId::DeadCode);
    assert_eq!(spans(&d), vec![(2, 2, 11)]);
    assert_eq!(d[0].message, "Unreachable code after 'return'.");

    let branches = "tantrum int f(x) {\n  if (x) {\n    return 1;\n  }\n  return 2;\n}";
    assert!(run(branches, RuleId::DeadCode).is_empty());

    let d = run("tantrum f() {\n  return;\n  x = 1; }", RuleId::DeadCode);
    assert_eq!(d.iter().map(|d| d.line).collect::<Vec<_>>(), vec![2]);

    // two returns in one block still report each line once
    let d = run("tantrum f() {\n  return;\n  return;\n  x = 1;\n}", RuleId::DeadCode);
    assert_eq!(d.iter().map(|d| d.line).collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn test_division_by_zero() {
    let d = run("y = 10 / 0;", RuleId::DivisionByZero);
    assert_eq!(spans(&d), vec![(0, 7, 10)]);
    assert_eq!(run("y = 10 / 0.0;", RuleId::DivisionByZero).len(), 1);
    assert_eq!(run("x /= 0;", RuleId::DivisionByZero).len(), 1);
    assert!(run(r#"s = "10 / 0";"#, RuleId::DivisionByZero).is_empty());
    assert!(run("y = 10 / 05;\nz = 1 / 0.5;", RuleId::DivisionByZero).is_empty());
}

#[test]
fn test_missing_return() {
    let d = run(r#"tantrum int f() { print("hi"); }"#, RuleId::MissingReturn);
    assert_eq!(spans(&d), vec![(0, 12, 13)]);
    assert_eq!(d[0].message, "Function 'f' has return type but may not return a value.");

    assert!(run(r#"tantrum int f() { print("hi"); return 0; }"#, RuleId::MissingReturn).is_empty());
    assert!(run("tantrum void g() {\n}\ntantrum h() {\n}", RuleId::MissingReturn).is_empty());
    assert!(run("tantrum int f(x) {\n  if (x) {\n    return 1;\n  }\n}", RuleId::MissingReturn).is_empty());
}

#[test]
fn test_unused_variables_policy() {
    let d = run("int x = 5;", RuleId::UnusedVariable);
    assert_eq!(spans(&d), vec![(0, 4, 5)]);
    assert_eq!(d[0].message, "Variable 'int x' is declared but never used.");
    assert!(run("int x = 5;\nprint(x);", RuleId::UnusedVariable).is_empty());

    let d = run("y = 1;", RuleId::UnusedVariable);
    assert_eq!(d[0].message, "Variable 'y' is declared but never used.");

    let typed_only = LintConfig {
        unused_variables: UnusedPolicy::TypedOnly,
        ..LintConfig::default()
    };
    assert!(run_with("y = 1;", RuleId::UnusedVariable, &typed_only).is_empty());
}

#[test]
fn test_shadowed_builtin() {
    let d = run("int print = 1;\nlen = 3;\nx = 2;", RuleId::ShadowedBuiltin);
    assert_eq!(spans(&d), vec![(0, 4, 9), (1, 0, 3)]);
    assert_eq!(d[1].message, "'len' shadows a built-in function.");
}

#[test]
fn test_empty_block_only_for_control_structures() {
    let d = run("if (x) {\n}\ntantrum f() {\n}\n  while (y) {\n  }", RuleId::EmptyBlock);
    assert_eq!(spans(&d), vec![(0, 0, 8), (4, 2, 13)]);
}

#[test]
fn test_static_mode_rules() {
    let src = "#mode static;\nx = 1;\nint y = 2;\ny = 3;\nfor i in range(3) {\n  i = 0;\n}";
    let d = run(src, RuleId::StaticUntypedAssignment);
    assert_eq!(spans(&d), vec![(1, 0, 1)]);
    assert_eq!(
        d[0].message,
        "Static mode: variable 'x' must be declared with a type (e.g., int x = ...)."
    );

    let src = "#mode static;\ntantrum f() { }\ntantrum int g() { return 1; }\ntantrum main() { }";
    let d = run(src, RuleId::StaticMissingReturnType);
    assert_eq!(spans(&d), vec![(1, 8, 9)]);

    assert!(run("x = 1;\ntantrum f() { }", RuleId::StaticUntypedAssignment).is_empty());
    assert!(run("tantrum f() { }", RuleId::StaticMissingReturnType).is_empty());
}

#[test]
fn test_run_all_skips_disabled_rules() {
    let source = SourceFile::new("y = 10 / 0");
    let symbols = SymbolTable::collect(&source);
    let config = LintConfig {
        disabled: vec!["missing-semicolon".to_string()],
        ..LintConfig::default()
    };
    let ctx = RuleContext::new(&source, &symbols, &config);
    let mut out = Vec::new();
    run_all(&ctx, &mut out);
    assert!(out.iter().any(|d| d.rule == RuleId::DivisionByZero));
    assert!(!out.iter().any(|d| d.rule == RuleId::MissingSemicolon));
}
