use sprig::{
    ActivationRecord, Error, InterpreterConfig, ParserError, RuntimeError, SemaError, Value, run,
    run_with_config,
};

fn assert_bindings(record: &ActivationRecord, expected: &[(&str, Value)]) {
    for (name, value) in expected {
        assert_eq!(
            record.get(name),
            Some(*value),
            "binding '{name}' in\n{record}"
        );
    }
}

#[test]
fn procedure_result_is_bound() {
    let record = run("def int f() { return 2 + 2 * 2; } int x; x = f();").unwrap();
    assert_bindings(&record, &[("x", Value::Int(6))]);
}

#[test]
fn falsy_test_takes_else_branch() {
    let record = run(
        "def int f(){return 2+2*2;} def int g(){return 15;} int x; int y; x = 0; if(x) y = 10; else { y = 50; }",
    )
    .unwrap();
    assert_bindings(&record, &[("x", Value::Int(0)), ("y", Value::Int(50))]);
}

#[test]
fn do_while_counts_down() {
    let record =
        run("int y; int x; x = 3; do { y = y + 3; if(x){} x = x - 1; } while(x);").unwrap();
    assert_bindings(&record, &[("x", Value::Int(0)), ("y", Value::Int(9))]);
}

#[test]
fn repeated_calls_get_fresh_records() {
    let record = run("def int f(){ return 2+2; } int x; x = f(); x = f();").unwrap();
    assert_bindings(&record, &[("x", Value::Int(4))]);

    let record = run(
        "def int f() { int n; n = n + 1; return n; } int a; int b; a = f(); b = f();",
    )
    .unwrap();
    assert_bindings(&record, &[("a", Value::Int(1)), ("b", Value::Int(1))]);
}

#[test]
fn precedence() {
    let record = run("int a; int b; a = 2+2*2; b = (2+2)*2;").unwrap();
    assert_bindings(&record, &[("a", Value::Int(6)), ("b", Value::Int(8))]);
}

#[test]
fn division_yields_float() {
    let record = run("int x; x = 7/2;").unwrap();
    assert_bindings(&record, &[("x", Value::Float(3.5))]);
}

#[test]
fn integer_truthiness() {
    let record = run("int a; int b; int t; t = 0 - 2; if (t) a = 1; t = 0; if (t) b = 1;").unwrap();
    assert_bindings(&record, &[("a", Value::Int(1)), ("b", Value::Int(0))]);
}

#[test]
fn do_while_body_runs_once_when_test_is_false() {
    let record = run("int x; do { x = x + 1; } while (0);").unwrap();
    assert_bindings(&record, &[("x", Value::Int(1))]);
}

#[test]
fn final_bindings_are_sorted() {
    let record = run("int zeta; int alpha; int mid;").unwrap();
    let names: Vec<_> = record.bindings.keys().map(String::as_str).collect();
    assert_eq!(names, ["alpha", "mid", "zeta"]);
}

#[test]
fn undeclared_identifier() {
    let err = run("x = 1;").unwrap_err();
    assert!(matches!(
        err,
        Error::Sema(SemaError::IdentifierNotFound { name, .. }) if name == "x"
    ));
}

#[test]
fn duplicate_identifier_only_in_same_scope() {
    let err = run("int x; int x;").unwrap_err();
    assert!(matches!(
        err,
        Error::Sema(SemaError::DuplicateIdentifier { .. })
    ));

    assert!(run("int x; def int f() { int x; x = 1; return x; } x = f();").is_ok());
}

#[test]
fn wrong_parameter_count() {
    let err = run("def int f(int a, int b) { return a + b; } int x; x = f(1);").unwrap_err();
    assert!(matches!(
        err,
        Error::Sema(SemaError::WrongParameterCount {
            expected: 2,
            got: 1,
            ..
        })
    ));
}

#[test]
fn lexer_and_parser_errors_surface() {
    assert!(matches!(run("int x; x = 1 $ 2;"), Err(Error::Parser(_))));
    assert!(matches!(run("int x x = 1;"), Err(Error::Parser(_))));
}

#[test]
fn runaway_recursion_is_reported() {
    let err = run_with_config(
        "def int f(int n) { return f(n); } int x; x = f(1);",
        InterpreterConfig::with_max_depth(32),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Runtime(RuntimeError::StackExhausted { max_depth: 32, .. })
    ));
}

#[test]
fn deeply_nested_input_is_an_error() {
    let err = run(&format!("int x; x = {}1;", "-".repeat(200_000))).unwrap_err();
    assert!(matches!(err, Error::Parser(ParserError::TooDeep { .. })));
}

#[test]
fn runtime_errors_report_line_and_column() {
    let err = run("int x;\nx = 2 * 0;\nx = 4 / x;").unwrap_err();
    assert!(matches!(
        err,
        Error::Runtime(RuntimeError::DivisionByZero {
            line: 3,
            column: 5,
            ..
        })
    ));
}

#[test]
fn return_contract() {
    assert!(matches!(
        run("def f() { return 1; } f();"),
        Err(Error::Runtime(RuntimeError::UnexpectedReturn { .. }))
    ));
    assert!(matches!(
        run("def int f() { } int x; x = f();"),
        Err(Error::Runtime(RuntimeError::MissingReturn { .. }))
    ));
}

#[test]
fn errors_render_as_diagnostics() {
    use miette::Diagnostic;

    let err = run("int x;\nx = y;").unwrap_err();
    assert_eq!(
        err.code().map(|code| code.to_string()),
        Some("sema::identifier_not_found".to_string())
    );
    assert!(err.labels().is_some_and(|mut labels| labels.next().is_some()));
}
