use super::*;
use crate::ast::{Operator, UnaryOperator};
use crate::config::DEFAULT_MAX_CALL_DEPTH;
use crate::lexer::tokenize;
use crate::parser::{parse, Parser};

#[test]
fn test_integer_arithmetic() {
    let cases = vec![
        ("5", 5.into()),
        ("1 + 2", 3.into()),
        ("1 - 2", (-1).into()),
        ("4 / 2", 2.into()),
        ("7 / 2", 3.into()),
        ("(0 - 7) / 2", (-3).into()),
        ("50 / 2 * 2 + 10 - 5", 55.into()),
        ("5 + 5 + 5 + 5 - 10", 10.into()),
        ("2 * 2 * 2 * 2 * 2", 32.into()),
        ("5 * 2 + 10", 20.into()),
        ("5 + 2 * 10", 25.into()),
        ("5 * (2 + 10)", 60.into()),
        ("(5 + 10 * 2 + 15 / 3) * 2 - 10", 50.into()),
    ];

    run_expression_tests(cases);
}

#[test]
fn test_real_arithmetic() {
    let cases = vec![
        ("1.5 + 1", 2.5.into()),
        ("1 + 1.5", 2.5.into()),
        ("7 / 2.0", 3.5.into()),
        ("0.5 * 4", 2.0.into()),
        ("1.0 / 4", 0.25.into()),
        ("3 - 0.5", 2.5.into()),
    ];

    run_expression_tests(cases);
}

#[test]
fn test_boolean_expressions() {
    let cases = vec![
        ("true", true.into()),
        ("false", false.into()),
        ("1 < 2", true.into()),
        ("1 > 2", false.into()),
        ("2 <= 2", true.into()),
        ("3 >= 4", false.into()),
        ("1 == 1", true.into()),
        ("1 != 1", false.into()),
        ("1 == 1.0", true.into()),
        ("1.5 < 2", true.into()),
        ("\"a\" == \"a\"", true.into()),
        ("\"a\" != \"b\"", true.into()),
        ("true == true", true.into()),
        ("true != false", true.into()),
        ("(1 < 2) == true", true.into()),
        ("(1 > 2) == true", false.into()),
        ("!true", false.into()),
        ("!false", true.into()),
        ("!!false", false.into()),
        ("!(1 > 2)", true.into()),
    ];

    run_expression_tests(cases);
}

#[test]
fn test_literals_are_typed_by_content() {
    let cases = vec![
        ("\"hello\"", "hello".into()),
        ("\"42\" + 1", 43.into()),
        ("\"TRUE\"", true.into()),
        (
            "[1, \"two\", 3.0]",
            Value::Array(vec![1.into(), "two".into(), 3.0.into()]),
        ),
        (
            "[[1], []]",
            Value::Array(vec![Value::Array(vec![1.into()]), Value::Array(vec![])]),
        ),
    ];

    run_expression_tests(cases);
}

#[test]
fn test_operator_type_errors() {
    let unsupported = |operator: Operator, left: &str, right: &str| RuntimeError::UnsupportedOperator {
        operator,
        left: left.to_owned(),
        right: right.to_owned(),
    };

    let cases = vec![
        ("\"a\" + \"b\"", unsupported(Operator::Plus, "string", "string")),
        ("\"a\" < \"b\"", unsupported(Operator::Less, "string", "string")),
        ("1 + \"x\"", unsupported(Operator::Plus, "int", "string")),
        ("true + 1", unsupported(Operator::Plus, "bool", "int")),
        ("true < false", unsupported(Operator::Less, "bool", "bool")),
        ("[1] == [1]", unsupported(Operator::Equal, "[int]", "[int]")),
        (
            "!5",
            RuntimeError::UnsupportedUnaryOperator {
                operator: UnaryOperator::Not,
                operand: "int".to_owned(),
            },
        ),
        ("1 / 0", RuntimeError::DivisionByZero),
        ("1.5 / 0", RuntimeError::DivisionByZero),
        ("1 / 0.0", RuntimeError::DivisionByZero),
        (
            "9223372036854775807 + 1",
            RuntimeError::IntegerOverflow {
                operator: Operator::Plus,
            },
        ),
        (
            "9223372036854775807 * 2",
            RuntimeError::IntegerOverflow {
                operator: Operator::Star,
            },
        ),
    ];

    for (input, expected) in cases {
        assert_eq!(test_eval(input), Err(expected), "input: {}", input);
    }
}

#[test]
fn test_variable_declarations() {
    let state = run_ok("var x: int = 5; var y: int = 3; x = x + y;");
    assert_eq!(state.get("x"), Some(&Value::Int(8)));
    assert_eq!(state.get("y"), Some(&Value::Int(3)));

    let state = run_ok(
        "var a: int; var b: float64; var c: bool; var d: string; var e: [int]; var f: [int, string];",
    );
    assert_eq!(state.get("a"), Some(&Value::Int(0)));
    assert_eq!(state.get("b"), Some(&Value::Real(0.0)));
    assert_eq!(state.get("c"), Some(&Value::Bool(false)));
    assert_eq!(state.get("d"), Some(&Value::String(String::new())));
    assert_eq!(state.get("e"), Some(&Value::Array(vec![])));
    assert_eq!(
        state.get("f"),
        Some(&Value::Array(vec![0.into(), "".into()]))
    );
}

#[test]
fn test_declaration_errors() {
    let cases = vec![
        (
            "var x: int = 1; var x: int = 2;",
            RuntimeError::VariableRedeclared {
                name: "x".to_owned(),
            },
        ),
        (
            "var x: int = 1; var x: int = missing;",
            RuntimeError::VariableRedeclared {
                name: "x".to_owned(),
            },
        ),
        (
            "var x: int = 2.5;",
            RuntimeError::DeclarationTypeMismatch {
                name: "x".to_owned(),
                expected: "int".to_owned(),
                found: "float64".to_owned(),
            },
        ),
        (
            "var t: [int, string] = [1, 2];",
            RuntimeError::DeclarationTypeMismatch {
                name: "t".to_owned(),
                expected: "[int, string]".to_owned(),
                found: "[int, int]".to_owned(),
            },
        ),
        (
            "var y: int = x;",
            RuntimeError::UndefinedVariable {
                name: "x".to_owned(),
            },
        ),
        (
            "x = 1;",
            RuntimeError::UndefinedVariable {
                name: "x".to_owned(),
            },
        ),
        (
            "var x: int = 1; x = \"one\";",
            RuntimeError::AssignmentTypeMismatch {
                name: "x".to_owned(),
                expected: "int".to_owned(),
                found: "string".to_owned(),
            },
        ),
    ];

    run_error_tests(cases);
}

#[test]
fn test_arrays_and_tuples() {
    let state = run_ok(
        "var a: [int] = [1, 2, 3];
         var b: int = a[1];
         var t: [int, string] = [1, \"a\"];
         var s: string = t[1];
         var m: [[int]] = [[1, 2], [3, 4]];
         var c: int = m[1][0];",
    );
    assert_eq!(state.get("b"), Some(&Value::Int(2)));
    assert_eq!(state.get("s"), Some(&"a".into()));
    assert_eq!(state.get("c"), Some(&Value::Int(3)));
}

#[test]
fn test_index_errors() {
    let cases = vec![
        (
            "var a: [int] = [1, 2, 3]; var b: int = a[0 - 1];",
            RuntimeError::IndexOutOfRange {
                index: -1,
                length: 3,
            },
        ),
        (
            "var a: [int] = [1, 2, 3]; var b: int = a[3];",
            RuntimeError::IndexOutOfRange { index: 3, length: 3 },
        ),
        (
            "var a: [int] = [1]; var b: int = a[1.5];",
            RuntimeError::NonIntegerIndex {
                found: "float64".to_owned(),
            },
        ),
        (
            "var x: int = 5; var y: int = x[0];",
            RuntimeError::NotAnArray {
                target: "x".to_owned(),
                found: "int".to_owned(),
            },
        ),
    ];

    run_error_tests(cases);
}

#[test]
fn test_if_statements() {
    let state = run_ok(
        "var r: string = \"none\";
         if (1 > 2) { r = \"then\"; } else { r = \"else\"; }",
    );
    assert_eq!(state.get("r"), Some(&"else".into()));

    let state = run_ok(
        "var n: int = 2; var r: string = \"?\";
         if n == 1 { r = \"one\"; } else if n == 2 { r = \"two\"; } else { r = \"many\"; }",
    );
    assert_eq!(state.get("r"), Some(&"two".into()));

    let state = run_ok("var x: int = 1; if true { var tmp: int = 2; x = tmp; }");
    assert_eq!(state.get("x"), Some(&Value::Int(2)));
    assert_eq!(state.get("tmp"), Some(&Value::Int(2)));

    let state = run_ok("var x: int = 0; if (x == 0) { var y: int = 7; } else { var z: int = 1; }");
    assert_eq!(state.get("y"), Some(&Value::Int(7)));
    assert_eq!(state.get("z"), None);

    run_error_tests(vec![
        (
            "if 1 { }",
            RuntimeError::NonBooleanCondition {
                found: "int".to_owned(),
            },
        ),
        (
            "var x: int = 0; if (x == 0) { var x: int = 7; }",
            RuntimeError::VariableRedeclared {
                name: "x".to_owned(),
            },
        ),
        (
            "if true { var y: int = 1; } var y: int = 2;",
            RuntimeError::VariableRedeclared {
                name: "y".to_owned(),
            },
        ),
    ]);
}

#[test]
fn test_for_statements() {
    let state = run_ok(
        "var total: int = 0;
         for (var i: int = 0; i < 5; i = i + 1) { total = total + i; }",
    );
    assert_eq!(state.get("total"), Some(&Value::Int(10)));
    assert_eq!(state.get("i"), None);

    let state = run_ok(
        "var count: int = 0;
         for (var i: int = 0; i < 3; i = i + 1) {
             for (var j: int = 0; j < 4; j = j + 1) {
                 var step: int = 1;
                 count = count + step;
             }
         }",
    );
    assert_eq!(state.get("count"), Some(&Value::Int(12)));

    assert_eq!(state.get("step"), None);

    let state = run_ok(
        "var total: int = 0;
         for (var i: int = 0; i < 2; i = i + 1) { total = total + 1; }
         for (var i: int = 0; i < 3; i = i + 1) { total = total + 1; }
         var i: int = 9;",
    );
    assert_eq!(state.get("total"), Some(&Value::Int(5)));
    assert_eq!(state.get("i"), Some(&Value::Int(9)));

    let state = run_ok("var n: int = 0; for (n = 10; n < 3; n = n + 1) { n = 100; }");
    assert_eq!(state.get("n"), Some(&Value::Int(10)));

    run_error_tests(vec![
        (
            "for (var i: int = 0; i; i = i + 1) { }",
            RuntimeError::NonBooleanCondition {
                found: "int".to_owned(),
            },
        ),
        (
            "var total: int = 0; for (var i: int = 0; i < 3; i = i + 1) { var total: int = i; }",
            RuntimeError::VariableRedeclared {
                name: "total".to_owned(),
            },
        ),
        (
            "for (var i: int = 0; i < 3; i = i + 1) { var i: int = 1; }",
            RuntimeError::VariableRedeclared {
                name: "i".to_owned(),
            },
        ),
    ]);
}

#[test]
fn test_function_calls() {
    let state = run_ok(
        "func add(a: int, b: int): int { return a + b; }
         var r: int = add(2, 3);",
    );
    assert_eq!(state.get("r"), Some(&Value::Int(5)));
    assert_eq!(state.get("a"), None);

    let state = run_ok(
        "func fib(n: int): int {
             if n < 2 { return n; }
             return fib(n - 1) + fib(n - 2);
         }
         var f: int = fib(15);",
    );
    assert_eq!(state.get("f"), Some(&Value::Int(610)));

    let state = run_ok(
        "func sign(n: int): int {
             if n < 0 { return 0 - 1; }
             return 1;
         }
         var a: int = sign(0 - 5);
         var b: int = sign(5);",
    );
    assert_eq!(state.get("a"), Some(&Value::Int(-1)));
    assert_eq!(state.get("b"), Some(&Value::Int(1)));

    let state = run_ok(
        "func firstOver(xs: [int], limit: int): int {
             for (var i: int = 0; i < 3; i = i + 1) {
                 if xs[i] > limit { return xs[i]; }
             }
             return 0 - 1;
         }
         var r: int = firstOver([1, 5, 9], 4);
         var none: int = firstOver([1, 2, 3], 4);",
    );
    assert_eq!(state.get("r"), Some(&Value::Int(5)));
    assert_eq!(state.get("none"), Some(&Value::Int(-1)));
}

#[test]
fn test_function_scoping() {
    let state = run_ok(
        "var x: int = 1;
         func scale(x: int): int { var y: int = x * 10; return y; }
         var r: int = scale(4);",
    );
    assert_eq!(state.get("x"), Some(&Value::Int(1)));
    assert_eq!(state.get("r"), Some(&Value::Int(40)));
    assert_eq!(state.get("y"), None);

    let state = run_ok(
        "var counter: int = 0;
         func bump() { counter = counter + 1; }
         bump(); bump()",
    );
    assert_eq!(state.get("counter"), Some(&Value::Int(2)));

    let state = run_ok("func one(): int { return 1; } one();");
    assert!(state.is_empty());

    run_error_tests(vec![(
        "func inner(): int { return hidden; }
         func outer(): int { var hidden: int = 1; return inner(); }
         var r: int = outer();",
        RuntimeError::UndefinedVariable {
            name: "hidden".to_owned(),
        },
    )]);
}

#[test]
fn test_function_errors() {
    let cases = vec![
        (
            "func f(): int { return 1; } func f(): int { return 2; }",
            RuntimeError::FunctionRedeclared {
                name: "f".to_owned(),
            },
        ),
        (
            "var x: int = g();",
            RuntimeError::UndefinedFunction {
                name: "g".to_owned(),
            },
        ),
        (
            "func f(a: int) { } f(1, 2);",
            RuntimeError::ArityMismatch {
                function: "f".to_owned(),
                expected: 1,
                found: 2,
            },
        ),
        (
            "func f(a: int) { } f(\"x\");",
            RuntimeError::ArgumentTypeMismatch {
                function: "f".to_owned(),
                parameter: "a".to_owned(),
                expected: "int".to_owned(),
                found: "string".to_owned(),
            },
        ),
        (
            "func f(): int { return \"s\"; } var x: int = f();",
            RuntimeError::ReturnTypeMismatch {
                function: "f".to_owned(),
                expected: "int".to_owned(),
                found: "string".to_owned(),
            },
        ),
        (
            "func f() { return 1; } f();",
            RuntimeError::ReturnTypeMismatch {
                function: "f".to_owned(),
                expected: "void".to_owned(),
                found: "int".to_owned(),
            },
        ),
        (
            "func f(n: int): int { if n > 0 { return 1; } } var x: int = f(0);",
            RuntimeError::MissingReturnValue {
                function: "f".to_owned(),
            },
        ),
        (
            "func f() { } var x: int = f();",
            RuntimeError::VoidValue {
                function: "f".to_owned(),
            },
        ),
        (
            "func f(a: int, a: int) { } f(1, 2);",
            RuntimeError::VariableRedeclared {
                name: "a".to_owned(),
            },
        ),
        ("return;", RuntimeError::ReturnOutsideFunction),
        ("if true { return 1; }", RuntimeError::ReturnOutsideFunction),
    ];

    run_error_tests(cases);
}

#[test]
fn test_call_depth_limit() {
    let program = parse_program(
        "func forever(n: int): int { return forever(n + 1); }
         var x: int = forever(0);",
    );
    let mut interpreter = Interpreter::with_config(Config::default().with_max_call_depth(16));
    assert_eq!(
        interpreter.interpret(&program),
        Err(RuntimeError::CallDepthExceeded { limit: 16 })
    );

    let program = parse_program(
        "func down(n: int): int { if n == 0 { return 0; } return down(n - 1); }
         var x: int = down(15);",
    );
    let mut interpreter = Interpreter::with_config(Config::default().with_max_call_depth(16));
    assert!(interpreter.interpret(&program).is_ok());
}

#[test]
fn test_default_call_depth_stops_runaway_recursion() {
    let program = parse_program(
        "func forever(n: int): int { return forever(n + 1); }
         var x: int = forever(0);",
    );
    assert_eq!(
        Interpreter::new().interpret(&program),
        Err(RuntimeError::CallDepthExceeded {
            limit: DEFAULT_MAX_CALL_DEPTH
        })
    );
}

#[test]
fn test_state_survives_errors() {
    let mut interpreter = Interpreter::new();
    let failing = parse_program("var a: int = 1; var b: int = c;");
    assert!(interpreter.interpret(&failing).is_err());
    assert_eq!(interpreter.state().get("a"), Some(&Value::Int(1)));

    let program = parse_program(
        "func broken(): int { var local: int = 1; return missing; }
         var x: int = broken();",
    );
    assert!(interpreter.interpret(&program).is_err());

    let state = interpreter
        .interpret(&parse_program("var b: int = a + 1;"))
        .unwrap();
    assert_eq!(state.get("b"), Some(&Value::Int(2)));
    assert_eq!(state.get("local"), None);
    assert_eq!(interpreter.env.call_depth(), 0);
}

fn parse_program(input: &str) -> Program {
    parse(tokenize(input).expect("Lex errors found")).expect("Parse errors found")
}

fn run(input: &str) -> Result<State> {
    Interpreter::new().interpret(&parse_program(input))
}

fn run_ok(input: &str) -> State {
    match run(input) {
        Ok(state) => state,
        Err(err) => panic!("input {:?} failed: {}", input, err),
    }
}

fn run_error_tests(cases: Vec<(&str, RuntimeError)>) {
    for (input, expected) in cases {
        assert_eq!(run(input), Err(expected), "input: {}", input);
    }
}

fn test_eval(input: &str) -> Result<Value> {
    let mut parser = Parser::new(tokenize(input).expect("Lex errors found"));
    let expr = parser.parse_expression().expect("Parse errors found");
    Interpreter::new().evaluate(&expr)
}

fn run_expression_tests(cases: Vec<(&str, Value)>) {
    for (input, expected) in cases {
        assert_eq!(test_eval(input), Ok(expected), "input: {}", input);
    }
}
