use crate::ast::Node;
use crate::environment::Environment;
use crate::eval::eval;
use crate::object::Object;
use crate::parser::parse;
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn run(input: &str) -> Option<Object> {
    let (program, errors) = parse(input);
    assert!(errors.is_empty(), "parse errors for {:?}: {:?}", input, errors);
    let env = Rc::new(Environment::new());
    eval(&Node::Program(program), &env)
}

fn run_value(input: &str) -> Object {
    match run(input) {
        Some(value) => value,
        None => panic!("no value for {:?}", input),
    }
}

fn error(message: &str) -> Object {
    Object::Error(message.to_string())
}

fn int_array(values: &[i64]) -> Object {
    Object::Array(Rc::new(values.iter().map(|v| Object::Integer(*v)).collect()))
}

#[test]
fn test_integer_expressions() {
    let tests = vec![
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ("7 / 2", 3),
        ("-7 / 2", -3),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), Object::Integer(expected), "input {:?}", input);
    }
}

#[test]
fn test_integer_overflow_wraps() {
    assert_eq!(run_value("9223372036854775807 + 1"), Object::Integer(i64::MIN));
    assert_eq!(run_value("-9223372036854775807 - 2"), Object::Integer(i64::MAX));
    assert_eq!(run_value("5 / 0"), error("division by zero"));
}

#[test]
fn test_boolean_expressions() {
    let tests = vec![
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("(1 < 2) == true", true),
        ("(1 > 2) == true", false),
        ("(1 > 2) == false", true),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), Object::Boolean(expected), "input {:?}", input);
    }
}

#[test]
fn test_bang_operator() {
    let tests = vec![
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!!true", true),
        ("!!false", false),
        ("!!5", true),
        ("!if (false) { 1 }", true),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), Object::Boolean(expected), "input {:?}", input);
    }
}

// Only `true` selects the consequence: 0, 1, strings and null all take the
// alternative.
#[test]
fn test_if_else_only_true_is_truthy() {
    let tests = vec![
        ("if (true) { 10 }", Object::Integer(10)),
        ("if (false) { 10 }", Object::Null),
        ("if (1) { 10 }", Object::Null),
        ("if (1 < 2) { 10 }", Object::Integer(10)),
        ("if (1 > 2) { 10 }", Object::Null),
        ("if (1 > 2) { 10 } else { 20 }", Object::Integer(20)),
        ("if (1 < 2) { 10 } else { 20 }", Object::Integer(10)),
        ("if (false) { 1 } else { 2 }", Object::Integer(2)),
        ("if (0) { 1 } else { 2 }", Object::Integer(2)),
        ("if (\"yes\") { 1 } else { 2 }", Object::Integer(2)),
        ("if (if (false) { 1 }) { 1 } else { 2 }", Object::Integer(2)),
        ("if (true) { }", Object::Null),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), expected, "input {:?}", input);
    }
}

#[test]
fn test_return_statements() {
    let tests = vec![
        ("return 10;", Object::Integer(10)),
        ("return 10; 9;", Object::Integer(10)),
        ("return 2 * 5; 9;", Object::Integer(10)),
        ("9; return 2 * 5; 9;", Object::Integer(10)),
        ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", Object::Integer(10)),
        ("let f = fn(x) { return x; x + 10; }; f(10);", Object::Integer(10)),
        ("let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);",
         Object::Integer(20)),
        ("return;", Object::Null),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), expected, "input {:?}", input);
    }
}

#[test]
fn test_error_handling() {
    let tests = vec![
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("5; 5 + true; 5", "type mismatch: INTEGER + BOOLEAN"),
        ("if (10 > 1) { 1 + true; 2 }", "type mismatch: INTEGER + BOOLEAN"),
        ("if (10 > 1) { if (10 > 1) { return true - 1; } return 1; }",
         "type mismatch: BOOLEAN - INTEGER"),
        ("foobar", "identifier not found: foobar"),
        (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
        (r#"{"name": "Monkey"}[fn(x) { x }];"#, "unusable as hash key: FUNCTION"),
        (r#"{[1]: 2}"#, "unusable as hash key: ARRAY"),
        ("5[0]", "index operator not supported: INTEGER"),
        ("let x = 5; x(1)", "not a function: INTEGER"),
        ("[1, missing, 3]", "identifier not found: missing"),
        ("len(1, 2)", "wrong number of arguments. got=2, want=1"),
        ("let f = fn(x) { x }; f(nope)", "identifier not found: nope"),
        ("let a = -true; a", "unknown operator: -BOOLEAN"),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), error(expected), "input {:?}", input);
    }
}

#[test]
fn test_same_kind_operands() {
    // no arithmetic on these, but no mismatch either
    assert_eq!(run_value("true + false"), Object::Null);
    assert_eq!(run_value("5; true + false"), Object::Null);
    assert_eq!(run_value("[1, 2] == [1, 2]"), Object::Boolean(true));
    assert_eq!(run_value("[1, 2] != [1, 3]"), Object::Boolean(true));
}

#[test]
fn test_errors_short_circuit() {
    assert_eq!(run_value("5 + true; 10;"), error("type mismatch: INTEGER + BOOLEAN"));
    assert_eq!(run_value("let f = fn() { 1 + true }; f(); 10"),
               error("type mismatch: INTEGER + BOOLEAN"));
    assert_eq!(run_value("let x = 1 + true; x"), error("type mismatch: INTEGER + BOOLEAN"));
}

#[test]
fn test_return_inside_expressions() {
    let tests = vec![
        ("let f = fn() { let x = if (true) { return 5; }; 10 }; f()", Object::Integer(5)),
        ("let f = fn() { let x = if (true) { return 5; }; [x, 10] }; f()", Object::Integer(5)),
        ("let f = fn() { 1 + if (true) { return 2; } }; f()", Object::Integer(2)),
        ("let f = fn() { [1, if (true) { return 3; }, 4] }; f()", Object::Integer(3)),
        ("let f = fn() { len(if (true) { return 4; }) }; f()", Object::Integer(4)),
        ("let f = fn() { return if (true) { return 6; }; }; f()", Object::Integer(6)),
        ("let x = if (true) { return 7; }; 8", Object::Integer(7)),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), expected, "input {:?}", input);
    }
    // the carrier never leaks into a call's result
    assert_eq!(run_value("let f = fn() { if (true) { return 1; } }; [f(), f()]"), int_array(&[1, 1]));
}

#[test]
fn test_let_statements() {
    let tests = vec![
        ("let a = 5; a;", 5),
        ("let a = 5 * 5; a;", 25),
        ("let a = 5; let b = a; b;", 5),
        ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), Object::Integer(expected), "input {:?}", input);
    }
    assert_eq!(run("let a = 5;"), None);
    assert_eq!(run(""), None);
}

#[test]
fn test_function_object() {
    match run_value("fn(x) { x + 2; };") {
        Object::Function(func) => {
            let params: Vec<_> = func.parameters.iter().map(|p| p.to_string()).collect();
            assert_eq!(params, vec!["x"]);
            assert_eq!(func.body.to_string(), "{ (x + 2) }");
        },
        other => panic!("not a function: {:?}", other),
    }
    assert_eq!(run_value("fn(x, y) { x + y }").inspect(), "fn(x, y) { (x + y) }");
}

#[test]
fn test_function_application() {
    let tests = vec![
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x; }(5)", 5),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), Object::Integer(expected), "input {:?}", input);
    }
}

#[test]
fn test_arity_is_not_checked() {
    assert_eq!(run_value("let f = fn(x) { x }; f(1, 2, 3)"), Object::Integer(1));
    assert_eq!(run_value("let f = fn(x, y) { y }; f(1)"), error("identifier not found: y"));
    assert_eq!(run_value("let f = fn() { }; f()"), Object::Null);
}

#[test]
fn test_closures() {
    assert_eq!(run_value("let add = fn(x){ fn(y){ x + y } }; add(2)(3);"), Object::Integer(5));
    let input = "
        let newAdder = fn(x) { fn(y) { x + y }; };
        let addTwo = newAdder(2);
        addTwo(2);";
    assert_eq!(run_value(input), Object::Integer(4));
}

#[test]
fn test_closures_share_their_environment() {
    // bound after the closure was created, in the scope it captured
    let input = "
        let get = fn() { later };
        let later = 42;
        get()";
    assert_eq!(run_value(input), Object::Integer(42));

    let input = "
        let x = 1;
        let get = fn() { x };
        let x = 2;
        get()";
    assert_eq!(run_value(input), Object::Integer(2));
}

#[test]
fn test_call_scopes_are_private() {
    let input = "
        let f = fn() { let hidden = 1; hidden };
        f();
        hidden";
    assert_eq!(run_value(input), error("identifier not found: hidden"));
}

#[test]
fn test_recursion() {
    let input = "
        let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } };
        fib(15)";
    assert_eq!(run_value(input), Object::Integer(610));
}

#[test]
fn test_strings() {
    assert_eq!(run_value(r#""Hello World!""#), Object::Str("Hello World!".to_string()));
    assert_eq!(run_value(r#""Hello" + " " + "World!""#), Object::Str("Hello World!".to_string()));
    assert_eq!(run_value(r#""a" == "a""#), error("unknown operator: STRING == STRING"));
}

#[test]
fn test_builtin_functions() {
    let tests = vec![
        (r#"len("")"#, Object::Integer(0)),
        (r#"len("four")"#, Object::Integer(4)),
        (r#"len("hello world")"#, Object::Integer(11)),
        ("len([1, 2, 3])", Object::Integer(3)),
        ("len(1)", error("argument to `len` not supported, got INTEGER")),
        (r#"len("one", "two")"#, error("wrong number of arguments. got=2, want=1")),
        ("first([1, 2, 3])", Object::Integer(1)),
        ("first([])", Object::Null),
        ("first(1)", error("argument to `first` must be ARRAY, got INTEGER")),
        ("last([1, 2, 3])", Object::Integer(3)),
        ("last([])", Object::Null),
        ("rest([1, 2, 3])", int_array(&[2, 3])),
        ("rest([])", Object::Null),
        ("push([], 1)", int_array(&[1])),
        ("push([1, 2], 3)", int_array(&[1, 2, 3])),
        ("push(1, 1)", error("argument to `push` must be ARRAY, got INTEGER")),
        ("puts(1)", Object::Null),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), expected, "input {:?}", input);
    }
}

#[test]
fn test_push_leaves_original() {
    let input = "let a = [1, 2]; let b = push(a, 3); [a, b]";
    let expected = Object::Array(Rc::new(vec![int_array(&[1, 2]), int_array(&[1, 2, 3])]));
    assert_eq!(run_value(input), expected);
}

#[test]
fn test_builtins_are_shadowable() {
    assert_eq!(run_value("let len = fn(x) { 99 }; len([])"), Object::Integer(99));
    assert_eq!(run_value("len").inspect(), "builtin function");
}

#[test]
fn test_array_literals_and_indexing() {
    assert_eq!(run_value("[1, 2 * 2, 3 + 3]"), int_array(&[1, 4, 6]));
    let tests = vec![
        ("[1, 2, 3][0]", Object::Integer(1)),
        ("[1, 2, 3][1]", Object::Integer(2)),
        ("[1, 2, 3][2]", Object::Integer(3)),
        ("let i = 0; [1][i];", Object::Integer(1)),
        ("[1, 2, 3][1 + 1];", Object::Integer(3)),
        ("let myArray = [1, 2, 3]; myArray[2];", Object::Integer(3)),
        ("let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];", Object::Integer(6)),
        ("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", Object::Integer(2)),
        ("[1, 2, 3][3]", Object::Null),
        ("[1, 2, 3][-1]", Object::Null),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), expected, "input {:?}", input);
    }
}

#[test]
fn test_hash_literals_and_indexing() {
    let input = r#"
        let two = "two";
        {
            "one": 10 - 9,
            two: 1 + 1,
            "thr" + "ee": 6 / 2,
            4: 4,
            true: 5,
            false: 6
        }"#;
    let hash = run_value(input);
    let lookups = vec![
        (Object::Str("one".to_string()), 1),
        (Object::Str("two".to_string()), 2),
        (Object::Str("three".to_string()), 3),
        (Object::Integer(4), 4),
        (Object::Boolean(true), 5),
        (Object::Boolean(false), 6),
    ];
    match &hash {
        Object::Hash(pairs) => {
            assert_eq!(pairs.len(), lookups.len());
            for (key, value) in lookups {
                let pair = pairs.get(&key.hash_key().unwrap()).unwrap();
                assert_eq!(pair.key, key);
                assert_eq!(pair.value, Object::Integer(value));
            }
        },
        other => panic!("not a hash: {:?}", other),
    }

    let tests = vec![
        (r#"{"foo": 5}["foo"]"#, Object::Integer(5)),
        (r#"{"foo": 5}["bar"]"#, Object::Null),
        (r#"let key = "foo"; {"foo": 5}[key]"#, Object::Integer(5)),
        (r#"{}["foo"]"#, Object::Null),
        ("{5: 5}[5]", Object::Integer(5)),
        ("{true: 5}[true]", Object::Integer(5)),
        ("{false: 5}[false]", Object::Integer(5)),
        ("{1: 1, 1: 2}[1]", Object::Integer(2)),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input), expected, "input {:?}", input);
    }
}

#[test]
fn test_inspect() {
    let tests = vec![
        ("5", "5"),
        ("true", "true"),
        ("if (false) { 1 }", "null"),
        (r#""monkey""#, "monkey"),
        ("[1, true, \"x\"]", "[1, true, x]"),
        ("{2: 2, 1: 1}", "{1: 1, 2: 2}"),
        ("1 + true", "error: type mismatch: INTEGER + BOOLEAN"),
        ("macro(x) { x }", "macro(x) { x }"),
    ];
    for (input, expected) in tests {
        assert_eq!(run_value(input).inspect(), expected, "input {:?}", input);
    }
}

#[test]
fn test_quote() {
    let tests = vec![
        ("quote(5)", "5"),
        ("quote(5 + 8)", "(5 + 8)"),
        ("quote(foobar)", "foobar"),
        ("quote(foobar + barfoo)", "(foobar + barfoo)"),
    ];
    for (input, expected) in tests {
        match run_value(input) {
            Object::Quote(node) => assert_eq!(node.to_string(), expected, "input {:?}", input),
            other => panic!("input {:?}: not a quote: {:?}", input, other),
        }
    }
    assert_eq!(run_value("quote(1, 2)"), error("wrong number of arguments to quote. got=2, want=1"));
}

#[test]
fn test_unquote() {
    let tests = vec![
        ("quote(unquote(4))", "4"),
        ("quote(unquote(4 + 4))", "8"),
        ("quote(8 + unquote(4 + 4))", "(8 + 8)"),
        ("quote(unquote(4 + 4) + 8)", "(8 + 8)"),
        ("let foobar = 8; quote(foobar)", "foobar"),
        ("let foobar = 8; quote(unquote(foobar))", "8"),
        ("quote(unquote(true))", "true"),
        ("quote(unquote(true == false))", "false"),
        (r#"quote(unquote("str"))"#, r#""str""#),
        ("quote(unquote(quote(4 + 4)))", "(4 + 4)"),
        ("let quotedInfix = quote(4 + 4); quote(unquote(4 + 4) + unquote(quotedInfix))",
         "(8 + (4 + 4))"),
        ("quote(unquote(-4))", "-4"),
    ];
    for (input, expected) in tests {
        match run_value(input) {
            Object::Quote(node) => assert_eq!(node.to_string(), expected, "input {:?}", input),
            other => panic!("input {:?}: not a quote: {:?}", input, other),
        }
    }
}

#[test]
fn test_unquote_failures() {
    assert_eq!(run_value("quote(unquote(missing))"), error("identifier not found: missing"));
    assert_eq!(run_value("quote(unquote([1]))"),
               error("cannot unquote ARRAY into the syntax tree"));
}
