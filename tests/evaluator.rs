//! Tests for lazy data evaluation.
mod common;
use common::*;
use macrobot::graph::INDEX_PIN;
use macrobot::prelude::*;

fn math(id: &str, a: f64, b: f64, operator: &str) -> Node {
    Node::new(id, NodeKind::Math)
        .with_value("A", a)
        .with_value("B", b)
        .with_value("Operator", operator)
}

fn compare(id: &str, kind: &str, operator: &str, a: impl Into<Value>, b: impl Into<Value>) -> Node {
    Node::new(id, NodeKind::Compare)
        .with_value("Type", kind)
        .with_value("Operator", operator)
        .with_value("A", a)
        .with_value("B", b)
}

fn evaluate(nodes: Vec<Node>, connections: Vec<Connection>, node: &str, pin: &str) -> Value {
    let mut all = vec![start("start")];
    all.extend(nodes);
    let doc = document(all, connections, "start");
    let dynamic = DynamicOutputs::new();
    DataEvaluator::new(&doc, &dynamic).evaluate_output(node, pin)
}

#[test]
fn test_math_operators() {
    for (operator, expected) in [("add", 9.0), ("subtract", 3.0), ("multiply", 18.0), ("divide", 2.0)] {
        let value = evaluate(vec![math("m", 6.0, 3.0, operator)], vec![], "m", "Result");
        assert_eq!(value, Value::Number(expected), "operator {}", operator);
    }
}

#[test]
fn test_math_divide_by_zero_is_zero() {
    let value = evaluate(vec![math("m", 6.0, 0.0, "divide")], vec![], "m", "Result");
    assert_eq!(value, Value::Number(0.0));
}

#[test]
fn test_math_coerces_text_inputs() {
    let node = Node::new("m", NodeKind::Math)
        .with_value("A", "4")
        .with_value("B", "not a number")
        .with_value("Operator", "Add");
    assert_eq!(evaluate(vec![node], vec![], "m", "Result"), Value::Number(4.0));
}

#[test]
fn test_compare_string_operators() {
    let cases = [
        ("starts_with", "hello", "he", true),
        ("ends_with", "hello", "lo", true),
        ("contains", "hello", "ell", true),
        ("contains", "hello", "xyz", false),
        ("==", "hello", "hello", true),
        ("!=", "hello", "hello", false),
    ];
    for (operator, a, b, expected) in cases {
        let value = evaluate(vec![compare("c", "string", operator, a, b)], vec![], "c", "Result");
        assert_eq!(value, Value::Bool(expected), "{} {} {}", a, operator, b);
    }
}

#[test]
fn test_compare_number_operators() {
    let cases = [
        ("==", 2.0, 2.0, true),
        ("!=", 2.0, 3.0, true),
        (">", 3.0, 2.0, true),
        ("<", 3.0, 2.0, false),
        (">=", 2.0, 2.0, true),
        ("<=", 1.0, 2.0, true),
    ];
    for (operator, a, b, expected) in cases {
        let value = evaluate(vec![compare("c", "number", operator, a, b)], vec![], "c", "Result");
        assert_eq!(value, Value::Bool(expected), "{} {} {}", a, operator, b);
    }
}

#[test]
fn test_compare_faults_read_as_false() {
    // String operators are meaningless for numbers.
    let value = evaluate(vec![compare("c", "number", "contains", 12.0, 1.0)], vec![], "c", "Result");
    assert_eq!(value, Value::Bool(false));

    let value = evaluate(vec![compare("c", "string", "~=", "a", "a")], vec![], "c", "Result");
    assert_eq!(value, Value::Bool(false));
}

#[test]
fn test_number_compare_coerces_text() {
    let value = evaluate(vec![compare("c", "number", ">", "10", "9")], vec![], "c", "Result");
    assert_eq!(value, Value::Bool(true));
}

#[test]
fn test_data_chain_is_resolved_recursively() {
    // (2 + 4) * 10 via two math nodes and a number literal.
    let nodes = vec![
        Node::new("ten", NodeKind::NumberLiteral).with_value("value", "10"),
        math("sum", 2.0, 4.0, "add"),
        math("product", 0.0, 0.0, "multiply"),
    ];
    let connections = vec![
        Connection::data("sum", "Result", "product", "A"),
        Connection::data("ten", "out", "product", "B"),
    ];
    assert_eq!(evaluate(nodes, connections, "product", "Result"), Value::Number(60.0));
}

#[test]
fn test_resolve_falls_back_to_default() {
    let doc = document(
        vec![
            start("start"),
            Node::new("delay", NodeKind::Delay),
            // A loop publishes nothing outside its activation, so it reads as Null.
            Node::new("loop", NodeKind::Loop),
        ],
        vec![Connection::data("loop", INDEX_PIN, "delay", "Duration")],
        "start",
    );
    let dynamic = DynamicOutputs::new();
    let evaluator = DataEvaluator::new(&doc, &dynamic);

    let connected_but_null = evaluator.resolve("delay", "Duration", ValueKind::Number, Value::Number(7.0));
    assert_eq!(connected_but_null, Value::Number(7.0));

    let unconnected = evaluator.resolve("delay", "Unit", ValueKind::Text, Value::from("seconds"));
    assert_eq!(unconnected, Value::from("seconds"));
}

#[test]
fn test_dynamic_outputs_take_precedence() {
    let doc = document(
        vec![
            start("start"),
            Node::new("loop", NodeKind::Loop),
            Node::new("m", NodeKind::Math).with_value("B", 100.0),
        ],
        vec![Connection::data("loop", INDEX_PIN, "m", "A")],
        "start",
    );
    let mut dynamic = DynamicOutputs::new();
    dynamic
        .entry("loop".to_string())
        .or_default()
        .insert(INDEX_PIN.to_string(), Value::Number(3.0));

    let evaluator = DataEvaluator::new(&doc, &dynamic);
    assert_eq!(evaluator.evaluate_output("m", "Result"), Value::Number(103.0));
}

#[test]
fn test_string_literal_and_fan_out() {
    let doc = document(
        vec![
            start("start"),
            Node::new("s", NodeKind::StringLiteral).with_value("value", "hello"),
            Node::new("c1", NodeKind::Compare)
                .with_value("Type", "string")
                .with_value("Operator", "starts_with")
                .with_value("B", "he"),
            Node::new("c2", NodeKind::Compare)
                .with_value("Type", "String")
                .with_value("Operator", "ends_with")
                .with_value("B", "xx"),
        ],
        vec![
            Connection::data("s", "out", "c1", "A"),
            Connection::data("s", "out", "c2", "A"),
        ],
        "start",
    );
    let dynamic = DynamicOutputs::new();
    let evaluator = DataEvaluator::new(&doc, &dynamic);
    assert_eq!(evaluator.evaluate_output("c1", "Result"), Value::Bool(true));
    assert_eq!(evaluator.evaluate_output("c2", "Result"), Value::Bool(false));
}
