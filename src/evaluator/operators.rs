use crate::graph::Value;

/// Applies a `math` operator. Division by zero yields `0`; unknown operators
/// yield `0` as well.
pub(super) fn apply_math(operator: &str, a: f64, b: f64) -> f64 {
    let result = match operator {
        "add" | "+" => a + b,
        "subtract" | "-" => a - b,
        "multiply" | "*" => a * b,
        "divide" | "/" => {
            if b == 0.0 {
                0.0
            } else {
                a / b
            }
        }
        _ => 0.0,
    };
    if result.is_finite() { result } else { 0.0 }
}

/// Numeric comparison. Unknown operators compare as `false`.
pub(super) fn compare_numbers(operator: &str, a: f64, b: f64) -> bool {
    match operator {
        "==" => a == b,
        "!=" => a != b,
        ">" => a > b,
        "<" => a < b,
        ">=" => a >= b,
        "<=" => a <= b,
        _ => false,
    }
}

/// Text comparison; `contains`, `starts_with` and `ends_with` test `b`
/// against `a`. Unknown operators compare as `false`.
pub(super) fn compare_text(operator: &str, a: &str, b: &str) -> bool {
    match operator {
        "==" => a == b,
        "!=" => a != b,
        "contains" => a.contains(b),
        "starts_with" => a.starts_with(b),
        "ends_with" => a.ends_with(b),
        _ => false,
    }
}

/// Compares two already-coerced values. Mismatched operands are a fault
/// that reads as `false`.
pub(super) fn compare(operator: &str, a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(operator, *a, *b),
        (Value::Text(a), Value::Text(b)) => compare_text(operator, a, b),
        _ => false,
    }
}
