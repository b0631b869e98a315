use crate::graph::{Flow, Value};

/// Converts a raw JSON field value into an engine [`Value`].
///
/// Key-recorder fields are stored by the editor as `{display, pynput}`
/// objects; only the `pynput` descriptor matters to the engine. Other
/// composite values have no scalar meaning and become `Null`.
pub fn convert_value(raw: &serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Object(map) => match map.get("pynput") {
            Some(serde_json::Value::String(descriptor)) => Value::Text(descriptor.clone()),
            _ => Value::Null,
        },
        serde_json::Value::Array(_) => Value::Null,
    }
}

/// Parses a connection's flow kind, case-insensitively.
pub fn parse_flow(raw: &str) -> Option<Flow> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "exec" => Some(Flow::Exec),
        "data" => Some(Flow::Data),
        _ => None,
    }
}
