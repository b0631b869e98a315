use std::fmt;

/// Runtime value types flowing along data connections.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    #[default]
    Null,
}

/// The kind a data input is coerced to before a node consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Text,
    Bool,
}

const TRUTHY: [&str; 5] = ["true", "1", "t", "y", "yes"];

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts the value into `kind`. Never fails: unconvertible input falls
    /// back to the zero value of the target kind (`0`, `""` or `false`).
    pub fn coerce(&self, kind: ValueKind) -> Value {
        match kind {
            ValueKind::Number => Value::Number(self.as_number()),
            ValueKind::Text => Value::Text(self.as_text()),
            ValueKind::Bool => Value::Bool(self.as_bool()),
        }
    }

    /// Numeric view of the value. Always finite.
    pub fn as_number(&self) -> f64 {
        let n = match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Null => 0.0,
        };
        if n.is_finite() { n } else { 0.0 }
    }

    pub fn as_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            // Anything outside the truthy set, including the explicit falsy
            // spellings, reads as false.
            Value::Text(s) => {
                let normalized = s.trim().to_lowercase();
                TRUTHY.contains(&normalized.as_str())
            }
            Value::Null => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
