use super::Value;
use ahash::AHashMap;
use std::fmt;

/// Output pin fired by every node that does not branch.
pub const EXEC_PIN: &str = "exec";
/// Exec output of `loop` and `while_loop` leading into the repeated sub-path.
pub const LOOP_BODY_PIN: &str = "Loop Body";
/// Exec output of `loop` and `while_loop` fired once the loop exits.
pub const COMPLETED_PIN: &str = "Completed";
pub const TRUE_PIN: &str = "True";
pub const FALSE_PIN: &str = "False";
/// Dynamic output published by a bounded `loop` for the current iteration.
pub const INDEX_PIN: &str = "Index";

/// Generates the closed set of node kinds together with their type names.
macro_rules! define_node_kinds {
    ( $( ($variant:ident, $type_name:expr, $data_only:expr) ),* $(,)? ) => {
        /// Every node type the engine knows how to execute or evaluate.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $( $variant, )*
        }

        impl NodeKind {
            /// All known kinds, in declaration order.
            pub const ALL: &'static [NodeKind] = &[ $( NodeKind::$variant, )* ];

            /// The type name used by serialized documents.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $( NodeKind::$variant => $type_name, )*
                }
            }

            /// Looks a kind up by its serialized type name.
            pub fn from_type_name(name: &str) -> Option<NodeKind> {
                match name {
                    $( $type_name => Some(NodeKind::$variant), )*
                    _ => None,
                }
            }

            /// Pure data-producing nodes have no exec pins.
            pub fn is_data_only(&self) -> bool {
                match self {
                    $( NodeKind::$variant => $data_only, )*
                }
            }
        }
    };
}

define_node_kinds! {
    (Start, "start", false),
    (Delay, "delay", false),
    (MouseClick, "mouse_click", false),
    (MouseMove, "mouse_move", false),
    (KeyPress, "key_press", false),
    (TypeString, "type_string", false),
    (Loop, "loop", false),
    (WhileLoop, "while_loop", false),
    (IfStatement, "if_statement", false),
    (NumberLiteral, "number_literal", true),
    (StringLiteral, "string_literal", true),
    (Math, "math", true),
    (Compare, "compare", true),
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A single node of a macro graph. Values are fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub values: AHashMap<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            values: AHashMap::new(),
        }
    }

    /// Builder-style helper to set a stored value.
    pub fn with_value(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self
    }

    /// The stored value for `field`, or `fallback` when absent or null.
    pub fn value_or(&self, field: &str, fallback: impl Into<Value>) -> Value {
        match self.values.get(field) {
            Some(value) if !value.is_null() => value.clone(),
            _ => fallback.into(),
        }
    }

    /// Lower-cased text of a static option field such as `Unit` or `Operator`.
    pub fn option(&self, field: &str, fallback: &str) -> String {
        self.value_or(field, fallback)
            .as_text()
            .trim()
            .to_lowercase()
            .replace(' ', "_")
    }
}
