use crate::graph::{GraphDocument, Node, NodeKind, Value, ValueKind};
use ahash::AHashMap;
use tracing::trace;

mod operators;

use operators::{apply_math, compare};

/// Values published by control-flow nodes for their current activation,
/// keyed by node id and then by output pin.
pub type DynamicOutputs = AHashMap<String, AHashMap<String, Value>>;

/// Lazily resolves the values flowing into data input pins.
///
/// Evaluation is synchronous, side-effect free and total: it never fails,
/// falling back to defaults wherever a value cannot be produced. Recursion
/// follows data connections upstream; the document guarantees that those
/// connections are acyclic.
pub struct DataEvaluator<'a> {
    document: &'a GraphDocument,
    dynamic: &'a DynamicOutputs,
}

impl<'a> DataEvaluator<'a> {
    pub fn new(document: &'a GraphDocument, dynamic: &'a DynamicOutputs) -> Self {
        Self { document, dynamic }
    }

    /// Resolves the value of input `pin` on `node_id`, coerced to `kind`.
    ///
    /// A connected pin takes the upstream output; an unconnected pin, or one
    /// whose upstream yields `Null`, takes `default`.
    pub fn resolve(&self, node_id: &str, pin: &str, kind: ValueKind, default: Value) -> Value {
        let upstream = self
            .document
            .data_source(node_id, pin)
            .map(|(source_node, source_pin)| self.evaluate_output(source_node, source_pin))
            .unwrap_or(Value::Null);

        let value = if upstream.is_null() { default } else { upstream };
        value.coerce(kind)
    }

    /// Resolves an input of `node`, defaulting to its stored value for the
    /// same field and then to `fallback`.
    pub fn input(&self, node: &Node, pin: &str, kind: ValueKind, fallback: impl Into<Value>) -> Value {
        self.resolve(&node.id, pin, kind, node.value_or(pin, fallback))
    }

    pub fn number(&self, node: &Node, pin: &str, fallback: f64) -> f64 {
        self.input(node, pin, ValueKind::Number, fallback).as_number()
    }

    pub fn text(&self, node: &Node, pin: &str, fallback: &str) -> String {
        self.input(node, pin, ValueKind::Text, fallback).as_text()
    }

    pub fn boolean(&self, node: &Node, pin: &str, fallback: bool) -> bool {
        self.input(node, pin, ValueKind::Bool, fallback).as_bool()
    }

    /// Computes the value of output `pin` on `node_id`.
    ///
    /// Dynamic outputs of an in-progress control-flow node take precedence
    /// over anything the node's type would compute. Nodes that produce no
    /// data evaluate to `Null`.
    pub fn evaluate_output(&self, node_id: &str, pin: &str) -> Value {
        if let Some(value) = self.dynamic.get(node_id).and_then(|pins| pins.get(pin)) {
            return value.clone();
        }

        let Some(node) = self.document.node(node_id) else {
            return Value::Null;
        };

        let value = match node.kind {
            NodeKind::NumberLiteral => node.value_or("value", Value::Null).coerce(ValueKind::Number),
            NodeKind::StringLiteral => node.value_or("value", Value::Null).coerce(ValueKind::Text),
            NodeKind::Math => {
                let a = self.number(node, "A", 0.0);
                let b = self.number(node, "B", 0.0);
                Value::Number(apply_math(&node.option("Operator", "add"), a, b))
            }
            NodeKind::Compare => {
                let kind = match node.option("Type", "number").as_str() {
                    "string" | "text" => ValueKind::Text,
                    _ => ValueKind::Number,
                };
                let zero = match kind {
                    ValueKind::Text => Value::Text(String::new()),
                    _ => Value::Number(0.0),
                };
                let a = self.input(node, "A", kind, zero.clone());
                let b = self.input(node, "B", kind, zero);
                Value::Bool(compare(&node.option("Operator", "=="), &a, &b))
            }
            NodeKind::Start
            | NodeKind::Delay
            | NodeKind::MouseClick
            | NodeKind::MouseMove
            | NodeKind::KeyPress
            | NodeKind::TypeString
            | NodeKind::Loop
            | NodeKind::WhileLoop
            | NodeKind::IfStatement => Value::Null,
        };

        trace!(node_id, pin, %value, "evaluated data output");
        value
    }
}
