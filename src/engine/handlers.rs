use super::{Engine, fault, seconds_to_duration, to_seconds};
use crate::backend::MouseButton;
use crate::error::NodeFault;
use crate::graph::{
    COMPLETED_PIN, EXEC_PIN, FALSE_PIN, INDEX_PIN, LOOP_BODY_PIN, Node, NodeKind, TRUE_PIN,
    Value,
};
use ahash::AHashMap;
use tracing::debug;

/// The output pin a node fires, or `None` when its path ends here.
type Fired = Option<&'static str>;

impl<'a> Engine<'a> {
    /// Dispatches one node and returns the exec pin it fired.
    pub(super) fn execute_node(&mut self, node: &'a Node) -> Result<Fired, NodeFault> {
        if !self.state.is_running() {
            return Ok(None);
        }

        match node.kind {
            NodeKind::Start => Ok(Some(EXEC_PIN)),
            NodeKind::Delay => self.delay(node),
            NodeKind::MouseClick => self.mouse_click(node),
            NodeKind::MouseMove => self.mouse_move(node),
            NodeKind::KeyPress => self.key_press(node),
            NodeKind::TypeString => self.type_string(node),
            NodeKind::Loop => self.bounded_loop(node),
            NodeKind::WhileLoop => self.while_loop(node),
            NodeKind::IfStatement => self.if_statement(node),
            NodeKind::NumberLiteral
            | NodeKind::StringLiteral
            | NodeKind::Math
            | NodeKind::Compare => {
                debug!(node_id = %node.id, "data node reached on exec path");
                Ok(None)
            }
        }
    }

    fn delay(&mut self, node: &Node) -> Result<Fired, NodeFault> {
        let duration = self.evaluator().number(node, "Duration", 1.0);
        let seconds = to_seconds(duration, &node.option("Unit", "seconds"));
        self.wait(node, seconds_to_duration(seconds))?;
        Ok(Some(EXEC_PIN))
    }

    fn mouse_click(&mut self, node: &Node) -> Result<Fired, NodeFault> {
        let button = MouseButton::parse(&node.option("Button", "left"));
        let double_click = node.option("Action", "click") == "double_click";
        self.backend
            .click(button, double_click)
            .map_err(|source| fault(node, source))?;
        Ok(Some(EXEC_PIN))
    }

    fn mouse_move(&mut self, node: &Node) -> Result<Fired, NodeFault> {
        let (x, y, duration) = {
            let evaluator = self.evaluator();
            (
                evaluator.number(node, "X", 0.0),
                evaluator.number(node, "Y", 0.0),
                evaluator.number(node, "Duration", 0.25),
            )
        };
        let seconds = to_seconds(duration, &node.option("Unit", "seconds"));
        self.backend
            .move_to(x as i32, y as i32, seconds.max(0.0))
            .map_err(|source| fault(node, source))?;
        Ok(Some(EXEC_PIN))
    }

    fn key_press(&mut self, node: &Node) -> Result<Fired, NodeFault> {
        let descriptor = self.evaluator().text(node, "Key", "");
        let keys = parse_key_descriptor(&descriptor);

        let result = match keys.as_slice() {
            [] => {
                debug!(node_id = %node.id, "no key recorded, skipping");
                Ok(())
            }
            [key] => self.backend.press_key(key),
            combo => self.backend.press_combo(combo),
        };
        result.map_err(|source| fault(node, source))?;
        Ok(Some(EXEC_PIN))
    }

    fn type_string(&mut self, node: &Node) -> Result<Fired, NodeFault> {
        let (text, delay) = {
            let evaluator = self.evaluator();
            (
                evaluator.text(node, "Text", ""),
                evaluator.number(node, "Delay", 50.0),
            )
        };
        let per_char = to_seconds(delay, &node.option("Unit", "milliseconds"));
        self.backend
            .type_text(&text, per_char.max(0.0))
            .map_err(|source| fault(node, source))?;
        Ok(Some(EXEC_PIN))
    }

    fn bounded_loop(&mut self, node: &'a Node) -> Result<Fired, NodeFault> {
        let iterations = self.evaluator().number(node, "Iterations", 5.0).trunc().max(0.0) as u64;
        let document = self.document;
        let body = document.next_exec(&node.id, LOOP_BODY_PIN);
        self.state.dynamic_outputs.remove(&node.id);

        for index in 0..iterations {
            if !self.state.is_running() {
                break;
            }
            debug!(node_id = %node.id, index, iterations, "loop iteration");
            self.state.dynamic_outputs.insert(
                node.id.clone(),
                AHashMap::from_iter([(INDEX_PIN.to_string(), Value::Number(index as f64))]),
            );
            if let Some(body) = body {
                self.walk(body)?;
            }
        }

        self.state.dynamic_outputs.remove(&node.id);
        Ok(Some(COMPLETED_PIN))
    }

    fn while_loop(&mut self, node: &'a Node) -> Result<Fired, NodeFault> {
        let document = self.document;
        let body = document.next_exec(&node.id, LOOP_BODY_PIN);
        let mut iteration = 0u64;

        while self.state.is_running() && self.evaluator().boolean(node, "Condition", false) {
            debug!(node_id = %node.id, iteration, "while iteration");
            iteration += 1;
            if let Some(body) = body {
                self.walk(body)?;
            }
        }
        Ok(Some(COMPLETED_PIN))
    }

    fn if_statement(&mut self, node: &Node) -> Result<Fired, NodeFault> {
        if self.evaluator().boolean(node, "Condition", false) {
            Ok(Some(TRUE_PIN))
        } else {
            Ok(Some(FALSE_PIN))
        }
    }
}

/// Splits a recorded key descriptor such as `<ctrl>+s` into key names.
///
/// A `+` where a key is expected is the plus key itself, so `<ctrl>++` is
/// Ctrl and plus, and a bare `+` is a single key.
pub(crate) fn parse_key_descriptor(descriptor: &str) -> Vec<String> {
    let cleaned = descriptor.replace(['<', '>'], "");
    let mut keys = Vec::new();
    let mut current = String::new();
    let mut expecting_key = true;

    for c in cleaned.chars() {
        if c != '+' {
            current.push(c);
            continue;
        }
        let pending = current.trim();
        if !pending.is_empty() {
            keys.push(pending.to_string());
            current.clear();
            expecting_key = true;
        } else if expecting_key {
            keys.push("+".to_string());
            current.clear();
            expecting_key = false;
        } else {
            expecting_key = true;
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        keys.push(last.to_string());
    }
    keys
}
