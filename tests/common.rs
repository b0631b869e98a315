//! Common test utilities for building macro documents and recording actions.
use macrobot::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A single call received by the [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum Action {
    Click(MouseButton, bool),
    Move(i32, i32, f64),
    Key(String),
    Combo(Vec<String>),
    Type(String, f64),
    Sleep(f64),
}

/// An action backend that records every call instead of touching the OS.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    actions: Mutex<Vec<Action>>,
    real_sleep: bool,
    fail_clicks: bool,
}

#[allow(dead_code)]
impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps for real, so cancellation timing can be observed.
    pub fn sleeping() -> Self {
        Self {
            real_sleep: true,
            ..Self::default()
        }
    }

    /// Every click fails with an `ActionError`.
    pub fn failing_clicks() -> Self {
        Self {
            fail_clicks: true,
            ..Self::default()
        }
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    /// All recorded actions except sleeps.
    pub fn effects(&self) -> Vec<Action> {
        self.actions()
            .into_iter()
            .filter(|a| !matches!(a, Action::Sleep(_)))
            .collect()
    }

    pub fn sleeps(&self) -> Vec<f64> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Sleep(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    fn record(&self, action: Action) {
        self.actions.lock().unwrap().push(action);
    }
}

impl ActionBackend for RecordingBackend {
    fn click(&self, button: MouseButton, double_click: bool) -> Result<(), ActionError> {
        if self.fail_clicks {
            return Err(ActionError::Failed {
                action: "click".to_string(),
                message: "mouse unavailable".to_string(),
            });
        }
        self.record(Action::Click(button, double_click));
        Ok(())
    }

    fn move_to(&self, x: i32, y: i32, duration_seconds: f64) -> Result<(), ActionError> {
        self.record(Action::Move(x, y, duration_seconds));
        Ok(())
    }

    fn press_key(&self, name: &str) -> Result<(), ActionError> {
        self.record(Action::Key(name.to_string()));
        Ok(())
    }

    fn press_combo(&self, names: &[String]) -> Result<(), ActionError> {
        self.record(Action::Combo(names.to_vec()));
        Ok(())
    }

    fn type_text(&self, text: &str, per_char_delay_seconds: f64) -> Result<(), ActionError> {
        self.record(Action::Type(text.to_string(), per_char_delay_seconds));
        Ok(())
    }

    fn sleep(&self, seconds: f64) -> Result<(), ActionError> {
        self.record(Action::Sleep(seconds));
        if self.real_sleep {
            std::thread::sleep(Duration::from_secs_f64(seconds));
        }
        Ok(())
    }
}

/// Shorthand for a start node.
#[allow(dead_code)]
pub fn start(id: &str) -> Node {
    Node::new(id, NodeKind::Start)
}

/// Chains `ids` with exec connections on their default `exec` pins.
#[allow(dead_code)]
pub fn chain(ids: &[&str]) -> Vec<Connection> {
    ids.windows(2)
        .map(|pair| Connection::exec(pair[0], "exec", pair[1]))
        .collect()
}

/// Builds a validated document, panicking on validation errors.
#[allow(dead_code)]
pub fn document(nodes: Vec<Node>, connections: Vec<Connection>, start: &str) -> GraphDocument {
    GraphDocument::new(nodes, connections, start).expect("document should be valid")
}

/// Runs `document` to completion on the current thread.
#[allow(dead_code)]
pub fn run(
    document: &GraphDocument,
    backend: &RecordingBackend,
) -> Result<RunOutcome, NodeFault> {
    let config = EngineConfig::default();
    let running = Arc::new(AtomicBool::new(true));
    Engine::new(document, backend, &NoopObserver, &config, running).run()
}

/// `start -> delay(1s) -> mouse_click(left)`.
#[allow(dead_code)]
pub fn delayed_click_document(start_id: &str) -> GraphDocument {
    let delay = format!("{}_delay", start_id);
    let click = format!("{}_click", start_id);
    document(
        vec![
            start(start_id),
            Node::new(delay.as_str(), NodeKind::Delay)
                .with_value("Duration", 1.0)
                .with_value("Unit", "seconds"),
            Node::new(click.as_str(), NodeKind::MouseClick).with_value("Button", "left"),
        ],
        chain(&[start_id, delay.as_str(), click.as_str()]),
        start_id,
    )
}

/// A controller over `backend` with default timing.
#[allow(dead_code)]
pub fn controller(backend: Arc<RecordingBackend>) -> RunController {
    RunController::new(backend, Arc::new(NoopObserver), EngineConfig::default())
}

/// The macro JSON the editor produces for `start -> key_press -> type_string`.
#[allow(dead_code)]
pub const EDITOR_MACRO_JSON: &str = r#"{
    "start_node_id": "node-1",
    "nodes": [
        {"id": "node-1", "type": "start", "left": "100px", "top": "80px",
         "values": {"Hotkey": {"display": "Ctrl + M", "pynput": "<ctrl>+m"}, "Loop Continuously": false}},
        {"id": "node-2", "type": "key_press",
         "values": {"Key": {"display": "Ctrl + S", "pynput": "<ctrl>+s"}, "Action": "press"}},
        {"id": "node-3", "type": "type_string",
         "values": {"Text": "hello", "Delay": "20", "Unit": "milliseconds"}},
        {"id": "note", "type": "comment", "text": "just a note", "values": {}}
    ],
    "connections": [
        {"startNodeId": "node-1", "startPinName": "exec", "endNodeId": "node-2", "endPinName": "exec", "flow": "exec", "wire": null},
        {"startNodeId": "node-2", "startPinName": "exec", "endNodeId": "node-3", "endPinName": "exec", "flow": "exec", "wire": null}
    ]
}"#;
