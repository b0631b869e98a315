//! Hotkey bindings and dispatch.
//!
//! Capturing global key presses is left to the host application; it calls
//! [`HotkeyDispatcher::activate`] from its listener thread with the hotkey
//! string it recognised. Each activation runs on its own short-lived worker,
//! so the listener is never blocked by macro control logic.

use crate::compiler::Compiler;
use crate::compiler::parsing::convert_value;
use crate::config::{HotkeySettings, UNSET_HOTKEY};
use crate::controller::{ControlAction, RunController};
use crate::definition::MacroDefinition;
use crate::error::DocumentError;
use crate::graph::{GraphDocument, NodeKind, Value};
use ahash::AHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Field of a start node holding its trigger hotkey.
pub const HOTKEY_FIELD: &str = "Hotkey";

/// What pressing a bound hotkey does.
#[derive(Debug, Clone)]
pub enum HotkeyAction {
    /// Start the document, or stop it if it is the active run.
    Toggle(Arc<GraphDocument>),
    EmergencyStop,
}

/// A mapping from hotkey strings (e.g. `<ctrl>+<alt>+m`) to actions.
#[derive(Debug, Clone, Default)]
pub struct HotkeyBindings {
    bindings: AHashMap<String, HotkeyAction>,
}

impl HotkeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds every start node of `document` that has a hotkey to a toggle of
    /// the document rooted at that node, plus the configured emergency stop.
    pub fn from_document(
        document: &GraphDocument,
        settings: &HotkeySettings,
    ) -> Result<Self, DocumentError> {
        let mut bindings = Self::new();
        for node in document.nodes().filter(|n| n.kind == NodeKind::Start) {
            let Some(hotkey) = assigned_hotkey(node.values.get(HOTKEY_FIELD).cloned()) else {
                continue;
            };
            let rooted = document.with_start_node(&node.id)?;
            bindings.bind(&hotkey, HotkeyAction::Toggle(Arc::new(rooted)));
        }
        bindings.bind_emergency_stop(settings);
        Ok(bindings)
    }

    /// Like [`from_document`](Self::from_document), but compiles the editor's
    /// canvas once per start node that has a hotkey. A start node whose own
    /// macro does not compile is left unbound and the others still bind.
    pub fn from_definition(definition: &MacroDefinition, settings: &HotkeySettings) -> Self {
        let mut bindings = Self::new();
        let starts = definition
            .nodes
            .iter()
            .filter(|n| NodeKind::from_type_name(&n.node_type) == Some(NodeKind::Start));
        for node in starts {
            let Some(hotkey) = assigned_hotkey(node.values.get(HOTKEY_FIELD).map(convert_value))
            else {
                continue;
            };
            let rooted = MacroDefinition {
                start_node_id: node.id.clone(),
                ..definition.clone()
            };
            match Compiler::builder(rooted).build().compile() {
                Ok(document) => bindings.bind(&hotkey, HotkeyAction::Toggle(Arc::new(document))),
                Err(e) => warn!(start_node = %node.id, error = %e, "hotkey left unbound"),
            }
        }
        bindings.bind_emergency_stop(settings);
        bindings
    }

    fn bind_emergency_stop(&mut self, settings: &HotkeySettings) {
        if let Some(hotkey) = settings.emergency_stop() {
            self.bind(hotkey, HotkeyAction::EmergencyStop);
        }
    }

    /// Binds `hotkey`, replacing any previous action for it.
    pub fn bind(&mut self, hotkey: &str, action: HotkeyAction) {
        self.bindings.insert(hotkey.trim().to_string(), action);
    }

    pub fn get(&self, hotkey: &str) -> Option<&HotkeyAction> {
        self.bindings.get(hotkey.trim())
    }

    pub fn hotkeys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The hotkey stored on a start node, unless it is empty or unset.
fn assigned_hotkey(value: Option<Value>) -> Option<String> {
    let hotkey = value.unwrap_or_default().as_text();
    let hotkey = hotkey.trim();
    if hotkey.is_empty() || hotkey == UNSET_HOTKEY {
        None
    } else {
        Some(hotkey.to_string())
    }
}

/// Routes hotkey activations to the run controller.
pub struct HotkeyDispatcher {
    controller: Arc<RunController>,
    bindings: Mutex<HotkeyBindings>,
}

impl HotkeyDispatcher {
    pub fn new(controller: Arc<RunController>, bindings: HotkeyBindings) -> Self {
        Self {
            controller,
            bindings: Mutex::new(bindings),
        }
    }

    /// Replaces the active bindings.
    pub fn rebind(&self, bindings: HotkeyBindings) {
        let count = bindings.len();
        *self.bindings.lock().unwrap_or_else(PoisonError::into_inner) = bindings;
        info!(hotkeys = count, "hotkey bindings updated");
    }

    /// Handles one hotkey press. Unbound hotkeys are ignored. Returns the
    /// worker handling the activation, if one was spawned.
    pub fn activate(&self, hotkey: &str) -> Option<JoinHandle<()>> {
        let action = self
            .bindings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(hotkey)
            .cloned();
        let Some(action) = action else {
            debug!(hotkey, "ignoring unbound hotkey");
            return None;
        };

        let controller = Arc::clone(&self.controller);
        let spawned = thread::Builder::new()
            .name("hotkey-worker".to_string())
            .spawn(move || match action {
                HotkeyAction::EmergencyStop => controller.emergency_stop(),
                HotkeyAction::Toggle(document) => match controller.toggle(document) {
                    Ok(ControlAction::Refused { active_start_node }) => {
                        warn!(active = %active_start_node, "hotkey ignored, another macro is running")
                    }
                    Ok(action) => debug!(?action, "hotkey handled"),
                    Err(e) => error!(error = %e, "hotkey failed to control macro"),
                },
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(error = %e, hotkey, "could not spawn hotkey worker");
                None
            }
        }
    }
}
