//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! macrobot crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use macrobot::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example() -> Result<()> {
//! let definition = MacroDefinition::from_file("path/to/my.macro")?;
//!
//! let controller = Arc::new(RunController::new(
//!     Arc::new(DryRunBackend),
//!     Arc::new(NoopObserver),
//!     EngineConfig::default(),
//! ));
//! let bindings = HotkeyBindings::from_definition(&definition, &HotkeySettings::default());
//! let dispatcher = HotkeyDispatcher::new(controller, bindings);
//! dispatcher.activate("<ctrl>+<alt>+m");
//! # Ok(())
//! # }
//! ```

// Loading and compiling documents
pub use crate::compiler::Compiler;
pub use crate::definition::{IntoMacro, MacroDefinition};

// Graph model
pub use crate::graph::{Connection, Flow, GraphDocument, Node, NodeKind, Value, ValueKind};

// Execution
pub use crate::backend::{ActionBackend, DryRunBackend, MouseButton};
pub use crate::controller::{ControlAction, RunController};
pub use crate::engine::{Engine, RunOutcome};
pub use crate::evaluator::{DataEvaluator, DynamicOutputs};
pub use crate::hotkey::{HotkeyAction, HotkeyBindings, HotkeyDispatcher};
pub use crate::observer::{ChannelObserver, NoopObserver, RunEvent, RunObserver};

// Configuration
pub use crate::config::{EngineConfig, HotkeySettings, Settings};

// Error types
pub use crate::error::{ActionError, ControllerError, DocumentError, NodeFault};

// Result type alias for convenience
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
