//! # MacroBot - Macro Execution Engine
//!
//! **MacroBot** runs node-based automation macros: directed graphs of mouse and
//! keyboard actions, delays, branches, loops and small arithmetic/comparison
//! nodes. The graph has two kinds of edges. *Exec* edges carry control flow
//! from a node's named output pin to the next node; *data* edges carry values
//! into input pins and are resolved lazily whenever a node reads an input.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Parse the editor's JSON into a [`MacroDefinition`](definition::MacroDefinition)
//!     (or implement [`IntoMacro`](definition::IntoMacro) for your own format).
//! 2.  **Compile**: Use `Compiler::builder` to validate the definition into a
//!     [`GraphDocument`](graph::GraphDocument). Invalid documents never run.
//! 3.  **Run**: Hand the document to a [`RunController`](controller::RunController),
//!     which executes it on a dedicated worker against an
//!     [`ActionBackend`](backend::ActionBackend) and guarantees that at most one
//!     macro runs at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use macrobot::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let json = r#"{
//!         "start_node_id": "start",
//!         "nodes": [
//!             {"id": "start", "type": "start", "values": {}},
//!             {"id": "wait", "type": "delay", "values": {"Duration": 500, "Unit": "milliseconds"}},
//!             {"id": "click", "type": "mouse_click", "values": {"Button": "left"}}
//!         ],
//!         "connections": [
//!             {"startNodeId": "start", "startPinName": "exec", "endNodeId": "wait", "endPinName": "exec", "flow": "exec"},
//!             {"startNodeId": "wait", "startPinName": "exec", "endNodeId": "click", "endPinName": "exec", "flow": "exec"}
//!         ]
//!     }"#;
//!
//!     let definition = MacroDefinition::from_json(json)?;
//!     let document = Compiler::builder(definition).build().compile()?;
//!
//!     let controller = RunController::new(
//!         Arc::new(DryRunBackend),
//!         Arc::new(NoopObserver),
//!         EngineConfig::default(),
//!     );
//!     controller.start(Arc::new(document))?;
//!     let outcome = controller.wait()?;
//!     println!("Macro finished: {:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod compiler;
pub mod config;
pub mod controller;
pub mod definition;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod hotkey;
pub mod observer;
pub mod prelude;
