use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fs;

/// The canonical, serialized form of a macro as produced by the editor.
///
/// Node types and values are still untyped here; the compiler turns a
/// definition into a validated [`GraphDocument`](crate::graph::GraphDocument).
/// Editor-only fields (positions, sizes, colours, wires) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacroDefinition {
    #[serde(default, alias = "startNodeId")]
    pub start_node_id: String,
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub connections: Vec<ConnectionDefinition>,
}

/// A single node as stored by the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

/// A connection between two pins as stored by the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDefinition {
    #[serde(rename = "startNodeId", alias = "start_node_id")]
    pub start_node_id: String,
    #[serde(rename = "startPinName", alias = "start_pin_name")]
    pub start_pin_name: String,
    #[serde(rename = "endNodeId", alias = "end_node_id")]
    pub end_node_id: String,
    #[serde(rename = "endPinName", alias = "end_pin_name")]
    pub end_pin_name: String,
    /// `"exec"` or `"data"`.
    pub flow: String,
}

impl MacroDefinition {
    /// Parses a macro from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::JsonParseError(e.to_string()))
    }

    /// Loads a macro from a JSON file on disk.
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DocumentError::JsonParseError(format!("Could not read file '{}': {}", path, e))
        })?;
        Self::from_json(&content)
    }
}
