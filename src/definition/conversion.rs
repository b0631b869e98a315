use super::definition::MacroDefinition;
use crate::error::DocumentError;

/// A trait for custom data models that can be converted into a [`MacroDefinition`].
///
/// The editor's JSON format deserializes straight into `MacroDefinition`; any
/// other storage format plugs into the compiler by implementing this trait.
///
/// # Example
///
/// ```rust,no_run
/// use macrobot::prelude::*;
/// use macrobot::definition::{ConnectionDefinition, NodeDefinition};
///
/// struct Step { id: String, kind: String }
/// struct Script { steps: Vec<Step> }
///
/// impl IntoMacro for Script {
///     fn into_macro(self) -> Result<MacroDefinition, DocumentError> {
///         let start = self.steps.first().map(|s| s.id.clone()).unwrap_or_default();
///         let connections = self
///             .steps
///             .windows(2)
///             .map(|pair| ConnectionDefinition {
///                 start_node_id: pair[0].id.clone(),
///                 start_pin_name: "exec".to_string(),
///                 end_node_id: pair[1].id.clone(),
///                 end_pin_name: "exec".to_string(),
///                 flow: "exec".to_string(),
///             })
///             .collect();
///         let nodes = self
///             .steps
///             .into_iter()
///             .map(|s| NodeDefinition { id: s.id, node_type: s.kind, values: Default::default() })
///             .collect();
///         Ok(MacroDefinition { start_node_id: start, nodes, connections })
///     }
/// }
/// ```
pub trait IntoMacro {
    /// Consumes the object and converts it into a macro definition.
    fn into_macro(self) -> Result<MacroDefinition, DocumentError>;
}

impl IntoMacro for MacroDefinition {
    fn into_macro(self) -> Result<MacroDefinition, DocumentError> {
        Ok(self)
    }
}
