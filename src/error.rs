use thiserror::Error;

/// Errors detected while building or validating a graph document. A document
/// that fails validation never starts running.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Failed to parse macro JSON: {0}")]
    JsonParseError(String),

    #[error("Start node '{0}' not found in the document")]
    StartNodeMissing(String),

    #[error("Node '{node_id}' is designated as the start node but has type '{type_name}'")]
    NotAStartNode { node_id: String, type_name: String },

    #[error("Node id '{0}' appears more than once")]
    DuplicateNode(String),

    #[error(
        "Node '{missing_node_id}' not found, which is required by a connection from node '{referenced_by}'"
    )]
    NodeNotFound {
        missing_node_id: String,
        referenced_by: String,
    },

    #[error("Node '{node_id}' has an unregistered or invalid node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("A connection on node '{node_id}' pin '{pin}' is invalid: {message}")]
    ConnectionError {
        node_id: String,
        pin: String,
        message: String,
    },

    #[error("Data connections form a cycle through node '{node_id}'")]
    DataCycle { node_id: String },

    #[error("The body of loop '{node_id}' leads back into the loop itself")]
    LoopReentry { node_id: String },
}

/// Errors raised by an action backend while performing an external effect.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Action '{action}' failed: {message}")]
    Failed { action: String, message: String },

    #[error("Action '{0}' is not supported by this backend")]
    Unsupported(String),
}

/// A fatal fault raised while executing a single node. It ends the run.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Node '{node_id}' ({node_type}) faulted: {source}")]
pub struct NodeFault {
    pub node_id: String,
    pub node_type: String,
    pub source: ActionError,
}

/// Errors surfaced by the run controller.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Failed to spawn the macro worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("The macro worker thread panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Fault(#[from] NodeFault),
}

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read settings file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
