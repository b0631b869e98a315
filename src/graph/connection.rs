use std::fmt;

/// The kind of edge a connection represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Control flow, traversed one node at a time.
    Exec,
    /// A value dependency, resolved lazily when the target pin is read.
    Data,
}

/// A directed edge from one node's output pin to another node's input pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub start_node_id: String,
    pub start_pin: String,
    pub end_node_id: String,
    pub end_pin: String,
    pub flow: Flow,
}

impl Connection {
    pub fn exec(from: &str, from_pin: &str, to: &str) -> Self {
        Self {
            start_node_id: from.to_string(),
            start_pin: from_pin.to_string(),
            end_node_id: to.to_string(),
            end_pin: super::EXEC_PIN.to_string(),
            flow: Flow::Exec,
        }
    }

    pub fn data(from: &str, from_pin: &str, to: &str, to_pin: &str) -> Self {
        Self {
            start_node_id: from.to_string(),
            start_pin: from_pin.to_string(),
            end_node_id: to.to_string(),
            end_pin: to_pin.to_string(),
            flow: Flow::Data,
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.flow {
            Flow::Exec => "=>",
            Flow::Data => "->",
        };
        write!(
            f,
            "{}.{} {} {}.{}",
            self.start_node_id, self.start_pin, arrow, self.end_node_id, self.end_pin
        )
    }
}
