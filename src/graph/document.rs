use super::{Connection, Flow, LOOP_BODY_PIN, Node, NodeKind};
use crate::error::DocumentError;
use ahash::{AHashMap, AHashSet};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// A validated macro graph: nodes, typed connections and the start node.
///
/// Construction checks every structural precondition the engine relies on,
/// so a `GraphDocument` that exists can always be run. The exec and data
/// edges are indexed up front for constant-time lookups while walking.
#[derive(Debug, Clone)]
pub struct GraphDocument {
    /// Identity shared by clones and re-rooted copies of one document.
    id: u64,
    nodes: AHashMap<String, Node>,
    connections: Vec<Connection>,
    start_node_id: String,
    /// `(node, output pin) -> next node` for exec edges.
    exec_index: AHashMap<(String, String), String>,
    /// `(node, input pin) -> (source node, source pin)` for data edges.
    data_index: AHashMap<(String, String), (String, String)>,
}

impl GraphDocument {
    /// Validates and indexes a document.
    pub fn new(
        nodes: Vec<Node>,
        connections: Vec<Connection>,
        start_node_id: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let start_node_id = start_node_id.into();

        let mut node_map = AHashMap::with_capacity(nodes.len());
        for node in nodes {
            if node_map.contains_key(&node.id) {
                return Err(DocumentError::DuplicateNode(node.id));
            }
            node_map.insert(node.id.clone(), node);
        }

        let start = node_map
            .get(&start_node_id)
            .ok_or_else(|| DocumentError::StartNodeMissing(start_node_id.clone()))?;
        if start.kind != NodeKind::Start {
            return Err(DocumentError::NotAStartNode {
                node_id: start.id.clone(),
                type_name: start.kind.type_name().to_string(),
            });
        }

        let mut exec_index = AHashMap::new();
        let mut data_index = AHashMap::new();

        for connection in &connections {
            let source = Self::lookup(&node_map, &connection.start_node_id, &connection.end_node_id)?;
            let target = Self::lookup(&node_map, &connection.end_node_id, &connection.start_node_id)?;

            match connection.flow {
                Flow::Exec => {
                    let ends = [(source, &connection.start_pin), (target, &connection.end_pin)];
                    for (node, pin) in ends {
                        if node.kind.is_data_only() {
                            return Err(DocumentError::ConnectionError {
                                node_id: node.id.clone(),
                                pin: pin.clone(),
                                message: format!("'{}' nodes have no exec pins", node.kind),
                            });
                        }
                    }
                    let key = (connection.start_node_id.clone(), connection.start_pin.clone());
                    if exec_index.contains_key(&key) {
                        return Err(DocumentError::ConnectionError {
                            node_id: connection.start_node_id.clone(),
                            pin: connection.start_pin.clone(),
                            message: "exec output has more than one outgoing connection"
                                .to_string(),
                        });
                    }
                    exec_index.insert(key, connection.end_node_id.clone());
                }
                Flow::Data => {
                    // The first connection into an input pin wins.
                    data_index
                        .entry((connection.end_node_id.clone(), connection.end_pin.clone()))
                        .or_insert_with(|| {
                            (connection.start_node_id.clone(), connection.start_pin.clone())
                        });
                }
            }
        }

        let document = Self {
            id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            nodes: node_map,
            connections,
            start_node_id,
            exec_index,
            data_index,
        };
        document.check_data_cycles()?;
        document.check_loop_reentry()?;
        Ok(document)
    }

    /// Returns a copy of this document that starts at another start node.
    pub fn with_start_node(&self, start_node_id: &str) -> Result<Self, DocumentError> {
        let node = self
            .nodes
            .get(start_node_id)
            .ok_or_else(|| DocumentError::StartNodeMissing(start_node_id.to_string()))?;
        if node.kind != NodeKind::Start {
            return Err(DocumentError::NotAStartNode {
                node_id: node.id.clone(),
                type_name: node.kind.type_name().to_string(),
            });
        }
        let mut document = self.clone();
        document.start_node_id = start_node_id.to_string();
        Ok(document)
    }

    /// Whether `other` is this document, possibly rooted at another start
    /// node. Independently built documents never share an identity, even
    /// when their node ids coincide.
    pub fn same_document(&self, other: &GraphDocument) -> bool {
        self.id == other.id
    }

    pub fn start_node_id(&self) -> &str {
        &self.start_node_id
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// The node an exec output pin leads to, if it is connected.
    pub fn next_exec(&self, node_id: &str, pin: &str) -> Option<&str> {
        self.exec_index
            .get(&(node_id.to_string(), pin.to_string()))
            .map(String::as_str)
    }

    /// The `(node, pin)` feeding a data input pin, if it is connected.
    pub fn data_source(&self, node_id: &str, pin: &str) -> Option<(&str, &str)> {
        self.data_index
            .get(&(node_id.to_string(), pin.to_string()))
            .map(|(node, pin)| (node.as_str(), pin.as_str()))
    }

    fn lookup<'a>(
        nodes: &'a AHashMap<String, Node>,
        id: &str,
        referenced_by: &str,
    ) -> Result<&'a Node, DocumentError> {
        nodes.get(id).ok_or_else(|| DocumentError::NodeNotFound {
            missing_node_id: id.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }

    /// Data evaluation only recurses through data-only nodes, so a cycle is
    /// only fatal when every node on it is data-only.
    fn check_data_cycles(&self) -> Result<(), DocumentError> {
        let mut upstream: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for ((target, _), (source, _)) in &self.data_index {
            let both_data_only = [target, source]
                .iter()
                .all(|id| self.nodes.get(id.as_str()).is_some_and(|n| n.kind.is_data_only()));
            if both_data_only {
                upstream.entry(target.as_str()).or_default().push(source.as_str());
            }
        }

        let mut finished: AHashSet<&str> = AHashSet::new();
        for &root in upstream.keys() {
            if finished.contains(root) {
                continue;
            }
            // Iterative DFS; `on_stack` holds the current path.
            let mut on_stack: AHashSet<&str> = AHashSet::new();
            let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
            on_stack.insert(root);

            while let Some((node, child_idx)) = stack.pop() {
                let children = upstream.get(node).map(Vec::as_slice).unwrap_or(&[]);
                if let Some(&child) = children.get(child_idx) {
                    stack.push((node, child_idx + 1));
                    if on_stack.contains(child) {
                        return Err(DocumentError::DataCycle {
                            node_id: child.to_string(),
                        });
                    }
                    if !finished.contains(child) {
                        on_stack.insert(child);
                        stack.push((child, 0));
                    }
                } else {
                    on_stack.remove(node);
                    finished.insert(node);
                }
            }
        }
        Ok(())
    }

    /// Loop bodies run as nested walks, so a body whose exec path reaches its
    /// own loop again would recurse without bound.
    fn check_loop_reentry(&self) -> Result<(), DocumentError> {
        let mut successors: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for ((source, _), target) in &self.exec_index {
            successors.entry(source.as_str()).or_default().push(target.as_str());
        }

        let loops = self
            .nodes
            .values()
            .filter(|n| matches!(n.kind, NodeKind::Loop | NodeKind::WhileLoop));
        for node in loops {
            let Some(body) = self.next_exec(&node.id, LOOP_BODY_PIN) else {
                continue;
            };
            let mut seen: AHashSet<&str> = AHashSet::new();
            let mut pending = vec![body];
            while let Some(current) = pending.pop() {
                if current == node.id {
                    return Err(DocumentError::LoopReentry {
                        node_id: node.id.clone(),
                    });
                }
                if seen.insert(current) {
                    pending.extend(successors.get(current).into_iter().flatten().copied());
                }
            }
        }
        Ok(())
    }
}
