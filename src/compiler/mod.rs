use crate::definition::{IntoMacro, MacroDefinition};
use crate::error::DocumentError;
use crate::graph::{Connection, Flow, GraphDocument, Node, NodeKind};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use tracing::{debug, warn};

pub mod parsing;

use parsing::{convert_value, parse_flow};

/// Turns an untyped [`MacroDefinition`] into a validated [`GraphDocument`].
pub struct Compiler {
    definition: MacroDefinition,
    registry: AHashMap<String, NodeKind>,
}

pub struct CompilerBuilder {
    definition: MacroDefinition,
    registry: AHashMap<String, NodeKind>,
}

impl CompilerBuilder {
    pub fn new(definition: MacroDefinition) -> Self {
        let registry = NodeKind::ALL
            .iter()
            .map(|kind| (kind.type_name().to_string(), *kind))
            .collect();
        Self {
            definition,
            registry,
        }
    }

    /// Makes `user_type_name` behave like the built-in `builtin_type_name`.
    /// Unknown built-in names are ignored.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if let Some(kind) = NodeKind::from_type_name(builtin_type_name) {
            self.registry.insert(user_type_name.to_string(), kind);
        }
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            definition: self.definition,
            registry: self.registry,
        }
    }
}

impl Compiler {
    pub fn builder(definition: MacroDefinition) -> CompilerBuilder {
        CompilerBuilder::new(definition)
    }

    /// Shorthand for compiling any [`IntoMacro`] source with the default registry.
    pub fn compile_from(source: impl IntoMacro) -> Result<GraphDocument, DocumentError> {
        Self::builder(source.into_macro()?).build().compile()
    }

    /// Compiles the definition rooted at its start node.
    ///
    /// The editor saves the whole canvas, so a definition may hold chains of
    /// other start nodes and node types this engine does not support. Nodes
    /// of unknown type are only an error when the start node can reach them
    /// through exec edges or the data inputs of reached nodes; otherwise they
    /// are dropped together with their connections.
    pub fn compile(self) -> Result<GraphDocument, DocumentError> {
        let MacroDefinition {
            start_node_id,
            nodes: node_definitions,
            connections: connection_definitions,
        } = self.definition;

        let connections = connection_definitions
            .into_iter()
            .map(|c| {
                let flow = parse_flow(&c.flow).ok_or_else(|| DocumentError::ConnectionError {
                    node_id: c.start_node_id.clone(),
                    pin: c.start_pin_name.clone(),
                    message: format!("unknown flow kind '{}'", c.flow),
                })?;
                Ok(Connection {
                    start_node_id: c.start_node_id,
                    start_pin: c.start_pin_name,
                    end_node_id: c.end_node_id,
                    end_pin: c.end_pin_name,
                    flow,
                })
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;

        let reachable = reachable_from(&start_node_id, &connections);
        let mut skipped: AHashSet<String> = AHashSet::new();
        let mut nodes = Vec::with_capacity(node_definitions.len());
        for definition in node_definitions {
            let Some(kind) = self.registry.get(&definition.node_type) else {
                if reachable.contains(definition.id.as_str()) {
                    return Err(DocumentError::UnknownNodeType {
                        node_id: definition.id,
                        type_name: definition.node_type,
                    });
                }
                warn!(
                    node_id = %definition.id,
                    node_type = %definition.node_type,
                    "skipping unreachable node of unknown type"
                );
                skipped.insert(definition.id);
                continue;
            };

            let values = definition
                .values
                .iter()
                .map(|(field, raw)| (field.clone(), convert_value(raw)))
                .collect();
            nodes.push(Node {
                id: definition.id,
                kind: *kind,
                values,
            });
        }

        let connections = connections
            .into_iter()
            .filter(|c| !skipped.contains(&c.start_node_id) && !skipped.contains(&c.end_node_id))
            .collect_vec();

        let document = GraphDocument::new(nodes, connections, start_node_id)?;
        debug!(
            start_node = %document.start_node_id(),
            nodes = document.node_count(),
            connections = document.connections().len(),
            "compiled macro document"
        );
        Ok(document)
    }
}

/// Ids of the nodes a run from `start_node_id` can touch: everything on its
/// exec paths (all output pins) plus the data upstream of those nodes.
fn reachable_from<'a>(
    start_node_id: &'a str,
    connections: &'a [Connection],
) -> AHashSet<&'a str> {
    let mut exec_next: AHashMap<&str, Vec<&str>> = AHashMap::new();
    let mut data_sources: AHashMap<&str, Vec<&str>> = AHashMap::new();
    for c in connections {
        let (from, to, edges) = match c.flow {
            Flow::Exec => (&c.start_node_id, &c.end_node_id, &mut exec_next),
            // Walked backwards: a reached node pulls in its data sources.
            Flow::Data => (&c.end_node_id, &c.start_node_id, &mut data_sources),
        };
        edges.entry(from.as_str()).or_default().push(to.as_str());
    }

    let mut reachable = AHashSet::new();
    let mut pending = vec![start_node_id];
    while let Some(node) = pending.pop() {
        if reachable.insert(node) {
            for edges in [&exec_next, &data_sources] {
                pending.extend(edges.get(node).into_iter().flatten().copied());
            }
        }
    }
    reachable
}
