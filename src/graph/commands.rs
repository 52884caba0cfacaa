//! Graph mutation commands.
//!
//! Editors never mutate a graph in place. They issue a [`GraphCommand`]
//! against a [`VersionedGraph`] and re-render from the returned value.

use log::debug;

use super::types::{Connection, Graph, Node};

/// Errors raised when a command does not fit the current graph
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CommandError {
    #[error("Node id already exists: {0}")]
    DuplicateNode(String),

    #[error("Connection id already exists: {0}")]
    DuplicateConnection(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Unknown connection: {0}")]
    UnknownConnection(String),
}

/// A single edit to the network design
#[derive(Debug, Clone, PartialEq)]
pub enum GraphCommand {
    AddNode(Node),
    /// Endpoints are not checked; dangling links are ignored by analysis
    AddConnection(Connection),
    /// Removes the node and every connection touching it
    RemoveNode(String),
    RemoveConnection(String),
    /// Replaces the node with the same id
    UpdateNode(Node),
    ReplaceGraph(Graph),
}

/// A graph value tagged with the number of edits applied to it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VersionedGraph {
    version: u64,
    graph: Graph,
}

impl VersionedGraph {
    pub fn new(graph: Graph) -> Self {
        Self { version: 0, graph }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Apply a command, returning the next version.
    ///
    /// On error the receiver is untouched and no new version is produced.
    pub fn apply(&self, command: GraphCommand) -> Result<VersionedGraph, CommandError> {
        let mut graph = self.graph.clone();

        match command {
            GraphCommand::AddNode(node) => {
                if graph.contains_node(&node.id) {
                    return Err(CommandError::DuplicateNode(node.id));
                }
                debug!("Adding {} node {}", node.node_type(), node.id);
                graph.nodes.push(node);
            }
            GraphCommand::AddConnection(conn) => {
                if graph.connections.iter().any(|c| c.id == conn.id) {
                    return Err(CommandError::DuplicateConnection(conn.id));
                }
                debug!("Adding connection {} ({} - {})", conn.id, conn.from, conn.to);
                graph.connections.push(conn);
            }
            GraphCommand::RemoveNode(id) => {
                if !graph.contains_node(&id) {
                    return Err(CommandError::UnknownNode(id));
                }
                graph.nodes.retain(|n| n.id != id);
                let before = graph.connections.len();
                graph.connections.retain(|c| !c.touches(&id));
                debug!(
                    "Removed node {} and {} incident connections",
                    id,
                    before - graph.connections.len()
                );
            }
            GraphCommand::RemoveConnection(id) => {
                let before = graph.connections.len();
                graph.connections.retain(|c| c.id != id);
                if graph.connections.len() == before {
                    return Err(CommandError::UnknownConnection(id));
                }
            }
            GraphCommand::UpdateNode(node) => {
                let slot = graph
                    .nodes
                    .iter_mut()
                    .find(|n| n.id == node.id)
                    .ok_or_else(|| CommandError::UnknownNode(node.id.clone()))?;
                *slot = node;
            }
            GraphCommand::ReplaceGraph(replacement) => {
                debug!(
                    "Replacing graph with {} nodes and {} connections",
                    replacement.nodes.len(),
                    replacement.connections.len()
                );
                graph = replacement;
            }
        }

        Ok(VersionedGraph {
            version: self.version + 1,
            graph,
        })
    }

    /// Apply commands in order, stopping at the first failure
    pub fn apply_all<I>(&self, commands: I) -> Result<VersionedGraph, CommandError>
    where
        I: IntoIterator<Item = GraphCommand>,
    {
        let mut current = self.clone();
        for command in commands {
            current = current.apply(command)?;
        }
        Ok(current)
    }
}
