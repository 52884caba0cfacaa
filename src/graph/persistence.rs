//! JSON save/load of network designs.
//!
//! The document layout is `{ "nodes": [...], "connections": [...] }` with no
//! schema version. Loading is all-or-nothing: any parse or shape error leaves
//! the caller's graph untouched.

use std::fs;
use std::path::Path;

use log::info;

use super::types::Graph;

/// Errors that can occur while loading or saving a design document
#[derive(Debug, thiserror::Error)]
pub enum GraphLoadError {
    #[error("Failed to read design file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write design file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid design document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid design document: '{0}' must be an array")]
    MissingArray(&'static str),
}

/// Parse a design document from a JSON string
pub fn graph_from_json(json: &str) -> Result<Graph, GraphLoadError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    for key in ["nodes", "connections"] {
        if !value.get(key).is_some_and(|v| v.is_array()) {
            return Err(GraphLoadError::MissingArray(key));
        }
    }

    Ok(serde_json::from_value(value)?)
}

/// Serialize a design document as pretty-printed JSON
pub fn graph_to_json(graph: &Graph) -> Result<String, GraphLoadError> {
    Ok(serde_json::to_string_pretty(graph)?)
}

/// Load a design document from disk
pub fn load_graph(path: &Path) -> Result<Graph, GraphLoadError> {
    let content = fs::read_to_string(path).map_err(|source| GraphLoadError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let graph = graph_from_json(&content)?;
    info!(
        "Loaded design '{}' with {} nodes and {} connections",
        path.display(),
        graph.nodes.len(),
        graph.connections.len()
    );
    Ok(graph)
}

/// Write a design document to disk
pub fn save_graph(graph: &Graph, path: &Path) -> Result<(), GraphLoadError> {
    let json = graph_to_json(graph)?;
    fs::write(path, json).map_err(|source| GraphLoadError::Write {
        path: path.display().to_string(),
        source,
    })?;

    info!("Design written to {}", path.display());
    Ok(())
}

/// Replace `target` with the document in `json`, leaving it unchanged on error
pub fn replace_from_json(target: &mut Graph, json: &str) -> Result<(), GraphLoadError> {
    *target = graph_from_json(json)?;
    Ok(())
}
