//! Network graph model.
//!
//! This module owns the node/connection data of a design together with the
//! primitives every analysis builds on, the mutation command API and JSON
//! persistence.

pub mod types;
pub mod primitives;
pub mod commands;
pub mod persistence;

// Re-export key types and functions for easier access
pub use types::{
    pair_key, Connection, Graph, Node, NodeKind, NodeType, Position, WEAK_NODE_THRESHOLD,
};
pub use primitives::{build_adjacency, degree, find_connected_components, Adjacency, DerivedStats};
pub use commands::{CommandError, GraphCommand, VersionedGraph};
pub use persistence::{graph_from_json, graph_to_json, load_graph, save_graph, GraphLoadError};
