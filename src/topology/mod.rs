//! Network topology module.
//!
//! This module contains the topology templates, the canvas geometry used to
//! lay them out, the procedural generator and the heuristic classifier that
//! recognises a macro-structure in an arbitrary graph.

pub mod types;
pub mod layout;
pub mod generator;
pub mod classifier;

// Re-export key types and functions for easier access
pub use types::{Topology, TopologyLabel};
pub use layout::Canvas;
pub use generator::{
    generate, GeneratedNetwork, GenerationError, GenerationRequest, MAX_NODES,
    MIN_GRID_NODES,
};
pub use classifier::{classify, is_grid_layout};
