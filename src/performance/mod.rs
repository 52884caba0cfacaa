//! Performance heuristic engine.
//!
//! Produces the AI-based versus traditional metric comparison for a design.

pub mod baseline;
pub mod engine;

// Re-export key types and functions for easier access
pub use baseline::{MetricSet, PerformanceComparison};
pub use engine::{evaluate, pdr_range};
