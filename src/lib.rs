//! # Adhocsim - Ad hoc wireless network design and analysis
//!
//! This library provides the graph model and analysis engine behind an ad
//! hoc wireless network design tool: generating topologies, classifying
//! their structure, finding routes and producing a heuristic comparison of
//! AI-assisted versus traditional routing.
//!
//! ## Overview
//!
//! A design is a [`graph::Graph`] of end devices, routers, switches and base
//! stations joined by undirected connections. Every analysis is a pure
//! function over a graph snapshot; edits go through the command API in
//! [`graph::commands`], which returns a new versioned value.
//!
//! There is no packet-level simulation. The performance numbers come from a
//! fixed baseline table perturbed by closed-form multipliers.
//!
//! ## Architecture
//!
//! - `graph`: node and connection model, adjacency, components, commands, JSON persistence
//! - `pathfinding`: BFS shortest and secure paths, farthest node pair
//! - `topology`: generator templates, canvas layout, heuristic classifier
//! - `performance`: AI-based versus traditional metric comparison
//! - `maintenance`: weak-node removal with connectivity repair
//! - `describe`: topology description providers
//! - `report`: text and JSON analysis reports
//! - `config` / `config_loader`: YAML configuration and CLI overrides
//! - `utils`: IP helpers and graph validation
//!
//! ## Example Usage
//!
//! ```rust
//! use adhocsim::topology::{
//!     classify, generate, Canvas, GenerationRequest, Topology, TopologyLabel,
//! };
//! use adhocsim::performance::evaluate;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let request = GenerationRequest::new(8, Topology::Ring);
//! let network = generate(&request, &Canvas::default(), &mut rng)?;
//!
//! let label = classify(&network.graph, &network.cluster_heads);
//! assert_eq!(label, TopologyLabel::Ring);
//!
//! let comparison = evaluate(&label, &network.graph, &[]);
//! let (ai, traditional) = (comparison.ai_based, comparison.traditional);
//! assert!(ai.packet_delivery_ratio > traditional.packet_delivery_ratio);
//! # Ok::<(), adhocsim::topology::GenerationError>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   log_level: info
//!
//! canvas:
//!   width: 1200
//!   height: 800
//!   margin: 40
//!
//! generation:
//!   count: 40
//!   topology: cluster-mesh   # random/mesh/grid/ring/bus/star/cluster/cluster-mesh
//!   include_routers: true
//!   cluster_heads: 4
//!   seed: 42
//!
//! analysis:
//!   weak_threshold: 85
//! ```
//!
//! ## Error Handling
//!
//! Library errors are `thiserror` enums (`GenerationError`, `GraphLoadError`,
//! `CommandError`, `ValidationError`). The binary wraps them with
//! `color_eyre` context.

pub mod graph;
pub mod pathfinding;
pub mod topology;
pub mod performance;
pub mod maintenance;
pub mod describe;
pub mod report;
pub mod config;
pub mod config_loader;
pub mod utils;
