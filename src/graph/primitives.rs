//! Graph primitives: adjacency, degree, connected components and derived
//! statistics.
//!
//! Every function borrows an immutable snapshot and tolerates connections
//! that reference unknown node ids by skipping them.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::types::{Connection, Graph, Node, NodeType, WEAK_NODE_THRESHOLD};

/// Undirected neighbour lists keyed by node id, in connection order
pub type Adjacency<'a> = HashMap<&'a str, Vec<&'a str>>;

/// Build undirected adjacency for `nodes`.
///
/// Every node gets an entry, isolated ones an empty list. Connections whose
/// endpoints are not both present are skipped.
pub fn build_adjacency<'a>(nodes: &'a [Node], connections: &'a [Connection]) -> Adjacency<'a> {
    let mut adjacency: Adjacency<'a> = nodes
        .iter()
        .map(|n| (n.id.as_str(), Vec::new()))
        .collect();

    for conn in connections {
        if !adjacency.contains_key(conn.from.as_str())
            || !adjacency.contains_key(conn.to.as_str())
        {
            continue;
        }
        if let Some(neighbors) = adjacency.get_mut(conn.from.as_str()) {
            neighbors.push(conn.to.as_str());
        }
        if let Some(neighbors) = adjacency.get_mut(conn.to.as_str()) {
            neighbors.push(conn.from.as_str());
        }
    }

    adjacency
}

/// Degree of a node; unknown ids have degree 0
pub fn degree(adjacency: &Adjacency<'_>, node_id: &str) -> usize {
    adjacency.get(node_id).map_or(0, |n| n.len())
}

/// Breadth-first connected components.
///
/// Components are returned in the order their seed node appears in `nodes`,
/// and each component lists nodes in BFS discovery order.
pub fn find_connected_components<'a>(
    nodes: &'a [Node],
    connections: &'a [Connection],
) -> Vec<Vec<&'a Node>> {
    let adjacency = build_adjacency(nodes, connections);
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut components = Vec::new();

    for seed in nodes {
        if !visited.insert(seed.id.as_str()) {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(seed.id.as_str());

        while let Some(current) = queue.pop_front() {
            if let Some(&node) = by_id.get(current) {
                component.push(node);
            }
            if let Some(neighbors) = adjacency.get(current) {
                for &neighbor in neighbors {
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        components.push(component);
    }

    components
}

/// Summary statistics recomputed from a graph snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub node_count: usize,
    pub connection_count: usize,
    /// Mean number of neighbours over all nodes
    pub average_degree: f64,
    pub isolated_nodes: usize,
    pub end_devices: usize,
    pub routers: usize,
    pub switches: usize,
    pub base_stations: usize,
    /// Mean end-device efficiency (0-100), 100 without end devices
    pub average_efficiency: f64,
    pub weak_nodes: usize,
    pub malicious_nodes: usize,
    pub components: usize,
}

impl DerivedStats {
    /// Compute statistics using the default weak-node threshold
    pub fn compute(graph: &Graph) -> Self {
        Self::compute_with_threshold(graph, WEAK_NODE_THRESHOLD)
    }

    pub fn compute_with_threshold(graph: &Graph, weak_threshold: f64) -> Self {
        let adjacency = build_adjacency(&graph.nodes, &graph.connections);
        let node_count = graph.nodes.len();

        let degree_sum: usize = adjacency.values().map(|n| n.len()).sum();
        let average_degree = if node_count > 0 {
            degree_sum as f64 / node_count as f64
        } else {
            0.0
        };

        let isolated_nodes = graph
            .nodes
            .iter()
            .filter(|n| degree(&adjacency, &n.id) == 0)
            .count();

        let efficiencies: Vec<f64> = graph
            .nodes
            .iter()
            .filter(|n| n.is_end_device())
            .map(|n| n.energy_efficiency())
            .collect();
        let average_efficiency = if efficiencies.is_empty() {
            100.0
        } else {
            efficiencies.iter().sum::<f64>() / efficiencies.len() as f64
        };

        Self {
            node_count,
            connection_count: graph.connections.len(),
            average_degree,
            isolated_nodes,
            end_devices: graph.count_of(NodeType::EndDevice),
            routers: graph.count_of(NodeType::Router),
            switches: graph.count_of(NodeType::Switch),
            base_stations: graph.count_of(NodeType::BaseStation),
            average_efficiency,
            weak_nodes: graph.nodes.iter().filter(|n| n.is_weak(weak_threshold)).count(),
            malicious_nodes: graph.nodes.iter().filter(|n| n.is_malicious()).count(),
            components: find_connected_components(&graph.nodes, &graph.connections).len(),
        }
    }
}
