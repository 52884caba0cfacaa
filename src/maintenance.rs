//! Bulk maintenance of a design.
//!
//! [`reconstruct`] drops weak end devices and repairs the holes this
//! leaves, so that every group of nodes that was connected before stays
//! connected afterwards.

use std::collections::{HashMap, HashSet};

use log::{debug, info};
use serde::Serialize;

use crate::graph::{find_connected_components, Connection, Graph};

/// Outcome of a [`reconstruct`] run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconstructionReport {
    pub graph: Graph,
    /// Ids of the removed weak end devices, in original node order
    pub removed_nodes: Vec<String>,
    /// Ids of the links added to restore connectivity
    pub added_connections: Vec<String>,
}

/// Remove end devices with efficiency below `threshold` and re-link what
/// their removal split apart.
///
/// Surviving members of each original connected component are rejoined by
/// repeatedly linking the closest pair between the first piece and any
/// other piece. Components that were already separate stay separate.
pub fn reconstruct(graph: &Graph, threshold: f64) -> ReconstructionReport {
    let removed_nodes: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| n.is_weak(threshold))
        .map(|n| n.id.clone())
        .collect();

    if removed_nodes.is_empty() {
        debug!("No nodes below efficiency {}", threshold);
        return ReconstructionReport {
            graph: graph.clone(),
            removed_nodes,
            added_connections: Vec::new(),
        };
    }

    // Original component of every surviving node
    let removed: HashSet<&str> = removed_nodes.iter().map(String::as_str).collect();
    let mut original_component: HashMap<String, usize> = HashMap::new();
    for (index, component) in find_connected_components(&graph.nodes, &graph.connections)
        .iter()
        .enumerate()
    {
        for node in component {
            if !removed.contains(node.id.as_str()) {
                original_component.insert(node.id.clone(), index);
            }
        }
    }

    let mut result = Graph::new(
        graph
            .nodes
            .iter()
            .filter(|n| !removed.contains(n.id.as_str()))
            .cloned()
            .collect(),
        graph
            .connections
            .iter()
            .filter(|c| !removed.contains(c.from.as_str()) && !removed.contains(c.to.as_str()))
            .cloned()
            .collect(),
    );

    let mut used_ids: HashSet<String> = graph.connections.iter().map(|c| c.id.clone()).collect();
    let mut added_connections = Vec::new();

    while let Some((from, to)) = closest_split_pair(&result, &original_component) {
        let id = next_repair_id(&mut used_ids);
        debug!("Repair link {} between {} and {}", id, from, to);
        result.connections.push(Connection::new(id.clone(), from, to));
        added_connections.push(id);
    }

    info!(
        "Reconstruction removed {} weak nodes and added {} links",
        removed_nodes.len(),
        added_connections.len()
    );

    ReconstructionReport {
        graph: result,
        removed_nodes,
        added_connections,
    }
}

/// Closest pair joining the first split original component, if any
fn closest_split_pair(
    graph: &Graph,
    original_component: &HashMap<String, usize>,
) -> Option<(String, String)> {
    let pieces = find_connected_components(&graph.nodes, &graph.connections);

    // Group current pieces by the original component they belong to
    let mut by_origin: Vec<(usize, Vec<usize>)> = Vec::new();
    for (piece_index, piece) in pieces.iter().enumerate() {
        let Some(&origin) = piece.first().and_then(|n| original_component.get(&n.id)) else {
            continue;
        };
        match by_origin.iter_mut().find(|(o, _)| *o == origin) {
            Some((_, list)) => list.push(piece_index),
            None => by_origin.push((origin, vec![piece_index])),
        }
    }

    let (_, split) = by_origin.into_iter().find(|(_, list)| list.len() > 1)?;
    let first = &pieces[split[0]];

    let mut best: Option<(&str, &str, f64)> = None;
    for &other in &split[1..] {
        for a in first {
            for b in &pieces[other] {
                let distance = a.position.distance_to(&b.position);
                if best.map_or(true, |(_, _, d)| distance < d) {
                    best = Some((a.id.as_str(), b.id.as_str(), distance));
                }
            }
        }
    }

    best.map(|(a, b, _)| (a.to_string(), b.to_string()))
}

fn next_repair_id(used: &mut HashSet<String>) -> String {
    let mut n = 1;
    loop {
        let candidate = format!("repair-{}", n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
