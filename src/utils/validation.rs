//! Graph consistency checks.
//!
//! These checks never reject a graph. Direct edits may leave a design in an
//! odd state (dangling links, self-loops, clashing addresses) and the
//! analyses cope with all of them, so problems are reported as warnings.

use std::collections::{HashMap, HashSet};

use crate::graph::{pair_key, Graph};
use crate::utils::ip_utils::is_valid_ip;

/// Validate a graph for structural and addressing problems
///
/// Checks for:
/// - Duplicate node ids
/// - Connections referencing unknown nodes
/// - Self-loops
/// - Repeated links between the same pair of nodes
/// - Malformed or duplicate IP addresses
///
/// # Arguments
/// * `graph` - The graph to validate
///
/// # Returns
/// One human-readable message per problem, in discovery order. Every
/// message is also logged at `warn` level.
///
/// # Examples
/// ```
/// use adhocsim::graph::{Connection, Graph, Node, NodeKind, Position};
/// use adhocsim::utils::validation::validate_graph;
///
/// let graph = Graph::new(
///     vec![Node::new("a", NodeKind::end_device(90.0), Position::new(0.0, 0.0))],
///     vec![Connection::new("c1", "a", "missing")],
/// );
/// let warnings = validate_graph(&graph);
/// assert_eq!(warnings.len(), 1);
/// ```
pub fn validate_graph(graph: &Graph) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut node_ids = HashSet::new();
    for node in &graph.nodes {
        if !node_ids.insert(node.id.as_str()) {
            warnings.push(format!("Duplicate node id '{}'", node.id));
        }
    }

    let mut links = HashSet::new();
    for connection in &graph.connections {
        for endpoint in [&connection.from, &connection.to] {
            if !node_ids.contains(endpoint.as_str()) {
                warnings.push(format!(
                    "Connection '{}' references unknown node '{}'",
                    connection.id, endpoint
                ));
            }
        }

        if connection.from == connection.to {
            warnings.push(format!(
                "Connection '{}' is a self-loop on '{}'",
                connection.id, connection.from
            ));
        } else if !links.insert(pair_key(&connection.from, &connection.to)) {
            warnings.push(format!(
                "Connection '{}' duplicates an existing link between '{}' and '{}'",
                connection.id, connection.from, connection.to
            ));
        }
    }

    let mut addresses: HashMap<&str, &str> = HashMap::new();
    let mut unaddressed = 0;
    for node in &graph.nodes {
        let ip = node.ip_address.as_str();
        if ip.is_empty() {
            unaddressed += 1;
            continue;
        }
        if !is_valid_ip(ip) {
            warnings.push(format!("Invalid IP address '{}' for node {}", ip, node.id));
            continue;
        }
        if let Some(owner) = addresses.insert(ip, node.id.as_str()) {
            warnings.push(format!(
                "Duplicate IP address '{}' on nodes {} and {}",
                ip, owner, node.id
            ));
        }
    }

    if unaddressed > 0 && unaddressed < graph.nodes.len() {
        log::info!(
            "{} of {} nodes have no IP address",
            unaddressed,
            graph.nodes.len()
        );
    }

    for warning in &warnings {
        log::warn!("{}", warning);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, Node, NodeKind, Position};

    fn node(id: &str, ip: &str) -> Node {
        Node::new(id, NodeKind::end_device(90.0), Position::new(0.0, 0.0)).with_ip(ip)
    }

    #[test]
    fn test_clean_graph_has_no_warnings() {
        let graph = Graph::new(
            vec![node("a", "192.168.0.1"), node("b", "192.168.0.2")],
            vec![Connection::new("c1", "a", "b")],
        );
        assert!(validate_graph(&graph).is_empty());
    }

    #[test]
    fn test_structural_problems() {
        let graph = Graph::new(
            vec![node("a", ""), node("b", ""), node("a", "")],
            vec![
                Connection::new("c1", "a", "b"),
                Connection::new("c2", "b", "a"),
                Connection::new("c3", "b", "b"),
                Connection::new("c4", "a", "ghost"),
            ],
        );
        let warnings = validate_graph(&graph);

        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].contains("Duplicate node id 'a'"));
        assert!(warnings[1].contains("c2"));
        assert!(warnings[2].contains("self-loop"));
        assert!(warnings[3].contains("ghost"));
    }

    #[test]
    fn test_address_problems() {
        let graph = Graph::new(
            vec![
                node("a", "192.168.0.1"),
                node("b", "192.168.0.1"),
                node("c", "300.1.1.1"),
                node("d", ""),
            ],
            Vec::new(),
        );
        let warnings = validate_graph(&graph);

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Duplicate IP address '192.168.0.1' on nodes a and b"));
        assert!(warnings[1].contains("Invalid IP address '300.1.1.1'"));
    }
}
