//! Topology classification.
//!
//! A fixed, ordered list of heuristic rules over the degree sequence,
//! component count and node layout. The first rule that matches wins, so
//! the order below is part of the behaviour:
//!
//! 1. cluster / cluster-mesh (only with explicit cluster heads)
//! 2. star
//! 3. ring
//! 4. bus
//! 5. grid or mesh (dense, at most two components)
//! 6. hybrid
//!
//! Graphs with fewer than three nodes are reported as linear.

use std::collections::HashSet;

use log::debug;

use super::types::TopologyLabel;
use crate::graph::{
    build_adjacency, degree, find_connected_components, Adjacency, Graph, Node, NodeType,
};

/// Average degree above which a graph counts as densely meshed
pub(crate) const MESH_DEGREE_THRESHOLD: f64 = 2.5;

/// Gap deviation allowed for grid rows and columns, relative to the mean gap
const GRID_GAP_TOLERANCE: f64 = 0.3;

/// Share of the lattice that must be occupied for a grid
const GRID_MIN_COVERAGE: f64 = 0.7;

/// Coordinates closer than this are treated as the same lattice line
const COORDINATE_MERGE_DISTANCE: f64 = 1.0;

/// Average peer links per cluster member needed for cluster-mesh
const CLUSTER_MESH_PEER_LINKS: f64 = 1.0;

/// Classify `graph`, optionally using designated cluster-head ids
pub fn classify(graph: &Graph, cluster_heads: &[String]) -> TopologyLabel {
    let n = graph.nodes.len();
    if n < 3 {
        return TopologyLabel::Linear;
    }

    let adjacency = build_adjacency(&graph.nodes, &graph.connections);

    if let Some(label) = classify_clusters(graph, &adjacency, cluster_heads) {
        return label;
    }

    if is_star(graph, &adjacency) {
        return TopologyLabel::Star;
    }

    let chain_degrees = chain_degrees(graph, &adjacency);
    if !chain_degrees.is_empty() && chain_degrees.iter().all(|&d| d == 2) {
        return TopologyLabel::Ring;
    }
    if chain_degrees.iter().filter(|&&d| d == 1).count() == 2
        && chain_degrees.iter().all(|&d| d == 1 || d == 2)
    {
        return TopologyLabel::Bus;
    }

    let components = find_connected_components(&graph.nodes, &graph.connections).len();
    let degree_sum: usize = graph.nodes.iter().map(|node| degree(&adjacency, &node.id)).sum();
    let average_degree = degree_sum as f64 / n as f64;

    debug!(
        "Classifying {} nodes: average degree {:.2}, {} components",
        n, average_degree, components
    );

    if components <= 2 && average_degree > MESH_DEGREE_THRESHOLD {
        return if is_grid_layout(&graph.nodes) {
            TopologyLabel::Grid
        } else {
            TopologyLabel::Mesh
        };
    }

    TopologyLabel::Hybrid { components }
}

/// Rule 1: a majority of ordinary nodes hang off a designated head
fn classify_clusters(
    graph: &Graph,
    adjacency: &Adjacency<'_>,
    cluster_heads: &[String],
) -> Option<TopologyLabel> {
    let heads: HashSet<&str> = cluster_heads
        .iter()
        .map(String::as_str)
        .filter(|id| graph.contains_node(id))
        .collect();
    if heads.is_empty() {
        return None;
    }

    let members: Vec<&Node> = graph
        .nodes
        .iter()
        .filter(|n| !heads.contains(n.id.as_str()) && n.node_type() != NodeType::BaseStation)
        .collect();
    if members.is_empty() {
        return None;
    }

    let attached: Vec<&Node> = members
        .iter()
        .copied()
        .filter(|n| neighbors(adjacency, &n.id).any(|peer| heads.contains(peer)))
        .collect();

    if attached.len() * 2 <= members.len() {
        return None;
    }

    // Links between members that do not go through a head or a base station
    let station_ids: HashSet<&str> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type() == NodeType::BaseStation)
        .map(|n| n.id.as_str())
        .collect();
    let peer_links: usize = attached
        .iter()
        .map(|n| {
            neighbors(adjacency, &n.id)
                .filter(|peer| !heads.contains(peer) && !station_ids.contains(peer))
                .count()
        })
        .sum();
    let average_peer_links = peer_links as f64 / attached.len() as f64;

    debug!(
        "{} of {} members attached to {} heads, {:.2} peer links per member",
        attached.len(),
        members.len(),
        heads.len(),
        average_peer_links
    );

    if average_peer_links >= CLUSTER_MESH_PEER_LINKS {
        Some(TopologyLabel::ClusterMesh)
    } else {
        Some(TopologyLabel::Cluster)
    }
}

/// Rule 2: exactly one node reaches at least N-2 others, and it is a
/// switch or base station
fn is_star(graph: &Graph, adjacency: &Adjacency<'_>) -> bool {
    let threshold = graph.nodes.len() - 2;
    let mut hubs = graph
        .nodes
        .iter()
        .filter(|n| degree(adjacency, &n.id) >= threshold);

    match (hubs.next(), hubs.next()) {
        (Some(hub), None) => matches!(hub.node_type(), NodeType::Switch | NodeType::BaseStation),
        _ => false,
    }
}

/// Degrees used by the ring and bus rules.
///
/// A base station hanging off a single member is left out together with
/// its link, so an attached receiver does not hide the chain.
fn chain_degrees(graph: &Graph, adjacency: &Adjacency<'_>) -> Vec<usize> {
    let pendant_stations: HashSet<&str> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type() == NodeType::BaseStation && degree(adjacency, &n.id) == 1)
        .map(|n| n.id.as_str())
        .collect();

    graph
        .nodes
        .iter()
        .filter(|n| !pendant_stations.contains(n.id.as_str()))
        .map(|n| {
            neighbors(adjacency, &n.id)
                .filter(|peer| !pendant_stations.contains(peer))
                .count()
        })
        .collect()
}

fn neighbors<'g>(adjacency: &'g Adjacency<'g>, id: &str) -> impl Iterator<Item = &'g str> + 'g {
    adjacency.get(id).into_iter().flatten().copied()
}

/// Layout check for rule 5: nodes sit on a regular, well-filled lattice
pub fn is_grid_layout(nodes: &[Node]) -> bool {
    let xs = distinct_coordinates(nodes.iter().map(|n| n.position.x));
    let ys = distinct_coordinates(nodes.iter().map(|n| n.position.y));

    if xs.len() < 2 || ys.len() < 2 {
        return false;
    }
    if !has_regular_gaps(&xs) || !has_regular_gaps(&ys) {
        return false;
    }

    let lattice = (xs.len() * ys.len()) as f64;
    nodes.len() as f64 / lattice >= GRID_MIN_COVERAGE
}

/// Sorted coordinates with near-duplicates merged
fn distinct_coordinates(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut distinct: Vec<f64> = Vec::new();
    for value in sorted {
        match distinct.last() {
            Some(&last) if value - last < COORDINATE_MERGE_DISTANCE => {}
            _ => distinct.push(value),
        }
    }
    distinct
}

/// Gap standard deviation under 30% of the mean gap
fn has_regular_gaps(coordinates: &[f64]) -> bool {
    let gaps: Vec<f64> = coordinates.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    if mean <= 0.0 {
        return false;
    }

    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;
    variance.sqrt() < GRID_GAP_TOLERANCE * mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, NodeKind, Position};
    use crate::topology::generator::{generate, GenerationRequest};
    use crate::topology::layout::Canvas;
    use crate::topology::types::Topology;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn device(id: &str, x: f64, y: f64) -> Node {
        Node::new(id, NodeKind::end_device(95.0), Position::new(x, y))
    }

    fn generated(request: GenerationRequest, seed: u64) -> (Graph, Vec<String>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let network = generate(&request, &Canvas::default(), &mut rng).unwrap();
        (network.graph, network.cluster_heads)
    }

    #[test]
    fn test_small_graphs_are_linear() {
        let graph = Graph::new(
            vec![device("a", 0.0, 0.0), device("b", 1.0, 0.0)],
            vec![Connection::new("1", "a", "b")],
        );
        assert_eq!(classify(&graph, &[]), TopologyLabel::Linear);
        assert_eq!(classify(&Graph::default(), &[]), TopologyLabel::Linear);
    }

    #[test]
    fn test_generated_ring_of_eight() {
        let (graph, _) = generated(GenerationRequest::new(8, Topology::Ring), 1);
        assert_eq!(classify(&graph, &[]), TopologyLabel::Ring);
    }

    #[test]
    fn test_ring_with_attached_station_stays_ring() {
        let mut request = GenerationRequest::new(8, Topology::Ring);
        request.include_base_station = true;
        let (graph, _) = generated(request, 1);
        assert_eq!(graph.nodes.len(), 9);
        assert_eq!(classify(&graph, &[]), TopologyLabel::Ring);
    }

    #[test]
    fn test_generated_star_of_eight() {
        let (graph, _) = generated(GenerationRequest::new(8, Topology::Star), 1);
        assert_eq!(classify(&graph, &[]), TopologyLabel::Star);
    }

    #[test]
    fn test_star_needs_infrastructure_hub() {
        let mut nodes = vec![device("hub", 0.0, 0.0)];
        let mut connections = Vec::new();
        for i in 0..7 {
            let id = format!("s{}", i);
            nodes.push(device(&id, i as f64 * 10.0, 50.0));
            connections.push(Connection::new(format!("c{}", i), "hub", id));
        }
        let graph = Graph::new(nodes, connections);
        assert_ne!(classify(&graph, &[]), TopologyLabel::Star);
    }

    #[test]
    fn test_generated_bus_of_six() {
        let (graph, _) = generated(GenerationRequest::new(6, Topology::Bus), 1);
        assert_eq!(classify(&graph, &[]), TopologyLabel::Bus);

        let mut request = GenerationRequest::new(6, Topology::Bus);
        request.include_base_station = true;
        let (with_station, _) = generated(request, 1);
        assert_eq!(classify(&with_station, &[]), TopologyLabel::Bus);
    }

    #[test]
    fn test_generated_mesh() {
        for seed in 0..5 {
            let (graph, _) = generated(GenerationRequest::new(60, Topology::Mesh), seed);
            assert_eq!(classify(&graph, &[]), TopologyLabel::Mesh, "seed {}", seed);
        }
    }

    #[test]
    fn test_generated_grid() {
        let mut request = GenerationRequest::new(50, Topology::Grid);
        request.include_routers = true;
        let (graph, _) = generated(request, 1);
        assert_eq!(classify(&graph, &[]), TopologyLabel::Grid);
    }

    #[test]
    fn test_generated_clusters() {
        let mut request = GenerationRequest::new(40, Topology::Cluster);
        request.include_routers = true;
        let (graph, heads) = generated(request.clone(), 2);
        assert_eq!(classify(&graph, &heads), TopologyLabel::Cluster);

        request.topology = Topology::ClusterMesh;
        let (graph, heads) = generated(request, 2);
        assert_eq!(classify(&graph, &heads), TopologyLabel::ClusterMesh);
    }

    #[test]
    fn test_generated_layouts_keep_their_label_across_counts() {
        let expected = [
            (Topology::Mesh, TopologyLabel::Mesh),
            (Topology::Grid, TopologyLabel::Grid),
            (Topology::Ring, TopologyLabel::Ring),
            (Topology::Bus, TopologyLabel::Bus),
            (Topology::Star, TopologyLabel::Star),
            (Topology::Cluster, TopologyLabel::Cluster),
            (Topology::ClusterMesh, TopologyLabel::ClusterMesh),
        ];
        let flags = [(false, false), (true, false), (false, true), (true, true)];

        for (topology, label) in expected {
            for count in [5, 8, 10, 12, 20, 50, 120, 450] {
                for (routers, switches) in flags {
                    let mut request = GenerationRequest::new(count, topology);
                    request.include_routers = routers;
                    request.include_switches = switches;
                    if request.validate().is_err() {
                        continue;
                    }

                    let (graph, heads) = generated(request, 0);
                    assert_eq!(
                        classify(&graph, &heads),
                        label,
                        "{} n={} routers={} switches={}",
                        topology,
                        count,
                        routers,
                        switches
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_heads_are_ignored() {
        let (graph, _) = generated(GenerationRequest::new(8, Topology::Ring), 1);
        assert_eq!(classify(&graph, &["ghost".to_string()]), TopologyLabel::Ring);
    }

    #[test]
    fn test_disconnected_graph_is_hybrid() {
        // three separate pairs plus a triangle
        let mut nodes = Vec::new();
        let mut connections = Vec::new();
        for i in 0..3 {
            let (a, b) = (format!("a{}", i), format!("b{}", i));
            nodes.push(device(&a, i as f64 * 100.0, 0.0));
            nodes.push(device(&b, i as f64 * 100.0, 30.0));
            connections.push(Connection::new(format!("p{}", i), a, b));
        }
        let graph = Graph::new(nodes, connections);
        assert_eq!(classify(&graph, &[]), TopologyLabel::Hybrid { components: 3 });
        assert_eq!(classify(&graph, &[]).to_string(), "Hybrid (3 disconnected components)");
    }

    #[test]
    fn test_grid_layout_detection() {
        let lattice: Vec<Node> = (0..12)
            .map(|i| device(&format!("g{}", i), (i % 4) as f64 * 50.0, (i / 4) as f64 * 40.0))
            .collect();
        assert!(is_grid_layout(&lattice));

        let scattered = vec![
            device("a", 0.0, 0.0),
            device("b", 3.0, 90.0),
            device("c", 170.0, 4.0),
            device("d", 400.0, 250.0),
        ];
        assert!(!is_grid_layout(&scattered));
    }
}
