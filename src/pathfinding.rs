//! Route computation over a design snapshot.
//!
//! Paths are unweighted: every link costs one hop. Disabled switches are
//! always treated as excluded, and the "secure" variant additionally routes
//! around malicious end devices.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::graph::{Graph, Node, Position};

/// Breadth-first shortest path from `start` to `end`.
///
/// # Arguments
/// * `graph` - The design snapshot
/// * `start` / `end` - Node ids of the endpoints
/// * `exclude` - Node ids that may not appear anywhere on the path
///
/// # Returns
/// The node ids along the path, both endpoints included, or `None` when an
/// endpoint is empty, unknown or excluded, or no route exists. Among equal
/// length paths the first discovered in connection order wins.
pub fn shortest_path(
    graph: &Graph,
    start: &str,
    end: &str,
    exclude: &[&str],
) -> Option<Vec<String>> {
    if start.is_empty() || end.is_empty() {
        return None;
    }

    let excluded = excluded_ids(graph, exclude);
    if excluded.contains(start) || excluded.contains(end) {
        return None;
    }
    if !graph.contains_node(start) || !graph.contains_node(end) {
        return None;
    }
    if start == end {
        return Some(vec![start.to_string()]);
    }

    let known: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for conn in &graph.connections {
        let (from, to) = (conn.from.as_str(), conn.to.as_str());
        if !known.contains(from) || !known.contains(to) {
            continue;
        }
        if excluded.contains(from) || excluded.contains(to) {
            continue;
        }
        adjacency.entry(from).or_default().push(to);
        adjacency.entry(to).or_default().push(from);
    }

    let mut previous: HashMap<&str, &str> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if current == end {
            break;
        }
        let Some(neighbors) = adjacency.get(current) else {
            continue;
        };
        for &neighbor in neighbors {
            if visited.insert(neighbor) {
                previous.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    if !visited.contains(end) {
        debug!("No path from {} to {} ({} nodes excluded)", start, end, excluded.len());
        return None;
    }

    let mut path = vec![end.to_string()];
    let mut cursor = end;
    while let Some(&prev) = previous.get(cursor) {
        path.push(prev.to_string());
        cursor = prev;
    }
    path.reverse();
    Some(path)
}

/// Shortest path that also avoids every malicious end device
pub fn secure_path(graph: &Graph, start: &str, end: &str) -> Option<Vec<String>> {
    let malicious = graph.malicious_ids();
    let exclude: Vec<&str> = malicious.iter().map(String::as_str).collect();
    shortest_path(graph, start, end, &exclude)
}

/// Caller exclusions plus every disabled switch
fn excluded_ids<'a>(graph: &'a Graph, exclude: &[&'a str]) -> HashSet<&'a str> {
    let mut excluded: HashSet<&str> = exclude.iter().copied().collect();
    excluded.extend(
        graph
            .nodes
            .iter()
            .filter(|n| n.is_disabled_switch())
            .map(|n| n.id.as_str()),
    );
    excluded
}

/// The two nodes furthest apart on the canvas.
///
/// Exhaustive O(n^2) scan over nodes not in `exclude`. Returns `None` with
/// fewer than two eligible nodes; ties keep the first maximum found.
pub fn farthest_node_pair(nodes: &[Node], exclude: &[&str]) -> Option<(String, String)> {
    let eligible: Vec<&Node> = nodes
        .iter()
        .filter(|n| !exclude.contains(&n.id.as_str()))
        .collect();

    if eligible.len() < 2 {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    let mut best_distance = f64::NEG_INFINITY;

    for i in 0..eligible.len() {
        for j in (i + 1)..eligible.len() {
            let distance = eligible[i].position.distance_to(&eligible[j].position);
            if distance > best_distance {
                best_distance = distance;
                best = Some((i, j));
            }
        }
    }

    best.map(|(i, j)| (eligible[i].id.clone(), eligible[j].id.clone()))
}

/// Canvas position of a packet `progress` of the way along `path`.
///
/// Progress is clamped to [0, 1], with non-finite values treated as 0, and
/// split evenly across hops so each link takes the same share of the
/// animation regardless of its length. Returns `None` if the path is empty
/// or names an unknown node.
pub fn position_along_path(graph: &Graph, path: &[String], progress: f64) -> Option<Position> {
    let positions: Vec<Position> = path
        .iter()
        .map(|id| graph.node(id).map(|n| n.position))
        .collect::<Option<Vec<_>>>()?;

    match positions.len() {
        0 => None,
        1 => Some(positions[0]),
        len => {
            let hops = (len - 1) as f64;
            let progress = if progress.is_finite() {
                progress.clamp(0.0, 1.0)
            } else {
                0.0
            };
            let scaled = progress * hops;
            let segment = (scaled.floor() as usize).min(len - 2);
            let within = scaled - segment as f64;
            Some(positions[segment].lerp(&positions[segment + 1], within))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, NodeKind};

    fn device(id: &str, x: f64, y: f64) -> Node {
        Node::new(id, NodeKind::end_device(95.0), Position::new(x, y))
    }

    /// n0 - n1 - ... - n{len-1} laid out left to right
    fn line(len: usize) -> Graph {
        let nodes = (0..len).map(|i| device(&format!("n{}", i), i as f64 * 10.0, 0.0)).collect();
        let connections = (1..len)
            .map(|i| Connection::new(format!("c{}", i), format!("n{}", i - 1), format!("n{}", i)))
            .collect();
        Graph::new(nodes, connections)
    }

    #[test]
    fn test_line_path_contains_all_nodes() {
        let graph = line(6);
        let path = shortest_path(&graph, "n0", "n5", &[]).unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path.first().map(String::as_str), Some("n0"));
        assert_eq!(path.last().map(String::as_str), Some("n5"));
    }

    #[test]
    fn test_excluding_interior_node_breaks_line() {
        let graph = line(6);
        for interior in 1..5 {
            let id = format!("n{}", interior);
            assert!(shortest_path(&graph, "n0", "n5", &[id.as_str()]).is_none());
        }
    }

    #[test]
    fn test_invalid_endpoints() {
        let graph = line(3);
        assert!(shortest_path(&graph, "", "n2", &[]).is_none());
        assert!(shortest_path(&graph, "n0", "missing", &[]).is_none());
        assert!(shortest_path(&graph, "n0", "n2", &["n0"]).is_none());
        assert_eq!(shortest_path(&graph, "n1", "n1", &[]), Some(vec!["n1".to_string()]));
    }

    #[test]
    fn test_disabled_switch_blocks_path() {
        let disabled = NodeKind::Switch { port_count: 4, is_enabled: false };
        let graph = Graph::new(
            vec![
                device("a", 0.0, 0.0),
                Node::new("sw", disabled, Position::new(5.0, 0.0)),
                device("b", 10.0, 0.0),
            ],
            vec![Connection::new("1", "a", "sw"), Connection::new("2", "sw", "b")],
        );
        assert!(shortest_path(&graph, "a", "b", &[]).is_none());

        let mut enabled = graph.clone();
        enabled.nodes[1].kind = NodeKind::switch();
        assert_eq!(shortest_path(&enabled, "a", "b", &[]).map(|p| p.len()), Some(3));
    }

    #[test]
    fn test_shortest_of_two_routes() {
        // a-b-c-d plus shortcut a-d
        let mut graph = line(4);
        graph.connections.push(Connection::new("short", "n0", "n3"));
        let path = shortest_path(&graph, "n0", "n3", &[]).unwrap();
        assert_eq!(path, vec!["n0".to_string(), "n3".to_string()]);
    }

    #[test]
    fn test_secure_path_avoids_malicious() {
        // square a-b-d and a-c-d, b malicious
        let mut nodes = vec![
            device("a", 0.0, 0.0),
            device("b", 10.0, 0.0),
            device("c", 0.0, 10.0),
            device("d", 10.0, 10.0),
        ];
        nodes[1].set_malicious(true);
        let graph = Graph::new(
            nodes,
            vec![
                Connection::new("1", "a", "b"),
                Connection::new("2", "b", "d"),
                Connection::new("3", "a", "c"),
                Connection::new("4", "c", "d"),
            ],
        );

        let path = secure_path(&graph, "a", "d").unwrap();
        assert_eq!(path, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_farthest_pair() {
        let nodes = vec![
            device("a", 0.0, 0.0),
            device("b", 3.0, 4.0),
            device("c", 100.0, 0.0),
            device("d", 50.0, 50.0),
        ];
        assert_eq!(farthest_node_pair(&nodes, &[]), Some(("a".to_string(), "c".to_string())));
        assert_eq!(farthest_node_pair(&nodes, &["c"]), Some(("a".to_string(), "d".to_string())));
        assert_eq!(farthest_node_pair(&nodes, &["a", "b", "c"]), None);
    }

    #[test]
    fn test_farthest_pair_tie_keeps_first() {
        // both diagonals of the square have the same length
        let nodes = vec![
            device("a", 0.0, 0.0),
            device("b", 10.0, 0.0),
            device("c", 10.0, 10.0),
            device("d", 0.0, 10.0),
        ];
        assert_eq!(farthest_node_pair(&nodes, &[]), Some(("a".to_string(), "c".to_string())));
    }

    #[test]
    fn test_position_along_path() {
        let graph = line(3);
        let path: Vec<String> = vec!["n0".into(), "n1".into(), "n2".into()];

        assert_eq!(position_along_path(&graph, &path, 0.0), Some(Position::new(0.0, 0.0)));
        assert_eq!(position_along_path(&graph, &path, 0.25), Some(Position::new(5.0, 0.0)));
        assert_eq!(position_along_path(&graph, &path, 1.0), Some(Position::new(20.0, 0.0)));
        assert_eq!(position_along_path(&graph, &path, 7.0), Some(Position::new(20.0, 0.0)));
        assert_eq!(position_along_path(&graph, &[], 0.5), None);
    }

    #[test]
    fn test_non_finite_progress_starts_at_origin() {
        let graph = line(3);
        let path: Vec<String> = vec!["n0".into(), "n1".into(), "n2".into()];

        for progress in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(position_along_path(&graph, &path, progress), Some(Position::new(0.0, 0.0)));
        }
    }
}
