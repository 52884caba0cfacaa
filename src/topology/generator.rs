//! Procedural network generation.
//!
//! Every generated graph is built so that the classifier recognises the
//! requested topology: rings have every member at degree two, stars have a
//! single infrastructure hub, meshes are connected with average degree well
//! above 2.5, grids sit on a regular lattice and clusters report their heads.
//!
//! The random source is a parameter. Tests pass a seeded `StdRng`, the CLI
//! seeds from configuration or entropy.

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::classifier::MESH_DEGREE_THRESHOLD;
use super::layout::{circle_positions, grid_dimensions, k_nearest, random_position_near, Canvas};
use super::types::Topology;
use crate::graph::{
    find_connected_components, Connection, Graph, Node, NodeKind, NodeType, Position,
};
use crate::utils::ip_utils;

/// Hard cap on the number of generated nodes
pub const MAX_NODES: usize = 450;

/// Cluster heads used when a request does not name a count
pub const DEFAULT_CLUSTER_HEADS: usize = 4;

/// First address handed out to generated nodes
pub const FIRST_ADDRESS: &str = "192.168.0.1";

/// One router replaces an end device every this many nodes
const ROUTER_INTERVAL: usize = 25;

/// One switch replaces an end device every this many nodes
const SWITCH_INTERVAL: usize = 30;

/// Neighbours linked per node by the mesh passes
const MESH_NEIGHBORS: usize = 3;

/// Smallest grid whose lattice fills enough of its bounding box
pub const MIN_GRID_NODES: usize = 5;

/// Members every cluster-mesh head needs for a peer link to exist
const MIN_MESH_MEMBERS_PER_HEAD: usize = 2;

/// Errors rejected before any node is created
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("Node count must be at least 1")]
    NoNodes,

    #[error("Node count {count} exceeds the maximum of {max}")]
    TooManyNodes { count: usize, max: usize },

    #[error("Cluster topologies need at least one cluster head")]
    NoClusterHeads,

    #[error("Node count {count} must exceed the number of cluster heads ({heads})")]
    TooFewMembers { count: usize, heads: usize },

    #[error("Grid layouts need at least {min} nodes, got {count}")]
    TooFewGridNodes { count: usize, min: usize },

    #[error("Cluster-mesh layouts need {needed} nodes for two members per head, got {count}")]
    TooFewMeshMembers { count: usize, needed: usize },
}

/// Parameters of a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Nodes to place. Ring, bus and cluster layouts add their base station
    /// on top of this count.
    pub count: usize,
    pub topology: Topology,
    #[serde(default)]
    pub include_routers: bool,
    #[serde(default)]
    pub include_switches: bool,
    /// Attach a base station to ring and bus layouts
    #[serde(default)]
    pub include_base_station: bool,
    #[serde(default = "default_cluster_heads")]
    pub cluster_heads: usize,
}

fn default_cluster_heads() -> usize {
    DEFAULT_CLUSTER_HEADS
}

impl GenerationRequest {
    pub fn new(count: usize, topology: Topology) -> Self {
        Self {
            count,
            topology,
            include_routers: false,
            include_switches: false,
            include_base_station: false,
            cluster_heads: DEFAULT_CLUSTER_HEADS,
        }
    }

    /// Check the input constraints
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.count == 0 {
            return Err(GenerationError::NoNodes);
        }
        if self.count > MAX_NODES {
            return Err(GenerationError::TooManyNodes { count: self.count, max: MAX_NODES });
        }
        if self.topology.is_clustered() {
            if self.cluster_heads == 0 {
                return Err(GenerationError::NoClusterHeads);
            }
            if self.count <= self.cluster_heads {
                return Err(GenerationError::TooFewMembers {
                    count: self.count,
                    heads: self.cluster_heads,
                });
            }
        }
        if self.topology == Topology::ClusterMesh {
            let needed = self.cluster_heads * (MIN_MESH_MEMBERS_PER_HEAD + 1);
            if self.count < needed {
                return Err(GenerationError::TooFewMeshMembers { count: self.count, needed });
            }
        }
        if self.topology == Topology::Grid && self.count < MIN_GRID_NODES {
            return Err(GenerationError::TooFewGridNodes { count: self.count, min: MIN_GRID_NODES });
        }
        Ok(())
    }

    /// Node type for the `index`-th member of a scattered or chained layout
    fn member_type(&self, index: usize) -> NodeType {
        if self.include_routers && index % ROUTER_INTERVAL == ROUTER_INTERVAL / 2 {
            NodeType::Router
        } else if self.include_switches && index % SWITCH_INTERVAL == SWITCH_INTERVAL * 2 / 3 {
            NodeType::Switch
        } else {
            NodeType::EndDevice
        }
    }
}

/// A generated design plus the ids of its cluster heads, if any
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedNetwork {
    pub graph: Graph,
    pub cluster_heads: Vec<String>,
}

/// Generate a network for `request` on `canvas`.
///
/// # Errors
/// Returns a [`GenerationError`] when the request violates an input
/// constraint; nothing is generated in that case.
pub fn generate<R: Rng + ?Sized>(
    request: &GenerationRequest,
    canvas: &Canvas,
    rng: &mut R,
) -> Result<GeneratedNetwork, GenerationError> {
    request.validate()?;

    info!(
        "Generating {} topology with {} nodes (routers: {}, switches: {})",
        request.topology, request.count, request.include_routers, request.include_switches
    );

    let mut builder = NetworkBuilder::new(rng);
    let mut cluster_heads = Vec::new();

    match request.topology {
        Topology::Random => build_scatter(&mut builder, request, canvas, false),
        Topology::Mesh => build_scatter(&mut builder, request, canvas, true),
        Topology::Grid => build_grid(&mut builder, request, canvas),
        Topology::Ring => build_chain(&mut builder, request, canvas, true),
        Topology::Bus => build_chain(&mut builder, request, canvas, false),
        Topology::Star => build_star(&mut builder, request, canvas),
        Topology::Cluster => {
            cluster_heads = build_clusters(&mut builder, request, canvas, false);
        }
        Topology::ClusterMesh => {
            cluster_heads = build_clusters(&mut builder, request, canvas, true);
        }
    }

    let graph = builder.finish();
    info!(
        "Generated {} nodes and {} connections",
        graph.nodes.len(),
        graph.connections.len()
    );

    Ok(GeneratedNetwork { graph, cluster_heads })
}

/// Accumulates nodes and deduplicated links by index
struct NetworkBuilder<'r, R: Rng + ?Sized> {
    rng: &'r mut R,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    links: HashSet<(usize, usize)>,
    type_counters: HashMap<NodeType, usize>,
}

impl<'r, R: Rng + ?Sized> NetworkBuilder<'r, R> {
    fn new(rng: &'r mut R) -> Self {
        Self {
            rng,
            nodes: Vec::new(),
            connections: Vec::new(),
            links: HashSet::new(),
            type_counters: HashMap::new(),
        }
    }

    /// Create a node with randomised energy attributes, returning its index
    fn add_node(&mut self, node_type: NodeType, position: Position) -> usize {
        let counter = self.type_counters.entry(node_type).or_insert(0);
        *counter += 1;
        let prefix = match node_type {
            NodeType::EndDevice => "node",
            NodeType::Router => "router",
            NodeType::Switch => "switch",
            NodeType::BaseStation => "bs",
        };
        let id = format!("{}-{}", prefix, counter);

        let (kind, energy_spent) = match node_type {
            NodeType::EndDevice => (
                NodeKind::end_device(self.rng.gen_range(70.0..=100.0_f64).round()),
                self.rng.gen_range(5.0..15.0),
            ),
            NodeType::Router => (NodeKind::router(), self.rng.gen_range(8.0..12.0)),
            NodeType::Switch => (NodeKind::switch(), self.rng.gen_range(8.0..12.0)),
            NodeType::BaseStation => (NodeKind::base_station(), self.rng.gen_range(8.0..12.0)),
        };

        let index = self.nodes.len();
        let ip_address = match ip_utils::offset_address(FIRST_ADDRESS, index) {
            Ok(ip) => ip,
            Err(e) => {
                warn!("No address for node {}: {}", id, e);
                String::new()
            }
        };

        self.nodes.push(
            Node::new(id, kind, position)
                .with_ip(ip_address)
                .with_energy_spent(energy_spent),
        );
        index
    }

    /// Link two nodes unless they are the same or already linked
    fn connect(&mut self, a: usize, b: usize) -> bool {
        if a == b {
            return false;
        }
        let key = (a.min(b), a.max(b));
        if !self.links.insert(key) {
            return false;
        }

        let id = format!("link-{}", self.connections.len() + 1);
        self.connections.push(Connection::new(
            id,
            self.nodes[a].id.clone(),
            self.nodes[b].id.clone(),
        ));
        true
    }

    fn positions(&self) -> Vec<Position> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    /// Fully interconnect the given nodes
    fn connect_pairwise(&mut self, indices: &[usize]) {
        for (i, &a) in indices.iter().enumerate() {
            for &b in &indices[i + 1..] {
                self.connect(a, b);
            }
        }
    }

    /// Link each of `indices` to its `k` nearest neighbours among `candidates`
    fn connect_nearest(&mut self, indices: &[usize], candidates: &[usize], k: usize) {
        let positions = self.positions();
        for &i in indices {
            for j in k_nearest(&positions, i, candidates, k) {
                self.connect(i, j);
            }
        }
    }

    /// Join all connected components, closest pair first
    fn bridge_components(&mut self) {
        loop {
            let index_of: HashMap<&str, usize> = self
                .nodes
                .iter()
                .enumerate()
                .map(|(i, n)| (n.id.as_str(), i))
                .collect();
            let components: Vec<Vec<usize>> =
                find_connected_components(&self.nodes, &self.connections)
                    .iter()
                    .map(|c| {
                        c.iter()
                            .filter_map(|n| index_of.get(n.id.as_str()).copied())
                            .collect()
                    })
                    .collect();

            if components.len() <= 1 {
                return;
            }

            let first: HashSet<usize> = components[0].iter().copied().collect();
            let mut best: Option<(usize, usize, f64)> = None;
            for &a in &components[0] {
                for (b, node) in self.nodes.iter().enumerate() {
                    if first.contains(&b) {
                        continue;
                    }
                    let distance = self.nodes[a].position.distance_to(&node.position);
                    if best.map_or(true, |(_, _, d)| distance < d) {
                        best = Some((a, b, distance));
                    }
                }
            }

            match best {
                Some((a, b, distance)) => {
                    debug!(
                        "Bridging components via {} - {} ({:.1})",
                        self.nodes[a].id, self.nodes[b].id, distance
                    );
                    self.connect(a, b);
                }
                None => return,
            }
        }
    }

    fn finish(self) -> Graph {
        Graph::new(self.nodes, self.connections)
    }
}

/// Random and mesh layouts: uniform scatter with nearest-neighbour links
fn build_scatter<R: Rng + ?Sized>(
    builder: &mut NetworkBuilder<'_, R>,
    request: &GenerationRequest,
    canvas: &Canvas,
    mesh: bool,
) {
    for i in 0..request.count {
        let position = canvas.random_position(&mut *builder.rng);
        builder.add_node(request.member_type(i), position);
    }

    let all: Vec<usize> = (0..builder.nodes.len()).collect();
    let infrastructure: Vec<usize> = all
        .iter()
        .copied()
        .filter(|&i| builder.nodes[i].is_infrastructure())
        .collect();
    let end_devices: Vec<usize> = all
        .iter()
        .copied()
        .filter(|&i| builder.nodes[i].is_end_device())
        .collect();

    builder.connect_pairwise(&infrastructure);
    builder.connect_nearest(&end_devices, &all, 1);

    if mesh {
        builder.connect_nearest(&all, &all, MESH_NEIGHBORS);
        builder.bridge_components();
    }
}

/// Regular lattice with right and down neighbours linked. Lattices too
/// sparse to read as a dense layout also get their cell diagonals.
fn build_grid<R: Rng + ?Sized>(
    builder: &mut NetworkBuilder<'_, R>,
    request: &GenerationRequest,
    canvas: &Canvas,
) {
    let (columns, rows) = grid_dimensions(request.count, canvas.aspect_ratio());
    let (width, height) = canvas.usable();
    let center = canvas.center();
    let dx = if columns > 1 { width / (columns - 1) as f64 } else { 0.0 };
    let dy = if rows > 1 { height / (rows - 1) as f64 } else { 0.0 };

    debug!("Grid layout: {} columns x {} rows", columns, rows);

    for i in 0..request.count {
        let (column, row) = (i % columns, i / columns);
        let x = if columns > 1 { canvas.margin + column as f64 * dx } else { center.x };
        let y = if rows > 1 { canvas.margin + row as f64 * dy } else { center.y };
        builder.add_node(grid_point_type(request, column, row, columns, rows), Position::new(x, y));
    }

    for i in 0..request.count {
        if i % columns + 1 < columns && i + 1 < request.count {
            builder.connect(i, i + 1);
        }
        if i + columns < request.count {
            builder.connect(i, i + columns);
        }
    }

    let infrastructure: Vec<usize> = (0..builder.nodes.len())
        .filter(|&i| builder.nodes[i].is_infrastructure())
        .collect();
    builder.connect_pairwise(&infrastructure);

    let average_degree = 2.0 * builder.connections.len() as f64 / request.count as f64;
    if average_degree <= MESH_DEGREE_THRESHOLD {
        debug!("Sparse lattice (average degree {:.2}), linking cell diagonals", average_degree);
        for i in 0..request.count {
            let column = i % columns;
            if column + 1 < columns && i + columns + 1 < request.count {
                builder.connect(i, i + columns + 1);
            }
            if column > 0 && i + columns - 1 < request.count {
                builder.connect(i, i + columns - 1);
            }
        }
    }
}

/// Infrastructure sits on every 4th interior column and every 3rd interior
/// row, alternating routers and switches when both are enabled
fn grid_point_type(
    request: &GenerationRequest,
    column: usize,
    row: usize,
    columns: usize,
    rows: usize,
) -> NodeType {
    let interior = column > 0 && row > 0 && column + 1 < columns && row + 1 < rows;
    if !interior || column % 4 != 2 || row % 3 != 1 {
        return NodeType::EndDevice;
    }

    let prefer_router = (column / 4 + row / 3) % 2 == 0;
    match (request.include_routers, request.include_switches) {
        (true, true) if prefer_router => NodeType::Router,
        (true, true) => NodeType::Switch,
        (true, false) => NodeType::Router,
        (false, true) => NodeType::Switch,
        (false, false) => NodeType::EndDevice,
    }
}

/// Ring (closed) and bus (open) chains, optionally with a base station
fn build_chain<R: Rng + ?Sized>(
    builder: &mut NetworkBuilder<'_, R>,
    request: &GenerationRequest,
    canvas: &Canvas,
    closed: bool,
) {
    let center = canvas.center();
    let positions = if closed {
        circle_positions(center, canvas.max_radius(), request.count)
    } else {
        let (width, _) = canvas.usable();
        let step = if request.count > 1 { width / (request.count - 1) as f64 } else { 0.0 };
        (0..request.count)
            .map(|i| {
                if request.count > 1 {
                    Position::new(canvas.margin + i as f64 * step, center.y)
                } else {
                    center
                }
            })
            .collect()
    };

    for (i, position) in positions.into_iter().enumerate() {
        builder.add_node(request.member_type(i), position);
    }

    let members: Vec<usize> = (0..request.count).collect();
    for i in 1..request.count {
        builder.connect(i - 1, i);
    }
    if closed && request.count > 2 {
        builder.connect(request.count - 1, 0);
    }

    if request.include_base_station {
        let position = if closed {
            center
        } else {
            Position::new(center.x, center.y - canvas.max_radius() / 2.0)
        };
        let station = builder.add_node(NodeType::BaseStation, position);
        builder.connect_nearest(&[station], &members, 1);
    }
}

/// Base station hub at the centre with `count - 1` spokes
fn build_star<R: Rng + ?Sized>(
    builder: &mut NetworkBuilder<'_, R>,
    request: &GenerationRequest,
    canvas: &Canvas,
) {
    let hub = builder.add_node(NodeType::BaseStation, canvas.center());
    let spokes = request.count - 1;

    for (i, position) in circle_positions(canvas.center(), canvas.max_radius(), spokes)
        .into_iter()
        .enumerate()
    {
        let spoke = builder.add_node(request.member_type(i), position);
        builder.connect(hub, spoke);
    }
}

/// Cluster and cluster-mesh layouts; returns the head ids
fn build_clusters<R: Rng + ?Sized>(
    builder: &mut NetworkBuilder<'_, R>,
    request: &GenerationRequest,
    canvas: &Canvas,
    mesh: bool,
) -> Vec<String> {
    let center = canvas.center();
    let head_count = request.cluster_heads;
    let ring_radius = canvas.max_radius() * 0.55;

    // Keep neighbouring clusters from overlapping
    let cluster_radius = if head_count > 1 {
        let spacing = 2.0 * ring_radius * (std::f64::consts::PI / head_count as f64).sin();
        (spacing / 2.0 * 0.8).min(canvas.max_radius() * 0.4)
    } else {
        canvas.max_radius() * 0.4
    };

    let station = builder.add_node(NodeType::BaseStation, center);

    let head_type = if request.include_routers { NodeType::Router } else { NodeType::EndDevice };
    let head_positions = circle_positions(center, ring_radius, head_count);
    let heads: Vec<usize> = head_positions
        .iter()
        .map(|&p| builder.add_node(head_type, p))
        .collect();

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); head_count];
    for m in 0..(request.count - head_count) {
        let cluster = m % head_count;
        let position =
            random_position_near(head_positions[cluster], cluster_radius, &mut *builder.rng);
        let member = builder.add_node(NodeType::EndDevice, position);
        builder.connect(member, heads[cluster]);
        members[cluster].push(member);
    }

    if mesh {
        for cluster in &members {
            builder.connect_nearest(cluster, cluster, MESH_NEIGHBORS);
        }
    }

    builder.connect_pairwise(&heads);
    for &head in &heads {
        builder.connect(head, station);
    }

    debug!(
        "Built {} clusters (radius {:.1}) with sizes {:?}",
        head_count,
        cluster_radius,
        members.iter().map(Vec::len).collect::<Vec<_>>()
    );

    heads.iter().map(|&h| builder.nodes[h].id.clone()).collect()
}
