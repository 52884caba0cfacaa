//! Graph data model.
//!
//! Nodes carry a tagged [`NodeKind`] so that type-specific attributes
//! (battery efficiency, forwarding capacity, port count, receiver flag)
//! only exist on the kinds they belong to. The serialized form keeps the
//! flat camelCase layout of saved design documents:
//!
//! ```json
//! { "id": "node-1", "type": "END_DEVICE", "position": { "x": 10.0, "y": 20.0 },
//!   "ipAddress": "192.168.0.1", "energySpent": 9.5,
//!   "energyEfficiency": 92.0, "isMalicious": false }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Efficiency reported for infrastructure nodes, which are mains powered.
pub const INFRASTRUCTURE_EFFICIENCY: f64 = 100.0;

/// End devices below this efficiency are considered weak.
pub const WEAK_NODE_THRESHOLD: f64 = 85.0;

/// Canvas coordinates of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation towards `other`, `t` in [0, 1]
    pub fn lerp(&self, other: &Position, t: f64) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Discriminant of [`NodeKind`], used for counting and CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    EndDevice,
    Router,
    Switch,
    BaseStation,
}

impl NodeType {
    /// Routers, switches and base stations
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, NodeType::EndDevice)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::EndDevice => "END_DEVICE",
            NodeType::Router => "ROUTER",
            NodeType::Switch => "SWITCH",
            NodeType::BaseStation => "BASE_STATION",
        };
        f.write_str(name)
    }
}

/// Type-specific node attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Battery powered ad hoc participant
    #[serde(rename_all = "camelCase")]
    EndDevice {
        /// Remaining battery / health, 0-100
        #[serde(default = "default_efficiency")]
        energy_efficiency: f64,
        #[serde(default)]
        is_malicious: bool,
    },
    #[serde(rename_all = "camelCase")]
    Router {
        #[serde(default = "default_forwarding_capacity")]
        packet_forwarding_capacity: u32,
    },
    #[serde(rename_all = "camelCase")]
    Switch {
        #[serde(default = "default_port_count")]
        port_count: u32,
        /// Disabled switches are never part of a computed path
        #[serde(default = "default_true")]
        is_enabled: bool,
    },
    #[serde(rename_all = "camelCase")]
    BaseStation {
        #[serde(default = "default_true")]
        is_receiver: bool,
    },
}

fn default_efficiency() -> f64 {
    100.0
}

fn default_forwarding_capacity() -> u32 {
    100
}

fn default_port_count() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

impl NodeKind {
    /// End device with the given efficiency
    pub fn end_device(energy_efficiency: f64) -> Self {
        NodeKind::EndDevice { energy_efficiency, is_malicious: false }
    }

    pub fn router() -> Self {
        NodeKind::Router { packet_forwarding_capacity: default_forwarding_capacity() }
    }

    pub fn switch() -> Self {
        NodeKind::Switch { port_count: default_port_count(), is_enabled: true }
    }

    pub fn base_station() -> Self {
        NodeKind::BaseStation { is_receiver: true }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::EndDevice { .. } => NodeType::EndDevice,
            NodeKind::Router { .. } => NodeType::Router,
            NodeKind::Switch { .. } => NodeType::Switch,
            NodeKind::BaseStation { .. } => NodeType::BaseStation,
        }
    }
}

/// A device placed on the design canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub position: Position,
    #[serde(default)]
    pub ip_address: String,
    /// Consumption-rate proxy, non-negative
    #[serde(default)]
    pub energy_spent: f64,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            ip_address: String::new(),
            energy_spent: 0.0,
        }
    }

    pub fn with_ip(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = ip_address.into();
        self
    }

    pub fn with_energy_spent(mut self, energy_spent: f64) -> Self {
        self.energy_spent = energy_spent.max(0.0);
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Battery efficiency; infrastructure always reports 100
    pub fn energy_efficiency(&self) -> f64 {
        match self.kind {
            NodeKind::EndDevice { energy_efficiency, .. } => energy_efficiency,
            _ => INFRASTRUCTURE_EFFICIENCY,
        }
    }

    /// Only end devices can be flagged malicious
    pub fn is_malicious(&self) -> bool {
        matches!(self.kind, NodeKind::EndDevice { is_malicious: true, .. })
    }

    /// Switches switched off by the user
    pub fn is_disabled_switch(&self) -> bool {
        matches!(self.kind, NodeKind::Switch { is_enabled: false, .. })
    }

    /// End device whose efficiency fell below `threshold`
    pub fn is_weak(&self, threshold: f64) -> bool {
        matches!(
            self.kind,
            NodeKind::EndDevice { energy_efficiency, .. } if energy_efficiency < threshold
        )
    }

    pub fn is_end_device(&self) -> bool {
        self.node_type() == NodeType::EndDevice
    }

    pub fn is_infrastructure(&self) -> bool {
        self.node_type().is_infrastructure()
    }

    /// Flag or clear the malicious marker; ignored for infrastructure
    pub fn set_malicious(&mut self, malicious: bool) {
        if let NodeKind::EndDevice { is_malicious, .. } = &mut self.kind {
            *is_malicious = malicious;
        }
    }
}

/// Undirected link between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub from: String,
    pub to: String,
}

impl Connection {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { id: id.into(), from: from.into(), to: to.into() }
    }

    /// True if the connection touches `node_id` on either end
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }

    /// Order-independent endpoint key, used to avoid duplicate links
    pub fn pair_key(&self) -> (String, String) {
        pair_key(&self.from, &self.to)
    }
}

/// Canonical unordered key for a pair of node ids
pub fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// The persisted aggregate: all nodes and connections of a design
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of end devices flagged malicious, in node order
    pub fn malicious_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.is_malicious())
            .map(|n| n.id.clone())
            .collect()
    }

    /// Number of nodes of the given type
    pub fn count_of(&self, node_type: NodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type() == node_type).count()
    }
}
