//! Topology type definitions.
//!
//! [`Topology`] names the layouts the generator can build, while
//! [`TopologyLabel`] is what the classifier reports for an arbitrary graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// Topology templates understood by the network generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    /// Uniform scatter, each end device linked to its nearest neighbour
    Random,
    /// Scatter plus a 3-nearest-neighbour pass, bridged into one component
    Mesh,
    /// Regular lattice with neighbouring lattice points linked
    Grid,
    /// Nodes on a circle, consecutive links wrapping around
    Ring,
    /// Nodes on a horizontal line, consecutive links
    Bus,
    /// Base station hub with spokes
    Star,
    /// Heads with member devices linked only to their head
    Cluster,
    /// Cluster with members meshed inside each cluster
    ClusterMesh,
}

impl Topology {
    pub const ALL: [Topology; 8] = [
        Topology::Random,
        Topology::Mesh,
        Topology::Grid,
        Topology::Ring,
        Topology::Bus,
        Topology::Star,
        Topology::Cluster,
        Topology::ClusterMesh,
    ];

    /// Returns true for the topologies built around cluster heads
    pub fn is_clustered(&self) -> bool {
        matches!(self, Self::Cluster | Self::ClusterMesh)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Random => "random",
            Topology::Mesh => "mesh",
            Topology::Grid => "grid",
            Topology::Ring => "ring",
            Topology::Bus => "bus",
            Topology::Star => "star",
            Topology::Cluster => "cluster",
            Topology::ClusterMesh => "cluster-mesh",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Topology::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown topology '{}' (expected one of: {})",
                    s,
                    Topology::ALL.map(|t| t.as_str()).join(", ")
                )
            })
    }
}

/// Macro-structure reported by the topology classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyLabel {
    /// Fewer than three nodes
    Linear,
    Star,
    Ring,
    Bus,
    Mesh,
    Grid,
    Cluster,
    ClusterMesh,
    /// No recognised shape; carries the connected-component count
    Hybrid { components: usize },
}

impl TopologyLabel {
    /// Short name without the component annotation
    pub fn name(&self) -> &'static str {
        match self {
            TopologyLabel::Linear => "Linear",
            TopologyLabel::Star => "Star",
            TopologyLabel::Ring => "Ring",
            TopologyLabel::Bus => "Bus",
            TopologyLabel::Mesh => "Mesh",
            TopologyLabel::Grid => "Grid",
            TopologyLabel::Cluster => "Cluster",
            TopologyLabel::ClusterMesh => "Cluster-Mesh",
            TopologyLabel::Hybrid { .. } => "Hybrid",
        }
    }
}

impl fmt::Display for TopologyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyLabel::Hybrid { components } if *components > 2 => {
                write!(f, "Hybrid ({} disconnected components)", components)
            }
            other => f.write_str(other.name()),
        }
    }
}

impl Serialize for TopologyLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for TopologyLabel {
    type Err = String;

    /// Accepts the display form, e.g. `Cluster-Mesh` or
    /// `Hybrid (3 disconnected components)`, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");

        if let Some(rest) = normalized.strip_prefix("hybrid") {
            let components = rest
                .trim()
                .trim_start_matches('(')
                .split_whitespace()
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(1);
            return Ok(TopologyLabel::Hybrid { components });
        }

        let label = match normalized.as_str() {
            "linear" => TopologyLabel::Linear,
            "star" => TopologyLabel::Star,
            "ring" => TopologyLabel::Ring,
            "bus" => TopologyLabel::Bus,
            "mesh" => TopologyLabel::Mesh,
            "grid" => TopologyLabel::Grid,
            "cluster" => TopologyLabel::Cluster,
            "cluster-mesh" | "clustermesh" => TopologyLabel::ClusterMesh,
            _ => return Err(format!("Unknown topology label '{}'", s)),
        };
        Ok(label)
    }
}
