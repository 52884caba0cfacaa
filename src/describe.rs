//! Topology description text.
//!
//! Prose about a design comes from a [`DescriptionProvider`]. Without a
//! configured live provider the built-in [`CannedDescriptions`] table is
//! used. A failing provider never blocks analysis: its error is logged and
//! a placeholder string takes the place of the text.

use std::env;

use log::{info, warn};

use crate::graph::DerivedStats;
use crate::topology::TopologyLabel;

/// Environment variable holding the credential for a live provider
pub const CREDENTIAL_ENV_VAR: &str = "ADHOCSIM_LLM_API_KEY";

/// Text returned in place of a description when the provider fails
pub const PLACEHOLDER: &str = "Description unavailable.";

#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("Description provider is not available: {0}")]
    Unavailable(String),

    #[error("Description provider returned an empty response")]
    EmptyResponse,
}

/// Source of free-text descriptions for a classified design
pub trait DescriptionProvider {
    fn name(&self) -> &str;

    /// Describe a design with the given label and statistics
    fn describe(
        &self,
        label: &TopologyLabel,
        stats: &DerivedStats,
    ) -> Result<String, DescriptionError>;
}

/// Static per-topology text, used when no live provider is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedDescriptions;

impl CannedDescriptions {
    fn text(label: &TopologyLabel) -> &'static str {
        match label {
            TopologyLabel::Linear => {
                "**Linear Topology**: Too few nodes to form a recognisable structure. \
                 Traffic flows directly between the devices present."
            }
            TopologyLabel::Star => {
                "**Star Topology**: All devices connect to a central hub. \
                 **Strengths**: simple routing and easy management. \
                 **Weaknesses**: the hub is a single point of failure."
            }
            TopologyLabel::Ring => {
                "**Ring Topology**: Each device connects to exactly two neighbours, \
                 forming a closed loop. **Strengths**: predictable paths. \
                 **Weaknesses**: a single broken link forces long detours."
            }
            TopologyLabel::Bus => {
                "**Bus Topology**: Devices share a single linear backbone. \
                 **Strengths**: minimal cabling and simple layout. \
                 **Weaknesses**: end-to-end delay grows with length \
                 and any break splits the network."
            }
            TopologyLabel::Mesh => {
                "**Mesh Topology**: Devices link to several nearby peers. \
                 **Strengths**: many redundant paths and high robustness. \
                 **Weaknesses**: more links to maintain and higher routing overhead."
            }
            TopologyLabel::Grid => {
                "**Grid Topology**: Devices sit on a regular lattice linked to their \
                 lattice neighbours. **Strengths**: uniform coverage and alternative paths. \
                 **Weaknesses**: long paths across large grids."
            }
            TopologyLabel::Cluster => {
                "**Cluster Topology**: Members attach to cluster heads that relay \
                 traffic to a base station. **Strengths**: scalable and energy aware. \
                 **Weaknesses**: cluster heads carry most of the load."
            }
            TopologyLabel::ClusterMesh => {
                "**Cluster-Mesh Topology**: Clusters whose members are also meshed \
                 among themselves. **Strengths**: local redundancy inside each cluster. \
                 **Weaknesses**: higher link count and energy use."
            }
            TopologyLabel::Hybrid { .. } => {
                "**Hybrid Topology**: A mix of structures without a single dominant \
                 pattern. **Strengths**: adapts to irregular deployments. \
                 **Weaknesses**: harder to analyse and may contain isolated regions."
            }
        }
    }
}

impl DescriptionProvider for CannedDescriptions {
    fn name(&self) -> &str {
        "canned"
    }

    fn describe(
        &self,
        label: &TopologyLabel,
        stats: &DerivedStats,
    ) -> Result<String, DescriptionError> {
        let mut text = Self::text(label).to_string();
        if let TopologyLabel::Hybrid { components } = label {
            if *components > 2 {
                text.push_str(&format!(" The design has {} disconnected components.", components));
            }
        }
        if stats.malicious_nodes > 0 {
            text.push_str(&format!(
                " **Security**: {} malicious nodes are present.",
                stats.malicious_nodes
            ));
        }
        Ok(text)
    }
}

/// Whether a live-provider credential is present in the environment
pub fn credential_present() -> bool {
    env::var(CREDENTIAL_ENV_VAR).map_or(false, |v| !v.trim().is_empty())
}

/// Provider to use for this process.
///
/// Only the canned table ships with the crate; a present credential is
/// noted so callers can plug in their own provider.
pub fn default_provider() -> Box<dyn DescriptionProvider> {
    if credential_present() {
        info!(
            "{} is set but no live description provider is configured, using canned text",
            CREDENTIAL_ENV_VAR
        );
    }
    Box::new(CannedDescriptions)
}

/// Describe a design, substituting [`PLACEHOLDER`] if the provider fails
pub fn describe_topology(
    provider: &dyn DescriptionProvider,
    label: &TopologyLabel,
    stats: &DerivedStats,
) -> String {
    match provider.describe(label, stats) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Provider '{}': {}", provider.name(), DescriptionError::EmptyResponse);
            PLACEHOLDER.to_string()
        }
        Err(e) => {
            warn!("Provider '{}' failed: {}", provider.name(), e);
            PLACEHOLDER.to_string()
        }
    }
}
