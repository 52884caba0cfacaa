use serde::{Deserialize, Serialize};

use crate::graph::WEAK_NODE_THRESHOLD;
use crate::topology::{Canvas, GenerationRequest, Topology, MAX_NODES};

/// Top-level configuration; every section is optional in the YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub canvas: Canvas,
    pub generation: GenerationConfig,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.general.log_level {
            if level.parse::<log::LevelFilter>().is_err() {
                return Err(ValidationError::InvalidGeneral(format!(
                    "Unknown log level '{}'",
                    level
                )));
            }
        }

        let canvas = &self.canvas;
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(ValidationError::InvalidCanvas(format!(
                "Canvas size must be positive, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        if canvas.margin < 0.0 || 2.0 * canvas.margin >= canvas.width.min(canvas.height) {
            return Err(ValidationError::InvalidCanvas(format!(
                "Margin {} leaves no usable area on a {}x{} canvas",
                canvas.margin, canvas.width, canvas.height
            )));
        }

        if self.generation.count > MAX_NODES {
            return Err(ValidationError::InvalidGeneration(format!(
                "count {} exceeds the maximum of {}",
                self.generation.count, MAX_NODES
            )));
        }

        let threshold = self.analysis.weak_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ValidationError::InvalidAnalysis(format!(
                "weak_threshold must be between 0 and 100, got {}",
                threshold
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Defaults for the `generate` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub count: usize,
    pub topology: Topology,
    pub include_routers: bool,
    pub include_switches: bool,
    pub include_base_station: bool,
    pub cluster_heads: usize,
    /// Fixed seed for reproducible output; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GenerationConfig {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            count: self.count,
            topology: self.topology,
            include_routers: self.include_routers,
            include_switches: self.include_switches,
            include_base_station: self.include_base_station,
            cluster_heads: self.cluster_heads,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// End devices below this efficiency count as weak
    pub weak_threshold: f64,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid canvas configuration: {0}")]
    InvalidCanvas(String),
    #[error("Invalid generation configuration: {0}")]
    InvalidGeneration(String),
    #[error("Invalid analysis configuration: {0}")]
    InvalidAnalysis(String),
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let request = GenerationRequest::new(20, Topology::Mesh);
        Self {
            count: request.count,
            topology: request.topology,
            include_routers: request.include_routers,
            include_switches: request.include_switches,
            include_base_station: request.include_base_station,
            cluster_heads: request.cluster_heads,
            seed: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            weak_threshold: WEAK_NODE_THRESHOLD,
        }
    }
}
