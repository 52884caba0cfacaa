use crate::config::Config;
use crate::topology::Topology;
use color_eyre::eyre::{Context, Result};
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .with_context(|| format!("Failed to open config file {}", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Load `config_path` if given, otherwise start from defaults
pub fn load_or_default(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

/// CLI arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub count: Option<usize>,
    pub topology: Option<Topology>,
    pub include_routers: bool,
    pub include_switches: bool,
    pub include_base_station: bool,
    pub cluster_heads: Option<usize>,
    pub seed: Option<u64>,
    pub weak_threshold: Option<f64>,
}

/// Apply CLI overrides to a configuration
///
/// Flags only ever switch device types on; a flag left off keeps the file
/// value.
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(level) = &overrides.log_level {
        config.general.log_level = Some(level.clone());
    }

    let generation = &mut config.generation;
    if let Some(count) = overrides.count {
        generation.count = count;
    }
    if let Some(topology) = overrides.topology {
        generation.topology = topology;
    }
    generation.include_routers |= overrides.include_routers;
    generation.include_switches |= overrides.include_switches;
    generation.include_base_station |= overrides.include_base_station;
    if let Some(heads) = overrides.cluster_heads {
        generation.cluster_heads = heads;
    }
    if overrides.seed.is_some() {
        generation.seed = overrides.seed;
    }

    if let Some(threshold) = overrides.weak_threshold {
        config.analysis.weak_threshold = threshold;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
