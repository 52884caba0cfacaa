//! Ad hoc wireless network design and analysis CLI.
//!
//! Generates topologies, classifies and analyses saved designs, finds
//! routes and produces the AI versus traditional performance comparison.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Context, Result};
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use adhocsim::config::Config;
use adhocsim::config_loader::{self, CliOverrides};
use adhocsim::describe::{default_provider, describe_topology};
use adhocsim::graph::{load_graph, save_graph, DerivedStats, Graph};
use adhocsim::maintenance::reconstruct;
use adhocsim::pathfinding::{farthest_node_pair, secure_path, shortest_path};
use adhocsim::performance::evaluate;
use adhocsim::report;
use adhocsim::topology::{classify, generate, Topology};

/// Ad hoc wireless network design and analysis
#[derive(Parser, Debug)]
#[command(name = "adhocsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a network and save it as JSON
    Generate {
        /// Output JSON file
        #[arg(short, long, default_value = "network.json")]
        output: PathBuf,

        /// Number of nodes to place
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Topology template
        #[arg(short, long)]
        topology: Option<Topology>,

        /// Replace some end devices with routers
        #[arg(long)]
        routers: bool,

        /// Replace some end devices with switches
        #[arg(long)]
        switches: bool,

        /// Attach a base station to ring and bus layouts
        #[arg(long)]
        base_station: bool,

        /// Cluster heads for cluster layouts
        #[arg(long)]
        cluster_heads: Option<usize>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print statistics, components and the topology label of a design
    Analyze {
        /// Graph JSON file
        graph: PathBuf,

        /// Designated cluster head id (repeatable)
        #[arg(long = "cluster-head")]
        cluster_heads: Vec<String>,

        /// Weak-node efficiency threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write a text report to this path
        #[arg(long)]
        text: Option<PathBuf>,
    },

    /// Find a route between two nodes
    Path {
        /// Graph JSON file
        graph: PathBuf,

        from: String,

        to: String,

        /// Avoid every malicious node
        #[arg(long)]
        secure: bool,

        /// Node id to avoid (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Find the two nodes furthest apart on the canvas
    Farthest {
        /// Graph JSON file
        graph: PathBuf,

        /// Node id to leave out (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Compare AI-based and traditional routing
    Evaluate {
        /// Graph JSON file
        graph: PathBuf,

        /// Malicious node id (repeatable); defaults to the flagged nodes
        #[arg(long)]
        malicious: Vec<String>,

        /// Designated cluster head id (repeatable)
        #[arg(long = "cluster-head")]
        cluster_heads: Vec<String>,
    },

    /// Remove weak end devices and repair connectivity
    Reconstruct {
        /// Graph JSON file
        graph: PathBuf,

        /// Output JSON file; defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Weak-node efficiency threshold
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Print the description text for a design's topology
    Describe {
        /// Graph JSON file
        graph: PathBuf,

        /// Designated cluster head id (repeatable)
        #[arg(long = "cluster-head")]
        cluster_heads: Vec<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = config_loader::load_or_default(cli.config.as_deref())?;
    config_loader::apply_overrides(&mut config, &overrides_for(&cli))?;

    let level = config.general.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    run(cli.command, &config)
}

/// Collect the flags that override configuration values
fn overrides_for(cli: &Cli) -> CliOverrides {
    let mut overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        ..Default::default()
    };

    match &cli.command {
        Commands::Generate {
            count,
            topology,
            routers,
            switches,
            base_station,
            cluster_heads,
            seed,
            ..
        } => {
            overrides.count = *count;
            overrides.topology = *topology;
            overrides.include_routers = *routers;
            overrides.include_switches = *switches;
            overrides.include_base_station = *base_station;
            overrides.cluster_heads = *cluster_heads;
            overrides.seed = *seed;
        }
        Commands::Analyze { threshold, .. } | Commands::Reconstruct { threshold, .. } => {
            overrides.weak_threshold = *threshold;
        }
        _ => {}
    }

    overrides
}

fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate { output, .. } => run_generate(config, &output),
        Commands::Analyze {
            graph,
            cluster_heads,
            json,
            text,
            ..
        } => run_analyze(config, &graph, &cluster_heads, json.as_deref(), text.as_deref()),
        Commands::Path {
            graph,
            from,
            to,
            secure,
            exclude,
        } => run_path(&graph, &from, &to, secure, &exclude),
        Commands::Farthest { graph, exclude } => {
            let graph = read_graph(&graph)?;
            let exclude: Vec<&str> = exclude.iter().map(String::as_str).collect();
            match farthest_node_pair(&graph.nodes, &exclude) {
                Some((a, b)) => println!("{} {}", a, b),
                None => println!("Fewer than two eligible nodes"),
            }
            Ok(())
        }
        Commands::Evaluate {
            graph,
            malicious,
            cluster_heads,
        } => {
            let graph = read_graph(&graph)?;
            let malicious = if malicious.is_empty() { graph.malicious_ids() } else { malicious };
            let label = classify(&graph, &cluster_heads);
            let comparison = evaluate(&label, &graph, &malicious);

            println!("Topology: {}", label);
            let json = serde_json::to_string_pretty(&comparison)
                .context("Failed to serialize comparison")?;
            println!("{}", json);
            Ok(())
        }
        Commands::Reconstruct { graph: path, output, .. } => {
            let graph = read_graph(&path)?;
            let result = reconstruct(&graph, config.analysis.weak_threshold);
            let output = output.unwrap_or(path);
            save_graph(&result.graph, &output)
                .wrap_err_with(|| format!("Failed to save graph to {}", output.display()))?;

            println!(
                "Removed {} weak nodes, added {} links, saved to {}",
                result.removed_nodes.len(),
                result.added_connections.len(),
                output.display()
            );
            Ok(())
        }
        Commands::Describe { graph, cluster_heads } => {
            let graph = read_graph(&graph)?;
            let label = classify(&graph, &cluster_heads);
            let stats =
                DerivedStats::compute_with_threshold(&graph, config.analysis.weak_threshold);
            println!("{}", describe_topology(default_provider().as_ref(), &label, &stats));
            Ok(())
        }
    }
}

fn read_graph(path: &Path) -> Result<Graph> {
    load_graph(path).wrap_err_with(|| format!("Failed to load graph from {}", path.display()))
}

fn run_generate(config: &Config, output: &Path) -> Result<()> {
    let request = config.generation.to_request();
    let mut rng = match config.generation.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let network = generate(&request, &config.canvas, &mut rng)?;
    save_graph(&network.graph, output)
        .wrap_err_with(|| format!("Failed to save graph to {}", output.display()))?;

    let label = classify(&network.graph, &network.cluster_heads);
    println!(
        "Generated {} nodes and {} connections ({}) to {}",
        network.graph.nodes.len(),
        network.graph.connections.len(),
        label,
        output.display()
    );
    if !network.cluster_heads.is_empty() {
        println!("Cluster heads: {}", network.cluster_heads.join(" "));
    }
    Ok(())
}

fn run_analyze(
    config: &Config,
    path: &Path,
    cluster_heads: &[String],
    json: Option<&Path>,
    text: Option<&Path>,
) -> Result<()> {
    let graph = read_graph(path)?;
    let provider = default_provider();
    let analysis = report::build_report(
        &graph,
        &path.display().to_string(),
        cluster_heads,
        config.analysis.weak_threshold,
        provider.as_ref(),
    );

    report::print_summary(&analysis);
    if analysis.components.len() > 1 {
        for (i, component) in analysis.components.iter().enumerate() {
            println!("Component {}: {}", i + 1, component.join(" "));
        }
    }

    if let Some(json) = json {
        report::generate_json_report(&analysis, json)?;
    }
    if let Some(text) = text {
        report::generate_text_report(&analysis, text)?;
    }
    Ok(())
}

fn run_path(path: &Path, from: &str, to: &str, secure: bool, exclude: &[String]) -> Result<()> {
    let graph = read_graph(path)?;

    for id in [from, to] {
        if !graph.contains_node(id) {
            return Err(eyre!("Unknown node '{}' in {}", id, path.display()));
        }
    }

    let route = if secure && exclude.is_empty() {
        secure_path(&graph, from, to)
    } else {
        let malicious = if secure { graph.malicious_ids() } else { Vec::new() };
        let excluded: Vec<&str> = exclude.iter().chain(&malicious).map(String::as_str).collect();
        shortest_path(&graph, from, to, &excluded)
    };

    match route {
        Some(route) => println!("{} ({} hops)", route.join(" -> "), route.len() - 1),
        None => println!("No path from {} to {}", from, to),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from([
            "adhocsim",
            "generate",
            "-n",
            "40",
            "--topology",
            "cluster-mesh",
            "--routers",
            "--seed",
            "7",
        ])
        .unwrap();

        let overrides = overrides_for(&cli);
        assert_eq!(overrides.count, Some(40));
        assert_eq!(overrides.topology, Some(Topology::ClusterMesh));
        assert!(overrides.include_routers);
        assert!(!overrides.include_switches);
        assert_eq!(overrides.seed, Some(7));
    }

    #[test]
    fn test_path_args() {
        let cli = Cli::try_parse_from([
            "adhocsim",
            "path",
            "net.json",
            "node-1",
            "node-5",
            "--exclude",
            "node-3",
            "--exclude",
            "node-4",
        ])
        .unwrap();

        match cli.command {
            Commands::Path { from, to, exclude, secure, .. } => {
                assert_eq!(from, "node-1");
                assert_eq!(to, "node-5");
                assert_eq!(exclude, vec!["node-3", "node-4"]);
                assert!(!secure);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "adhocsim",
            "analyze",
            "net.json",
            "--log-level",
            "debug",
            "--threshold",
            "70",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(overrides_for(&cli).weak_threshold, Some(70.0));
    }

    #[test]
    fn test_unknown_topology_is_rejected() {
        assert!(Cli::try_parse_from(["adhocsim", "generate", "--topology", "hexagon"]).is_err());
    }
}
