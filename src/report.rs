//! Report generation for network design analysis.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::describe::{describe_topology, DescriptionProvider};
use crate::graph::{find_connected_components, DerivedStats, Graph};
use crate::performance::{evaluate, PerformanceComparison};
use crate::topology::{classify, TopologyLabel};
use crate::utils::validation::validate_graph;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub analysis_timestamp: String,
    /// File or generator the graph came from
    pub source: String,
    pub weak_threshold: f64,
}

/// Everything the `analyze` command reports about one design
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub stats: DerivedStats,
    pub topology: TopologyLabel,
    /// Node ids per connected component
    pub components: Vec<Vec<String>>,
    pub weak_nodes: Vec<String>,
    pub malicious_nodes: Vec<String>,
    pub warnings: Vec<String>,
    pub performance: PerformanceComparison,
    pub description: String,
}

/// Run every analysis over `graph` and collect the results
pub fn build_report(
    graph: &Graph,
    source: &str,
    cluster_heads: &[String],
    weak_threshold: f64,
    provider: &dyn DescriptionProvider,
) -> AnalysisReport {
    let stats = DerivedStats::compute_with_threshold(graph, weak_threshold);
    let topology = classify(graph, cluster_heads);
    let malicious_nodes = graph.malicious_ids();

    let components = find_connected_components(&graph.nodes, &graph.connections)
        .iter()
        .map(|c| c.iter().map(|n| n.id.clone()).collect())
        .collect();
    let weak_nodes = graph
        .nodes
        .iter()
        .filter(|n| n.is_weak(weak_threshold))
        .map(|n| n.id.clone())
        .collect();

    let performance = evaluate(&topology, graph, &malicious_nodes);
    let description = describe_topology(provider, &topology, &stats);

    AnalysisReport {
        metadata: ReportMetadata {
            analysis_timestamp: chrono::Utc::now().to_rfc3339(),
            source: source.to_string(),
            weak_threshold,
        },
        stats,
        topology,
        components,
        weak_nodes,
        malicious_nodes,
        warnings: validate_graph(graph),
        performance,
        description,
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Generate human-readable text report
pub fn generate_text_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    fs::write(output_path, render_text_report(report))
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(80));
    lines.push(format!("{:^80}", title));
    lines.push("=".repeat(80));
    lines.push(String::new());
}

pub fn render_text_report(report: &AnalysisReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    let stats = &report.stats;

    section(&mut lines, "AD HOC NETWORK DESIGN ANALYSIS");

    lines.push(format!("Analysis Date: {}", report.metadata.analysis_timestamp));
    lines.push(format!("Source: {}", report.metadata.source));
    lines.push(format!("Topology: {}", report.topology));
    lines.push(String::new());

    section(&mut lines, "NETWORK STATISTICS");
    lines.push(format!("Nodes: {}", stats.node_count));
    lines.push(format!(
        "  End devices: {}  Routers: {}  Switches: {}  Base stations: {}",
        stats.end_devices, stats.routers, stats.switches, stats.base_stations
    ));
    lines.push(format!("Connections: {}", stats.connection_count));
    lines.push(format!("Average degree: {:.2}", stats.average_degree));
    lines.push(format!("Isolated nodes: {}", stats.isolated_nodes));
    lines.push(format!("Connected components: {}", stats.components));
    lines.push(format!("Average efficiency: {:.1}%", stats.average_efficiency));
    lines.push(format!(
        "Weak nodes (< {}%): {}",
        report.metadata.weak_threshold, stats.weak_nodes
    ));
    lines.push(format!("Malicious nodes: {}", stats.malicious_nodes));
    lines.push(String::new());

    if report.components.len() > 1 {
        lines.push("Components:".to_string());
        for (i, component) in report.components.iter().enumerate() {
            lines.push(format!("  {}. {} nodes", i + 1, component.len()));
        }
        lines.push(String::new());
    }

    section(&mut lines, "PERFORMANCE COMPARISON");
    lines.push(format!("{:<36} {:>14} {:>14}", "Metric", "AI-Based", "Traditional"));
    lines.push("-".repeat(66));
    for ((name, ai), (_, traditional)) in report
        .performance
        .ai_based
        .entries()
        .iter()
        .zip(report.performance.traditional.entries())
    {
        lines.push(format!(
            "{:<36} {:>14} {:>14}",
            name,
            format_metric(*ai),
            format_metric(traditional)
        ));
    }
    lines.push(String::new());

    section(&mut lines, "DESCRIPTION");
    lines.push(report.description.clone());
    lines.push(String::new());

    if !report.warnings.is_empty() {
        section(&mut lines, "WARNINGS");
        for warning in &report.warnings {
            lines.push(format!("  - {}", warning));
        }
        lines.push(String::new());
    }

    // Footer
    lines.push("=".repeat(80));

    lines.join("\n")
}

fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.3}", value)
    }
}

/// Print a summary to stdout
pub fn print_summary(report: &AnalysisReport) {
    let stats = &report.stats;
    println!("\n=== NETWORK ANALYSIS SUMMARY ===\n");
    println!("Topology: {}", report.topology);
    println!("Nodes: {} ({} isolated)", stats.node_count, stats.isolated_nodes);
    println!("Connections: {}", stats.connection_count);
    println!("Components: {}", stats.components);
    println!("Average efficiency: {:.1}%", stats.average_efficiency);

    if !report.weak_nodes.is_empty() {
        println!("Weak nodes: {}", report.weak_nodes.join(", "));
    }
    if !report.malicious_nodes.is_empty() {
        println!("Malicious nodes: {}", report.malicious_nodes.join(", "));
    }

    println!(
        "\nPacket delivery: AI {:.3} vs traditional {:.3}",
        report.performance.ai_based.packet_delivery_ratio,
        report.performance.traditional.packet_delivery_ratio
    );
    println!();
}
