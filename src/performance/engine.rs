//! Heuristic performance comparison.
//!
//! There is no simulation here. The baseline table is perturbed by closed
//! form multipliers derived from the topology label and a few graph
//! aggregates. The result is a pure function of its inputs, so repeated
//! calls with the same graph produce bit-identical output.

use std::collections::HashSet;

use log::debug;

use super::baseline::{MetricSet, PerformanceComparison};
use crate::graph::{DerivedStats, Graph, Node};
use crate::topology::TopologyLabel;

/// Bounds for every AI ratio
pub const AI_RATIO_RANGE: (f64, f64) = (0.40, 0.99);

/// Minimum lead of each AI ratio over its traditional counterpart
pub const RATIO_GAP: f64 = 0.05;

/// Lowest value a traditional ratio is allowed to reach
pub const TRADITIONAL_RATIO_FLOOR: f64 = 0.05;

const ROUTER_BOOST: f64 = 0.02;
const BASE_STATION_BOOST: f64 = 0.05;
const ENERGY_SCALE: f64 = 500.0;
const TRADITIONAL_ENERGY_PENALTY: f64 = 1.15;
const TRADITIONAL_LIFETIME_SHARE: f64 = 0.85;
const DELAY_DEVICE_SCALE: f64 = 150.0;
const TRADITIONAL_DELAY_PENALTY: f64 = 1.10;
const MALICIOUS_SEVERITY: f64 = 5.0;
/// Extra traditional delay per malicious node, added after rounding
const MALICIOUS_DELAY_MS: f64 = 1.0;
const AI_ROBUSTNESS_BONUS: f64 = 1.03;

/// Target packet delivery range for a topology label.
///
/// The first matching substring of the lowercase label wins.
pub fn pdr_range(label: &TopologyLabel) -> (f64, f64) {
    let name = label.to_string().to_lowercase();
    if name.contains("mesh") && name.contains("cluster") {
        (0.93, 0.98)
    } else if name.contains("mesh") {
        (0.90, 0.97)
    } else if name.contains("star") {
        (0.85, 0.93)
    } else if name.contains("grid") {
        (0.88, 0.95)
    } else if name.contains("ring") {
        (0.80, 0.90)
    } else if name.contains("bus") {
        (0.75, 0.85)
    } else {
        (0.82, 0.92)
    }
}

/// Compare AI-assisted and traditional routing on `graph`.
///
/// `malicious_ids` lists the nodes treated as hostile. Only end devices
/// can be malicious, so ids naming infrastructure or no node at all are
/// ignored, as are repeats.
pub fn evaluate(
    label: &TopologyLabel,
    graph: &Graph,
    malicious_ids: &[String],
) -> PerformanceComparison {
    let stats = DerivedStats::compute(graph);
    let PerformanceComparison {
        ai_based: mut ai,
        mut traditional,
    } = PerformanceComparison::baseline();

    let average_efficiency = stats.average_efficiency / 100.0;
    let total_spent: f64 = graph.nodes.iter().map(|n| n.energy_spent).sum();

    // Delivery target for the label
    let (lo, hi) = pdr_range(label);
    let pdr_ratio = traditional.packet_delivery_ratio / ai.packet_delivery_ratio;
    ai.packet_delivery_ratio = lo + (hi - lo) * (average_efficiency - 0.8) / 0.2;
    traditional.packet_delivery_ratio = ai.packet_delivery_ratio * pdr_ratio;

    // Infrastructure
    let boost = 1.0
        + ROUTER_BOOST * stats.routers as f64
        + BASE_STATION_BOOST * stats.base_stations as f64;
    for metrics in [&mut ai, &mut traditional] {
        metrics.packet_delivery_ratio *= boost;
        metrics.network_robustness *= boost;
        metrics.throughput_mbps *= boost;
        metrics.load_balancing_index *= boost;
        metrics.end_to_end_delay_ms /= boost.sqrt();
    }

    // Energy and lifetime
    let consumption = total_spent / ENERGY_SCALE;
    ai.energy_consumption_j *= consumption;
    traditional.energy_consumption_j = ai.energy_consumption_j * TRADITIONAL_ENERGY_PENALTY;

    let lifetime = average_efficiency.powi(3) / (consumption.max(0.01) * 0.4);
    ai.network_lifetime_hours *= lifetime;
    traditional.network_lifetime_hours = ai.network_lifetime_hours * TRADITIONAL_LIFETIME_SHARE;

    // Size and density
    let delay_factor = 1.0 + stats.end_devices as f64 / DELAY_DEVICE_SCALE;
    ai.end_to_end_delay_ms *= delay_factor;
    traditional.end_to_end_delay_ms *= delay_factor * TRADITIONAL_DELAY_PENALTY;

    let density = if stats.node_count > 0 {
        stats.connection_count as f64 / stats.node_count as f64
    } else {
        0.0
    };
    let throughput_factor = 1.0 + density / 5.0;
    ai.throughput_mbps *= throughput_factor;
    traditional.throughput_mbps *= throughput_factor;

    normalize_ratios(&mut ai, &mut traditional);

    // Malicious nodes only hurt the traditional approach
    let hostile = malicious_count(graph, malicious_ids);
    if hostile > 0 && stats.node_count > 0 {
        let fraction = hostile as f64 / stats.node_count as f64;
        let severity = 1.0 + fraction * MALICIOUS_SEVERITY;
        debug!("{} malicious nodes, severity {:.3}", hostile, severity);

        traditional.packet_delivery_ratio /= severity;
        traditional.throughput_mbps /= severity;
        traditional.network_robustness /= severity;
        traditional.route_discovery_success_rate /= severity;
        traditional.network_lifetime_hours /= severity;
        traditional.end_to_end_delay_ms *= severity;
        ai.network_robustness *= AI_ROBUSTNESS_BONUS;
    }

    normalize_ratios(&mut ai, &mut traditional);
    for metrics in [&mut ai, &mut traditional] {
        round_absolutes(metrics);
    }

    // Keeps every extra hostile node visible in the rounded delay
    traditional.end_to_end_delay_ms += MALICIOUS_DELAY_MS * hostile as f64;

    debug!(
        "Evaluated {}: PDR {:.3} vs {:.3}",
        label, ai.packet_delivery_ratio, traditional.packet_delivery_ratio
    );

    PerformanceComparison { ai_based: ai, traditional }
}

/// Distinct ids from `malicious_ids` that name an end device in `graph`
fn malicious_count(graph: &Graph, malicious_ids: &[String]) -> usize {
    malicious_ids
        .iter()
        .map(String::as_str)
        .filter(|id| graph.node(id).is_some_and(Node::is_end_device))
        .collect::<HashSet<_>>()
        .len()
}

/// Clamp AI ratios and keep each traditional ratio at least
/// [`RATIO_GAP`] below its AI counterpart
fn normalize_ratios(ai: &mut MetricSet, traditional: &mut MetricSet) {
    let (lo, hi) = AI_RATIO_RANGE;
    for value in ai.ratios_mut() {
        *value = value.clamp(lo, hi);
    }
    for (value, ai_value) in traditional.ratios_mut().into_iter().zip(ai.ratios()) {
        *value = value.min(ai_value - RATIO_GAP).max(TRADITIONAL_RATIO_FLOOR);
    }
}

fn round_absolutes(metrics: &mut MetricSet) {
    metrics.end_to_end_delay_ms = metrics.end_to_end_delay_ms.round();
    metrics.energy_consumption_j = metrics.energy_consumption_j.round();
    metrics.network_lifetime_hours = metrics.network_lifetime_hours.round();
    metrics.computational_efficiency = metrics.computational_efficiency.round();
    metrics.throughput_mbps = (metrics.throughput_mbps * 100.0).round() / 100.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, Node, NodeKind, Position};

    /// `n` end devices in a line with the given efficiency and spend
    fn line(n: usize, efficiency: f64, spent: f64) -> Graph {
        let nodes = (0..n)
            .map(|i| {
                let position = Position::new(i as f64 * 10.0, 0.0);
                Node::new(format!("n{}", i), NodeKind::end_device(efficiency), position)
                    .with_energy_spent(spent)
            })
            .collect();
        let connections = (1..n)
            .map(|i| Connection::new(format!("c{}", i), format!("n{}", i - 1), format!("n{}", i)))
            .collect();
        Graph::new(nodes, connections)
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pdr_range_by_label() {
        assert_eq!(pdr_range(&TopologyLabel::ClusterMesh), (0.93, 0.98));
        assert_eq!(pdr_range(&TopologyLabel::Mesh), (0.90, 0.97));
        assert_eq!(pdr_range(&TopologyLabel::Cluster), (0.82, 0.92));
        assert_eq!(pdr_range(&TopologyLabel::Bus), (0.75, 0.85));
        assert_eq!(pdr_range(&TopologyLabel::Hybrid { components: 4 }), (0.82, 0.92));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let graph = line(20, 90.0, 10.0);
        let malicious = ids(&["n3"]);
        assert_eq!(
            evaluate(&TopologyLabel::Bus, &graph, &malicious),
            evaluate(&TopologyLabel::Bus, &graph, &malicious)
        );
    }

    #[test]
    fn test_ai_pdr_follows_label_range() {
        // Efficiency 90% sits halfway into the range
        let graph = line(10, 90.0, 10.0);
        let result = evaluate(&TopologyLabel::Bus, &graph, &[]);
        assert!((result.ai_based.packet_delivery_ratio - 0.80).abs() < 1e-9);
        let lead = result.ai_based.packet_delivery_ratio - result.traditional.packet_delivery_ratio;
        assert!(lead >= RATIO_GAP - 1e-9);
    }

    #[test]
    fn test_ratios_stay_in_range() {
        // Very low efficiency pushes the AI ratio below its floor
        let graph = line(10, 10.0, 10.0);
        let result = evaluate(&TopologyLabel::Ring, &graph, &ids(&["n0", "n1", "n2", "n3", "n4"]));
        let (lo, hi) = AI_RATIO_RANGE;
        for (ai, traditional) in result.ai_based.ratios().iter().zip(result.traditional.ratios()) {
            assert!(*ai >= lo && *ai <= hi);
            assert!(traditional >= TRADITIONAL_RATIO_FLOOR);
            assert!(*ai - traditional >= RATIO_GAP - 1e-9);
        }
    }

    #[test]
    fn test_malicious_nodes_degrade_traditional() {
        let graph = line(20, 95.0, 10.0);
        let clean = evaluate(&TopologyLabel::Mesh, &graph, &[]);
        let one = evaluate(&TopologyLabel::Mesh, &graph, &ids(&["n1"]));
        let three = evaluate(&TopologyLabel::Mesh, &graph, &ids(&["n1", "n2", "n3"]));

        assert!(one.traditional.packet_delivery_ratio < clean.traditional.packet_delivery_ratio);
        assert!(three.traditional.packet_delivery_ratio < one.traditional.packet_delivery_ratio);
        assert!(three.traditional.end_to_end_delay_ms > one.traditional.end_to_end_delay_ms);
        assert!(one.traditional.end_to_end_delay_ms > clean.traditional.end_to_end_delay_ms);

        assert_eq!(one.ai_based.packet_delivery_ratio, clean.ai_based.packet_delivery_ratio);
        assert!(one.ai_based.network_robustness >= clean.ai_based.network_robustness);
    }

    #[test]
    fn test_each_malicious_node_adds_delay() {
        // 400 routers shrink the delay until severity alone moves it by
        // less than a millisecond per node
        let mut graph = line(50, 90.0, 10.0);
        for i in 0..400 {
            let position = Position::new(i as f64 * 2.0, 60.0);
            graph.nodes.push(Node::new(format!("r{}", i), NodeKind::router(), position));
        }
        let devices: Vec<String> = (0..50).map(|i| format!("n{}", i)).collect();

        let mut previous = evaluate(&TopologyLabel::Mesh, &graph, &[]);
        for k in 1..10 {
            let current = evaluate(&TopologyLabel::Mesh, &graph, &devices[..k]);
            assert!(
                current.traditional.end_to_end_delay_ms > previous.traditional.end_to_end_delay_ms,
                "{} malicious nodes",
                k
            );
            assert_eq!(current.ai_based.end_to_end_delay_ms, previous.ai_based.end_to_end_delay_ms);
            previous = current;
        }
    }

    #[test]
    fn test_infrastructure_ids_are_not_malicious() {
        let mut graph = line(10, 90.0, 10.0);
        graph.nodes.push(Node::new("bs", NodeKind::base_station(), Position::new(0.0, 50.0)));
        graph.nodes.push(Node::new("r", NodeKind::router(), Position::new(20.0, 50.0)));

        let clean = evaluate(&TopologyLabel::Bus, &graph, &[]);
        assert_eq!(evaluate(&TopologyLabel::Bus, &graph, &ids(&["bs", "r"])), clean);
        assert_ne!(evaluate(&TopologyLabel::Bus, &graph, &ids(&["bs", "n4"])), clean);
    }

    #[test]
    fn test_unknown_and_repeated_malicious_ids_are_ignored() {
        let graph = line(10, 90.0, 10.0);
        let once = evaluate(&TopologyLabel::Bus, &graph, &ids(&["n2"]));
        let repeated = evaluate(&TopologyLabel::Bus, &graph, &ids(&["n2", "n2", "ghost"]));
        assert_eq!(once, repeated);
        assert_eq!(
            evaluate(&TopologyLabel::Bus, &graph, &ids(&["ghost"])),
            evaluate(&TopologyLabel::Bus, &graph, &[])
        );
    }

    #[test]
    fn test_infrastructure_boosts_throughput() {
        let plain = line(10, 90.0, 10.0);
        let mut boosted = plain.clone();
        boosted.nodes.push(Node::new("bs", NodeKind::base_station(), Position::new(0.0, 50.0)));
        boosted.nodes.push(Node::new("r", NodeKind::router(), Position::new(20.0, 50.0)));

        let a = evaluate(&TopologyLabel::Bus, &plain, &[]);
        let b = evaluate(&TopologyLabel::Bus, &boosted, &[]);
        assert!(b.ai_based.throughput_mbps > a.ai_based.throughput_mbps);
        assert!(b.ai_based.packet_delivery_ratio > a.ai_based.packet_delivery_ratio);
    }

    #[test]
    fn test_energy_and_rounding() {
        // 10 nodes spending 50 each: factor 1.0
        let graph = line(10, 100.0, 50.0);
        let result = evaluate(&TopologyLabel::Bus, &graph, &[]);

        assert_eq!(result.ai_based.energy_consumption_j, 120.0);
        assert_eq!(result.traditional.energy_consumption_j, 138.0);
        // 40 * 1 / 0.4 = 100 hours, traditional 85%
        assert_eq!(result.ai_based.network_lifetime_hours, 100.0);
        assert_eq!(result.traditional.network_lifetime_hours, 85.0);
        assert_eq!(result.ai_based.computational_efficiency, 1500.0);

        for metrics in [result.ai_based, result.traditional] {
            assert_eq!(metrics.end_to_end_delay_ms.fract(), 0.0);
            let cents = metrics.throughput_mbps * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_graph_has_finite_metrics() {
        let result = evaluate(&TopologyLabel::Linear, &Graph::default(), &[]);
        for metrics in [result.ai_based, result.traditional] {
            assert!(metrics.entries().iter().all(|(_, v)| v.is_finite()));
        }
    }
}
