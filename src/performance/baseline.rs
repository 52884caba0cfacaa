//! Metric record and the fixed baseline table.

use serde::{Deserialize, Serialize};

/// Number of metrics in a [`MetricSet`]
pub const METRIC_COUNT: usize = 9;

/// The nine named metrics reported for one routing approach.
///
/// Ratios are in `0.0..=1.0`; the remaining fields are absolute values
/// in the unit their name carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    #[serde(rename = "Packet Delivery Ratio")]
    pub packet_delivery_ratio: f64,
    #[serde(rename = "End-to-end Delay (ms)")]
    pub end_to_end_delay_ms: f64,
    #[serde(rename = "Throughput (Mbps)")]
    pub throughput_mbps: f64,
    #[serde(rename = "Energy Consumption (J)")]
    pub energy_consumption_j: f64,
    #[serde(rename = "Network Lifetime (hours)")]
    pub network_lifetime_hours: f64,
    #[serde(rename = "Network Robustness")]
    pub network_robustness: f64,
    #[serde(rename = "Route Discovery Success Rate")]
    pub route_discovery_success_rate: f64,
    #[serde(rename = "Load Balancing Index")]
    pub load_balancing_index: f64,
    #[serde(rename = "Computational Efficiency (ops/s)")]
    pub computational_efficiency: f64,
}

impl MetricSet {
    /// Starting values for AI-assisted routing
    pub const AI_BASELINE: MetricSet = MetricSet {
        packet_delivery_ratio: 0.95,
        end_to_end_delay_ms: 45.0,
        throughput_mbps: 2.4,
        energy_consumption_j: 120.0,
        network_lifetime_hours: 40.0,
        network_robustness: 0.92,
        route_discovery_success_rate: 0.94,
        load_balancing_index: 0.88,
        computational_efficiency: 1500.0,
    };

    /// Starting values for traditional routing
    pub const TRADITIONAL_BASELINE: MetricSet = MetricSet {
        packet_delivery_ratio: 0.85,
        end_to_end_delay_ms: 70.0,
        throughput_mbps: 1.8,
        energy_consumption_j: 150.0,
        network_lifetime_hours: 32.0,
        network_robustness: 0.78,
        route_discovery_success_rate: 0.82,
        load_balancing_index: 0.72,
        computational_efficiency: 1100.0,
    };

    /// Display name and value of every metric, in table order
    pub fn entries(&self) -> [(&'static str, f64); METRIC_COUNT] {
        [
            ("Packet Delivery Ratio", self.packet_delivery_ratio),
            ("End-to-end Delay (ms)", self.end_to_end_delay_ms),
            ("Throughput (Mbps)", self.throughput_mbps),
            ("Energy Consumption (J)", self.energy_consumption_j),
            ("Network Lifetime (hours)", self.network_lifetime_hours),
            ("Network Robustness", self.network_robustness),
            ("Route Discovery Success Rate", self.route_discovery_success_rate),
            ("Load Balancing Index", self.load_balancing_index),
            ("Computational Efficiency (ops/s)", self.computational_efficiency),
        ]
    }

    /// Mutable access to the four ratio metrics
    pub(crate) fn ratios_mut(&mut self) -> [&mut f64; 4] {
        [
            &mut self.packet_delivery_ratio,
            &mut self.network_robustness,
            &mut self.route_discovery_success_rate,
            &mut self.load_balancing_index,
        ]
    }

    pub(crate) fn ratios(&self) -> [f64; 4] {
        [
            self.packet_delivery_ratio,
            self.network_robustness,
            self.route_discovery_success_rate,
            self.load_balancing_index,
        ]
    }
}

/// Metrics for both routing approaches over the same design
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceComparison {
    #[serde(rename = "AI-Based")]
    pub ai_based: MetricSet,
    #[serde(rename = "Traditional")]
    pub traditional: MetricSet,
}

impl PerformanceComparison {
    pub fn baseline() -> Self {
        Self {
            ai_based: MetricSet::AI_BASELINE,
            traditional: MetricSet::TRADITIONAL_BASELINE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_follow_table_order() {
        let names: Vec<&str> = MetricSet::AI_BASELINE.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names[0], "Packet Delivery Ratio");
        assert_eq!(names[8], "Computational Efficiency (ops/s)");
        assert_eq!(MetricSet::TRADITIONAL_BASELINE.entries()[1].1, 70.0);
    }

    #[test]
    fn test_serializes_with_display_names() {
        let json = serde_json::to_value(PerformanceComparison::baseline()).unwrap();
        assert_eq!(json["AI-Based"]["Packet Delivery Ratio"], 0.95);
        assert_eq!(json["Traditional"]["Throughput (Mbps)"], 1.8);
        assert_eq!(json["Traditional"].as_object().unwrap().len(), METRIC_COUNT);
    }

    #[test]
    fn test_baseline_favours_ai() {
        let base = PerformanceComparison::baseline();
        for (ai, traditional) in base.ai_based.ratios().iter().zip(base.traditional.ratios()) {
            assert!(*ai > traditional);
        }
    }
}
