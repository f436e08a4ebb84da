//! Dataset row type.

use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, NodeId, TelemetryState};
use crate::analysis::{MatchLabel, NodeCentrality, TrustVerdict, VerificationResult};

/// Column names of the exported dataset, in order
pub const HEADER: [&str; 24] = [
    "Iteration",
    "Drone",
    "Connected To",
    "Attack Type",
    "Trust Status",
    "Degree Centrality",
    "Betweenness Centrality",
    "Closeness Centrality",
    "Eigenvector Centrality",
    "Battery Level",
    "Sensor Functionality",
    "Relative Speed",
    "Location Accuracy",
    "Communication Intensity",
    "Communication Scale",
    "Latency",
    "Data Throughput",
    "Packet Loss",
    "Swarm Coordination Rate",
    "Trust Score",
    "Speed Match",
    "Sensor Match",
    "Centrality Match",
    "Total Times Attacked",
];

/// One agent's row for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustRecord {
    #[serde(rename = "Iteration")]
    pub iteration: usize,
    #[serde(rename = "Drone")]
    pub drone: AgentId,
    /// Neighbor names joined by `;`
    #[serde(rename = "Connected To")]
    pub connected_to: String,
    /// Empty for agents not attacked this round
    #[serde(rename = "Attack Type")]
    pub attack_type: String,
    #[serde(rename = "Trust Status")]
    pub trust_status: TrustVerdict,
    #[serde(rename = "Degree Centrality")]
    pub degree_centrality: f64,
    #[serde(rename = "Betweenness Centrality")]
    pub betweenness_centrality: f64,
    #[serde(rename = "Closeness Centrality")]
    pub closeness_centrality: f64,
    #[serde(rename = "Eigenvector Centrality")]
    pub eigenvector_centrality: f64,
    #[serde(rename = "Battery Level")]
    pub battery_level: u32,
    #[serde(rename = "Sensor Functionality")]
    pub sensor_functionality: f64,
    /// The reported (predicted) speed
    #[serde(rename = "Relative Speed")]
    pub relative_speed: f64,
    #[serde(rename = "Location Accuracy")]
    pub location_accuracy: f64,
    #[serde(rename = "Communication Intensity")]
    pub communication_intensity: u32,
    #[serde(rename = "Communication Scale")]
    pub communication_scale: u32,
    #[serde(rename = "Latency")]
    pub latency: f64,
    #[serde(rename = "Data Throughput")]
    pub data_throughput: u32,
    #[serde(rename = "Packet Loss")]
    pub packet_loss: f64,
    #[serde(rename = "Swarm Coordination Rate")]
    pub swarm_coordination_rate: f64,
    #[serde(rename = "Trust Score")]
    pub trust_score: f64,
    #[serde(rename = "Speed Match")]
    pub speed_match: MatchLabel,
    #[serde(rename = "Sensor Match")]
    pub sensor_match: MatchLabel,
    #[serde(rename = "Centrality Match")]
    pub centrality_match: MatchLabel,
    #[serde(rename = "Total Times Attacked")]
    pub total_times_attacked: u32,
}

/// Inputs gathered by the round controller for one row
pub struct RecordInputs<'a> {
    pub iteration: usize,
    pub agent: &'a AgentId,
    pub neighbors: &'a [&'a NodeId],
    pub attack_label: Option<&'a str>,
    pub centrality: NodeCentrality,
    pub telemetry: &'a TelemetryState,
    pub reported_speed: f64,
    pub verification: &'a VerificationResult,
    pub times_attacked: u32,
}

impl TrustRecord {
    pub fn new(inputs: RecordInputs<'_>) -> Self {
        let RecordInputs {
            iteration,
            agent,
            neighbors,
            attack_label,
            centrality,
            telemetry,
            reported_speed,
            verification,
            times_attacked,
        } = inputs;

        Self {
            iteration,
            drone: agent.clone(),
            connected_to: join_neighbors(neighbors),
            attack_type: attack_label.unwrap_or_default().to_string(),
            trust_status: verification.verdict,
            degree_centrality: centrality.degree,
            betweenness_centrality: centrality.betweenness,
            closeness_centrality: centrality.closeness,
            eigenvector_centrality: centrality.eigenvector,
            battery_level: telemetry.battery,
            sensor_functionality: telemetry.sensor,
            relative_speed: reported_speed,
            location_accuracy: telemetry.location_accuracy,
            communication_intensity: telemetry.comm_intensity,
            communication_scale: telemetry.comm_scale,
            latency: telemetry.latency,
            data_throughput: telemetry.throughput,
            packet_loss: telemetry.packet_loss,
            swarm_coordination_rate: telemetry.coordination_rate,
            trust_score: telemetry.trust_score,
            speed_match: verification.speed_match,
            sensor_match: verification.sensor_match,
            centrality_match: verification.centrality_match,
            total_times_attacked: times_attacked,
        }
    }

    /// Neighbor names as listed in the `Connected To` column
    pub fn neighbors(&self) -> Vec<&str> {
        if self.connected_to.is_empty() {
            Vec::new()
        } else {
            self.connected_to.split(';').collect()
        }
    }
}

fn join_neighbors(neighbors: &[&NodeId]) -> String {
    neighbors
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(";")
}
