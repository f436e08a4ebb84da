use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::agent::is_decoy_name;

/// Attack family a run commits to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    /// No attack; every agent is verified against simulator kinematics
    Baseline,
    /// One victim reports falsified speed, sensor and centrality readings
    #[default]
    StateFalsification,
    /// One or two victims are impersonated by attached sybil nodes
    IdentityForgery,
    /// One victim's traffic is routed through a decoy relay
    RelayInterception,
    /// The two agents with the highest betweenness are attacked
    StructuralTargeting,
}

impl AttackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackKind::Baseline => "baseline",
            AttackKind::StateFalsification => "state_falsification",
            AttackKind::IdentityForgery => "identity_forgery",
            AttackKind::RelayInterception => "relay_interception",
            AttackKind::StructuralTargeting => "structural_targeting",
        }
    }
}

/// When the communication graph is rebuilt
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopologyRefresh {
    /// Rebuilt from scratch over the active set every round
    #[default]
    EveryRound,
    /// Built once per epoch; victims and decoys are pruned between rounds
    PerEpoch,
}

/// Source of the predicted centrality reading
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CentralityBaseline {
    /// Degree centrality of the current round's graph
    #[default]
    CurrentRound,
    /// Degree centrality the agent had in the previous round of the epoch
    PreviousRound,
}

/// Complete simulation configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub swarm: SwarmConfig,
    #[serde(default)]
    pub topology: TopologyConfig,
    #[serde(default)]
    pub attack: AttackConfig,
    #[serde(default)]
    pub trust: TrustConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // General settings
        if self.general.rounds == 0 {
            return Err(ValidationError::InvalidGeneral(
                "rounds must be at least 1".to_string(),
            ));
        }
        if self.general.epoch_length == 0 {
            return Err(ValidationError::InvalidGeneral(
                "epoch_length must be at least 1".to_string(),
            ));
        }

        self.validate_swarm()?;
        self.validate_topology()?;

        // Trust settings
        if !(self.trust.threshold >= 0.0) {
            return Err(ValidationError::InvalidTrust(format!(
                "threshold must be non-negative, got {}",
                self.trust.threshold
            )));
        }
        if self.trust.eigenvector_max_iter < MIN_EIGENVECTOR_ITERATIONS {
            return Err(ValidationError::InvalidTrust(format!(
                "eigenvector_max_iter must be at least {}, got {}",
                MIN_EIGENVECTOR_ITERATIONS, self.trust.eigenvector_max_iter
            )));
        }

        if self.output.csv_name.trim().is_empty() {
            return Err(ValidationError::InvalidOutput(
                "csv_name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_swarm(&self) -> Result<(), ValidationError> {
        match &self.swarm {
            SwarmConfig::Explicit { clusters } => {
                if clusters.is_empty() {
                    return Err(ValidationError::InvalidSwarm(
                        "at least one cluster is required".to_string(),
                    ));
                }

                let mut cluster_names = HashSet::new();
                let mut agent_ids = HashSet::new();
                for cluster in clusters {
                    if cluster.name.trim().is_empty() {
                        return Err(ValidationError::InvalidSwarm(
                            "cluster name cannot be empty".to_string(),
                        ));
                    }
                    if !cluster_names.insert(cluster.name.as_str()) {
                        return Err(ValidationError::InvalidSwarm(format!(
                            "duplicate cluster name '{}'",
                            cluster.name
                        )));
                    }
                    for agent in &cluster.agents {
                        if agent.id.trim().is_empty() {
                            return Err(ValidationError::InvalidSwarm(format!(
                                "agent id cannot be empty (cluster '{}')",
                                cluster.name
                            )));
                        }
                        if is_decoy_name(&agent.id) {
                            return Err(ValidationError::InvalidSwarm(format!(
                                "agent id '{}' collides with the decoy naming pattern",
                                agent.id
                            )));
                        }
                        if !agent_ids.insert(agent.id.as_str()) {
                            return Err(ValidationError::InvalidSwarm(format!(
                                "duplicate agent id '{}'",
                                agent.id
                            )));
                        }
                    }
                }

                if agent_ids.is_empty() {
                    return Err(ValidationError::InvalidSwarm(
                        "at least one agent is required".to_string(),
                    ));
                }
            }
            SwarmConfig::Generated { clusters, agents_per_cluster } => {
                if *clusters == 0 || *agents_per_cluster == 0 {
                    return Err(ValidationError::InvalidSwarm(
                        "clusters and agents_per_cluster must both be at least 1".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn validate_topology(&self) -> Result<(), ValidationError> {
        let topology = &self.topology;
        for (name, p) in [
            ("intra_cluster_probability", topology.intra_cluster_probability),
            ("inter_cluster_probability", topology.inter_cluster_probability),
            ("uniform_probability", topology.uniform_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ValidationError::InvalidTopology(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }

        for (name, range) in [
            ("link_weight", &topology.link_weight),
            ("decoy_weight", &topology.decoy_weight),
        ] {
            if range.min == 0 || range.min > range.max {
                return Err(ValidationError::InvalidTopology(format!(
                    "{} range must satisfy 0 < min <= max, got [{}, {}]",
                    name, range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

/// Lower bound on eigenvector power iterations
pub const MIN_EIGENVECTOR_ITERATIONS: usize = 1000;

/// Run-level settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    /// Number of rounds in the run
    pub rounds: usize,
    /// Rounds per reset epoch
    pub epoch_length: usize,
    /// RNG seed; drawn at random and logged when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Clear cumulative attack counters at every epoch reset
    pub reset_attack_counts: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            rounds: 15,
            epoch_length: 5,
            seed: None,
            log_level: Some("info".to_string()),
            reset_attack_counts: false,
        }
    }
}

/// Swarm roster definition
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum SwarmConfig {
    /// Named clusters listing their agents
    Explicit { clusters: Vec<ClusterConfig> },
    /// `clusters` clusters of `agents_per_cluster` agents named `Drone1..DroneN`
    Generated { clusters: usize, agents_per_cluster: usize },
}

impl Default for SwarmConfig {
    /// Nine drones in three clusters of three
    fn default() -> Self {
        let layout: [(&str, [(&str, [f64; 3]); 3]); 3] = [
            ("Cluster1", [("Drone1", [10.0, 10.0, -5.0]), ("Drone2", [20.0, 10.0, -5.0]), ("Drone3", [15.0, 20.0, -5.0])]),
            ("Cluster2", [("Drone4", [50.0, 50.0, -5.0]), ("Drone5", [60.0, 50.0, -5.0]), ("Drone6", [55.0, 60.0, -5.0])]),
            ("Cluster3", [("Drone7", [90.0, 10.0, -5.0]), ("Drone8", [100.0, 10.0, -5.0]), ("Drone9", [95.0, 20.0, -5.0])]),
        ];

        SwarmConfig::Explicit {
            clusters: layout
                .iter()
                .map(|(name, agents)| ClusterConfig {
                    name: name.to_string(),
                    agents: agents
                        .iter()
                        .map(|(id, position)| AgentConfig {
                            id: id.to_string(),
                            position: *position,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// One cluster of the partition
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClusterConfig {
    pub name: String,
    pub agents: Vec<AgentConfig>,
}

/// One roster entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgentConfig {
    pub id: String,
    /// Nominal position `[x, y, z]`
    #[serde(default)]
    pub position: [f64; 3],
}

/// Inclusive integer weight range
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct WeightRange {
    pub min: u32,
    pub max: u32,
}

/// Edge formation parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TopologyConfig {
    /// Probability of a link between two agents of the same cluster
    pub intra_cluster_probability: f64,
    /// Probability of a link between any pair not linked by the intra pass
    pub inter_cluster_probability: f64,
    /// Single link probability used by the identity-forgery formation
    pub uniform_probability: f64,
    pub link_weight: WeightRange,
    pub decoy_weight: WeightRange,
    pub refresh: TopologyRefresh,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            intra_cluster_probability: 0.5,
            inter_cluster_probability: 0.3,
            uniform_probability: 0.5,
            link_weight: WeightRange { min: 10, max: 20 },
            decoy_weight: WeightRange { min: 5, max: 15 },
            refresh: TopologyRefresh::EveryRound,
        }
    }
}

/// Attack selection
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AttackConfig {
    pub kind: AttackKind,
}

/// Trust verification parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TrustConfig {
    /// Per-component delta above which an agent is flagged
    pub threshold: f64,
    pub centrality_baseline: CentralityBaseline,
    /// Iteration bound for eigenvector power iteration
    pub eigenvector_max_iter: usize,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            centrality_baseline: CentralityBaseline::CurrentRound,
            eigenvector_max_iter: MIN_EIGENVECTOR_ITERATIONS,
        }
    }
}

/// Dataset output settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// File name of the CSV dataset inside the output directory
    pub csv_name: String,
    /// Write one DOT rendering per round
    pub render: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_name: "trust_log.csv".to_string(),
            render: true,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid swarm configuration: {0}")]
    InvalidSwarm(String),
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
    #[error("Invalid trust configuration: {0}")]
    InvalidTrust(String),
    #[error("Invalid output configuration: {0}")]
    InvalidOutput(String),
}
