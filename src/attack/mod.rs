//! Attack injection.
//!
//! A run commits to one [`AttackStrategy`]. Each round the strategy is
//! invoked exactly once over the freshly built graph: it picks its victims
//! among the active agents, may attach decoy nodes to the graph, and returns
//! an [`AttackRecord`] the round controller uses for labeling, ground-truth
//! perturbation and removal.
//!
//! | Strategy              | Victims             | Graph mutation              |
//! |-----------------------|---------------------|-----------------------------|
//! | `Baseline`            | none                | none                        |
//! | `StateFalsification`  | 1, uniform          | none                        |
//! | `IdentityForgery`     | 1-2, uniform        | one sybil decoy per victim  |
//! | `RelayInterception`   | 1, uniform          | one relay decoy             |
//! | `StructuralTargeting` | top-2 betweenness   | none                        |

pub mod perturbation;

pub use perturbation::{falsify, CENTRALITY_DROP, SPEED_OFFSET_MAX, SPEED_OFFSET_MIN};

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::agent::{AgentId, DecoyId, DecoyKind, NodeId};
use crate::analysis::betweenness_centrality;
use crate::config::{AttackKind, WeightRange};
use crate::error::SimulationError;
use crate::topology::{draw_weight, CommunicationGraph, Formation};

/// Attack family with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackStrategy {
    Baseline,
    StateFalsification,
    IdentityForgery { max_victims: usize },
    RelayInterception,
    StructuralTargeting { targets: usize },
}

impl From<AttackKind> for AttackStrategy {
    fn from(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Baseline => AttackStrategy::Baseline,
            AttackKind::StateFalsification => AttackStrategy::StateFalsification,
            AttackKind::IdentityForgery => AttackStrategy::IdentityForgery { max_victims: 2 },
            AttackKind::RelayInterception => AttackStrategy::RelayInterception,
            AttackKind::StructuralTargeting => AttackStrategy::StructuralTargeting { targets: 2 },
        }
    }
}

impl AttackStrategy {
    pub fn kind(&self) -> AttackKind {
        match self {
            AttackStrategy::Baseline => AttackKind::Baseline,
            AttackStrategy::StateFalsification => AttackKind::StateFalsification,
            AttackStrategy::IdentityForgery { .. } => AttackKind::IdentityForgery,
            AttackStrategy::RelayInterception => AttackKind::RelayInterception,
            AttackStrategy::StructuralTargeting { .. } => AttackKind::StructuralTargeting,
        }
    }

    /// Edge formation used by runs of this strategy
    pub fn formation(&self) -> Formation {
        match self {
            AttackStrategy::IdentityForgery { .. } => Formation::Uniform,
            _ => Formation::Clustered,
        }
    }

    /// Inject this round's attack.
    ///
    /// # Arguments
    /// * `round` - Round index, for error reporting
    /// * `active` - Active agents in roster order
    /// * `graph` - The round's graph; decoys are attached in place
    /// * `decoys` - Run-wide decoy id allocator
    /// * `decoy_weight` - Weight range of decoy links
    /// * `rng` - Random source for victim and weight draws
    ///
    /// # Returns
    /// The round's attack record, or `EmptyActiveSet` if no agent is active
    pub fn inject<R: Rng + ?Sized>(
        &self,
        round: usize,
        active: &[AgentId],
        graph: &mut CommunicationGraph,
        decoys: &mut DecoyAllocator,
        decoy_weight: &WeightRange,
        rng: &mut R,
    ) -> Result<AttackRecord, SimulationError> {
        if active.is_empty() {
            return Err(SimulationError::EmptyActiveSet { round });
        }

        let mut record = AttackRecord::new(self.kind());
        match *self {
            AttackStrategy::Baseline => {}
            AttackStrategy::StateFalsification => {
                record.victims.extend(active.choose(rng).cloned());
            }
            AttackStrategy::IdentityForgery { max_victims } => {
                let count = rng.gen_range(1..=max_victims.max(1)).min(active.len());
                for victim in active.choose_multiple(rng, count) {
                    let decoy = decoys.allocate(DecoyKind::Sybil);
                    attach_decoy(graph, decoy, victim, decoy_weight, rng);
                    record.victims.push(victim.clone());
                    record.decoys.push(decoy);
                }
            }
            AttackStrategy::RelayInterception => {
                if let Some(victim) = active.choose(rng) {
                    let decoy = decoys.allocate(DecoyKind::Relay);
                    attach_decoy(graph, decoy, victim, decoy_weight, rng);
                    record.victims.push(victim.clone());
                    record.decoys.push(decoy);
                }
            }
            AttackStrategy::StructuralTargeting { targets } => {
                record.victims = top_by_betweenness(graph, active, targets);
            }
        }

        if !record.victims.is_empty() {
            let names: Vec<&str> = record.victims.iter().map(|v| v.as_str()).collect();
            info!("Round {}: {} victims {:?}", round, self.kind().as_str(), names);
        }
        Ok(record)
    }
}

/// Attaches a new decoy node to `victim` with a decoy-range weight
fn attach_decoy<R: Rng + ?Sized>(
    graph: &mut CommunicationGraph,
    decoy: DecoyId,
    victim: &AgentId,
    weights: &WeightRange,
    rng: &mut R,
) {
    let decoy = NodeId::Decoy(decoy);
    graph.add_node(decoy.clone());
    let weight = draw_weight(weights, rng);
    graph.add_edge(&decoy, &NodeId::Agent(victim.clone()), weight);
}

/// The `targets` active agents with the highest betweenness. Ties keep
/// roster order.
pub fn top_by_betweenness(
    graph: &CommunicationGraph,
    active: &[AgentId],
    targets: usize,
) -> Vec<AgentId> {
    let betweenness = betweenness_centrality(graph);
    let mut ranked: Vec<(&AgentId, f64)> = active
        .iter()
        .map(|a| {
            let score = betweenness.get(&NodeId::Agent(a.clone())).copied().unwrap_or(0.0);
            (a, score)
        })
        .collect();

    // Stable sort: equal scores stay in roster order
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.into_iter().take(targets).map(|(a, _)| a.clone()).collect()
}

/// Hands out decoy ids with a run-wide increasing serial
#[derive(Debug, Clone, Default)]
pub struct DecoyAllocator {
    next: u64,
}

impl DecoyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: DecoyKind) -> DecoyId {
        let id = DecoyId { kind, serial: self.next };
        self.next += 1;
        id
    }
}

/// What one round's attack did
#[derive(Debug, Clone, PartialEq)]
pub struct AttackRecord {
    pub kind: AttackKind,
    /// Attacked agents, in selection order
    pub victims: Vec<AgentId>,
    /// Decoy nodes created this round
    pub decoys: Vec<DecoyId>,
}

impl AttackRecord {
    pub fn new(kind: AttackKind) -> Self {
        Self {
            kind,
            victims: Vec::new(),
            decoys: Vec::new(),
        }
    }

    pub fn is_victim(&self, agent: &AgentId) -> bool {
        self.victims.contains(agent)
    }

    /// Dataset label of `node` this round; `None` for untouched agents
    pub fn label(&self, node: &NodeId) -> Option<&'static str> {
        match node {
            NodeId::Agent(agent) if self.is_victim(agent) => victim_label(self.kind),
            NodeId::Agent(_) => None,
            NodeId::Decoy(decoy) => Some(match decoy.kind {
                DecoyKind::Sybil => "Sybil Node",
                DecoyKind::Relay => "MITM Node",
            }),
        }
    }
}

/// Label given to victims of `kind`
pub fn victim_label(kind: AttackKind) -> Option<&'static str> {
    match kind {
        AttackKind::Baseline => None,
        AttackKind::StateFalsification => Some("Data Manipulation"),
        AttackKind::IdentityForgery => Some("Sybil Impersonated"),
        AttackKind::RelayInterception => Some("MITM Attack"),
        AttackKind::StructuralTargeting => Some("Critical Node Attack"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SwarmConfig, TopologyConfig};
    use crate::registry::AgentRegistry;
    use crate::topology::build_topology;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    const DECOY_WEIGHT: WeightRange = WeightRange { min: 5, max: 15 };

    fn setup(seed: u64) -> (Vec<AgentId>, CommunicationGraph, ChaCha8Rng) {
        let registry = AgentRegistry::from_config(&SwarmConfig::default());
        let active = registry.ids();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let graph = build_topology(&registry, &active, Formation::Clustered, &TopologyConfig::default(), &mut rng);
        (active, graph, rng)
    }

    fn agent(name: &str) -> AgentId {
        AgentId::new(name)
    }

    #[test]
    fn test_empty_active_set_is_an_error() {
        let mut graph = CommunicationGraph::new();
        let mut decoys = DecoyAllocator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = AttackStrategy::StateFalsification
            .inject(3, &[], &mut graph, &mut decoys, &DECOY_WEIGHT, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SimulationError::EmptyActiveSet { round: 3 }));
    }

    #[test]
    fn test_state_falsification_picks_one_active_victim() {
        for seed in 0..20 {
            let (active, mut graph, mut rng) = setup(seed);
            let active = &active[2..];
            let edges_before = graph.edge_count();
            let mut decoys = DecoyAllocator::new();
            let record = AttackStrategy::StateFalsification
                .inject(0, active, &mut graph, &mut decoys, &DECOY_WEIGHT, &mut rng)
                .unwrap();
            assert_eq!(record.victims.len(), 1);
            assert!(active.contains(&record.victims[0]));
            assert!(record.decoys.is_empty());
            assert_eq!(graph.edge_count(), edges_before);
            assert_eq!(record.label(&NodeId::Agent(record.victims[0].clone())), Some("Data Manipulation"));
        }
    }

    #[test]
    fn test_identity_forgery_attaches_sybils() {
        let mut seen_counts = HashSet::new();
        let mut decoys = DecoyAllocator::new();
        let mut last_serial = None;
        for seed in 0..40 {
            let (active, mut graph, mut rng) = setup(seed);
            let nodes_before = graph.node_count();
            let record = AttackStrategy::from(AttackKind::IdentityForgery)
                .inject(0, &active, &mut graph, &mut decoys, &DECOY_WEIGHT, &mut rng)
                .unwrap();

            let count = record.victims.len();
            assert!((1..=2).contains(&count));
            seen_counts.insert(count);
            assert_eq!(record.decoys.len(), count);
            assert_eq!(graph.node_count(), nodes_before + count);

            let unique: HashSet<&AgentId> = record.victims.iter().collect();
            assert_eq!(unique.len(), count);

            for (victim, decoy) in record.victims.iter().zip(&record.decoys) {
                assert_eq!(decoy.kind, DecoyKind::Sybil);
                let decoy_node = NodeId::Decoy(*decoy);
                let victim_node = NodeId::Agent(victim.clone());
                assert_eq!(graph.neighbors(&decoy_node), vec![&victim_node]);
                let w = graph.weight(&decoy_node, &victim_node).unwrap();
                assert!((5..=15).contains(&w));
                assert_eq!(record.label(&decoy_node), Some("Sybil Node"));
                assert_eq!(record.label(&victim_node), Some("Sybil Impersonated"));

                if let Some(last) = last_serial {
                    assert!(decoy.serial > last);
                }
                last_serial = Some(decoy.serial);
            }
        }
        assert_eq!(seen_counts.len(), 2);
    }

    #[test]
    fn test_identity_forgery_caps_at_active_size() {
        let (_, mut graph, mut rng) = setup(1);
        let mut decoys = DecoyAllocator::new();
        for _ in 0..20 {
            let record = AttackStrategy::IdentityForgery { max_victims: 2 }
                .inject(0, &[agent("Drone3")], &mut graph, &mut decoys, &DECOY_WEIGHT, &mut rng)
                .unwrap();
            assert_eq!(record.victims, vec![agent("Drone3")]);
        }
    }

    #[test]
    fn test_relay_interception_single_relay() {
        let (active, mut graph, mut rng) = setup(4);
        let mut decoys = DecoyAllocator::new();
        let record = AttackStrategy::RelayInterception
            .inject(0, &active, &mut graph, &mut decoys, &DECOY_WEIGHT, &mut rng)
            .unwrap();
        assert_eq!(record.victims.len(), 1);
        assert_eq!(record.decoys.len(), 1);
        let relay = NodeId::Decoy(record.decoys[0]);
        assert_eq!(relay.to_string(), "Relay_0");
        assert_eq!(graph.degree(&relay), 1);
        assert_eq!(record.label(&relay), Some("MITM Node"));
    }

    #[test]
    fn test_structural_targeting_top_two() {
        // Path: Drone1 - Drone2 - Drone3 - Drone4, plus isolated Drone5
        let active: Vec<AgentId> = (1..=5).map(|i| agent(&format!("Drone{}", i))).collect();
        let mut graph = CommunicationGraph::new();
        for a in &active {
            graph.add_node(NodeId::Agent(a.clone()));
        }
        for (a, b) in [(1, 2), (2, 3), (3, 4)] {
            graph.add_edge(
                &NodeId::Agent(agent(&format!("Drone{}", a))),
                &NodeId::Agent(agent(&format!("Drone{}", b))),
                10,
            );
        }

        let mut decoys = DecoyAllocator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let record = AttackStrategy::StructuralTargeting { targets: 2 }
            .inject(0, &active, &mut graph, &mut decoys, &DECOY_WEIGHT, &mut rng)
            .unwrap();
        assert_eq!(record.victims, vec![agent("Drone2"), agent("Drone3")]);
    }

    #[test]
    fn test_structural_targeting_ties_follow_roster_order() {
        // No edges: every score ties at 0
        let active: Vec<AgentId> = ["Drone7", "Drone2", "Drone9"].iter().map(|n| agent(n)).collect();
        let mut graph = CommunicationGraph::new();
        for a in &active {
            graph.add_node(NodeId::Agent(a.clone()));
        }
        assert_eq!(top_by_betweenness(&graph, &active, 2), vec![agent("Drone7"), agent("Drone2")]);
        assert_eq!(top_by_betweenness(&graph, &active[..1], 2), vec![agent("Drone7")]);
    }

    #[test]
    fn test_baseline_has_no_victims() {
        let (active, mut graph, mut rng) = setup(8);
        let mut decoys = DecoyAllocator::new();
        let record = AttackStrategy::Baseline
            .inject(0, &active, &mut graph, &mut decoys, &DECOY_WEIGHT, &mut rng)
            .unwrap();
        assert!(record.victims.is_empty());
        assert!(record.decoys.is_empty());
        assert_eq!(record.label(&NodeId::Agent(active[0].clone())), None);
    }
}
