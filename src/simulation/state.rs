//! Mutable state of a single run.
//!
//! Everything a round reads or writes across rounds lives here and is owned
//! by one controller: the seeded random stream, the active/removed partition,
//! telemetry, cumulative attack counters, the decoy allocator, the previous
//! round's degree readings and, under per-epoch refresh, the persistent graph.

use std::collections::HashMap;

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agent::{AgentId, KinematicsSource, TelemetryStore};
use crate::attack::DecoyAllocator;
use crate::registry::AgentRegistry;
use crate::topology::CommunicationGraph;

/// Owned run state
#[derive(Debug)]
pub struct SimulationState {
    pub(crate) rng: ChaCha8Rng,
    /// Active agents in roster order
    active: Vec<AgentId>,
    /// Removed agents in removal order
    removed: Vec<AgentId>,
    pub(crate) telemetry: TelemetryStore,
    attack_counts: HashMap<AgentId, u32>,
    pub(crate) decoys: DecoyAllocator,
    pub(crate) previous_degree: HashMap<AgentId, f64>,
    pub(crate) graph: Option<CommunicationGraph>,
}

impl SimulationState {
    /// Fresh state with every roster agent active and telemetry drawn from
    /// the seeded stream
    pub fn new(registry: &AgentRegistry, seed: u64, kinematics: &mut dyn KinematicsSource) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let active = registry.ids();
        let telemetry = TelemetryStore::generate(&active, &mut rng);
        kinematics.reset(&telemetry, &active, &mut rng);

        Self {
            rng,
            active,
            removed: Vec::new(),
            telemetry,
            attack_counts: HashMap::new(),
            decoys: DecoyAllocator::new(),
            previous_degree: HashMap::new(),
            graph: None,
        }
    }

    /// Epoch reset: every agent returns to active, telemetry is regenerated
    /// and the persistent graph is discarded. Attack counters are cleared only
    /// when `reset_counts` is set.
    pub fn reset(&mut self, registry: &AgentRegistry, kinematics: &mut dyn KinematicsSource, reset_counts: bool) {
        self.active = registry.ids();
        self.removed.clear();
        self.telemetry = TelemetryStore::generate(&self.active, &mut self.rng);
        kinematics.reset(&self.telemetry, &self.active, &mut self.rng);
        self.previous_degree.clear();
        self.graph = None;
        if reset_counts {
            self.attack_counts.clear();
        }
        info!("Reset: {} agents active, telemetry regenerated", self.active.len());
    }

    pub fn active(&self) -> &[AgentId] {
        &self.active
    }

    pub fn removed(&self) -> &[AgentId] {
        &self.removed
    }

    /// Moves `agent` from active to removed; no-op if not active
    pub fn remove(&mut self, agent: &AgentId) -> bool {
        let Some(pos) = self.active.iter().position(|a| a == agent) else {
            return false;
        };
        let agent = self.active.remove(pos);
        self.removed.push(agent);
        true
    }

    pub fn telemetry(&self) -> &TelemetryStore {
        &self.telemetry
    }

    /// Increments and returns the cumulative attack count of `agent`
    pub fn record_attack(&mut self, agent: &AgentId) -> u32 {
        let count = self.attack_counts.entry(agent.clone()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn attack_count(&self, agent: &AgentId) -> u32 {
        self.attack_counts.get(agent).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::SyntheticKinematics;
    use crate::config::SwarmConfig;

    fn setup() -> (AgentRegistry, SyntheticKinematics, SimulationState) {
        let registry = AgentRegistry::from_config(&SwarmConfig::default());
        let mut kinematics = SyntheticKinematics::new();
        let state = SimulationState::new(&registry, 42, &mut kinematics);
        (registry, kinematics, state)
    }

    #[test]
    fn test_remove_and_reset() {
        let (registry, mut kinematics, mut state) = setup();
        let drone3 = AgentId::new("Drone3");

        assert_eq!(state.active().len(), 9);
        assert!(state.remove(&drone3));
        assert!(!state.remove(&drone3));
        assert!(!state.active().contains(&drone3));
        assert_eq!(state.active().len(), 8);
        assert_eq!(state.removed(), &[drone3.clone()]);

        state.record_attack(&drone3);
        state.reset(&registry, &mut kinematics, false);
        assert_eq!(state.active(), registry.ids().as_slice());
        assert!(state.removed().is_empty());
        assert!(state.active().contains(&drone3));
        assert_eq!(state.attack_count(&drone3), 1);

        state.reset(&registry, &mut kinematics, true);
        assert_eq!(state.attack_count(&drone3), 0);
    }

    #[test]
    fn test_reset_regenerates_telemetry() {
        let (registry, mut kinematics, mut state) = setup();
        let drone1 = AgentId::new("Drone1");
        let before = state.telemetry().get(&drone1).unwrap().clone();
        state.reset(&registry, &mut kinematics, false);
        assert_eq!(state.telemetry().len(), 9);
        assert_ne!(state.telemetry().get(&drone1).unwrap(), &before);
    }

    #[test]
    fn test_attack_counts_accumulate() {
        let (_, _, mut state) = setup();
        let drone = AgentId::new("Drone9");
        assert_eq!(state.attack_count(&drone), 0);
        assert_eq!(state.record_attack(&drone), 1);
        assert_eq!(state.record_attack(&drone), 2);
    }
}
