//! Per-agent telemetry state.
//!
//! Telemetry is synthetic context for the exported dataset. It is generated
//! uniformly at random for every roster agent at the start of a run and at
//! every epoch reset, and is read-only between resets.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::agent::AgentId;
use crate::error::SimulationError;

/// Telemetry attribute vector of a single agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryState {
    /// Battery level in percent, 50..=100
    pub battery: u32,
    /// Sensor health, 0.8..1.0
    pub sensor: f64,
    /// Relative speed, 0.8..1.2
    pub speed: f64,
    /// Location accuracy, 0.9..1.0
    pub location_accuracy: f64,
    /// Communication intensity, 5..=20
    pub comm_intensity: u32,
    /// Communication scale, 1..=3
    pub comm_scale: u32,
    /// Link latency in seconds, 0.01..0.1
    pub latency: f64,
    /// Data throughput, 100..=500
    pub throughput: u32,
    /// Packet loss ratio, 0.0..0.05
    pub packet_loss: f64,
    /// Swarm coordination rate, 0.8..1.0
    pub coordination_rate: f64,
    /// Baseline trust score, 0.7..1.0
    pub trust_score: f64,
}

impl TelemetryState {
    /// Draws a fresh attribute vector
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            battery: rng.gen_range(50..=100),
            sensor: rng.gen_range(0.8..=1.0),
            speed: rng.gen_range(0.8..=1.2),
            location_accuracy: rng.gen_range(0.9..=1.0),
            comm_intensity: rng.gen_range(5..=20),
            comm_scale: rng.gen_range(1..=3),
            latency: rng.gen_range(0.01..=0.1),
            throughput: rng.gen_range(100..=500),
            packet_loss: rng.gen_range(0.0..=0.05),
            coordination_rate: rng.gen_range(0.8..=1.0),
            trust_score: rng.gen_range(0.7..=1.0),
        }
    }
}

/// Telemetry for every agent of the roster
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    states: HashMap<AgentId, TelemetryState>,
}

impl TelemetryStore {
    /// Generates telemetry for each agent, in the order given
    pub fn generate<'a, R, I>(agents: I, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a AgentId>,
    {
        let states = agents
            .into_iter()
            .map(|id| (id.clone(), TelemetryState::generate(rng)))
            .collect();
        Self { states }
    }

    /// Looks up an agent's telemetry
    pub fn get(&self, agent: &AgentId) -> Result<&TelemetryState, SimulationError> {
        self.states
            .get(agent)
            .ok_or_else(|| SimulationError::UnknownAgent(agent.clone()))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let t = TelemetryState::generate(&mut rng);
            assert!((50..=100).contains(&t.battery));
            assert!((0.8..=1.0).contains(&t.sensor));
            assert!((0.8..=1.2).contains(&t.speed));
            assert!((0.9..=1.0).contains(&t.location_accuracy));
            assert!((5..=20).contains(&t.comm_intensity));
            assert!((1..=3).contains(&t.comm_scale));
            assert!((0.01..=0.1).contains(&t.latency));
            assert!((100..=500).contains(&t.throughput));
            assert!((0.0..=0.05).contains(&t.packet_loss));
            assert!((0.8..=1.0).contains(&t.coordination_rate));
            assert!((0.7..=1.0).contains(&t.trust_score));
        }
    }

    #[test]
    fn test_unknown_agent_lookup() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ids = vec![AgentId::new("Drone1"), AgentId::new("Drone2")];
        let store = TelemetryStore::generate(&ids, &mut rng);
        assert_eq!(store.len(), 2);
        assert!(store.get(&ids[0]).is_ok());

        let err = store.get(&AgentId::new("Drone99")).unwrap_err();
        assert!(matches!(err, SimulationError::UnknownAgent(ref id) if id.as_str() == "Drone99"));
    }
}
