//! Flight-simulator seam.
//!
//! The engine consumes the simulator only as a source of an "actual speed"
//! reading: the Euclidean norm of the vehicle's linear velocity, rounded to
//! two decimals. [`SyntheticKinematics`] stands in for a live simulator by
//! deriving a velocity vector from each agent's telemetry speed.

use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::agent::{AgentId, TelemetryStore};
use crate::error::SimulationError;

/// Linear velocity in the simulator's NED frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Velocity {
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Source of ground-truth kinematics for swarm agents
pub trait KinematicsSource {
    /// Returns the current linear velocity of `agent`
    fn velocity(&self, agent: &AgentId) -> Result<Velocity, SimulationError>;

    /// Called after every telemetry regeneration
    fn reset(&mut self, _telemetry: &TelemetryStore, _agents: &[AgentId], _rng: &mut dyn RngCore) {}
}

/// Reads the actual speed of `agent`, rounded to 2 decimal places
pub fn actual_speed(source: &dyn KinematicsSource, agent: &AgentId) -> Result<f64, SimulationError> {
    let speed = source.velocity(agent)?.norm();
    Ok((speed * 100.0).round() / 100.0)
}

/// Level-flight velocities whose magnitude equals each agent's telemetry speed
#[derive(Debug, Clone, Default)]
pub struct SyntheticKinematics {
    velocities: HashMap<AgentId, Velocity>,
}

impl SyntheticKinematics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KinematicsSource for SyntheticKinematics {
    fn velocity(&self, agent: &AgentId) -> Result<Velocity, SimulationError> {
        self.velocities
            .get(agent)
            .copied()
            .ok_or_else(|| SimulationError::UnknownAgent(agent.clone()))
    }

    fn reset(&mut self, telemetry: &TelemetryStore, agents: &[AgentId], rng: &mut dyn RngCore) {
        self.velocities.clear();
        for agent in agents {
            // Agents missing from the store keep no velocity and fail lookups
            let Ok(state) = telemetry.get(agent) else {
                continue;
            };
            let heading: f64 = rng.gen_range(0.0..TAU);
            self.velocities.insert(
                agent.clone(),
                Velocity {
                    x: state.speed * heading.cos(),
                    y: state.speed * heading.sin(),
                    z: 0.0,
                },
            );
        }
    }
}
