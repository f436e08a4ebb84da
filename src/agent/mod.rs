//! Agent identity, telemetry and kinematics.
//!
//! This module contains the per-agent building blocks the round controller
//! reads from: stable identities, the telemetry state store and the simulator
//! seam that supplies actual speed readings.

pub mod kinematics;
pub mod telemetry;
pub mod types;

pub use kinematics::{actual_speed, KinematicsSource, SyntheticKinematics, Velocity};
pub use telemetry::{TelemetryState, TelemetryStore};
pub use types::{is_decoy_name, Agent, AgentId, ClusterId, DecoyId, DecoyKind, NodeId, Position};
