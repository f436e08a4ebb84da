//! Error types raised by the simulation engine.

use crate::agent::AgentId;

/// Errors raised while running simulation rounds
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The attack injector was invoked with no active agents left
    #[error("Cannot inject attack in round {round}: the active agent set is empty (check epoch_length against the roster size)")]
    EmptyActiveSet { round: usize },
    /// A telemetry lookup referenced an agent the store does not hold
    #[error("Unknown agent '{0}'")]
    UnknownAgent(AgentId),
}
