//! Communication topology module.
//!
//! This module contains the communication graph type and the builder that
//! forms it from the active agent set each round.

pub mod builder;
pub mod types;

pub use builder::{build_topology, draw_weight, Formation};
pub use types::CommunicationGraph;
