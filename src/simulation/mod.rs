//! Round lifecycle.
//!
//! This module contains the owned run state and the round controller that
//! advances it one round at a time.

pub mod controller;
pub mod state;

pub use controller::{RoundController, RoundReport};
pub use state::SimulationState;
