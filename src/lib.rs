//! # SwarmTrust - Trust evaluation and attack injection for drone swarms
//!
//! This library models a multi-cluster drone swarm as a dynamic
//! communication graph and generates labeled datasets for anomaly-detection
//! research: every round it injects one adversarial behavior, scores every
//! agent's structural importance and compares each agent's self-reported
//! state against a ground-truth state to produce a TRUSTED/MALICIOUS verdict.
//!
//! ## Key Features
//!
//! - **Attack Scenarios**: state falsification, identity forgery (sybil),
//!   relay interception (MITM), structural targeting (critical node) and an
//!   attack-free baseline
//! - **Centrality Metrics**: degree, betweenness, closeness and eigenvector
//!   centrality per node and round
//! - **Lifecycle**: attacked agents are removed until the next epoch reset
//! - **Reproducible**: every random draw comes from one seeded stream
//! - **Sweeps**: independent seeded runs in parallel
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: Type-safe configuration structures and validation
//! - `config_loader`: Configuration file loading and CLI overrides
//! - `agent`: Agent identities, telemetry and the kinematics seam
//! - `registry`: Static roster and cluster partition
//! - `topology`: Communication graph and its formation
//! - `attack`: Attack strategies and ground-truth perturbation
//! - `analysis`: Centrality evaluation and trust verification
//! - `simulation`: Run state and the round controller
//! - `export`: CSV dataset, DOT renderings and run summaries
//! - `orchestrator`: Single runs and parallel sweeps
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use swarmtrust::{config_loader, orchestrator};
//!
//! let config = config_loader::load_config(Path::new("configs/sybil.yaml"))?;
//! let summary = orchestrator::run_simulation(&config, Path::new("swarmtrust_output"))?;
//! println!("{} records, {} flagged", summary.records_written, summary.malicious);
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```
//!
//! ## Configuration Format
//!
//! Every section is optional; an empty file reproduces the 9-drone,
//! 3-cluster, 15-round state-falsification scenario.
//!
//! ```yaml
//! general:
//!   rounds: 15
//!   epoch_length: 5
//!   seed: 42
//!
//! swarm:
//!   clusters: 3
//!   agents_per_cluster: 3
//!
//! attack:
//!   kind: identity_forgery
//!
//! trust:
//!   threshold: 0.1
//! ```
//!
//! ## Error Handling
//!
//! Library errors are typed (`ValidationError`, `SimulationError`,
//! `ConvergenceFailure`); run-level functions return
//! `color_eyre::eyre::Result` with context attached.

pub mod agent;
pub mod analysis;
pub mod attack;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod registry;
pub mod simulation;
pub mod topology;
