//! Structural and trust analysis for swarm rounds.
//!
//! This module provides the centrality evaluator run over each round's graph
//! and the trust verifier that turns predicted-vs-actual deltas into verdicts.

pub mod centrality;
pub mod trust;

pub use centrality::{
    betweenness_centrality, closeness_centrality, degree_centrality, eigenvector_centrality,
    CentralityEvaluator, CentralityScores, ConvergenceFailure, NodeCentrality,
};
pub use trust::{Delta, MatchLabel, StateTriple, TrustVerdict, TrustVerifier, VerificationResult};
