//! Predicted-vs-actual trust verification.
//!
//! An agent's predicted state (what it reports) is compared against its
//! actual state (ground truth, possibly perturbed by an attack). Each
//! component of the absolute difference is checked against a threshold, and
//! any mismatch flags the agent as malicious.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default per-component delta threshold
pub const DEFAULT_TRUST_THRESHOLD: f64 = 0.1;

/// The state triple compared by the verifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateTriple {
    pub speed: f64,
    /// 1 when the sensor suite reports healthy, 0 when failed
    pub sensor_ok: u8,
    pub centrality: f64,
}

/// Elementwise absolute difference of two triples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub speed: f64,
    pub sensor: f64,
    pub centrality: f64,
}

impl Delta {
    pub fn between(predicted: &StateTriple, actual: &StateTriple) -> Self {
        Self {
            speed: (predicted.speed - actual.speed).abs(),
            sensor: (f64::from(predicted.sensor_ok) - f64::from(actual.sensor_ok)).abs(),
            centrality: (predicted.centrality - actual.centrality).abs(),
        }
    }
}

/// Per-component comparison outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLabel {
    Matched,
    Mismatched,
}

impl MatchLabel {
    pub fn from_delta(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            MatchLabel::Mismatched
        } else {
            MatchLabel::Matched
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLabel::Matched => "Matched",
            MatchLabel::Mismatched => "Mismatched",
        }
    }
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary trust classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrustVerdict {
    Trusted,
    Malicious,
}

impl TrustVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustVerdict::Trusted => "TRUSTED",
            TrustVerdict::Malicious => "MALICIOUS",
        }
    }
}

impl fmt::Display for TrustVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of verifying one agent in one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub delta: Delta,
    pub speed_match: MatchLabel,
    pub sensor_match: MatchLabel,
    pub centrality_match: MatchLabel,
    pub verdict: TrustVerdict,
}

/// Thresholded comparison of predicted and actual state
#[derive(Debug, Clone, Copy)]
pub struct TrustVerifier {
    threshold: f64,
}

impl Default for TrustVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_TRUST_THRESHOLD)
    }
}

impl TrustVerifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn verify(&self, predicted: &StateTriple, actual: &StateTriple) -> VerificationResult {
        let delta = Delta::between(predicted, actual);
        let speed_match = MatchLabel::from_delta(delta.speed, self.threshold);
        let sensor_match = MatchLabel::from_delta(delta.sensor, self.threshold);
        let centrality_match = MatchLabel::from_delta(delta.centrality, self.threshold);

        let verdict = if [speed_match, sensor_match, centrality_match].contains(&MatchLabel::Mismatched) {
            TrustVerdict::Malicious
        } else {
            TrustVerdict::Trusted
        };

        VerificationResult {
            delta,
            speed_match,
            sensor_match,
            centrality_match,
            verdict,
        }
    }
}
