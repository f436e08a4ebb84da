//! Agent and graph-node identity types.
//!
//! This module contains the identifiers shared by the registry, the topology
//! builder and the attack injector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a swarm agent (e.g. `Drone4`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a cluster in the fixed partition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(String);

impl ClusterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Nominal 3-D position, used for layout hints only
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A registered swarm member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub cluster: ClusterId,
    pub position: Position,
}

/// Kind of transient node injected by an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DecoyKind {
    /// Forged identity attached to an impersonated agent
    Sybil,
    /// Interception relay sitting on a victim's only decoy link
    Relay,
}

impl DecoyKind {
    /// Returns the name prefix used when rendering decoys of this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            DecoyKind::Sybil => "Sybil_",
            DecoyKind::Relay => "Relay_",
        }
    }
}

/// Identifier of a decoy node; the serial increases monotonically over a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DecoyId {
    pub kind: DecoyKind,
    pub serial: u64,
}

impl fmt::Display for DecoyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.serial)
    }
}

/// Returns true if `name` follows the rendered decoy naming pattern
pub fn is_decoy_name(name: &str) -> bool {
    [DecoyKind::Sybil, DecoyKind::Relay].iter().any(|kind| {
        name.strip_prefix(kind.prefix())
            .map_or(false, |rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
    })
}

/// A node of the communication graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Agent(AgentId),
    Decoy(DecoyId),
}

impl NodeId {
    /// Returns the agent id, or `None` for decoys
    pub fn as_agent(&self) -> Option<&AgentId> {
        match self {
            NodeId::Agent(id) => Some(id),
            NodeId::Decoy(_) => None,
        }
    }

    pub fn is_decoy(&self) -> bool {
        matches!(self, NodeId::Decoy(_))
    }
}

impl From<AgentId> for NodeId {
    fn from(id: AgentId) -> Self {
        NodeId::Agent(id)
    }
}

impl From<DecoyId> for NodeId {
    fn from(id: DecoyId) -> Self {
        NodeId::Decoy(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Agent(id) => id.fmt(f),
            NodeId::Decoy(id) => id.fmt(f),
        }
    }
}
