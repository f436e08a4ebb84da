//! GraphViz rendering of round topologies.
//!
//! Rendering is a side effect of a round and never feeds back into the
//! simulation. The bundled [`DotRenderer`] writes one `round_<n>.dot` file per
//! round; render them with `neato -n -Tpng` to honor the position hints.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};

use crate::agent::NodeId;
use crate::attack::AttackRecord;
use crate::registry::AgentRegistry;
use crate::topology::CommunicationGraph;

/// Receives each round's final graph
pub trait TopologyRenderer {
    fn render(
        &mut self,
        round: usize,
        graph: &CommunicationGraph,
        attack: &AttackRecord,
        registry: &AgentRegistry,
    ) -> Result<()>;
}

/// Discards every rendering
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl TopologyRenderer for NullRenderer {
    fn render(&mut self, _: usize, _: &CommunicationGraph, _: &AttackRecord, _: &AgentRegistry) -> Result<()> {
        Ok(())
    }
}

/// Writes `round_<n>.dot` files into a directory
#[derive(Debug, Clone)]
pub struct DotRenderer {
    dir: PathBuf,
}

impl DotRenderer {
    /// Creates the output directory if needed
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create render directory: {}", dir.display()))?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    pub fn round_path(&self, round: usize) -> PathBuf {
        self.dir.join(format!("round_{}.dot", round))
    }
}

impl TopologyRenderer for DotRenderer {
    fn render(
        &mut self,
        round: usize,
        graph: &CommunicationGraph,
        attack: &AttackRecord,
        registry: &AgentRegistry,
    ) -> Result<()> {
        let path = self.round_path(round);
        fs::write(&path, generate_dot(round, graph, attack, registry))
            .with_context(|| format!("Failed to write rendering to {}", path.display()))?;
        log::debug!("Rendered round {} to {}", round, path.display());
        Ok(())
    }
}

/// Fill color of a node given this round's attack
pub fn node_color(attack: &AttackRecord, node: &NodeId) -> &'static str {
    match attack.label(node) {
        None => "green",
        Some("Data Manipulation") => "yellow",
        Some("Sybil Impersonated") => "orange",
        Some("Sybil Node") | Some("MITM Attack") => "purple",
        Some("MITM Node") => "gray",
        Some("Critical Node Attack") => "red",
        Some(_) => "white",
    }
}

/// Build the DOT document for one round
pub fn generate_dot(
    round: usize,
    graph: &CommunicationGraph,
    attack: &AttackRecord,
    registry: &AgentRegistry,
) -> String {
    let mut dot = String::new();
    dot.push_str("graph SwarmRound {\n");
    dot.push_str("    node [shape=circle, style=filled];\n");
    dot.push_str(&format!(
        "    label=\"Iteration {} - {}\";\n",
        round,
        attack.kind.as_str()
    ));
    dot.push_str("    labelloc=t;\n\n");

    for node in graph.nodes() {
        let mut attrs = format!("fillcolor={}", node_color(attack, node));
        // Decoys have no nominal position and are left to the layout engine
        if let Some(agent) = node.as_agent().and_then(|id| registry.get(id)) {
            attrs.push_str(&format!(", pos=\"{},{}\"", agent.position.x, agent.position.y));
        }
        dot.push_str(&format!("    \"{}\" [{}];\n", node, attrs));
    }

    dot.push('\n');

    for (a, b, weight) in graph.edges() {
        dot.push_str(&format!("    \"{}\" -- \"{}\" [label=\"{}\"];\n", a, b, weight));
    }

    dot.push_str("}\n");
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, DecoyId, DecoyKind};
    use crate::config::{AttackKind, SwarmConfig};
    use tempfile::TempDir;

    fn agent(name: &str) -> NodeId {
        NodeId::Agent(AgentId::new(name))
    }

    #[test]
    fn test_colors_follow_labels() {
        let relay = DecoyId { kind: DecoyKind::Relay, serial: 0 };
        let mut attack = AttackRecord::new(AttackKind::RelayInterception);
        attack.victims.push(AgentId::new("Drone4"));
        attack.decoys.push(relay);

        assert_eq!(node_color(&attack, &agent("Drone4")), "purple");
        assert_eq!(node_color(&attack, &NodeId::Decoy(relay)), "gray");
        assert_eq!(node_color(&attack, &agent("Drone1")), "green");

        let mut attack = AttackRecord::new(AttackKind::StructuralTargeting);
        attack.victims.push(AgentId::new("Drone4"));
        assert_eq!(node_color(&attack, &agent("Drone4")), "red");
    }

    #[test]
    fn test_dot_document() {
        let registry = AgentRegistry::from_config(&SwarmConfig::default());
        let sybil = NodeId::Decoy(DecoyId { kind: DecoyKind::Sybil, serial: 2 });
        let mut graph = CommunicationGraph::new();
        graph.add_node(agent("Drone1"));
        graph.add_node(agent("Drone2"));
        graph.add_node(sybil.clone());
        graph.add_edge(&agent("Drone1"), &agent("Drone2"), 14);
        graph.add_edge(&sybil, &agent("Drone2"), 7);

        let mut attack = AttackRecord::new(AttackKind::IdentityForgery);
        attack.victims.push(AgentId::new("Drone2"));
        attack.decoys.push(DecoyId { kind: DecoyKind::Sybil, serial: 2 });

        let dot = generate_dot(3, &graph, &attack, &registry);
        assert!(dot.starts_with("graph SwarmRound {"));
        assert!(dot.contains("\"Drone1\" [fillcolor=green, pos=\"10,10\"];"));
        assert!(dot.contains("\"Drone2\" [fillcolor=orange, pos=\"20,10\"];"));
        assert!(dot.contains("\"Sybil_2\" [fillcolor=purple];"));
        assert!(dot.contains("[label=\"14\"]"));
        assert!(dot.contains("[label=\"7\"]"));
        assert!(dot.contains("Iteration 3 - identity_forgery"));
    }

    #[test]
    fn test_renderer_writes_round_file() {
        let dir = TempDir::new().unwrap();
        let registry = AgentRegistry::from_config(&SwarmConfig::default());
        let mut graph = CommunicationGraph::new();
        graph.add_node(agent("Drone1"));

        let mut renderer = DotRenderer::new(&dir.path().join("rounds")).unwrap();
        renderer
            .render(0, &graph, &AttackRecord::new(AttackKind::Baseline), &registry)
            .unwrap();

        let content = std::fs::read_to_string(renderer.round_path(0)).unwrap();
        assert!(content.contains("\"Drone1\""));
        assert!(dir.path().join("rounds").join("round_0.dot").exists());
    }
}
