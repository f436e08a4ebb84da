//! Communication graph formation.
//!
//! Two formation patterns are supported:
//!
//! - **Clustered**: every intra-cluster pair of active agents is linked with
//!   the intra-cluster probability; every remaining pair of the whole active
//!   set is then linked with the inter-cluster probability. Clusters come out
//!   locally denser than the network at large, with occasional cross-cluster
//!   shortcuts.
//! - **Uniform**: every pair of the active set is linked with a single
//!   probability, ignoring the cluster partition. Used by identity-forgery
//!   runs, whose attack is independent of cluster structure.

use log::debug;
use rand::Rng;
use std::collections::HashSet;

use crate::agent::{AgentId, NodeId};
use crate::config::{TopologyConfig, WeightRange};
use crate::registry::AgentRegistry;
use crate::topology::CommunicationGraph;

/// Edge formation pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formation {
    Clustered,
    Uniform,
}

/// Draws an integer weight from an inclusive range
pub fn draw_weight<R: Rng + ?Sized>(range: &WeightRange, rng: &mut R) -> u32 {
    rng.gen_range(range.min..=range.max)
}

/// Build the communication graph over the active agents.
///
/// # Arguments
/// * `registry` - The roster, providing the cluster partition
/// * `active` - Active agents in roster order
/// * `formation` - Edge formation pattern
/// * `config` - Formation probabilities and weight ranges
/// * `rng` - Random source for edge and weight draws
///
/// # Returns
/// A graph whose node set is exactly `active`
pub fn build_topology<R: Rng + ?Sized>(
    registry: &AgentRegistry,
    active: &[AgentId],
    formation: Formation,
    config: &TopologyConfig,
    rng: &mut R,
) -> CommunicationGraph {
    let mut graph = CommunicationGraph::new();
    for agent in active {
        graph.add_node(NodeId::Agent(agent.clone()));
    }

    match formation {
        Formation::Clustered => {
            let active_set: HashSet<&AgentId> = active.iter().collect();

            // Intra-cluster links
            for (cluster, members) in registry.clusters() {
                let members: Vec<&AgentId> =
                    members.iter().filter(|m| active_set.contains(m)).collect();
                let formed = link_pairs(&mut graph, &members, config.intra_cluster_probability, &config.link_weight, rng);
                debug!("{}: {} intra-cluster links", cluster, formed);
            }

            // Cross-cluster shortcuts over the whole active set
            let all: Vec<&AgentId> = active.iter().collect();
            let formed = link_pairs(&mut graph, &all, config.inter_cluster_probability, &config.link_weight, rng);
            debug!("{} inter-cluster links", formed);
        }
        Formation::Uniform => {
            let all: Vec<&AgentId> = active.iter().collect();
            let formed = link_pairs(&mut graph, &all, config.uniform_probability, &config.link_weight, rng);
            debug!("{} uniform links", formed);
        }
    }

    graph
}

/// Considers every unlinked pair of `members` once, linking it with
/// probability `p`. Returns the number of links formed.
fn link_pairs<R: Rng + ?Sized>(
    graph: &mut CommunicationGraph,
    members: &[&AgentId],
    p: f64,
    weights: &WeightRange,
    rng: &mut R,
) -> usize {
    let mut formed = 0;
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            let a = NodeId::Agent(members[i].clone());
            let b = NodeId::Agent(members[j].clone());
            // Pairs linked by an earlier pass are not reconsidered
            if graph.has_edge(&a, &b) {
                continue;
            }
            if rng.gen_bool(p) {
                let weight = draw_weight(weights, rng);
                graph.add_edge(&a, &b, weight);
                formed += 1;
            }
        }
    }
    formed
}
