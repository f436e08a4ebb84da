//! # Agent Registry
//!
//! The registry is the static roster of a run: every agent's identifier, its
//! cluster in the fixed partition and its nominal position. It is built once
//! from the configuration and never changes; which agents are *active* in a
//! given round is tracked separately by the simulation state.
//!
//! ## Roster Order
//!
//! Agents are kept in roster order: clusters in configuration order, agents
//! in their listed order within a cluster. Every iteration that feeds a random
//! draw or a tie-break walks the roster in this order, so a seeded run is
//! reproducible.
//!
//! ## Generated Rosters
//!
//! A `Generated` swarm of `k` clusters with `m` agents each is named
//! `Cluster1..Clusterk` and `Drone1..Drone(k*m)`, with agents laid out on a
//! grid spaced 10 units apart at a fixed altitude of -5.

use std::collections::HashMap;

use crate::agent::{Agent, AgentId, ClusterId, Position};
use crate::config::SwarmConfig;

/// Static roster of agents and their cluster partition
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
    clusters: Vec<(ClusterId, Vec<AgentId>)>,
    index: HashMap<AgentId, usize>,
}

impl AgentRegistry {
    /// Build the roster from the swarm configuration
    pub fn from_config(swarm: &SwarmConfig) -> Self {
        let mut agents = Vec::new();
        match swarm {
            SwarmConfig::Explicit { clusters } => {
                for cluster in clusters {
                    for agent in &cluster.agents {
                        let [x, y, z] = agent.position;
                        agents.push(Agent {
                            id: AgentId::new(agent.id.clone()),
                            cluster: ClusterId::new(cluster.name.clone()),
                            position: Position::new(x, y, z),
                        });
                    }
                }
            }
            SwarmConfig::Generated { clusters, agents_per_cluster } => {
                for c in 0..*clusters {
                    for a in 0..*agents_per_cluster {
                        let i = c * agents_per_cluster + a;
                        agents.push(Agent {
                            id: AgentId::new(format!("Drone{}", i + 1)),
                            cluster: ClusterId::new(format!("Cluster{}", c + 1)),
                            position: Position::new(
                                10.0 + (i % agents_per_cluster) as f64 * 10.0,
                                10.0 + c as f64 * 10.0,
                                -5.0,
                            ),
                        });
                    }
                }
            }
        }
        Self::new(agents)
    }

    /// Build a registry from agents in roster order
    pub fn new(agents: Vec<Agent>) -> Self {
        let mut clusters: Vec<(ClusterId, Vec<AgentId>)> = Vec::new();
        let mut index = HashMap::with_capacity(agents.len());

        for (i, agent) in agents.iter().enumerate() {
            index.insert(agent.id.clone(), i);
            match clusters.iter_mut().find(|(id, _)| *id == agent.cluster) {
                Some((_, members)) => members.push(agent.id.clone()),
                None => clusters.push((agent.cluster.clone(), vec![agent.id.clone()])),
            }
        }

        Self { agents, clusters, index }
    }

    /// All agents in roster order
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// All agent ids in roster order
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(|a| a.id.clone()).collect()
    }

    /// Clusters with their members, in roster order
    pub fn clusters(&self) -> &[(ClusterId, Vec<AgentId>)] {
        &self.clusters
    }

    pub fn get(&self, id: &AgentId) -> Option<&Agent> {
        self.index.get(id).map(|&i| &self.agents[i])
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let registry = AgentRegistry::from_config(&SwarmConfig::default());
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.clusters().len(), 3);

        let (cluster, members) = &registry.clusters()[2];
        assert_eq!(cluster.as_str(), "Cluster3");
        let names: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["Drone7", "Drone8", "Drone9"]);

        let drone5 = registry.get(&AgentId::new("Drone5")).unwrap();
        assert_eq!(drone5.cluster.as_str(), "Cluster2");
        assert_eq!(drone5.position, Position::new(60.0, 50.0, -5.0));
        assert_eq!(registry.ids()[4], AgentId::new("Drone5"));
    }

    #[test]
    fn test_generated_roster() {
        let registry = AgentRegistry::from_config(&SwarmConfig::Generated {
            clusters: 2,
            agents_per_cluster: 4,
        });
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.agents()[0].id.as_str(), "Drone1");
        assert_eq!(registry.agents()[7].id.as_str(), "Drone8");
        assert_eq!(registry.agents()[4].cluster.as_str(), "Cluster2");
        assert_eq!(registry.clusters()[1].1.len(), 4);
        assert!(registry.get(&AgentId::new("Drone9")).is_none());
    }
}
