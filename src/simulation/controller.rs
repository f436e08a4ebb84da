//! Round controller.
//!
//! Drives the per-round sequence over an owned [`SimulationState`]:
//!
//! 1. on an epoch boundary (a nonzero multiple of `epoch_length`), reset
//! 2. build the topology over the active set (or reuse the epoch's graph)
//! 3. inject the attack, exactly once
//! 4. evaluate centrality over the full graph, decoys included
//! 5. verify every active agent's predicted state against its actual state
//! 6. append one record per agent to the sink
//! 7. render the topology
//! 8. remove this round's victims and drop decoy nodes

use color_eyre::eyre::{Context, Result};
use log::{debug, info};

use crate::agent::{actual_speed, KinematicsSource, NodeId, SyntheticKinematics};
use crate::analysis::{CentralityEvaluator, StateTriple, TrustVerdict, TrustVerifier, VerificationResult};
use crate::attack::{falsify, AttackRecord, AttackStrategy};
use crate::config::{CentralityBaseline, Config, TopologyRefresh};
use crate::export::{RecordInputs, RecordSink, TopologyRenderer, TrustRecord};
use crate::registry::AgentRegistry;
use crate::simulation::SimulationState;
use crate::topology::build_topology;

/// Outcome of one round
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: usize,
    /// The round began with an epoch reset
    pub reset: bool,
    pub attack: AttackRecord,
    /// Graph nodes after injection, decoys included
    pub nodes: Vec<NodeId>,
    pub records: Vec<TrustRecord>,
    /// Verification outcome of each record, in record order
    pub verifications: Vec<VerificationResult>,
    pub eigenvector_failed: bool,
}

impl RoundReport {
    pub fn malicious_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.trust_status == TrustVerdict::Malicious)
            .count()
    }
}

/// Top-level state machine of a run
pub struct RoundController {
    config: Config,
    registry: AgentRegistry,
    strategy: AttackStrategy,
    evaluator: CentralityEvaluator,
    verifier: TrustVerifier,
    kinematics: Box<dyn KinematicsSource>,
    state: SimulationState,
    round: usize,
}

impl RoundController {
    /// Controller over the configured roster with synthetic kinematics
    pub fn new(config: &Config, seed: u64) -> Self {
        Self::with_kinematics(config, seed, Box::new(SyntheticKinematics::new()))
    }

    /// Controller reading actual speeds from `kinematics`
    pub fn with_kinematics(config: &Config, seed: u64, mut kinematics: Box<dyn KinematicsSource>) -> Self {
        let registry = AgentRegistry::from_config(&config.swarm);
        let state = SimulationState::new(&registry, seed, &mut *kinematics);

        Self {
            strategy: AttackStrategy::from(config.attack.kind),
            evaluator: CentralityEvaluator::new(config.trust.eigenvector_max_iter),
            verifier: TrustVerifier::new(config.trust.threshold),
            config: config.clone(),
            registry,
            kinematics,
            state,
            round: 0,
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn strategy(&self) -> AttackStrategy {
        self.strategy
    }

    /// Index of the next round to run
    pub fn round(&self) -> usize {
        self.round
    }

    /// Run every remaining configured round
    pub fn run(&mut self, sink: &mut dyn RecordSink, renderer: &mut dyn TopologyRenderer) -> Result<Vec<RoundReport>> {
        let mut reports = Vec::with_capacity(self.config.general.rounds.saturating_sub(self.round));
        while self.round < self.config.general.rounds {
            reports.push(self.step(sink, renderer)?);
        }
        Ok(reports)
    }

    /// Run a single round
    pub fn step(&mut self, sink: &mut dyn RecordSink, renderer: &mut dyn TopologyRenderer) -> Result<RoundReport> {
        let round = self.round;
        info!("Round {}", round);

        // 1. Epoch reset
        let reset = round != 0 && round % self.config.general.epoch_length == 0;
        if reset {
            self.state
                .reset(&self.registry, &mut *self.kinematics, self.config.general.reset_attack_counts);
        }

        // 2. Topology
        let active = self.state.active().to_vec();
        let formation = self.strategy.formation();
        let mut graph = match self.config.topology.refresh {
            TopologyRefresh::EveryRound => None,
            TopologyRefresh::PerEpoch => self.state.graph.take(),
        }
        .unwrap_or_else(|| {
            build_topology(&self.registry, &active, formation, &self.config.topology, &mut self.state.rng)
        });

        // 3. Attack
        let attack = self.strategy.inject(
            round,
            &active,
            &mut graph,
            &mut self.state.decoys,
            &self.config.topology.decoy_weight,
            &mut self.state.rng,
        )?;
        for victim in &attack.victims {
            self.state.record_attack(victim);
        }

        // 4. Centrality
        let scores = self.evaluator.evaluate(&graph);

        // 5. Verification
        let mut records = Vec::with_capacity(active.len());
        let mut verifications = Vec::with_capacity(active.len());
        for agent in &active {
            let node = NodeId::Agent(agent.clone());
            let centrality = scores.get(&node);
            let telemetry = self.state.telemetry.get(agent)?;

            let reported_speed = match self.strategy {
                AttackStrategy::Baseline => actual_speed(&*self.kinematics, agent)?,
                _ => telemetry.speed,
            };
            let reported_centrality = match self.config.trust.centrality_baseline {
                CentralityBaseline::CurrentRound => centrality.degree,
                CentralityBaseline::PreviousRound => self
                    .state
                    .previous_degree
                    .get(agent)
                    .copied()
                    .unwrap_or(centrality.degree),
            };

            let predicted = StateTriple {
                speed: reported_speed,
                sensor_ok: 1,
                centrality: reported_centrality,
            };
            let observed = StateTriple {
                centrality: centrality.degree,
                ..predicted
            };
            let actual = if attack.is_victim(agent) {
                falsify(&observed, &mut self.state.rng)
            } else {
                observed
            };

            let verification = self.verifier.verify(&predicted, &actual);
            debug!("{}: {} {:?}", agent, verification.verdict, verification.delta);

            let neighbors = graph.neighbors(&node);
            verifications.push(verification);
            records.push(TrustRecord::new(RecordInputs {
                iteration: round,
                agent,
                neighbors: &neighbors,
                attack_label: attack.label(&node),
                centrality,
                telemetry,
                reported_speed,
                verification: &verification,
                times_attacked: self.state.attack_count(agent),
            }));
        }

        self.state.previous_degree = active
            .iter()
            .map(|a| (a.clone(), scores.get(&NodeId::Agent(a.clone())).degree))
            .collect();

        // 6. Export
        sink.append(&records)
            .wrap_err_with(|| format!("Failed to export records for round {}", round))?;

        // 7. Render
        renderer
            .render(round, &graph, &attack, &self.registry)
            .wrap_err_with(|| format!("Failed to render round {}", round))?;

        let nodes: Vec<NodeId> = graph.nodes().into_iter().cloned().collect();

        // 8. Removal
        for victim in &attack.victims {
            self.state.remove(victim);
            graph.remove_node(&NodeId::Agent(victim.clone()));
        }
        for decoy in &attack.decoys {
            graph.remove_node(&NodeId::Decoy(*decoy));
        }
        if !attack.victims.is_empty() {
            info!(
                "Removed {} agents ({} this epoch), {} remain active",
                attack.victims.len(),
                self.state.removed().len(),
                self.state.active().len()
            );
        }
        if self.config.topology.refresh == TopologyRefresh::PerEpoch {
            self.state.graph = Some(graph);
        }

        self.round += 1;
        Ok(RoundReport {
            round,
            reset,
            attack,
            nodes,
            eigenvector_failed: scores.eigenvector_failure.is_some(),
            records,
            verifications,
        })
    }
}
