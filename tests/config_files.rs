//! The bundled configuration files load and validate.

use std::path::Path;

use swarmtrust::config::{AttackKind, CentralityBaseline};
use swarmtrust::config_loader::load_config;
use swarmtrust::registry::AgentRegistry;

fn load(name: &str) -> swarmtrust::config::Config {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs").join(name);
    load_config(&path).unwrap()
}

#[test]
fn bundled_configs_are_valid() {
    let cases = [
        ("data_manipulation.yaml", AttackKind::StateFalsification, 9),
        ("sybil.yaml", AttackKind::IdentityForgery, 9),
        ("mitm.yaml", AttackKind::RelayInterception, 9),
        ("critical_node.yaml", AttackKind::StructuralTargeting, 9),
        ("baseline_large.yaml", AttackKind::Baseline, 30),
    ];

    for (name, kind, agents) in cases {
        let config = load(name);
        assert_eq!(config.attack.kind, kind, "{}", name);
        assert_eq!(AgentRegistry::from_config(&config.swarm).len(), agents, "{}", name);
    }
}

#[test]
fn baseline_config_lags_centrality() {
    let config = load("baseline_large.yaml");
    assert_eq!(config.trust.centrality_baseline, CentralityBaseline::PreviousRound);
    assert!(!config.output.render);
    assert_eq!(config.general.seed, None);
}
