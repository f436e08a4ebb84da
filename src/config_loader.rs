use crate::config::{AttackKind, Config};
use color_eyre::eyre::{Context, Result};
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    // Open the configuration file
    let file = File::open(config_path)
        .with_context(|| format!("Failed to open configuration file {}", config_path.display()))?;

    // Parse the YAML content
    let config: Config = serde_yaml::from_reader(file)
        .with_context(|| format!("Failed to parse configuration file {}", config_path.display()))?;

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub attack: Option<AttackKind>,
    pub rounds: Option<usize>,
    pub seed: Option<u64>,
    pub no_render: bool,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(attack) = overrides.attack {
        info!("Overriding attack kind: {}", attack.as_str());
        config.attack.kind = attack;
    }

    if let Some(rounds) = overrides.rounds {
        info!("Overriding round count: {}", rounds);
        config.general.rounds = rounds;
    }

    if let Some(seed) = overrides.seed {
        info!("Overriding seed: {}", seed);
        config.general.seed = Some(seed);
    }

    if overrides.no_render {
        config.output.render = false;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
