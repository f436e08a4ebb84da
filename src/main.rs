use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use swarmtrust::config::{AttackKind, Config};
use swarmtrust::config_loader::{self, CliOverrides};
use swarmtrust::export::print_summary;
use swarmtrust::orchestrator;

/// Trust-evaluation and attack-injection engine for drone swarm datasets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the simulation configuration YAML file (defaults apply if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the dataset, renderings and summary
    #[arg(short, long, default_value = "swarmtrust_output")]
    output: PathBuf,

    /// Attack scenario, overriding the configuration
    #[arg(short, long, value_enum)]
    attack: Option<AttackKind>,

    /// Number of rounds, overriding the configuration
    #[arg(long)]
    rounds: Option<usize>,

    /// RNG seed, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent runs (seeds seed, seed+1, ...)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    runs: u64,

    /// Number of parallel workers for sweeps (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Skip the per-round DOT renderings
    #[arg(long)]
    no_render: bool,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration before logging so general.log_level can apply
    let mut config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => Config::default(),
    };

    let level = args
        .log_level
        .clone()
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("Starting SwarmTrust");
    match &args.config {
        Some(path) => info!("Configuration file: {:?}", path),
        None => info!("No configuration file given; using defaults"),
    }
    info!("Output directory: {:?}", args.output);

    let overrides = CliOverrides {
        attack: args.attack,
        rounds: args.rounds,
        seed: args.seed,
        no_render: args.no_render,
    };
    config_loader::apply_overrides(&mut config, &overrides)?;

    // Set thread pool size
    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .wrap_err("Failed to configure thread pool")?;
    }

    if args.runs > 1 {
        let summaries = orchestrator::run_sweep(&config, &args.output, args.runs as usize)?;
        for summary in &summaries {
            print_summary(summary);
        }
        info!("Sweep of {} runs complete", summaries.len());
    } else {
        let summary = orchestrator::run_simulation(&config, &args.output)?;
        print_summary(&summary);
    }

    Ok(())
}
