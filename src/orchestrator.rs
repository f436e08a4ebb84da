//! Simulation orchestrator.
//!
//! This module coordinates a complete run: seed resolution, the output
//! directory layout, sink and renderer wiring, the round loop and the final
//! summary. Parameter sweeps run independent seeded simulations in parallel.
//!
//! Output layout of a single run:
//!
//! ```text
//! <output>/
//!   trust_log.csv      dataset (name from output.csv_name)
//!   rounds/round_N.dot per-round renderings (unless disabled)
//!   summary.json
//!   summary.txt
//! ```
//!
//! A sweep of `N` runs writes one such directory per run under
//! `<output>/run_000 .. run_<N-1>`.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use log::info;
use rayon::prelude::*;

use crate::config::Config;
use crate::export::{
    generate_json_summary, generate_text_summary, CsvSink, DotRenderer, NullRenderer, RunSummary,
    TopologyRenderer,
};
use crate::simulation::RoundController;

/// The configured seed, or a random one that is logged for replay
pub fn resolve_seed(config: &Config) -> u64 {
    match config.general.seed {
        Some(seed) => seed,
        None => {
            let seed: u64 = rand::random();
            info!("No seed configured; using {}", seed);
            seed
        }
    }
}

/// Run one simulation and write its dataset, renderings and summary
///
/// # Arguments
/// * `config` - Validated configuration
/// * `output_dir` - Directory receiving every artifact of the run
///
/// # Returns
/// The run summary
pub fn run_simulation(config: &Config, output_dir: &Path) -> Result<RunSummary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let seed = resolve_seed(config);
    let mut controller = RoundController::new(config, seed);
    info!(
        "Running {} rounds of {} over {} agents (seed {})",
        config.general.rounds,
        config.attack.kind.as_str(),
        controller.registry().len(),
        seed
    );

    let mut sink = CsvSink::create(&output_dir.join(&config.output.csv_name))?;
    let mut renderer: Box<dyn TopologyRenderer> = if config.output.render {
        Box::new(DotRenderer::new(&output_dir.join("rounds"))?)
    } else {
        Box::new(NullRenderer)
    };

    let reports = controller.run(&mut sink, &mut *renderer)?;

    let mut summary = RunSummary::new(config, seed, controller.registry().len());
    for report in &reports {
        summary.record(report);
    }
    info!("Wrote {} records to {}", sink.written(), sink.path().display());

    generate_json_summary(&summary, &output_dir.join("summary.json"))?;
    generate_text_summary(&summary, &output_dir.join("summary.txt"))?;

    Ok(summary)
}

/// Run `runs` independent simulations in parallel with seeds `seed + i`
pub fn run_sweep(config: &Config, output_dir: &Path, runs: usize) -> Result<Vec<RunSummary>> {
    let base_seed = resolve_seed(config);
    info!("Sweeping {} runs from seed {}", runs, base_seed);

    (0..runs)
        .into_par_iter()
        .map(|i| {
            let mut run_config = config.clone();
            run_config.general.seed = Some(base_seed.wrapping_add(i as u64));
            let run_dir = output_dir.join(format!("run_{:03}", i));
            run_simulation(&run_config, &run_dir)
                .wrap_err_with(|| format!("Run {} failed", i))
        })
        .collect()
}
