//! Run summary reports.
//!
//! Generates both JSON and human-readable text summaries of a completed run.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{AttackKind, Config};
use crate::simulation::RoundReport;

/// Run-level metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub generated_at: String,
    pub attack: AttackKind,
    pub seed: u64,
    pub rounds: usize,
    pub epoch_length: usize,
    pub agents: usize,
}

/// Per-round digest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: usize,
    pub reset: bool,
    pub active: usize,
    pub victims: Vec<String>,
    pub decoys: Vec<String>,
    pub malicious: usize,
    pub eigenvector_failed: bool,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub metadata: SummaryMetadata,
    pub records_written: usize,
    pub trusted: usize,
    pub malicious: usize,
    pub eigenvector_failures: usize,
    pub rounds: Vec<RoundSummary>,
}

impl RunSummary {
    pub fn new(config: &Config, seed: u64, agents: usize) -> Self {
        Self {
            metadata: SummaryMetadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                attack: config.attack.kind,
                seed,
                rounds: config.general.rounds,
                epoch_length: config.general.epoch_length,
                agents,
            },
            records_written: 0,
            trusted: 0,
            malicious: 0,
            eigenvector_failures: 0,
            rounds: Vec::new(),
        }
    }

    /// Fold one round into the totals
    pub fn record(&mut self, report: &RoundReport) {
        let malicious = report.malicious_count();
        self.records_written += report.records.len();
        self.malicious += malicious;
        self.trusted += report.records.len() - malicious;
        if report.eigenvector_failed {
            self.eigenvector_failures += 1;
        }

        self.rounds.push(RoundSummary {
            round: report.round,
            reset: report.reset,
            active: report.records.len(),
            victims: report.attack.victims.iter().map(|v| v.to_string()).collect(),
            decoys: report.attack.decoys.iter().map(|d| d.to_string()).collect(),
            malicious,
            eigenvector_failed: report.eigenvector_failed,
        });
    }
}

/// Generate JSON summary
pub fn generate_json_summary(summary: &RunSummary, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)
        .context("Failed to serialize summary to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON summary to {}", output_path.display()))?;

    log::info!("JSON summary written to {}", output_path.display());
    Ok(())
}

/// Generate human-readable text summary
pub fn generate_text_summary(summary: &RunSummary, output_path: &Path) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();
    let meta = &summary.metadata;

    // Header
    lines.push("=".repeat(80));
    lines.push("                       SWARM TRUST EVALUATION SUMMARY".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!("Generated: {}", meta.generated_at));
    lines.push(format!("Attack: {}", meta.attack.as_str()));
    lines.push(format!("Seed: {}", meta.seed));
    lines.push(format!("Agents: {}", meta.agents));
    lines.push(format!("Rounds: {} (epoch length {})", meta.rounds, meta.epoch_length));
    lines.push(String::new());

    lines.push(format!("Records Written: {}", summary.records_written));
    lines.push(format!("  TRUSTED: {}", summary.trusted));
    lines.push(format!("  MALICIOUS: {}", summary.malicious));
    if summary.eigenvector_failures > 0 {
        lines.push(format!(
            "Eigenvector centrality failed to converge in {} rounds (logged as 0)",
            summary.eigenvector_failures
        ));
    }
    lines.push(String::new());

    lines.push("-".repeat(80));
    lines.push(format!(
        "{:<8}{:<8}{:<10}{:<30}{}",
        "Round", "Active", "Flagged", "Victims", "Decoys"
    ));
    lines.push("-".repeat(80));
    for round in &summary.rounds {
        let marker = if round.reset { "*" } else { "" };
        lines.push(format!(
            "{:<8}{:<8}{:<10}{:<30}{}",
            format!("{}{}", round.round, marker),
            round.active,
            round.malicious,
            round.victims.join(", "),
            round.decoys.join(", ")
        ));
    }
    lines.push(String::new());
    lines.push("* epoch reset".to_string());

    // Footer
    lines.push("=".repeat(80));

    let content = lines.join("\n");
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write text summary to {}", output_path.display()))?;

    log::info!("Text summary written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("\n=== SWARM TRUST EVALUATION SUMMARY ===\n");
    println!("Attack: {}", summary.metadata.attack.as_str());
    println!("Seed: {}", summary.metadata.seed);
    println!("Records: {}", summary.records_written);
    println!("  TRUSTED: {}", summary.trusted);
    println!("  MALICIOUS: {}", summary.malicious);
    if summary.eigenvector_failures > 0 {
        println!("Eigenvector failures: {}", summary.eigenvector_failures);
    }
    println!();
}
