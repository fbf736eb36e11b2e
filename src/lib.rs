pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod scoring;
pub mod services;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::domain::DayRecords;
use crate::services::DayPipeline;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_score(input: &Path) -> Result<()> {
    let records = load_day_records(input)?;
    let pipeline = DayPipeline::new(records, AppConfig::new());
    let results = pipeline.run()?;

    info!("=== Ranking ===");
    for (rank, team) in results.ranking().iter().enumerate() {
        info!(
            "{:>3}. [{}] {}: {:.1} pts (courses {:.1}, best-segment {:.1}, activities {:.1})",
            rank + 1,
            team.bib,
            team.name,
            team.totals.grand_total,
            team.totals.course_points,
            team.totals.best_segment_points,
            team.totals.activity_points
        );
    }
    Ok(())
}

pub fn handle_check(input: &Path) -> Result<()> {
    let records = load_day_records(input)?;
    let pipeline = DayPipeline::new(records, AppConfig::new());
    pipeline.check()?;
    Ok(())
}

fn load_day_records(input: &Path) -> Result<DayRecords> {
    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read day records from {}", input.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse day records from {}", input.display()))
}
