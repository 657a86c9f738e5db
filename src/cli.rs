//! Command-line interface for boardsim
//!
//! Runs a single headless round from a JSON scenario.

use clap::Parser;
use std::path::PathBuf;

/// Auto-battler board simulator
#[derive(Parser, Debug)]
#[command(name = "boardsim")]
#[command(about = "Auto-battler board simulator")]
#[command(version)]
pub struct Args {
    /// JSON scenario describing the units on the board
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Output path for the combat log (overrides the scenario's output_path)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum round duration in seconds (overrides the scenario)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// RON file with unit templates
    #[arg(long, value_name = "TEMPLATES", default_value = "assets/config/units.ron")]
    pub templates: PathBuf,
}

pub fn parse_args() -> Args {
    Args::parse()
}
