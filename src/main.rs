//! boardsim - Auto-battler board simulator
//!
//! Plays one headless round from a JSON scenario and prints the outcome.

use std::process::ExitCode;

use boardsim::cli;
use boardsim::headless::{run_headless_match, MatchResult, ScenarioConfig, UnitTemplates};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let templates = match UnitTemplates::load_from_file(&args.templates) {
        Ok(templates) => templates,
        Err(e) => {
            eprintln!("Error loading unit templates: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut config = match ScenarioConfig::load_from_file(&args.scenario) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading scenario: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // CLI flags take precedence over the scenario file
    if let Some(output) = args.output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }

    match run_headless_match(config, &templates) {
        Ok(result) => {
            print_summary(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Headless round failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_summary(result: &MatchResult) {
    match result.winner {
        Some(team) => println!("Winner: {} ({:.1}s)", team.name(), result.match_time),
        None => println!("Draw ({:.1}s)", result.match_time),
    }
    for unit in &result.units {
        println!(
            "  [{}] {:<12} {:>6.0}/{:<6.0} dealt {:>7.1} taken {:>7.1}{}",
            unit.team.name(),
            unit.name,
            unit.final_health,
            unit.max_health,
            unit.damage_dealt,
            unit.damage_taken,
            if unit.survived { "" } else { "  (dead)" }
        );
    }
}
