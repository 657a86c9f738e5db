//! Integration tests for headless round execution
//!
//! These tests verify that:
//! - Templates and scenarios load and validate
//! - Headless rounds run to completion, with bevy and without
//! - Round results are accessible programmatically
//! - Seeded RNG produces deterministic results

use std::path::Path;

use boardsim::headless::{
    build_headless_app, build_world, run_to_completion, simulate_round, ScenarioConfig,
    UnitTemplates,
};
use boardsim::units::{Team, UnitState};

const TEMPLATES: &str = r#"(
    templates: {
        "Champion": (
            stats: (name: "Champion", max_health: 500.0, attack_damage: 60.0, armor: 20.0),
            ability: Some(Strike(name: "Cleave", amount: 80.0, kind: Physical)),
        ),
        "Dummy": (
            stats: (name: "Dummy"),
        ),
        "Pacifist": (
            stats: (name: "Pacifist", attack_damage: 0.0),
        ),
    },
)"#;

fn templates() -> UnitTemplates {
    UnitTemplates::from_ron_str(TEMPLATES).unwrap()
}

/// Champion and dummy standing next to each other
fn duel_config() -> ScenarioConfig {
    ScenarioConfig::from_json_str(
        r#"{
            "units": [
                {"template": "Champion", "team": "Player", "position": [0.0, 0.0, 0.0]},
                {"template": "Dummy", "team": "Enemy", "position": [0.0, 0.0, 100.0]}
            ],
            "max_duration_secs": 30,
            "random_seed": 3
        }"#,
    )
    .unwrap()
}

#[test]
fn test_default_templates_file_loads() {
    let templates = UnitTemplates::default();

    for name in ["Knight", "Archer", "Pyromancer", "Brute"] {
        let template = templates.get(name).unwrap();
        assert_eq!(template.stats.name, name);
        assert!(template.ability.is_some(), "{} should have an ability", name);
    }
}

#[test]
fn test_demo_scenario_matches_templates() {
    let templates = UnitTemplates::load_from_file(Path::new("assets/config/units.ron")).unwrap();
    let config = ScenarioConfig::load_from_file(Path::new("demos/skirmish.json")).unwrap();

    assert!(config.validate(&templates).is_ok());
    assert_eq!(config.random_seed, Some(7));
}

#[test]
fn test_unknown_template_is_rejected() {
    let config = ScenarioConfig::from_json_str(
        r#"{"units": [
            {"template": "Champion", "team": "Player"},
            {"template": "Dragon", "team": "Enemy"}
        ]}"#,
    )
    .unwrap();

    let err = config.validate(&templates()).unwrap_err();
    assert!(err.contains("Dragon"));
    assert!(build_world(&config, &templates()).is_err());
}

#[test]
fn test_units_spawn_benched_with_abilities() {
    let (world, participants) = build_world(&duel_config(), &templates()).unwrap();

    assert_eq!(participants.len(), 2);
    let champion = world.unit(participants[0].id).unwrap();
    assert_eq!(champion.state(), UnitState::Bench);
    assert_eq!(champion.team, Team::Player);
    assert!(champion.ability.is_some());
    assert!(world.unit(participants[1].id).unwrap().ability.is_none());
}

#[test]
fn test_simulated_round_has_winner() {
    let (mut world, participants) = build_world(&duel_config(), &templates()).unwrap();

    let result = simulate_round(&mut world, &participants, 30.0);

    assert_eq!(result.winner, Some(Team::Player));
    assert!(result.match_time > 0.5 && result.match_time < 3.0);

    let champion = &result.units[0];
    let dummy = &result.units[1];
    assert!(champion.survived);
    assert!(champion.final_health < champion.max_health);
    assert!(champion.damage_dealt >= 100.0);
    assert!(!dummy.survived);
    assert_eq!(dummy.final_health, 0.0);
    assert_eq!(result.team(Team::Enemy).count(), 1);
}

#[test]
fn test_player_side_is_reset_after_round() {
    let (mut world, participants) = build_world(&duel_config(), &templates()).unwrap();

    simulate_round(&mut world, &participants, 30.0);

    let champion = world.unit(participants[0].id).unwrap();
    assert!(champion.is_alive);
    assert_eq!(champion.current_health, champion.max_health);
    assert_eq!(champion.current_mana, 0.0);
    assert_eq!(champion.state(), UnitState::BoardIdle);
}

#[test]
fn test_round_times_out_as_draw() {
    let config = ScenarioConfig::from_json_str(
        r#"{
            "units": [
                {"template": "Pacifist", "team": "Player", "position": [0.0, 0.0, 0.0]},
                {"template": "Pacifist", "team": "Enemy", "position": [0.0, 0.0, 100.0]}
            ],
            "max_duration_secs": 3
        }"#,
    )
    .unwrap();
    let (mut world, participants) = build_world(&config, &templates()).unwrap();

    let result = simulate_round(&mut world, &participants, config.max_duration_secs);

    assert_eq!(result.winner, None);
    assert!((result.match_time - 3.0).abs() < 0.05);
    assert!(result.units.iter().all(|u| u.survived));
}

#[test]
fn test_seeded_rounds_are_deterministic() {
    let config = ScenarioConfig::from_json_str(
        r#"{
            "units": [
                {"template": "Champion", "team": "Player", "slot": 0},
                {"template": "Dummy", "team": "Enemy", "slot": 0},
                {"template": "Dummy", "team": "Enemy", "slot": 1}
            ],
            "max_duration_secs": 60,
            "random_seed": 42
        }"#,
    )
    .unwrap();

    let run = || {
        let (mut world, participants) = build_world(&config, &templates()).unwrap();
        let start: Vec<_> = participants
            .iter()
            .map(|p| world.unit(p.id).unwrap().position)
            .collect();
        (start, simulate_round(&mut world, &participants, config.max_duration_secs))
    };
    let (start_a, a) = run();
    let (start_b, b) = run();

    assert_eq!(start_a, start_b);
    assert_eq!(a.winner, b.winner);
    assert_eq!(a.match_time, b.match_time);
    for (x, y) in a.units.iter().zip(&b.units) {
        assert_eq!(x.final_health, y.final_health);
        assert_eq!(x.damage_dealt, y.damage_dealt);
    }
}

#[test]
fn test_bevy_app_runs_round_and_writes_log() {
    let mut config = duel_config();
    let path = std::env::temp_dir().join(format!("boardsim_headless_{}.txt", std::process::id()));
    config.output_path = Some(path.to_string_lossy().into_owned());

    let mut app = build_headless_app(&config, &templates()).unwrap();
    let result = run_to_completion(&mut app).unwrap();

    assert_eq!(result.winner, Some(Team::Player));
    assert_eq!(result.random_seed, Some(3));
    let report = std::fs::read_to_string(&path).unwrap();
    assert!(report.starts_with("# boardsim combat log"));
    assert!(report.contains("Dummy died"));
    std::fs::remove_file(&path).unwrap();
}
