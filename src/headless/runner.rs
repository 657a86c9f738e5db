//! Headless round execution
//!
//! Runs a single board round without any graphical output, suitable for
//! automated testing and balance sweeps.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::combat::{CombatLogEventType, MatchMetadata, UnitDied, UnitMetadata};
use crate::constants::HEADLESS_TICK_SECS;
use crate::plugin::{BoardPlugin, BoardStep};
use crate::sim::BattleWorld;
use crate::units::{Team, Unit, UnitId, UnitState};

use super::adapters::{DirectMover, LoggingAnimator};
use super::config::ScenarioConfig;
use super::templates::UnitTemplates;

/// Distance between a team's row and the middle of the board
const ROW_OFFSET: f32 = 400.0;
/// Spacing between neighbouring slots on a row
const SLOT_SPACING: f32 = 200.0;
/// Maximum spawn jitter on each ground axis
const SPAWN_JITTER: f32 = 15.0;

/// Result of a completed headless round
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The side with units left standing, or None for a draw
    pub winner: Option<Team>,
    /// Round duration in seconds
    pub match_time: f32,
    /// Every unit that took part, in spawn order
    pub units: Vec<UnitResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

impl MatchResult {
    pub fn team(&self, team: Team) -> impl Iterator<Item = &UnitResult> {
        self.units.iter().filter(move |u| u.team == team)
    }
}

/// Statistics for a single unit after the round
#[derive(Debug, Clone)]
pub struct UnitResult {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub max_health: f32,
    /// Health remaining at round end (0 if dead)
    pub final_health: f32,
    pub survived: bool,
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

/// A unit as it was spawned. Enemies are destroyed shortly after dying, so
/// results are built from this list rather than the live roster.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub max_health: f32,
}

/// Seedable RNG for spawn placement
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.gen::<f32>() * (max - min)
    }
}

/// Resource to track headless round state
#[derive(Resource)]
pub struct HeadlessMatchState {
    /// Maximum round duration before declaring a draw
    pub max_duration: f32,
    pub elapsed_time: f32,
    /// Custom output path for the combat log
    pub output_path: Option<String>,
    pub match_complete: bool,
    pub random_seed: Option<u64>,
    pub participants: Vec<Participant>,
    /// Populated when the round completes
    pub result: Option<MatchResult>,
}

/// Default spawn point: each side on its own row, slots spread along x.
fn spawn_position(team: Team, column: f32, rng: &mut GameRng) -> Vec3 {
    let z = match team {
        Team::Player => -ROW_OFFSET,
        Team::Enemy => ROW_OFFSET,
        Team::Neutral => 0.0,
    };
    Vec3::new(
        column * SLOT_SPACING + rng.random_range(-SPAWN_JITTER, SPAWN_JITTER),
        0.0,
        z + rng.random_range(-SPAWN_JITTER, SPAWN_JITTER),
    )
}

fn rng_description(seed: Option<u64>) -> String {
    match seed {
        Some(seed) => format!("Using deterministic RNG with seed: {}", seed),
        None => "Using non-deterministic RNG (no seed provided)".to_string(),
    }
}

/// Build the world for a scenario. Every unit starts on the bench.
pub fn build_world(
    config: &ScenarioConfig,
    templates: &UnitTemplates,
) -> Result<(BattleWorld, Vec<Participant>), String> {
    config.validate(templates)?;

    info!("{}", rng_description(config.random_seed));
    let mut rng = match config.random_seed {
        Some(seed) => GameRng::from_seed(seed),
        None => GameRng::from_entropy(),
    };

    let mut world = BattleWorld::new()
        .with_movement(DirectMover::new())
        .with_animator(LoggingAnimator::default());

    let mut participants = Vec::with_capacity(config.units.len());
    for entry in &config.units {
        let template = templates
            .get(&entry.template)
            .ok_or_else(|| format!("unknown template '{}'", entry.template))?;

        let mut stats = template.stats.clone();
        if let Some(level) = entry.star_level {
            stats.star_level = level;
        }

        let team_size = config.units.iter().filter(|u| u.team == entry.team).count();
        let index_in_team = participants
            .iter()
            .filter(|p: &&Participant| p.team == entry.team)
            .count();
        let column = match entry.slot {
            Some(slot) => slot as f32,
            None => index_in_team as f32,
        } - (team_size as f32 - 1.0) / 2.0;

        let position = match entry.position {
            Some([x, y, z]) => Vec3::new(x, y, z),
            None => spawn_position(entry.team, column, &mut rng),
        };

        let mut unit = Unit::new(UnitId::from_raw(0), &stats, entry.team)
            .with_position(position)
            .with_team_id(entry.slot.unwrap_or(index_in_team as i32));
        if let Some(ability) = &template.ability {
            unit = unit.with_ability(ability.build());
        }

        let id = world.insert(unit);
        participants.push(Participant {
            id,
            name: stats.name.clone(),
            team: entry.team,
            max_health: stats.max_health,
        });
    }

    world.observers.on_unit_death.subscribe(|event: &UnitDied| {
        info!(
            "{} unit {} is down (killer: {:?})",
            event.team.name(),
            event.unit,
            event.killer
        );
    });

    Ok((world, participants))
}

/// Place every participant on the board and start the fight.
pub fn start_round(world: &mut BattleWorld, participants: &[Participant]) {
    world.log.clear();
    world.log.log(
        CombatLogEventType::MatchEvent,
        "Round started (headless mode)!".to_string(),
    );
    for participant in participants {
        world.set_state(participant.id, UnitState::BoardIdle);
    }
    for participant in participants {
        world.set_state(participant.id, UnitState::Combat);
    }
    info!("Headless round setup complete: {} units", participants.len());
}

/// `None` while the round is still running, otherwise the winner (None = draw).
///
/// Every team is hostile to every other, so the round runs until at most one
/// team has living units. Enemy and Neutral survivors keep fighting after the
/// player side falls.
pub fn round_outcome(world: &BattleWorld, elapsed: f32, max_duration: f32) -> Option<Option<Team>> {
    let mut standing = [Team::Player, Team::Enemy, Team::Neutral]
        .into_iter()
        .filter(|team| world.roster.alive_count(*team) > 0);
    let first = standing.next();
    let contested = standing.next().is_some();

    if contested {
        if elapsed >= max_duration {
            info!("Round timed out after {:.1}s - declaring DRAW", elapsed);
            return Some(None);
        }
        return None;
    }

    match first {
        Some(team) => info!("Round ended! {:?} side wins!", team),
        None => info!("Round ended in a DRAW (all sides eliminated)!"),
    }
    Some(first)
}

/// Build the MatchResult from the world as the round ended
pub fn build_match_result(
    world: &BattleWorld,
    participants: &[Participant],
    winner: Option<Team>,
    match_time: f32,
    random_seed: Option<u64>,
) -> MatchResult {
    let units = participants
        .iter()
        .map(|p| {
            let unit = world.unit(p.id);
            let survived = unit.map_or(false, |u| u.is_alive);
            UnitResult {
                id: p.id,
                name: p.name.clone(),
                team: p.team,
                max_health: p.max_health,
                final_health: if survived {
                    unit.map_or(0.0, |u| u.current_health)
                } else {
                    0.0
                },
                survived,
                damage_dealt: world.log.damage_dealt_by(p.id),
                damage_taken: world.log.damage_taken_by(p.id),
            }
        })
        .collect();

    MatchResult {
        winner,
        match_time,
        units,
        random_seed,
    }
}

fn match_metadata(result: &MatchResult) -> MatchMetadata {
    MatchMetadata {
        winner: result.winner.map(|t| t.name().to_string()),
        duration: result.match_time,
        units: result
            .units
            .iter()
            .map(|u| UnitMetadata {
                name: u.name.clone(),
                team: u.team.name().to_string(),
                max_health: u.max_health,
                final_health: u.final_health,
                survived: u.survived,
                damage_dealt: u.damage_dealt,
                damage_taken: u.damage_taken,
            })
            .collect(),
    }
}

/// Wrap up a finished round: save the log and recycle the player side.
fn finish_round(
    world: &mut BattleWorld,
    state: &mut HeadlessMatchState,
    winner: Option<Team>,
) -> MatchResult {
    let result = build_match_result(
        world,
        &state.participants,
        winner,
        state.elapsed_time,
        state.random_seed,
    );

    world.log.log(
        CombatLogEventType::MatchEvent,
        format!(
            "Round over after {:.1}s, winner: {}",
            result.match_time,
            result.winner.map_or("none", |t| t.name())
        ),
    );

    if let Some(path) = state.output_path.as_deref() {
        match world.log.save_to_file(&match_metadata(&result), Some(path)) {
            Ok(filename) => println!("Round complete. Log saved to: {}", filename),
            Err(e) => eprintln!("Failed to save combat log: {}", e),
        }
    }

    for participant in state.participants.iter().filter(|p| p.team == Team::Player) {
        world.reset_after_combat(participant.id);
    }

    state.result = Some(result.clone());
    state.match_complete = true;
    result
}

/// Run a round to completion without bevy, stepping at the headless tick.
pub fn simulate_round(
    world: &mut BattleWorld,
    participants: &[Participant],
    max_duration: f32,
) -> MatchResult {
    let mut state = HeadlessMatchState {
        max_duration,
        elapsed_time: 0.0,
        output_path: None,
        match_complete: false,
        random_seed: None,
        participants: participants.to_vec(),
        result: None,
    };

    start_round(world, participants);
    loop {
        world.tick(HEADLESS_TICK_SECS);
        state.elapsed_time += HEADLESS_TICK_SECS;
        if let Some(winner) = round_outcome(world, state.elapsed_time, state.max_duration) {
            return finish_round(world, &mut state, winner);
        }
    }
}

fn headless_start_round(mut world: ResMut<BattleWorld>, state: Res<HeadlessMatchState>) {
    start_round(&mut world, &state.participants);
}

/// Check if the round has ended (one side eliminated, or timeout)
fn headless_check_match_end(
    time: Res<Time>,
    mut world: ResMut<BattleWorld>,
    mut state: ResMut<HeadlessMatchState>,
) {
    if state.match_complete {
        return;
    }
    state.elapsed_time += time.delta_secs();

    if let Some(winner) = round_outcome(&world, state.elapsed_time, state.max_duration) {
        finish_round(&mut world, &mut state, winner);
    }
}

/// Exit the app when the round is complete
fn headless_exit_on_complete(state: Res<HeadlessMatchState>, mut exit: EventWriter<AppExit>) {
    if state.match_complete {
        exit.send(AppExit::Success);
    }
}

/// Build a bevy app that plays the scenario at a fixed 1/60 s step.
///
/// Call [`run_to_completion`] to drive it.
pub fn build_headless_app(config: &ScenarioConfig, templates: &UnitTemplates) -> Result<App, String> {
    let (world, participants) = build_world(config, templates)?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            HEADLESS_TICK_SECS,
        )))
        .insert_resource(world)
        .add_plugins(BoardPlugin)
        .insert_resource(HeadlessMatchState {
            max_duration: config.max_duration_secs,
            elapsed_time: 0.0,
            output_path: config.output_path.clone(),
            match_complete: false,
            random_seed: config.random_seed,
            participants,
            result: None,
        })
        .add_systems(Startup, headless_start_round)
        .add_systems(Update, headless_check_match_end.after(BoardStep))
        .add_systems(PostUpdate, headless_exit_on_complete);
    Ok(app)
}

/// Update the app frame by frame until the round produces a result.
pub fn run_to_completion(app: &mut App) -> Result<MatchResult, String> {
    app.finish();
    app.cleanup();

    let max_duration = app.world().resource::<HeadlessMatchState>().max_duration;
    // One spare second of frames on top of the timeout
    let max_frames = ((max_duration + 1.0) / HEADLESS_TICK_SECS).ceil() as usize;

    for _ in 0..max_frames {
        app.update();
        if let Some(result) = &app.world().resource::<HeadlessMatchState>().result {
            return Ok(result.clone());
        }
    }
    Err(format!("round did not finish within {} frames", max_frames))
}

/// Run a headless round with the given scenario
pub fn run_headless_match(
    config: ScenarioConfig,
    templates: &UnitTemplates,
) -> Result<MatchResult, String> {
    println!("Starting headless round simulation...");
    for unit in &config.units {
        println!("  {:?}: {}", unit.team, unit.template);
    }
    println!("  Max duration: {:.0}s", config.max_duration_secs);
    // build_world runs before LogPlugin is installed, so its seed line is lost
    println!("  {}", rng_description(config.random_seed));

    let mut app = build_headless_app(&config, templates)?;
    app.add_plugins(LogPlugin::default());
    run_to_completion(&mut app)
}
