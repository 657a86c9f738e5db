//! Unit data
//!
//! `UnitStats` is the static, data-driven part of a unit (loaded from
//! templates). `Unit` adds the dynamic combat state the simulation mutates.

use std::fmt;
use std::sync::Arc;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::*;
use crate::sim::ability::AbilityEffect;
use crate::sim::scheduler::TaskHandle;

/// Stable identifier for a unit in the roster.
///
/// Ids are never reused, so an id held after its unit was destroyed simply
/// resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u32);

impl UnitId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Player,
    Enemy,
    Neutral,
}

impl Team {
    pub fn name(&self) -> &'static str {
        match self {
            Team::Player => "Player",
            Team::Enemy => "Enemy",
            Team::Neutral => "Neutral",
        }
    }
}

/// Lifecycle state of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitState {
    /// Off the board; not a combat participant
    #[default]
    Bench,
    /// Placed on the board, waiting for the round to start
    BoardIdle,
    /// Fighting
    Combat,
}

/// Animation clips the core asks the presentation layer to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MontageSlot {
    Attack,
    Ability,
    Death,
}

/// Clip names per montage slot. A missing clip means nothing is played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MontageSet {
    #[serde(default)]
    pub attack: Option<String>,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub death: Option<String>,
}

impl MontageSet {
    pub fn clip(&self, slot: MontageSlot) -> Option<&str> {
        match slot {
            MontageSlot::Attack => self.attack.as_deref(),
            MontageSlot::Ability => self.ability.as_deref(),
            MontageSlot::Death => self.death.as_deref(),
        }
    }
}

/// Static attributes of a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub name: String,
    #[serde(default = "default_star_level")]
    pub star_level: u32,
    #[serde(default = "default_max_health")]
    pub max_health: f32,
    #[serde(default = "default_max_mana")]
    pub max_mana: f32,
    #[serde(default = "default_attack_damage")]
    pub attack_damage: f32,
    /// Attacks per second
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f32,
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
    #[serde(default)]
    pub armor: f32,
    #[serde(default)]
    pub magic_resist: f32,
    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,
    #[serde(default)]
    pub montages: MontageSet,
}

fn default_star_level() -> u32 {
    1
}
fn default_max_health() -> f32 {
    DEFAULT_MAX_HEALTH
}
fn default_max_mana() -> f32 {
    DEFAULT_MAX_MANA
}
fn default_attack_damage() -> f32 {
    DEFAULT_ATTACK_DAMAGE
}
fn default_attack_speed() -> f32 {
    DEFAULT_ATTACK_SPEED
}
fn default_attack_range() -> f32 {
    DEFAULT_ATTACK_RANGE
}
fn default_movement_speed() -> f32 {
    DEFAULT_MOVEMENT_SPEED
}
fn default_stopping_distance() -> f32 {
    DEFAULT_STOPPING_DISTANCE
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            name: "Unit".to_string(),
            star_level: default_star_level(),
            max_health: DEFAULT_MAX_HEALTH,
            max_mana: DEFAULT_MAX_MANA,
            attack_damage: DEFAULT_ATTACK_DAMAGE,
            attack_speed: DEFAULT_ATTACK_SPEED,
            attack_range: DEFAULT_ATTACK_RANGE,
            armor: 0.0,
            magic_resist: 0.0,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            stopping_distance: DEFAULT_STOPPING_DISTANCE,
            montages: MontageSet::default(),
        }
    }
}

impl UnitStats {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check the invariants a template must satisfy before units are built from it.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("unit name must not be empty".to_string());
        }
        if self.star_level < 1 {
            return Err(format!("{}: star_level must be at least 1", self.name));
        }
        if self.max_health <= 0.0 {
            return Err(format!("{}: max_health must be positive", self.name));
        }
        if self.max_mana < 0.0 {
            return Err(format!("{}: max_mana must not be negative", self.name));
        }
        if self.attack_speed <= 0.0 {
            return Err(format!("{}: attack_speed must be positive", self.name));
        }
        if self.attack_range < 0.0 || self.stopping_distance < 0.0 {
            return Err(format!("{}: ranges must not be negative", self.name));
        }
        if self.armor < 0.0 || self.magic_resist < 0.0 {
            return Err(format!("{}: armor and magic_resist must not be negative", self.name));
        }
        Ok(())
    }
}

/// One combat participant: static stats plus everything that changes during a round.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub star_level: u32,
    pub team: Team,
    /// Slot on the owning team's board
    pub team_id: i32,

    pub max_health: f32,
    pub current_health: f32,
    pub max_mana: f32,
    pub current_mana: f32,

    pub attack_damage: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub armor: f32,
    pub magic_resist: f32,
    pub movement_speed: f32,
    pub stopping_distance: f32,

    pub is_alive: bool,
    pub can_move: bool,
    pub can_attack: bool,
    pub is_casting_ability: bool,

    /// Weak reference into the roster; resolve it before use
    pub current_target: Option<UnitId>,
    /// Seconds until the next auto-attack
    pub attack_cooldown: f32,
    pub(crate) state: UnitState,

    pub position: Vec3,
    /// Heading around the Y axis, in radians
    pub yaw: f32,
    pub visible: bool,
    pub collision_enabled: bool,

    pub montages: MontageSet,
    /// Gameplay effect run when the unit casts. None = animation only.
    pub ability: Option<Arc<dyn AbilityEffect>>,

    pub last_damaged_by: Option<UnitId>,
    pub damage_dealt: f32,
    pub damage_taken: f32,

    /// Bumped on reset; deferred tasks carrying an older epoch are stale
    pub(crate) epoch: u32,
    pub(crate) pending_tasks: SmallVec<[TaskHandle; 2]>,
}

impl Unit {
    /// Build a benched unit with full health and no mana.
    pub fn new(id: UnitId, stats: &UnitStats, team: Team) -> Self {
        Self {
            id,
            name: stats.name.clone(),
            star_level: stats.star_level.max(1),
            team,
            team_id: 0,
            max_health: stats.max_health,
            current_health: stats.max_health,
            max_mana: stats.max_mana,
            current_mana: 0.0,
            attack_damage: stats.attack_damage,
            attack_speed: stats.attack_speed,
            attack_range: stats.attack_range,
            armor: stats.armor,
            magic_resist: stats.magic_resist,
            movement_speed: stats.movement_speed,
            stopping_distance: stats.stopping_distance,
            is_alive: true,
            can_move: false,
            can_attack: false,
            is_casting_ability: false,
            current_target: None,
            attack_cooldown: 0.0,
            state: UnitState::Bench,
            position: Vec3::ZERO,
            yaw: 0.0,
            visible: true,
            collision_enabled: true,
            montages: stats.montages.clone(),
            ability: None,
            last_damaged_by: None,
            damage_dealt: 0.0,
            damage_taken: 0.0,
            epoch: 0,
            pending_tasks: SmallVec::new(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_team_id(mut self, team_id: i32) -> Self {
        self.team_id = team_id;
        self
    }

    pub fn with_ability(mut self, ability: Arc<dyn AbilityEffect>) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Whether another unit may currently pick this one as a target.
    pub fn is_targetable(&self) -> bool {
        self.is_alive && self.state == UnitState::Combat
    }

    /// Whether a unit already holding this one as its target may keep it.
    pub fn is_valid_held_target(&self) -> bool {
        self.is_alive && self.state != UnitState::Bench
    }

    pub fn distance_to(&self, other: &Unit) -> f32 {
        self.position.distance(other.position)
    }

    /// Validate that all unit invariants hold.
    ///
    /// In debug builds, this panics on invariant violations.
    /// In release builds, this is a no-op.
    #[inline]
    pub fn debug_validate(&self) {
        debug_assert!(
            self.current_health >= 0.0 && self.current_health <= self.max_health,
            "{}: health {} outside 0..={}",
            self.name,
            self.current_health,
            self.max_health
        );
        debug_assert!(
            self.current_mana >= 0.0,
            "{}: mana cannot be negative: {}",
            self.name,
            self.current_mana
        );
        debug_assert!(
            self.attack_cooldown >= 0.0,
            "{}: attack cooldown cannot be negative: {}",
            self.name,
            self.attack_cooldown
        );
        debug_assert!(
            self.state != UnitState::Bench || self.current_target.is_none(),
            "{}: benched unit holds a target",
            self.name
        );
    }
}
