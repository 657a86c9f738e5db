//! Battle simulation
//!
//! `BattleWorld` owns the roster and every collaborator, and exposes the unit
//! operations as methods addressed by `UnitId`:
//! - `engine`: think loop, auto-attacks, damage, mana, casting
//! - `lifecycle`: per-tick update, state transitions, death, resets, deferred tasks
//!
//! One call to [`BattleWorld::tick`] advances the whole board by `dt` seconds.

pub mod ability;
pub mod collaborators;
pub mod engine;
pub mod lifecycle;
pub mod scheduler;

use bevy::prelude::*;

use crate::combat::{CombatLog, UnitObservers};
use crate::units::{NearestEnemy, Team, TargetSelector, Unit, UnitId, UnitRoster, UnitStats};

pub use ability::{AbilityConfig, AbilityEffect, TargetStrike};
pub use collaborators::{Animator, Movement, NullAnimator, NullMovement};
pub use scheduler::{DeferredTask, Scheduler, TaskHandle, TickScheduler};

#[derive(Resource)]
pub struct BattleWorld {
    pub roster: UnitRoster,
    pub observers: UnitObservers,
    pub log: CombatLog,
    selector: Box<dyn TargetSelector>,
    scheduler: Box<dyn Scheduler>,
    movement: Box<dyn Movement>,
    animator: Box<dyn Animator>,
}

impl Default for BattleWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleWorld {
    /// World with nearest-enemy targeting, the tick scheduler, and no-op presentation.
    pub fn new() -> Self {
        Self {
            roster: UnitRoster::new(),
            observers: UnitObservers::default(),
            log: CombatLog::default(),
            selector: Box::new(NearestEnemy),
            scheduler: Box::new(TickScheduler::new()),
            movement: Box::new(NullMovement),
            animator: Box::new(NullAnimator),
        }
    }

    pub fn with_movement(mut self, movement: impl Movement + 'static) -> Self {
        self.movement = Box::new(movement);
        self
    }

    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Box::new(animator);
        self
    }

    pub fn with_selector(mut self, selector: impl TargetSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }

    /// Add a benched unit built from `stats`
    pub fn spawn(&mut self, stats: &UnitStats, team: Team) -> UnitId {
        let id = self.roster.spawn(stats, team);
        debug!("Spawned {} {} for team {}", stats.name, id, team.name());
        id
    }

    /// Add a unit built by the caller (position, ability, slot already set)
    pub fn insert(&mut self, unit: Unit) -> UnitId {
        self.roster.insert(unit)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.roster.get(id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.roster.get_mut(id)
    }

    /// Name for log lines; stale ids print as their id
    pub(crate) fn unit_name(&self, id: UnitId) -> String {
        self.roster
            .get(id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| format!("unit {}", id))
    }

    /// Number of deferred tasks still waiting to fire
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Advance the whole board by `dt` seconds.
    ///
    /// Order within a tick: due deferred tasks fire, the movement collaborator
    /// integrates, then every unit updates in roster order.
    pub fn tick(&mut self, dt: f32) {
        self.log.match_time += dt;

        for (handle, task) in self.scheduler.advance(dt) {
            self.run_deferred(handle, task);
        }

        self.movement.integrate(&mut self.roster, dt);

        for id in self.roster.ids() {
            self.tick_unit(id, dt);
        }

        #[cfg(debug_assertions)]
        for unit in self.roster.iter() {
            unit.debug_validate();
        }
    }
}
