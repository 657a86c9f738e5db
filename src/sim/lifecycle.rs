//! Unit lifecycle
//!
//! Bench / BoardIdle / Combat transitions, the per-tick update gate, death,
//! the resets between rounds, and execution of deferred tasks.

use bevy::prelude::*;

use crate::combat::{CombatLogEventType, StateChanged, UnitDied};
use crate::constants::{NON_PLAYER_DESPAWN_DELAY, PLAYER_CORPSE_HIDE_DELAY};
use crate::units::{MontageSlot, Team, UnitId, UnitState};

use super::scheduler::{DeferredTask, TaskHandle};
use super::BattleWorld;

impl BattleWorld {
    /// Per-tick update for one unit. Only living, non-casting units in combat act.
    pub fn tick_unit(&mut self, id: UnitId, dt: f32) {
        let target_position = {
            let Some(unit) = self.roster.get_mut(id) else {
                return;
            };
            if !unit.is_alive || unit.state() != UnitState::Combat || unit.is_casting_ability {
                return;
            }
            if unit.attack_cooldown > 0.0 {
                unit.attack_cooldown = (unit.attack_cooldown - dt).max(0.0);
            }
            unit.current_target
        }
        .and_then(|t| self.roster.get(t))
        .map(|t| t.position);

        if let Some(position) = target_position {
            self.face_target(id, position, Some(dt));
        }

        self.think(id);
    }

    pub fn state(&self, id: UnitId) -> Option<UnitState> {
        self.roster.get(id).map(|u| u.state())
    }

    /// Move a unit to `new_state`. Returns false (and does nothing) if it is
    /// already there or the unit is unknown.
    pub fn set_state(&mut self, id: UnitId, new_state: UnitState) -> bool {
        {
            let Some(unit) = self.roster.get_mut(id) else {
                debug!("State change for unknown unit {} ignored", id);
                return false;
            };
            if unit.state == new_state {
                return false;
            }
            unit.state = new_state;

            match new_state {
                UnitState::Bench => {
                    unit.current_target = None;
                    unit.can_move = false;
                    unit.can_attack = false;
                }
                UnitState::BoardIdle | UnitState::Combat => {
                    unit.can_move = true;
                    unit.can_attack = true;
                    unit.attack_cooldown = 0.0;
                }
            }
        }

        match new_state {
            UnitState::Bench => {
                self.stop_movement(id);
                info!("{} benched", self.unit_name(id));
            }
            UnitState::BoardIdle => {
                info!("{} placed on board", self.unit_name(id));
            }
            UnitState::Combat => {
                let target = self
                    .roster
                    .get(id)
                    .and_then(|unit| self.selector.find_target(unit, &self.roster));
                if let Some(unit) = self.roster.get_mut(id) {
                    unit.current_target = target;
                }
                info!("{} entered combat", self.unit_name(id));
            }
        }

        let message = format!("{} entered {:?}", self.unit_name(id), new_state);
        self.log
            .record(CombatLogEventType::StateChange, Some(id), None, 0.0, message);
        self.observers.on_state_changed.notify(&StateChanged {
            unit: id,
            state: new_state,
        });
        true
    }

    /// Kill a unit. A second call on a dead unit does nothing.
    pub fn die(&mut self, id: UnitId) {
        let (team, killer, epoch) = {
            let Some(unit) = self.roster.get_mut(id) else {
                debug!("Death of unknown unit {} ignored", id);
                return;
            };
            if !unit.is_alive {
                return;
            }
            unit.is_alive = false;
            (unit.team, unit.last_damaged_by, unit.epoch)
        };

        let message = format!("{} died", self.unit_name(id));
        info!("{}", message);
        self.log
            .record(CombatLogEventType::Death, killer, Some(id), 0.0, message);
        self.observers.on_unit_death.notify(&UnitDied {
            unit: id,
            team,
            killer,
        });

        self.stop_movement(id);
        if let Some(unit) = self.roster.get_mut(id) {
            unit.current_target = None;
        }
        self.play_montage(id, MontageSlot::Death);
        if let Some(unit) = self.roster.get_mut(id) {
            unit.collision_enabled = false;
        }

        // Player units are recycled between rounds; everyone else is per-encounter
        let (delay, task) = match team {
            Team::Player => (PLAYER_CORPSE_HIDE_DELAY, DeferredTask::HideCorpse { unit: id, epoch }),
            Team::Enemy | Team::Neutral => {
                (NON_PLAYER_DESPAWN_DELAY, DeferredTask::Despawn { unit: id, epoch })
            }
        };
        let handle = self.scheduler.schedule_once(delay, task);
        if let Some(unit) = self.roster.get_mut(id) {
            unit.pending_tasks.push(handle);
        }
    }

    /// Restore a unit to full strength on the board for the next round.
    ///
    /// Pending deferred tasks are cancelled and the unit's epoch is bumped so
    /// anything already in flight is ignored. Returns false for unknown units
    /// (e.g. enemies that were already destroyed).
    pub fn reset_after_combat(&mut self, id: UnitId) -> bool {
        let pending = {
            let Some(unit) = self.roster.get_mut(id) else {
                warn!("Cannot reset unknown unit {}", id);
                return false;
            };
            unit.epoch = unit.epoch.wrapping_add(1);
            unit.visible = true;
            unit.collision_enabled = true;
            unit.is_alive = true;
            unit.current_health = unit.max_health;
            unit.current_mana = 0.0;
            unit.attack_cooldown = 0.0;
            unit.is_casting_ability = false;
            unit.current_target = None;
            unit.last_damaged_by = None;
            unit.damage_dealt = 0.0;
            unit.damage_taken = 0.0;
            std::mem::take(&mut unit.pending_tasks)
        };
        for handle in pending {
            self.scheduler.cancel(handle);
        }

        self.set_state(id, UnitState::BoardIdle);
        if let Some(unit) = self.roster.get_mut(id) {
            unit.collision_enabled = true;
        }

        let message = format!("{} reset for new round", self.unit_name(id));
        info!("{}", message);
        self.log
            .record(CombatLogEventType::MatchEvent, None, Some(id), 0.0, message);
        true
    }

    /// `reset_after_combat`, then back to the bench.
    pub fn full_reset_to_prep(&mut self, id: UnitId) -> bool {
        if !self.reset_after_combat(id) {
            return false;
        }
        self.set_state(id, UnitState::Bench);
        info!("{} fully reset to prep phase", self.unit_name(id));
        true
    }

    /// Run a task the scheduler reported as due. Stale tasks are dropped.
    pub(crate) fn run_deferred(&mut self, handle: TaskHandle, task: DeferredTask) {
        let id = task.unit();
        {
            let Some(unit) = self.roster.get_mut(id) else {
                debug!("Dropping {:?}: unit no longer exists", task);
                return;
            };
            unit.pending_tasks.retain(|h| *h != handle);
            if unit.epoch != task.epoch() {
                debug!("Dropping stale {:?} for {}", task, unit.name);
                return;
            }
        }

        match task {
            DeferredTask::FinishCast { .. } => {
                if let Some(unit) = self.roster.get_mut(id) {
                    unit.is_casting_ability = false;
                    info!("{} finished casting ability", unit.name);
                }
            }
            DeferredTask::HideCorpse { .. } => {
                let Some(unit) = self.roster.get_mut(id) else {
                    return;
                };
                if unit.is_alive {
                    return;
                }
                unit.visible = false;
                unit.collision_enabled = false;
                let message = format!("{} hidden after death", unit.name);
                info!("{}", message);
                self.log
                    .record(CombatLogEventType::Cleanup, None, Some(id), 0.0, message);
            }
            DeferredTask::Despawn { .. } => {
                if self.roster.get(id).map_or(true, |u| u.is_alive) {
                    return;
                }
                let message = format!("{} destroyed", self.unit_name(id));
                info!("{}", message);
                self.log
                    .record(CombatLogEventType::Cleanup, None, Some(id), 0.0, message);
                self.roster.remove(id);
            }
        }
    }
}
