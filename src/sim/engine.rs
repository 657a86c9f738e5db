//! Combat Engine
//!
//! Per-unit reasoning and combat resolution:
//! - Think (target validation, approach, cast, auto-attack)
//! - Auto-attacks and damage application
//! - Mana gain and ability casting

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use crate::combat::{reduce, AttackPerformed, CombatLogEventType, DamageEvent, DamageKind};
use crate::constants::{
    ABILITY_CAST_DURATION, ATTACK_MANA_GAIN, DAMAGE_TAKEN_MANA_GAIN, FACING_INTERP_SPEED,
};
use crate::units::{MontageSlot, UnitId, UnitState};

use super::scheduler::DeferredTask;
use super::BattleWorld;

/// What `think` decided after looking at the current target
enum Decision {
    Retarget,
    Approach,
    Engage,
}

impl BattleWorld {
    /// One round of decision making for a unit in combat.
    ///
    /// The caller is responsible for only invoking this on living, non-casting
    /// units in `Combat` (see `tick_unit`).
    pub fn think(&mut self, id: UnitId) {
        let decision = {
            let Some(unit) = self.roster.get(id) else {
                debug!("Think for unknown unit {} skipped", id);
                return;
            };
            if unit.current_health <= 0.0 {
                return;
            }

            let target = unit
                .current_target
                .and_then(|t| self.roster.get(t))
                .filter(|t| t.is_valid_held_target());

            match target {
                None => Decision::Retarget,
                Some(target) if unit.distance_to(target) > unit.attack_range => Decision::Approach,
                Some(_) => Decision::Engage,
            }
        };

        match decision {
            Decision::Retarget => {
                self.find_new_target(id);
            }
            Decision::Approach => {
                self.move_to_target(id);
            }
            Decision::Engage => {
                self.stop_movement(id);

                if let Some(unit) = self.roster.get(id) {
                    if unit.current_mana >= unit.max_mana {
                        self.cast_ability(id);
                    }
                }

                // The cast may have changed things, so re-read
                let ready = self
                    .roster
                    .get(id)
                    .map_or(false, |u| u.attack_cooldown <= 0.0 && u.can_attack);
                if ready {
                    self.auto_attack(id);
                }
            }
        }
    }

    /// Replace the unit's target with whatever the selector picks.
    pub fn find_new_target(&mut self, id: UnitId) -> Option<UnitId> {
        let found = {
            let unit = self.roster.get(id)?;
            self.selector.find_target(unit, &self.roster)
        };

        if let Some(unit) = self.roster.get_mut(id) {
            unit.current_target = found;
            unit.attack_cooldown = 0.0;
        }

        match found {
            Some(target) => info!(
                "{} found new target: {}",
                self.unit_name(id),
                self.unit_name(target)
            ),
            None => warn!("{} could not find a target", self.unit_name(id)),
        }
        found
    }

    /// Swing at the current target.
    ///
    /// Rejected with a warning if the target is gone, dead, or benched.
    pub fn auto_attack(&mut self, id: UnitId) {
        let (target_id, target_position, damage) = {
            let Some(unit) = self.roster.get(id) else {
                debug!("Attack by unknown unit {} dropped", id);
                return;
            };
            let target = unit.current_target.and_then(|t| self.roster.get(t));
            match target {
                Some(target) if target.is_alive && target.state() != UnitState::Bench => {
                    (target.id, target.position, unit.attack_damage)
                }
                Some(target) if target.is_alive => {
                    warn!("{} tried to attack benched target {}", unit.name, target.name);
                    return;
                }
                _ => {
                    warn!("{} tried to attack invalid target", unit.name);
                    return;
                }
            }
        };

        self.face_target(id, target_position, None);
        self.play_montage(id, MontageSlot::Attack);
        self.apply_damage(target_id, DamageEvent::new(damage, DamageKind::Physical, Some(id)));

        // The hit can trigger a retaliating cast that kills the attacker
        if !self.roster.get(id).map_or(false, |u| u.is_alive) {
            debug!("{} died mid-swing", self.unit_name(id));
            return;
        }
        self.gain_mana(id, ATTACK_MANA_GAIN);

        if let Some(unit) = self.roster.get_mut(id) {
            unit.attack_cooldown = 1.0 / unit.attack_speed;
        }

        let message = format!(
            "{} attacked {} for {:.1} damage",
            self.unit_name(id),
            self.unit_name(target_id),
            damage
        );
        info!("{}", message);
        self.log
            .record(CombatLogEventType::Attack, Some(id), Some(target_id), damage, message);
        self.observers.on_attack.notify(&AttackPerformed {
            unit: id,
            target: target_id,
        });
    }

    /// Build a damage event from `source` and apply it to `target`.
    pub fn deal_damage(&mut self, source: UnitId, target: UnitId, amount: f32, kind: DamageKind) {
        if !self.roster.get(target).map_or(false, |t| t.is_alive) {
            return;
        }
        self.apply_damage(target, DamageEvent::new(amount, kind, Some(source)));
    }

    /// Mitigate and apply a hit. Returns the damage applied after mitigation.
    ///
    /// Dead and benched targets ignore damage entirely.
    pub fn apply_damage(&mut self, target_id: UnitId, event: DamageEvent) -> f32 {
        let (final_amount, died) = {
            let Some(target) = self.roster.get_mut(target_id) else {
                debug!("Damage for unknown unit {} dropped", target_id);
                return 0.0;
            };
            if !target.is_alive {
                return 0.0;
            }
            if target.state() == UnitState::Bench {
                debug!("{} is benched and ignored damage", target.name);
                return 0.0;
            }

            let final_amount = reduce(event.amount, event.kind, target.armor, target.magic_resist);
            target.current_health = (target.current_health - final_amount).clamp(0.0, target.max_health);
            target.damage_taken += final_amount.max(0.0);
            if event.source.is_some() {
                target.last_damaged_by = event.source;
            }

            debug!(
                "{} took {:.1} {} damage. HP: {:.0}/{:.0}",
                target.name,
                final_amount,
                event.kind.name(),
                target.current_health,
                target.max_health
            );
            (final_amount, target.current_health <= 0.0)
        };

        if let Some(source) = event.source.and_then(|s| self.roster.get_mut(s)) {
            source.damage_dealt += final_amount.max(0.0);
        }

        let message = format!(
            "{} took {:.1} {} damage from {}",
            self.unit_name(target_id),
            final_amount,
            event.kind.name(),
            event
                .source
                .map(|s| self.unit_name(s))
                .unwrap_or_else(|| "the environment".to_string())
        );
        self.log.record(
            CombatLogEventType::Damage,
            event.source,
            Some(target_id),
            final_amount,
            message,
        );

        if final_amount > 0.0 {
            self.gain_mana(target_id, DAMAGE_TAKEN_MANA_GAIN);
        }
        if died {
            self.die(target_id);
        }
        final_amount
    }

    /// Add mana; reaching the maximum casts the ability and drains the pool.
    pub fn gain_mana(&mut self, id: UnitId, amount: f32) {
        let full = {
            let Some(unit) = self.roster.get_mut(id) else {
                debug!("Mana for unknown unit {} dropped", id);
                return;
            };
            unit.current_mana += amount;
            debug!(
                "{} gained {:.1} mana -> {:.1}/{:.1}",
                unit.name, amount, unit.current_mana, unit.max_mana
            );
            // A unit on its killing blow keeps the mana but never casts
            unit.current_mana >= unit.max_mana && unit.is_alive && unit.current_health > 0.0
        };

        if full {
            info!("{} mana full, casting ability", self.unit_name(id));
            self.cast_ability(id);
            // Drained, not capped: overflow is lost
            if let Some(unit) = self.roster.get_mut(id) {
                unit.current_mana = 0.0;
            }
        }
    }

    /// Start a cast. Does nothing if the unit is already casting or is dead.
    pub fn cast_ability(&mut self, id: UnitId) {
        let (epoch, target, ability) = {
            let Some(unit) = self.roster.get_mut(id) else {
                debug!("Cast for unknown unit {} dropped", id);
                return;
            };
            if !unit.is_alive || unit.current_health <= 0.0 {
                debug!("{} is dead and cannot cast", unit.name);
                return;
            }
            if unit.is_casting_ability {
                return;
            }
            unit.is_casting_ability = true;
            (unit.epoch, unit.current_target, unit.ability.clone())
        };

        if let Some(position) = target.and_then(|t| self.roster.get(t)).map(|t| t.position) {
            self.face_target(id, position, None);
        }
        self.play_montage(id, MontageSlot::Ability);

        let ability_name = ability
            .as_ref()
            .map(|a| a.name().to_string())
            .unwrap_or_else(|| "ability".to_string());
        let message = format!("{} casting {}", self.unit_name(id), ability_name);
        info!("{}", message);
        self.log
            .record(CombatLogEventType::AbilityCast, Some(id), target, 0.0, message);

        let handle = self
            .scheduler
            .schedule_once(ABILITY_CAST_DURATION, DeferredTask::FinishCast { unit: id, epoch });
        if let Some(unit) = self.roster.get_mut(id) {
            unit.pending_tasks.push(handle);
        }

        if let Some(ability) = ability {
            ability.on_cast(self, id);
        }
    }

    /// Ask the movement collaborator to close in on the current target.
    pub fn move_to_target(&mut self, id: UnitId) {
        let Some(unit) = self.roster.get(id) else {
            return;
        };
        if !unit.can_move {
            return;
        }
        let Some(target) = unit.current_target.and_then(|t| self.roster.get(t)) else {
            return;
        };
        let (position, stopping_distance) = (target.position, unit.stopping_distance);
        self.movement.move_toward(id, position, stopping_distance);
    }

    pub fn stop_movement(&mut self, id: UnitId) {
        self.movement.halt(id);
    }

    /// Turn toward `target_position` on the ground plane.
    ///
    /// With `dt` the turn is smoothed; without it the unit snaps.
    pub fn face_target(&mut self, id: UnitId, target_position: Vec3, dt: Option<f32>) {
        let Some(unit) = self.roster.get_mut(id) else {
            return;
        };
        let mut direction = target_position - unit.position;
        direction.y = 0.0;
        if direction.length_squared() < 1e-6 {
            return;
        }

        let desired = direction.x.atan2(direction.z);
        unit.yaw = match dt {
            Some(dt) => {
                let delta = (desired - unit.yaw + PI).rem_euclid(TAU) - PI;
                unit.yaw + delta * (dt * FACING_INTERP_SPEED).clamp(0.0, 1.0)
            }
            None => desired,
        };
    }

    pub(crate) fn play_montage(&mut self, id: UnitId, slot: MontageSlot) {
        let Some(unit) = self.roster.get(id) else {
            return;
        };
        if let Some(clip) = unit.montages.clip(slot) {
            self.animator.play_montage(id, slot, clip);
        }
    }
}
