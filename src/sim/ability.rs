//! Ability effects
//!
//! Casting (the flag, the animation, the 1.5s lock) is handled by the world.
//! What the ability actually does is a per-unit strategy plugged in here.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::combat::DamageKind;
use crate::units::UnitId;

use super::BattleWorld;

/// Gameplay effect run at the moment a unit starts casting.
pub trait AbilityEffect: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn on_cast(&self, world: &mut BattleWorld, caster: UnitId);
}

/// Hits the caster's current target once.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetStrike {
    pub name: String,
    pub amount: f32,
    pub kind: DamageKind,
}

impl AbilityEffect for TargetStrike {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_cast(&self, world: &mut BattleWorld, caster: UnitId) {
        let Some(target) = world.unit(caster).and_then(|u| u.current_target) else {
            return;
        };
        world.deal_damage(caster, target, self.amount, self.kind);
    }
}

/// Ability description as written in unit templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AbilityConfig {
    /// Single hit on the current target
    Strike {
        name: String,
        amount: f32,
        kind: DamageKind,
    },
}

impl AbilityConfig {
    pub fn build(&self) -> Arc<dyn AbilityEffect> {
        match self {
            AbilityConfig::Strike { name, amount, kind } => Arc::new(TargetStrike {
                name: name.clone(),
                amount: *amount,
                kind: *kind,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            AbilityConfig::Strike { name, amount, .. } => {
                if *amount < 0.0 {
                    return Err(format!("ability {}: amount must not be negative", name));
                }
                Ok(())
            }
        }
    }
}
