//! Damage mitigation
//!
//! Converts raw damage into applied damage using the target's defensive stats.

use serde::{Deserialize, Serialize};

use crate::units::UnitId;

/// Types of damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Mitigated by armor
    Physical,
    /// Mitigated by magic resist
    Magical,
    /// Ignores all defenses
    True,
}

impl DamageKind {
    pub fn name(&self) -> &'static str {
        match self {
            DamageKind::Physical => "Physical",
            DamageKind::Magical => "Magical",
            DamageKind::True => "True",
        }
    }
}

/// A single hit travelling from a source unit to a target.
///
/// Ephemeral: built by the attacker and consumed immediately by
/// [`BattleWorld::apply_damage`](crate::sim::BattleWorld::apply_damage).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    /// Amount of damage before mitigation
    pub amount: f32,
    pub kind: DamageKind,
    /// Unit dealing the damage (None for environmental damage)
    pub source: Option<UnitId>,
}

impl DamageEvent {
    pub fn new(amount: f32, kind: DamageKind, source: Option<UnitId>) -> Self {
        Self {
            amount,
            kind,
            source,
        }
    }
}

/// Apply mitigation to an incoming hit.
///
/// Defenses are used as given: negative armor or magic resist amplifies the
/// damage instead of reducing it.
pub fn reduce(amount: f32, kind: DamageKind, armor: f32, magic_resist: f32) -> f32 {
    match kind {
        DamageKind::Physical => amount * (100.0 / (100.0 + armor)),
        DamageKind::Magical => amount * (100.0 / (100.0 + magic_resist)),
        DamageKind::True => amount,
    }
}
