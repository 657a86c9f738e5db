//! Combat system
//!
//! Pieces shared by the simulation:
//! - Damage kinds and mitigation
//! - Unit notifications and observer lists
//! - Combat logging

pub mod damage;
pub mod events;
pub mod log;

pub use damage::{reduce, DamageEvent, DamageKind};
pub use events::{AttackPerformed, ObserverList, StateChanged, SubscriptionId, UnitDied, UnitObservers};
pub use log::{CombatLog, CombatLogEntry, CombatLogEventType, MatchMetadata, UnitMetadata};
