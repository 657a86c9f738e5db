//! boardsim - Auto-battler combat unit simulation
//!
//! The combat core of an auto-battler: unit stats and lifecycle, damage
//! mitigation, nearest-enemy targeting, auto-attacks, mana and ability casts.
//! The core is plain Rust driven by [`sim::BattleWorld::tick`]; bevy hosts it
//! through [`plugin::BoardPlugin`] and the headless runner.

pub mod cli;
pub mod combat;
pub mod constants;
pub mod headless;
pub mod plugin;
pub mod sim;
pub mod units;

// Re-export commonly used types
pub use combat::{CombatLog, CombatLogEventType, DamageEvent, DamageKind};
pub use headless::{ScenarioConfig, UnitTemplates};
pub use plugin::BoardPlugin;
pub use sim::BattleWorld;
pub use units::{Team, Unit, UnitId, UnitState, UnitStats};
