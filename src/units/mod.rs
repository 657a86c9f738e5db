//! Units
//!
//! - `stats`: the unit record (static stats plus combat state)
//! - `roster`: the registry that owns units and hands out ids
//! - `targeting`: nearest-enemy selection

pub mod roster;
pub mod stats;
pub mod targeting;

pub use roster::{RosterQuery, UnitRoster};
pub use stats::{MontageSet, MontageSlot, Team, Unit, UnitId, UnitState, UnitStats};
pub use targeting::{find_nearest_enemy, NearestEnemy, TargetSelector};
