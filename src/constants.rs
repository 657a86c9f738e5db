//! Combat Constants
//!
//! Centralized location for the tuning numbers used by the unit simulation.
//! This makes it easier to tune balance and ensures consistency.

// ============================================================================
// Mana
// ============================================================================

/// Mana granted to the attacker for every auto-attack that lands.
pub const ATTACK_MANA_GAIN: f32 = 10.0;

/// Mana granted to a unit whenever it takes a positive amount of damage.
pub const DAMAGE_TAKEN_MANA_GAIN: f32 = 1.0;

// ============================================================================
// Timing
// ============================================================================

/// How long a unit stays locked in its ability cast (seconds).
pub const ABILITY_CAST_DURATION: f32 = 1.5;

/// Delay before a dead player-side unit is hidden from the board (seconds).
pub const PLAYER_CORPSE_HIDE_DELAY: f32 = 1.5;

/// Delay before a dead non-player unit is removed from the roster (seconds).
pub const NON_PLAYER_DESPAWN_DELAY: f32 = 2.0;

/// Rotation interpolation speed used while a unit tracks its target.
/// Matches a "RInterpTo"-style smoothing: fraction of the remaining angle per second.
pub const FACING_INTERP_SPEED: f32 = 10.0;

// ============================================================================
// Default Unit Stats
// ============================================================================

pub const DEFAULT_MAX_HEALTH: f32 = 100.0;
pub const DEFAULT_MAX_MANA: f32 = 50.0;
pub const DEFAULT_ATTACK_DAMAGE: f32 = 10.0;
/// Attacks per second
pub const DEFAULT_ATTACK_SPEED: f32 = 1.0;
/// World units. Slightly larger than the stopping distance so a unit that
/// stops short of its target is still in range to swing.
pub const DEFAULT_ATTACK_RANGE: f32 = 150.0;
pub const DEFAULT_STOPPING_DISTANCE: f32 = 140.0;
pub const DEFAULT_MOVEMENT_SPEED: f32 = 300.0;

// ============================================================================
// Headless Simulation
// ============================================================================

/// Fixed simulation step used by the headless runner (60 ticks per second).
pub const HEADLESS_TICK_SECS: f32 = 1.0 / 60.0;

/// Default round length before a draw is declared (seconds).
pub const DEFAULT_MAX_ROUND_DURATION: f32 = 120.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopping_distance_is_inside_attack_range() {
        assert!(DEFAULT_STOPPING_DISTANCE < DEFAULT_ATTACK_RANGE);
    }

    #[test]
    fn test_delays_are_positive() {
        assert!(ABILITY_CAST_DURATION > 0.0);
        assert!(PLAYER_CORPSE_HIDE_DELAY > 0.0);
        assert!(NON_PLAYER_DESPAWN_DELAY > PLAYER_CORPSE_HIDE_DELAY);
    }

    #[test]
    fn test_attack_mana_fills_default_pool_in_five_hits() {
        assert_eq!(DEFAULT_MAX_MANA / ATTACK_MANA_GAIN, 5.0);
    }
}
