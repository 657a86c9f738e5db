//! Target acquisition
//!
//! Picks which enemy a unit should fight. The default selector scans the whole
//! roster; at board sizes (tens of units) that is cheaper than keeping an index.

use std::fmt;

use super::roster::RosterQuery;
use super::stats::{Unit, UnitId};

/// Strategy for choosing a new target.
///
/// Implementations must never return the seeker itself, a dead unit, a unit on
/// the seeker's team, or a unit that is not in combat.
pub trait TargetSelector: Send + Sync + fmt::Debug {
    fn find_target(&self, seeker: &Unit, roster: &dyn RosterQuery) -> Option<UnitId>;
}

/// Closest valid enemy by straight-line distance. Ties go to the unit seen first.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestEnemy;

impl TargetSelector for NearestEnemy {
    fn find_target(&self, seeker: &Unit, roster: &dyn RosterQuery) -> Option<UnitId> {
        find_nearest_enemy(seeker, roster)
    }
}

/// Whether `candidate` may be chosen as a fresh target by `seeker`.
pub fn is_valid_enemy(seeker: &Unit, candidate: &Unit) -> bool {
    candidate.id != seeker.id && candidate.team != seeker.team && candidate.is_targetable()
}

pub fn find_nearest_enemy(seeker: &Unit, roster: &dyn RosterQuery) -> Option<UnitId> {
    let mut best: Option<(UnitId, f32)> = None;

    for candidate in roster.all_units() {
        if !is_valid_enemy(seeker, candidate) {
            continue;
        }
        let distance = seeker.distance_to(candidate);
        // Strict comparison keeps the first candidate on ties
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((candidate.id, distance));
        }
    }

    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Team, UnitRoster, UnitState, UnitStats};
    use bevy::math::Vec3;

    fn place(roster: &mut UnitRoster, name: &str, team: Team, x: f32, state: UnitState) -> UnitId {
        let id = roster.spawn(&UnitStats::named(name), team);
        let unit = roster.get_mut(id).unwrap();
        unit.position = Vec3::new(x, 0.0, 0.0);
        unit.state = state;
        id
    }

    #[test]
    fn test_picks_closest_enemy() {
        let mut roster = UnitRoster::new();
        let me = place(&mut roster, "Me", Team::Player, 0.0, UnitState::Combat);
        place(&mut roster, "Far", Team::Enemy, 500.0, UnitState::Combat);
        let near = place(&mut roster, "Near", Team::Enemy, 200.0, UnitState::Combat);

        let seeker = roster.get(me).unwrap();
        assert_eq!(find_nearest_enemy(seeker, &roster), Some(near));
    }

    #[test]
    fn test_ties_go_to_first_in_roster_order() {
        let mut roster = UnitRoster::new();
        let me = place(&mut roster, "Me", Team::Player, 0.0, UnitState::Combat);
        let left = place(&mut roster, "Left", Team::Enemy, -100.0, UnitState::Combat);
        place(&mut roster, "Right", Team::Enemy, 100.0, UnitState::Combat);

        let seeker = roster.get(me).unwrap();
        assert_eq!(NearestEnemy.find_target(seeker, &roster), Some(left));
    }

    #[test]
    fn test_never_returns_invalid_candidates() {
        let mut roster = UnitRoster::new();
        let me = place(&mut roster, "Me", Team::Player, 0.0, UnitState::Combat);
        place(&mut roster, "Ally", Team::Player, 10.0, UnitState::Combat);
        place(&mut roster, "Benched", Team::Enemy, 20.0, UnitState::Bench);
        place(&mut roster, "Idle", Team::Enemy, 30.0, UnitState::BoardIdle);
        let dead = place(&mut roster, "Dead", Team::Enemy, 40.0, UnitState::Combat);
        roster.get_mut(dead).unwrap().is_alive = false;

        let seeker = roster.get(me).unwrap();
        assert_eq!(find_nearest_enemy(seeker, &roster), None);

        let neutral = place(&mut roster, "Crab", Team::Neutral, 900.0, UnitState::Combat);
        let seeker = roster.get(me).unwrap();
        assert_eq!(find_nearest_enemy(seeker, &roster), Some(neutral));
    }

    #[test]
    fn test_uses_three_dimensional_distance() {
        let mut roster = UnitRoster::new();
        let me = place(&mut roster, "Me", Team::Player, 0.0, UnitState::Combat);
        let high = place(&mut roster, "High", Team::Enemy, 50.0, UnitState::Combat);
        roster.get_mut(high).unwrap().position.y = 300.0;
        let low = place(&mut roster, "Low", Team::Enemy, 100.0, UnitState::Combat);

        let seeker = roster.get(me).unwrap();
        assert_eq!(find_nearest_enemy(seeker, &roster), Some(low));
    }
}
