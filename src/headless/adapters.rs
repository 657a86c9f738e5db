//! Headless collaborators
//!
//! Without a navigation mesh or skeletal animation the runner moves units in
//! straight lines and only logs montage requests.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::sim::{Animator, Movement};
use crate::units::{MontageSlot, UnitId, UnitRoster};

#[derive(Debug, Clone, Copy, PartialEq)]
struct MoveOrder {
    destination: Vec3,
    stopping_distance: f32,
}

/// Kinematic straight-line mover.
///
/// Each order walks the unit along the ground plane at its `movement_speed`
/// and completes once the unit is within `stopping_distance` of the
/// destination. No pathfinding and no avoidance.
#[derive(Debug, Default)]
pub struct DirectMover {
    orders: HashMap<UnitId, MoveOrder>,
}

impl DirectMover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_moving(&self, unit: UnitId) -> bool {
        self.orders.contains_key(&unit)
    }
}

impl Movement for DirectMover {
    fn move_toward(&mut self, unit: UnitId, target: Vec3, stopping_distance: f32) {
        self.orders.insert(
            unit,
            MoveOrder {
                destination: target,
                stopping_distance,
            },
        );
    }

    fn halt(&mut self, unit: UnitId) {
        self.orders.remove(&unit);
    }

    fn integrate(&mut self, roster: &mut UnitRoster, dt: f32) {
        self.orders.retain(|id, order| {
            let Some(unit) = roster.get_mut(*id) else {
                return false;
            };
            if !unit.is_alive || !unit.can_move {
                return false;
            }

            let mut offset = order.destination - unit.position;
            offset.y = 0.0;
            let remaining = offset.length() - order.stopping_distance;
            if remaining <= 0.0 {
                return false;
            }

            let step = (unit.movement_speed * dt).min(remaining);
            unit.position += offset.normalize() * step;
            step < remaining
        });
    }
}

/// Animator that logs every montage request at debug level
#[derive(Debug, Default)]
pub struct LoggingAnimator {
    played: usize,
}

impl LoggingAnimator {
    pub fn played(&self) -> usize {
        self.played
    }
}

impl Animator for LoggingAnimator {
    fn play_montage(&mut self, unit: UnitId, slot: MontageSlot, clip: &str) {
        self.played += 1;
        debug!("{} plays {:?} montage '{}'", unit, slot, clip);
    }
}
