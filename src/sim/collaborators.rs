//! Presentation collaborators
//!
//! The simulation decides *when* and *where* a unit moves and which clip it
//! plays; the host decides *how*. These traits are the boundary.

use bevy::math::Vec3;

use crate::units::{MontageSlot, UnitId, UnitRoster};

/// Navigation collaborator
pub trait Movement: Send + Sync {
    /// Start (or retarget) movement toward `target`, stopping `stopping_distance` short of it.
    fn move_toward(&mut self, unit: UnitId, target: Vec3, stopping_distance: f32);

    fn halt(&mut self, unit: UnitId);

    /// Called once per world tick before units think, so hosts that move units
    /// themselves can write positions back into the roster.
    fn integrate(&mut self, _roster: &mut UnitRoster, _dt: f32) {}
}

/// Animation collaborator. Fire and forget.
pub trait Animator: Send + Sync {
    fn play_montage(&mut self, unit: UnitId, slot: MontageSlot, clip: &str);
}

/// Movement that ignores every command
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMovement;

impl Movement for NullMovement {
    fn move_toward(&mut self, _unit: UnitId, _target: Vec3, _stopping_distance: f32) {}

    fn halt(&mut self, _unit: UnitId) {}
}

/// Animator that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn play_montage(&mut self, _unit: UnitId, _slot: MontageSlot, _clip: &str) {}
}
