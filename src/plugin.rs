//! Bevy integration
//!
//! The simulation itself knows nothing about the engine. This plugin holds a
//! `BattleWorld` as a resource and steps it from bevy's clock every frame.

use bevy::prelude::*;

use crate::sim::BattleWorld;

/// Controls the speed of the board simulation
#[derive(Resource)]
pub struct SimulationSpeed {
    /// Speed multiplier (0.0 = paused, 1.0 = normal, 2.0 = double)
    pub multiplier: f32,
}

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl SimulationSpeed {
    pub fn pause(&mut self) {
        self.multiplier = 0.0;
    }

    pub fn is_paused(&self) -> bool {
        self.multiplier == 0.0
    }
}

/// System set the board step runs in, so hosts can order around it
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardStep;

/// Plugin that steps the `BattleWorld` resource
pub struct BoardPlugin;

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BattleWorld>()
            .init_resource::<SimulationSpeed>()
            .add_systems(Update, advance_board.in_set(BoardStep));
    }
}

/// Advance the board by this frame's (scaled) delta
pub fn advance_board(time: Res<Time>, speed: Res<SimulationSpeed>, mut world: ResMut<BattleWorld>) {
    if speed.is_paused() {
        return;
    }
    let dt = time.delta_secs() * speed.multiplier;
    if dt > 0.0 {
        world.tick(dt);
    }
}
