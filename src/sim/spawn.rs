//! Time- and distance-based spawning

use glam::Vec2;
use rand::Rng;

use super::entity::{Enemy, PowerCapsule};
use super::state::{DISTANCE_PER_TICK, GameState};
use crate::consts::{BOSS_DISTANCE, SCREEN_HEIGHT, SCREEN_WIDTH};

/// A fanship enters every this many ticks
pub const ENEMY_SPAWN_INTERVAL: u64 = 60;
/// A free-floating capsule enters every this many ticks
pub const CAPSULE_SPAWN_INTERVAL: u64 = 600;
/// Spawns keep this far from the top and bottom of the screen
const SPAWN_MARGIN: f32 = 100.0;

fn spawn_height(state: &mut GameState) -> f32 {
    state
        .rng
        .random_range(SPAWN_MARGIN..SCREEN_HEIGHT - SPAWN_MARGIN)
}

/// Periodic spawns, evaluated before entity updates each Playing tick
pub fn run_spawner(state: &mut GameState) {
    if state.frame_count % CAPSULE_SPAWN_INTERVAL == 0 {
        let y = spawn_height(state);
        state.capsules.push(PowerCapsule::new(Vec2::new(SCREEN_WIDTH, y)));
        log::debug!("Capsule spawned at y={:.0}", y);
    }

    if state.frame_count % ENEMY_SPAWN_INTERVAL == 0 {
        let y = spawn_height(state);
        state.enemies.push(Enemy::fanship(Vec2::new(SCREEN_WIDTH, y)));
    }
}

/// Accumulate distance outside boss fights and bring in the boss at the
/// threshold. The boss spawns at most once per stage.
pub fn advance_distance(state: &mut GameState) {
    if state.boss_mode {
        return;
    }
    state.distance += DISTANCE_PER_TICK;
    if state.distance >= BOSS_DISTANCE {
        state.spawn_boss();
    }
}
