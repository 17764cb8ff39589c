//! Demo-mode autopilot
//!
//! Fills in a `TickInput` from the current state so the game can play itself
//! on the title screen or in the headless binary. Decisions only read state,
//! so a seeded demo run stays deterministic.

use super::player::Upgrade;
use super::state::{GamePhase, GameState};
use super::tick::TickInput;

/// How far ahead of the ship the tunnel gap is sampled
const LOOKAHEAD_X: f32 = 60.0;
/// Enemies closer than this (horizontally) are dodged
const DODGE_RANGE: f32 = 120.0;
/// Vertical offset used to slip past an enemy in our lane
const DODGE_OFFSET: f32 = 40.0;
/// No steering inside this distance from the target line
const DEADZONE: f32 = 4.0;
/// Preferred horizontal band for the ship
const CRUISE_MIN_X: f32 = 80.0;
const CRUISE_MAX_X: f32 = 140.0;
/// Speed upgrades beyond this are not worth a capsule
const WANTED_SPEED_UPS: u32 = 2;

fn wants(state: &GameState, upgrade: Upgrade) -> bool {
    let player = &state.player;
    match upgrade {
        Upgrade::SpeedUp => player.speed_ups < WANTED_SPEED_UPS,
        Upgrade::Shield => !player.has_shield,
        Upgrade::Reserved => false,
        other => !player.owns(other),
    }
}

/// Line the ship should follow: the gap centre, nudged away from the nearest
/// enemy ahead that shares our lane
fn target_y(state: &GameState) -> f32 {
    let player = &state.player;
    let center = player.rect().center();

    let mut target = state
        .terrain
        .gap_at(center.x + LOOKAHEAD_X)
        .or_else(|| state.terrain.gap_at(center.x))
        .map(|(ceil, floor)| (ceil + floor) / 2.0)
        .unwrap_or(center.y);

    let threat = state
        .enemies
        .iter()
        .filter(|e| e.active && !e.is_boss())
        .map(|e| e.rect())
        .filter(|r| r.left() > player.pos.x && r.left() - player.pos.x < DODGE_RANGE)
        .filter(|r| (r.center().y - center.y).abs() < DODGE_OFFSET)
        .min_by(|a, b| a.left().total_cmp(&b.left()));

    if let Some(rect) = threat {
        target = if rect.center().y > center.y {
            center.y - DODGE_OFFSET
        } else {
            center.y + DODGE_OFFSET
        };
    }
    target
}

/// Overwrite `input` with the autopilot's choices for this tick
pub fn steer(state: &GameState, input: &mut TickInput) {
    *input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    match state.phase {
        GamePhase::Menu | GamePhase::GameOver | GamePhase::StageComplete => {
            input.start = true;
        }
        GamePhase::Dying => {}
        GamePhase::Playing => {
            let player = &state.player;
            let center_y = player.rect().center().y;
            let target = target_y(state);
            input.up = target < center_y - DEADZONE;
            input.down = target > center_y + DEADZONE;
            input.right = player.pos.x < CRUISE_MIN_X;
            input.left = player.pos.x > CRUISE_MAX_X;

            // Alternate frames so every shot is a fresh press
            input.shoot = state.frame_count % 2 == 0;
            input.powerup = Upgrade::from_meter(player.power_meter)
                .is_some_and(|upgrade| wants(state, upgrade));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Enemy;
    use glam::Vec2;

    fn playing() -> GameState {
        let mut state = GameState::new(8);
        state.start_game();
        state.terrain.flatten(100.0, 500.0);
        state
    }

    #[test]
    fn test_presses_start_outside_play() {
        let state = GameState::new(8);
        let mut input = TickInput::default();
        steer(&state, &mut input);
        assert!(input.start);
        assert!(input.idle_mode);
        assert!(!input.shoot);
    }

    #[test]
    fn test_steers_to_gap_centre() {
        let mut state = playing();
        state.player.pos.y = 150.0;
        let mut input = TickInput::default();
        steer(&state, &mut input);
        assert!(input.down);
        assert!(!input.up);

        state.player.pos.y = 420.0;
        steer(&state, &mut input);
        assert!(input.up);
    }

    #[test]
    fn test_dodges_enemy_in_lane() {
        let mut state = playing();
        // Centred in the gap, so only the enemy can cause movement
        state.player.pos = Vec2::new(100.0, 300.0 - 7.5);
        let mut input = TickInput::default();
        steer(&state, &mut input);
        assert!(!input.up && !input.down);

        state.enemies.push(Enemy::fanship(Vec2::new(160.0, 295.0)));
        steer(&state, &mut input);
        assert!(input.up || input.down);
    }

    #[test]
    fn test_fires_on_alternate_frames() {
        let mut state = playing();
        let mut input = TickInput::default();
        state.frame_count = 10;
        steer(&state, &mut input);
        assert!(input.shoot);
        state.frame_count = 11;
        steer(&state, &mut input);
        assert!(!input.shoot);
    }

    #[test]
    fn test_activates_wanted_upgrade_only() {
        let mut state = playing();
        let mut input = TickInput::default();
        state.player.power_meter = 3;
        steer(&state, &mut input);
        assert!(input.powerup);

        state.player.has_laser = true;
        steer(&state, &mut input);
        assert!(!input.powerup);

        state.player.power_meter = 4;
        steer(&state, &mut input);
        assert!(!input.powerup);
    }
}
