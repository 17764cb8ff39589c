//! Fixed timestep simulation tick
//!
//! Advances the session by exactly one step. All speeds are in pixels per
//! tick, so there is no `dt` here; decoupling from the display rate is the
//! frame driver's job.

use super::autopilot;
use super::collision::resolve_collisions;
use super::events::GameEvent;
use super::player::MoveIntent;
use super::spawn::{advance_distance, run_spawner};
use super::state::{GamePhase, GameState};
use crate::audio::SoundEffect;

/// Input intents for a single tick.
///
/// Movement is held state; `shoot`, `powerup` and `start` are press edges and
/// must already be debounced by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    pub powerup: bool,
    /// Start / confirm (start game, restart, next stage)
    pub start: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    pub fn movement(&self) -> MoveIntent {
        MoveIntent {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    let mut input = *input;
    if input.idle_mode {
        autopilot::steer(state, &mut input);
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.start_game();
            }
        }
        GamePhase::GameOver => {
            if input.start {
                state.go_to_menu();
            }
        }
        GamePhase::StageComplete => {
            if input.start {
                state.advance_stage();
            }
        }
        GamePhase::Dying => {
            // World stays frozen; only the explosion timer runs
            state.death_timer = state.death_timer.saturating_sub(1);
            if state.death_timer == 0 {
                state.trigger_game_over();
            }
        }
        GamePhase::Playing => tick_playing(state, &input),
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput) {
    // Discrete actions
    if input.shoot {
        let shots = state.player.shoot(state.missiles_alive());
        state.bullets.extend(shots);
        state.events.push(GameEvent::Sound(SoundEffect::Shoot));
    }
    if input.powerup {
        if let Some(upgrade) = state.player.activate_powerup() {
            log::debug!("Upgrade applied: {:?}", upgrade);
            state.events.push(GameEvent::Sound(SoundEffect::PowerupActivate));
            state.events.push(GameEvent::PowerMeterChanged {
                meter: state.player.power_meter,
            });
        }
    }

    run_spawner(state);

    // Entity updates
    state.player.update(input.movement());
    for bullet in &mut state.bullets {
        bullet.update();
    }
    for capsule in &mut state.capsules {
        capsule.update();
    }
    let frame = state.frame_count;
    let mut boss_finished = false;
    for enemy in &mut state.enemies {
        let was_active = enemy.active;
        enemy.update(frame, &mut state.events);
        if was_active && !enemy.active && enemy.is_boss() {
            boss_finished = true;
        }
    }

    // World scroll
    state.terrain.update(&mut state.rng);
    state.starfield.update(&mut state.rng);
    advance_distance(state);

    resolve_collisions(state);

    if boss_finished && state.boss_mode && state.phase == GamePhase::Playing {
        state.complete_stage();
    }

    state.cleanup();
    state.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::BOSS_KILL_SCORE;
    use crate::sim::entity::{BOSS_DEATH_TICKS, BOSS_MAX_HP, Bullet, BulletKind, EnemyKind};
    use crate::sim::state::PLAYER_DEATH_TICKS;
    use glam::Vec2;

    fn press_start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    /// Playing state with a wide corridor that never closes
    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(&mut state, &press_start());
        state.terrain.flatten(0.0, 600.0);
        state
    }

    fn idle(state: &mut GameState, ticks: usize) {
        for _ in 0..ticks {
            state.terrain.flatten(0.0, 600.0);
            tick(state, &TickInput::default());
        }
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.frame_count, 0);

        tick(&mut state, &press_start());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::Menu,
            to: GamePhase::Playing,
        }));
    }

    #[test]
    fn test_shoot_spawns_bullets() {
        let mut state = playing_state(1);
        state.player.has_double = true;
        state.player.has_laser = true;
        state.player.has_missile = true;
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        tick(&mut state, &shoot);
        let kinds: Vec<BulletKind> = state.bullets.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BulletKind::Laser, BulletKind::Double, BulletKind::Missile]
        );

        tick(&mut state, &shoot);
        tick(&mut state, &shoot);
        let missiles = state
            .bullets
            .iter()
            .filter(|b| b.kind == BulletKind::Missile)
            .count();
        assert_eq!(missiles, 2);
    }

    #[test]
    fn test_powerup_activation() {
        let mut state = playing_state(1);
        state.player.power_meter = 2;
        let activate = TickInput {
            powerup: true,
            ..Default::default()
        };
        tick(&mut state, &activate);
        assert!(state.player.has_double);
        assert_eq!(state.player.power_meter, -1);
        assert!(state
            .events
            .contains(&GameEvent::Sound(SoundEffect::PowerupActivate)));
    }

    #[test]
    fn test_distance_triggers_boss() {
        let mut state = playing_state(2);
        state.player.invincible = true;
        idle(&mut state, 999);
        assert_eq!(state.distance, 1998);
        assert!(!state.boss_mode);
        idle(&mut state, 1);
        assert!(state.boss_mode);
        assert!(state.boss().is_some());
        idle(&mut state, 50);
        assert_eq!(state.distance, 2000);
        assert_eq!(state.enemies.iter().filter(|e| e.is_boss()).count(), 1);
    }

    #[test]
    fn test_boss_defeat_completes_stage() {
        let mut state = playing_state(3);
        state.enemies.clear();
        state.spawn_boss();
        state.player.invincible = true;
        // Let it fly in to its fighting position
        idle(&mut state, 100);
        let score_before = state.score;

        for hit in 0..BOSS_MAX_HP {
            let boss_rect = state.boss().map(|b| b.rect());
            let Some(rect) = boss_rect else {
                panic!("boss vanished after {} hits", hit);
            };
            // Bullet placed so it is still inside the boss after moving
            let pos = rect.center() - Vec2::new(20.0, 0.0);
            state.bullets.push(Bullet::new(pos, BulletKind::Normal));
            state.enemies.retain(|e| e.is_boss());
            state.terrain.flatten(0.0, 600.0);
            tick(&mut state, &TickInput::default());
            // The bullet is consumed by its hit
            assert!(state.bullets.iter().all(|b| b.kind != BulletKind::Normal));
        }

        let boss = state.boss().and_then(|b| b.boss_state()).cloned();
        let Some(boss) = boss else {
            panic!("boss removed before its death sequence");
        };
        assert!(boss.is_dying());
        assert_eq!(state.score - score_before, BOSS_KILL_SCORE);
        assert!(state.player.invincible);

        // Further hits during the cutscene change nothing
        let Some(rect) = state.boss().map(|b| b.rect()) else {
            panic!("boss removed before its death sequence");
        };
        state.bullets.push(Bullet::new(rect.center(), BulletKind::Normal));
        idle(&mut state, 1);
        assert_eq!(state.score - score_before, BOSS_KILL_SCORE);

        idle(&mut state, (BOSS_DEATH_TICKS - 2) as usize);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.boss_mode);
        idle(&mut state, 1);
        assert_eq!(state.phase, GamePhase::StageComplete);
        assert!(!state.boss_mode);
        assert!(state.boss().is_none());

        tick(&mut state, &press_start());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stage, 2);
        assert!(!state.player.invincible);
    }

    #[test]
    fn test_boss_counts_as_enemy_kind() {
        let mut state = playing_state(3);
        state.spawn_boss();
        let boss = state.enemies.iter().find(|e| e.is_boss());
        assert!(matches!(boss.map(|b| &b.kind), Some(EnemyKind::Boss(_))));
    }

    #[test]
    fn test_dying_freezes_world_then_game_over() {
        let mut state = playing_state(4);
        state.enemies.clear();
        state.player.hp = 1;
        let pos = state.player.pos;
        state.enemies.push(crate::sim::entity::Enemy::fanship(pos + Vec2::new(3.0, 0.0)));
        state.bullets.push(Bullet::new(Vec2::new(300.0, 300.0), BulletKind::Normal));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Dying);
        assert_eq!(state.death_timer, PLAYER_DEATH_TICKS);

        let frame = state.frame_count;
        let bullet_x = state.bullets[0].pos.x;
        for _ in 0..PLAYER_DEATH_TICKS - 1 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Dying);
        assert_eq!(state.frame_count, frame);
        assert_eq!(state.bullets[0].pos.x, bullet_x);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &press_start());
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_hp_never_exceeds_bounds() {
        let mut state = GameState::new(77);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..5000 {
            tick(&mut state, &input);
            assert!(state.player.hp <= state.player.max_hp);
            assert!((-1..=5).contains(&state.player.power_meter));
            assert_eq!(state.boss_mode, state.boss().is_some());
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..600 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.frame_count, state2.frame_count);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.player.pos, state2.player.pos);
    }
}
