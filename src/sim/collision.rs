//! Collision detection and response
//!
//! Axis-aligned boxes are the only collision shape. `resolve_collisions` runs
//! the per-tick cross checks in a fixed order, because the order decides which
//! hazard wins when several coincide on the same tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{BulletKind, EnemyKind, PowerCapsule};
use super::events::GameEvent;
use super::state::GameState;
use crate::audio::SoundEffect;

/// Score for destroying a regular enemy
pub const ENEMY_KILL_SCORE: u64 = 100;
/// Score for collecting a power capsule
pub const PICKUP_SCORE: u64 = 100;
/// Score for defeating the stage boss
pub const BOSS_KILL_SCORE: u64 = 5000;
/// Chance that a destroyed enemy leaves a power capsule behind
pub const CAPSULE_DROP_CHANCE: f64 = 0.15;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// True if the horizontal spans overlap (edges touching do not count)
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.left() < right && self.right() > left
    }

    /// Strict AABB overlap test
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Route a hit on the player through shields and invincibility.
///
/// Does nothing while the player is invincible (cutscene flag or i-frames).
pub fn take_player_damage(state: &mut GameState) {
    let player = &mut state.player;
    if player.invincible || player.invincible_timer > 0 {
        return;
    }

    if player.has_shield && player.shield_hp > 0 {
        player.shield_hp -= 1;
        player.invincible_timer = super::player::SHIELD_HIT_IFRAMES;
        if player.shield_hp == 0 {
            player.has_shield = false;
        }
        log::debug!("Shield absorbed hit ({} left)", player.shield_hp);
        state.events.push(GameEvent::Sound(SoundEffect::PlayerDamage));
        state.events.push(GameEvent::ShieldHit {
            remaining: state.player.shield_hp,
        });
        return;
    }

    player.hp = player.hp.saturating_sub(1);
    player.invincible_timer = super::player::DAMAGE_IFRAMES;
    let hp = player.hp;
    state.events.push(GameEvent::Sound(SoundEffect::PlayerDamage));
    state.events.push(GameEvent::PlayerDamaged { hp });
    log::debug!("Player hit, hp {}", hp);

    if hp == 0 {
        state.start_player_death();
    }
}

/// Run every collision check for one tick.
///
/// Inactive entities are skipped, so anything deactivated earlier in this
/// pass is never hit twice. Removal happens later in `GameState::cleanup`.
pub fn resolve_collisions(state: &mut GameState) {
    // 1. Player vs terrain
    if state.terrain.check_collision(&state.player.rect()) {
        take_player_damage(state);
    }

    // 2. Bullets vs terrain
    for bullet in state.bullets.iter_mut().filter(|b| b.active) {
        if state.terrain.check_collision(&bullet.rect()) {
            bullet.active = false;
        }
    }

    // 3. Surviving bullets vs enemies (boss included)
    let mut drops: Vec<Vec2> = Vec::new();
    for bullet in state.bullets.iter_mut() {
        for enemy in state.enemies.iter_mut() {
            if !bullet.active {
                break;
            }
            if !enemy.active || !bullet.rect().intersects(&enemy.rect()) {
                continue;
            }

            match &mut enemy.kind {
                EnemyKind::Fanship => {
                    enemy.active = false;
                    if bullet.kind != BulletKind::Laser {
                        bullet.active = false;
                    }
                    state.score += ENEMY_KILL_SCORE;
                    state.events.push(GameEvent::Sound(SoundEffect::Explosion));
                    state.events.push(GameEvent::EnemyDestroyed { pos: enemy.pos });
                    if state.rng.random_bool(CAPSULE_DROP_CHANCE) {
                        drops.push(enemy.pos);
                    }
                }
                EnemyKind::Boss(boss) => {
                    if boss.is_dying() || bullet.hit_boss {
                        continue;
                    }
                    bullet.hit_boss = true;
                    if bullet.kind != BulletKind::Laser {
                        bullet.active = false;
                    }
                    boss.hp = boss.hp.saturating_sub(1);
                    if boss.hp == 0 && boss.begin_dying() {
                        state.score += BOSS_KILL_SCORE;
                        state.player.invincible = true;
                        state.events.push(GameEvent::Sound(SoundEffect::Explosion));
                        state.events.push(GameEvent::BossDefeated);
                        log::info!("Boss defeated on stage {}", state.stage);
                    }
                }
            }
        }
    }
    for pos in drops {
        log::debug!("Capsule dropped at ({:.0}, {:.0})", pos.x, pos.y);
        state.capsules.push(PowerCapsule::new(pos));
    }

    // 4. Player vs power capsules
    let player_rect = state.player.rect();
    for capsule in state.capsules.iter_mut() {
        if capsule.active && player_rect.intersects(&capsule.rect()) {
            capsule.active = false;
            state.player.advance_power_meter();
            state.score += PICKUP_SCORE;
            state.events.push(GameEvent::Sound(SoundEffect::PowerupCollect));
            state.events.push(GameEvent::PowerMeterChanged {
                meter: state.player.power_meter,
            });
        }
    }

    // 5. Player vs enemies (the boss hurts but is never consumed by contact)
    let player_rect = state.player.rect();
    for i in 0..state.enemies.len() {
        let enemy = &mut state.enemies[i];
        if !enemy.active || !player_rect.intersects(&enemy.rect()) {
            continue;
        }
        if matches!(enemy.kind, EnemyKind::Fanship) {
            enemy.active = false;
        }
        take_player_damage(state);
    }
}
