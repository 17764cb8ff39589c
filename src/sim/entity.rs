//! Non-player entities: bullets, power capsules, enemies and the stage boss
//!
//! Every entity carries an `active` flag. Updates and collisions only ever
//! clear it; removal is deferred to `GameState::cleanup` at the end of a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::events::GameEvent;
use crate::audio::SoundEffect;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, SCROLL_SPEED};

/// Default bullet dimensions and speed
pub const BULLET_WIDTH: f32 = 8.0;
pub const BULLET_HEIGHT: f32 = 4.0;
pub const BULLET_SPEED: f32 = 10.0;
/// Laser bolts are longer and faster
pub const LASER_WIDTH: f32 = 40.0;
pub const LASER_SPEED: f32 = 15.0;
/// Upward component of the double shot
pub const DOUBLE_VY: f32 = -5.0;
/// Missile launch velocity and size
pub const MISSILE_LAUNCH_VEL: Vec2 = Vec2::new(3.0, 3.0);
pub const MISSILE_SIZE: Vec2 = Vec2::new(12.0, 8.0);
/// Once a missile drops this low it skims along horizontally
pub const MISSILE_FLOOR_Y: f32 = SCREEN_HEIGHT - 20.0;
pub const MISSILE_SKIM_SPEED: f32 = 5.0;

pub const CAPSULE_SIZE: Vec2 = Vec2::new(20.0, 12.0);
const CAPSULE_EXIT_X: f32 = -20.0;

pub const ENEMY_SIZE: Vec2 = Vec2::new(24.0, 24.0);
pub const ENEMY_SPEED: f32 = 3.0;
const ENEMY_EXIT_X: f32 = -50.0;
/// Vertical wave applied to all enemies in lockstep
const ENEMY_WAVE_FREQ: f32 = 0.05;
const ENEMY_WAVE_AMPLITUDE: f32 = 2.0;

pub const BOSS_SIZE: Vec2 = Vec2::new(120.0, 100.0);
pub const BOSS_MAX_HP: u32 = 50;
/// Boss stops its approach here
pub const BOSS_TARGET_X: f32 = SCREEN_WIDTH - 200.0;
const BOSS_ENTRY_SPEED: f32 = 2.0;
const BOSS_BOB_SPEED: f32 = 2.0;
/// Vertical band the boss bounces within
const BOSS_MARGIN: f32 = 40.0;
/// Length of the boss defeat cutscene (ticks)
pub const BOSS_DEATH_TICKS: u32 = 120;
/// An explosion cue fires every this many ticks while the boss dies
const BOSS_EXPLOSION_INTERVAL: u32 = 10;

/// Bullet variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletKind {
    #[default]
    Normal,
    Double,
    /// Pierces enemies
    Laser,
    /// Falls until it reaches the floor line, then skims
    Missile,
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub kind: BulletKind,
    pub active: bool,
    /// Set once this bullet has damaged the boss; a piercing laser
    /// damages it at most once
    #[serde(default)]
    pub hit_boss: bool,
}

impl Bullet {
    /// Create a bullet of the given kind with that kind's default motion
    pub fn new(pos: Vec2, kind: BulletKind) -> Self {
        let (vel, size) = match kind {
            BulletKind::Normal => (
                Vec2::new(BULLET_SPEED, 0.0),
                Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            ),
            BulletKind::Double => (
                Vec2::new(BULLET_SPEED, DOUBLE_VY),
                Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            ),
            BulletKind::Laser => (
                Vec2::new(LASER_SPEED, 0.0),
                Vec2::new(LASER_WIDTH, BULLET_HEIGHT),
            ),
            BulletKind::Missile => (MISSILE_LAUNCH_VEL, MISSILE_SIZE),
        };
        Self {
            pos,
            vel,
            size,
            kind,
            active: true,
            hit_boss: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn update(&mut self) {
        self.pos += self.vel;

        if self.kind == BulletKind::Missile && self.pos.y > MISSILE_FLOOR_Y {
            self.pos.y = MISSILE_FLOOR_Y;
            self.vel = Vec2::new(MISSILE_SKIM_SPEED, 0.0);
        }

        if self.pos.x > SCREEN_WIDTH || self.pos.y < 0.0 || self.pos.y > SCREEN_HEIGHT {
            self.active = false;
        }
    }
}

/// A floating capsule that advances the power meter when collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerCapsule {
    pub pos: Vec2,
    pub active: bool,
}

impl PowerCapsule {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, active: true }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, CAPSULE_SIZE)
    }

    pub fn update(&mut self) {
        self.pos.x -= SCROLL_SPEED;
        if self.pos.x < CAPSULE_EXIT_X {
            self.active = false;
        }
    }
}

/// Boss behaviour phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Flying in from the right edge
    Entry,
    /// Holding position and bobbing up and down
    Fighting,
    /// Defeat cutscene, counting down to removal
    Dying { timer: u32 },
}

/// Boss-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    pub hp: u32,
    pub max_hp: u32,
    pub phase: BossPhase,
}

impl Default for BossState {
    fn default() -> Self {
        Self {
            hp: BOSS_MAX_HP,
            max_hp: BOSS_MAX_HP,
            phase: BossPhase::Entry,
        }
    }
}

impl BossState {
    pub fn is_dying(&self) -> bool {
        matches!(self.phase, BossPhase::Dying { .. })
    }

    /// Enter the defeat cutscene. Returns false if it already started.
    pub fn begin_dying(&mut self) -> bool {
        if self.is_dying() {
            return false;
        }
        self.phase = BossPhase::Dying {
            timer: BOSS_DEATH_TICKS,
        };
        true
    }

    /// Ticks left in the defeat cutscene
    pub fn death_timer(&self) -> u32 {
        match self.phase {
            BossPhase::Dying { timer } => timer,
            _ => 0,
        }
    }
}

/// Kind-specific part of an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Basic wave-riding fighter
    Fanship,
    Boss(BossState),
}

/// Anything the player can shoot: regular enemies and the boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub kind: EnemyKind,
    pub active: bool,
}

impl Enemy {
    pub fn fanship(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(-ENEMY_SPEED, 0.0),
            size: ENEMY_SIZE,
            kind: EnemyKind::Fanship,
            active: true,
        }
    }

    /// Boss placed just off the right edge, vertically centred
    pub fn boss() -> Self {
        Self {
            pos: Vec2::new(SCREEN_WIDTH, (SCREEN_HEIGHT - BOSS_SIZE.y) / 2.0),
            vel: Vec2::new(-BOSS_ENTRY_SPEED, 0.0),
            size: BOSS_SIZE,
            kind: EnemyKind::Boss(BossState::default()),
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn boss_state(&self) -> Option<&BossState> {
        match &self.kind {
            EnemyKind::Boss(boss) => Some(boss),
            EnemyKind::Fanship => None,
        }
    }

    /// Advance one tick. `frame` drives the shared fanship wave; boss cues
    /// are appended to `events`.
    pub fn update(&mut self, frame: u64, events: &mut Vec<GameEvent>) {
        match &mut self.kind {
            EnemyKind::Fanship => {
                self.pos.x += self.vel.x;
                self.pos.y += (frame as f32 * ENEMY_WAVE_FREQ).cos() * ENEMY_WAVE_AMPLITUDE;
                if self.pos.x < ENEMY_EXIT_X {
                    self.active = false;
                }
            }
            EnemyKind::Boss(boss) => match boss.phase {
                BossPhase::Entry => {
                    self.pos.x += self.vel.x;
                    if self.pos.x <= BOSS_TARGET_X {
                        self.pos.x = BOSS_TARGET_X;
                        self.vel = Vec2::new(0.0, BOSS_BOB_SPEED);
                        boss.phase = BossPhase::Fighting;
                    }
                }
                BossPhase::Fighting => {
                    self.pos.y += self.vel.y;
                    let min_y = BOSS_MARGIN;
                    let max_y = SCREEN_HEIGHT - BOSS_MARGIN - self.size.y;
                    if self.pos.y <= min_y || self.pos.y >= max_y {
                        self.pos.y = self.pos.y.clamp(min_y, max_y);
                        self.vel.y = -self.vel.y;
                    }
                }
                BossPhase::Dying { timer } => {
                    let timer = timer.saturating_sub(1);
                    boss.phase = BossPhase::Dying { timer };
                    if timer % BOSS_EXPLOSION_INTERVAL == 0 {
                        events.push(GameEvent::Sound(SoundEffect::Explosion));
                    }
                    if timer == 0 {
                        self.active = false;
                    }
                }
            },
        }
    }
}
