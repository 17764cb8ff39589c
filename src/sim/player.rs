//! The player's ship: movement, weapons and the power meter

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entity::{Bullet, BulletKind};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const PLAYER_START: Vec2 = Vec2::new(50.0, SCREEN_HEIGHT / 2.0);
pub const PLAYER_SIZE: Vec2 = Vec2::new(30.0, 15.0);
pub const PLAYER_BASE_SPEED: f32 = 4.0;
pub const PLAYER_MAX_HP: u32 = 5;

/// Invincibility granted after losing a hit point (ticks)
pub const DAMAGE_IFRAMES: u32 = 90;
/// Invincibility granted after the shield absorbs a hit (ticks)
pub const SHIELD_HIT_IFRAMES: u32 = 60;
pub const SHIELD_MAX_HP: u32 = 3;

/// Number of slots on the power meter
pub const POWER_SLOTS: i8 = 6;
/// Meter value meaning "nothing selected"
pub const POWER_METER_EMPTY: i8 = -1;
/// Speed upgrades stack at most this many times
pub const MAX_SPEED_UPS: u32 = 5;
/// Concurrent missile limit
pub const MAX_MISSILES: usize = 2;

/// Upgrade held in each power meter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    SpeedUp,
    Missile,
    Double,
    Laser,
    /// Reserved slot, selecting it has no effect
    Reserved,
    Shield,
}

impl Upgrade {
    pub const ALL: [Upgrade; POWER_SLOTS as usize] = [
        Upgrade::SpeedUp,
        Upgrade::Missile,
        Upgrade::Double,
        Upgrade::Laser,
        Upgrade::Reserved,
        Upgrade::Shield,
    ];

    /// Upgrade at a meter index, `None` for the empty meter
    pub fn from_meter(meter: i8) -> Option<Self> {
        usize::try_from(meter)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Upgrade::SpeedUp => "SPEED",
            Upgrade::Missile => "MISSILE",
            Upgrade::Double => "DOUBLE",
            Upgrade::Laser => "LASER",
            Upgrade::Reserved => "OPTION",
            Upgrade::Shield => "SHIELD",
        }
    }
}

/// Held movement intents for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Selected power meter slot, `POWER_METER_EMPTY` when none
    pub power_meter: i8,
    /// Number of speed upgrades applied
    pub speed_ups: u32,
    pub has_missile: bool,
    pub has_double: bool,
    pub has_laser: bool,
    pub has_shield: bool,
    pub shield_hp: u32,
    pub hp: u32,
    pub max_hp: u32,
    /// Remaining hit-immunity ticks
    pub invincible_timer: u32,
    /// Immune regardless of timer (boss defeat cutscene)
    pub invincible: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            size: PLAYER_SIZE,
            speed: PLAYER_BASE_SPEED,
            power_meter: POWER_METER_EMPTY,
            speed_ups: 0,
            has_missile: false,
            has_double: false,
            has_laser: false,
            has_shield: false,
            shield_hp: 0,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            invincible_timer: 0,
            invincible: false,
        }
    }
}

impl Player {
    /// Restore every field to its new-game value
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Apply movement intents, keep the ship on screen, tick down i-frames.
    ///
    /// Diagonals are not normalized.
    pub fn update(&mut self, intent: MoveIntent) {
        if intent.up {
            self.pos.y -= self.speed;
        }
        if intent.down {
            self.pos.y += self.speed;
        }
        if intent.left {
            self.pos.x -= self.speed;
        }
        if intent.right {
            self.pos.x += self.speed;
        }

        self.pos.x = self.pos.x.clamp(0.0, SCREEN_WIDTH - self.size.x);
        self.pos.y = self.pos.y.clamp(0.0, SCREEN_HEIGHT - self.size.y);

        self.invincible_timer = self.invincible_timer.saturating_sub(1);
    }

    /// Fire every weapon the ship owns.
    ///
    /// `missiles_alive` is the number of missiles already in flight.
    pub fn shoot(&self, missiles_alive: usize) -> Vec<Bullet> {
        let nose = Vec2::new(self.pos.x + self.size.x, self.pos.y + self.size.y / 2.0);
        let mut shots = Vec::with_capacity(3);

        let forward = if self.has_laser {
            BulletKind::Laser
        } else {
            BulletKind::Normal
        };
        shots.push(Bullet::new(nose, forward));

        if self.has_double {
            shots.push(Bullet::new(nose, BulletKind::Double));
        }

        if self.has_missile && missiles_alive < MAX_MISSILES {
            let belly = Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y);
            shots.push(Bullet::new(belly, BulletKind::Missile));
        }

        shots
    }

    /// Move the power meter one slot forward, wrapping after the last slot
    pub fn advance_power_meter(&mut self) {
        self.power_meter = (self.power_meter + 1).rem_euclid(POWER_SLOTS);
    }

    /// Commit the selected upgrade. Returns what was applied, if anything.
    pub fn activate_powerup(&mut self) -> Option<Upgrade> {
        let upgrade = Upgrade::from_meter(self.power_meter)?;
        match upgrade {
            Upgrade::SpeedUp => {
                if self.speed_ups < MAX_SPEED_UPS {
                    self.speed += 1.0;
                    self.speed_ups += 1;
                }
            }
            Upgrade::Missile => self.has_missile = true,
            Upgrade::Double => self.has_double = true,
            Upgrade::Laser => self.has_laser = true,
            Upgrade::Reserved => {}
            Upgrade::Shield => {
                self.has_shield = true;
                self.shield_hp = SHIELD_MAX_HP;
            }
        }
        self.power_meter = POWER_METER_EMPTY;
        Some(upgrade)
    }

    /// Whether a given upgrade is currently owned (for HUD highlighting)
    pub fn owns(&self, upgrade: Upgrade) -> bool {
        match upgrade {
            Upgrade::SpeedUp => self.speed_ups > 0,
            Upgrade::Missile => self.has_missile,
            Upgrade::Double => self.has_double,
            Upgrade::Laser => self.has_laser,
            Upgrade::Reserved => false,
            Upgrade::Shield => self.has_shield,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_diagonal_is_unnormalized() {
        let mut player = Player::default();
        player.pos = Vec2::new(200.0, 200.0);
        player.update(MoveIntent {
            up: true,
            left: true,
            ..Default::default()
        });
        assert_eq!(player.pos, Vec2::new(196.0, 196.0));
    }

    #[test]
    fn test_clamped_to_screen() {
        let mut player = Player::default();
        player.pos = Vec2::new(1.0, SCREEN_HEIGHT - PLAYER_SIZE.y - 1.0);
        player.update(MoveIntent {
            down: true,
            left: true,
            ..Default::default()
        });
        assert_eq!(player.pos.x, 0.0);
        assert_eq!(player.pos.y, SCREEN_HEIGHT - PLAYER_SIZE.y);
    }

    #[test]
    fn test_iframes_count_down() {
        let mut player = Player::default();
        player.invincible_timer = 2;
        player.update(MoveIntent::default());
        player.update(MoveIntent::default());
        player.update(MoveIntent::default());
        assert_eq!(player.invincible_timer, 0);
    }

    #[test]
    fn test_activate_without_meter_is_noop() {
        let mut player = Player::default();
        assert_eq!(player.activate_powerup(), None);
        assert_eq!(player.speed, PLAYER_BASE_SPEED);
    }

    #[test]
    fn test_speed_up_capped() {
        let mut player = Player::default();
        for _ in 0..8 {
            player.power_meter = 0;
            assert_eq!(player.activate_powerup(), Some(Upgrade::SpeedUp));
        }
        assert_eq!(player.speed_ups, MAX_SPEED_UPS);
        assert_eq!(player.speed, PLAYER_BASE_SPEED + MAX_SPEED_UPS as f32);
        assert_eq!(player.power_meter, POWER_METER_EMPTY);
    }

    #[test]
    fn test_shield_upgrade() {
        let mut player = Player::default();
        player.power_meter = 5;
        player.activate_powerup();
        assert!(player.has_shield);
        assert_eq!(player.shield_hp, SHIELD_MAX_HP);
    }

    #[test]
    fn test_shoot_double_laser() {
        let mut player = Player::default();
        player.has_double = true;
        player.has_laser = true;
        let shots = player.shoot(0);
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].kind, BulletKind::Laser);
        assert_eq!(shots[1].kind, BulletKind::Double);

        player.has_missile = true;
        let shots = player.shoot(1);
        assert_eq!(shots.len(), 3);
        assert_eq!(shots[2].kind, BulletKind::Missile);

        // Missile cap reached
        let shots = player.shoot(MAX_MISSILES);
        assert_eq!(shots.len(), 2);
    }

    proptest! {
        #[test]
        fn test_meter_cycles(pickups in 1usize..100) {
            let mut player = Player::default();
            for _ in 0..pickups {
                player.advance_power_meter();
                prop_assert!((0..POWER_SLOTS).contains(&player.power_meter));
            }
            prop_assert_eq!(player.power_meter as usize, (pickups - 1) % 6);
        }
    }
}
