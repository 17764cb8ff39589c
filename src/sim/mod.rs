//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each entity list)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod events;
pub mod player;
pub mod spawn;
pub mod starfield;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Rect, resolve_collisions, take_player_damage};
pub use entity::{BossPhase, BossState, Bullet, BulletKind, Enemy, EnemyKind, PowerCapsule};
pub use events::GameEvent;
pub use player::{MoveIntent, Player, Upgrade};
pub use starfield::{Star, Starfield};
pub use state::{GamePhase, GameState};
pub use terrain::{Biome, Segment, Terrain};
pub use tick::{TickInput, tick};
