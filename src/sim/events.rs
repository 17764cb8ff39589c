//! Events emitted by the simulation during a tick
//!
//! The core never calls the audio or UI collaborators directly. It appends
//! events here and the frame driver drains them after the tick.

use glam::Vec2;

use super::state::GamePhase;
use crate::audio::{MusicTrack, SoundEffect};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Fire-and-forget sound cue
    Sound(SoundEffect),
    /// Switch background music
    Music(MusicTrack),
    PhaseChanged { from: GamePhase, to: GamePhase },
    EnemyDestroyed { pos: Vec2 },
    BossSpawned,
    BossDefeated,
    /// Boss cutscene finished and the stage is cleared
    StageCleared { stage: u32 },
    PlayerDamaged { hp: u32 },
    ShieldHit { remaining: u32 },
    PowerMeterChanged { meter: i8 },
}
