//! Game state and phase transitions
//!
//! `GameState` is the whole session: player, entity collections, terrain,
//! counters and the seeded RNG. The phase transition methods here are the
//! only places `phase` changes.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entity::{Bullet, BulletKind, Enemy, PowerCapsule};
use super::events::GameEvent;
use super::player::{PLAYER_START, Player};
use super::starfield::Starfield;
use super::terrain::Terrain;
use crate::audio::{MusicTrack, SoundEffect};

/// Length of the player explosion before game over (ticks)
pub const PLAYER_DEATH_TICKS: u32 = 60;
/// Distance gained per tick outside boss fights
pub const DISTANCE_PER_TICK: u32 = 2;

/// Top-level phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Player explosion cutscene, world frozen
    Dying,
    /// Run ended, waiting for restart
    GameOver,
    /// Boss defeated, waiting to advance
    StageComplete,
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Distance flown this stage
    pub distance: u32,
    /// Current stage (1-based)
    pub stage: u32,
    /// True while the stage boss is alive
    pub boss_mode: bool,
    /// Ticks simulated while Playing
    pub frame_count: u64,
    /// Ticks left in the player death cutscene
    pub death_timer: u32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub capsules: Vec<PowerCapsule>,
    /// Regular enemies and the boss
    pub enemies: Vec<Enemy>,
    pub terrain: Terrain,
    #[serde(skip)]
    pub starfield: Starfield,
    /// Events produced since the driver last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session sitting on the menu screen
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = Terrain::new(1, &mut rng);
        let starfield = Starfield::new(&mut rng);
        Self {
            seed,
            rng,
            phase: GamePhase::Menu,
            score: 0,
            distance: 0,
            stage: 1,
            boss_mode: false,
            frame_count: 0,
            death_timer: 0,
            player: Player::default(),
            bullets: Vec::new(),
            capsules: Vec::new(),
            enemies: Vec::new(),
            terrain,
            starfield,
            events: Vec::new(),
        }
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::info!("Phase {:?} -> {:?}", from, to);
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Menu -> Playing: fresh session
    pub fn start_game(&mut self) {
        self.score = 0;
        self.distance = 0;
        self.stage = 1;
        self.boss_mode = false;
        self.frame_count = 0;
        self.death_timer = 0;
        self.player.reset();
        self.bullets.clear();
        self.capsules.clear();
        self.enemies.clear();
        self.terrain.reset(self.stage, &mut self.rng);

        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::Music(MusicTrack::Game));
    }

    /// Playing -> Dying. Only the first call while Playing has any effect.
    pub fn start_player_death(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.death_timer = PLAYER_DEATH_TICKS;
        self.set_phase(GamePhase::Dying);
        self.events.push(GameEvent::Sound(SoundEffect::PlayerExplode));
    }

    /// Dying -> GameOver
    pub fn trigger_game_over(&mut self) {
        log::info!("Game over: score {} on stage {}", self.score, self.stage);
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::Music(MusicTrack::GameOver));
    }

    /// GameOver -> Menu
    pub fn go_to_menu(&mut self) {
        self.set_phase(GamePhase::Menu);
        self.events.push(GameEvent::Music(MusicTrack::Menu));
    }

    /// Append the stage boss and enter boss mode
    pub fn spawn_boss(&mut self) {
        if self.boss_mode {
            return;
        }
        self.boss_mode = true;
        self.enemies.push(Enemy::boss());
        self.events.push(GameEvent::BossSpawned);
        log::info!("Boss incoming on stage {}", self.stage);
    }

    /// Playing -> StageComplete once the boss cutscene has finished
    pub fn complete_stage(&mut self) {
        self.boss_mode = false;
        self.set_phase(GamePhase::StageComplete);
        self.events.push(GameEvent::StageCleared { stage: self.stage });
        self.events.push(GameEvent::Music(MusicTrack::Victory));
    }

    /// StageComplete -> Playing on the next stage
    pub fn advance_stage(&mut self) {
        self.stage += 1;
        self.distance = 0;
        self.boss_mode = false;
        self.enemies.clear();
        self.bullets.clear();
        self.capsules.clear();
        self.player.hp = self.player.max_hp;
        self.player.invincible = false;
        // The start point is open in every biome
        self.player.pos = PLAYER_START;
        self.terrain.reset(self.stage, &mut self.rng);

        log::info!("Stage {} ({:?})", self.stage, self.terrain.biome());
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::Music(MusicTrack::Game));
    }

    pub fn missiles_alive(&self) -> usize {
        self.bullets
            .iter()
            .filter(|b| b.active && b.kind == BulletKind::Missile)
            .count()
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    /// Drop every inactive entity
    pub fn cleanup(&mut self) {
        self.bullets.retain(|b| b.active);
        self.capsules.retain(|c| c.active);
        self.enemies.retain(|e| e.active);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
