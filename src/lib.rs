//! Tunnel Strike - A side-scrolling tunnel shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, terrain, collisions, game phases)
//! - `game`: Fixed timestep frame driver that feeds the collaborator sinks
//! - `renderer`: Backend-neutral draw lists
//! - `platform`: Input device sampling and press-edge detection
//! - `audio`: Sound/music command queue and step sequencer
//! - `ui`: HUD text and overlay panels

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second). All speeds are pixels/tick.
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Horizontal scroll speed shared by terrain and capsules
    pub const SCROLL_SPEED: f32 = 2.0;
    /// Distance travelled before the stage boss appears
    pub const BOSS_DISTANCE: u32 = 2000;
}
