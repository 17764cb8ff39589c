//! Tunnel Strike entry point
//!
//! Runs a headless autopilot session: the simulation, audio queue, renderer
//! and HUD all run, with logging sinks standing in for a screen and speakers.
//! Usage: `tunnel-strike [settings.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use tunnel_strike::audio::LogAudioSink;
use tunnel_strike::consts::SIM_DT;
use tunnel_strike::renderer::{Frame, RenderSink};
use tunnel_strike::settings::SETTINGS_FILE;
use tunnel_strike::sim::GamePhase;
use tunnel_strike::ui::LogUiSink;
use tunnel_strike::{Game, Settings};

/// Counts what would have been drawn
#[derive(Default)]
struct StatsRenderSink {
    frames: u64,
    vertices: u64,
}

impl RenderSink for StatsRenderSink {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        self.vertices += frame.vertices().len() as u64;
    }
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    phase: GamePhase,
    stage: u32,
    score: u64,
    distance: u32,
    frames_rendered: u64,
    vertices_rendered: u64,
    effects_played: u64,
    notes_played: u64,
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::init();
    log::info!("Tunnel Strike (headless) starting...");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| SETTINGS_FILE.to_string());
    let settings = Settings::load_from(&path);
    let seed = settings.seed.unwrap_or_else(time_seed);
    let ticks = settings.demo_ticks;

    let mut game = Game::new(seed, settings);
    game.set_idle_mode(true);

    let mut audio = LogAudioSink::default();
    let mut render = StatsRenderSink::default();
    let mut ui = LogUiSink::default();
    let mut last_phase = game.state().phase;

    for i in 0..ticks {
        game.step();

        let now = (i + 1) as f64 * SIM_DT as f64;
        game.flush_audio(&mut audio, now);
        game.render(&mut render);
        game.update_ui(&mut ui, now * 1000.0);

        let phase = game.state().phase;
        if phase != last_phase {
            if game.is_game_over() {
                log::info!("Run ended at tick {}", i + 1);
            }
            last_phase = phase;
        }
    }

    let state = game.state();
    let summary = RunSummary {
        seed,
        ticks,
        phase: state.phase,
        stage: state.stage,
        score: state.score,
        distance: state.distance,
        frames_rendered: render.frames,
        vertices_rendered: render.vertices,
        effects_played: audio.effects_played,
        notes_played: audio.notes_played,
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize run summary: {}", e),
    }
}
