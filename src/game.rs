//! Frame driver
//!
//! Owns the session and runs the simulation at a fixed 60 Hz regardless of
//! how often the host calls `update`. After each tick it drains the
//! simulation's events into the audio queue; rendering and HUD updates read
//! the state once per displayed frame.

use crate::audio::{AudioManager, AudioSink, MusicTrack};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::platform::FpsCounter;
use crate::renderer::{self, RenderSink};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::ui::{Hud, Overlay, UiSink};

/// Game instance holding all state
pub struct Game {
    state: GameState,
    settings: Settings,
    audio: AudioManager,
    /// Intents for upcoming ticks
    input: TickInput,
    /// Demo mode requested by the host, independent of per-frame input
    idle_mode: bool,
    accumulator: f32,
    fps: FpsCounter,
    /// Overlay currently on screen
    overlay: Option<Overlay>,
    /// Panel shown before the first `update_ui`
    overlay_synced: bool,
}

impl Game {
    pub fn new(seed: u64, settings: Settings) -> Self {
        log::info!("New session with seed {}", seed);
        let mut audio = AudioManager::from_settings(&settings);
        audio.play_music(MusicTrack::Menu);
        Self {
            state: GameState::new(seed),
            settings,
            audio,
            input: TickInput::default(),
            idle_mode: false,
            accumulator: 0.0,
            fps: FpsCounter::default(),
            overlay: None,
            overlay_synced: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.settings = settings;
    }

    /// Latch this frame's intents. Held directions replace the previous
    /// ones; press edges accumulate until a tick consumes them.
    pub fn set_input(&mut self, input: TickInput) {
        let pending = self.input;
        self.input = input;
        self.input.shoot |= pending.shoot;
        self.input.powerup |= pending.powerup;
        self.input.start |= pending.start;
    }

    /// Toggle demo mode. Stays on across `set_input` calls; input with its
    /// own `idle_mode` set also enables it.
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    /// Run simulation ticks for `dt` seconds of wall time.
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Advance exactly one tick
    pub fn step(&mut self) {
        let input = TickInput {
            idle_mode: self.input.idle_mode || self.idle_mode,
            ..self.input
        };
        tick(&mut self.state, &input);

        // Clear one-shot inputs after processing
        self.input.shoot = false;
        self.input.powerup = false;
        self.input.start = false;

        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(effect) => self.audio.play(effect),
                GameEvent::Music(track) => self.audio.play_music(track),
                GameEvent::PhaseChanged { from, to } => {
                    log::debug!("Phase event {:?} -> {:?}", from, to);
                }
                GameEvent::StageCleared { stage } => {
                    log::info!("Stage {} cleared, score {}", stage, self.state.score);
                }
                GameEvent::BossDefeated => log::info!("Boss defeated"),
                other => log::trace!("{:?}", other),
            }
        }
    }

    /// Hand queued sounds and due music notes to the audio backend
    pub fn flush_audio(&mut self, sink: &mut dyn AudioSink, now: f64) {
        self.audio.flush(sink, now);
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        let frame = renderer::build_frame(&self.state, &self.settings);
        sink.present(&frame);
    }

    /// Push HUD values and overlay changes. `time_ms` feeds the FPS counter.
    pub fn update_ui(&mut self, sink: &mut dyn UiSink, time_ms: f64) {
        self.fps.record(time_ms);
        let fps = self.settings.show_fps.then(|| self.fps.fps());
        sink.update_hud(&Hud::from_state(&self.state, fps));

        let overlay = Overlay::for_phase(&self.state);
        if overlay != self.overlay || !self.overlay_synced {
            sink.hide_overlays();
            if let Some(overlay) = overlay {
                sink.show_overlay(overlay);
            }
            self.overlay = overlay;
            self.overlay_synced = true;
        }
    }

    /// True once the run has ended and is waiting on the game-over panel
    pub fn is_game_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudioSink;
    use crate::renderer::Frame;
    use crate::sim::BulletKind;
    use crate::ui::LogUiSink;

    fn press_start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct CountingSink {
        frames: usize,
        shapes: usize,
    }

    impl RenderSink for CountingSink {
        fn present(&mut self, frame: &Frame) {
            self.frames += 1;
            self.shapes = frame.shapes.len();
        }
    }

    #[test]
    fn test_one_tick_per_sim_dt() {
        let mut game = Game::new(1, Settings::default());
        assert_eq!(game.update(SIM_DT), 1);
        assert_eq!(game.update(SIM_DT / 2.0), 0);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game = Game::new(1, Settings::default());
        let ticks = game.update(5.0);
        assert!((5..=6).contains(&ticks));
        assert!(game.update(-1.0) <= 1);
    }

    #[test]
    fn test_one_shot_consumed_once() {
        let mut game = Game::new(1, Settings::default());
        game.set_input(press_start());
        game.step();
        assert_eq!(game.state().phase, GamePhase::Playing);

        game.set_input(TickInput {
            shoot: true,
            ..Default::default()
        });
        game.step();
        game.step();
        game.step();
        let shots = game
            .state()
            .bullets
            .iter()
            .filter(|b| b.kind == BulletKind::Normal)
            .count();
        assert_eq!(shots, 1);
    }

    #[test]
    fn test_edges_survive_until_consumed() {
        let mut game = Game::new(1, Settings::default());
        game.set_input(press_start());
        // A later frame without the press must not swallow it
        game.set_input(TickInput::default());
        game.step();
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_events_reach_audio() {
        let mut game = Game::new(1, Settings::default());
        let mut sink = LogAudioSink::default();
        game.flush_audio(&mut sink, 0.0);
        assert_eq!(game.audio.current_track(), Some(MusicTrack::Menu));

        game.set_input(press_start());
        game.step();
        game.flush_audio(&mut sink, 1.0);
        assert_eq!(game.audio.current_track(), Some(MusicTrack::Game));
        assert!(sink.notes_played > 0);
    }

    #[test]
    fn test_overlays_follow_phase() {
        let mut game = Game::new(1, Settings::default());
        let mut ui = LogUiSink::default();
        game.update_ui(&mut ui, 16.0);
        assert_eq!(ui.overlay, Some(Overlay::Splash));
        assert!(ui.last_hud.is_some());

        game.set_input(press_start());
        game.step();
        game.update_ui(&mut ui, 32.0);
        assert_eq!(ui.overlay, None);
        let score = ui.last_hud.as_ref().map(|h| h.score_text.clone());
        assert_eq!(score.as_deref(), Some("SCORE: 000000"));
    }

    #[test]
    fn test_render_presents_frame() {
        let game = Game::new(1, Settings::default());
        let mut sink = CountingSink::default();
        game.render(&mut sink);
        assert_eq!(sink.frames, 1);
        assert!(sink.shapes > 0);
    }

    #[test]
    fn test_idle_mode_plays_itself() {
        let mut game = Game::new(11, Settings::default());
        game.set_idle_mode(true);
        for _ in 0..120 {
            game.step();
        }
        assert_ne!(game.state().phase, GamePhase::Menu);
        assert!(game.state().frame_count > 0);
    }

    #[test]
    fn test_idle_mode_survives_host_input() {
        let mut game = Game::new(11, Settings::default());
        game.set_idle_mode(true);
        for _ in 0..120 {
            // Mapper output from a host with nothing pressed
            game.set_input(TickInput::default());
            game.step();
        }
        assert_ne!(game.state().phase, GamePhase::Menu);

        let mut game = Game::new(11, Settings::default());
        game.set_idle_mode(true);
        game.set_idle_mode(false);
        game.set_input(TickInput::default());
        game.step();
        assert_eq!(game.state().phase, GamePhase::Menu);
    }
}
