//! HUD text and overlay panels
//!
//! Built from the state after each frame and pushed to a `UiSink` (DOM,
//! terminal, or the logging sink used by the headless binary).

use serde::Serialize;

use crate::sim::{GamePhase, GameState, Upgrade};

/// One slot of the power meter bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowerSlot {
    pub label: &'static str,
    /// Meter currently points here
    pub highlighted: bool,
    /// Upgrade already owned
    pub owned: bool,
}

/// Heads-up display contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hud {
    /// "SCORE: 000000"
    pub score_text: String,
    pub stage: u32,
    pub distance: u32,
    pub hp: u32,
    pub shield_hp: u32,
    pub power_slots: Vec<PowerSlot>,
    /// Only present when the FPS counter is enabled
    pub fps: Option<u32>,
}

impl Hud {
    pub fn from_state(state: &GameState, fps: Option<u32>) -> Self {
        let player = &state.player;
        let power_slots = Upgrade::ALL
            .iter()
            .enumerate()
            .map(|(i, &upgrade)| PowerSlot {
                label: upgrade.label(),
                highlighted: i8::try_from(i).is_ok_and(|i| i == player.power_meter),
                owned: player.owns(upgrade),
            })
            .collect();

        Self {
            score_text: format!("SCORE: {:06}", state.score),
            stage: state.stage,
            distance: state.distance,
            hp: player.hp,
            shield_hp: if player.has_shield { player.shield_hp } else { 0 },
            power_slots,
            fps,
        }
    }
}

/// Full-screen panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overlay {
    /// Title screen
    Splash,
    GameOver { final_score: u64 },
    StageComplete { stage: u32 },
}

impl Overlay {
    /// Panel shown in a phase, if any
    pub fn for_phase(state: &GameState) -> Option<Self> {
        match state.phase {
            GamePhase::Menu => Some(Overlay::Splash),
            GamePhase::GameOver => Some(Overlay::GameOver {
                final_score: state.score,
            }),
            GamePhase::StageComplete => Some(Overlay::StageComplete { stage: state.stage }),
            GamePhase::Playing | GamePhase::Dying => None,
        }
    }
}

/// Something that displays the HUD and overlays
pub trait UiSink {
    fn update_hud(&mut self, hud: &Hud);
    fn show_overlay(&mut self, overlay: Overlay);
    fn hide_overlays(&mut self);
}

/// Sink that logs overlay changes and remembers the last HUD
#[derive(Debug, Default)]
pub struct LogUiSink {
    pub last_hud: Option<Hud>,
    pub overlay: Option<Overlay>,
}

impl UiSink for LogUiSink {
    fn update_hud(&mut self, hud: &Hud) {
        self.last_hud = Some(hud.clone());
    }

    fn show_overlay(&mut self, overlay: Overlay) {
        log::info!("Overlay: {:?}", overlay);
        self.overlay = Some(overlay);
    }

    fn hide_overlays(&mut self) {
        self.overlay = None;
    }
}
