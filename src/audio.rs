//! Audio command queue and music step sequencer
//!
//! The simulation only names what should be heard. Synthesis is left to an
//! `AudioSink` implementation (Web Audio, a native mixer, or the logging sink
//! used by the headless binary).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fires
    Shoot,
    /// Enemy destroyed, boss hit, boss death flashes
    Explosion,
    /// Power capsule collected
    PowerupCollect,
    /// Upgrade committed from the power meter
    PowerupActivate,
    /// Player ship destroyed
    PlayerExplode,
    /// Player loses hp or shield
    PlayerDamage,
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Menu,
    Game,
    GameOver,
    Victory,
}

/// Commands queued for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    /// Play an effect at the given volume (0.0 - 1.0)
    Effect { effect: SoundEffect, volume: f32 },
    PlayMusic(MusicTrack),
    StopMusic,
}

/// A scheduled note for the music backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Frequency in Hz
    pub freq: f32,
    /// Start time on the audio clock (seconds)
    pub start: f64,
    pub duration: f64,
    pub volume: f32,
}

/// Something that can produce sound
pub trait AudioSink {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
    fn play_note(&mut self, note: Note);
    fn stop_music(&mut self);
}

/// Sink that only logs, used when no audio device is present
#[derive(Debug, Default)]
pub struct LogAudioSink {
    pub effects_played: u64,
    pub notes_played: u64,
}

impl AudioSink for LogAudioSink {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        self.effects_played += 1;
        log::trace!("sfx {:?} @ {:.2}", effect, volume);
    }

    fn play_note(&mut self, note: Note) {
        self.notes_played += 1;
        log::trace!("note {:.0} Hz at {:.2}s", note.freq, note.start);
    }

    fn stop_music(&mut self) {
        log::trace!("music stopped");
    }
}

/// How far ahead of the audio clock notes are scheduled (seconds)
pub const SCHEDULE_LOOKAHEAD: f64 = 0.1;

/// A looping note pattern. Frequency 0 is a rest.
#[derive(Debug, Clone, Copy)]
pub struct TrackPattern {
    pub notes: &'static [f32],
    /// Seconds per step
    pub interval: f64,
}

impl MusicTrack {
    pub fn pattern(&self) -> TrackPattern {
        match self {
            // Am7 arpeggio
            MusicTrack::Menu => TrackPattern {
                notes: &[220.0, 0.0, 261.0, 0.0, 329.0, 0.0, 392.0, 0.0],
                interval: 0.25,
            },
            // Driving bass
            MusicTrack::Game => TrackPattern {
                notes: &[110.0, 110.0, 220.0, 110.0, 130.0, 130.0, 260.0, 130.0],
                interval: 0.15,
            },
            MusicTrack::GameOver => TrackPattern {
                notes: &[100.0, 95.0, 90.0, 85.0, 80.0, 75.0, 70.0, 65.0],
                interval: 0.3,
            },
            // Rising fanfare
            MusicTrack::Victory => TrackPattern {
                notes: &[262.0, 330.0, 392.0, 523.0, 0.0, 392.0, 523.0, 0.0],
                interval: 0.2,
            },
        }
    }
}

/// Step sequencer that hands out notes slightly ahead of playback
#[derive(Debug, Default)]
pub struct MusicSequencer {
    current: Option<MusicTrack>,
    next_note_time: f64,
    note_index: usize,
}

impl MusicSequencer {
    pub fn current(&self) -> Option<MusicTrack> {
        self.current
    }

    /// Start a track. Restarting the track already playing is a no-op.
    pub fn play(&mut self, track: MusicTrack, now: f64) {
        if self.current == Some(track) {
            return;
        }
        self.current = Some(track);
        self.note_index = 0;
        self.next_note_time = now;
    }

    pub fn stop(&mut self) {
        self.current = None;
    }

    /// Every note due before `now + SCHEDULE_LOOKAHEAD`
    pub fn schedule(&mut self, now: f64, volume: f32) -> Vec<Note> {
        let Some(track) = self.current else {
            return Vec::new();
        };
        let pattern = track.pattern();
        let mut notes = Vec::new();

        while self.next_note_time < now + SCHEDULE_LOOKAHEAD {
            let freq = pattern.notes[self.note_index];
            if freq > 0.0 {
                notes.push(Note {
                    freq,
                    start: self.next_note_time,
                    duration: pattern.interval,
                    volume,
                });
            }
            self.next_note_time += pattern.interval;
            self.note_index = (self.note_index + 1) % pattern.notes.len();
        }

        notes
    }
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager {
    queue: VecDeque<AudioCommand>,
    sequencer: MusicSequencer,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            sequencer: MusicSequencer::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Queue a sound effect (dropped when inaudible)
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.effective_sfx_volume();
        if volume <= 0.0 {
            return;
        }
        self.queue.push_back(AudioCommand::Effect { effect, volume });
    }

    pub fn play_music(&mut self, track: MusicTrack) {
        self.queue.push_back(AudioCommand::PlayMusic(track));
    }

    pub fn stop_music(&mut self) {
        self.queue.push_back(AudioCommand::StopMusic);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.sequencer.current()
    }

    /// Deliver queued commands and due music notes to the sink.
    ///
    /// `now` is the sink's audio clock in seconds.
    pub fn flush(&mut self, sink: &mut dyn AudioSink, now: f64) {
        while let Some(cmd) = self.queue.pop_front() {
            match cmd {
                AudioCommand::Effect { effect, volume } => sink.play_effect(effect, volume),
                AudioCommand::PlayMusic(track) => {
                    if self.sequencer.current() != Some(track) {
                        sink.stop_music();
                    }
                    self.sequencer.play(track, now);
                }
                AudioCommand::StopMusic => {
                    self.sequencer.stop();
                    sink.stop_music();
                }
            }
        }

        let volume = self.effective_music_volume();
        for note in self.sequencer.schedule(now, volume) {
            if volume > 0.0 {
                sink.play_note(note);
            }
        }
    }
}
