//! Sound cues emitted by the simulation
//!
//! The engine only fires cue tags; what they sound like is up to the
//! implementation. In a terminal the bell is the only sound available.

use std::io::Write;

use tracing::{debug, warn};

/// Events the engine wants the player to hear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Eaten,
    GameOver,
}

/// Player-facing audio toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSettings {
    pub music: bool,
    pub sfx: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music: true,
            sfx: true,
        }
    }
}

/// Fire-and-forget audio sink
pub trait AudioCue {
    fn play(&mut self, cue: Cue);
    fn settings(&self) -> AudioSettings;
    fn apply(&mut self, settings: AudioSettings);
}

/// Rings the terminal bell for sound effects
#[derive(Debug, Default)]
pub struct TerminalBell {
    settings: AudioSettings,
    music_warned: bool,
    bell_failed: bool,
}

impl TerminalBell {
    pub fn new(settings: AudioSettings) -> Self {
        let mut bell = Self::default();
        bell.apply(settings);
        bell
    }
}

impl AudioCue for TerminalBell {
    fn play(&mut self, cue: Cue) {
        if !self.settings.sfx || self.bell_failed {
            return;
        }
        debug!(?cue, "ringing bell");
        let mut out = std::io::stdout();
        if let Err(err) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!(%err, "terminal bell unavailable, effects disabled");
            self.bell_failed = true;
        }
    }

    fn settings(&self) -> AudioSettings {
        self.settings
    }

    fn apply(&mut self, settings: AudioSettings) {
        if settings.music && !self.music_warned {
            warn!("background music is not available in a terminal; playing without it");
            self.music_warned = true;
        }
        self.settings = settings;
    }
}

/// Audio sink that drops every cue
#[derive(Debug, Default, Clone)]
pub struct Silent {
    settings: AudioSettings,
}

impl AudioCue for Silent {
    fn play(&mut self, _cue: Cue) {}

    fn settings(&self) -> AudioSettings {
        self.settings
    }

    fn apply(&mut self, settings: AudioSettings) {
        self.settings = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_enable_everything() {
        let settings = AudioSettings::default();
        assert!(settings.music);
        assert!(settings.sfx);
    }

    #[test]
    fn test_muted_bell_plays_nothing() {
        let mut bell = TerminalBell::new(AudioSettings {
            music: false,
            sfx: false,
        });
        bell.play(Cue::Eaten);
        assert!(!bell.bell_failed);
        assert!(!bell.music_warned);
    }

    #[test]
    fn test_music_warning_is_reported_once() {
        let mut bell = TerminalBell::new(AudioSettings::default());
        assert!(bell.music_warned);
        bell.apply(AudioSettings {
            music: false,
            sfx: true,
        });
        bell.apply(AudioSettings::default());
        assert!(bell.settings().music);
    }

    #[test]
    fn test_silent_keeps_settings() {
        let mut silent = Silent::default();
        let settings = AudioSettings {
            music: false,
            sfx: true,
        };
        silent.apply(settings);
        silent.play(Cue::GameOver);
        assert_eq!(silent.settings(), settings);
    }
}
