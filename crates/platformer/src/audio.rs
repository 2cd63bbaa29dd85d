//! Playback side of the audio boundary.
//!
//! The simulation only raises [`AudioCommand`]s. `SoundManager` owns the
//! global enabled flag, remembers which music should be looping, and hands
//! clip names to a backend. A backend that fails once is dropped and the
//! game continues silently.
use thiserror::Error;
use tracing::{trace, warn};

use crate::sim::events::{AudioCommand, MusicTrack};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("clip `{clip}` is not loaded")]
    MissingClip { clip: &'static str },
    #[error("audio device unavailable: {0}")]
    Device(String),
}

pub trait AudioBackend {
    fn play(&mut self, clip: &'static str) -> Result<(), AudioError>;
    fn start_loop(&mut self, track: &'static str) -> Result<(), AudioError>;
    fn stop(&mut self, track: &'static str) -> Result<(), AudioError>;
}

/// Backend with no output device. Every trigger becomes a trace event.
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, clip: &'static str) -> Result<(), AudioError> {
        trace!(clip, "sound_played");
        Ok(())
    }

    fn start_loop(&mut self, track: &'static str) -> Result<(), AudioError> {
        trace!(track, "music_started");
        Ok(())
    }

    fn stop(&mut self, track: &'static str) -> Result<(), AudioError> {
        trace!(track, "music_stopped");
        Ok(())
    }
}

pub struct SoundManager {
    backend: Option<Box<dyn AudioBackend>>,
    enabled: bool,
    looping: Option<MusicTrack>,
}

impl SoundManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            enabled: true,
            looping: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// False once the backend has failed and been dropped.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn apply(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Play(effect) => {
                if self.enabled {
                    self.with_backend(|backend| backend.play(effect.into()));
                }
            }
            AudioCommand::Loop(track) => {
                self.looping = Some(track);
                if self.enabled {
                    self.with_backend(|backend| backend.start_loop(track.into()));
                }
            }
            AudioCommand::Stop(track) => {
                if self.looping == Some(track) {
                    self.looping = None;
                }
                if self.enabled {
                    self.with_backend(|backend| backend.stop(track.into()));
                }
            }
            AudioCommand::SetEnabled(enabled) => self.set_enabled(enabled),
        }
    }

    /// Disabling stops the music; enabling resumes whatever should be
    /// looping.
    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        let Some(track) = self.looping else {
            return;
        };
        if enabled {
            self.with_backend(|backend| backend.start_loop(track.into()));
        } else {
            self.with_backend(|backend| backend.stop(track.into()));
        }
    }

    fn with_backend(
        &mut self,
        operation: impl FnOnce(&mut dyn AudioBackend) -> Result<(), AudioError>,
    ) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(error) = operation(backend.as_mut()) {
            warn!(error = %error, "audio_backend_disabled");
            self.backend = None;
        }
    }
}
