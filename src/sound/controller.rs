//! Ambient track selection and playback.
//!
//! The controller owns at most one looping output. Every path that starts
//! an output stops the previous one first.

use std::path::PathBuf;

use tracing::{debug, error, warn};

use super::catalog::{find_track, Track};
use super::source::{alarm_sound, SoundSource};
use super::{AudioSink, OutputHandle, PlaybackRequest};

/// Fixed volume of the completion alarm.
pub const ALARM_VOLUME: f32 = 0.5;

/// Owns the ambient playback state and the audio sink.
#[derive(Debug)]
pub struct AudioController<S: AudioSink> {
    sink: S,
    sound_dir: PathBuf,
    selected_track: Option<&'static Track>,
    is_playing: bool,
    volume: f32,
    current_output: Option<OutputHandle>,
}

impl<S: AudioSink> AudioController<S> {
    /// Creates a controller with nothing selected.
    ///
    /// `volume_percent` is the initial slider position (0-100).
    pub fn new(sink: S, sound_dir: impl Into<PathBuf>, volume_percent: u8) -> Self {
        Self {
            sink,
            sound_dir: sound_dir.into(),
            selected_track: None,
            is_playing: false,
            volume: normalize_volume(volume_percent.into()),
            current_output: None,
        }
    }

    /// Selects a track, stopping any current playback.
    ///
    /// Unknown track ids are ignored.
    pub fn select_track(&mut self, track_id: &str) {
        let Some(track) = find_track(track_id) else {
            debug!(track_id, "Ignoring unknown track");
            return;
        };

        if self.is_playing {
            self.stop();
        }
        self.selected_track = Some(track);
        debug!(track = track.id, "Track selected");
    }

    /// Starts or stops the selected track. Does nothing without a selection.
    pub fn toggle_playback(&mut self) {
        if self.selected_track.is_none() {
            return;
        }
        if self.is_playing {
            self.stop();
        } else {
            self.play();
        }
    }

    /// Starts looping the selected track at the current volume.
    ///
    /// A start failure is logged and playback is still marked as requested.
    pub fn play(&mut self) {
        let Some(track) = self.selected_track else {
            return;
        };

        self.release_output();

        let request = PlaybackRequest {
            source: track.source(&self.sound_dir),
            volume: self.volume,
            looping: true,
        };
        match self.sink.play(&request) {
            Ok(handle) => self.current_output = Some(handle),
            Err(e) => error!(track = track.id, "Audio playback failed: {} ({})", e, e.suggestion()),
        }
        self.is_playing = true;
    }

    /// Halts and releases the current output.
    pub fn stop(&mut self) {
        self.release_output();
        self.is_playing = false;
    }

    /// Sets the volume from a slider position; values above 100 are clamped.
    ///
    /// Applies immediately to a playing output.
    pub fn set_volume(&mut self, percent: u32) {
        self.volume = normalize_volume(percent);
        if let (Some(handle), true) = (self.current_output, self.is_playing) {
            self.sink.set_volume(handle, self.volume);
        }
    }

    /// Plays the completion alarm once at a fixed volume.
    ///
    /// Independent of the ambient track. Falls back to a generated tone
    /// when the alarm file cannot be played; failures are only logged.
    pub fn play_alarm_once(&self) {
        let request = PlaybackRequest {
            source: alarm_sound(&self.sound_dir),
            volume: ALARM_VOLUME,
            looping: false,
        };

        match self.sink.play(&request) {
            Ok(_) => {}
            Err(e) if e.should_fallback_to_tone() => {
                warn!("Alarm file unavailable, playing tone: {}", e);
                let tone = PlaybackRequest {
                    source: SoundSource::fallback_tone(),
                    ..request
                };
                if let Err(e) = self.sink.play(&tone) {
                    error!("Alarm playback failed: {}", e);
                }
            }
            Err(e) => error!("Alarm playback failed: {}", e),
        }
    }

    /// Returns the selected track, if any.
    pub fn selected_track(&self) -> Option<&'static Track> {
        self.selected_track
    }

    /// Returns true once a track is selected.
    pub fn can_play(&self) -> bool {
        self.selected_track.is_some()
    }

    /// Returns true while playback is requested.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Returns the normalized volume in `[0, 1]`.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Returns the volume as a slider position (0-100).
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }

    /// Returns the audio sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn release_output(&mut self) {
        if let Some(handle) = self.current_output.take() {
            self.sink.stop(handle);
        }
    }
}

fn normalize_volume(percent: u32) -> f32 {
    percent.min(100) as f32 / 100.0
}
