//! Sound playback system for Flow State.
//!
//! This module provides:
//!
//! - The ambient track catalog
//! - `AudioController`, which owns track selection, playback and volume
//! - The one-shot completion alarm
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ AudioController  │ ← selection, volume, alarm
//! └────────┬─────────┘
//!          │ PlaybackRequest
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │    AudioSink     │────▶│  RodioAudioSink  │
//! │     (trait)      │     ├──────────────────┤
//! │                  │────▶│  MockAudioSink   │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use flowstate::sound::{try_create_sink, AudioController};
//!
//! let sink = try_create_sink(false);
//! let mut audio = AudioController::new(sink, "sounds", 50);
//! audio.select_track("rain");
//! audio.toggle_playback();
//! ```

mod catalog;
mod controller;
mod error;
mod player;
mod source;

use std::collections::HashMap;
use std::sync::Mutex;

pub use catalog::{find_track, Track, TRACKS};
pub use controller::{AudioController, ALARM_VOLUME};
pub use error::SoundError;
pub use player::{try_create_sink, RodioAudioSink};
pub use source::{alarm_sound, SoundSource, ALARM_FILE_NAME};

/// Identifies one output started by an `AudioSink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputHandle(pub u64);

/// A request to start an output.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRequest {
    /// What to play
    pub source: SoundSource,
    /// Volume in `[0, 1]`
    pub volume: f32,
    /// Whether the source repeats until stopped
    pub looping: bool,
}

/// Trait for audio output implementations.
///
/// This trait abstracts the audio device, allowing for different
/// implementations (e.g., rodio-based, mock for testing).
pub trait AudioSink {
    /// Starts an output for the request.
    ///
    /// This method is non-blocking. Looping outputs run until `stop`;
    /// one-shot outputs run to their end and need no handle management.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be started.
    fn play(&self, request: &PlaybackRequest) -> Result<OutputHandle, SoundError>;

    /// Changes the volume of a running output. Unknown handles are ignored.
    fn set_volume(&self, handle: OutputHandle, volume: f32);

    /// Halts and releases an output. Unknown handles are ignored.
    fn stop(&self, handle: OutputHandle);

    /// Returns true if the sink plays nothing.
    fn is_disabled(&self) -> bool;
}

impl<S: AudioSink + ?Sized> AudioSink for &S {
    fn play(&self, request: &PlaybackRequest) -> Result<OutputHandle, SoundError> {
        (**self).play(request)
    }

    fn set_volume(&self, handle: OutputHandle, volume: f32) {
        (**self).set_volume(handle, volume)
    }

    fn stop(&self, handle: OutputHandle) {
        (**self).stop(handle)
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }
}

/// Mock audio sink for testing.
///
/// Records every request and keeps looping outputs "active" until stopped.
#[derive(Debug, Default)]
pub struct MockAudioSink {
    play_calls: Mutex<Vec<PlaybackRequest>>,
    active: Mutex<HashMap<OutputHandle, PlaybackRequest>>,
    stop_calls: Mutex<Vec<OutputHandle>>,
    next_handle: Mutex<u64>,
    should_fail: Mutex<bool>,
    max_concurrent: Mutex<usize>,
}

impl MockAudioSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `play` call fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        *lock(&self.should_fail) = should_fail;
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        lock(&self.play_calls).len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<PlaybackRequest> {
        lock(&self.play_calls).clone()
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        lock(&self.stop_calls).len()
    }

    /// Returns the looping outputs that are still running.
    #[must_use]
    pub fn active_outputs(&self) -> Vec<(OutputHandle, PlaybackRequest)> {
        let mut outputs: Vec<_> = lock(&self.active)
            .iter()
            .map(|(handle, request)| (*handle, request.clone()))
            .collect();
        outputs.sort_by_key(|(handle, _)| handle.0);
        outputs
    }

    /// Returns the current volume of an active output.
    #[must_use]
    pub fn volume_of(&self, handle: OutputHandle) -> Option<f32> {
        lock(&self.active).get(&handle).map(|request| request.volume)
    }

    /// Returns the highest number of simultaneously active looping outputs.
    #[must_use]
    pub fn max_concurrent_outputs(&self) -> usize {
        *lock(&self.max_concurrent)
    }
}

impl AudioSink for MockAudioSink {
    fn play(&self, request: &PlaybackRequest) -> Result<OutputHandle, SoundError> {
        lock(&self.play_calls).push(request.clone());
        if *lock(&self.should_fail) {
            return Err(SoundError::Output("Mock failure".to_string()));
        }

        let handle = {
            let mut next = lock(&self.next_handle);
            *next += 1;
            OutputHandle(*next)
        };

        if request.looping {
            let mut active = lock(&self.active);
            active.insert(handle, request.clone());
            let mut max = lock(&self.max_concurrent);
            *max = (*max).max(active.len());
        }
        Ok(handle)
    }

    fn set_volume(&self, handle: OutputHandle, volume: f32) {
        if let Some(request) = lock(&self.active).get_mut(&handle) {
            request.volume = volume;
        }
    }

    fn stop(&self, handle: OutputHandle) {
        lock(&self.stop_calls).push(handle);
        lock(&self.active).remove(&handle);
    }

    fn is_disabled(&self) -> bool {
        false
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambient() -> PlaybackRequest {
        PlaybackRequest {
            source: SoundSource::file("Rain", "/sounds/rain.mp3"),
            volume: 0.5,
            looping: true,
        }
    }

    #[test]
    fn test_mock_tracks_active_outputs() {
        let mock = MockAudioSink::new();

        let handle = mock.play(&ambient()).unwrap();
        assert_eq!(mock.active_outputs().len(), 1);
        assert_eq!(mock.volume_of(handle), Some(0.5));

        mock.set_volume(handle, 0.2);
        assert_eq!(mock.volume_of(handle), Some(0.2));

        mock.stop(handle);
        assert!(mock.active_outputs().is_empty());
        assert_eq!(mock.stop_count(), 1);
    }

    #[test]
    fn test_mock_one_shot_is_not_active() {
        let mock = MockAudioSink::new();
        let request = PlaybackRequest {
            looping: false,
            ..ambient()
        };

        mock.play(&request).unwrap();

        assert_eq!(mock.play_count(), 1);
        assert!(mock.active_outputs().is_empty());
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockAudioSink::new();
        mock.set_should_fail(true);

        assert!(mock.play(&ambient()).is_err());
        assert_eq!(mock.play_count(), 1);
        assert!(mock.active_outputs().is_empty());
    }

    #[test]
    fn test_mock_max_concurrent() {
        let mock = MockAudioSink::new();
        let a = mock.play(&ambient()).unwrap();
        let _b = mock.play(&ambient()).unwrap();
        mock.stop(a);

        assert_eq!(mock.max_concurrent_outputs(), 2);
    }

    #[test]
    fn test_sink_by_reference() {
        let mock = MockAudioSink::new();
        let by_ref = &mock;

        by_ref.play(&ambient()).unwrap();

        assert_eq!(mock.play_count(), 1);
    }
}
