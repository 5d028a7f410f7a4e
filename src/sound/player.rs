//! Audio sink implementation using rodio.
//!
//! Each looping request gets its own `Sink`, kept until it is stopped.
//! One-shot requests are detached and play out in the background.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;
use super::{AudioSink, OutputHandle, PlaybackRequest};

/// Amplitude of the generated fallback tone.
const TONE_AMPLITUDE: f32 = 0.3;

/// An audio sink backed by the default output device.
///
/// The output stream is not `Send`; the sink lives on the thread that
/// created it, which is the single session thread.
pub struct RodioAudioSink {
    /// The audio output stream and its handle, absent when disabled.
    stream: Option<(OutputStream, OutputStreamHandle)>,
    /// Looping outputs that are still playing.
    outputs: Mutex<HashMap<OutputHandle, Sink>>,
    /// Source of output handles.
    next_handle: AtomicU64,
}

impl RodioAudioSink {
    /// Opens the default audio output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceUnavailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let stream = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceUnavailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            stream: Some(stream),
            outputs: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        })
    }

    /// Creates a sink that accepts every request and plays nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            stream: None,
            outputs: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    fn allocate_handle(&self) -> OutputHandle {
        OutputHandle(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    fn outputs(&self) -> std::sync::MutexGuard<'_, HashMap<OutputHandle, Sink>> {
        self.outputs.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn open_sink(handle: &OutputStreamHandle, request: &PlaybackRequest) -> Result<Sink, SoundError> {
        request.source.check()?;

        let sink = Sink::try_new(handle).map_err(|e| SoundError::Output(e.to_string()))?;
        sink.set_volume(request.volume);

        match &request.source {
            SoundSource::File { path, .. } if request.looping => {
                sink.append(Decoder::new_looped(open_file(path)?).map_err(|e| undecodable(path, e))?);
            }
            SoundSource::File { path, .. } => {
                sink.append(Decoder::new(open_file(path)?).map_err(|e| undecodable(path, e))?);
            }
            SoundSource::Tone {
                frequency_hz,
                duration_ms,
                ..
            } => {
                let tone = SineWave::new(*frequency_hz)
                    .take_duration(Duration::from_millis(*duration_ms))
                    .amplify(TONE_AMPLITUDE);
                if request.looping {
                    sink.append(tone.repeat_infinite());
                } else {
                    sink.append(tone);
                }
            }
        }

        Ok(sink)
    }
}

impl AudioSink for RodioAudioSink {
    fn play(&self, request: &PlaybackRequest) -> Result<OutputHandle, SoundError> {
        let handle = self.allocate_handle();

        let Some((_, stream_handle)) = &self.stream else {
            debug!(source = request.source.name(), "Sound playback disabled, skipping");
            return Ok(handle);
        };

        let sink = Self::open_sink(stream_handle, request)?;
        debug!(
            source = request.source.name(),
            volume = request.volume,
            looping = request.looping,
            "Sound playback started"
        );

        if request.looping {
            self.outputs().insert(handle, sink);
        } else {
            // Non-blocking: the one-shot keeps playing after we return
            sink.detach();
        }
        Ok(handle)
    }

    fn set_volume(&self, handle: OutputHandle, volume: f32) {
        if let Some(sink) = self.outputs().get(&handle) {
            sink.set_volume(volume);
        }
    }

    fn stop(&self, handle: OutputHandle) {
        if let Some(sink) = self.outputs().remove(&handle) {
            sink.stop();
            debug!(?handle, "Sound playback stopped");
        }
    }

    fn is_disabled(&self) -> bool {
        self.stream.is_none()
    }
}

impl std::fmt::Debug for RodioAudioSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAudioSink")
            .field("disabled", &self.is_disabled())
            .field("outputs", &self.outputs().len())
            .finish_non_exhaustive()
    }
}

fn open_file(path: &Path) -> Result<BufReader<File>, SoundError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|_| SoundError::FileMissing {
            path: path.to_path_buf(),
        })
}

fn undecodable(path: &Path, e: rodio::decoder::DecoderError) -> SoundError {
    SoundError::Undecodable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Creates an audio sink, falling back to a disabled one if audio is unavailable.
///
/// If audio initialization fails, a warning is logged.
#[must_use]
pub fn try_create_sink(disabled: bool) -> RodioAudioSink {
    if disabled {
        return RodioAudioSink::disabled();
    }
    match RodioAudioSink::new() {
        Ok(sink) => sink,
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            RodioAudioSink::disabled()
        }
    }
}
