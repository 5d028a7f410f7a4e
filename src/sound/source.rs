//! Sound source management.
//!
//! A sound is either a file in the configured sound directory or a
//! generated tone used when the alarm file is missing.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// File name of the alarm sound inside the sound directory.
pub const ALARM_FILE_NAME: &str = "alarm.mp3";

/// Frequency of the fallback alarm tone.
pub const FALLBACK_TONE_HZ: f32 = 880.0;

/// Length of the fallback alarm tone.
pub const FALLBACK_TONE_MS: u64 = 600;

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "aiff", "m4a"];

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// Display name (e.g., "Rain").
        name: String,
        /// Full path to the file.
        path: PathBuf,
    },
    /// A generated sine tone.
    Tone {
        /// Display name.
        name: String,
        /// Frequency in Hz.
        frequency_hz: f32,
        /// Length in milliseconds.
        duration_ms: u64,
    },
}

impl SoundSource {
    /// Creates a file sound source.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates the fallback alarm tone.
    #[must_use]
    pub fn fallback_tone() -> Self {
        Self::Tone {
            name: "alarm".to_string(),
            frequency_hz: FALLBACK_TONE_HZ,
            duration_ms: FALLBACK_TONE_MS,
        }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Tone { name, .. } => name,
        }
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Tone { .. } => None,
        }
    }

    /// Returns true if this is a generated tone.
    #[must_use]
    pub fn is_tone(&self) -> bool {
        matches!(self, Self::Tone { .. })
    }

    /// Checks that a file source exists and has a supported extension.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::Undecodable` for an unsupported extension and
    /// `SoundError::FileMissing` for a missing file.
    pub fn check(&self) -> Result<(), SoundError> {
        let Some(path) = self.path() else {
            return Ok(());
        };

        let supported = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
        if !supported {
            return Err(SoundError::Undecodable {
                path: path.to_path_buf(),
                reason: "unsupported format".to_string(),
            });
        }
        if !path.is_file() {
            return Err(SoundError::FileMissing {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Returns the alarm source inside `sound_dir`.
#[must_use]
pub fn alarm_sound(sound_dir: &Path) -> SoundSource {
    SoundSource::file("alarm", sound_dir.join(ALARM_FILE_NAME))
}
