//! Audio errors.
//!
//! Every audio error is recoverable: the session logs it and carries on.
//! Missing or undecodable files are what the alarm falls back to a tone for.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoundError {
    /// No output device could be opened.
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceUnavailable(String),

    #[error("サウンドファイルが見つかりません: {}", path.display())]
    FileMissing { path: PathBuf },

    /// The file exists but is not audio rodio can decode.
    #[error("サウンドファイルを再生できません: {} ({reason})", path.display())]
    Undecodable { path: PathBuf, reason: String },

    /// The device refused a new output.
    #[error("音声出力エラー: {0}")]
    Output(String),
}

impl SoundError {
    /// Returns true if a one-shot sound should fall back to the generated tone.
    #[must_use]
    pub fn should_fallback_to_tone(&self) -> bool {
        matches!(self, Self::FileMissing { .. } | Self::Undecodable { .. })
    }

    /// Returns a hint shown next to the logged error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceUnavailable(_) => "--no-sound で音声なしで起動できます",
            Self::FileMissing { .. } => "--sound-dir でサウンドファイルの場所を指定してください",
            Self::Undecodable { .. } => "mp3 / wav / ogg / flac のファイルを使用してください",
            Self::Output(_) => "オーディオ設定を確認してください",
        }
    }
}
