//! Core data types for Flow State.
//!
//! This module defines the data structures used for:
//! - The focus/break mode table
//! - Countdown state management
//! - Session configuration with validation

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tokio::time::Interval;

// ============================================================================
// Mode
// ============================================================================

/// Accent color used for focus modes.
const FOCUS_ACCENT: &str = "#22d3ee";

/// Accent color used for break modes.
const BREAK_ACCENT: &str = "#34d399";

/// One of the four fixed focus/break durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// 25 minutes of focus
    ShortFocus,
    /// 50 minutes of focus
    LongFocus,
    /// 5 minute break
    ShortBreak,
    /// 10 minute break
    LongBreak,
}

impl Mode {
    /// All modes in display order.
    pub const ALL: [Mode; 4] = [
        Mode::ShortFocus,
        Mode::LongFocus,
        Mode::ShortBreak,
        Mode::LongBreak,
    ];

    /// Returns the fixed duration of the mode in seconds.
    pub const fn duration_seconds(&self) -> u32 {
        match self {
            Mode::ShortFocus => 25 * 60,
            Mode::LongFocus => 50 * 60,
            Mode::ShortBreak => 5 * 60,
            Mode::LongBreak => 10 * 60,
        }
    }

    /// Returns the identifier used by input events and the CLI.
    pub fn id(&self) -> &'static str {
        match self {
            Mode::ShortFocus => "short-focus",
            Mode::LongFocus => "long-focus",
            Mode::ShortBreak => "short-break",
            Mode::LongBreak => "long-break",
        }
    }

    /// Returns the label shown on the mode tab.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::ShortFocus => "Focus",
            Mode::LongFocus => "Deep Focus",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    /// Returns true for the two focus modes.
    pub fn is_focus(&self) -> bool {
        matches!(self, Mode::ShortFocus | Mode::LongFocus)
    }

    /// Returns the accent color (`#rrggbb`) of the mode.
    pub fn accent_color(&self) -> &'static str {
        if self.is_focus() {
            FOCUS_ACCENT
        } else {
            BREAK_ACCENT
        }
    }

    /// Looks a mode up by its identifier.
    ///
    /// Returns `None` for unrecognized identifiers.
    pub fn from_id(id: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|mode| mode.id() == id)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::ShortFocus
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::from_id(s).ok_or_else(|| {
            format!(
                "不明なモードです: {} (short-focus, long-focus, short-break, long-break)",
                s
            )
        })
    }
}

/// Formats seconds as `MM:SS`.
///
/// Durations never reach an hour, so there is no hour component.
pub fn format_time(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ============================================================================
// FlowConfig
// ============================================================================

/// Default radius of the progress ring.
pub const DEFAULT_RING_RADIUS: f64 = 163.0;

/// Default ambient volume (slider position, 0-100).
pub const DEFAULT_VOLUME_PERCENT: u8 = 50;

/// Configuration for a Flow State session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Mode selected when the session starts
    pub initial_mode: Mode,
    /// Ambient volume slider position (0-100)
    pub volume_percent: u8,
    /// Radius of the progress ring
    pub ring_radius: f64,
    /// Directory holding the track and alarm files
    pub sound_dir: PathBuf,
    /// Whether audio output is disabled
    pub no_sound: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            initial_mode: Mode::default(),
            volume_percent: DEFAULT_VOLUME_PERCENT,
            ring_radius: DEFAULT_RING_RADIUS,
            sound_dir: default_sound_dir(),
            no_sound: false,
        }
    }
}

impl FlowConfig {
    /// Sets the mode selected at startup.
    pub fn with_initial_mode(mut self, mode: Mode) -> Self {
        self.initial_mode = mode;
        self
    }

    /// Sets the initial ambient volume.
    pub fn with_volume_percent(mut self, volume: u8) -> Self {
        self.volume_percent = volume;
        self
    }

    /// Sets the directory holding sound files.
    pub fn with_sound_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sound_dir = dir.into();
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.volume_percent > 100 {
            return Err("音量は0-100の範囲で指定してください".to_string());
        }
        if !self.ring_radius.is_finite() || self.ring_radius <= 0.0 {
            return Err("リングの半径は正の数で指定してください".to_string());
        }
        if !self.no_sound && self.sound_dir.exists() && !self.sound_dir.is_dir() {
            return Err(format!(
                "サウンドディレクトリがディレクトリではありません: {}",
                self.sound_dir.display()
            ));
        }
        Ok(())
    }
}

/// Returns the default sound directory.
///
/// `<data_dir>/flowstate/sounds`, or `./sounds` when no data directory exists.
pub fn default_sound_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("flowstate").join("sounds"))
        .unwrap_or_else(|| PathBuf::from("sounds"))
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state owned by the timer engine.
///
/// `remaining_seconds <= total_seconds` always holds, and the timer is
/// running exactly when a tick interval is present.
#[derive(Debug)]
pub struct TimerState {
    mode: Mode,
    remaining_seconds: u32,
    total_seconds: u32,
    /// Repeating one-second interval while running
    interval: Option<Interval>,
}

impl TimerState {
    /// Creates a stopped state for the given mode with a full countdown.
    pub fn new(mode: Mode) -> Self {
        let duration = mode.duration_seconds();
        Self {
            mode,
            remaining_seconds: duration,
            total_seconds: duration,
            interval: None,
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Remaining seconds in the current countdown
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Full length of the current countdown
    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Switches mode, resetting the countdown and stopping it.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    /// Restores the full duration of the current mode and stops the countdown.
    pub fn reset(&mut self) {
        self.interval = None;
        self.remaining_seconds = self.mode.duration_seconds();
        self.total_seconds = self.remaining_seconds;
    }

    /// Installs a tick interval.
    ///
    /// Returns false without replacing anything if one is already installed.
    pub fn start(&mut self, interval: Interval) -> bool {
        if self.interval.is_some() {
            return false;
        }
        self.interval = Some(interval);
        true
    }

    /// Drops the tick interval, keeping the remaining time.
    ///
    /// Returns true if an interval was cancelled.
    pub fn pause(&mut self) -> bool {
        self.interval.take().is_some()
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown is at 0 afterwards.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Returns true while the countdown is running.
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Returns the installed interval, if any.
    pub fn interval_mut(&mut self) -> Option<&mut Interval> {
        self.interval.as_mut()
    }

    /// Overrides the remaining time (for testing).
    #[cfg(test)]
    pub(crate) fn set_remaining_seconds(&mut self, seconds: u32) {
        self.remaining_seconds = seconds.min(self.total_seconds);
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
