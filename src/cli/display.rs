//! Display surfaces for Flow State.
//!
//! This module provides:
//! - The `DisplaySurface` trait the session renders through
//! - `TerminalDisplay`, which redraws a panel on stdout
//! - `RecordingDisplay`, a test double that records every call
//! - One-shot output for the non-interactive commands

use std::io::{self, Write};

use serde::Serialize;

use crate::engine::RingDash;
use crate::session::input::HELP_LINES;
use crate::sound::Track;
use crate::tasks::TaskEntry;
use crate::types::{format_time, Mode};

/// Application name shown in the title.
pub const APP_NAME: &str = "Flow State";

/// Number of cells in the text progress ring.
const RING_CELLS: usize = 30;

// ============================================================================
// DisplaySurface
// ============================================================================

/// Everything the session can show.
pub trait DisplaySurface {
    /// Shows the countdown and the progress ring.
    fn show_time(&mut self, time: &str, ring: RingDash, mode: Mode);

    /// Updates the start/pause button.
    fn show_timer_control(&mut self, running: bool);

    /// Updates the track name and the play/pause button.
    fn show_track(&mut self, track: Option<&Track>, playing: bool);

    /// Updates the volume slider.
    fn show_volume(&mut self, percent: u8);

    /// Shows the task list.
    fn show_tasks(&mut self, tasks: &[TaskEntry]);

    /// Enters or leaves full-window presentation.
    fn toggle_full_window(&mut self);

    /// Shows the command list.
    fn show_help(&mut self);

    /// Shows a one-line notice.
    fn show_notice(&mut self, message: &str);

    /// Removes the notice, if one is shown.
    fn clear_notice(&mut self);
}

/// Returns the window title for a countdown.
pub fn window_title(time: &str) -> String {
    format!("{} - {}", time, APP_NAME)
}

/// Renders the progress ring as a bar of `RING_CELLS` cells.
pub fn ring_bar(ring: RingDash) -> String {
    let filled = (ring.remaining_fraction() * RING_CELLS as f64).round() as usize;
    let filled = filled.min(RING_CELLS);
    format!("{}{}", "█".repeat(filled), "░".repeat(RING_CELLS - filled))
}

// ============================================================================
// TerminalDisplay
// ============================================================================

/// Redraws the whole panel on stdout after every update.
#[derive(Debug)]
pub struct TerminalDisplay {
    panel: Panel,
    full_window: bool,
}

/// Everything currently on screen.
#[derive(Debug, Clone, Default)]
struct Panel {
    time: String,
    ring: Option<RingDash>,
    mode: Mode,
    running: bool,
    track: Option<&'static str>,
    playing: bool,
    volume: u8,
    tasks: Vec<TaskEntry>,
    notice: Option<String>,
    help: bool,
}

impl TerminalDisplay {
    /// Creates a display with an empty panel.
    pub fn new() -> Self {
        Self {
            panel: Panel {
                time: format_time(Mode::default().duration_seconds()),
                ..Panel::default()
            },
            full_window: false,
        }
    }

    /// Renders the panel as text (without terminal control sequences).
    pub fn render(&self) -> String {
        let panel = &self.panel;
        let mut out = String::new();

        out.push_str(&format!("{}\n", APP_NAME));
        out.push_str("─────────────────────────────\n");
        let tabs: Vec<String> = Mode::ALL
            .iter()
            .map(|mode| {
                if *mode == panel.mode {
                    format!("[{}]", mode.label())
                } else {
                    format!(" {} ", mode.label())
                }
            })
            .collect();
        out.push_str(&format!("{}\n\n", tabs.join(" ")));

        out.push_str(&format!(
            "  {}{}\x1b[0m\n",
            accent_escape(panel.mode.accent_color()),
            panel.time
        ));
        if let Some(ring) = panel.ring {
            out.push_str(&format!("  {}\n", ring_bar(ring)));
        }
        let control = if panel.running { "|| 一時停止" } else { "> 開始" };
        out.push_str(&format!("  {}\n\n", control));

        let track = panel.track.unwrap_or("トラック未選択");
        let player = match (panel.track, panel.playing) {
            (None, _) => "-",
            (Some(_), true) => "||",
            (Some(_), false) => ">",
        };
        out.push_str(&format!("♪ {} [{}]  音量: {}\n\n", track, player, panel.volume));

        out.push_str("タスク\n");
        if panel.tasks.is_empty() {
            out.push_str("  (なし)\n");
        }
        for task in &panel.tasks {
            let check = if task.completed { "x" } else { " " };
            out.push_str(&format!("  {:>3}. [{}] {}\n", task.id, check, task.text));
        }

        if panel.help {
            out.push_str("\nコマンド\n");
            for (command, description) in HELP_LINES {
                out.push_str(&format!("  {:<22} {}\n", command, description));
            }
        }
        if let Some(notice) = &panel.notice {
            out.push_str(&format!("\n{}\n", notice));
        }
        out
    }

    fn redraw(&mut self) {
        let mut stdout = io::stdout().lock();
        // A failed redraw is retried by the next update.
        let _ = write!(
            stdout,
            "\x1b]0;{}\x07\x1b[2J\x1b[H{}> ",
            window_title(&self.panel.time),
            self.render()
        );
        let _ = stdout.flush();
    }

    /// Leaves full-window presentation if active.
    pub fn restore(&mut self) {
        if self.full_window {
            self.full_window = false;
            print!("\x1b[?1049l");
            let _ = io::stdout().flush();
        }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        self.restore();
    }
}

impl DisplaySurface for TerminalDisplay {
    fn show_time(&mut self, time: &str, ring: RingDash, mode: Mode) {
        self.panel.time = time.to_string();
        self.panel.ring = Some(ring);
        self.panel.mode = mode;
        self.redraw();
    }

    fn show_timer_control(&mut self, running: bool) {
        self.panel.running = running;
        self.redraw();
    }

    fn show_track(&mut self, track: Option<&Track>, playing: bool) {
        self.panel.track = track.map(|t| t.display_name);
        self.panel.playing = playing;
        self.redraw();
    }

    fn show_volume(&mut self, percent: u8) {
        self.panel.volume = percent;
        self.redraw();
    }

    fn show_tasks(&mut self, tasks: &[TaskEntry]) {
        self.panel.tasks = tasks.to_vec();
        self.redraw();
    }

    fn toggle_full_window(&mut self) {
        if self.full_window {
            self.restore();
        } else {
            self.full_window = true;
            print!("\x1b[?1049h");
        }
        self.redraw();
    }

    fn show_help(&mut self) {
        self.panel.help = !self.panel.help;
        self.redraw();
    }

    fn show_notice(&mut self, message: &str) {
        self.panel.notice = Some(message.to_string());
        self.redraw();
    }

    fn clear_notice(&mut self) {
        if self.panel.notice.take().is_some() {
            self.redraw();
        }
    }
}

/// Builds a truecolor foreground escape from `#rrggbb`.
fn accent_escape(hex: &str) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(255)
    };
    format!("\x1b[38;2;{};{};{}m", channel(1..3), channel(3..5), channel(5..7))
}

// ============================================================================
// RecordingDisplay
// ============================================================================

/// One call made on a `RecordingDisplay`.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Time {
        time: String,
        ring: RingDash,
        mode: Mode,
    },
    TimerControl {
        running: bool,
    },
    Track {
        track_id: Option<&'static str>,
        playing: bool,
    },
    Volume(u8),
    Tasks(Vec<TaskEntry>),
    FullWindow,
    Help,
    Notice(String),
    NoticeCleared,
}

/// Display that records calls for testing.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    calls: Vec<DisplayCall>,
    notice: Option<String>,
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[DisplayCall] {
        &self.calls
    }

    /// Returns the most recently shown time string.
    #[must_use]
    pub fn last_time(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            DisplayCall::Time { time, .. } => Some(time.as_str()),
            _ => None,
        })
    }

    /// Returns the most recently shown task list.
    #[must_use]
    pub fn last_tasks(&self) -> Option<&[TaskEntry]> {
        self.calls.iter().rev().find_map(|call| match call {
            DisplayCall::Tasks(tasks) => Some(tasks.as_slice()),
            _ => None,
        })
    }

    /// Returns the notice currently on screen.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn show_time(&mut self, time: &str, ring: RingDash, mode: Mode) {
        self.calls.push(DisplayCall::Time {
            time: time.to_string(),
            ring,
            mode,
        });
    }

    fn show_timer_control(&mut self, running: bool) {
        self.calls.push(DisplayCall::TimerControl { running });
    }

    fn show_track(&mut self, track: Option<&Track>, playing: bool) {
        self.calls.push(DisplayCall::Track {
            track_id: track.map(|t| t.id),
            playing,
        });
    }

    fn show_volume(&mut self, percent: u8) {
        self.calls.push(DisplayCall::Volume(percent));
    }

    fn show_tasks(&mut self, tasks: &[TaskEntry]) {
        self.calls.push(DisplayCall::Tasks(tasks.to_vec()));
    }

    fn toggle_full_window(&mut self) {
        self.calls.push(DisplayCall::FullWindow);
    }

    fn show_help(&mut self) {
        self.calls.push(DisplayCall::Help);
    }

    fn show_notice(&mut self, message: &str) {
        self.notice = Some(message.to_string());
        self.calls.push(DisplayCall::Notice(message.to_string()));
    }

    fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.calls.push(DisplayCall::NoticeCleared);
        }
    }
}

// ============================================================================
// Display
// ============================================================================

/// One row of the `modes` listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub duration_seconds: u32,
    pub accent_color: &'static str,
}

impl From<Mode> for ModeInfo {
    fn from(mode: Mode) -> Self {
        Self {
            id: mode.id(),
            label: mode.label(),
            duration_seconds: mode.duration_seconds(),
            accent_color: mode.accent_color(),
        }
    }
}

/// Returns the `modes` listing rows.
pub fn mode_infos() -> Vec<ModeInfo> {
    Mode::ALL.into_iter().map(ModeInfo::from).collect()
}

/// One-shot output for the non-interactive commands.
pub struct Display;

impl Display {
    /// Lists the modes and their durations.
    pub fn show_modes() {
        println!("モード一覧");
        println!("─────────────────────────────");
        for mode in Mode::ALL {
            println!(
                "  {:<12} {:<12} {}",
                mode.id(),
                mode.label(),
                format_time(mode.duration_seconds())
            );
        }
    }

    /// Lists the ambient tracks.
    pub fn show_tracks(tracks: &[Track]) {
        println!("環境音一覧");
        println!("─────────────────────────────");
        for track in tracks {
            println!("  {:<8} {:<8} {}", track.id, track.display_name, track.source_locator);
        }
    }

    /// Prints a value as pretty JSON.
    pub fn show_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
