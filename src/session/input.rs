//! Input events for the interactive session.
//!
//! Each line typed on stdin is one discrete event, committed with Enter.
//! Parsing only recognizes the command word; whether a mode or track id
//! exists is decided by the controllers, which ignore unknown ids.

use std::fmt;
use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::tasks::TaskId;

// ============================================================================
// Line reader
// ============================================================================

/// Forwards lines from a blocking reader to the session.
///
/// Reads happen on a dedicated thread because a blocking read cannot be
/// cancelled; the thread is detached and ends with the process. The
/// channel closes at end of input.
///
/// # Errors
///
/// Returns an error if the reader thread cannot be spawned.
pub fn spawn_line_reader<R>(reader: R) -> io::Result<mpsc::UnboundedReceiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("input-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            debug!("Input reader finished");
        })?;
    Ok(rx)
}

// ============================================================================
// InputEvent
// ============================================================================

/// Discrete user events delivered to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Start/pause button
    ToggleTimer,
    /// Reset button
    Reset,
    /// Mode tab, with the mode identifier
    SelectMode(String),
    /// Track button, with the track identifier
    SelectTrack(String),
    /// Music play/pause button
    ToggleMusic,
    /// Volume slider position (0-100)
    SetVolume(u32),
    /// Commit the pending task text
    AddTask(String),
    /// Delete button of a task
    DeleteTask(TaskId),
    /// Checkbox of a task
    ToggleTask(TaskId),
    /// Full-window toggle
    FullWindow,
    /// Show the command list
    Help,
    /// Leave the session
    Quit,
    /// Anything else
    Unknown(String),
}

impl InputEvent {
    /// Parses one input line.
    ///
    /// Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<InputEvent> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(text) = line.strip_prefix('+') {
            return Some(InputEvent::AddTask(text.trim().to_string()));
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let event = match (command.to_ascii_lowercase().as_str(), rest) {
            ("s" | "start" | "pause", "") => InputEvent::ToggleTimer,
            ("r" | "reset", "") => InputEvent::Reset,
            ("mode", id) if !id.is_empty() => InputEvent::SelectMode(id.to_string()),
            ("track", id) if !id.is_empty() => InputEvent::SelectTrack(id.to_string()),
            ("m" | "music", "") => InputEvent::ToggleMusic,
            ("v" | "vol" | "volume", value) => match value.parse() {
                Ok(volume) => InputEvent::SetVolume(volume),
                Err(_) => InputEvent::Unknown(line.to_string()),
            },
            ("a" | "add", text) => InputEvent::AddTask(text.to_string()),
            ("d" | "del" | "delete", id) => match id.parse() {
                Ok(id) => InputEvent::DeleteTask(TaskId(id)),
                Err(_) => InputEvent::Unknown(line.to_string()),
            },
            ("x" | "done" | "toggle", id) => match id.parse() {
                Ok(id) => InputEvent::ToggleTask(TaskId(id)),
                Err(_) => InputEvent::Unknown(line.to_string()),
            },
            ("f" | "full", "") => InputEvent::FullWindow,
            ("h" | "?" | "help", "") => InputEvent::Help,
            ("q" | "quit" | "exit", "") => InputEvent::Quit,
            _ => InputEvent::Unknown(line.to_string()),
        };
        Some(event)
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEvent::ToggleTimer => write!(f, "start"),
            InputEvent::Reset => write!(f, "reset"),
            InputEvent::SelectMode(id) => write!(f, "mode {}", id),
            InputEvent::SelectTrack(id) => write!(f, "track {}", id),
            InputEvent::ToggleMusic => write!(f, "music"),
            InputEvent::SetVolume(volume) => write!(f, "vol {}", volume),
            InputEvent::AddTask(text) => write!(f, "add {}", text),
            InputEvent::DeleteTask(id) => write!(f, "del {}", id),
            InputEvent::ToggleTask(id) => write!(f, "done {}", id),
            InputEvent::FullWindow => write!(f, "full"),
            InputEvent::Help => write!(f, "help"),
            InputEvent::Quit => write!(f, "quit"),
            InputEvent::Unknown(line) => write!(f, "{}", line),
        }
    }
}

/// Command list shown by `help`.
pub const HELP_LINES: &[(&str, &str)] = &[
    ("s, start, pause", "タイマーの開始/一時停止"),
    ("r, reset", "タイマーをリセット"),
    ("mode <id>", "short-focus | long-focus | short-break | long-break"),
    ("track <id>", "rain | wave | forest | fire"),
    ("m, music", "環境音の再生/停止"),
    ("vol <0-100>", "環境音の音量"),
    ("add <text>, + <text>", "タスクを追加"),
    ("done <id>", "タスクの完了/未完了を切り替え"),
    ("del <id>", "タスクを削除"),
    ("f, full", "全画面表示の切り替え"),
    ("q, quit", "終了"),
];
