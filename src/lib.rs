//! Flow State Library
//!
//! This library provides the core functionality for the Flow State focus timer.
//! It includes:
//! - Countdown engine with the four fixed focus/break modes
//! - Progress ring math
//! - Ambient track playback and the completion alarm
//! - Session task list
//! - The interactive session loop and its input events
//! - CLI command parsing and display surfaces

pub mod cli;
pub mod engine;
pub mod session;
pub mod sound;
pub mod tasks;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{format_time, FlowConfig, Mode, TimerState};

pub use engine::{render_fraction, RingDash, TimerEngine, TimerEvent};

pub use session::{FlowSession, InputEvent};

pub use tasks::{TaskEntry, TaskId, TaskListController};

// Re-export sound types
pub use sound::{
    try_create_sink, AudioController, AudioSink, MockAudioSink, RodioAudioSink, SoundError,
    SoundSource, Track,
};
