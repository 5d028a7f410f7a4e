//! CLI module for Flow State.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: The display surface trait, terminal rendering and listings

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs};
pub use display::{
    mode_infos, Display, DisplayCall, DisplaySurface, ModeInfo, RecordingDisplay, TerminalDisplay,
};
