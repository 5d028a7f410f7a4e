//! Command definitions for the Flow State CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{default_sound_dir, FlowConfig, Mode, DEFAULT_RING_RADIUS, DEFAULT_VOLUME_PERCENT};

// ============================================================================
// CLI Structure
// ============================================================================

/// Flow State - focus timer with ambient sounds
#[derive(Parser, Debug)]
#[command(
    name = "flowstate",
    version,
    about = "環境音とタスクリスト付きのフォーカスタイマー",
    long_about = "ターミナル上で動作するフォーカスタイマー。\n\
                  集中/休憩のカウントダウン、ループ再生の環境音、セッション中のタスクリストを備えています。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive session
    Run(RunArgs),

    /// List the timer modes
    Modes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the ambient tracks
    Tracks {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Mode selected at startup
    #[arg(short, long, default_value = "short-focus", value_parser = parse_mode)]
    pub mode: Mode,

    /// Initial ambient volume (0-100)
    #[arg(
        long,
        default_value_t = DEFAULT_VOLUME_PERCENT,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub volume: u8,

    /// Directory holding the track and alarm files
    #[arg(short, long)]
    pub sound_dir: Option<PathBuf>,

    /// Disable all audio output
    #[arg(long)]
    pub no_sound: bool,

    /// Radius of the progress ring
    #[arg(long, default_value_t = DEFAULT_RING_RADIUS, value_parser = validate_radius)]
    pub radius: f64,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            volume: DEFAULT_VOLUME_PERCENT,
            sound_dir: None,
            no_sound: false,
            radius: DEFAULT_RING_RADIUS,
        }
    }
}

impl RunArgs {
    /// Builds the session configuration from the arguments.
    pub fn to_config(&self) -> FlowConfig {
        FlowConfig {
            initial_mode: self.mode,
            volume_percent: self.volume,
            ring_radius: self.radius,
            sound_dir: self.sound_dir.clone().unwrap_or_else(default_sound_dir),
            no_sound: self.no_sound,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse()
}

/// Validates the ring radius.
///
/// - Must be a number
/// - Must be positive and finite
fn validate_radius(s: &str) -> Result<f64, String> {
    let radius: f64 = s
        .parse()
        .map_err(|_| format!("数値を指定してください: {}", s))?;
    if !radius.is_finite() || radius <= 0.0 {
        return Err("リングの半径は正の数で指定してください".to_string());
    }
    Ok(radius)
}

// ============================================================================
// Tests
// ============================================================================
