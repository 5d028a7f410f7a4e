//! Flow State - a terminal focus timer
//!
//! Count down a focus or break period while an ambient track loops,
//! and keep a short task list for the session:
//! - 25 or 50 minutes of focus
//! - 5 or 10 minutes of break
//! - An alarm when the countdown reaches zero

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};

use flowstate::cli::{mode_infos, Cli, Commands, Display, RunArgs, TerminalDisplay};
use flowstate::session::{spawn_line_reader, FlowSession};
use flowstate::sound::{try_create_sink, AudioSink, TRACKS};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never mix with the panel on stdout.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run_session(&args).await?,
        Some(Commands::Modes { json }) => {
            if json {
                Display::show_json(&mode_infos())?;
            } else {
                Display::show_modes();
            }
        }
        Some(Commands::Tracks { json }) => {
            if json {
                Display::show_json(&TRACKS[..])?;
            } else {
                Display::show_tracks(&TRACKS);
            }
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => run_session(&RunArgs::default()).await?,
    }

    Ok(())
}

/// Runs the interactive session on stdin/stdout.
async fn run_session(args: &RunArgs) -> Result<()> {
    let config = args.to_config();
    config.validate().map_err(|e| anyhow!(e))?;
    tracing::debug!(?config, "Starting session");

    let sink = try_create_sink(config.no_sound);
    if sink.is_disabled() {
        tracing::info!("Sound output disabled");
    }
    // A blocked stdin read must not hold the runtime open after Ctrl-C
    let lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
        .context("Failed to start the input reader")?;

    let mut session = FlowSession::new(&config, sink, TerminalDisplay::new());
    session.run(lines).await?;
    session.display_mut().restore();
    println!();

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
