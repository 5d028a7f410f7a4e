//! Interactive Flow State session.
//!
//! `FlowSession` wires the timer engine, the audio controller and the task
//! list to a display surface, and feeds them discrete input events. All
//! state lives on one task; ticks and input lines are handled in order.
//!
//! ```text
//! reader thread ──▶ lines ──▶ InputEvent ──┐
//!                                          ├──▶ FlowSession ──▶ DisplaySurface
//! tick interval ──▶ on_tick ───────────────┘        │
//!                                                   └──▶ AudioController (alarm)
//! ```

pub mod input;

use std::future::Future;
use std::ops::ControlFlow;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::display::DisplaySurface;
use crate::engine::{render_fraction, TimerEngine, TimerEvent};
use crate::sound::{AudioController, AudioSink};
use crate::tasks::TaskListController;
use crate::types::{format_time, FlowConfig};

pub use input::{spawn_line_reader, InputEvent, HELP_LINES};

// ============================================================================
// FlowSession
// ============================================================================

/// One running widget: timer, ambient audio and task list.
pub struct FlowSession<S: AudioSink, D: DisplaySurface> {
    engine: TimerEngine,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    audio: AudioController<S>,
    tasks: TaskListController,
    display: D,
    ring_radius: f64,
}

impl<S: AudioSink, D: DisplaySurface> FlowSession<S, D> {
    /// Creates a session in the configured initial mode.
    pub fn new(config: &FlowConfig, sink: S, display: D) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        Self {
            engine: TimerEngine::new(config.initial_mode, event_tx),
            events,
            audio: AudioController::new(sink, config.sound_dir.clone(), config.volume_percent),
            tasks: TaskListController::new(),
            display,
            ring_radius: config.ring_radius,
        }
    }

    /// Pushes the complete current state to the display.
    pub fn render_all(&mut self) {
        self.show_time();
        self.display.show_timer_control(self.engine.is_running());
        self.show_track();
        self.display.show_volume(self.audio.volume_percent());
        self.display.show_tasks(self.tasks.entries());
    }

    /// Applies one input event.
    ///
    /// Returns `Break` when the session should end.
    pub fn handle(&mut self, event: InputEvent) -> ControlFlow<()> {
        debug!(%event, "Input");
        if !matches!(event, InputEvent::Unknown(_)) {
            self.display.clear_notice();
        }
        match event {
            InputEvent::ToggleTimer => self.engine.toggle_running(),
            InputEvent::Reset => self.engine.reset(),
            InputEvent::SelectMode(id) => self.engine.set_mode_by_id(&id),
            InputEvent::SelectTrack(id) => {
                self.audio.select_track(&id);
                self.show_track();
            }
            InputEvent::ToggleMusic => {
                if self.audio.can_play() {
                    self.audio.toggle_playback();
                    self.show_track();
                } else {
                    self.display.show_notice("先に track <id> でトラックを選択してください");
                }
            }
            InputEvent::SetVolume(percent) => {
                self.audio.set_volume(percent);
                self.display.show_volume(self.audio.volume_percent());
            }
            InputEvent::AddTask(text) => {
                if self.tasks.add_task(&text).is_some() {
                    self.display.show_tasks(self.tasks.entries());
                }
            }
            InputEvent::DeleteTask(id) => {
                if self.tasks.delete_task(id) {
                    self.display.show_tasks(self.tasks.entries());
                }
            }
            InputEvent::ToggleTask(id) => {
                if self.tasks.toggle_completed(id).is_some() {
                    self.display.show_tasks(self.tasks.entries());
                }
            }
            InputEvent::FullWindow => self.display.toggle_full_window(),
            InputEvent::Help => self.display.show_help(),
            InputEvent::Quit => return ControlFlow::Break(()),
            InputEvent::Unknown(line) => {
                self.display
                    .show_notice(&format!("不明なコマンド: {} (help で一覧)", line));
            }
        }
        self.drain_timer_events();
        ControlFlow::Continue(())
    }

    /// Handles one elapsed tick of the countdown interval.
    pub fn on_tick(&mut self) {
        self.engine.tick();
        self.drain_timer_events();
    }

    /// Runs the session until quit, end of input or Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if listening for Ctrl-C fails.
    pub async fn run(&mut self, lines: mpsc::UnboundedReceiver<String>) -> Result<()> {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")
        };
        self.run_until(lines, ctrl_c).await
    }

    /// Runs the session until quit, end of input or `shutdown` resolves.
    ///
    /// Input lines arrive over a channel, so ending the session never waits
    /// on a pending read.
    ///
    /// # Errors
    ///
    /// Returns the error `shutdown` resolves with, after stopping audio.
    pub async fn run_until<F>(
        &mut self,
        mut lines: mpsc::UnboundedReceiver<String>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        tokio::pin!(shutdown);

        self.render_all();
        info!(mode = %self.engine.get_state().mode(), "Session started");

        let outcome = loop {
            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else {
                        debug!("Input closed");
                        break Ok(());
                    };
                    if let Some(event) = InputEvent::parse(&line) {
                        if self.handle(event).is_break() {
                            break Ok(());
                        }
                    }
                }
                _ = self.engine.next_tick() => {
                    self.on_tick();
                }
                result = &mut shutdown => {
                    debug!("Shutdown requested");
                    break result;
                }
            }
        };

        self.shutdown();
        outcome
    }

    /// Stops ambient playback.
    pub fn shutdown(&mut self) {
        self.audio.stop();
        info!("Session ended");
    }

    /// Returns the timer engine.
    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Returns the audio controller.
    pub fn audio(&self) -> &AudioController<S> {
        &self.audio
    }

    /// Returns the task list.
    pub fn tasks(&self) -> &TaskListController {
        &self.tasks
    }

    /// Returns the display surface.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Returns the display surface mutably.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn drain_timer_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                TimerEvent::Tick { .. } => self.show_time(),
                TimerEvent::ModeChanged { .. } | TimerEvent::Reset => {
                    self.show_time();
                    self.display.show_timer_control(false);
                }
                TimerEvent::Started => self.display.show_timer_control(true),
                TimerEvent::Paused => self.display.show_timer_control(false),
                TimerEvent::Completed { mode } => {
                    info!(mode = %mode, "Countdown completed");
                    self.display.show_timer_control(false);
                    self.audio.play_alarm_once();
                }
            }
        }
    }

    fn show_time(&mut self) {
        let state = self.engine.get_state();
        let remaining = state.remaining_seconds();
        let ring = render_fraction(remaining, state.total_seconds(), self.ring_radius);
        self.display
            .show_time(&format_time(remaining), ring, state.mode());
    }

    fn show_track(&mut self) {
        self.display
            .show_track(self.audio.selected_track(), self.audio.is_playing());
    }
}

// ============================================================================
// Tests
// ============================================================================
