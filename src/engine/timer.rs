//! Timer engine for Flow State.
//!
//! This module provides the countdown:
//! - Mode switching and reset
//! - Start/pause toggling over a one-second tick interval
//! - Event firing for display updates and the completion alarm

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::types::{Mode, TimerState};

use super::schedule::{tick_interval, TICK_PERIOD};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for the display and the alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Mode changed (countdown reset to the new duration)
    ModeChanged {
        /// The new mode
        mode: Mode,
    },
    /// Countdown started or resumed
    Started,
    /// Countdown paused
    Paused,
    /// Countdown reset to the mode duration
    Reset,
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
        /// Full length of the countdown
        total_seconds: u32,
    },
    /// Countdown reached zero
    Completed {
        /// Mode that completed
        mode: Mode,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the countdown state and emits events.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a stopped engine in the given mode.
    pub fn new(mode: Mode, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            state: TimerState::new(mode),
            event_tx,
        }
    }

    /// Switches to `mode`, resetting and stopping the countdown.
    pub fn set_mode(&mut self, mode: Mode) {
        let was_running = self.state.is_running();
        self.state.switch_mode(mode);
        debug!(mode = %mode, was_running, "Mode changed");
        self.emit(TimerEvent::ModeChanged { mode });
    }

    /// Switches mode by identifier. Unrecognized identifiers are ignored.
    pub fn set_mode_by_id(&mut self, id: &str) {
        match Mode::from_id(id) {
            Some(mode) => self.set_mode(mode),
            None => debug!(id, "Ignoring unknown mode"),
        }
    }

    /// Starts the countdown if stopped, pauses it if running.
    pub fn toggle_running(&mut self) {
        if self.state.pause() {
            debug!(remaining = self.state.remaining_seconds(), "Countdown paused");
            self.emit(TimerEvent::Paused);
        } else if self.state.start(tick_interval(TICK_PERIOD)) {
            debug!(remaining = self.state.remaining_seconds(), "Countdown started");
            self.emit(TimerEvent::Started);
        }
    }

    /// Advances the countdown by one second.
    ///
    /// Emits `Tick` when time was left to decrement. Once the countdown is
    /// at zero the interval is dropped and a single `Completed` is emitted.
    /// Ignored while stopped.
    pub fn tick(&mut self) {
        if !self.state.is_running() {
            debug!("Ignoring tick while stopped");
            return;
        }

        let had_time = self.state.remaining_seconds() > 0;
        let reached_zero = self.state.tick();
        if had_time {
            self.emit(TimerEvent::Tick {
                remaining_seconds: self.state.remaining_seconds(),
                total_seconds: self.state.total_seconds(),
            });
        }

        if reached_zero {
            self.state.pause();
            let mode = self.state.mode();
            debug!(%mode, "Countdown completed");
            self.emit(TimerEvent::Completed { mode });
        }
    }

    /// Stops the countdown and restores the mode duration.
    pub fn reset(&mut self) {
        self.state.reset();
        self.emit(TimerEvent::Reset);
    }

    /// Waits until the next interval tick.
    ///
    /// Never resolves while the countdown is stopped.
    pub async fn next_tick(&mut self) {
        match self.state.interval_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Returns true while the countdown is running.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Returns a reference to the current timer state.
    pub fn get_state(&self) -> &TimerState {
        &self.state
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }

    fn emit(&self, event: TimerEvent) {
        // A closed receiver only means nobody is listening anymore.
        if self.event_tx.send(event).is_err() {
            warn!("Timer event receiver dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_engine() -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(Mode::ShortFocus, tx);
        (engine, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn completions(events: &[TimerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, TimerEvent::Completed { .. }))
            .count()
    }

    // ------------------------------------------------------------------------
    // Mode Tests
    // ------------------------------------------------------------------------

    mod mode_tests {
        use super::*;

        #[tokio::test]
        async fn test_new_engine() {
            let (engine, _rx) = create_engine();
            let state = engine.get_state();

            assert_eq!(state.mode(), Mode::ShortFocus);
            assert_eq!(state.remaining_seconds(), 1500);
            assert_eq!(state.total_seconds(), 1500);
            assert!(!engine.is_running());
        }

        #[tokio::test]
        async fn test_set_mode_resets_for_every_mode() {
            let (mut engine, mut rx) = create_engine();

            for mode in Mode::ALL {
                engine.set_mode(mode);

                let state = engine.get_state();
                assert_eq!(state.remaining_seconds(), mode.duration_seconds());
                assert_eq!(state.total_seconds(), mode.duration_seconds());
                assert_eq!(rx.try_recv().unwrap(), TimerEvent::ModeChanged { mode });
            }
        }

        #[tokio::test]
        async fn test_set_mode_stops_running_countdown() {
            let (mut engine, _rx) = create_engine();
            engine.toggle_running();
            engine.tick();

            engine.set_mode(Mode::ShortBreak);

            assert!(!engine.is_running());
            assert_eq!(engine.get_state().remaining_seconds(), 300);
        }

        #[tokio::test]
        async fn test_set_mode_by_unknown_id_is_noop() {
            let (mut engine, mut rx) = create_engine();
            engine.toggle_running();
            let _ = rx.try_recv();

            engine.set_mode_by_id("nap-time");

            assert!(engine.is_running());
            assert_eq!(engine.get_state().mode(), Mode::ShortFocus);
            assert!(rx.try_recv().is_err());
        }

        #[tokio::test]
        async fn test_set_mode_by_id() {
            let (mut engine, _rx) = create_engine();

            engine.set_mode_by_id("long-focus");

            assert_eq!(engine.get_state().mode(), Mode::LongFocus);
            assert_eq!(engine.get_state().remaining_seconds(), 3000);
        }
    }

    // ------------------------------------------------------------------------
    // Toggle Tests
    // ------------------------------------------------------------------------

    mod toggle_tests {
        use super::*;

        #[tokio::test]
        async fn test_toggle_starts() {
            let (mut engine, mut rx) = create_engine();

            engine.toggle_running();

            assert!(engine.is_running());
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::Started);
        }

        #[tokio::test]
        async fn test_toggle_twice_restores_stopped_state() {
            let (mut engine, mut rx) = create_engine();
            engine.get_state_mut().set_remaining_seconds(777);

            engine.toggle_running();
            engine.toggle_running();

            assert!(!engine.is_running());
            assert_eq!(engine.get_state().remaining_seconds(), 777);
            assert_eq!(drain(&mut rx), vec![TimerEvent::Started, TimerEvent::Paused]);
        }

        #[tokio::test]
        async fn test_pause_preserves_remaining_time() {
            let (mut engine, _rx) = create_engine();
            engine.toggle_running();
            for _ in 0..10 {
                engine.tick();
            }

            engine.toggle_running();

            assert_eq!(engine.get_state().remaining_seconds(), 1490);
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[tokio::test]
        async fn test_tick_decrements_and_notifies() {
            let (mut engine, mut rx) = create_engine();
            engine.toggle_running();
            let _ = rx.try_recv();

            engine.tick();

            assert_eq!(engine.get_state().remaining_seconds(), 1499);
            assert_eq!(
                rx.try_recv().unwrap(),
                TimerEvent::Tick {
                    remaining_seconds: 1499,
                    total_seconds: 1500
                }
            );
        }

        #[tokio::test]
        async fn test_tick_at_zero_completes_once() {
            let (mut engine, mut rx) = create_engine();
            engine.toggle_running();
            engine.get_state_mut().set_remaining_seconds(0);
            let _ = drain(&mut rx);

            engine.tick();

            assert!(!engine.is_running());
            let events = drain(&mut rx);
            assert_eq!(
                events,
                vec![TimerEvent::Completed {
                    mode: Mode::ShortFocus
                }]
            );
        }

        #[tokio::test]
        async fn test_last_tick_reports_zero_then_completes() {
            let (mut engine, mut rx) = create_engine();
            engine.toggle_running();
            engine.get_state_mut().set_remaining_seconds(1);
            let _ = drain(&mut rx);

            engine.tick();

            assert_eq!(
                drain(&mut rx),
                vec![
                    TimerEvent::Tick {
                        remaining_seconds: 0,
                        total_seconds: 1500
                    },
                    TimerEvent::Completed {
                        mode: Mode::ShortFocus
                    },
                ]
            );
            assert!(!engine.is_running());
        }

        #[tokio::test]
        async fn test_full_short_focus_countdown() {
            let (mut engine, mut rx) = create_engine();
            engine.toggle_running();
            let _ = drain(&mut rx);

            for _ in 0..1499 {
                engine.tick();
            }
            assert!(engine.is_running());
            assert_eq!(engine.get_state().remaining_seconds(), 1);
            assert_eq!(completions(&drain(&mut rx)), 0);

            engine.tick();

            assert_eq!(engine.get_state().remaining_seconds(), 0);
            assert!(!engine.is_running());
            let events = drain(&mut rx);
            assert_eq!(completions(&events), 1);
            assert_eq!(
                events.last(),
                Some(&TimerEvent::Completed {
                    mode: Mode::ShortFocus
                })
            );
        }

        #[tokio::test]
        async fn test_tick_while_stopped_is_ignored() {
            let (mut engine, mut rx) = create_engine();

            engine.tick();

            assert_eq!(engine.get_state().remaining_seconds(), 1500);
            assert!(drain(&mut rx).is_empty());
        }

        #[tokio::test]
        async fn test_no_second_completion_after_finish() {
            let (mut engine, mut rx) = create_engine();
            engine.set_mode(Mode::ShortBreak);
            engine.toggle_running();
            for _ in 0..305 {
                engine.tick();
            }

            assert_eq!(completions(&drain(&mut rx)), 1);
        }

        #[tokio::test]
        async fn test_reset_after_ticks() {
            let (mut engine, mut rx) = create_engine();
            engine.set_mode(Mode::ShortBreak);
            engine.toggle_running();
            for _ in 0..42 {
                engine.tick();
            }
            let _ = drain(&mut rx);

            engine.reset();

            let state = engine.get_state();
            assert_eq!(state.remaining_seconds(), 300);
            assert_eq!(state.total_seconds(), 300);
            assert!(!engine.is_running());
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::Reset);
        }

        #[tokio::test]
        async fn test_dropped_receiver_does_not_panic() {
            let (mut engine, rx) = create_engine();
            drop(rx);

            engine.toggle_running();
            engine.tick();
            engine.reset();
        }
    }

    // ------------------------------------------------------------------------
    // Scheduling Tests with Tokio Runtime
    // ------------------------------------------------------------------------

    mod schedule_tests {
        use super::*;
        use tokio::time::{timeout, Duration, Instant};

        #[tokio::test(start_paused = true)]
        async fn test_next_tick_follows_one_second_period() {
            let (mut engine, _rx) = create_engine();
            let start = Instant::now();
            engine.toggle_running();

            for _ in 0..3 {
                engine.next_tick().await;
                engine.tick();
            }

            assert_eq!(Instant::now() - start, Duration::from_secs(3));
            assert_eq!(engine.get_state().remaining_seconds(), 1497);
        }

        #[tokio::test(start_paused = true)]
        async fn test_next_tick_pending_when_stopped() {
            let (mut engine, _rx) = create_engine();

            let result = timeout(Duration::from_secs(10), engine.next_tick()).await;

            assert!(result.is_err(), "Stopped engine should never tick");
        }

        #[tokio::test(start_paused = true)]
        async fn test_next_tick_pending_after_pause() {
            let (mut engine, _rx) = create_engine();
            engine.toggle_running();
            engine.toggle_running();

            let result = timeout(Duration::from_secs(5), engine.next_tick()).await;

            assert!(result.is_err());
        }
    }
}
