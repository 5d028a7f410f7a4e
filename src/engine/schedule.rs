//! Countdown tick interval.
//!
//! The countdown runs on a `tokio::time::Interval` owned by the timer
//! state. Dropping the interval stops the ticks.

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Creates the countdown interval.
///
/// The first tick fires one period from now; missed ticks are skipped
/// rather than replayed in a burst. Must be called within a tokio runtime.
pub fn tick_interval(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
