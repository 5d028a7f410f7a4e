//! Countdown engine for Flow State.
//!
//! - `timer`: Timer engine with mode switching and tick handling
//! - `schedule`: The one-second countdown interval
//! - `progress`: Progress ring dash math

pub mod progress;
pub mod schedule;
pub mod timer;

pub use progress::{render_fraction, RingDash};
pub use schedule::{tick_interval, TICK_PERIOD};
pub use timer::{TimerEngine, TimerEvent};
