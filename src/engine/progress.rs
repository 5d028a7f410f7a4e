//! Progress ring math.
//!
//! The ring is a circle stroke drawn with a dash as long as the whole
//! circumference; shifting the dash offset hides the elapsed part.

use std::f64::consts::PI;

/// Dash pair to apply to the progress ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingDash {
    /// Dash length (the circumference)
    pub dash_array: f64,
    /// Dash offset: 0 shows the full ring, `dash_array` hides it
    pub dash_offset: f64,
}

impl RingDash {
    /// Returns the visible share of the ring, in `[0, 1]`.
    pub fn remaining_fraction(&self) -> f64 {
        if self.dash_array <= 0.0 {
            return 0.0;
        }
        (1.0 - self.dash_offset / self.dash_array).clamp(0.0, 1.0)
    }
}

/// Maps the countdown onto the ring's dash pair.
///
/// `total_seconds` is never 0 for a valid timer state; a zero total is
/// rendered as a fully receded ring.
pub fn render_fraction(time_left_seconds: u32, total_seconds: u32, ring_radius: f64) -> RingDash {
    let circumference = 2.0 * PI * ring_radius;
    let remaining = if total_seconds == 0 {
        0.0
    } else {
        f64::from(time_left_seconds) / f64::from(total_seconds)
    };

    RingDash {
        dash_array: circumference,
        dash_offset: circumference * (1.0 - remaining),
    }
}
