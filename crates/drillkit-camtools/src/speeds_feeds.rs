//! Speeds and Feeds Calculator
//!
//! Spindle speed and feed rate for a drill of a given diameter, from an
//! empirically fitted curve:
//!
//! ```text
//! speed = round100(12609.69 / d^1.0236)
//! feed  = round100(speed / 20)
//! ```
//!
//! Both roundings go to the nearest hundred with ties to even. The feed is
//! derived from the already rounded speed.

use serde::{Deserialize, Serialize};

/// Curve coefficient (RPM at 1 mm)
pub const SPEED_COEFFICIENT: f64 = 12609.69;

/// Curve exponent
pub const SPEED_EXPONENT: f64 = 1.0236;

/// Spindle speed divided by this gives the feed rate
pub const FEED_DIVISOR: f64 = 20.0;

/// Spindle speed and feed rate for one tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Spindle speed (RPM)
    pub spindle_speed: u32,
    /// Feed rate (mm/min)
    pub feed_rate: u32,
}

/// Diameter based speeds and feeds
#[derive(Debug, Default)]
pub struct SpeedsFeedsCalculator;

impl SpeedsFeedsCalculator {
    /// Calculate speed and feed for a drill diameter in millimeters.
    ///
    /// A zero diameter yields zero speed and zero feed.
    pub fn calculate(diameter_mm: f64) -> CalculationResult {
        if diameter_mm <= 0.0 || !diameter_mm.is_finite() {
            return CalculationResult::default();
        }

        let speed = round_to_hundred(SPEED_COEFFICIENT / diameter_mm.powf(SPEED_EXPONENT));
        let feed = round_to_hundred(speed / FEED_DIVISOR);

        CalculationResult {
            spindle_speed: speed as u32,
            feed_rate: feed as u32,
        }
    }
}

fn round_to_hundred(value: f64) -> f64 {
    (value / 100.0).round_ties_even() * 100.0
}
