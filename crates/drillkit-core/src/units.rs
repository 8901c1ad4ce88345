//! Unit conversion utilities
//!
//! Handles conversion from the drill file's inch-based units to the
//! millimeters used in reports and machining programs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Fixed-implicit-decimal layout of coordinates in the drill file.
///
/// The exporter writes inch values with suppressed leading zeros, so a
/// coordinate like `X12345` carries a fixed number of fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateFormat {
    /// Digits before the implicit decimal point
    pub integer_digits: u8,
    /// Digits after the implicit decimal point
    pub decimal_digits: u8,
}

impl Default for CoordinateFormat {
    fn default() -> Self {
        Self {
            integer_digits: 2,
            decimal_digits: 4,
        }
    }
}

impl CoordinateFormat {
    /// Divisor turning a native coordinate into inches (10^decimal_digits)
    pub fn divisor(&self) -> f64 {
        10f64.powi(i32::from(self.decimal_digits))
    }

    /// Convert a native signed coordinate to millimeters.
    ///
    /// Multiplies by 25.4 first, then divides, in that order.
    pub fn native_to_mm(&self, native: f64) -> f64 {
        native * MM_PER_INCH / self.divisor()
    }
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.integer_digits, self.decimal_digits)
    }
}

/// Convert inches to millimeters
pub fn inch_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Format a millimeter value with exactly three decimals.
///
/// Values that round to zero never carry a minus sign.
pub fn format_mm(value_mm: f64) -> String {
    let formatted = format!("{:.3}", value_mm);
    match formatted.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => formatted,
    }
}

/// Encode text as ISO-8859-1, silently dropping characters outside it
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}
