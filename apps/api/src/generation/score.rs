//! Score deserializers that pin model-reported numbers into their documented ranges.
//!
//! Models occasionally return `87.5`, `-3` or `140`. Any JSON number is accepted,
//! rounded, and clamped; non-numbers are still a decode error.

use serde::{Deserialize, Deserializer};

pub const PERCENT_MIN: u8 = 0;
pub const PERCENT_MAX: u8 = 100;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 10;

/// `0..=100`: ATS score and its breakdown.
pub fn percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_score(raw, PERCENT_MIN, PERCENT_MAX))
}

/// `1..=10`: interview answer rating.
pub fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_score(raw, RATING_MIN, RATING_MAX))
}

pub fn clamp_score(raw: f64, min: u8, max: u8) -> u8 {
    if raw.is_nan() {
        return min;
    }
    raw.round().clamp(f64::from(min), f64::from(max)) as u8
}
