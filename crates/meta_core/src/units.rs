//! Unit conversions applied to simulation quantities.

use crate::TimeValue;

pub const SECONDS_PER_YEAR: f64 = 60.0 * 60.0 * 24.0 * 365.25;

/// kg/s → t/day.
pub const KGS_TO_TDAY: f64 = 86.4;

/// Seconds since simulation start → calendar year.
pub fn to_year(seconds: f64, offset_years: f64) -> f64 {
    seconds / SECONDS_PER_YEAR + offset_years
}

pub fn to_years(seconds: &TimeValue, offset_years: f64) -> TimeValue {
    seconds.map(|s| to_year(s, offset_years))
}

pub fn to_tday(kgs: f64) -> f64 {
    kgs * KGS_TO_TDAY
}

/// Sign-flipped t/day, for quantities stored as negative production.
pub fn to_tday_rev(kgs: f64) -> f64 {
    -kgs * KGS_TO_TDAY
}
