//! # Time Utilities
//!
//! Wall-clock helpers and human-readable duration formatting using chrono.

use chrono::{TimeDelta, Utc};

const MINUTES_IN_DAY: f64 = 1_440.0;
const MINUTES_IN_MONTH: f64 = 43_200.0;
const MINUTES_IN_YEAR: f64 = 525_600.0;

/// Current UTC time as unix seconds.
///
/// Clamped at zero; a clock set before 1970 yields 0.
pub fn now_unix() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Format a duration using the largest unit that keeps the value meaningful.
///
/// Picks seconds below one minute, minutes below one hour, hours below one day,
/// days below 30 days, months below a year and years otherwise. The value is
/// rounded to the nearest whole unit. Negative durations are formatted by
/// magnitude.
///
/// # Examples
///
/// ```rust
/// use chrono::TimeDelta;
/// use lib_utils::time::format_distance_strict;
///
/// assert_eq!(format_distance_strict(TimeDelta::seconds(50)), "50 seconds");
/// assert_eq!(format_distance_strict(TimeDelta::minutes(1)), "1 minute");
/// assert_eq!(format_distance_strict(TimeDelta::days(2)), "2 days");
/// ```
pub fn format_distance_strict(delta: TimeDelta) -> String {
    let millis = delta.num_milliseconds().unsigned_abs() as f64;
    let seconds = millis / 1_000.0;
    let minutes = seconds / 60.0;

    let (value, unit) = if minutes < 1.0 {
        (seconds.round(), "second")
    } else if minutes < 60.0 {
        (minutes.round(), "minute")
    } else if minutes < MINUTES_IN_DAY {
        ((minutes / 60.0).round(), "hour")
    } else if minutes < MINUTES_IN_MONTH {
        ((minutes / MINUTES_IN_DAY).round(), "day")
    } else if minutes < MINUTES_IN_YEAR {
        let months = (minutes / MINUTES_IN_MONTH).round();
        if months >= 12.0 {
            (1.0, "year")
        } else {
            (months, "month")
        }
    } else {
        ((minutes / MINUTES_IN_YEAR).round(), "year")
    };

    let value = value as u64;
    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}
