//! Conversions between millisecond durations, `h:m:s` triples and display text

use serde::{Deserialize, Serialize};

const MS_PER_SECOND: i64 = 1000;

/// Hours, minutes and seconds of a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hms {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Convert an `h:m:s` triple to milliseconds.
///
/// Components are not range-checked; `to_ms(0, 90, 0)` is ninety minutes.
/// A negative total clamps to zero and overflow saturates.
pub fn to_ms(hours: i64, minutes: i64, seconds: i64) -> u64 {
    let total_seconds = hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds);
    let ms = total_seconds.saturating_mul(MS_PER_SECOND);
    u64::try_from(ms).unwrap_or(0)
}

/// Split milliseconds into an `h:m:s` triple, dropping sub-second precision
pub fn from_ms(ms: i64) -> Hms {
    let total_seconds = ms.max(0) / MS_PER_SECOND;
    Hms {
        hours: total_seconds / 3600,
        minutes: (total_seconds % 3600) / 60,
        seconds: total_seconds % 60,
    }
}

/// Format milliseconds as zero-padded `HH:MM:SS`
pub fn format_ms(ms: i64) -> String {
    let Hms { hours, minutes, seconds } = from_ms(ms);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Coerce a raw input field to a number, falling back to 0.
///
/// Fractional values are truncated toward zero.
pub fn parse_field(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return value;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => 0,
    }
}

/// Millisecond counters are stored unsigned; display math works on `i64`
pub(crate) fn signed(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}
