use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// `now + hours`, or `None` when the result is not a representable instant.
pub fn advance_by_hours(now: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    let millis = hours * MILLIS_PER_HOUR;
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis.round() as i64).and_then(|delta| now.checked_add_signed(delta))
}
