//! # Cooldown Evaluator
//!
//! Decides whether a timed reward can be claimed again.

use chrono::{DateTime, Duration, Utc};

/// True when no claim was ever made, or strictly more than `required_hours`
/// have passed since the last one. A claim exactly on the boundary is not yet eligible.
pub fn eligible(last: Option<DateTime<Utc>>, required_hours: i64, now: DateTime<Utc>) -> bool {
    match last {
        None => true,
        Some(last) => now.signed_duration_since(last) > Duration::hours(required_hours),
    }
}

/// Time left until the window reopens, or `None` if already eligible.
pub fn remaining(
    last: Option<DateTime<Utc>>,
    required_hours: i64,
    now: DateTime<Utc>,
) -> Option<Duration> {
    let last = last?;
    if eligible(Some(last), required_hours, now) {
        return None;
    }
    Some((last + Duration::hours(required_hours)).signed_duration_since(now))
}
