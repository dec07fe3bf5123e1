//! Timestamp helpers

use chrono::{DateTime, Utc};

/// Current time truncated to millisecond precision.
///
/// Flag and audit timestamps are stored as epoch milliseconds, so values
/// built from this compare equal to what a later read returns.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
