//! Lock record timestamps.
//!
//! The stored value of a lock record is the local wall-clock time it was
//! created or last renewed, formatted as `YYYY/MM/DD HH:MM`. No seconds, no
//! timezone suffix.

use chrono::{Local, NaiveDateTime};

/// `strftime` pattern of the stored timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Source of "now" for new lock records.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The process's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp. `None` for values written by something else.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Human-readable age of a record, e.g. `45m`, `2h 5m`, `1d 3h`.
pub fn age_string(since: &NaiveDateTime, now: &NaiveDateTime) -> String {
    let age = now.signed_duration_since(*since);
    let minutes = age.num_minutes().max(0);
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}
