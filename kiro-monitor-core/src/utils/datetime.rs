//! 时间格式化工具

use chrono::{DateTime, Local, TimeZone};

/// Display format of local timestamps (`2025-01-31 08:00:00`).
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts epoch milliseconds to a local timestamp.
///
/// Returns `None` for non-finite or out-of-range values.
#[allow(clippy::cast_possible_truncation)]
pub fn from_epoch_millis(millis: f64) -> Option<DateTime<Local>> {
    if !millis.is_finite() || millis.abs() >= 9.0e18 {
        return None;
    }
    Local.timestamp_millis_opt(millis.trunc() as i64).single()
}

#[must_use]
pub fn format_local(dt: &DateTime<Local>) -> String {
    dt.format(LOCAL_DATETIME_FORMAT).to_string()
}

/// Formats a duration in seconds as `1d 2h 3m`.
///
/// Zero-valued units are omitted; minutes are always shown when nothing
/// else is, so `0` gives `0m`.
#[must_use]
pub fn format_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.join(" ")
}

/// Formats a duration in seconds as `H:MM:SS` (days folded into hours).
#[must_use]
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
