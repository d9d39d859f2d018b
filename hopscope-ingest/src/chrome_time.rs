// Chrome stores times as microseconds since 1601-01-01 UTC.

use chrono::{DateTime, Utc};

pub const EPOCH_DIFF_SECS: i64 = 11_644_473_600;
pub const EPOCH_DIFF_MICROS: i64 = EPOCH_DIFF_SECS * 1_000_000;

/// `None` when the shifted value does not fit in an `i64`.
pub fn chrome_to_unix_micros(chrome_time: i64) -> Option<i64> {
    chrome_time.checked_sub(EPOCH_DIFF_MICROS)
}

/// Renders Unix microseconds as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(unix_micros: i64) -> String {
    DateTime::<Utc>::from_timestamp_micros(unix_micros)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "invalid".to_string())
}
