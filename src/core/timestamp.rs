//! Timestamp rendering
//!
//! Entry timestamps and record time attributes (`start-time`, `end-time`)
//! are written in UTC with microsecond precision so concurrent entries
//! still order correctly.

use chrono::{DateTime, Utc};

/// strftime pattern shared by every rendered time
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Render `datetime` as `2025-01-08T10:30:45.123456Z`
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rosetta_logger::core::timestamp::format_timestamp;
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(format_timestamp(&at), "2025-01-08T10:30:45.000000Z");
/// ```
#[must_use]
pub fn format_timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}
