use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Timestamps are rendered as RFC 3339 in UTC, e.g. `2025-03-01T10:00:00Z`.
pub fn datetime_to_string(datetime: DateTime<FixedOffset>) -> String {
    datetime
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
