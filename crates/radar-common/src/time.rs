//! Time handling utilities for radar frame sequences.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

/// Parse an ISO 8601 instant string into a UTC datetime.
///
/// Accepts full RFC 3339 timestamps, timestamps without a timezone
/// (interpreted as UTC), and bare dates (midnight UTC).
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try without timezone (assume UTC)
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    // Try date only
    if let Ok(ndt) = NaiveDateTime::parse_from_str(&format!("{}T00:00:00", s), "%Y-%m-%dT%H:%M:%S")
    {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidInstant(s.to_string()))
}

/// Format a UTC datetime as the ISO 8601 instant form used in frame
/// sequences (`2024-01-15T12:00:00Z`).
pub fn format_instant(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// A fixed lookback window ending at a reference instant.
///
/// Used to restrict frame sequences to the recent past, e.g. the last
/// two hours of radar imagery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TrailingWindow {
    /// Create a window covering `length` before `end`, inclusive on both ends.
    pub fn ending_at(end: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start: end - length,
            end,
        }
    }

    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        dt >= self.start && dt <= self.end
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_instant("2024-01-15T12:05:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 5);
    }

    #[test]
    fn test_parse_naive_assumes_utc() {
        let dt = parse_instant("2024-01-15T12:00:00").unwrap();
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_instant("2024-01-15").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_instant("not-a-time").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let dt = parse_instant("2024-01-15T12:00:00Z").unwrap();
        assert_eq!(format_instant(dt), "2024-01-15T12:00:00Z");
    }

    #[test]
    fn test_window_inclusive_bounds() {
        let end = parse_instant("2024-01-01T12:00:00Z").unwrap();
        let window = TrailingWindow::ending_at(end, Duration::hours(2));

        assert!(window.contains(end));
        assert!(window.contains(window.start));
        assert!(window.contains(parse_instant("2024-01-01T11:00:00Z").unwrap()));
        assert!(!window.contains(parse_instant("2024-01-01T09:59:59Z").unwrap()));
        assert!(!window.contains(parse_instant("2024-01-01T12:00:01Z").unwrap()));
    }
}
