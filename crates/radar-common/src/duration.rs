//! ISO 8601 duration parsing with calendar-naive millisecond conversion.

use crate::time::TimeParseError;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// An ISO 8601 duration, e.g. `PT5M` or `P1DT12H`.
///
/// Only the integer component form `P[nY][nM][nD]T[nH][nM][nS]` is
/// supported; all components are optional, and the `T` separator may be
/// omitted when no time components are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsoDuration {
    pub years: u64,
    pub months: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl IsoDuration {
    /// Parse a duration string.
    ///
    /// An unrecognized designator or a trailing number without one is a
    /// parse error. A bare `P` (or `PT`) parses to a zero duration,
    /// which callers expanding a time interval must reject.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let body = s
            .strip_prefix('P')
            .ok_or_else(|| TimeParseError::InvalidDuration(s.to_string()))?;

        let mut duration = IsoDuration::default();
        let mut in_time_part = false;
        let mut chars = body.chars().peekable();

        while let Some(&c) = chars.peek() {
            if c == 'T' {
                if in_time_part {
                    return Err(TimeParseError::InvalidDuration(s.to_string()));
                }
                in_time_part = true;
                chars.next();
                continue;
            }

            let mut value: u64 = 0;
            let mut saw_digit = false;
            while let Some(&d) = chars.peek() {
                if let Some(digit) = d.to_digit(10) {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(digit as u64))
                        .ok_or_else(|| TimeParseError::InvalidDuration(s.to_string()))?;
                    saw_digit = true;
                    chars.next();
                } else {
                    break;
                }
            }

            let designator = chars
                .next()
                .filter(|_| saw_digit)
                .ok_or_else(|| TimeParseError::InvalidDuration(s.to_string()))?;

            // 'M' means months before the T separator, minutes after
            match (designator, in_time_part) {
                ('Y', false) => duration.years = value,
                ('M', false) => duration.months = value,
                ('D', false) => duration.days = value,
                ('H', true) => duration.hours = value,
                ('M', true) => duration.minutes = value,
                ('S', true) => duration.seconds = value,
                _ => return Err(TimeParseError::InvalidDuration(s.to_string())),
            }
        }

        Ok(duration)
    }

    /// Convert to milliseconds using fixed calendar-naive approximations:
    /// 1 year = 365 days, 1 month = 30 days, 1 day = 24 hours.
    ///
    /// Frame spacing downstream depends on these exact multiples, so no
    /// leap-year or variable-month correction is applied. Durations too
    /// large to represent saturate at `i64::MAX`.
    pub fn as_millis(&self) -> i64 {
        fn component(value: u64, ms_per_unit: i64) -> i64 {
            i64::try_from(value)
                .unwrap_or(i64::MAX)
                .saturating_mul(ms_per_unit)
        }

        component(self.years, 365 * MS_PER_DAY)
            .saturating_add(component(self.months, 30 * MS_PER_DAY))
            .saturating_add(component(self.days, MS_PER_DAY))
            .saturating_add(component(self.hours, MS_PER_HOUR))
            .saturating_add(component(self.minutes, MS_PER_MINUTE))
            .saturating_add(component(self.seconds, MS_PER_SECOND))
    }

    pub fn is_zero(&self) -> bool {
        self.as_millis() == 0
    }
}
