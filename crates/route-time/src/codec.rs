//! Wall-clock codec: local date-time strings to instants and back.
//!
//! Requests carry minute-resolution local readings such as
//! `"2026-03-15T08:30"` (seconds are accepted but optional). The zone they
//! are local to comes from the route origin, never from the string itself.
//!
//! Nothing here reads the system clock except [`current_instant`]; every
//! other function takes the instant or string it works on explicitly.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteTimeError};
use crate::week;

/// The form written back into a request for "current" departures.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

const ACCEPTED_FORMATS: [&str; 2] = [CANONICAL_FORMAT, "%Y-%m-%dT%H:%M:%S"];

// ── Configurable week start ─────────────────────────────────────────────────

/// Which day begins the week that week-seconds are counted from.
///
/// Speed and restriction tables are keyed Monday-first, so anything other
/// than the default only makes sense with tables built the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// ISO 8601 standard (Monday = day 0 of the week).
    #[default]
    Monday,
    /// US/Canada convention (Sunday = day 0 of the week).
    Sunday,
}

/// How many days `weekday` is from the week-start day.
fn days_from_week_start(weekday: Weekday, week_start: WeekStartDay) -> i64 {
    match week_start {
        WeekStartDay::Monday => weekday.num_days_from_monday() as i64,
        WeekStartDay::Sunday => weekday.num_days_from_sunday() as i64,
    }
}

// ── LocalReading ────────────────────────────────────────────────────────────

/// A parsed local date-time: the instant it names plus its clock fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalReading {
    /// Unix seconds of the reading.
    pub instant: i64,
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl LocalReading {
    pub(crate) fn from_local<T: TimeZone>(local: &DateTime<T>) -> Self {
        Self {
            instant: local.timestamp(),
            weekday: local.weekday(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
        }
    }

    /// Seconds since local midnight at the start of the week.
    pub fn second_of_week(&self, week_start: WeekStartDay) -> u32 {
        week::second_of_week(
            days_from_week_start(self.weekday, week_start),
            self.hour,
            self.minute,
            self.second,
        )
    }
}

// ── parse / format ──────────────────────────────────────────────────────────

/// Parse a local date-time string in `tz`.
///
/// A reading that occurs twice (clocks falling back) resolves to the
/// earlier instant.
///
/// # Errors
///
/// Returns [`RouteTimeError::InvalidDatetime`] if the string is not
/// `YYYY-MM-DDTHH:MM[:SS]`, or if the reading falls in a gap skipped by a
/// daylight-saving transition.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use route_time::codec::parse_local_datetime;
///
/// let reading = parse_local_datetime("1982-12-08T17:17", chrono_tz::America::New_York).unwrap();
/// assert_eq!(reading.weekday, Weekday::Wed);
/// assert_eq!((reading.hour, reading.minute), (17, 17));
/// ```
pub fn parse_local_datetime(s: &str, tz: Tz) -> Result<LocalReading> {
    let naive = ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .ok_or_else(|| {
            RouteTimeError::InvalidDatetime(format!("'{}': expected YYYY-MM-DDTHH:MM", s))
        })?;

    let local = tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        RouteTimeError::InvalidDatetime(format!("'{}' does not exist in {}", s, tz.name()))
    })?;

    Ok(LocalReading::from_local(&local))
}

/// Render `instant` as a local reading in `tz`, in [`CANONICAL_FORMAT`].
pub fn format_local_datetime(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(CANONICAL_FORMAT).to_string()
}

/// The present moment, truncated to the minute.
///
/// Request strings have minute resolution, so "now" is compared at the same
/// resolution: a departure of `"current"` and one spelled out as the current
/// minute are the same request.
pub fn current_instant() -> DateTime<Utc> {
    truncate_to_minute(Utc::now())
}

pub fn truncate_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::{Los_Angeles, New_York};

    #[test]
    fn test_parse_minute_resolution() {
        let reading = parse_local_datetime("2026-03-16T09:05", New_York).unwrap();
        // 2026-03-16 09:05 EDT = 13:05 UTC
        let expected = Utc.with_ymd_and_hms(2026, 3, 16, 13, 5, 0).unwrap();
        assert_eq!(reading.instant, expected.timestamp());
        assert_eq!(reading.weekday, Weekday::Mon);
        assert_eq!((reading.hour, reading.minute, reading.second), (9, 5, 0));
    }

    #[test]
    fn test_parse_with_seconds() {
        let reading = parse_local_datetime("2026-01-15T14:00:30", Los_Angeles).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 1, 15, 22, 0, 30).unwrap();
        assert_eq!(reading.instant, expected.timestamp());
        assert_eq!(reading.second, 30);
    }

    #[test]
    fn test_parse_garbage_returns_error() {
        for bad in ["4000BC", "", "2026-13-01T00:00", "2026-01-01", "2026-01-01T25:00"] {
            let err = parse_local_datetime(bad, New_York).unwrap_err().to_string();
            assert!(err.contains("Invalid datetime"), "{bad}: got {err}");
        }
    }

    #[test]
    fn test_parse_spring_forward_gap_returns_error() {
        // March 8, 2026: New York skips 02:00-03:00
        let err = parse_local_datetime("2026-03-08T02:30", New_York)
            .unwrap_err()
            .to_string();
        assert!(err.contains("does not exist"), "got: {err}");
    }

    #[test]
    fn test_parse_fall_back_takes_earlier_instant() {
        // November 1, 2026: 01:30 happens in EDT and again in EST
        let reading = parse_local_datetime("2026-11-01T01:30", New_York).unwrap();
        let edt = Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap();
        assert_eq!(reading.instant, edt.timestamp());
    }

    #[test]
    fn test_second_of_week_includes_minutes() {
        let reading = parse_local_datetime("2026-03-17T08:30:15", New_York).unwrap();
        // Tuesday
        let expected = 86_400 + 8 * 3600 + 30 * 60 + 15;
        assert_eq!(reading.second_of_week(WeekStartDay::Monday), expected);
        assert_eq!(reading.second_of_week(WeekStartDay::Sunday), expected + 86_400);
    }

    #[test]
    fn test_second_of_week_sunday_night() {
        let reading = parse_local_datetime("2026-03-15T23:59:59", New_York).unwrap();
        assert_eq!(reading.second_of_week(WeekStartDay::Monday), 7 * 86_400 - 1);
        assert_eq!(reading.second_of_week(WeekStartDay::Sunday), 86_400 - 1);
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        let instant = Utc.with_ymd_and_hms(2026, 7, 4, 16, 45, 0).unwrap();
        let text = format_local_datetime(instant, Los_Angeles);
        assert_eq!(text, "2026-07-04T09:45");
        let reading = parse_local_datetime(&text, Los_Angeles).unwrap();
        assert_eq!(reading.instant, instant.timestamp());
    }

    #[test]
    fn test_truncate_to_minute() {
        let instant = Utc.with_ymd_and_hms(2026, 2, 18, 10, 11, 59).unwrap()
            + chrono::Duration::milliseconds(250);
        let truncated = truncate_to_minute(instant);
        assert_eq!(truncated, Utc.with_ymd_and_hms(2026, 2, 18, 10, 11, 0).unwrap());
        assert_eq!(truncate_to_minute(truncated), truncated);
    }

    #[test]
    fn test_week_start_deserializes_lowercase() {
        let ws: WeekStartDay = serde_json::from_str("\"sunday\"").unwrap();
        assert_eq!(ws, WeekStartDay::Sunday);
        assert_eq!(WeekStartDay::default(), WeekStartDay::Monday);
    }
}
