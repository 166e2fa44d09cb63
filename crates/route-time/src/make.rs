//! Building the origin [`TimeInfo`] of a route.

use chrono::{DateTime, Utc};

use crate::codec::{self, LocalReading};
use crate::config::TimeContext;
use crate::location::{DateTimeSpec, GraphTimezones, Location};
use crate::time_info::TimeInfo;

impl TimeInfo {
    /// Initialize time tracking for a route origin.
    ///
    /// The zone comes from the graph edges the location snapped to (falling
    /// back to the context's default zone), the moment from the location's
    /// `date_time`. A `"current"` request is replaced in place by the present
    /// minute rendered in that zone, so later stages see a concrete time.
    ///
    /// Never fails: no requested time, no resolvable zone, or an unparseable
    /// string all give [`TimeInfo::INVALID`] and leave `location` untouched.
    pub fn make<G>(location: &mut Location, graph: &G, ctx: &TimeContext<'_>) -> TimeInfo
    where
        G: GraphTimezones + ?Sized,
    {
        Self::make_at(location, graph, ctx, codec::current_instant())
    }

    /// [`TimeInfo::make`] against an explicit "now" instead of the system clock.
    pub fn make_at<G>(
        location: &mut Location,
        graph: &G,
        ctx: &TimeContext<'_>,
        now: DateTime<Utc>,
    ) -> TimeInfo
    where
        G: GraphTimezones + ?Sized,
    {
        // No time to track
        let current = match location.date_time_spec() {
            DateTimeSpec::None => return TimeInfo::INVALID,
            DateTimeSpec::Current => true,
            DateTimeSpec::Fixed(_) => false,
        };

        let Some(zone_index) = ctx.resolve_zone(location, graph) else {
            return TimeInfo::INVALID;
        };
        let Some(tz) = ctx.db.get(zone_index) else {
            log::warn!("Zone index {zone_index} is not in the timezone table");
            return TimeInfo::INVALID;
        };

        // request strings have minute resolution so compare against the same
        let now = codec::truncate_to_minute(now);
        let reading = if current {
            // read the clock directly, a repeated local hour must not be re-parsed
            location.date_time = Some(codec::format_local_datetime(now, tz));
            LocalReading::from_local(&now.with_timezone(&tz))
        } else {
            let date_time = location.date_time.as_deref().unwrap_or_default();
            match codec::parse_local_datetime(date_time, tz) {
                Ok(reading) => reading,
                Err(e) => {
                    log::error!("Could not parse provided date_time: {e}");
                    return TimeInfo::INVALID;
                }
            }
        };

        TimeInfo::new(
            zone_index,
            reading.instant,
            reading.second_of_week(ctx.week_start) as i64,
            reading.instant - now.timestamp(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;

    use super::*;
    use crate::codec::WeekStartDay;
    use crate::location::SingleZone;
    use crate::tzdb::{TimezoneDb, ZoneIndex};

    const NY: ZoneIndex = 2;

    fn db() -> TimezoneDb {
        TimezoneDb::from_names(["America/Los_Angeles", "America/New_York", "Etc/UTC"]).unwrap()
    }

    /// Wednesday 2026-02-18 10:11:42 EST.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 15, 11, 42).unwrap()
    }

    // 15:11:00 UTC, Wednesday 10:11 local
    const NOW_MINUTE: i64 = 1_771_427_460;
    const NOW_WEEK_SECOND: i64 = 2 * 86_400 + 10 * 3600 + 11 * 60;

    #[test]
    fn test_make_without_date_time_is_invalid() {
        let db = db();
        let mut location = Location::new(vec![1]);
        let ti = TimeInfo::make_at(&mut location, &SingleZone(NY), &TimeContext::with_db(&db), now());
        assert_eq!(ti, TimeInfo::default());
        assert!(!location.has_date_time());
    }

    #[test]
    fn test_make_current_writes_back_present_minute() {
        let db = db();
        let mut location = Location::new(vec![1]).with_date_time("current");
        let ti = TimeInfo::make_at(&mut location, &SingleZone(NY), &TimeContext::with_db(&db), now());
        assert_eq!(ti, TimeInfo::new(NY, NOW_MINUTE, NOW_WEEK_SECOND, 0));
        assert_eq!(location.date_time.as_deref(), Some("2026-02-18T10:11"));
    }

    #[test]
    fn test_make_explicit_present_matches_current() {
        let db = db();
        let ctx = TimeContext::with_db(&db);
        let mut location = Location::new(vec![1]).with_date_time("2026-02-18T10:11");
        let ti = TimeInfo::make_at(&mut location, &SingleZone(NY), &ctx, now());
        assert_eq!(ti, TimeInfo::new(NY, NOW_MINUTE, NOW_WEEK_SECOND, 0));
        assert_eq!(location.date_time.as_deref(), Some("2026-02-18T10:11"));
    }

    #[test]
    fn test_make_offset_from_now() {
        let db = db();
        let ctx = TimeContext::with_db(&db);
        let mut later = Location::new(vec![1]).with_date_time("2026-02-18T10:18");
        let ti = TimeInfo::make_at(&mut later, &SingleZone(NY), &ctx, now());
        assert_eq!(
            ti,
            TimeInfo::new(NY, NOW_MINUTE + 7 * 60, NOW_WEEK_SECOND + 7 * 60, 7 * 60)
        );

        let mut earlier = Location::new(vec![1]).with_date_time("2026-02-18T10:04");
        let ti = TimeInfo::make_at(&mut earlier, &SingleZone(NY), &ctx, now());
        assert_eq!(ti.now_deviation(), -7 * 60);
        assert_eq!(ti.week_second() as i64, NOW_WEEK_SECOND - 7 * 60);
    }

    #[test]
    fn test_make_current_in_repeated_fall_back_hour() {
        let db = db();
        // 06:30 UTC is the second 01:30 in New York, already on EST
        let now = Utc.with_ymd_and_hms(2026, 11, 1, 6, 30, 0).unwrap();
        let mut location = Location::new(vec![1]).with_date_time("current");
        let ti = TimeInfo::make_at(&mut location, &SingleZone(NY), &TimeContext::with_db(&db), now);
        assert_eq!(location.date_time.as_deref(), Some("2026-11-01T01:30"));
        assert_eq!(ti.now_deviation(), 0);
        assert_eq!(ti.instant(), now.timestamp());
        // Sunday 01:30
        assert_eq!(ti.week_second() as i64, 6 * 86_400 + 3600 + 30 * 60);
    }

    #[test]
    fn test_make_garbage_date_time_left_untouched() {
        let db = db();
        let mut location = Location::new(vec![1]).with_date_time("4000BC");
        let ti = TimeInfo::make_at(&mut location, &SingleZone(NY), &TimeContext::with_db(&db), now());
        assert_eq!(ti, TimeInfo::INVALID);
        assert_eq!(location.date_time.as_deref(), Some("4000BC"));
    }

    #[test]
    fn test_make_unresolved_zone_leaves_current_sentinel() {
        let db = db();
        let graph: HashMap<u64, ZoneIndex> = HashMap::new();
        let mut location = Location::new(vec![1]).with_date_time("current");
        let ti = TimeInfo::make_at(&mut location, &graph, &TimeContext::with_db(&db), now());
        assert_eq!(ti, TimeInfo::INVALID);
        assert_eq!(location.date_time.as_deref(), Some("current"));
    }

    #[test]
    fn test_make_zone_missing_from_table() {
        let db = db();
        let mut location = Location::new(vec![1]).with_date_time("current");
        let ti = TimeInfo::make_at(&mut location, &SingleZone(40), &TimeContext::with_db(&db), now());
        assert_eq!(ti, TimeInfo::INVALID);
        assert_eq!(location.date_time.as_deref(), Some("current"));
    }

    #[test]
    fn test_make_falls_back_to_default_zone() {
        let db = db();
        let mut ctx = TimeContext::with_db(&db);
        ctx.default_zone = Some(3);
        let graph: HashMap<u64, ZoneIndex> = HashMap::new();
        let mut location = Location::new(vec![1]).with_date_time("current");
        let ti = TimeInfo::make_at(&mut location, &graph, &ctx, now());
        assert_eq!(ti.zone_index(), 3);
        assert_eq!(ti.instant(), NOW_MINUTE);
        assert_eq!(location.date_time.as_deref(), Some("2026-02-18T15:11"));
    }

    #[test]
    fn test_make_historic_date_time() {
        let db = db();
        let ctx = TimeContext::with_db(&db);
        let mut location = Location::new(vec![1]).with_date_time("1982-12-08T17:17");
        let ti = TimeInfo::make_at(&mut location, &SingleZone(NY), &ctx, now());
        // 1982-12-08 17:17 EST = 22:17 UTC
        let expected = Utc.with_ymd_and_hms(1982, 12, 8, 22, 17, 0).unwrap().timestamp();
        assert!(ti.is_valid());
        assert_eq!(ti.instant(), expected);
        assert_eq!(ti.week_second() as i64, 2 * 86_400 + 17 * 3600 + 17 * 60);
        assert_eq!(ti.now_deviation(), expected - NOW_MINUTE);
        assert!(ti.now_deviation() < 0);
    }

    #[test]
    fn test_make_sunday_week_start() {
        let db = db();
        let mut ctx = TimeContext::with_db(&db);
        ctx.week_start = WeekStartDay::Sunday;
        let mut location = Location::new(vec![1]).with_date_time("current");
        let ti = TimeInfo::make_at(&mut location, &SingleZone(NY), &ctx, now());
        assert_eq!(ti.week_second() as i64, NOW_WEEK_SECOND + 86_400);
    }

    #[test]
    fn test_make_with_system_clock() {
        let db = db();
        let mut location = Location::new(vec![1]).with_date_time("current");
        let ti = TimeInfo::make(&mut location, &SingleZone(NY), &TimeContext::with_db(&db));
        assert!(ti.is_valid());
        assert_eq!(ti.now_deviation(), 0);
        let written = location.date_time.clone().unwrap();
        assert_ne!(written, "current");
        let reading = codec::parse_local_datetime(&written, chrono_tz::America::New_York).unwrap();
        assert_eq!(reading.instant, ti.instant());
    }
}
