//! The time-tracking value threaded through a route search.
//!
//! A [`TimeInfo`] is created once per route origin (see
//! [`TimeInfo::make`](crate::TimeInfo::make)) and then stepped edge by edge.
//! Every step returns a new value; branches of the search that share an
//! ancestor simply hold their own copies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::Direction;
use crate::tzdb::{TimezoneDb, ZoneIndex, NO_ZONE};
use crate::week::wrap_week;

/// When, and in which zone, a partial route currently is.
///
/// The invalid value is all zeroes: every way of ending up without a usable
/// time (no date-time requested, no zone, unparseable string, stepping an
/// invalid value) yields the same [`TimeInfo::INVALID`], so invalid values
/// always compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TimeInfo {
    // whether the origin had usable time information at all
    valid: bool,
    // zone at the current point of the route, drives offset changes
    zone_index: ZoneIndex,
    // seconds from epoch, shifted by every zone change along the route
    instant: i64,
    // local seconds since the start of the week, for historical speed lookup
    week_second: u32,
    // signed distance from the present, for live traffic lookup
    now_deviation: i64,
}

/// One edge's worth of progress: how long it takes and the zone at its far end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub seconds: u32,
    pub zone_index: ZoneIndex,
}

impl Step {
    pub fn new(seconds: u32, zone_index: ZoneIndex) -> Self {
        Self {
            seconds,
            zone_index,
        }
    }

    /// A step from a fractional edge cost, rounded to whole seconds.
    /// Negative and non-finite costs count as zero.
    pub fn from_secs_f32(seconds: f32, zone_index: ZoneIndex) -> Self {
        let seconds = if seconds.is_finite() && seconds > 0.0 {
            seconds.round() as u32
        } else {
            0
        };
        Self::new(seconds, zone_index)
    }
}

impl TimeInfo {
    pub const INVALID: TimeInfo = TimeInfo {
        valid: false,
        zone_index: NO_ZONE,
        instant: 0,
        week_second: 0,
        now_deviation: 0,
    };

    /// A valid value; `week_second` is folded onto the week.
    pub fn new(zone_index: ZoneIndex, instant: i64, week_second: i64, now_deviation: i64) -> Self {
        Self {
            valid: true,
            zone_index,
            instant,
            week_second: wrap_week(week_second),
            now_deviation,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn zone_index(&self) -> ZoneIndex {
        self.zone_index
    }

    pub fn instant(&self) -> i64 {
        self.instant
    }

    pub fn week_second(&self) -> u32 {
        self.week_second
    }

    pub fn now_deviation(&self) -> i64 {
        self.now_deviation
    }

    /// The value after traversing an edge forwards.
    ///
    /// If the zone changes, the local clock jumps by the difference of the
    /// two zones' UTC offsets, sampled on arrival. `now_deviation` only ever
    /// moves by the traversal time.
    ///
    /// ```
    /// use route_time::{Step, TimeInfo, TimezoneDb};
    ///
    /// let db = TimezoneDb::from_names(["America/Los_Angeles", "America/New_York"]).unwrap();
    /// let la = TimeInfo::new(1, 123_456_789, 0, 0);
    /// let ny = la.advance(Step::new(10, 2), &db);
    /// assert_eq!(ny.instant(), 123_456_789 + 10 + 3 * 3600);
    /// assert_eq!(ny.now_deviation(), 10);
    /// ```
    pub fn advance(&self, step: Step, db: &TimezoneDb) -> TimeInfo {
        if !self.valid {
            return TimeInfo::INVALID;
        }

        let seconds = step.seconds as i64;
        let zone_delta = db.timezone_diff(self.instant + seconds, self.zone_index, step.zone_index);

        TimeInfo::new(
            step.zone_index,
            self.instant + seconds + zone_delta,
            self.week_second as i64 + seconds + zone_delta,
            self.now_deviation + seconds,
        )
    }

    /// The value before traversing an edge, walking backwards in time.
    ///
    /// Inverse of [`TimeInfo::advance`]: retreating by the same duration into
    /// the zone the advance started from restores the original value.
    /// Offsets are sampled at the current (later) end of the edge.
    pub fn retreat(&self, step: Step, db: &TimezoneDb) -> TimeInfo {
        if !self.valid {
            return TimeInfo::INVALID;
        }

        let seconds = step.seconds as i64;
        let zone_delta = db.timezone_diff(self.instant, self.zone_index, step.zone_index);

        TimeInfo::new(
            step.zone_index,
            self.instant - seconds + zone_delta,
            self.week_second as i64 - seconds + zone_delta,
            self.now_deviation - seconds,
        )
    }

    pub fn step(&self, step: Step, direction: Direction, db: &TimezoneDb) -> TimeInfo {
        match direction {
            Direction::Forward => self.advance(step, db),
            Direction::Reverse => self.retreat(step, db),
        }
    }

    /// Apply `steps` in order, returning the origin followed by the value
    /// after each step.
    pub fn walk<I>(&self, steps: I, direction: Direction, db: &TimezoneDb) -> Vec<TimeInfo>
    where
        I: IntoIterator<Item = Step>,
    {
        let origin = *self;
        std::iter::once(origin)
            .chain(steps.into_iter().scan(origin, |current, step| {
                *current = current.step(step, direction, db);
                Some(*current)
            }))
            .collect()
    }

    /// Whether this moment is within `horizon` seconds of the present, so
    /// live traffic is still a better guess than historical speeds.
    pub fn near_present(&self, horizon: u32) -> bool {
        self.valid && self.now_deviation.unsigned_abs() <= horizon as u64
    }
}

impl fmt::Display for TimeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{valid: {}, timezone_index: {}, instant: {}, week_second: {}, now_deviation: {}}}",
            self.valid, self.zone_index, self.instant, self.week_second, self.now_deviation
        )
    }
}
