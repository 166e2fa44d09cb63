//! The timezone table shared by every search thread.
//!
//! Zones are addressed by a small integer [`ZoneIndex`]. Index `0` is
//! reserved for "no zone" (tiles without timezone data report it) and never
//! resolves; real zones occupy `1..=len()`.
//!
//! The table is immutable once built. Callers either inject their own (a
//! small fixture in tests, a configured subset in production) or share the
//! process-wide [`TimezoneDb::global`] instance, which is built on first use
//! and only read afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::{Tz, TZ_VARIANTS};

use crate::error::{Result, RouteTimeError};

/// Index of a zone in a [`TimezoneDb`].
pub type ZoneIndex = u16;

/// The reserved index meaning "no timezone known here".
pub const NO_ZONE: ZoneIndex = 0;

#[derive(Debug, Clone)]
pub struct TimezoneDb {
    zones: Vec<Tz>,
    by_name: HashMap<&'static str, ZoneIndex>,
}

impl TimezoneDb {
    /// Build a table from IANA names; the first name gets index 1.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTimeError::InvalidTimezone`] if a name is not a known
    /// IANA zone or the list does not fit in a [`ZoneIndex`].
    ///
    /// ```
    /// use route_time::TimezoneDb;
    ///
    /// let db = TimezoneDb::from_names(["America/Los_Angeles", "America/New_York"]).unwrap();
    /// assert_eq!(db.index_of("America/New_York"), Some(2));
    /// assert!(db.get(0).is_none());
    /// ```
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let zones = names
            .into_iter()
            .map(|name| parse_timezone(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_zones(zones)
    }

    /// Every zone bundled with `chrono-tz`, in alphabetical order.
    pub fn bundled() -> Self {
        let mut zones = TZ_VARIANTS.to_vec();
        zones.sort_by_key(|tz| tz.name());
        Self::index(zones)
    }

    /// The process-wide table, built from [`TimezoneDb::bundled`] on first use.
    pub fn global() -> &'static TimezoneDb {
        static DB: OnceLock<TimezoneDb> = OnceLock::new();
        DB.get_or_init(TimezoneDb::bundled)
    }

    fn from_zones(zones: Vec<Tz>) -> Result<Self> {
        if zones.len() >= ZoneIndex::MAX as usize {
            return Err(RouteTimeError::InvalidTimezone(format!(
                "{} zones exceed the index range",
                zones.len()
            )));
        }
        Ok(Self::index(zones))
    }

    fn index(zones: Vec<Tz>) -> Self {
        let by_name = zones
            .iter()
            .enumerate()
            .map(|(i, tz)| (tz.name(), (i + 1) as ZoneIndex))
            .collect();
        Self { zones, by_name }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// The zone at `index`, or `None` for [`NO_ZONE`] and out-of-range indices.
    pub fn get(&self, index: ZoneIndex) -> Option<Tz> {
        let slot = (index as usize).checked_sub(1)?;
        self.zones.get(slot).copied()
    }

    pub fn index_of(&self, name: &str) -> Option<ZoneIndex> {
        self.by_name.get(name).copied()
    }

    /// Like [`TimezoneDb::get`] but as an error for callers that need one.
    pub fn zone(&self, index: ZoneIndex) -> Result<Tz> {
        self.get(index).ok_or(RouteTimeError::UnknownZoneIndex(index))
    }

    /// Iterate `(index, zone)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneIndex, Tz)> + '_ {
        self.zones
            .iter()
            .enumerate()
            .map(|(i, tz)| ((i + 1) as ZoneIndex, *tz))
    }

    /// UTC offset in seconds of zone `index` at the given Unix instant,
    /// including any daylight saving in effect at that instant.
    pub fn utc_offset(&self, index: ZoneIndex, instant: i64) -> Option<i32> {
        offset_at(self.get(index)?, instant)
    }

    /// How far a wall clock jumps, in seconds, when moving from zone `from`
    /// to zone `to` at `instant`: `offset(to) - offset(from)`.
    ///
    /// Zero when the indices match or either one cannot be looked up.
    pub fn timezone_diff(&self, instant: i64, from: ZoneIndex, to: ZoneIndex) -> i64 {
        if from == to {
            return 0;
        }
        match (self.utc_offset(from, instant), self.utc_offset(to, instant)) {
            (Some(a), Some(b)) => (b - a) as i64,
            _ => {
                log::debug!("no timezone diff between zone {from} and zone {to} at {instant}");
                0
            }
        }
    }
}

/// UTC offset of `tz` at a Unix instant, `None` if the instant is outside
/// the representable range.
pub fn offset_at(tz: Tz, instant: i64) -> Option<i32> {
    let utc = DateTime::<Utc>::from_timestamp(instant, 0)?;
    Some(
        tz.offset_from_utc_datetime(&utc.naive_utc())
            .fix()
            .local_minus_utc(),
    )
}

pub(crate) fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| RouteTimeError::InvalidTimezone(format!("'{}'", s)))
}
