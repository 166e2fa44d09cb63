//! Time-tracking configuration and the resolved context built from it.

use serde::{Deserialize, Serialize};

use crate::codec::WeekStartDay;
use crate::error::{Result, RouteTimeError};
use crate::location::{GraphTimezones, Location};
use crate::tzdb::{TimezoneDb, ZoneIndex};

/// Options for constructing [`TimeInfo`](crate::TimeInfo) values.
///
/// ```
/// use route_time::{TimeTrackingConfig, WeekStartDay};
///
/// let config = TimeTrackingConfig::from_json(r#"{"default_timezone":"Etc/UTC"}"#).unwrap();
/// assert_eq!(config.default_timezone.as_deref(), Some("Etc/UTC"));
/// assert_eq!(config.week_start, WeekStartDay::Monday);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeTrackingConfig {
    /// IANA zone for locations whose graph edges carry no timezone. When
    /// unset such locations get no time tracking at all.
    pub default_timezone: Option<String>,
    /// Day the week-second counter restarts on.
    pub week_start: WeekStartDay,
}

impl TimeTrackingConfig {
    /// # Errors
    ///
    /// Returns [`RouteTimeError::InvalidConfig`] for malformed JSON or
    /// unknown fields.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| RouteTimeError::InvalidConfig(e.to_string()))
    }
}

/// Everything construction needs besides the location: the zone table and
/// the configuration resolved against it.
#[derive(Debug, Clone, Copy)]
pub struct TimeContext<'a> {
    pub db: &'a TimezoneDb,
    pub default_zone: Option<ZoneIndex>,
    pub week_start: WeekStartDay,
}

impl<'a> TimeContext<'a> {
    /// # Errors
    ///
    /// Returns [`RouteTimeError::InvalidConfig`] if the configured default
    /// zone is not in `db`.
    pub fn new(db: &'a TimezoneDb, config: &TimeTrackingConfig) -> Result<Self> {
        let default_zone = match config.default_timezone.as_deref() {
            None => None,
            Some(name) => Some(db.index_of(name).ok_or_else(|| {
                RouteTimeError::InvalidConfig(format!("default_timezone '{}' not in table", name))
            })?),
        };
        Ok(Self {
            db,
            default_zone,
            week_start: config.week_start,
        })
    }

    /// A context with no default zone and Monday week start.
    pub fn with_db(db: &'a TimezoneDb) -> Self {
        Self {
            db,
            default_zone: None,
            week_start: WeekStartDay::default(),
        }
    }

    /// The zone construction will use for `location`: the graph's answer,
    /// else the configured default.
    pub fn resolve_zone<G: GraphTimezones + ?Sized>(
        &self,
        location: &Location,
        graph: &G,
    ) -> Option<ZoneIndex> {
        if let Some(index) = location.zone_index(graph) {
            return Some(index);
        }
        match self.default_zone {
            Some(index) => {
                log::warn!("No timezone for location using default");
                Some(index)
            }
            None => {
                log::warn!("No timezone for location and no default configured");
                None
            }
        }
    }
}
