//! # route-time
//!
//! Time tracking for time-dependent route search.
//!
//! A search that honours rush-hour speeds, transit schedules or time-of-day
//! restrictions needs to know, at every expanded edge, what the local clock
//! reads and how far that moment is from the present. This crate provides
//! that as a small immutable value, [`TimeInfo`], built once per route origin
//! and stepped edge by edge, including across timezone boundaries.
//!
//! ## Modules
//!
//! - [`time_info`] — the [`TimeInfo`] value and its forward/backward step algebra
//! - [`make`] — construction of the origin value from a [`Location`]
//! - [`tzdb`] — the immutable, shareable timezone table addressed by [`ZoneIndex`]
//! - [`codec`] — local date-time strings to instants and back
//! - [`week`] — week-cyclic second arithmetic
//! - [`location`] — route origins and the graph's timezone lookup
//! - [`config`] — configuration and the resolved [`TimeContext`]
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use route_time::{Location, SingleZone, Step, TimeContext, TimeInfo, TimezoneDb};
//!
//! let db = TimezoneDb::from_names(["America/Los_Angeles", "America/New_York"]).unwrap();
//! let ctx = TimeContext::with_db(&db);
//!
//! let mut origin = Location::new(vec![42]).with_date_time("2026-03-16T08:00");
//! let start = TimeInfo::make(&mut origin, &SingleZone(1), &ctx);
//! assert!(start.is_valid());
//!
//! // ten minutes of driving that ends across the border in New York
//! let next = start.advance(Step::new(600, 2), &db);
//! assert_eq!(next.zone_index(), 2);
//! assert_eq!(next.now_deviation() - start.now_deviation(), 600);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod location;
pub mod make;
pub mod time_info;
pub mod tzdb;
pub mod week;

pub use codec::{
    current_instant, format_local_datetime, parse_local_datetime, LocalReading, WeekStartDay,
};
pub use config::{TimeContext, TimeTrackingConfig};
pub use error::{Result, RouteTimeError};
pub use location::{
    DateTimeSpec, DateTimeType, Direction, GraphId, GraphTimezones, Location, SingleZone,
    CURRENT,
};
pub use time_info::{Step, TimeInfo};
pub use tzdb::{TimezoneDb, ZoneIndex, NO_ZONE};
pub use week::SECONDS_PER_WEEK;
