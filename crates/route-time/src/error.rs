//! Error types for route-time operations.
//!
//! Only the fallible seams return these: building a timezone table, loading
//! configuration and parsing wall-clock strings. Constructing and stepping a
//! [`TimeInfo`](crate::TimeInfo) never fails; problems there collapse to the
//! invalid value instead.

use thiserror::Error;

use crate::tzdb::ZoneIndex;

#[derive(Error, Debug)]
pub enum RouteTimeError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown zone index: {0}")]
    UnknownZoneIndex(ZoneIndex),
}

pub type Result<T> = std::result::Result<T, RouteTimeError>;
