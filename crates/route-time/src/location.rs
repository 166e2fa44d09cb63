//! Route origins as the time tracker sees them.
//!
//! A [`Location`] is the slice of a routing request that construction reads
//! and (for "current" departures) writes: the candidate graph edges the
//! location snapped to, and the request's date-time field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tzdb::ZoneIndex;

/// Identifier of a directed edge in the tiled graph.
pub type GraphId = u64;

/// Sentinel value of [`Location::date_time`] asking for the present moment.
pub const CURRENT: &str = "current";

/// Tile-local timezone lookup provided by the graph.
pub trait GraphTimezones {
    /// Zone of the node `edge` ends at, `None` where the tile has no
    /// timezone data.
    fn end_node_timezone(&self, edge: GraphId) -> Option<ZoneIndex>;
}

impl GraphTimezones for HashMap<GraphId, ZoneIndex> {
    fn end_node_timezone(&self, edge: GraphId) -> Option<ZoneIndex> {
        self.get(&edge).copied()
    }
}

/// Every edge ends in the same zone; for graphs built without timezone data
/// or inspection tools that only know the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleZone(pub ZoneIndex);

impl GraphTimezones for SingleZone {
    fn end_node_timezone(&self, _edge: GraphId) -> Option<ZoneIndex> {
        Some(self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Candidate edges from the location search, best first.
    #[serde(default)]
    pub path_edges: Vec<GraphId>,
    /// `None`, [`CURRENT`], or a local `YYYY-MM-DDTHH:MM` string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

impl Location {
    pub fn new(path_edges: Vec<GraphId>) -> Self {
        Self {
            path_edges,
            date_time: None,
        }
    }

    pub fn with_date_time(mut self, date_time: impl Into<String>) -> Self {
        self.date_time = Some(date_time.into());
        self
    }

    pub fn has_date_time(&self) -> bool {
        self.date_time.is_some()
    }

    /// What kind of time, if any, this location asks for.
    pub fn date_time_spec(&self) -> DateTimeSpec<'_> {
        DateTimeSpec::from_field(self.date_time.as_deref())
    }

    /// Zone of the first candidate edge whose end node has one.
    pub fn zone_index<G: GraphTimezones + ?Sized>(&self, graph: &G) -> Option<ZoneIndex> {
        self.path_edges
            .iter()
            .filter_map(|edge| graph.end_node_timezone(*edge))
            .find(|index| *index != crate::tzdb::NO_ZONE)
    }
}

/// A typed view of a request's date-time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeSpec<'a> {
    /// No time-dependent routing.
    None,
    /// Use the present moment.
    Current,
    /// An explicit local date-time string, not yet validated.
    Fixed(&'a str),
}

impl<'a> DateTimeSpec<'a> {
    pub fn from_field(field: Option<&'a str>) -> Self {
        match field {
            None => DateTimeSpec::None,
            Some(CURRENT) => DateTimeSpec::Current,
            Some(s) => DateTimeSpec::Fixed(s),
        }
    }
}

/// The request schema's date-time type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeType {
    Current,
    DepartAt,
    ArriveBy,
}

impl DateTimeType {
    /// Which way the search walks time for this type of request.
    pub fn direction(self) -> Direction {
        match self {
            DateTimeType::Current | DateTimeType::DepartAt => Direction::Forward,
            DateTimeType::ArriveBy => Direction::Reverse,
        }
    }
}

/// Whether a search expands away from its origin in time (depart-at) or
/// back towards it (arrive-by).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}
