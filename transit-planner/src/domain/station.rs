//! Station identity and map position.

use std::fmt;

/// A dense station identifier within one loaded network.
///
/// Ids are assigned contiguously from zero by the network builder, so
/// they double as indices into the network's station table. They are
/// stable for the lifetime of the network but carry no meaning across
/// differently loaded schedules.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub usize);

impl StationId {
    /// Returns the id as an index into the station table.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A projected map position for a station.
///
/// Produced by the loader's coordinate projection; the planner carries
/// it through untouched for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a position from projected coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
