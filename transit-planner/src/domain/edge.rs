//! Scheduled trip legs.

use std::fmt;
use std::sync::Arc;

use super::{Line, StationId, TimeOfDay};

/// One scheduled vehicle run of a line.
///
/// Edges sharing a tour (on the same line) are consecutive legs of the
/// same physical ride and can be chained without a change penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TourId(pub u32);

impl fmt::Display for TourId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One scheduled movement between two stations.
///
/// Immutable once constructed. The natural schedule order is
/// (departure, arrival); see [`schedule_key`](Edge::schedule_key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    line: Arc<Line>,
    tour: TourId,
    from: StationId,
    to: StationId,
    departure: TimeOfDay,
    arrival: TimeOfDay,
}

impl Edge {
    /// Create a trip leg.
    pub fn new(
        line: Arc<Line>,
        tour: TourId,
        from: StationId,
        to: StationId,
        departure: TimeOfDay,
        arrival: TimeOfDay,
    ) -> Self {
        Self {
            line,
            tour,
            from,
            to,
            departure,
            arrival,
        }
    }

    /// The line this leg runs on.
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// The specific vehicle run within the line.
    pub fn tour(&self) -> TourId {
        self.tour
    }

    /// Station the leg departs from.
    pub fn from(&self) -> StationId {
        self.from
    }

    /// Station the leg arrives at.
    pub fn to(&self) -> StationId {
        self.to
    }

    /// Scheduled departure time.
    pub fn departure(&self) -> TimeOfDay {
        self.departure
    }

    /// Scheduled arrival time.
    pub fn arrival(&self) -> TimeOfDay {
        self.arrival
    }

    /// In-vehicle minutes for this leg, wrapping past midnight.
    pub fn travel_minutes(&self) -> i64 {
        self.departure.minutes_to(self.arrival)
    }

    /// Whether `other` is a leg of the same physical ride.
    ///
    /// Same ride means same line and same tour; staying aboard such a
    /// ride is not a line change and incurs no change buffer.
    pub fn same_ride(&self, other: &Edge) -> bool {
        self.tour == other.tour && self.line == other.line
    }

    /// Whether this leg is a walking connection.
    pub fn is_walk(&self) -> bool {
        self.line.is_walking()
    }

    /// Sort key for the natural schedule order (departure, arrival).
    pub fn schedule_key(&self) -> (TimeOfDay, TimeOfDay) {
        (self.departure, self.arrival)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}→{} {}–{}",
            self.line, self.tour, self.from, self.to, self.departure, self.arrival
        )
    }
}
