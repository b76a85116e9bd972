//! The immutable transit network.
//!
//! A [`Network`] holds every station of one loaded schedule, each with
//! its outgoing trip legs pre-sorted by departure time. It is built
//! once by the loading layer through [`NetworkBuilder`] and read-only
//! afterward, so concurrent searches share it (typically behind an
//! `Arc`) without locking.

use crate::domain::{Edge, Point, StationId, TimeOfDay};

/// Error returned when assembling an inconsistent network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// An edge endpoint does not name a known station
    #[error("edge references unknown station {0}")]
    UnknownStation(StationId),
}

/// A station with its outgoing trip legs.
///
/// Equality is by id. The outgoing legs are kept sorted ascending by
/// (departure, arrival), cyclic over one schedule day, which is what
/// makes [`departures_from`](Station::departures_from) a binary search
/// instead of a scan.
#[derive(Debug, Clone)]
pub struct Station {
    id: StationId,
    name: String,
    position: Point,
    edges: Vec<Edge>,
}

impl Station {
    /// The station's dense id.
    pub fn id(&self) -> StationId {
        self.id
    }

    /// The station's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The station's projected map position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// All outgoing legs, sorted ascending by (departure, arrival).
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing legs starting at the first one departing at/after
    /// `from`, in departure order, wrapping cyclically past midnight.
    ///
    /// The iterator is lazy and finite: it yields each outgoing leg
    /// exactly once (one full lap) and an edgeless station yields
    /// nothing. The start is found by binary search; no reordered copy
    /// of the edge list is ever materialized, since the search
    /// evaluates this view on every frontier expansion.
    pub fn departures_from(&self, from: TimeOfDay) -> Departures<'_> {
        let start = self.edges.partition_point(|e| e.departure() < from);
        Departures {
            edges: &self.edges,
            // All legs depart before `from`: wrap to the day's first
            next: if start == self.edges.len() { 0 } else { start },
            remaining: self.edges.len(),
        }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

/// Iterator over one wrapped lap of a station's outgoing legs.
///
/// Returned by [`Station::departures_from`].
#[derive(Debug, Clone)]
pub struct Departures<'a> {
    edges: &'a [Edge],
    next: usize,
    remaining: usize,
}

impl<'a> Iterator for Departures<'a> {
    type Item = &'a Edge;

    fn next(&mut self) -> Option<&'a Edge> {
        if self.remaining == 0 {
            return None;
        }
        let edge = &self.edges[self.next];
        self.next = (self.next + 1) % self.edges.len();
        self.remaining -= 1;
        Some(edge)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Departures<'_> {}

/// The fixed collection of stations for one loaded schedule.
#[derive(Debug, Clone)]
pub struct Network {
    stations: Vec<Station>,
    max_duration_hours: i64,
}

impl Network {
    /// Look up a station by id.
    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index())
    }

    /// All stations, indexed by id.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the network has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// The configured trip-duration ceiling, in hours.
    ///
    /// Chosen by the loader's configuration; searches derive their
    /// default minute budget from it.
    pub fn max_duration_hours(&self) -> i64 {
        self.max_duration_hours
    }
}

/// Assembles a [`Network`] from loader output.
///
/// The builder allocates dense station ids, validates that every edge
/// endpoint names a known station, and sorts each station's outgoing
/// legs into schedule order at [`build`](NetworkBuilder::build) time.
#[derive(Debug)]
pub struct NetworkBuilder {
    stations: Vec<Station>,
    max_duration_hours: i64,
}

impl NetworkBuilder {
    /// Start an empty network with the default six-hour ceiling.
    pub fn new() -> Self {
        Self {
            stations: Vec::new(),
            max_duration_hours: 6,
        }
    }

    /// Set the trip-duration ceiling in hours.
    pub fn set_max_duration_hours(&mut self, hours: i64) {
        self.max_duration_hours = hours;
    }

    /// Add a station, returning its dense id.
    pub fn add_station(&mut self, name: impl Into<String>, position: Point) -> StationId {
        let id = StationId(self.stations.len());
        self.stations.push(Station {
            id,
            name: name.into(),
            position,
            edges: Vec::new(),
        });
        id
    }

    /// Add a trip leg departing from its `from` station.
    ///
    /// Fails when either endpoint does not name a station added to this
    /// builder; a dangling reference is loader misbehavior, never
    /// silently dropped.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), NetworkError> {
        if edge.to().index() >= self.stations.len() {
            return Err(NetworkError::UnknownStation(edge.to()));
        }
        let from = self
            .stations
            .get_mut(edge.from().index())
            .ok_or(NetworkError::UnknownStation(edge.from()))?;
        from.edges.push(edge);
        Ok(())
    }

    /// Finish the network, sorting every station's legs into schedule
    /// order.
    pub fn build(mut self) -> Network {
        for station in &mut self.stations {
            station.edges.sort_by_key(Edge::schedule_key);
        }
        tracing::debug!(
            stations = self.stations.len(),
            max_duration_hours = self.max_duration_hours,
            "built network"
        );
        Network {
            stations: self.stations,
            max_duration_hours: self.max_duration_hours,
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
