//! Per-destination search outcomes.

use crate::domain::Route;

/// The outcome of a search for one destination station.
///
/// Exactly one of three cases: the destination is the origin itself
/// (an empty route of zero duration), it was reached by a best route,
/// or no route exists within the search bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingResult {
    /// No route within the change-buffer and duration bounds.
    Unreachable,

    /// The destination is the origin of the search.
    Start,

    /// Reached; `total_minutes` counts from the search start time to
    /// the last leg's arrival, including any initial wait.
    Reachable { route: Route, total_minutes: i64 },
}

impl RoutingResult {
    /// Whether a route to this destination was found.
    ///
    /// The origin itself is not "reachable"; test it with
    /// [`is_start_node`](Self::is_start_node).
    pub fn is_reachable(&self) -> bool {
        matches!(self, RoutingResult::Reachable { .. })
    }

    /// Whether this destination is the search origin.
    pub fn is_start_node(&self) -> bool {
        matches!(self, RoutingResult::Start)
    }

    /// The best route, for reachable destinations.
    pub fn route(&self) -> Option<&Route> {
        match self {
            RoutingResult::Reachable { route, .. } => Some(route),
            _ => None,
        }
    }

    /// Total minutes from the search start time, where defined.
    ///
    /// Zero for the origin, `None` for unreachable destinations.
    pub fn total_minutes(&self) -> Option<i64> {
        match self {
            RoutingResult::Unreachable => None,
            RoutingResult::Start => Some(0),
            RoutingResult::Reachable { total_minutes, .. } => Some(*total_minutes),
        }
    }
}
