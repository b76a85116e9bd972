//! Routes: chained sequences of trip legs.

use std::collections::HashSet;

use super::{Edge, StationId};

/// Error returned when a sequence of legs does not form a valid route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Consecutive legs do not share a station
    #[error("legs do not connect: arrived at station {arrived} but next leg departs station {departs}")]
    BrokenChain {
        arrived: StationId,
        departs: StationId,
    },

    /// The route passes through the same station twice
    #[error("route revisits station {0}")]
    RevisitedStation(StationId),
}

/// An ordered, non-repeating chain of trip legs.
///
/// Every consecutive pair of legs connects (`edge[i].to ==
/// edge[i+1].from`) and no station appears twice; [`Route::new`]
/// enforces both. The empty route is valid and represents staying at
/// the origin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    edges: Vec<Edge>,
}

impl Route {
    /// Build a route from legs, validating chaining and no-revisit.
    pub fn new(edges: Vec<Edge>) -> Result<Self, RouteError> {
        let mut seen: HashSet<StationId> = HashSet::with_capacity(edges.len() + 1);

        if let Some(first) = edges.first() {
            seen.insert(first.from());
        }
        for pair in edges.windows(2) {
            if pair[0].to() != pair[1].from() {
                return Err(RouteError::BrokenChain {
                    arrived: pair[0].to(),
                    departs: pair[1].from(),
                });
            }
        }
        for edge in &edges {
            if !seen.insert(edge.to()) {
                return Err(RouteError::RevisitedStation(edge.to()));
            }
        }

        Ok(Self { edges })
    }

    /// The empty route.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The legs in travel order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of legs.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the route has no legs.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Station the route starts from, if any legs exist.
    pub fn origin(&self) -> Option<StationId> {
        self.edges.first().map(Edge::from)
    }

    /// Station the route ends at, if any legs exist.
    pub fn terminus(&self) -> Option<StationId> {
        self.edges.last().map(Edge::to)
    }

    /// Stations visited, in travel order (origin first).
    pub fn stations(&self) -> impl Iterator<Item = StationId> + '_ {
        self.origin()
            .into_iter()
            .chain(self.edges.iter().map(Edge::to))
    }

    /// Extend with one more leg.
    ///
    /// The caller must already have checked chaining and no-revisit;
    /// the search maintains both while growing candidates.
    pub(crate) fn extended(&self, edge: Edge) -> Route {
        debug_assert!(
            self.terminus().is_none_or(|at| at == edge.from()),
            "extension must depart the route's terminus"
        );
        let mut edges = Vec::with_capacity(self.edges.len() + 1);
        edges.extend_from_slice(&self.edges);
        edges.push(edge);
        Self { edges }
    }
}
