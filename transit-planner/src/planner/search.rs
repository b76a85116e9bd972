//! Label-setting shortest-route search over the time-expanded network.
//!
//! From one origin and start time, finds the fastest route to every
//! other station (or a requested subset). The search pops partial
//! routes from a min-priority queue ordered by cumulative travel time;
//! the first pop reaching a station fixes that station's best route
//! (its label is settled, as in Dijkstra's algorithm). Staying aboard
//! the same tour continues a ride with no boarding event, so it is
//! allowed from any popped route; changing to a different line or tour
//! is a transfer, allowed only from the settling pop and only when the
//! dwell time meets the change buffer.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::domain::{MINUTES_PER_DAY, Route, StationId, TimeOfDay};
use crate::manager::CancelToken;
use crate::network::Network;

use super::config::SearchConfig;
use super::result::RoutingResult;

/// Error from a route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The search observed cancellation and stopped early.
    ///
    /// Never conflated with "no route found": a cancelled search
    /// produces no result map at all.
    #[error("search was cancelled")]
    Cancelled,

    /// A station id does not exist in the network.
    #[error("unknown station id {0}")]
    UnknownStation(StationId),
}

/// A request for routes from one origin.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Station the journey starts from.
    pub origin: StationId,

    /// Restrict results to these stations and stop as soon as all of
    /// them are settled. `None` computes every reachable station.
    pub destinations: Option<HashSet<StationId>>,

    /// Depart no earlier than this time.
    pub start_time: TimeOfDay,
}

impl SearchRequest {
    /// A request for all reachable stations.
    pub fn new(origin: StationId, start_time: TimeOfDay) -> Self {
        Self {
            origin,
            destinations: None,
            start_time,
        }
    }

    /// Restrict the request to a destination subset.
    pub fn with_destinations(mut self, destinations: impl IntoIterator<Item = StationId>) -> Self {
        self.destinations = Some(destinations.into_iter().collect());
        self
    }

    fn validate(&self, network: &Network) -> Result<(), SearchError> {
        if network.station(self.origin).is_none() {
            return Err(SearchError::UnknownStation(self.origin));
        }
        if let Some(destinations) = &self.destinations {
            for &id in destinations {
                if network.station(id).is_none() {
                    return Err(SearchError::UnknownStation(id));
                }
            }
        }
        Ok(())
    }
}

/// A partial route on the frontier.
struct Candidate {
    /// Minutes from the start time to this route's last arrival,
    /// including waits.
    total_minutes: i64,

    /// Insertion sequence; ties on total time pop in FIFO order.
    seq: u64,

    /// The last leg's destination.
    at: StationId,

    /// The last leg's arrival time.
    arrival: TimeOfDay,

    route: Route,

    /// Stations the route passes through, for the cycle guard.
    visited: HashSet<StationId>,

    /// Walked minutes in the trailing run of walking legs.
    walk_run_mins: i64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.total_minutes == other.total_minutes && self.seq == other.seq
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_minutes
            .cmp(&other.total_minutes)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Shortest-route search over one network.
pub struct Router<'a> {
    network: &'a Network,
    config: &'a SearchConfig,
}

impl<'a> Router<'a> {
    /// Create a router over a network with the given bounds.
    pub fn new(network: &'a Network, config: &'a SearchConfig) -> Self {
        Self { network, config }
    }

    /// Find the fastest route from the request's origin to every
    /// in-scope station.
    ///
    /// Returns one [`RoutingResult`] per station: every station in the
    /// network when the request names no destinations, otherwise the
    /// requested stations plus the origin (which is always
    /// [`RoutingResult::Start`]).
    ///
    /// Cancellation is checked once per popped candidate; an observed
    /// cancellation returns [`SearchError::Cancelled`] promptly and
    /// never a partial result map.
    pub fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancelToken,
    ) -> Result<HashMap<StationId, RoutingResult>, SearchError> {
        request.validate(self.network)?;

        let mut outstanding = request.destinations.clone();
        if let Some(out) = &mut outstanding {
            out.remove(&request.origin);
        }

        let mut settled: HashMap<StationId, RoutingResult> = HashMap::new();

        // Nothing requested beyond the origin itself
        let trivially_done = outstanding.as_ref().is_some_and(HashSet::is_empty);
        if !trivially_done {
            self.run(request, cancel, &mut outstanding, &mut settled)?;
        }

        let mut results = settled;
        results.insert(request.origin, RoutingResult::Start);
        match &request.destinations {
            Some(destinations) => {
                results.retain(|id, _| *id == request.origin || destinations.contains(id));
                for &id in destinations {
                    results.entry(id).or_insert(RoutingResult::Unreachable);
                }
            }
            None => {
                for station in self.network.stations() {
                    results.entry(station.id()).or_insert(RoutingResult::Unreachable);
                }
            }
        }
        Ok(results)
    }

    /// The main settle-and-extend loop.
    fn run(
        &self,
        request: &SearchRequest,
        cancel: &CancelToken,
        outstanding: &mut Option<HashSet<StationId>>,
        settled: &mut HashMap<StationId, RoutingResult>,
    ) -> Result<(), SearchError> {
        let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
        let mut seq: u64 = 0;

        let origin = self
            .network
            .station(request.origin)
            .ok_or(SearchError::UnknownStation(request.origin))?;
        for edge in origin.departures_from(request.start_time) {
            let wait = request.start_time.minutes_to(edge.departure());
            // Waits only grow over the wrapped lap
            if wait > self.config.max_duration_mins {
                break;
            }
            let total = wait + edge.travel_minutes();
            if total > self.config.max_duration_mins {
                continue;
            }
            if edge.to() == request.origin {
                continue;
            }
            let walk_run = if edge.is_walk() { edge.travel_minutes() } else { 0 };
            if walk_run > self.config.max_walk_run_mins {
                continue;
            }
            seq += 1;
            heap.push(Reverse(Candidate {
                total_minutes: total,
                seq,
                at: edge.to(),
                arrival: edge.arrival(),
                route: Route::empty().extended(edge.clone()),
                visited: HashSet::from([request.origin, edge.to()]),
                walk_run_mins: walk_run,
            }));
        }
        tracing::debug!(
            origin = %request.origin,
            start = %request.start_time,
            seeded = heap.len(),
            "route search seeded"
        );

        while let Some(Reverse(candidate)) = heap.pop() {
            if cancel.is_cancelled() {
                tracing::debug!(settled = settled.len(), "route search cancelled");
                return Err(SearchError::Cancelled);
            }

            let newly_settled = !settled.contains_key(&candidate.at);
            if newly_settled {
                tracing::trace!(
                    station = %candidate.at,
                    total_minutes = candidate.total_minutes,
                    "station settled"
                );
                settled.insert(
                    candidate.at,
                    RoutingResult::Reachable {
                        route: candidate.route.clone(),
                        total_minutes: candidate.total_minutes,
                    },
                );
                if let Some(out) = outstanding {
                    out.remove(&candidate.at);
                    if out.is_empty() {
                        break;
                    }
                }
            }

            let station = self
                .network
                .station(candidate.at)
                .ok_or(SearchError::UnknownStation(candidate.at))?;
            let Some(last) = candidate.route.edges().last() else {
                continue;
            };
            let budget = self.config.max_duration_mins - candidate.total_minutes;

            for edge in station.departures_from(candidate.arrival) {
                let wait = candidate.arrival.minutes_to(edge.departure());
                // Waits only grow over the wrapped lap, so once the wait
                // alone exhausts the budget nothing later can fit. A
                // negative change buffer is the exception: it admits
                // boardings near the end of the lap with no wait charged.
                if wait > budget && self.config.change_buffer_mins >= 0 {
                    break;
                }

                let charged_wait = if edge.same_ride(last) {
                    // Still aboard the same ride: no boarding event, no
                    // buffer, no settlement requirement
                    Some(wait)
                } else if !newly_settled {
                    None
                } else if self.config.change_buffer_mins < 0
                    && wait >= MINUTES_PER_DAY + self.config.change_buffer_mins
                {
                    // Departs nominally before our arrival; board at once
                    Some(0)
                } else if wait >= self.config.change_buffer_mins {
                    Some(wait)
                } else {
                    None
                };
                let Some(charged_wait) = charged_wait else {
                    continue;
                };

                if candidate.visited.contains(&edge.to()) {
                    continue;
                }
                let total = candidate.total_minutes + charged_wait + edge.travel_minutes();
                if total > self.config.max_duration_mins {
                    continue;
                }
                let walk_run = if edge.is_walk() {
                    candidate.walk_run_mins + edge.travel_minutes()
                } else {
                    0
                };
                if walk_run > self.config.max_walk_run_mins {
                    continue;
                }

                let mut visited = candidate.visited.clone();
                visited.insert(edge.to());
                seq += 1;
                heap.push(Reverse(Candidate {
                    total_minutes: total,
                    seq,
                    at: edge.to(),
                    arrival: edge.arrival(),
                    route: candidate.route.extended(edge.clone()),
                    visited,
                    walk_run_mins: walk_run,
                }));
            }
        }

        tracing::debug!(settled = settled.len(), "route search finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Edge, Line, LineColor, Point, TourId};
    use crate::network::NetworkBuilder;
    use std::sync::Arc;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse_hhmm(s).unwrap()
    }

    /// Build a network of `station_count` stations and the given legs
    /// as (line, tour, from, to, departure, arrival).
    fn build_network(
        station_count: usize,
        edges: &[(&str, u32, usize, usize, &str, &str)],
    ) -> Network {
        let mut builder = NetworkBuilder::new();
        for i in 0..station_count {
            builder.add_station(format!("S{i}"), Point::default());
        }
        for &(line_name, tour, from, to, dep, arr) in edges {
            let line = if line_name == "walking" {
                Line::walking()
            } else {
                Line::new(line_name, LineColor { r: 0, g: 0, b: 0 })
            };
            builder
                .add_edge(Edge::new(
                    Arc::new(line),
                    TourId(tour),
                    StationId(from),
                    StationId(to),
                    t(dep),
                    t(arr),
                ))
                .unwrap();
        }
        builder.build()
    }

    fn config(change_buffer_mins: i64, max_duration_mins: i64) -> SearchConfig {
        SearchConfig::new(change_buffer_mins, max_duration_mins, 15)
    }

    fn search_all(
        network: &Network,
        config: &SearchConfig,
        origin: usize,
        start: &str,
    ) -> HashMap<StationId, RoutingResult> {
        Router::new(network, config)
            .search(
                &SearchRequest::new(StationId(origin), t(start)),
                &CancelToken::new(),
            )
            .unwrap()
    }

    #[test]
    fn direct_route() {
        let network = build_network(2, &[("U6", 1, 0, 1, "10:05", "10:12")]);
        let results = search_all(&network, &config(5, 360), 0, "10:00");

        let b = &results[&StationId(1)];
        assert!(b.is_reachable());
        // 5 minutes waiting plus 7 minutes aboard
        assert_eq!(b.total_minutes(), Some(12));
        assert_eq!(b.route().unwrap().len(), 1);
    }

    #[test]
    fn origin_is_always_start() {
        let network = build_network(2, &[("U6", 1, 0, 1, "10:05", "10:12")]);
        let results = search_all(&network, &config(5, 360), 0, "10:00");

        assert_eq!(results[&StationId(0)], RoutingResult::Start);
        assert!(results[&StationId(0)].is_start_node());
        assert!(!results[&StationId(0)].is_reachable());
    }

    #[test]
    fn unreached_stations_reported_unreachable() {
        let network = build_network(3, &[("U6", 1, 0, 1, "10:05", "10:12")]);
        let results = search_all(&network, &config(5, 360), 0, "10:00");

        assert_eq!(results.len(), 3);
        assert_eq!(results[&StationId(2)], RoutingResult::Unreachable);
    }

    #[test]
    fn reachable_routes_chain_from_origin() {
        let network = build_network(
            4,
            &[
                ("U6", 1, 0, 1, "10:00", "10:05"),
                ("U6", 1, 1, 2, "10:05", "10:11"),
                ("U7", 3, 2, 3, "10:20", "10:30"),
            ],
        );
        let results = search_all(&network, &config(5, 360), 0, "10:00");

        for result in results.values() {
            let Some(route) = result.route() else { continue };
            assert_eq!(route.origin(), Some(StationId(0)));
            // Re-validating proves chaining and no-revisit hold
            assert!(Route::new(route.edges().to_vec()).is_ok());
        }
        assert!(results[&StationId(3)].is_reachable());
    }

    /// Three stations, three lines. The same-tour continuation via the
    /// second line must win over the third line, which the change
    /// buffer pushes out of reach.
    #[test]
    fn same_tour_chain_beats_buffered_transfer() {
        let network = build_network(
            3,
            &[
                ("L1", 1, 0, 1, "00:00", "00:01"),
                ("L2", 1, 0, 1, "00:01", "00:02"),
                ("L2", 1, 1, 2, "00:02", "00:03"),
                ("L3", 1, 1, 2, "00:03", "00:04"),
            ],
        );
        let results = search_all(&network, &config(5, 360), 0, "00:00");

        // Best route to S1 is the first line, arriving 00:01
        assert_eq!(results[&StationId(1)].total_minutes(), Some(1));

        // Best route to S2 stays aboard the second line's tour
        let c = &results[&StationId(2)];
        assert_eq!(c.total_minutes(), Some(3));
        let lines: Vec<_> = c
            .route()
            .unwrap()
            .edges()
            .iter()
            .map(|e| e.line().name().to_string())
            .collect();
        assert_eq!(lines, vec!["L2", "L2"]);
    }

    #[test]
    fn transfer_requires_change_buffer() {
        // 3-minute connection at S1
        let edges = [
            ("L1", 1, 0, 1, "10:00", "10:10"),
            ("L2", 1, 1, 2, "10:13", "10:20"),
        ];
        let network = build_network(3, &edges);

        let tight = search_all(&network, &config(5, 360), 0, "10:00");
        assert_eq!(tight[&StationId(2)], RoutingResult::Unreachable);

        let relaxed = search_all(&network, &config(3, 360), 0, "10:00");
        assert_eq!(relaxed[&StationId(2)].total_minutes(), Some(20));
    }

    #[test]
    fn shrinking_change_buffer_never_loses_destinations() {
        let edges = [
            ("L1", 1, 0, 1, "10:00", "10:10"),
            ("L2", 1, 1, 2, "10:13", "10:20"),
            ("L3", 1, 1, 3, "10:30", "10:45"),
        ];
        let network = build_network(4, &edges);

        let strict = search_all(&network, &config(10, 360), 0, "10:00");
        let loose = search_all(&network, &config(0, 360), 0, "10:00");

        for (id, result) in &strict {
            if let Some(strict_total) = result.total_minutes() {
                let loose_total = loose[id].total_minutes().expect(
                    "destination reachable under a stricter buffer must stay reachable",
                );
                assert!(loose_total <= strict_total);
            }
        }
    }

    #[test]
    fn same_ride_never_pays_the_buffer() {
        // Continuing the same tour through S1 despite a one-hour buffer
        let network = build_network(
            3,
            &[
                ("L1", 1, 0, 1, "10:00", "10:10"),
                ("L1", 1, 1, 2, "10:13", "10:20"),
            ],
        );
        let results = search_all(&network, &config(60, 360), 0, "10:00");

        assert_eq!(results[&StationId(2)].total_minutes(), Some(20));
    }

    #[test]
    fn raising_max_duration_only_adds_reachability() {
        let edges = [
            ("L1", 1, 0, 1, "10:00", "10:10"),
            ("L2", 2, 1, 2, "10:15", "10:25"),
        ];
        let network = build_network(3, &edges);

        let short = search_all(&network, &config(0, 15), 0, "10:00");
        assert!(short[&StationId(1)].is_reachable());
        assert_eq!(short[&StationId(2)], RoutingResult::Unreachable);

        let long = search_all(&network, &config(0, 30), 0, "10:00");
        assert!(long[&StationId(2)].is_reachable());
        // Durations of already-reachable stations are unchanged
        assert_eq!(
            short[&StationId(1)].total_minutes(),
            long[&StationId(1)].total_minutes()
        );
    }

    #[test]
    fn destination_filter_restricts_results() {
        let network = build_network(
            3,
            &[
                ("L1", 1, 0, 1, "10:00", "10:05"),
                ("L1", 1, 1, 2, "10:05", "10:10"),
            ],
        );
        let cfg = config(0, 360);
        let request =
            SearchRequest::new(StationId(0), t("10:00")).with_destinations([StationId(2)]);
        let results = Router::new(&network, &cfg)
            .search(&request, &CancelToken::new())
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[&StationId(2)].is_reachable());
        assert_eq!(results[&StationId(0)], RoutingResult::Start);
        assert!(!results.contains_key(&StationId(1)));
    }

    #[test]
    fn filter_of_only_the_origin_is_trivially_done() {
        let network = build_network(2, &[("L1", 1, 0, 1, "10:00", "10:05")]);
        let cfg = config(0, 360);
        let request =
            SearchRequest::new(StationId(0), t("10:00")).with_destinations([StationId(0)]);
        let results = Router::new(&network, &cfg)
            .search(&request, &CancelToken::new())
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[&StationId(0)], RoutingResult::Start);
    }

    #[test]
    fn unrequested_unreachable_station_stays_out_of_filtered_results() {
        let network = build_network(3, &[("L1", 1, 0, 1, "10:00", "10:05")]);
        let cfg = config(0, 360);
        let request =
            SearchRequest::new(StationId(0), t("10:00")).with_destinations([StationId(2)]);
        let results = Router::new(&network, &cfg)
            .search(&request, &CancelToken::new())
            .unwrap();

        assert_eq!(results[&StationId(2)], RoutingResult::Unreachable);
        assert!(!results.contains_key(&StationId(1)));
    }

    #[test]
    fn cycles_are_pruned_and_search_terminates() {
        let network = build_network(
            2,
            &[
                ("L1", 1, 0, 1, "10:00", "10:05"),
                ("L1", 2, 1, 0, "10:10", "10:15"),
                ("L1", 3, 0, 1, "10:20", "10:25"),
            ],
        );
        let results = search_all(&network, &config(0, 360), 0, "10:00");

        assert_eq!(results[&StationId(1)].total_minutes(), Some(5));
        assert_eq!(results[&StationId(0)], RoutingResult::Start);
    }

    #[test]
    fn routes_wrap_past_midnight() {
        let network = build_network(2, &[("N1", 1, 0, 1, "23:59", "00:10")]);
        let results = search_all(&network, &config(0, 360), 0, "23:50");

        // 9 minutes waiting, 11 minutes aboard
        assert_eq!(results[&StationId(1)].total_minutes(), Some(20));
    }

    #[test]
    fn negative_buffer_admits_nominally_earlier_departure() {
        // The onward leg departs two minutes before we arrive at S1
        let edges = [
            ("L1", 1, 0, 1, "09:00", "10:00"),
            ("L2", 1, 1, 2, "09:58", "10:58"),
        ];
        let network = build_network(3, &edges);

        let strict = search_all(&network, &config(0, 360), 0, "09:00");
        assert_eq!(strict[&StationId(2)], RoutingResult::Unreachable);

        let relaxed = search_all(&network, &config(-5, 360), 0, "09:00");
        // No waiting is charged for the nominally-earlier boarding
        assert_eq!(relaxed[&StationId(2)].total_minutes(), Some(120));
    }

    #[test]
    fn continuous_walking_is_bounded() {
        let edges = [
            ("walking", 0, 0, 1, "10:00", "10:10"),
            ("walking", 0, 1, 2, "10:10", "10:20"),
        ];
        let network = build_network(3, &edges);

        // 15-minute walk cap: the second 10-minute walk pushes the run
        // to 20 and is pruned
        let capped = Router::new(&network, &SearchConfig::new(0, 360, 15))
            .search(
                &SearchRequest::new(StationId(0), t("10:00")),
                &CancelToken::new(),
            )
            .unwrap();
        assert!(capped[&StationId(1)].is_reachable());
        assert_eq!(capped[&StationId(2)], RoutingResult::Unreachable);

        let generous = Router::new(&network, &SearchConfig::new(0, 360, 60))
            .search(
                &SearchRequest::new(StationId(0), t("10:00")),
                &CancelToken::new(),
            )
            .unwrap();
        assert!(generous[&StationId(2)].is_reachable());
    }

    #[test]
    fn scheduled_leg_resets_the_walking_run() {
        let edges = [
            ("walking", 0, 0, 1, "10:00", "10:10"),
            ("L1", 1, 1, 2, "10:15", "10:20"),
            ("walking", 0, 2, 3, "10:25", "10:35"),
        ];
        let network = build_network(4, &edges);

        let results = Router::new(&network, &SearchConfig::new(0, 360, 15))
            .search(
                &SearchRequest::new(StationId(0), t("10:00")),
                &CancelToken::new(),
            )
            .unwrap();

        // 10 walked + 10 walked minutes, but split by a scheduled leg
        assert!(results[&StationId(3)].is_reachable());
    }

    #[test]
    fn cancelled_before_first_pop() {
        let network = build_network(2, &[("L1", 1, 0, 1, "10:00", "10:05")]);
        let cfg = config(0, 360);
        let token = CancelToken::new();
        token.cancel();

        let result = Router::new(&network, &cfg)
            .search(&SearchRequest::new(StationId(0), t("09:00")), &token);
        assert_eq!(result, Err(SearchError::Cancelled));
    }

    #[test]
    fn unknown_origin_fails_loudly() {
        let network = build_network(2, &[("L1", 1, 0, 1, "10:00", "10:05")]);
        let cfg = config(0, 360);

        let result = Router::new(&network, &cfg).search(
            &SearchRequest::new(StationId(99), t("09:00")),
            &CancelToken::new(),
        );
        assert_eq!(result, Err(SearchError::UnknownStation(StationId(99))));
    }

    #[test]
    fn unknown_destination_fails_loudly() {
        let network = build_network(2, &[("L1", 1, 0, 1, "10:00", "10:05")]);
        let cfg = config(0, 360);

        let request =
            SearchRequest::new(StationId(0), t("09:00")).with_destinations([StationId(42)]);
        let result = Router::new(&network, &cfg).search(&request, &CancelToken::new());
        assert_eq!(result, Err(SearchError::UnknownStation(StationId(42))));
    }

    #[test]
    fn edgeless_origin_reaches_nothing() {
        let network = build_network(2, &[("L1", 1, 0, 1, "10:00", "10:05")]);
        let results = search_all(&network, &config(0, 360), 1, "09:00");

        assert_eq!(results[&StationId(1)], RoutingResult::Start);
        assert_eq!(results[&StationId(0)], RoutingResult::Unreachable);
    }
}
