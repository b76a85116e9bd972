//! Search configuration.

use chrono::Duration;

use crate::network::Network;

/// Parameters bounding a route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum dwell time in minutes when switching to a different
    /// line or tour at a station.
    ///
    /// Zero allows instantaneous changes. A negative value relaxes the
    /// requirement further, permitting a ride that nominally departs up
    /// to that many minutes before the reported arrival. That is an
    /// explicit caller choice, never a default.
    pub change_buffer_mins: i64,

    /// Hard ceiling in minutes from the start time; continuations past
    /// it are discarded during search.
    pub max_duration_mins: i64,

    /// Maximum continuous run of walking legs within a route, in
    /// walked minutes. A scheduled leg resets the run.
    pub max_walk_run_mins: i64,
}

impl SearchConfig {
    /// Create a configuration with the given parameters.
    pub fn new(change_buffer_mins: i64, max_duration_mins: i64, max_walk_run_mins: i64) -> Self {
        Self {
            change_buffer_mins,
            max_duration_mins,
            max_walk_run_mins,
        }
    }

    /// Default configuration with the duration ceiling taken from the
    /// network's configured maximum.
    pub fn for_network(network: &Network) -> Self {
        Self {
            max_duration_mins: network.max_duration_hours() * 60,
            ..Self::default()
        }
    }

    /// Returns the change buffer as a Duration.
    pub fn change_buffer(&self) -> Duration {
        Duration::minutes(self.change_buffer_mins)
    }

    /// Returns the duration ceiling as a Duration.
    pub fn max_duration(&self) -> Duration {
        Duration::minutes(self.max_duration_mins)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            change_buffer_mins: 5,
            max_duration_mins: 360, // 6 hours
            max_walk_run_mins: 15,
        }
    }
}
