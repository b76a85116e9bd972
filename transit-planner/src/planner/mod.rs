//! Route planning over a loaded network.
//!
//! This module answers: "from this station, departing no earlier than
//! this time, what is the fastest route to everywhere else?" The
//! search itself is a synchronous label-setting algorithm
//! ([`Router`]); [`submit_search`] runs it on a background worker via
//! the [`RequestManager`](crate::manager::RequestManager), so a UI can
//! re-query freely and only ever observes the latest result.

mod config;
mod result;
mod search;

pub use config::SearchConfig;
pub use result::RoutingResult;
pub use search::{Router, SearchError, SearchRequest};

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::StationId;
use crate::manager::RequestManager;
use crate::network::Network;

/// Run a search in the background, superseding any search in flight.
///
/// `on_complete` receives the result map only if the search is still
/// the most recent one when it finishes; a superseded or cancelled
/// search is silence. Invalid requests (unknown station ids) are also
/// silence to the caller; they are logged as errors, since a loader
/// handing out ids and a UI selecting among them should make them
/// impossible.
pub fn submit_search<C>(
    manager: &RequestManager,
    network: Arc<Network>,
    request: SearchRequest,
    config: SearchConfig,
    on_complete: C,
) where
    C: FnOnce(HashMap<StationId, RoutingResult>) + Send + 'static,
{
    manager.submit(
        move |cancel| {
            let router = Router::new(&network, &config);
            match router.search(&request, cancel) {
                Ok(results) => Some(results),
                Err(SearchError::Cancelled) => None,
                Err(err) => {
                    tracing::error!(%err, "route search failed");
                    None
                }
            }
        },
        on_complete,
    );
}
