//! Domain types for the transit planner.
//!
//! These are the value types the rest of the crate computes with:
//! cyclic times, lines, trip legs, and routes. All of them enforce
//! their invariants at construction time, so code that receives these
//! types can trust their validity.

mod edge;
mod line;
mod route;
mod station;
mod time;

pub use edge::{Edge, TourId};
pub use line::{Line, LineColor};
pub use route::{Route, RouteError};
pub use station::{Point, StationId};
pub use time::{MINUTES_PER_DAY, TimeError, TimeOfDay};
