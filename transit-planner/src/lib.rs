//! Journey planning core for a scheduled transit network.
//!
//! Given an immutable, time-expanded network of stations and timed
//! trip legs (built by a loading layer from schedule data), this crate
//! finds the fastest route from one origin station to every other
//! station departing no earlier than a chosen time, subject to a
//! minimum line-change buffer and a trip-duration ceiling. Walking
//! connections are just more legs on a sentinel line.
//!
//! Searches run on background workers through a single-flight request
//! manager: a UI can re-submit as its query changes and only ever
//! observes the result of the most recent, non-superseded request.

pub mod domain;
pub mod manager;
pub mod network;
pub mod planner;
