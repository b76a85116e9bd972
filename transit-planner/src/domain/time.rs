//! Cyclic schedule-day time handling.
//!
//! A transit schedule repeats every day, so times carry no date: a trip
//! leg departing 23:58 and arriving 00:03 simply wraps past midnight.
//! This module provides a minute-resolution time-of-day type whose
//! duration arithmetic is wrap-aware.

use chrono::{Duration, NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;

/// Minutes in one schedule day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Error returned when constructing or parsing an invalid time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A point in the cyclic schedule day, at minute resolution.
///
/// Out-of-range components are rejected at construction, never clamped,
/// so any `TimeOfDay` value is valid by construction.
///
/// Duration arithmetic wraps forward past midnight: the distance from
/// 17:23 to 17:22 is 1439 minutes, not -1.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::TimeOfDay;
///
/// let t = TimeOfDay::new(17, 23).unwrap();
/// assert_eq!(t.minutes_to(TimeOfDay::new(17, 24).unwrap()), 1);
/// assert_eq!(t.minutes_to(TimeOfDay::new(17, 22).unwrap()), 1439);
///
/// assert!(TimeOfDay::new(24, 0).is_err());
/// assert!(TimeOfDay::new(12, 60).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay {
    time: NaiveTime,
}

impl TimeOfDay {
    /// Create a time from hour and minute components.
    ///
    /// Fails when `hour` is not in `0..24` or `minute` is not in `0..60`.
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour >= 24 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute >= 60 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("invalid time"))?;
        Ok(Self { time })
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// Schedule files carry times as zero-padded "HH:MM" strings; this
    /// accepts exactly that shape and nothing looser.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::TimeOfDay;
    ///
    /// assert!(TimeOfDay::parse_hhmm("00:00").is_ok());
    /// assert!(TimeOfDay::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(TimeOfDay::parse_hhmm("1430").is_err());
    /// assert!(TimeOfDay::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::new(hour, minute)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Minutes from this time forward to `other`, wrapping past midnight.
    ///
    /// Always non-negative and less than [`MINUTES_PER_DAY`]; the
    /// distance from a time to itself is zero.
    pub fn minutes_to(self, other: TimeOfDay) -> i64 {
        other
            .time
            .signed_duration_since(self.time)
            .num_minutes()
            .rem_euclid(MINUTES_PER_DAY)
    }

    /// A new time `delta_minutes` later, wrapping past midnight.
    ///
    /// Negative deltas wrap backwards.
    pub fn later(self, delta_minutes: i64) -> TimeOfDay {
        let (time, _) = self
            .time
            .overflowing_add_signed(Duration::minutes(delta_minutes.rem_euclid(MINUTES_PER_DAY)));
        Self { time }
    }

    /// Like [`later`](Self::later), with a seconds component that rounds
    /// up to the next whole minute.
    ///
    /// Loaders estimate walking durations in seconds; the schedule model
    /// is minute-resolution, so a partial minute counts as a full one.
    pub fn later_by(self, delta_minutes: i64, delta_seconds: i64) -> TimeOfDay {
        let whole = delta_seconds.div_euclid(60);
        let partial = i64::from(delta_seconds.rem_euclid(60) > 0);
        self.later(delta_minutes + whole + partial)
    }

    /// A comparator ordering times as if `pivot` were the smallest value.
    ///
    /// Under this order, one minute before `pivot` is the largest value.
    /// It ranks candidate departures by how soon they occur relative to
    /// the current clock, independent of literal midnight wraparound.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::TimeOfDay;
    ///
    /// let pivot = TimeOfDay::new(12, 0).unwrap();
    /// let cmp = TimeOfDay::relative_cmp(pivot);
    ///
    /// let just_after = TimeOfDay::new(12, 1).unwrap();
    /// let just_before = TimeOfDay::new(11, 59).unwrap();
    /// assert_eq!(cmp(&just_after, &just_before), std::cmp::Ordering::Less);
    /// ```
    pub fn relative_cmp(pivot: TimeOfDay) -> impl Fn(&TimeOfDay, &TimeOfDay) -> Ordering {
        move |a, b| pivot.minutes_to(*a).cmp(&pivot.minutes_to(*b))
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
