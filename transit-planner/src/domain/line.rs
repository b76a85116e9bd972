//! Transit lines.
//!
//! A line is a named service ("U6", "Tram 2"); it carries no schedule
//! by itself. Identity is the name alone: the display color exists for
//! the UI layer and never influences routing. One sentinel line stands
//! for walking between stations rather than riding a scheduled vehicle.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of the sentinel walking line.
const WALKING_NAME: &str = "walking";

/// An RGB display color for drawing a line.
///
/// Opaque to the planner; it is threaded through so the UI can color
/// route highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LineColor {
    /// The color used for the walking sentinel line.
    pub const WALKING: LineColor = LineColor {
        r: 128,
        g: 128,
        b: 128,
    };
}

/// A named transit service.
///
/// Two lines are equal exactly when their names are equal.
#[derive(Debug, Clone)]
pub struct Line {
    name: String,
    color: LineColor,
}

impl Line {
    /// Create a line with the given name and display color.
    pub fn new(name: impl Into<String>, color: LineColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    /// The sentinel line denoting a walking connection.
    ///
    /// Edges on this line represent walking between nearby stations,
    /// not a scheduled vehicle run.
    pub fn walking() -> Self {
        Self::new(WALKING_NAME, LineColor::WALKING)
    }

    /// Returns the line's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the line's display color.
    pub fn color(&self) -> LineColor {
        self.color
    }

    /// Whether this is the walking sentinel.
    pub fn is_walking(&self) -> bool {
        self.name == WALKING_NAME
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Line {}

impl Hash for Line {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
