//! Fundamental types used across the entire workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// One detected ball, in tracked-region pixel coordinates.
///
/// Observations are appended in capture order and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Circle centre, x (pixels, grows to the right)
    pub x: f64,
    /// Circle centre, y (pixels, grows downwards)
    pub y: f64,
    /// Detected circle radius (pixels)
    pub radius: f64,
}

impl Observation {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// Half-open index range `[start, end)` into an observation sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the items covered by this segment.
    ///
    /// Panics if the segment does not lie inside `items`, like slice indexing.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.start..self.end]
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Window geometry the agent reasons about (pixels).
///
/// The tracked region spans the full window height, so `height` is both the
/// window height and the vertical extent used for bounce detection and
/// reflection. `width` is the full window width; the crossing line is
/// expressed relative to it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// x-coordinate (tracked frame) at which a ball of `radius` is considered
    /// to have reached the paddle line.
    pub fn crossing_line(&self, radius: f64) -> f64 {
        2.0 * self.width / 3.0 - radius
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
        }
    }
}

/// A simulated `(x, y)` position.
pub type PathPoint = (f64, f64);
