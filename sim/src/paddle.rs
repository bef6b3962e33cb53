//! Paddle on the right wall. Owns its travel limits.

use serde::{Deserialize, Serialize};
use trajectory_core::controller::PaddleDrive;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paddle {
    /// Centre height (px)
    pub y: f64,
    /// Thickness along x (px)
    pub width: f64,
    /// Extent along y (px)
    pub height: f64,
    field_height: f64,
}

impl Paddle {
    /// A paddle centred vertically in a field `field_height` pixels tall.
    pub fn new(field_height: f64) -> Self {
        Self {
            y: field_height / 2.0,
            width: 15.0,
            height: 40.0,
            field_height,
        }
    }

    pub fn min_y(&self) -> f64 {
        self.height / 2.0
    }

    pub fn max_y(&self) -> f64 {
        self.field_height - self.height / 2.0
    }

    /// True if a ball of `radius` at height `y` touches the paddle face.
    pub fn covers(&self, y: f64, radius: f64) -> bool {
        (y - self.y).abs() <= self.height / 2.0 + radius
    }
}

impl PaddleDrive for Paddle {
    fn position(&self) -> f64 {
        self.y
    }

    fn move_by(&mut self, delta: f64) {
        self.y = (self.y + delta).clamp(self.min_y(), self.max_y());
    }
}
