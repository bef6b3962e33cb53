//! Controller bridge: turns a predicted intercept height into paddle moves.
//!
//! The distance to travel is split into `steps` equal increments, issued one
//! per `interval`. The paddle owns its travel limits and clamps each move.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Anything the bridge can steer vertically.
pub trait PaddleDrive {
    /// Current paddle centre (pixels).
    fn position(&self) -> f64;
    /// Move by `delta` pixels; the implementation clamps to its own bounds.
    fn move_by(&mut self, delta: f64);
}

/// Configuration for paddle control.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Number of increments per hand-off
    pub steps: usize,
    /// Pause between increments
    pub interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            interval: Duration::from_millis(50),
        }
    }
}

/// Equal-increment move schedule from the paddle's position to a target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovePlan {
    pub delta: f64,
    pub steps: usize,
}

impl MovePlan {
    pub fn new(pad_y: f64, target_y: f64, steps: usize) -> Self {
        let delta = if steps == 0 {
            0.0
        } else {
            (target_y - pad_y) / steps as f64
        };
        Self { delta, steps }
    }

    /// The move commands, in order.
    pub fn commands(&self) -> impl Iterator<Item = f64> {
        std::iter::repeat(self.delta).take(self.steps)
    }
}

/// Issue every command of `plan` to `paddle`, sleeping `interval` after each.
pub async fn drive_paddle<P: PaddleDrive + ?Sized>(paddle: &mut P, plan: MovePlan, interval: Duration) {
    debug!(delta = plan.delta, steps = plan.steps, "driving paddle");
    for delta in plan.commands() {
        paddle.move_by(delta);
        tokio::time::sleep(interval).await;
    }
}

/// Plan from the paddle's current position and drive it to `target_y`.
pub async fn intercept<P: PaddleDrive + ?Sized>(paddle: &mut P, target_y: f64, config: &ControllerConfig) -> MovePlan {
    let plan = MovePlan::new(paddle.position(), target_y, config.steps);
    drive_paddle(paddle, plan, config.interval).await;
    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
