//! Intercept metrics: prediction error at the crossing line, hit rate, aborts.

use serde::{Deserialize, Serialize};

/// Accumulated statistics over a run of episodes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InterceptMetrics {
    /// Episodes that produced a prediction
    pub predicted: u64,
    /// Episodes aborted by an estimation error
    pub aborted: u64,
    /// Predicted episodes where the true crossing height is known
    pub n_compared: u64,
    /// Sum of squared (predicted − actual) crossing heights
    pub sum_sq_err: f64,
    /// Largest absolute crossing-height error seen
    pub max_abs_err: f64,
    /// Episodes where the paddle covered the ball at the crossing line
    pub hits: u64,
    /// Episodes where the ball reached the paddle line
    pub crossings: u64,
}

impl InterceptMetrics {
    /// Record an episode that produced a prediction.
    ///
    /// `actual_y` is the ball's true height at the crossing line, when the
    /// ball got there.
    pub fn record_prediction(&mut self, predicted_y: f64, actual_y: Option<f64>) {
        self.predicted += 1;
        if let Some(actual) = actual_y {
            let err = predicted_y - actual;
            self.n_compared += 1;
            self.sum_sq_err += err * err;
            self.max_abs_err = self.max_abs_err.max(err.abs());
        }
    }

    pub fn record_abort(&mut self) {
        self.aborted += 1;
    }

    /// Record whether the paddle was in place when the ball reached it.
    pub fn record_crossing(&mut self, hit: bool) {
        self.crossings += 1;
        if hit {
            self.hits += 1;
        }
    }

    /// Root-mean-square crossing-height error (pixels).
    pub fn rmse(&self) -> f64 {
        if self.n_compared == 0 {
            return 0.0;
        }
        (self.sum_sq_err / self.n_compared as f64).sqrt()
    }

    /// Hits / crossings.
    pub fn hit_rate(&self) -> f64 {
        if self.crossings == 0 { 0.0 } else { self.hits as f64 / self.crossings as f64 }
    }

    pub fn episodes(&self) -> u64 {
        self.predicted + self.aborted
    }
}
