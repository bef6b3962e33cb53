//! Observation buffer: per-episode accumulation of detections and frames.
//!
//! # Lifecycle
//! `Waiting → Active → Stopped`, strictly forward.
//! - **Waiting**: no detection yet. Misses are ignored, however many.
//! - **Active**: the first detection arrived. Every further detection is
//!   appended together with its source frame.
//! - **Stopped**: the first miss after activation. The ball-radius estimate is
//!   finalised here (mean of all recorded radii) and the sequence is frozen.
//!
//! Only [`ObservationBuffer::reset`] returns the buffer to `Waiting`.

use crate::types::Observation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tracking phase of the current episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingStatus {
    /// Ball has not entered the tracked region yet
    Waiting,
    /// Ball is inside the region and being recorded
    Active,
    /// Ball left the region; the sequence is frozen
    Stopped,
}

/// Accumulates observations (and the frames they came from) for one episode.
///
/// `F` is the frame type; the core never looks inside it.
#[derive(Clone, Debug)]
pub struct ObservationBuffer<F = ()> {
    observations: Vec<Observation>,
    frames: Vec<F>,
    status: TrackingStatus,
    radius: Option<f64>,
}

impl<F> Default for ObservationBuffer<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> ObservationBuffer<F> {
    pub fn new() -> Self {
        Self {
            observations: Vec::new(),
            frames: Vec::new(),
            status: TrackingStatus::Waiting,
            radius: None,
        }
    }

    /// Feed the detector result for one captured frame.
    ///
    /// Returns the status after the frame has been accounted for.
    pub fn observe(&mut self, candidate: Option<Observation>, frame: F) -> TrackingStatus {
        match (self.status, candidate) {
            (TrackingStatus::Stopped, _) => {}
            (status, Some(obs)) => {
                self.observations.push(obs);
                self.frames.push(frame);
                if status == TrackingStatus::Waiting {
                    self.status = TrackingStatus::Active;
                    debug!(x = obs.x, y = obs.y, r = obs.radius, "ball entered tracked region");
                }
            }
            (TrackingStatus::Active, None) => self.stop(),
            (TrackingStatus::Waiting, None) => {}
        }
        self.status
    }

    /// Force the stop transition if tracking is active.
    ///
    /// Used when capture ends for an external reason (the ball left the
    /// window) while the buffer is still `Active`. No-op otherwise.
    pub fn finish(&mut self) -> TrackingStatus {
        if self.status == TrackingStatus::Active {
            self.stop();
        }
        self.status
    }

    fn stop(&mut self) {
        let n = self.observations.len();
        let mean = self.observations.iter().map(|o| o.radius).sum::<f64>() / n as f64;
        self.radius = Some(mean);
        self.status = TrackingStatus::Stopped;
        debug!(observations = n, radius = mean, "tracking stopped");
    }

    /// Drop everything and go back to `Waiting`.
    pub fn reset(&mut self) {
        self.observations.clear();
        self.frames.clear();
        self.status = TrackingStatus::Waiting;
        self.radius = None;
    }

    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    /// Mean detected radius. `Some` only once the buffer has stopped.
    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn waits_through_leading_misses() {
        let mut buf: ObservationBuffer = ObservationBuffer::new();
        for _ in 0..50 {
            assert_eq!(buf.observe(None, ()), TrackingStatus::Waiting);
        }
        assert!(buf.is_empty());
        assert_eq!(buf.radius(), None);
    }

    #[test]
    fn first_detection_activates() {
        let mut buf: ObservationBuffer = ObservationBuffer::new();
        buf.observe(None, ());
        let status = buf.observe(Some(Observation::new(1.0, 2.0, 10.0)), ());
        assert_eq!(status, TrackingStatus::Active);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.frames().len(), 1);
    }

    #[test]
    fn radius_is_mean_of_recorded_radii() {
        let mut buf: ObservationBuffer = ObservationBuffer::new();
        for r in [10.0, 12.0, 14.0] {
            buf.observe(Some(Observation::new(0.0, 0.0, r)), ());
        }
        assert_eq!(buf.radius(), None, "radius is only finalised on stop");
        assert_eq!(buf.observe(None, ()), TrackingStatus::Stopped);
        assert_abs_diff_eq!(buf.radius().unwrap(), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn frozen_after_stop() {
        let mut buf: ObservationBuffer<u32> = ObservationBuffer::new();
        buf.observe(Some(Observation::new(0.0, 0.0, 8.0)), 1);
        buf.observe(None, 2);
        let status = buf.observe(Some(Observation::new(5.0, 5.0, 30.0)), 3);
        assert_eq!(status, TrackingStatus::Stopped);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.frames(), &[1]);
        assert_abs_diff_eq!(buf.radius().unwrap(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn finish_only_stops_active_buffers() {
        let mut buf: ObservationBuffer = ObservationBuffer::new();
        assert_eq!(buf.finish(), TrackingStatus::Waiting);
        buf.observe(Some(Observation::new(0.0, 0.0, 4.0)), ());
        assert_eq!(buf.finish(), TrackingStatus::Stopped);
        assert_abs_diff_eq!(buf.radius().unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn reset_returns_to_waiting() {
        let mut buf: ObservationBuffer = ObservationBuffer::new();
        buf.observe(Some(Observation::new(0.0, 0.0, 4.0)), ());
        buf.observe(None, ());
        buf.reset();
        assert_eq!(buf.status(), TrackingStatus::Waiting);
        assert!(buf.is_empty());
        assert_eq!(buf.radius(), None);
    }
}
