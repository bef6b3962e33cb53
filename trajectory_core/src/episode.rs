//! Episode: one shot, from the first capture to the paddle hand-off.
//!
//! # Processing steps once tracking has stopped
//! 1. Read the finalised radius estimate from the buffer
//! 2. Select the longest bounce-free segment
//! 3. Fit the parabola and derive the start state
//! 4. Simulate forward to the crossing line
//!
//! An `Episode` is built fresh for every shot and dropped afterwards; nothing
//! carries over between shots.

use crate::{
    buffer::{ObservationBuffer, TrackingStatus},
    error::{InterceptError, Result},
    fit::{fit_trajectory, TrajectoryModel},
    segment::select_segment,
    simulate::{simulate, SimulationResult},
    types::{Bounds, Observation, Segment},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything the estimation stages produced for one episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub radius: f64,
    pub segment: Segment,
    pub model: TrajectoryModel,
    pub simulation: SimulationResult,
}

impl EpisodeOutcome {
    /// Predicted intercept height (tracked-frame pixels).
    pub fn target_y(&self) -> f64 {
        self.simulation.final_y
    }
}

/// Per-shot tracking state.
#[derive(Clone, Debug)]
pub struct Episode<F = ()> {
    pub id: u64,
    pub bounds: Bounds,
    buffer: ObservationBuffer<F>,
}

impl<F> Episode<F> {
    pub fn new(id: u64, bounds: Bounds) -> Self {
        Self {
            id,
            bounds,
            buffer: ObservationBuffer::new(),
        }
    }

    /// Feed one capture result. See [`ObservationBuffer::observe`].
    pub fn observe(&mut self, candidate: Option<Observation>, frame: F) -> TrackingStatus {
        self.buffer.observe(candidate, frame)
    }

    /// Stop tracking early (capture ended while the ball was still visible).
    pub fn finish(&mut self) -> TrackingStatus {
        self.buffer.finish()
    }

    pub fn status(&self) -> TrackingStatus {
        self.buffer.status()
    }

    pub fn buffer(&self) -> &ObservationBuffer<F> {
        &self.buffer
    }

    pub fn observations(&self) -> &[Observation] {
        self.buffer.observations()
    }

    /// Run segment selection, fit and simulation over the frozen sequence.
    pub fn estimate(&self) -> Result<EpisodeOutcome> {
        let observations = self.buffer.observations();
        let radius = self.buffer.radius().ok_or(InterceptError::InsufficientData)?;

        let segment = select_segment(observations, radius, self.bounds.height)?;
        debug!(episode = self.id, %segment, total = observations.len(), "segment selected");

        let model = fit_trajectory(segment.slice(observations))?;
        debug!(
            episode = self.id,
            a = model.parabola.a,
            b = model.parabola.b,
            c = model.parabola.c,
            "trajectory fitted"
        );

        let simulation = simulate(&model, self.bounds, radius)?;
        info!(
            episode = self.id,
            target_y = simulation.final_y,
            ticks = simulation.ticks,
            "intercept predicted"
        );

        Ok(EpisodeOutcome {
            radius,
            segment,
            model,
            simulation,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
