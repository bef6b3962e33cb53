//! Forward simulation of the fitted trajectory up to the crossing line.
//!
//! # Tick
//! 1. Reflect off the walls *before* integrating:
//!    `y <= r` ⇒ `vy = |vy|`, otherwise `y >= height − r` ⇒ `vy = −|vy|`.
//! 2. Integrate: `vy += acc; x += vx; y += vy`.
//! 3. Record `(x, y)`.
//!
//! Ticks repeat while `x < crossing_line`. With `vx > 0` x grows strictly, so
//! the loop ends after at most `ceil((crossing − x0) / vx)` ticks. A `vx` too
//! small to change `x` in floating point is rejected up front.

use crate::{
    error::{InterceptError, Result},
    fit::TrajectoryModel,
    types::{Bounds, PathPoint},
};
use serde::{Deserialize, Serialize};

/// Mutable state of one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Every position visited after the start point
    pub path: Vec<PathPoint>,
}

impl SimulationState {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            path: Vec::new(),
        }
    }

    pub fn from_model(model: &TrajectoryModel) -> Self {
        Self::new(model.x0, model.y0, model.vx, model.vy0)
    }
}

/// Result of running the simulator to the crossing line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub final_x: f64,
    /// Predicted intercept height handed to the paddle controller
    pub final_y: f64,
    pub ticks: usize,
    pub path: Vec<PathPoint>,
}

/// Constant-acceleration ball model with wall reflection.
#[derive(Clone, Copy, Debug)]
pub struct ForwardSimulator {
    pub bounds: Bounds,
    /// Estimated ball radius
    pub radius: f64,
    /// Vertical acceleration per tick
    pub acceleration: f64,
}

impl ForwardSimulator {
    pub fn new(bounds: Bounds, radius: f64, acceleration: f64) -> Self {
        Self {
            bounds,
            radius,
            acceleration,
        }
    }

    pub fn crossing_line(&self) -> f64 {
        self.bounds.crossing_line(self.radius)
    }

    pub fn has_crossed(&self, state: &SimulationState) -> bool {
        state.x >= self.crossing_line()
    }

    /// Wall reflection applied at the start of every tick.
    pub fn reflect(&self, state: &mut SimulationState) {
        if state.y <= self.radius {
            state.vy = state.vy.abs();
        } else if state.y >= self.bounds.height - self.radius {
            state.vy = -state.vy.abs();
        }
    }

    /// Advance one tick and record the new position.
    pub fn step(&self, state: &mut SimulationState) {
        self.reflect(state);
        state.vy += self.acceleration;
        state.x += state.vx;
        state.y += state.vy;
        state.path.push((state.x, state.y));
    }

    /// Run until the crossing line is reached.
    pub fn run(&self, mut state: SimulationState) -> Result<SimulationResult> {
        if !(state.vx > 0.0 && state.vx.is_finite() && state.x.is_finite()) {
            return Err(InterceptError::NonAdvancingSimulation { vx: state.vx });
        }
        // vx lost to rounding at the start or at the line would stall x
        let line = self.crossing_line();
        if !self.has_crossed(&state) && (state.x + state.vx == state.x || line + state.vx == line) {
            return Err(InterceptError::NonAdvancingSimulation { vx: state.vx });
        }

        while !self.has_crossed(&state) {
            self.step(&mut state);
        }

        Ok(SimulationResult {
            final_x: state.x,
            final_y: state.y,
            ticks: state.path.len(),
            path: state.path,
        })
    }
}

/// Simulate a fitted model forward to the crossing line.
pub fn simulate(model: &TrajectoryModel, bounds: Bounds, radius: f64) -> Result<SimulationResult> {
    ForwardSimulator::new(bounds, radius, model.acceleration).run(SimulationState::from_model(model))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fit_trajectory;
    use crate::types::Observation;
    use approx::assert_abs_diff_eq;

    fn sim(acc: f64) -> ForwardSimulator {
        ForwardSimulator::new(Bounds::new(1000.0, 600.0), 10.0, acc)
    }

    #[test]
    fn reflects_off_top_wall() {
        let s = sim(0.0);
        let mut state = SimulationState::new(0.0, 10.0, 1.0, -3.0);
        s.reflect(&mut state);
        assert_abs_diff_eq!(state.vy, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn reflects_off_bottom_wall() {
        let s = sim(0.0);
        let mut state = SimulationState::new(0.0, 590.0, 1.0, 3.0);
        s.reflect(&mut state);
        assert_abs_diff_eq!(state.vy, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn reflection_happens_before_integration() {
        let s = sim(0.5);
        let mut state = SimulationState::new(0.0, 5.0, 1.0, -2.0);
        s.step(&mut state);
        // vy forced to +2 then accelerated to 2.5
        assert_abs_diff_eq!(state.vy, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(state.y, 7.5, epsilon = 1e-12);
        assert_eq!(state.path, vec![(1.0, 7.5)]);
    }

    #[test]
    fn terminates_within_tick_bound() {
        for &(x0, vx) in &[(0.0, 1.0), (3.0, 1.0), (100.5, 0.7), (-50.0, 13.0), (640.0, 100.0)] {
            let s = sim(0.01);
            let crossing = s.crossing_line();
            let res = s.run(SimulationState::new(x0, 300.0, vx, -1.0)).unwrap();
            let bound = ((crossing - x0) / vx).ceil() as usize;
            assert!(res.ticks <= bound, "x0={x0} vx={vx}: {} > {bound}", res.ticks);
            assert!(res.final_x >= crossing);
        }
    }

    #[test]
    fn already_past_line_yields_empty_path() {
        let res = sim(1.0).run(SimulationState::new(700.0, 300.0, 1.0, 0.0)).unwrap();
        assert_eq!(res.ticks, 0);
        assert!(res.path.is_empty());
        assert_abs_diff_eq!(res.final_y, 300.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_non_advancing_velocity() {
        let err = sim(0.0).run(SimulationState::new(0.0, 300.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, InterceptError::NonAdvancingSimulation { vx: 0.0 });
        assert!(sim(0.0).run(SimulationState::new(0.0, 300.0, -1.0, 0.0)).is_err());
    }

    #[test]
    fn rejects_step_lost_to_rounding() {
        let err = sim(0.0).run(SimulationState::new(-1e17, 300.0, 1.0, 0.0)).unwrap_err();
        assert_eq!(err, InterceptError::NonAdvancingSimulation { vx: 1.0 });
        assert!(sim(0.0).run(SimulationState::new(0.0, 300.0, 1e-14, 0.0)).is_err());
    }

    #[test]
    fn bounces_between_walls() {
        let res = sim(0.0).run(SimulationState::new(0.0, 300.0, 1.0, 20.0)).unwrap();
        assert!(res.path.iter().all(|&(_, y)| (0.0..=600.0).contains(&y)));
        // turned around at the bottom wall after 15 ticks
        assert_abs_diff_eq!(res.path[14].1, 600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(res.path[15].1, 580.0, epsilon = 1e-9);
    }

    #[test]
    fn end_to_end_from_fit_is_deterministic() {
        let obs = vec![
            Observation::new(0.0, 100.0, 10.0),
            Observation::new(1.0, 90.0, 10.0),
            Observation::new(2.0, 82.0, 10.0),
            Observation::new(3.0, 76.0, 10.0),
        ];
        let model = fit_trajectory(&obs).unwrap();
        let bounds = Bounds::new(1000.0, 600.0);
        let a = simulate(&model, bounds, 10.0).unwrap();
        let b = simulate(&model, bounds, 10.0).unwrap();
        assert_eq!(a, b);
        // x goes 3 → 657 in unit steps; 657 is the first integer >= 656.67
        assert_eq!(a.ticks, 654);
        assert_abs_diff_eq!(a.final_x, 657.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.final_y, 726.0, epsilon = 1e-6);
        let exact = sim(2.0).run(SimulationState::new(3.0, 76.0, 1.0, -4.0)).unwrap();
        assert_eq!(exact.final_y, 726.0);
        assert_eq!(exact.path[0], (4.0, 74.0));
    }
}
