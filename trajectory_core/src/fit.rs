//! Least-squares parabola fit and trajectory model extraction.
//!
//! # Model
//! The ball's path inside one bounce-free segment is a parabola in image
//! space: `y = a·x² + b·x + c`. The coefficients minimise the sum of squared
//! residuals over the design matrix rows `[xᵢ², xᵢ, 1]`.
//!
//! ## Solver
//! The overdetermined system is solved through an SVD, which yields the
//! minimum-norm least-squares solution when the system is mildly rank
//! deficient. Fewer than three distinct x-values cannot determine a parabola
//! and are rejected up front.
//!
//! ## Derived motion
//! The simulator advances x by one unit per tick, so the fit doubles as the
//! motion model:
//! - `acceleration = 2a` (second derivative / second difference)
//! - `x0` = x of the last fitted point, `y0 = f(x0)`
//! - `vx = 1`, `vy0 = f(x0 + vx) − f(x0)`

use crate::{
    error::{InterceptError, Result},
    types::Observation,
};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Horizontal advance per simulation tick.
pub const UNIT_VX: f64 = 1.0;

/// Coefficients of `y = a·x² + b·x + c`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parabola {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Parabola {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    pub fn second_derivative(&self) -> f64 {
        2.0 * self.a
    }
}

/// Motion state extracted from one segment's fit. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryModel {
    pub parabola: Parabola,
    /// Vertical acceleration per tick (`2a`)
    pub acceleration: f64,
    pub x0: f64,
    pub y0: f64,
    /// Horizontal step per tick (always [`UNIT_VX`])
    pub vx: f64,
    /// Initial vertical velocity per tick
    pub vy0: f64,
}

impl TrajectoryModel {
    /// Derive the start state at the last point of the fitted segment.
    pub fn from_parabola(parabola: Parabola, last_x: f64) -> Self {
        let x0 = last_x;
        let vx = UNIT_VX;
        let y0 = parabola.value_at(x0);
        let vy0 = parabola.value_at(x0 + vx) - y0;
        Self {
            parabola,
            acceleration: parabola.second_derivative(),
            x0,
            y0,
            vx,
            vy0,
        }
    }
}

fn distinct_count(xs: &[f64]) -> usize {
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted.len()
}

/// Ordinary least-squares fit of `y = a·x² + b·x + c` over the observation centres.
pub fn fit_parabola(points: &[Observation]) -> Result<Parabola> {
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let distinct = distinct_count(&xs);
    if distinct < 3 {
        return Err(InterceptError::UnderdeterminedFit { distinct });
    }

    let n = points.len();
    let design = DMatrix::from_fn(n, 3, |r, c| match c {
        0 => xs[r] * xs[r],
        1 => xs[r],
        _ => 1.0,
    });
    let ys = DVector::from_iterator(n, points.iter().map(|p| p.y));

    let svd = design.svd(true, true);
    let max_sv = svd.singular_values.max();
    let eps = f64::EPSILON * n.max(3) as f64 * max_sv;
    if svd.rank(eps) == 0 {
        return Err(InterceptError::UnderdeterminedFit { distinct });
    }

    let coeffs = svd
        .solve(&ys, eps)
        .map_err(|_| InterceptError::UnderdeterminedFit { distinct })?;
    if coeffs.iter().any(|v| !v.is_finite()) {
        return Err(InterceptError::UnderdeterminedFit { distinct });
    }

    Ok(Parabola::new(coeffs[0], coeffs[1], coeffs[2]))
}

/// Fit a segment and derive the simulator start state from it.
pub fn fit_trajectory(points: &[Observation]) -> Result<TrajectoryModel> {
    let parabola = fit_parabola(points)?;
    // fit_parabola rejected anything with fewer than three points
    let last_x = points.last().map(|p| p.x).unwrap_or_default();
    Ok(TrajectoryModel::from_parabola(parabola, last_x))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample(f: impl Fn(f64) -> f64, xs: &[f64]) -> Vec<Observation> {
        xs.iter().map(|&x| Observation::new(x, f(x), 10.0)).collect()
    }

    #[test]
    fn recovers_exact_parabola() {
        let pts = sample(|x| 2.0 * x * x + 3.0 * x + 1.0, &[-2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        let p = fit_parabola(&pts).unwrap();
        assert_abs_diff_eq!(p.a, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.b, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.c, 1.0, epsilon = 1e-9);

        let model = fit_trajectory(&pts).unwrap();
        assert_abs_diff_eq!(model.acceleration, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn derives_start_state_from_last_point() {
        let pts = vec![
            Observation::new(0.0, 100.0, 10.0),
            Observation::new(1.0, 90.0, 10.0),
            Observation::new(2.0, 82.0, 10.0),
            Observation::new(3.0, 76.0, 10.0),
        ];
        let m = fit_trajectory(&pts).unwrap();
        // points lie on y = x² − 11x + 100
        assert_abs_diff_eq!(m.parabola.a, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.parabola.b, -11.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.parabola.c, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.acceleration, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.x0, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.y0, 76.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.vx, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.vy0, -4.0, epsilon = 1e-9);
    }

    #[test]
    fn noisy_points_fit_close_to_truth() {
        let noise = [0.4, -0.3, 0.1, -0.5, 0.2, 0.3, -0.1, -0.2, 0.5, -0.4];
        let pts: Vec<Observation> = noise
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let x = 10.0 * i as f64;
                Observation::new(x, 0.01 * x * x - 2.0 * x + 300.0 + n, 10.0)
            })
            .collect();
        let p = fit_parabola(&pts).unwrap();
        assert_abs_diff_eq!(p.a, 0.01, epsilon = 1e-3);
        assert_abs_diff_eq!(p.b, -2.0, epsilon = 0.1);
    }

    #[test]
    fn two_distinct_x_is_underdetermined() {
        let pts = vec![
            Observation::new(1.0, 5.0, 10.0),
            Observation::new(1.0, 6.0, 10.0),
            Observation::new(2.0, 7.0, 10.0),
            Observation::new(2.0, 8.0, 10.0),
        ];
        assert_eq!(
            fit_parabola(&pts),
            Err(InterceptError::UnderdeterminedFit { distinct: 2 })
        );
    }

    #[test]
    fn fit_is_deterministic() {
        let pts = sample(|x| 0.5 * x * x - x, &[0.0, 2.0, 3.0, 7.0, 11.0]);
        assert_eq!(fit_parabola(&pts).unwrap(), fit_parabola(&pts).unwrap());
    }
}
