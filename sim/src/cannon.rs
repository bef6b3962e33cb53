//! Cannon on the left wall: aims, then launches the ball from its muzzle.

use crate::ball::Ball;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Launch parameters for one episode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Barrel angle in degrees; negative aims up
    pub angle_deg: f64,
    /// Muzzle speed (px/s)
    pub speed: f64,
}

impl Shot {
    /// Uniform integer angle in [-30, 30] degrees and speed in [20, 100] px/s.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            angle_deg: rng.gen_range(-30..=30) as f64,
            speed: rng.gen_range(20..=100) as f64,
        }
    }
}

/// Barrel geometry. The pivot sits on the left wall at mid height.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cannon {
    pub angle_deg: f64,
    /// Barrel length (px)
    pub length: f64,
    /// Barrel thickness (px)
    pub thickness: f64,
}

impl Default for Cannon {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            length: 40.0,
            thickness: 20.0,
        }
    }
}

impl Cannon {
    pub fn aim(&mut self, angle_deg: f64) {
        self.angle_deg = angle_deg;
    }

    /// Centre of the barrel's open end for a field `field_height` pixels tall.
    pub fn muzzle(&self, field_height: f64) -> (f64, f64) {
        let (sin, cos) = self.angle_deg.to_radians().sin_cos();
        (
            self.thickness / 2.0 + self.length * cos,
            field_height / 2.0 + self.length * sin,
        )
    }

    /// Place `ball` at the muzzle with velocity `speed` along the barrel.
    pub fn fire(&self, ball: &mut Ball, speed: f64, field_height: f64) {
        let (x, y) = self.muzzle(field_height);
        let (sin, cos) = self.angle_deg.to_radians().sin_cos();
        ball.x = x;
        ball.y = y;
        ball.vx = speed * cos;
        ball.vy = speed * sin;
        ball.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn level_shot_leaves_from_mid_height() {
        let cannon = Cannon::default();
        let mut ball = Ball::new(10.0);
        cannon.fire(&mut ball, 80.0, 600.0);
        assert_abs_diff_eq!(ball.x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ball.y, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ball.vx, 80.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ball.vy, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_angle_aims_up() {
        let mut cannon = Cannon::default();
        cannon.aim(-30.0);
        let mut ball = Ball::new(10.0);
        cannon.fire(&mut ball, 100.0, 600.0);
        assert!(ball.vy < 0.0);
        assert!(ball.y < 300.0);
        assert_abs_diff_eq!(ball.vx, 100.0 * 30f64.to_radians().cos(), epsilon = 1e-9);
    }

    #[test]
    fn random_shots_stay_in_range_and_repeat_per_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let shot = Shot::random(&mut a);
            assert!((-30.0..=30.0).contains(&shot.angle_deg));
            assert!((20.0..=100.0).contains(&shot.speed));
            assert_eq!(shot, Shot::random(&mut b));
        }
    }
}
