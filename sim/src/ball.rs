//! Ground-truth ball physics.
//!
//! The ball moves with constant horizontal speed and constant downward
//! acceleration, reflecting elastically off the top and bottom walls. Each
//! step integrates velocity first, then position.
//!
//! Walls and the exit rule use the collision radius; the visible disk has half
//! of it, so the drawn ball keeps clear of the walls when it bounces.

use serde::{Deserialize, Serialize};

/// The true ball state stepped by the game loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    /// Horizontal speed (px/s)
    pub vx: f64,
    /// Vertical speed (px/s, positive = down)
    pub vy: f64,
    /// Collision radius (px)
    pub radius: f64,
    /// Every position after each step (oldest first)
    pub history: Vec<(f64, f64)>,
}

impl Ball {
    pub fn new(radius: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius,
            history: Vec::new(),
        }
    }

    /// Radius of the disk as drawn on screen.
    pub fn drawn_radius(&self) -> f64 {
        self.radius / 2.0
    }

    /// Bounce off the horizontal walls of a field `height` pixels tall.
    pub fn check_wall_collision(&mut self, height: f64) {
        if self.y <= self.radius {
            self.vy = self.vy.abs();
        } else if self.y >= height - self.radius {
            self.vy = -self.vy.abs();
        }
    }

    /// Advance by `dt` seconds under vertical acceleration `acc` (px/s²).
    pub fn step(&mut self, acc: f64, dt: f64, height: f64) {
        self.check_wall_collision(height);
        self.vy += acc * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.history.push((self.x, self.y));
    }

    /// True once the ball has fully passed the right border.
    pub fn has_left(&self, width: f64) -> bool {
        self.x >= width + self.radius / 2.0
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}
