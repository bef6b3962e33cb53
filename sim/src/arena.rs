//! Arena: the headless game world and its software screen capture.
//!
//! # Geometry
//! - window `width × height`, origin top-left, y grows downwards
//! - cannon pivot on the left wall at mid height
//! - paddle on the right wall
//! - tracked region: the central third of the window, full height
//!
//! The paddle line sits where the agent's forward simulation stops, mapped
//! back into window coordinates, so predicted and true crossings are measured
//! at the same place.

use crate::{ball::Ball, cannon::{Cannon, Shot}, paddle::Paddle};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use tracing::debug;
use trajectory_core::{controller::PaddleDrive, types::Bounds};
use vision::source::FrameSource;

/// World configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Window width (pixels)
    pub width: u32,
    /// Window height (pixels)
    pub height: u32,
    /// Downward acceleration (px/s²)
    pub gravity: f64,
    /// Physics step (s)
    pub time_step: f64,
    /// Ball collision radius; the drawn disk has half of it
    pub ball_radius: f64,
    pub background: [u8; 3],
    pub ball_color: [u8; 3],
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            gravity: 10.0,
            time_step: 0.1,
            ball_radius: 20.0,
            background: [0x00, 0x33, 0x00],
            ball_color: [0xff, 0xff, 0xff],
        }
    }
}

impl ArenaConfig {
    /// Window extent as seen by the trajectory estimator.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width as f64, self.height as f64)
    }

    /// Central third of the window, full height.
    pub fn tracked_region(&self) -> Region {
        let w = self.width as f64;
        let x0 = (w / 3.0).round() as u32;
        let x1 = (2.0 * w / 3.0).round() as u32;
        Region {
            x0,
            y0: 0,
            width: x1 - x0,
            height: self.height,
        }
    }
}

/// Axis-aligned pixel rectangle inside the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x0: u32,
    pub y0: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Window x of a tracked-frame x.
    pub fn to_window_x(&self, x: f64) -> f64 {
        self.x0 as f64 + x
    }

    /// Window y of a tracked-frame y.
    pub fn to_window_y(&self, y: f64) -> f64 {
        self.y0 as f64 + y
    }
}

/// The ball reaching the paddle line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    /// Ball centre height at the paddle line (window pixels)
    pub ball_y: f64,
    /// Paddle centre when the ball arrived
    pub paddle_y: f64,
    pub hit: bool,
}

/// Cannon, ball and paddle for one shot.
#[derive(Clone, Debug)]
pub struct Arena {
    pub config: ArenaConfig,
    pub ball: Ball,
    pub cannon: Cannon,
    pub paddle: Paddle,
    region: Region,
    crossing: Option<Crossing>,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        let region = config.tracked_region();
        let ball = Ball::new(config.ball_radius);
        let paddle = Paddle::new(config.height as f64);
        Self {
            config,
            ball,
            cannon: Cannon::default(),
            paddle,
            region,
            crossing: None,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn crossing(&self) -> Option<Crossing> {
        self.crossing
    }

    /// Window x at which the ball meets the paddle.
    pub fn paddle_line(&self) -> f64 {
        self.region
            .to_window_x(self.config.bounds().crossing_line(self.ball.drawn_radius()))
    }

    /// Aim the cannon and fire a fresh ball.
    pub fn launch(&mut self, shot: &Shot) {
        self.cannon.aim(shot.angle_deg);
        self.cannon
            .fire(&mut self.ball, shot.speed, self.config.height as f64);
        self.crossing = None;
        debug!(angle = shot.angle_deg, speed = shot.speed, "ball launched");
    }

    /// One physics step. Records the crossing the first time the ball
    /// passes the paddle line.
    pub fn step(&mut self) {
        let (px, py) = self.ball.position();
        self.ball.step(
            self.config.gravity,
            self.config.time_step,
            self.config.height as f64,
        );

        let line = self.paddle_line();
        if self.crossing.is_none() && px < line && self.ball.x >= line {
            let t = (line - px) / (self.ball.x - px);
            let ball_y = py + t * (self.ball.y - py);
            let hit = self.paddle.covers(ball_y, self.ball.drawn_radius());
            debug!(ball_y, paddle_y = self.paddle.y, hit, "ball reached paddle line");
            self.crossing = Some(Crossing {
                ball_y,
                paddle_y: self.paddle.y,
                hit,
            });
        }
    }

    /// True once the ball has left the window on the right.
    pub fn is_over(&self) -> bool {
        self.ball.has_left(self.config.width as f64)
    }

    /// Rasterise the tracked region: background plus the ball disk.
    ///
    /// A pixel belongs to the ball when its centre lies inside the circle.
    pub fn render_region(&self) -> RgbImage {
        let region = self.region;
        let mut frame = RgbImage::from_pixel(region.width, region.height, Rgb(self.config.background));

        let r = self.ball.drawn_radius();
        let cx = self.ball.x - region.x0 as f64;
        let cy = self.ball.y - region.y0 as f64;
        let lo_x = (cx - r).floor().max(0.0) as u32;
        let lo_y = (cy - r).floor().max(0.0) as u32;
        let hi_x = ((cx + r).ceil().max(0.0) as u32).min(region.width);
        let hi_y = ((cy + r).ceil().max(0.0) as u32).min(region.height);

        for y in lo_y..hi_y {
            for x in lo_x..hi_x {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    frame.put_pixel(x, y, Rgb(self.config.ball_color));
                }
            }
        }
        frame
    }
}

// ---------------------------------------------------------------------------
// Shared-world views
// ---------------------------------------------------------------------------

/// Screen capture of the tracked region of a shared arena.
pub struct ScreenRegion<'a>(pub &'a RefCell<Arena>);

impl FrameSource for ScreenRegion<'_> {
    fn capture(&self) -> RgbImage {
        self.0.borrow().render_region()
    }
}

/// Paddle of a shared arena. Each call takes a short borrow.
pub struct PaddleHandle<'a>(pub &'a RefCell<Arena>);

impl PaddleDrive for PaddleHandle<'_> {
    fn position(&self) -> f64 {
        self.0.borrow().paddle.y
    }

    fn move_by(&mut self, delta: f64) {
        self.0.borrow_mut().paddle.move_by(delta);
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
    fn tracked_region_is_central_third() {
        let region = ArenaConfig::default().tracked_region();
        assert_eq!(region, Region { x0: 333, y0: 0, width: 334, height: 600 });
    }

    #[test]
    fn paddle_line_matches_estimator_crossing() {
        let arena = Arena::new(ArenaConfig::default());
        // 333 + 2000/3 − 10
        assert_abs_diff_eq!(arena.paddle_line(), 333.0 + 2000.0 / 3.0 - 10.0, epsilon = 1e-9);
    }

    #[test]
    fn render_shows_ball_only_inside_region() {
        let mut arena = Arena::new(ArenaConfig::default());
        arena.ball.x = 500.0;
        arena.ball.y = 300.0;
        let frame = arena.render_region();
        assert_eq!(frame.dimensions(), (334, 600));
        assert_eq!(frame.get_pixel(167, 300), &Rgb([255, 255, 255]));
        assert_eq!(frame.get_pixel(10, 10), &Rgb([0x00, 0x33, 0x00]));

        arena.ball.x = 100.0;
        let frame = arena.render_region();
        assert!(frame.pixels().all(|p| *p == Rgb([0x00, 0x33, 0x00])));
    }

    #[test]
    fn level_shot_crosses_at_constant_height() {
        let mut arena = Arena::new(ArenaConfig { gravity: 0.0, ..ArenaConfig::default() });
        arena.launch(&Shot { angle_deg: 0.0, speed: 100.0 });
        while !arena.is_over() {
            arena.step();
        }
        let crossing = arena.crossing().unwrap();
        assert_abs_diff_eq!(crossing.ball_y, 300.0, epsilon = 1e-9);
        assert!(crossing.hit);
    }

    #[test]
    fn crossing_is_recorded_once_and_interpolated() {
        let mut arena = Arena::new(ArenaConfig::default());
        arena.launch(&Shot { angle_deg: -20.0, speed: 90.0 });
        let line = arena.paddle_line();
        let mut last_before = None;
        while !arena.is_over() {
            if arena.ball.x < line {
                last_before = Some(arena.ball.position());
            }
            arena.step();
        }
        let (bx, by) = last_before.unwrap();
        let after = arena
            .ball
            .history
            .iter()
            .copied()
            .find(|&(x, _)| x >= line)
            .unwrap();
        let crossing = arena.crossing().unwrap();
        let t = (line - bx) / (after.0 - bx);
        assert_abs_diff_eq!(crossing.ball_y, by + t * (after.1 - by), epsilon = 1e-9);
    }

    #[test]
    fn paddle_handle_moves_shared_paddle() {
        let arena = RefCell::new(Arena::new(ArenaConfig::default()));
        let mut handle = PaddleHandle(&arena);
        handle.move_by(-50.0);
        assert_abs_diff_eq!(handle.position(), 250.0, epsilon = 1e-12);
        assert_eq!(ScreenRegion(&arena).capture().dimensions(), (334, 600));
    }
}
