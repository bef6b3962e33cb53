//! Detector adapter: captured frame in, at most one ball observation out.
//!
//! The circle-finding step itself sits behind [`CirclePrimitive`] so that any
//! external detector (Hough transform, learned model, …) can be plugged in.
//! The adapter owns preprocessing and normalisation:
//! 1. grayscale, blur, binary threshold
//! 2. ask the primitive for candidates
//! 3. keep the best (first) candidate, rounded to whole pixels

use crate::{blob::BlobCircleDetector, preprocess};
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::trace;
use trajectory_core::types::Observation;

/// A circle candidate in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// A circle-finding routine over a binarised frame.
pub trait CirclePrimitive {
    /// Candidates ordered best first. Empty when nothing was found.
    fn find_circles(&self, binary: &GrayImage) -> Vec<Circle>;
}

/// Preprocessing configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Gaussian blur standard deviation (pixels)
    pub blur_sigma: f32,
    /// Binary threshold level
    pub threshold: u8,
    /// Round centre and radius to whole pixels
    pub round_to_pixels: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 3.0, // roughly a 17×17 Gaussian kernel
            threshold: 127,
            round_to_pixels: true,
        }
    }
}

/// Wraps a [`CirclePrimitive`] and normalises its output to an [`Observation`].
#[derive(Clone, Debug)]
pub struct DetectorAdapter<P = BlobCircleDetector> {
    pub config: DetectorConfig,
    pub primitive: P,
}

impl Default for DetectorAdapter<BlobCircleDetector> {
    fn default() -> Self {
        Self::new(DetectorConfig::default(), BlobCircleDetector::default())
    }
}

impl<P: CirclePrimitive> DetectorAdapter<P> {
    pub fn new(config: DetectorConfig, primitive: P) -> Self {
        Self { config, primitive }
    }

    /// Detect the ball in an already binarised frame.
    pub fn detect_binary(&self, binary: &GrayImage) -> Option<Observation> {
        let candidates = self.primitive.find_circles(binary);
        trace!(candidates = candidates.len(), "circle candidates");
        let best = candidates.into_iter().next()?;
        let obs = if self.config.round_to_pixels {
            Observation::new(best.x.round(), best.y.round(), best.radius.round())
        } else {
            Observation::new(best.x, best.y, best.radius)
        };
        Some(obs)
    }

    /// Detect the ball in a captured RGB frame.
    pub fn detect(&self, frame: &RgbImage) -> Option<Observation> {
        let binary = preprocess::binarize(frame, self.config.blur_sigma, self.config.threshold);
        self.detect_binary(&binary)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
