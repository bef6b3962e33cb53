//! Frame preprocessing: grayscale → Gaussian blur → binary threshold.
//!
//! Mirrors what the detector expects as input: a binarised image in which the
//! ball is a solid bright disk on a black background.

use image::{imageops, GrayImage, Luma, RgbImage};

/// Luma conversion of a captured RGB frame.
pub fn grayscale(frame: &RgbImage) -> GrayImage {
    imageops::grayscale(frame)
}

/// Gaussian blur with standard deviation `sigma` (pixels). `sigma <= 0` is a no-op.
pub fn blur(frame: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return frame.clone();
    }
    imageops::blur(frame, sigma)
}

/// Binary threshold: pixels strictly above `level` become 255, the rest 0.
pub fn threshold(frame: &GrayImage, level: u8) -> GrayImage {
    let mut out = frame.clone();
    for px in out.pixels_mut() {
        *px = if px[0] > level { Luma([255]) } else { Luma([0]) };
    }
    out
}

/// Full preprocessing chain used by the detector adapter.
pub fn binarize(frame: &RgbImage, sigma: f32, level: u8) -> GrayImage {
    threshold(&blur(&grayscale(frame), sigma), level)
}
