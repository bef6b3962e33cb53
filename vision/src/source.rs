//! Capture boundary: where frames come from.

use image::RgbImage;

/// Produces one frame of the tracked screen region per call.
pub trait FrameSource {
    fn capture(&self) -> RgbImage;
}
