//! `vision` — Frame capture boundary, preprocessing, circle detection.

pub mod blob;
pub mod detector;
pub mod preprocess;
pub mod source;

pub use blob::BlobCircleDetector;
pub use detector::{Circle, CirclePrimitive, DetectorAdapter, DetectorConfig};
pub use source::FrameSource;
