//! Errors that abort a single tracking episode.
//!
//! None of these are process-fatal: the session logs them, drops the
//! episode's buffers and waits for the next shot.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterceptError {
    /// Segment selection was asked to work on an empty observation sequence.
    #[error("no observations were recorded for this episode")]
    InsufficientData,

    /// The least-squares system for `y = a·x² + b·x + c` has no usable solution.
    #[error("parabola fit is underdetermined: {distinct} distinct x-values (need 3)")]
    UnderdeterminedFit { distinct: usize },

    /// Forward simulation would never reach the crossing line.
    #[error("forward simulation cannot advance with vx = {vx}")]
    NonAdvancingSimulation { vx: f64 },
}

pub type Result<T> = std::result::Result<T, InterceptError>;
