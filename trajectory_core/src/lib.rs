//! `trajectory_core` — Ball trajectory estimation for the intercept agent.
//!
//! # Module layout
//! - [`types`]      — Observations, segments, window bounds
//! - [`buffer`]     — Observation buffer and the waiting/active/stopped lifecycle
//! - [`segment`]    — Bounce detection, longest bounce-free segment
//! - [`fit`]        — Least-squares parabola, trajectory model
//! - [`simulate`]   — Forward simulation with wall reflection
//! - [`controller`] — Paddle move planning and driving
//! - [`episode`]    — Per-shot orchestration of the stages above
//! - [`metrics`]    — Prediction error and hit-rate accounting
//! - [`error`]      — Episode-fatal error kinds

pub mod buffer;
pub mod controller;
pub mod episode;
pub mod error;
pub mod fit;
pub mod metrics;
pub mod segment;
pub mod simulate;
pub mod types;

pub use buffer::{ObservationBuffer, TrackingStatus};
pub use controller::{ControllerConfig, MovePlan, PaddleDrive};
pub use episode::{Episode, EpisodeOutcome};
pub use error::InterceptError;
pub use fit::{Parabola, TrajectoryModel};
pub use simulate::{ForwardSimulator, SimulationResult, SimulationState};
pub use types::{Bounds, Observation, PathPoint, Segment};
