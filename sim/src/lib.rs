//! `sim` — Headless cannon/paddle game and the agent session that plays it.
//!
//! - [`ball`], [`cannon`], [`paddle`] — game objects and their physics
//! - [`arena`]   — world geometry, stepping, software screen capture
//! - [`session`] — physics and agent tasks run cooperatively per episode
//! - [`replay`]  — JSON episode logs

pub mod arena;
pub mod ball;
pub mod cannon;
pub mod paddle;
pub mod replay;
pub mod session;

pub use arena::{Arena, ArenaConfig, Crossing, PaddleHandle, Region, ScreenRegion};
pub use ball::Ball;
pub use cannon::{Cannon, Shot};
pub use paddle::Paddle;
pub use replay::{load_observations, load_path, save_observations, save_path, write_episode_logs};
pub use session::{EpisodeReport, Session, SessionConfig};
