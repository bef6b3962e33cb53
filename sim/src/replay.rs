//! Replay: serialize/deserialize episode logs for offline analysis.
//!
//! Each episode overwrites three JSON files in the log directory:
//! - [`CIRCLES_LOG`]: the detected observation sequence (tracked-frame pixels)
//! - [`SIMULATE_LOG`]: the simulated path (tracked-frame pixels)
//! - [`MOVE_LOG`]: the ball's true path (window pixels)
//!
//! Captured frames can optionally be dumped as numbered PNG files.

use image::RgbImage;
use serde::{de::DeserializeOwned, Serialize};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use trajectory_core::types::{Observation, PathPoint};

pub const CIRCLES_LOG: &str = "circles.json";
pub const SIMULATE_LOG: &str = "simulate_history.json";
pub const MOVE_LOG: &str = "move_history.json";

fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)?;
    Ok(value)
}

/// Save an observation sequence to a JSON file.
pub fn save_observations(observations: &[Observation], path: &Path) -> anyhow::Result<()> {
    save_json(observations, path)
}

/// Load an observation sequence from a JSON file.
pub fn load_observations(path: &Path) -> anyhow::Result<Vec<Observation>> {
    load_json(path)
}

/// Save a path (simulated or true) to a JSON file.
pub fn save_path(path_points: &[PathPoint], path: &Path) -> anyhow::Result<()> {
    save_json(path_points, path)
}

/// Load a path from a JSON file.
pub fn load_path(path: &Path) -> anyhow::Result<Vec<PathPoint>> {
    load_json(path)
}

/// Write `frames` as `frame_0000.png`, `frame_0001.png`, … into `dir`.
pub fn save_frames(dir: &Path, frames: &[RgbImage]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    for (i, frame) in frames.iter().enumerate() {
        frame.save(dir.join(format!("frame_{i:04}.png")))?;
    }
    Ok(())
}

/// Write all three episode logs into `dir`, creating it if needed.
pub fn write_episode_logs(
    dir: &Path,
    observations: &[Observation],
    simulated: &[PathPoint],
    true_path: &[PathPoint],
) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    save_observations(observations, &dir.join(CIRCLES_LOG))?;
    save_path(simulated, &dir.join(SIMULATE_LOG))?;
    save_path(true_path, &dir.join(MOVE_LOG))?;
    Ok(())
}
