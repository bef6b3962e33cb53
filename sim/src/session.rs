//! Session: plays shots against the agent, one episode at a time.
//!
//! # Episode
//! 1. Launch the ball from the cannon.
//! 2. Run two cooperative tasks on the current thread until both finish:
//!    - **physics**: step the world every `physics_interval` until the ball
//!      leaves the window, then signal "ball gone"
//!    - **agent**: capture, detect and observe every `capture_interval` until
//!      tracking stops (or the ball is gone), then estimate the intercept and
//!      drive the paddle there
//! 3. Score the prediction against the true crossing and write the logs.
//!
//! The world sits in a `RefCell`; neither task holds a borrow across an
//! `.await`.

use crate::{
    arena::{Arena, ArenaConfig, Crossing, PaddleHandle, ScreenRegion},
    cannon::Shot,
    replay,
};
use image::RgbImage;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, future::Future, path::PathBuf, time::Duration};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};
use trajectory_core::{
    controller::{self, ControllerConfig, MovePlan},
    episode::{Episode, EpisodeOutcome},
    error::InterceptError,
    metrics::InterceptMetrics,
    types::{Observation, PathPoint},
    TrackingStatus,
};
use vision::{
    detector::{DetectorAdapter, DetectorConfig},
    source::FrameSource,
    BlobCircleDetector,
};

/// Full session configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub arena: ArenaConfig,
    pub detector: DetectorConfig,
    pub blob: BlobCircleDetector,
    pub controller: ControllerConfig,
    /// Pause between physics steps
    pub physics_interval: Duration,
    /// Pause between captures
    pub capture_interval: Duration,
    /// Directory for the per-episode JSON logs (`None` disables logging)
    pub log_dir: Option<PathBuf>,
    /// Also dump the tracked frames as PNG files under `log_dir/frames`
    pub save_frames: bool,
    /// Seed for the cannon's random shots
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            detector: DetectorConfig::default(),
            blob: BlobCircleDetector::default(),
            controller: ControllerConfig::default(),
            physics_interval: Duration::from_millis(5),
            capture_interval: Duration::from_millis(10),
            log_dir: None,
            save_frames: false,
            seed: 42,
        }
    }
}

/// What happened in one episode.
#[derive(Clone, Debug)]
pub struct EpisodeReport {
    pub id: u64,
    pub shot: Shot,
    pub observations: Vec<Observation>,
    pub outcome: Option<EpisodeOutcome>,
    pub error: Option<InterceptError>,
    pub plan: Option<MovePlan>,
    /// Predicted crossing height (window pixels)
    pub predicted_y: Option<f64>,
    pub crossing: Option<Crossing>,
}

impl EpisodeReport {
    /// Predicted minus true crossing height, when both exist.
    pub fn prediction_error(&self) -> Option<f64> {
        Some(self.predicted_y? - self.crossing?.ball_y)
    }
}

/// Agent side of one episode.
struct AgentRun {
    episode: Episode<Option<RgbImage>>,
    outcome: Result<EpisodeOutcome, InterceptError>,
    plan: Option<MovePlan>,
    predicted_y: Option<f64>,
}

pub struct Session {
    pub config: SessionConfig,
    pub metrics: InterceptMetrics,
    detector: DetectorAdapter,
    rng: ChaCha8Rng,
    next_id: u64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let detector = DetectorAdapter::new(config.detector.clone(), config.blob.clone());
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            metrics: InterceptMetrics::default(),
            detector,
            rng,
            next_id: 0,
        }
    }

    /// Play episodes with random shots until `shutdown` completes.
    ///
    /// An episode in flight when `shutdown` fires is dropped unscored.
    pub async fn run_until<S: Future>(&mut self, shutdown: S) -> anyhow::Result<()> {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(episodes = self.metrics.episodes(), "session stopped");
                    return Ok(());
                }
                report = self.play_random() => {
                    report?;
                }
            }
        }
    }

    /// Play one episode with a random shot.
    pub async fn play_random(&mut self) -> anyhow::Result<EpisodeReport> {
        let shot = Shot::random(&mut self.rng);
        self.play(shot).await
    }

    /// Play one episode with the given shot.
    pub async fn play(&mut self, shot: Shot) -> anyhow::Result<EpisodeReport> {
        let id = self.next_id;
        self.next_id += 1;

        let mut arena = Arena::new(self.config.arena.clone());
        arena.launch(&shot);
        let arena = RefCell::new(arena);

        let (gone_tx, gone_rx) = oneshot::channel();
        let physics = run_physics(&arena, self.config.physics_interval, gone_tx);
        let agent = run_agent(&arena, &self.detector, &self.config, id, gone_rx);
        let ((), run) = tokio::join!(physics, agent);

        let arena = arena.into_inner();
        let crossing = arena.crossing();
        let report = EpisodeReport {
            id,
            shot,
            observations: run.episode.observations().to_vec(),
            outcome: run.outcome.as_ref().ok().cloned(),
            error: run.outcome.as_ref().err().cloned(),
            plan: run.plan,
            predicted_y: run.predicted_y,
            crossing,
        };

        if let Some(predicted) = report.predicted_y {
            self.metrics.record_prediction(predicted, crossing.map(|c| c.ball_y));
            info!(
                episode = id,
                predicted,
                actual = crossing.map(|c| c.ball_y),
                "episode finished"
            );
        } else if let Some(err) = &report.error {
            self.metrics.record_abort();
            warn!(episode = id, %err, "episode aborted");
        }
        if let Some(c) = crossing {
            self.metrics.record_crossing(c.hit);
        }

        if let Some(dir) = &self.config.log_dir {
            let simulated: &[PathPoint] = report
                .outcome
                .as_ref()
                .map(|o| o.simulation.path.as_slice())
                .unwrap_or(&[]);
            replay::write_episode_logs(dir, &report.observations, simulated, &arena.ball.history)?;
            if self.config.save_frames {
                let frames: Vec<RgbImage> = run.episode.buffer().frames().iter().flatten().cloned().collect();
                replay::save_frames(&dir.join("frames"), &frames)?;
            }
        }

        Ok(report)
    }
}

/// Step the world until the ball leaves, then signal the agent.
async fn run_physics(arena: &RefCell<Arena>, interval: Duration, gone: oneshot::Sender<()>) {
    loop {
        {
            let mut world = arena.borrow_mut();
            if world.is_over() {
                break;
            }
            world.step();
        }
        tokio::time::sleep(interval).await;
    }
    debug!("ball left the window");
    // the agent may already have finished and dropped its receiver
    let _ = gone.send(());
}

/// Track the ball through the region, then estimate and steer the paddle.
async fn run_agent(
    arena: &RefCell<Arena>,
    detector: &DetectorAdapter,
    config: &SessionConfig,
    id: u64,
    mut gone: oneshot::Receiver<()>,
) -> AgentRun {
    let region = arena.borrow().region();
    let screen = ScreenRegion(arena);
    let mut episode = Episode::new(id, config.arena.bounds());

    loop {
        let frame = screen.capture();
        let candidate = detector.detect(&frame);
        let kept = config.save_frames.then_some(frame);
        if episode.observe(candidate, kept) == TrackingStatus::Stopped {
            break;
        }
        if !matches!(gone.try_recv(), Err(TryRecvError::Empty)) {
            episode.finish();
            break;
        }
        tokio::time::sleep(config.capture_interval).await;
    }

    let outcome = episode.estimate();
    let (plan, predicted_y) = match &outcome {
        Ok(out) => {
            let target = region.to_window_y(out.target_y());
            let mut paddle = PaddleHandle(arena);
            let plan = controller::intercept(&mut paddle, target, &config.controller).await;
            (Some(plan), Some(target))
        }
        Err(_) => (None, None),
    };

    AgentRun {
        episode,
        outcome,
        plan,
        predicted_y,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
