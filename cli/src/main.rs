//! `cannon-agent`: plays random cannon shots against the intercept agent until Ctrl-C.

use anyhow::{ensure, Result};
use clap::Parser;
use sim::session::{Session, SessionConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cannon-agent", about = "Ball-intercept agent over a headless cannon game")]
struct Cli {
    /// Seconds between physics steps
    #[arg(long, default_value_t = 0.005)]
    physics_interval: f64,
    /// Seconds between screen captures
    #[arg(long, default_value_t = 0.01)]
    capture_interval: f64,
}

fn interval(name: &str, secs: f64) -> Result<Duration> {
    ensure!(secs.is_finite() && secs > 0.0, "{name} must be a positive number of seconds, got {secs}");
    Ok(Duration::from_secs_f64(secs))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = SessionConfig {
        physics_interval: interval("--physics-interval", cli.physics_interval)?,
        capture_interval: interval("--capture-interval", cli.capture_interval)?,
        log_dir: Some(PathBuf::from("logs")),
        seed: rand::random(),
        ..SessionConfig::default()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    println!(
        "Running agent (physics every {:.3}s, capture every {:.3}s, seed={}); Ctrl-C to stop",
        cli.physics_interval, cli.capture_interval, config.seed
    );

    let start = std::time::Instant::now();
    let mut session = Session::new(config);
    runtime.block_on(session.run_until(tokio::signal::ctrl_c()))?;

    let m = &session.metrics;
    println!(
        "Done: {} episodes ({} predicted, {} aborted), elapsed={:.2}s",
        m.episodes(),
        m.predicted,
        m.aborted,
        start.elapsed().as_secs_f64(),
    );
    println!(
        "Crossing error: rmse={:.2}px max={:.2}px over {} episodes; hits {}/{} ({:.0}%)",
        m.rmse(),
        m.max_abs_err,
        m.n_compared,
        m.hits,
        m.crossings,
        100.0 * m.hit_rate(),
    );

    Ok(())
}
