//! PG-Sim: Push Gateway admission simulator
//!
//! Replays a JSON scenario through an `AdmissionController` wired to
//! in-memory collaborators and prints one JSON line per step.
//!
//! ```bash
//! pg-sim --config gateway.json --scenario scenarios/block_cap.json --metrics
//! ```

mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pg_admission::GatewayConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// PG-Sim: replay gateway requests through the admission core
#[derive(Parser, Debug)]
#[command(name = "pg-sim")]
#[command(about = "Replay a deposit scenario through the Push Gateway admission core")]
struct Args {
    /// Gateway configuration JSON (default: PG_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario JSON
    #[arg(short, long)]
    scenario: PathBuf,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    metrics: bool,
}

fn init_logging() -> Result<()> {
    let level = std::env::var("PG_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let json_logs = std::env::var("PG_JSON_LOGS")
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false);

    let filter = EnvFilter::try_new(&level).context("invalid log filter")?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config = match &args.config {
        Some(path) => GatewayConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GatewayConfig::from_env().context("loading config from environment")?,
    };

    let raw = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("reading scenario {}", args.scenario.display()))?;
    let scenario: scenario::Scenario =
        serde_json::from_str(&raw).context("parsing scenario JSON")?;

    info!(steps = scenario.steps.len(), "[pg-sim] replaying scenario");
    let outcomes = scenario::run(&config, scenario)?;

    let admitted = outcomes.iter().filter(|o| o.admitted).count();
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }
    info!(
        admitted,
        rejected = outcomes.len() - admitted,
        "[pg-sim] scenario complete"
    );

    if args.metrics {
        print!("{}", pg_admission::metrics::gather_text());
    }
    Ok(())
}
