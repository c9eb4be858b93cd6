mod csv;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ta_core::aggregate::aggregate;
use ta_core::indicators::compute_snapshot;
use ta_core::{EngineConfig, SignalEngine, Timeframe};
use ta_runtime::{CandleFeed, Runner};

#[derive(Parser)]
#[command(name = "ta", about = "Technical-analysis signal engine")]
struct Cli {
    /// Optional YAML engine config; unset fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline once (or several debounce cycles) over a CSV
    /// of 1m candles and print the evaluation as JSON.
    Analyze {
        /// CSV with time,open,high,low,close,volume rows.
        csv: PathBuf,
        #[arg(long, default_value = "BTC")]
        asset: String,
        #[arg(long, default_value = "5m")]
        timeframe: String,
        /// Evaluation cycles to run against the same data; three cycles of
        /// an identical read produce a confirmed signal.
        #[arg(long, default_value_t = 1)]
        cycles: u32,
    },
    /// Print the raw indicator snapshot for a timeframe, no gating.
    DumpIndicators {
        csv: PathBuf,
        #[arg(long, default_value = "5m")]
        timeframe: String,
    },
    /// Re-evaluate on a fixed tick and stream evaluations as JSON lines
    /// until Ctrl+C.
    Watch {
        csv: PathBuf,
        #[arg(long, default_value = "BTC")]
        asset: String,
        #[arg(long, default_value = "5m")]
        timeframe: String,
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze {
            csv,
            asset,
            timeframe,
            cycles,
        } => {
            let timeframe = Timeframe::parse(&timeframe)?;
            let engine = SignalEngine::new(cfg)?;
            let base = csv::load_candles(&csv)?;
            let mut last = None;
            for cycle in 0..cycles.max(1) {
                last = Some(engine.evaluate(&asset, timeframe, &base, cycle as i64));
            }
            // cycles >= 1, so this is always present
            if let Some(eval) = last {
                println!("{}", serde_json::to_string_pretty(&eval)?);
            }
        }
        Command::DumpIndicators { csv, timeframe } => {
            let timeframe = Timeframe::parse(&timeframe)?;
            cfg.validate()?;
            let base = csv::load_candles(&csv)?;
            let buckets = aggregate(&base, timeframe);
            let start = buckets.len().saturating_sub(cfg.lookback);
            let snapshot = compute_snapshot(&buckets[start..], &cfg);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Watch {
            csv,
            asset,
            timeframe,
            tick_ms,
        } => {
            let parsed = Timeframe::parse(&timeframe)?;
            let engine = Arc::new(SignalEngine::new(cfg.clone())?);

            // Retain enough base minutes to fill the lookback on the
            // watched timeframe.
            let cap = cfg.lookback * (parsed.duration_ms() / 60_000) as usize;
            let feed = Arc::new(CandleFeed::new(cap.max(cfg.min_raw_candles)));
            for candle in csv::load_candles(&csv)? {
                feed.push(&asset, candle);
            }

            let (tx, mut rx) = mpsc::channel(64);
            let shutdown = CancellationToken::new();
            let mut runner = Runner::new(
                engine,
                feed,
                Duration::from_millis(tick_ms),
                tx,
                shutdown.clone(),
            );
            runner.subscribe(&asset, &timeframe)?;
            let handle = tokio::spawn(runner.run());

            let printer = tokio::spawn(async move {
                while let Some(eval) = rx.recv().await {
                    match serde_json::to_string(&eval) {
                        Ok(line) => println!("{line}"),
                        Err(e) => tracing::warn!("serialization failed: {e}"),
                    }
                }
            });

            tokio::signal::ctrl_c().await?;
            tracing::info!("shutdown signal received");
            shutdown.cancel();
            handle.await?;
            drop(printer);
        }
    }
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<EngineConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let cfg: EngineConfig = serde_yaml::from_str(&text)?;
    cfg.validate()?;
    Ok(cfg)
}
