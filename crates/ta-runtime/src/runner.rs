use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ta_core::engine::Evaluation;
use ta_core::{EngineError, SignalEngine, Timeframe};

use crate::feed::CandleFeed;

/// One (asset, timeframe) pair evaluated every tick.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub asset: String,
    pub timeframe: Timeframe,
}

/// Fixed-interval evaluation scheduler.
///
/// Every tick spawns one evaluation task per subscription against a
/// snapshot of the feed and hands results to the output channel. Ticks
/// that fall behind are skipped rather than queued, so a slow consumer
/// never builds a backlog of stale evaluations.
pub struct Runner {
    engine: Arc<SignalEngine>,
    feed: Arc<CandleFeed>,
    subscriptions: Vec<Subscription>,
    tick: Duration,
    out: mpsc::Sender<Evaluation>,
    shutdown: CancellationToken,
}

impl Runner {
    pub fn new(
        engine: Arc<SignalEngine>,
        feed: Arc<CandleFeed>,
        tick: Duration,
        out: mpsc::Sender<Evaluation>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            feed,
            subscriptions: Vec::new(),
            tick,
            out,
            shutdown,
        }
    }

    /// Register a pair for evaluation. The timeframe string is validated
    /// here so the tick loop itself never fails.
    pub fn subscribe(&mut self, asset: &str, timeframe: &str) -> Result<(), EngineError> {
        let timeframe = Timeframe::parse(timeframe)?;
        self.subscriptions.push(Subscription {
            asset: asset.to_string(),
            timeframe,
        });
        info!(asset, %timeframe, "subscription added");
        Ok(())
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Drive the tick loop until the shutdown token fires.
    ///
    /// A tick is skipped outright while the previous tick's evaluations
    /// are still in flight, and a full output channel drops the
    /// evaluation instead of parking a task on it. Stale work is
    /// discarded, never queued.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            subscriptions = self.subscriptions.len(),
            tick_ms = self.tick.as_millis() as u64,
            "runner started"
        );

        let mut in_flight: JoinSet<()> = JoinSet::new();
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("runner stopping");
                    return;
                }
                _ = interval.tick() => {}
            }

            while in_flight.try_join_next().is_some() {}
            if !in_flight.is_empty() {
                warn!(outstanding = in_flight.len(), "previous tick still running, skipping");
                continue;
            }

            for sub in &self.subscriptions {
                let base = match self.feed.snapshot(&sub.asset) {
                    Ok(base) => base,
                    Err(e) => {
                        // Subscribed before any candle arrived; not fatal.
                        debug!(asset = %sub.asset, "skipping evaluation: {e}");
                        continue;
                    }
                };
                let engine = Arc::clone(&self.engine);
                let out = self.out.clone();
                let sub = sub.clone();
                in_flight.spawn(async move {
                    let eval = engine.evaluate(&sub.asset, sub.timeframe, &base, now_ms());
                    match out.try_send(eval) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            warn!(asset = %sub.asset, "output channel full, dropping evaluation");
                        }
                        Err(TrySendError::Closed(_)) => {
                            warn!(asset = %sub.asset, "evaluation receiver dropped");
                        }
                    }
                });
            }
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
