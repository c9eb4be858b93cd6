use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::candle::Candle;
use crate::confidence;
use crate::config::EngineConfig;
use crate::confluence;
use crate::consensus;
use crate::error::EngineError;
use crate::guards;
use crate::indicators::{compute_snapshot, tail_candles, IndicatorSnapshot};
use crate::pattern;
use crate::persistence::SignalHistory;
use crate::signal::Signal;
use crate::smoothing::heiken_ashi;
use crate::targets;
use crate::timeframe::Timeframe;
use crate::trend::evaluate_trend;

/// One evaluation's full output: the signal (if any) plus the indicator
/// snapshot it was derived from.
///
/// `signal` is `None` only when the confluence vote was too weak to say
/// anything at all; every gate abort still produces an explanatory
/// SIDEWAYS signal.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub asset: String,
    pub timeframe: Timeframe,
    pub evaluated_at_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
    pub snapshot: IndicatorSnapshot,
    pub confluence_percent: f64,
    pub consensus_percent: f64,
}

/// Stateless evaluation pipeline over a shared confirmation history.
///
/// Every call recomputes all indicators from the candles it is handed;
/// the only state carried between ticks is the persistence store.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    cfg: EngineConfig,
    history: Arc<SignalHistory>,
}

impl SignalEngine {
    pub fn new(cfg: EngineConfig) -> Result<Self, EngineError> {
        Self::with_history(cfg, Arc::new(SignalHistory::new()))
    }

    /// Share one confirmation history across several engine handles.
    pub fn with_history(cfg: EngineConfig, history: Arc<SignalHistory>) -> Result<Self, EngineError> {
        cfg.validate()?;
        Ok(Self { cfg, history })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn history(&self) -> &Arc<SignalHistory> {
        &self.history
    }

    /// Run the full gate pipeline over a base (1m) candle series.
    ///
    /// Stages, in order: data sufficiency, aggregation, Heiken-Ashi trend
    /// gate, indicator snapshot, confluence vote, multi-timeframe
    /// consensus, persistence debounce, then annotation (volatility and
    /// reversal-trap guards, pattern, targets, confidence).
    pub fn evaluate(
        &self,
        asset: &str,
        timeframe: Timeframe,
        base: &[Candle],
        now_ms: i64,
    ) -> Evaluation {
        let cfg = &self.cfg;
        let buckets = aggregate(base, timeframe);
        let window = tail_candles(&buckets, cfg.lookback);
        let snapshot = compute_snapshot(window, cfg);
        let price = snapshot.close;

        let mut evaluation = Evaluation {
            asset: asset.to_string(),
            timeframe,
            evaluated_at_ms: now_ms,
            signal: None,
            snapshot: snapshot.clone(),
            confluence_percent: 0.0,
            consensus_percent: 0.0,
        };

        if base.len() < cfg.min_raw_candles || window.len() < cfg.min_buckets {
            debug!(
                asset,
                %timeframe,
                raw = base.len(),
                buckets = window.len(),
                "insufficient data"
            );
            evaluation.signal = Some(Signal::sideways(
                format!(
                    "insufficient data: {} raw candles, {} buckets",
                    base.len(),
                    window.len()
                ),
                price,
                0.0,
            ));
            return evaluation;
        }

        // Trend gate runs on the Heiken-Ashi smoothed window; choppy
        // regimes stop here without touching the confirmation history.
        let trend = evaluate_trend(&heiken_ashi(window), cfg);
        if !trend.trending {
            debug!(asset, %timeframe, adx = trend.adx, "market is not trending");
            evaluation.signal = Some(Signal::sideways(
                format!(
                    "market is not trending (ADX {:.1} below {:.0})",
                    trend.adx, cfg.adx_threshold
                ),
                price,
                trend.adx,
            ));
            return evaluation;
        }

        let vote = confluence::score(&snapshot);
        evaluation.confluence_percent = vote.percent;
        if !vote.direction.is_directional() || vote.percent < cfg.confluence_threshold {
            debug!(
                asset,
                %timeframe,
                percent = vote.percent,
                "confluence below threshold, suppressing"
            );
            return evaluation;
        }

        let consensus = consensus::evaluate(base, timeframe, cfg);
        evaluation.consensus_percent = consensus.consensus_percent;
        if consensus.direction != vote.direction {
            debug!(
                asset,
                %timeframe,
                wanted = %vote.direction,
                got = %consensus.direction,
                "no multi-timeframe consensus"
            );
            evaluation.signal = Some(Signal::sideways(
                "no multi-timeframe consensus",
                price,
                trend.adx,
            ));
            return evaluation;
        }

        let direction = vote.direction;
        let count = self.history.observe(asset, timeframe, direction, now_ms);
        if count < cfg.persistence_threshold {
            debug!(asset, %timeframe, %direction, count, "awaiting confirmation");
            let mut signal = Signal::sideways(
                format!(
                    "awaiting confirmation ({count}/{})",
                    cfg.persistence_threshold
                ),
                price,
                trend.adx,
            );
            signal.confirmation_count = count;
            evaluation.signal = Some(signal);
            return evaluation;
        }

        let volatility = guards::volatility(window, cfg);
        let trap_score = guards::reversal_trap(window, cfg);
        let candle_pattern = match window {
            [.., prev, last] => pattern::classify(Some(prev), last),
            [last] => pattern::classify(None, last),
            [] => pattern::CandlePattern::Neutral,
        };

        let confidence = confidence::compose(
            trend.tier,
            consensus.consensus_percent,
            candle_pattern,
            timeframe,
            volatility.volume_ratio,
            cfg,
        );

        let signal = Signal {
            direction,
            confidence,
            risk_level: guards::risk_level(&volatility, trap_score),
            warning: guards::warning(&volatility, trap_score),
            targets: targets::derive(window, direction, cfg),
            adx: trend.adx,
            confirmation_count: count,
            confirmed: true,
            pattern: candle_pattern,
            pattern_weight: candle_pattern.weight(),
        };
        info!(
            asset,
            %timeframe,
            %direction,
            confidence,
            adx = trend.adx,
            consensus = consensus.consensus_percent,
            "signal confirmed"
        );
        evaluation.signal = Some(signal);
        evaluation
    }
}
