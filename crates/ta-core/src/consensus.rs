use serde::Serialize;

use crate::aggregate::aggregate;
use crate::candle::Candle;
use crate::config::EngineConfig;
use crate::confluence;
use crate::indicators::{compute_snapshot, tail_candles};
use crate::signal::Direction;
use crate::smoothing::heiken_ashi;
use crate::timeframe::Timeframe;
use crate::trend::evaluate_trend;

/// One timeframe's contribution to the consensus vote.
#[derive(Debug, Clone, Serialize)]
pub struct TimeframeVote {
    pub timeframe: Timeframe,
    pub direction: Direction,
    pub adx: f64,
    /// Non-trending timeframes are recorded but excluded from the weights.
    pub trending: bool,
    pub confluence_percent: f64,
}

/// ADX-weighted multi-timeframe agreement.
#[derive(Debug, Clone, Serialize)]
pub struct ConsensusResult {
    pub direction: Direction,
    /// Winning side's share of the trending ADX weight, in percent.
    /// Zero when agreement falls short of the threshold.
    pub consensus_percent: f64,
    pub votes: Vec<TimeframeVote>,
}

/// Vote across the requested timeframe and every configured candidate
/// strictly shorter than it, all aggregated from the same base series.
///
/// Each participating timeframe votes with its own confluence direction,
/// weighted by its ADX; non-trending timeframes abstain. The winning
/// direction must carry at least `consensus_threshold` percent of the
/// trending weight, otherwise the result is SIDEWAYS with zero consensus.
///
/// Fully deterministic: same inputs, same verdict.
pub fn evaluate(base: &[Candle], requested: Timeframe, cfg: &EngineConfig) -> ConsensusResult {
    let mut timeframes: Vec<Timeframe> = cfg
        .consensus_timeframes
        .iter()
        .copied()
        .filter(|tf| *tf < requested)
        .collect();
    timeframes.push(requested);
    timeframes.sort();
    timeframes.dedup();

    let mut votes = Vec::with_capacity(timeframes.len());
    for tf in timeframes {
        let buckets = aggregate(base, tf);
        let window = tail_candles(&buckets, cfg.lookback);
        let trend = evaluate_trend(&heiken_ashi(window), cfg);
        let result = confluence::score(&compute_snapshot(window, cfg));
        votes.push(TimeframeVote {
            timeframe: tf,
            direction: result.direction,
            adx: trend.adx,
            trending: trend.trending,
            confluence_percent: result.percent,
        });
    }

    let mut up_weight = 0.0;
    let mut down_weight = 0.0;
    let mut total_weight = 0.0;
    for vote in votes.iter().filter(|v| v.trending) {
        total_weight += vote.adx;
        match vote.direction {
            Direction::Up => up_weight += vote.adx,
            Direction::Down => down_weight += vote.adx,
            Direction::Sideways => {}
        }
    }

    if total_weight <= 0.0 {
        return ConsensusResult {
            direction: Direction::Sideways,
            consensus_percent: 0.0,
            votes,
        };
    }

    let (winner, weight) = if up_weight >= down_weight {
        (Direction::Up, up_weight)
    } else {
        (Direction::Down, down_weight)
    };
    let share = weight / total_weight * 100.0;

    if share >= cfg.consensus_threshold {
        ConsensusResult {
            direction: winner,
            consensus_percent: share,
            votes,
        }
    } else {
        ConsensusResult {
            direction: Direction::Sideways,
            consensus_percent: 0.0,
            votes,
        }
    }
}
