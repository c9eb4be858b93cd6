use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::EngineError;
use crate::timeframe::Timeframe;

/// Engine configuration.
///
/// Every threshold is override-able per subscription; `Default` carries the
/// documented values. Deserializes from YAML/JSON with `#[serde(default)]`
/// so partial config files only name what they change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Trailing bucket window per evaluation.
    pub lookback: usize,
    /// Below this raw candle count the engine returns "insufficient data".
    pub min_raw_candles: usize,
    /// Below this aggregated bucket count the engine returns "insufficient data".
    pub min_buckets: usize,

    // Gate thresholds
    pub adx_threshold: f64,
    pub confluence_threshold: f64,
    pub consensus_threshold: f64,
    pub persistence_threshold: u32,

    // Indicator periods
    pub adx_period: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub rsi_period: usize,
    pub bb_period: usize,
    pub bb_std: f64,
    pub stoch_rsi_period: usize,
    pub stoch_smooth_k: usize,
    pub stoch_smooth_d: usize,
    pub atr_period: usize,

    // Targets / guards
    pub target_window: usize,
    pub volume_avg_window: usize,
    pub volume_profile_bins: usize,

    /// Candidate lower timeframes for the multi-timeframe consensus vote;
    /// only those strictly shorter than the requested timeframe take part.
    pub consensus_timeframes: Vec<Timeframe>,

    /// Per-timeframe confidence multiplier overrides, clamped to [0.8, 1.2].
    pub timeframe_multipliers: FxHashMap<Timeframe, f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback: 120,
            min_raw_candles: 20,
            min_buckets: 3,

            adx_threshold: 25.0,
            confluence_threshold: 40.0,
            consensus_threshold: 70.0,
            persistence_threshold: 3,

            adx_period: 14,
            ema_fast_period: 8,
            ema_slow_period: 34,
            rsi_period: 14,
            bb_period: 20,
            bb_std: 2.0,
            stoch_rsi_period: 14,
            stoch_smooth_k: 3,
            stoch_smooth_d: 3,
            atr_period: 14,

            target_window: 20,
            volume_avg_window: 20,
            volume_profile_bins: 12,

            consensus_timeframes: vec![
                Timeframe::M1,
                Timeframe::M5,
                Timeframe::M15,
                Timeframe::M30,
            ],
            timeframe_multipliers: FxHashMap::default(),
        }
    }
}

impl EngineConfig {
    /// Confidence multiplier for a timeframe, clamped to [0.8, 1.2].
    /// Shorter timeframes discount confidence, longer ones boost it.
    pub fn timeframe_multiplier(&self, tf: Timeframe) -> f64 {
        let value = self
            .timeframe_multipliers
            .get(&tf)
            .copied()
            .unwrap_or(match tf {
                Timeframe::M1 => 0.8,
                Timeframe::M5 => 0.9,
                Timeframe::M15 | Timeframe::M30 => 1.0,
                Timeframe::H1 => 1.1,
                Timeframe::H4 | Timeframe::D1 => 1.2,
            });
        value.clamp(0.8, 1.2)
    }

    /// Reject nonsensical values before any subscription is accepted.
    pub fn validate(&self) -> Result<(), EngineError> {
        fn pct(name: &str, v: f64) -> Result<(), EngineError> {
            if (0.0..=100.0).contains(&v) {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!(
                    "{name} must be within [0, 100], got {v}"
                )))
            }
        }
        pct("adx_threshold", self.adx_threshold)?;
        pct("confluence_threshold", self.confluence_threshold)?;
        pct("consensus_threshold", self.consensus_threshold)?;

        if self.persistence_threshold == 0 {
            return Err(EngineError::InvalidConfig(
                "persistence_threshold must be at least 1".to_string(),
            ));
        }
        if self.lookback < self.min_buckets {
            return Err(EngineError::InvalidConfig(format!(
                "lookback ({}) must cover at least min_buckets ({})",
                self.lookback, self.min_buckets
            )));
        }
        for (name, period) in [
            ("adx_period", self.adx_period),
            ("ema_fast_period", self.ema_fast_period),
            ("ema_slow_period", self.ema_slow_period),
            ("rsi_period", self.rsi_period),
            ("bb_period", self.bb_period),
            ("atr_period", self.atr_period),
        ] {
            if period == 0 {
                return Err(EngineError::InvalidConfig(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }
}
