use std::fmt;

use serde::Serialize;

use crate::candle::Candle;
use crate::config::EngineConfig;
use crate::indicators::adx::adx;

/// Trend-strength tier derived from the ADX value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrengthTier {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl StrengthTier {
    pub fn from_adx(adx: f64) -> Self {
        if adx >= 50.0 {
            StrengthTier::VeryStrong
        } else if adx >= 35.0 {
            StrengthTier::Strong
        } else if adx >= 25.0 {
            StrengthTier::Moderate
        } else {
            StrengthTier::Weak
        }
    }
}

impl fmt::Display for StrengthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthTier::Weak => write!(f, "WEAK"),
            StrengthTier::Moderate => write!(f, "MODERATE"),
            StrengthTier::Strong => write!(f, "STRONG"),
            StrengthTier::VeryStrong => write!(f, "VERY_STRONG"),
        }
    }
}

/// Ephemeral trend-strength record for one timeframe evaluation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendStrength {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    /// Hard gate: only trending regimes may emit a directional signal.
    pub trending: bool,
    pub tier: StrengthTier,
}

/// Evaluate trend strength over a (Heiken-Ashi smoothed) candle window.
pub fn evaluate_trend(candles: &[Candle], cfg: &EngineConfig) -> TrendStrength {
    let out = adx(candles, cfg.adx_period);
    TrendStrength {
        adx: out.adx,
        plus_di: out.plus_di,
        minus_di: out.minus_di,
        trending: out.adx >= cfg.adx_threshold,
        tier: StrengthTier::from_adx(out.adx),
    }
}
