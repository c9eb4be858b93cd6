use std::fmt;

use serde::Serialize;

use crate::candle::Candle;

/// Candle pattern classification with fixed confidence weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandlePattern {
    Engulfing,
    PinBar,
    Doji,
    Marubozu,
    Neutral,
}

impl CandlePattern {
    /// Fixed pattern confidence weight.
    pub fn weight(self) -> f64 {
        match self {
            CandlePattern::Engulfing => 85.0,
            CandlePattern::PinBar => 75.0,
            CandlePattern::Doji => 30.0,
            CandlePattern::Marubozu => 80.0,
            CandlePattern::Neutral => 50.0,
        }
    }

    /// Bonus contribution to the confidence composer.
    pub fn bonus(self) -> f64 {
        match self {
            CandlePattern::Engulfing => 15.0,
            CandlePattern::Marubozu => 10.0,
            CandlePattern::PinBar => 5.0,
            CandlePattern::Doji | CandlePattern::Neutral => 0.0,
        }
    }
}

impl fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandlePattern::Engulfing => write!(f, "ENGULFING"),
            CandlePattern::PinBar => write!(f, "PIN_BAR"),
            CandlePattern::Doji => write!(f, "DOJI"),
            CandlePattern::Marubozu => write!(f, "MARUBOZU"),
            CandlePattern::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Classify the latest candle against its predecessor.
///
/// Thresholds are body/wick ratios of the candle range:
/// engulfing = opposite colors and the current body covers the previous
/// body; marubozu = body ≥ 95% of range; pin bar = one wick ≥ 2× body with
/// the other ≤ 1× body; doji = body ≤ 10% of range. Zero-range candles are
/// neutral.
pub fn classify(prev: Option<&Candle>, last: &Candle) -> CandlePattern {
    let range = last.range();
    if range <= 0.0 {
        return CandlePattern::Neutral;
    }
    let body = last.body();

    if let Some(prev) = prev {
        let opposite = last.is_bullish() != prev.is_bullish();
        let covers = last.open.max(last.close) >= prev.open.max(prev.close)
            && last.open.min(last.close) <= prev.open.min(prev.close);
        if opposite && prev.body() > 0.0 && covers && body > prev.body() {
            return CandlePattern::Engulfing;
        }
    }

    if body >= 0.95 * range {
        return CandlePattern::Marubozu;
    }

    let upper = last.high - last.open.max(last.close);
    let lower = last.open.min(last.close) - last.low;
    if body > 0.0 && (upper >= 2.0 * body && lower <= body || lower >= 2.0 * body && upper <= body)
    {
        return CandlePattern::PinBar;
    }

    if body <= 0.1 * range {
        return CandlePattern::Doji;
    }

    CandlePattern::Neutral
}
