use serde::{Deserialize, Serialize};

use crate::timeframe::Timeframe;

/// OHLCV candle — contiguous layout, cheap to copy.
///
/// `time` is the bucket open time in ms since epoch. A candle is immutable
/// once its bucket has closed; the most recent candle in a series may still
/// be open while new base ticks arrive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Candle body size (absolute open→close move).
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full high→low range.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Combined upper + lower wick length.
    pub fn wick(&self) -> f64 {
        self.range() - self.body()
    }

    /// Wick-to-body ratio; body of zero maps to the wick length itself so a
    /// pure-wick bar still reads as extreme rather than dividing by zero.
    pub fn wick_body_ratio(&self) -> f64 {
        let body = self.body();
        if body > 0.0 {
            self.wick() / body
        } else {
            self.wick()
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Ordered, time-ascending candle sequence scoped to one (asset, timeframe).
///
/// `push` enforces the append-only contract: any candle whose timestamp is
/// not strictly newer than the last-seen timestamp is dropped, so an
/// out-of-order feed can never corrupt aggregation state downstream.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    pub asset: String,
    pub timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(asset: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            asset: asset.into(),
            timeframe,
            candles: Vec::new(),
        }
    }

    /// Append a candle. Returns `false` (and drops it) when the timestamp is
    /// not newer than the last-seen one.
    pub fn push(&mut self, candle: Candle) -> bool {
        if let Some(last) = self.candles.last() {
            if candle.time <= last.time {
                tracing::debug!(
                    asset = %self.asset,
                    last = last.time,
                    got = candle.time,
                    "dropping out-of-order candle"
                );
                return false;
            }
        }
        self.candles.push(candle);
        true
    }

    /// Drop the oldest candles so at most `cap` remain.
    pub fn truncate_front(&mut self, cap: usize) {
        if self.candles.len() > cap {
            let excess = self.candles.len() - cap;
            self.candles.drain(..excess);
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last_time(&self) -> Option<i64> {
        self.candles.last().map(|c| c.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, close: f64) -> Candle {
        Candle {
            time,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn push_rejects_stale_and_duplicate_timestamps() {
        let mut series = CandleSeries::new("BTC", Timeframe::M1);
        assert!(series.push(candle(60_000, 100.0)));
        assert!(series.push(candle(120_000, 101.0)));

        // Duplicate and stale timestamps are dropped, state untouched.
        assert!(!series.push(candle(120_000, 999.0)));
        assert!(!series.push(candle(60_000, 999.0)));
        assert_eq!(series.len(), 2);
        assert_eq!(series.last_time(), Some(120_000));
        assert_eq!(series.candles()[1].close, 101.0);
    }

    #[test]
    fn truncate_front_keeps_newest() {
        let mut series = CandleSeries::new("BTC", Timeframe::M1);
        for i in 0..10 {
            series.push(candle(i * 60_000, 100.0 + i as f64));
        }
        series.truncate_front(4);
        assert_eq!(series.len(), 4);
        assert_eq!(series.candles()[0].close, 106.0);
    }

    #[test]
    fn wick_body_ratio_handles_zero_body() {
        let doji = Candle {
            time: 0,
            open: 100.0,
            high: 103.0,
            low: 99.0,
            close: 100.0,
            volume: 1.0,
        };
        assert!(doji.wick_body_ratio().is_finite());
        assert!((doji.wick_body_ratio() - 4.0).abs() < 1e-12);
    }
}
