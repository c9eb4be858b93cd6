use std::sync::RwLock;

use rustc_hash::FxHashMap;

use ta_core::{Candle, CandleSeries, EngineError, Timeframe};

/// Shared store of base (1m) candle series, one per asset.
///
/// Writers push ticks as they arrive; readers take a cloned snapshot per
/// evaluation so indicator math never runs under the lock. Out-of-order
/// candles are dropped by the series itself, and each series is capped so
/// memory stays proportional to the configured lookback.
#[derive(Debug)]
pub struct CandleFeed {
    cap: usize,
    series: RwLock<FxHashMap<String, CandleSeries>>,
}

impl CandleFeed {
    /// `cap` is the maximum number of base candles retained per asset. Size
    /// it to cover the engine lookback on the longest subscribed timeframe.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            series: RwLock::new(FxHashMap::default()),
        }
    }

    /// Append a base candle for an asset, creating the series on first
    /// sight. Returns `false` when the candle was dropped as out-of-order.
    pub fn push(&self, asset: &str, candle: Candle) -> bool {
        let mut map = self.series.write().unwrap();
        let series = map
            .entry(asset.to_string())
            .or_insert_with(|| CandleSeries::new(asset, Timeframe::M1));
        let accepted = series.push(candle);
        if accepted {
            series.truncate_front(self.cap);
        }
        accepted
    }

    /// Cloned snapshot of an asset's base candles.
    pub fn snapshot(&self, asset: &str) -> Result<Vec<Candle>, EngineError> {
        self.series
            .read()
            .unwrap()
            .get(asset)
            .map(|s| s.candles().to_vec())
            .ok_or_else(|| EngineError::UnknownAsset(asset.to_string()))
    }

    pub fn assets(&self) -> Vec<String> {
        self.series.read().unwrap().keys().cloned().collect()
    }

    pub fn len(&self, asset: &str) -> usize {
        self.series
            .read()
            .unwrap()
            .get(asset)
            .map(|s| s.len())
            .unwrap_or(0)
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
    fn push_and_snapshot_round_trip() {
        let feed = CandleFeed::new(100);
        assert!(feed.push("BTC", candle(60_000, 100.0)));
        assert!(feed.push("BTC", candle(120_000, 101.0)));

        let snap = feed.snapshot("BTC").unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[1].close, 101.0);
    }

    #[test]
    fn out_of_order_candles_are_dropped() {
        let feed = CandleFeed::new(100);
        feed.push("BTC", candle(120_000, 100.0));
        assert!(!feed.push("BTC", candle(60_000, 99.0)));
        assert!(!feed.push("BTC", candle(120_000, 99.0)));
        assert_eq!(feed.len("BTC"), 1);
    }

    #[test]
    fn cap_bounds_retained_history() {
        let feed = CandleFeed::new(5);
        for i in 0..20 {
            feed.push("BTC", candle(i * 60_000, 100.0 + i as f64));
        }
        let snap = feed.snapshot("BTC").unwrap();
        assert_eq!(snap.len(), 5);
        assert_eq!(snap[0].close, 115.0);
    }

    #[test]
    fn unknown_asset_is_an_error() {
        let feed = CandleFeed::new(5);
        assert!(matches!(
            feed.snapshot("DOGE"),
            Err(EngineError::UnknownAsset(_))
        ));
    }
}
