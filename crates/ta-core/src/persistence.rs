use std::sync::Mutex;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::signal::Direction;
use crate::timeframe::Timeframe;

/// Last observed direction and its consecutive-read count for one
/// (asset, timeframe) pair.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub direction: Direction,
    pub confirmation_count: u32,
    pub last_updated_ms: i64,
}

/// Debounce store for directional reads.
///
/// The only mutable state in the engine. Keyed per (asset, timeframe) so
/// assets and timeframes never cross-contaminate each other's streaks.
/// Gate aborts upstream of the persistence stage leave entries untouched.
#[derive(Debug, Default)]
pub struct SignalHistory {
    inner: Mutex<FxHashMap<(String, Timeframe), HistoryEntry>>,
}

impl SignalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directional read and return the updated consecutive count.
    ///
    /// Same direction as the stored entry increments the count; a different
    /// direction resets the streak to 1.
    pub fn observe(
        &self,
        asset: &str,
        timeframe: Timeframe,
        direction: Direction,
        now_ms: i64,
    ) -> u32 {
        let mut map = self.inner.lock().unwrap();
        let entry = map
            .entry((asset.to_string(), timeframe))
            .and_modify(|e| {
                if e.direction == direction {
                    e.confirmation_count += 1;
                } else {
                    e.direction = direction;
                    e.confirmation_count = 1;
                }
                e.last_updated_ms = now_ms;
            })
            .or_insert(HistoryEntry {
                direction,
                confirmation_count: 1,
                last_updated_ms: now_ms,
            });
        entry.confirmation_count
    }

    pub fn get(&self, asset: &str, timeframe: Timeframe) -> Option<HistoryEntry> {
        self.inner
            .lock()
            .unwrap()
            .get(&(asset.to_string(), timeframe))
            .cloned()
    }

    /// Drop the streak for one pair, e.g. when a subscription is removed.
    pub fn reset(&self, asset: &str, timeframe: Timeframe) {
        self.inner
            .lock()
            .unwrap()
            .remove(&(asset.to_string(), timeframe));
    }
}
