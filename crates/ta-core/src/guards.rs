use serde::Serialize;

use crate::candle::Candle;
use crate::config::EngineConfig;
use crate::indicators::bollinger::bollinger;
use crate::indicators::{mean, tail};
use crate::signal::RiskLevel;

/// Volatility annotation for the current window. Informational — the
/// engine never blocks emission on it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolatilityReport {
    /// Composite 0–100 volatility score.
    pub score: f64,
    /// Wick-to-body ratio of the latest bucket.
    pub wick_ratio: f64,
    /// Latest volume relative to the trailing volume average (1.0 = average).
    pub volume_ratio: f64,
    /// True when any single condition flags the market unsafe.
    pub unsafe_market: bool,
}

/// Flag unsafe volatility: wick/body > 2.5, volume > 200% of the trailing
/// average, or composite score > 75.
pub fn volatility(buckets: &[Candle], cfg: &EngineConfig) -> VolatilityReport {
    let Some(last) = buckets.last() else {
        return VolatilityReport {
            score: 0.0,
            wick_ratio: 0.0,
            volume_ratio: 1.0,
            unsafe_market: false,
        };
    };

    let wick_ratio = last.wick_body_ratio();

    let volumes: Vec<f64> = buckets.iter().map(|c| c.volume).collect();
    let vol_avg = mean(tail(&volumes, cfg.volume_avg_window));
    let volume_ratio = if vol_avg > 0.0 {
        last.volume / vol_avg
    } else {
        1.0
    };

    let closes: Vec<f64> = buckets.iter().map(|c| c.close).collect();
    let bandwidth = bollinger(&closes, cfg.bb_period, cfg.bb_std).bandwidth;

    // Composite: each component saturates at its own "clearly extreme" level.
    let score = 40.0 * (wick_ratio / 2.5).clamp(0.0, 1.0)
        + 30.0 * (volume_ratio / 2.0).clamp(0.0, 1.0)
        + 30.0 * (bandwidth / 10.0).clamp(0.0, 1.0);

    VolatilityReport {
        score,
        wick_ratio,
        volume_ratio,
        unsafe_market: wick_ratio > 2.5 || volume_ratio > 2.0 || score > 75.0,
    }
}

/// Reversal-trap score, 0–100. Sums three independent warnings:
/// RSI/price divergence (+30), volume/range divergence (+30), extreme wick
/// ratio (+20). Annotates risk only; never blocks.
pub fn reversal_trap(buckets: &[Candle], cfg: &EngineConfig) -> f64 {
    if buckets.len() < 2 {
        return 0.0;
    }
    let last = &buckets[buckets.len() - 1];
    let prev = &buckets[buckets.len() - 2];

    let closes: Vec<f64> = buckets.iter().map(|c| c.close).collect();
    let rsi_now = crate::indicators::rsi::rsi(&closes, cfg.rsi_period);
    let rsi_prev = crate::indicators::rsi::rsi(&closes[..closes.len() - 1], cfg.rsi_period);

    let mut score = 0.0;

    // Price pushes a new extreme while momentum fades.
    let higher_high_fading = last.high > prev.high && rsi_now < rsi_prev;
    let lower_low_recovering = last.low < prev.low && rsi_now > rsi_prev;
    if higher_high_fading || lower_low_recovering {
        score += 30.0;
    }

    // Range expands without the volume to back it.
    if last.range() > 1.5 * prev.range() && last.volume < prev.volume {
        score += 30.0;
    }

    if last.wick_body_ratio() > 3.0 {
        score += 20.0;
    }

    score
}

/// Fold guard annotations into a risk level for the emitted signal.
pub fn risk_level(vol: &VolatilityReport, trap_score: f64) -> RiskLevel {
    if vol.unsafe_market || trap_score >= 50.0 {
        RiskLevel::High
    } else if trap_score >= 30.0 || vol.score > 50.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Human-readable warning for the signal, or `None` when nothing is flagged.
pub fn warning(vol: &VolatilityReport, trap_score: f64) -> Option<String> {
    let mut notes: Vec<String> = Vec::new();
    if vol.unsafe_market {
        notes.push(format!("unsafe volatility (score {:.0})", vol.score));
    }
    if trap_score >= 30.0 {
        notes.push(format!("possible reversal trap (score {trap_score:.0})"));
    }
    if notes.is_empty() {
        None
    } else {
        Some(notes.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm_candle(i: i64) -> Candle {
        Candle {
            time: i * 60_000,
            open: 100.0,
            high: 100.6,
            low: 99.6,
            close: 100.5,
            volume: 10.0,
        }
    }

    #[test]
    fn calm_market_is_not_flagged() {
        let buckets: Vec<Candle> = (0..30).map(calm_candle).collect();
        let report = volatility(&buckets, &EngineConfig::default());
        assert!(!report.unsafe_market);
        assert!(report.score < 75.0);
        assert_eq!(risk_level(&report, 0.0), RiskLevel::Low);
        assert!(warning(&report, 0.0).is_none());
    }

    #[test]
    fn volume_spike_flags_unsafe() {
        let mut buckets: Vec<Candle> = (0..30).map(calm_candle).collect();
        buckets.last_mut().unwrap().volume = 35.0; // 3.5x the trailing average
        let report = volatility(&buckets, &EngineConfig::default());
        assert!(report.volume_ratio > 2.0);
        assert!(report.unsafe_market);
        assert_eq!(risk_level(&report, 0.0), RiskLevel::High);
    }

    #[test]
    fn long_wicks_flag_unsafe() {
        let mut buckets: Vec<Candle> = (0..30).map(calm_candle).collect();
        let last = buckets.last_mut().unwrap();
        last.open = 100.0;
        last.close = 100.1;
        last.high = 101.5;
        last.low = 99.0; // wick 2.4, body 0.1
        let report = volatility(&buckets, &EngineConfig::default());
        assert!(report.wick_ratio > 2.5);
        assert!(report.unsafe_market);
        assert!(warning(&report, 0.0).unwrap().contains("volatility"));
    }

    #[test]
    fn empty_window_is_a_quiet_report() {
        let report = volatility(&[], &EngineConfig::default());
        assert_eq!(report.score, 0.0);
        assert!(!report.unsafe_market);
    }

    #[test]
    fn reversal_trap_scores_divergences() {
        // Rising closes but the final bucket pushes a higher high on a huge
        // low-volume range with long wicks.
        let mut buckets: Vec<Candle> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.5;
                Candle {
                    time: i * 60_000,
                    open: base,
                    high: base + 0.6,
                    low: base - 0.4,
                    close: base + 0.5,
                    volume: 10.0,
                }
            })
            .collect();
        let last = buckets.last_mut().unwrap();
        last.high += 6.0;
        last.low -= 4.0;
        last.close = last.open + 0.1; // close barely moves: all wick
        last.volume = 2.0;

        let score = reversal_trap(&buckets, &EngineConfig::default());
        assert!(score >= 50.0, "expected a trap flag, got {score}");
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn reversal_trap_is_zero_on_short_windows() {
        assert_eq!(reversal_trap(&[], &EngineConfig::default()), 0.0);
        assert_eq!(reversal_trap(&[calm_candle(0)], &EngineConfig::default()), 0.0);
    }
}
