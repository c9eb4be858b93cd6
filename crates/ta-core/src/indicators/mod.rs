pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volume;

use serde::Serialize;

use crate::candle::Candle;
use crate::config::EngineConfig;

/// Arithmetic mean; 0 for empty input.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof=0); 0 for empty input.
pub(crate) fn std_pop(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Trailing window of at most `len` elements.
pub(crate) fn tail(values: &[f64], len: usize) -> &[f64] {
    let start = values.len().saturating_sub(len);
    &values[start..]
}

/// Trailing candle window of at most `len` elements.
pub(crate) fn tail_candles(candles: &[Candle], len: usize) -> &[Candle] {
    let start = candles.len().saturating_sub(len);
    &candles[start..]
}

/// Snapshot of every indicator for the current evaluation window.
///
/// Computed fresh per evaluation — no state is carried between ticks.
/// Serialized alongside the emitted signal for the transport collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub macd: macd::MacdOutput,
    pub bollinger: bollinger::BollingerOutput,
    pub stoch_rsi_k: f64,
    pub stoch_rsi_d: f64,
    pub atr: f64,
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub volume_sma: f64,
    pub volume_poc: f64,
}

/// Compute all indicator values over a bucket window.
pub fn compute_snapshot(buckets: &[Candle], cfg: &EngineConfig) -> IndicatorSnapshot {
    let closes: Vec<f64> = buckets.iter().map(|c| c.close).collect();
    let close = closes.last().copied().unwrap_or(0.0);

    let adx_out = adx::adx(buckets, cfg.adx_period);
    let (stoch_k, stoch_d) = rsi::stochastic_rsi(
        &closes,
        cfg.stoch_rsi_period,
        cfg.stoch_smooth_k,
        cfg.stoch_smooth_d,
    );
    let volumes: Vec<f64> = buckets.iter().map(|c| c.volume).collect();

    IndicatorSnapshot {
        close,
        ema_fast: ema::ema(&closes, cfg.ema_fast_period),
        ema_slow: ema::ema(&closes, cfg.ema_slow_period),
        rsi: rsi::rsi(&closes, cfg.rsi_period),
        macd: macd::macd(&closes),
        bollinger: bollinger::bollinger(&closes, cfg.bb_period, cfg.bb_std),
        stoch_rsi_k: stoch_k,
        stoch_rsi_d: stoch_d,
        atr: atr::atr(buckets, cfg.atr_period),
        adx: adx_out.adx,
        plus_di: adx_out.plus_di,
        minus_di: adx_out.minus_di,
        volume_sma: mean(tail(&volumes, cfg.volume_avg_window)),
        volume_poc: volume::volume_profile(buckets, cfg.volume_profile_bins).poc,
    }
}
