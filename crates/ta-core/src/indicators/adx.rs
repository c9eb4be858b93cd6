use crate::candle::Candle;

use super::ema::{ema, ema_series};

/// Final ADX / DI values for a window.
#[derive(Debug, Clone, Copy)]
pub struct AdxOutput {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

impl AdxOutput {
    fn zero() -> Self {
        Self {
            adx: 0.0,
            plus_di: 0.0,
            minus_di: 0.0,
        }
    }
}

/// Average Directional Index over a candle window.
///
/// 1. +DM/−DM from consecutive high/low deltas, TR per bar
/// 2. EMA(`period`)-smooth +DM, −DM and TR
/// 3. ±DI = smoothed ±DM / smoothed TR · 100 (0 when TR is 0)
/// 4. DX = |+DI − −DI| / (+DI + −DI) · 100 (0 when the sum is 0)
/// 5. ADX = EMA(`period`) of the DX series
///
/// Fewer than two candles → all zeros (no directional movement exists).
pub fn adx(candles: &[Candle], period: usize) -> AdxOutput {
    if candles.len() < 2 || period == 0 {
        return AdxOutput::zero();
    }

    let n = candles.len() - 1;
    let mut plus_dm = Vec::with_capacity(n);
    let mut minus_dm = Vec::with_capacity(n);
    let mut tr = Vec::with_capacity(n);

    for pair in candles.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let up_move = cur.high - prev.high;
        let down_move = prev.low - cur.low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
        tr.push(
            (cur.high - cur.low)
                .max((cur.high - prev.close).abs())
                .max((cur.low - prev.close).abs()),
        );
    }

    let smooth_plus = ema_series(&plus_dm, period);
    let smooth_minus = ema_series(&minus_dm, period);
    let smooth_tr = ema_series(&tr, period);

    // Per-index DI and DX so ADX can smooth the DX series itself.
    let mut dx = Vec::with_capacity(n);
    let mut plus_di = 0.0;
    let mut minus_di = 0.0;
    for i in 0..n {
        let denom_tr = smooth_tr[i];
        plus_di = if denom_tr > 0.0 {
            smooth_plus[i] / denom_tr * 100.0
        } else {
            0.0
        };
        minus_di = if denom_tr > 0.0 {
            smooth_minus[i] / denom_tr * 100.0
        } else {
            0.0
        };
        let di_sum = plus_di + minus_di;
        dx.push(if di_sum > 0.0 {
            (plus_di - minus_di).abs() / di_sum * 100.0
        } else {
            0.0
        });
    }

    AdxOutput {
        adx: ema(&dx, period),
        plus_di,
        minus_di,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: i64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            time: i * 60_000,
            open: close,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn too_few_candles_is_all_zero() {
        assert_eq!(adx(&[], 14).adx, 0.0);
        assert_eq!(adx(&[candle(0, 101.0, 99.0, 100.0)], 14).adx, 0.0);
    }

    #[test]
    fn flat_market_reads_near_zero_adx() {
        let candles: Vec<Candle> = (0..30).map(|i| candle(i, 100.0, 100.0, 100.0)).collect();
        let out = adx(&candles, 14);
        assert!(out.adx.abs() < 1e-9, "flat market must not trend: {}", out.adx);
        assert!(out.adx.is_finite());
        assert_eq!(out.plus_di, 0.0);
        assert_eq!(out.minus_di, 0.0);
    }

    #[test]
    fn one_directional_march_saturates_dx() {
        // Every bar makes a higher high and a higher low: −DM is always 0,
        // so DX = 100 at every index and ADX converges to 100.
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64;
                candle(i, base + 1.0, base - 1.0, base)
            })
            .collect();
        let out = adx(&candles, 14);
        assert!(out.adx > 90.0, "got {}", out.adx);
        assert!(out.plus_di > out.minus_di);
        assert_eq!(out.minus_di, 0.0);
    }

    #[test]
    fn downtrend_flips_the_di_ordering() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let base = 200.0 - i as f64;
                candle(i, base + 1.0, base - 1.0, base)
            })
            .collect();
        let out = adx(&candles, 14);
        assert!(out.minus_di > out.plus_di);
        assert!(out.adx > 25.0);
    }
}
