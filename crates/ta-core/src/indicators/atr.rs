use crate::candle::Candle;

/// Average True Range — Wilder smoothing over the window's true ranges.
///
/// TR for the first bar falls back to high − low (no previous close).
/// Shorter than `period` → simple mean of the available TRs; empty → 0.
pub fn atr(candles: &[Candle], period: usize) -> f64 {
    if candles.is_empty() || period == 0 {
        return 0.0;
    }

    let mut prev_close: Option<f64> = None;
    let mut value = 0.0;
    let mut sum = 0.0;
    let mut count = 0usize;

    for candle in candles {
        let tr = match prev_close {
            Some(pc) => (candle.high - candle.low)
                .max((candle.high - pc).abs())
                .max((candle.low - pc).abs()),
            None => candle.high - candle.low,
        };
        prev_close = Some(candle.close);

        if count < period {
            sum += tr;
            count += 1;
            value = sum / count as f64;
        } else {
            // Wilder: ATR = (prev·(N−1) + TR) / N
            value = (value * (period as f64 - 1.0) + tr) / period as f64;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(high: f64, low: f64, close: f64) -> Candle {
        Candle {
            time: 0,
            open: close,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn empty_and_zero_period_are_zero() {
        assert_eq!(atr(&[], 14), 0.0);
        assert_eq!(atr(&[candle(101.0, 99.0, 100.0)], 0), 0.0);
    }

    #[test]
    fn single_bar_uses_high_minus_low() {
        assert!((atr(&[candle(102.0, 99.0, 100.0)], 14) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn constant_range_bars_converge_to_that_range() {
        let candles: Vec<Candle> = (0..50).map(|_| candle(101.0, 99.0, 100.0)).collect();
        assert!((atr(&candles, 14) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn gap_between_bars_widens_true_range() {
        // Second bar gaps up: TR = |high − prev_close| = 10.
        let candles = vec![candle(101.0, 99.0, 100.0), candle(110.0, 108.0, 109.0)];
        let expected = (2.0 + 10.0) / 2.0;
        assert!((atr(&candles, 14) - expected).abs() < 1e-12);
    }

    #[test]
    fn flat_bars_give_zero_atr() {
        let candles: Vec<Candle> = (0..30).map(|_| candle(100.0, 100.0, 100.0)).collect();
        assert_eq!(atr(&candles, 14), 0.0);
    }
}
