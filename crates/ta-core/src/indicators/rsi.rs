use super::{mean, tail};

/// Relative Strength Index over the trailing `period` deltas.
///
/// Average gain / average loss are simple means of the last `period`
/// close-to-close changes. Sentinels: 100 when the window has no losses,
/// 50 when there is not enough history (`len ≤ period`) or `period` is 0.
pub fn rsi(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() <= period {
        return 50.0;
    }

    let window = &values[values.len() - period - 1..];
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum -= change;
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Per-index RSI values: element `i` is `rsi(values[..=i], period)`.
pub fn rsi_series(values: &[f64], period: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| rsi(&values[..=i], period))
        .collect()
}

/// Stochastic RSI — %K/%D in [0, 100].
///
/// %K = position of the latest RSI within its trailing `period` min/max
/// range, SMA-smoothed over `k_smooth`; %D = SMA of %K over `d_smooth`.
/// Short or flat input (zero RSI range) → 50/50.
pub fn stochastic_rsi(
    values: &[f64],
    period: usize,
    k_smooth: usize,
    d_smooth: usize,
) -> (f64, f64) {
    if period == 0 || values.len() <= period {
        return (50.0, 50.0);
    }

    let rsis = rsi_series(values, period);

    // Raw stochastic of the RSI series, one value per index once the RSI
    // window has filled.
    let mut raw: Vec<f64> = Vec::new();
    for i in period..rsis.len() {
        let window = &rsis[i + 1 - period..=i];
        let min = window.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = window.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let range = max - min;
        raw.push(if range > 0.0 {
            (rsis[i] - min) / range * 100.0
        } else {
            50.0
        });
    }
    if raw.is_empty() {
        return (50.0, 50.0);
    }

    // SMA smoothing of %K, then %D as SMA of the smoothed %K tail.
    let k_series: Vec<f64> = (0..raw.len())
        .map(|i| mean(tail(&raw[..=i], k_smooth.max(1))))
        .collect();
    let k = *k_series.last().unwrap();
    let d = mean(tail(&k_series, d_smooth.max(1)));
    (k, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_is_always_within_bounds() {
        let mut values = vec![100.0];
        for i in 1..200 {
            // Alternating noisy walk.
            let prev = values[i - 1];
            values.push(if i % 3 == 0 { prev - 1.7 } else { prev + 0.9 });
        }
        for i in 0..values.len() {
            let v = rsi(&values[..=i], 14);
            assert!((0.0..=100.0).contains(&v), "rsi out of bounds: {v}");
        }
    }

    #[test]
    fn rsi_is_100_iff_no_losses_in_window() {
        let rising: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&rising, 14), 100.0);

        let mut with_dip = rising.clone();
        with_dip[28] = 90.0; // a loss inside the trailing window
        assert!(rsi(&with_dip, 14) < 100.0);
    }

    #[test]
    fn rsi_is_neutral_on_insufficient_history() {
        let values: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&values, 14), 50.0); // len == period is not enough
        assert_eq!(rsi(&[], 14), 50.0);
        assert_eq!(rsi(&values, 0), 50.0);
    }

    #[test]
    fn flat_series_reads_as_100() {
        // No losses at all — the documented avg_loss == 0 sentinel.
        let flat = vec![100.0; 40];
        assert_eq!(rsi(&flat, 14), 100.0);
    }

    #[test]
    fn stochastic_rsi_neutral_on_short_or_flat_input() {
        assert_eq!(stochastic_rsi(&[100.0; 10], 14, 3, 3), (50.0, 50.0));
        let flat = vec![100.0; 60];
        let (k, d) = stochastic_rsi(&flat, 14, 3, 3);
        assert_eq!(k, 50.0);
        assert_eq!(d, 50.0);
    }

    #[test]
    fn stochastic_rsi_tracks_momentum_extremes() {
        let mut values: Vec<f64> = (0..40).map(|i| 100.0 - i as f64 * 0.5).collect();
        values.extend((0..20).map(|i| 80.0 + i as f64)); // sharp reversal up
        let (k, d) = stochastic_rsi(&values, 14, 3, 3);
        assert!(k > 60.0, "k should sit high after a strong up-move: {k}");
        assert!((0.0..=100.0).contains(&k));
        assert!((0.0..=100.0).contains(&d));
    }
}
