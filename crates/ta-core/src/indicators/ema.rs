use super::mean;

/// Exponential Moving Average over a value window.
///
/// Seed = simple mean of the first `period` values, then the recurrence
/// `v = price·k + v_prev·(1−k)` with `k = 2/(period+1)`.
///
/// Degenerate input: empty → 0; shorter than `period` → the seed collapses
/// to the mean of whatever is available (identical to the last value on a
/// constant series); `period` 0 → last value.
pub fn ema(values: &[f64], period: usize) -> f64 {
    ema_series(values, period).last().copied().unwrap_or(0.0)
}

/// Per-index EMA values: element `i` is the EMA of `values[..=i]`.
///
/// Indices below `period` carry the expanding seed mean, so the value at
/// `period − 1` is exactly the SMA seed the recurrence starts from.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    if period == 0 {
        return values.to_vec();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;

    for (i, &price) in values.iter().enumerate() {
        if i < period {
            // Expanding mean until the seed window fills.
            acc = mean(&values[..=i]);
        } else {
            acc = price * k + acc * (1.0 - k);
        }
        out.push(acc);
    }
    out
}
