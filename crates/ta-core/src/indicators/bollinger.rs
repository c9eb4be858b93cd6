use serde::Serialize;

use super::{mean, std_pop, tail};

/// Bollinger Bands over the trailing window, plus the derived %B and
/// bandwidth used by the confluence votes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// Position of the last price inside the band, normalized to [0, 1]
    /// (clamped). 0.5 when the band has zero width.
    pub percent_b: f64,
    /// Band width as a percentage of the middle band. 0 when the middle
    /// band is 0.
    pub bandwidth: f64,
}

/// Middle = SMA(period), bands = middle ± k·σ (population). Short input
/// uses whatever is available; empty input → all zeros with %B 0.5.
pub fn bollinger(values: &[f64], period: usize, k: f64) -> BollingerOutput {
    if values.is_empty() {
        return BollingerOutput {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
            percent_b: 0.5,
            bandwidth: 0.0,
        };
    }

    let window = tail(values, period.max(1));
    let middle = mean(window);
    let std = std_pop(window);
    let upper = middle + k * std;
    let lower = middle - k * std;

    let price = *values.last().unwrap();
    let width = upper - lower;
    let percent_b = if width > 0.0 {
        ((price - lower) / width).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let bandwidth = if middle != 0.0 { width / middle * 100.0 } else { 0.0 };

    BollingerOutput {
        upper,
        middle,
        lower,
        percent_b,
        bandwidth,
    }
}
