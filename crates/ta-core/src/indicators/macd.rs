use serde::Serialize;

use super::ema::{ema, ema_series};

const FAST: usize = 12;
const SLOW: usize = 26;
const SIGNAL: usize = 9;

/// MACD line, signal line, and histogram for the last index of the window.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD(12, 26, 9): line = EMA12 − EMA26, signal = EMA9 of the line series,
/// histogram = line − signal. Empty input → all zeros.
pub fn macd(values: &[f64]) -> MacdOutput {
    if values.is_empty() {
        return MacdOutput {
            macd: 0.0,
            signal: 0.0,
            histogram: 0.0,
        };
    }

    let fast = ema_series(values, FAST);
    let slow = ema_series(values, SLOW);
    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

    let macd_value = *line.last().unwrap();
    let signal = ema(&line, SIGNAL);
    MacdOutput {
        macd: macd_value,
        signal,
        histogram: macd_value - signal,
    }
}
