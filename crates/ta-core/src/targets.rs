use serde::Serialize;

use crate::candle::Candle;
use crate::config::EngineConfig;
use crate::indicators::atr::atr;
use crate::indicators::tail_candles;
use crate::signal::Direction;

const SCALP_ATR: f64 = 0.8;
const MID_ATR: f64 = 1.8;
const BIG_ATR: f64 = 3.0;

/// ATR-derived take-profit tiers, ordered scalp < mid < big in distance
/// from the current price in the trade direction.
#[derive(Debug, Clone, Serialize)]
pub struct Targets {
    pub scalp: f64,
    pub mid: f64,
    pub big: f64,
    pub label: String,
}

impl Targets {
    /// SIDEWAYS: all tiers collapse to the current price.
    pub fn neutral(price: f64) -> Self {
        Self {
            scalp: price,
            mid: price,
            big: price,
            label: "Neutral".to_string(),
        }
    }
}

/// Derive direction-aware targets from ATR over the trailing target window.
pub fn derive(buckets: &[Candle], direction: Direction, cfg: &EngineConfig) -> Targets {
    let price = buckets.last().map(|c| c.close).unwrap_or(0.0);
    let sign = match direction {
        Direction::Up => 1.0,
        Direction::Down => -1.0,
        Direction::Sideways => return Targets::neutral(price),
    };

    let window = tail_candles(buckets, cfg.target_window);
    let atr_value = atr(window, cfg.atr_period);

    Targets {
        scalp: price + sign * SCALP_ATR * atr_value,
        mid: price + sign * MID_ATR * atr_value,
        big: price + sign * BIG_ATR * atr_value,
        label: match direction {
            Direction::Up => "Long",
            Direction::Down => "Short",
            Direction::Sideways => unreachable!(),
        }
        .to_string(),
    }
}
