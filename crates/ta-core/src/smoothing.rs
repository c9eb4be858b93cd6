use crate::candle::Candle;

/// Heiken-Ashi transform — denoises a candle series before trend filtering.
///
/// `ha_close = (o+h+l+c)/4`; `ha_open_i = (ha_open_{i−1} + ha_close_{i−1})/2`
/// seeded with the first real open; `ha_high`/`ha_low` expand to cover the
/// synthetic open/close. Time and volume pass through unchanged so
/// downstream joins against the raw series stay valid.
pub fn heiken_ashi(candles: &[Candle]) -> Vec<Candle> {
    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());

    for (i, c) in candles.iter().enumerate() {
        let ha_close = (c.open + c.high + c.low + c.close) / 4.0;
        let ha_open = if i == 0 {
            c.open
        } else {
            let prev = &out[i - 1];
            (prev.open + prev.close) / 2.0
        };
        out.push(Candle {
            time: c.time,
            open: ha_open,
            high: c.high.max(ha_open).max(ha_close),
            low: c.low.min(ha_open).min(ha_close),
            close: ha_close,
            volume: c.volume,
        });
    }
    out
}
