use serde::Serialize;

use crate::candle::Candle;

/// One price bin of the volume histogram.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolumeBin {
    pub price_low: f64,
    pub price_high: f64,
    pub volume: f64,
}

/// Binned volume histogram over a candle window.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeProfile {
    /// Point of control — center of the bin holding the most volume.
    pub poc: f64,
    pub bins: Vec<VolumeBin>,
}

/// Build a volume profile by distributing each candle's volume into the bin
/// containing its typical price ((h+l+c)/3).
///
/// Degenerate input: empty window → poc 0, no bins; zero price range →
/// a single bin at that price.
pub fn volume_profile(candles: &[Candle], bins: usize) -> VolumeProfile {
    if candles.is_empty() || bins == 0 {
        return VolumeProfile {
            poc: 0.0,
            bins: Vec::new(),
        };
    }

    let min = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let max = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range <= 0.0 {
        let volume: f64 = candles.iter().map(|c| c.volume).sum();
        return VolumeProfile {
            poc: min,
            bins: vec![VolumeBin {
                price_low: min,
                price_high: max,
                volume,
            }],
        };
    }

    let bin_size = range / bins as f64;
    let mut histogram = vec![0.0f64; bins];
    for candle in candles {
        let typical = (candle.high + candle.low + candle.close) / 3.0;
        let idx = (((typical - min) / bin_size) as usize).min(bins - 1);
        histogram[idx] += candle.volume;
    }

    let mut poc_idx = 0;
    for (i, &v) in histogram.iter().enumerate() {
        if v > histogram[poc_idx] {
            poc_idx = i;
        }
    }

    let bins_out = histogram
        .iter()
        .enumerate()
        .map(|(i, &volume)| VolumeBin {
            price_low: min + i as f64 * bin_size,
            price_high: min + (i + 1) as f64 * bin_size,
            volume,
        })
        .collect();

    VolumeProfile {
        poc: min + (poc_idx as f64 + 0.5) * bin_size,
        bins: bins_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(price: f64, volume: f64) -> Candle {
        Candle {
            time: 0,
            open: price,
            high: price + 0.5,
            low: price - 0.5,
            close: price,
            volume,
        }
    }

    #[test]
    fn empty_window_is_the_documented_sentinel() {
        let profile = volume_profile(&[], 12);
        assert_eq!(profile.poc, 0.0);
        assert!(profile.bins.is_empty());
    }

    #[test]
    fn zero_range_collapses_to_a_single_bin() {
        let flat = vec![
            Candle {
                time: 0,
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume: 7.0,
            };
            5
        ];
        let profile = volume_profile(&flat, 12);
        assert_eq!(profile.bins.len(), 1);
        assert_eq!(profile.poc, 100.0);
        assert_eq!(profile.bins[0].volume, 35.0);
    }

    #[test]
    fn poc_lands_in_the_heaviest_bin() {
        // Most volume clusters around 110.
        let mut candles: Vec<Candle> = (0..10).map(|i| candle(100.0 + i as f64, 1.0)).collect();
        candles.extend((0..5).map(|_| candle(110.0, 20.0)));
        let profile = volume_profile(&candles, 10);
        assert!(
            (profile.poc - 110.0).abs() < 2.0,
            "poc should sit near the volume cluster: {}",
            profile.poc
        );
        let total: f64 = profile.bins.iter().map(|b| b.volume).sum();
        assert!((total - 110.0).abs() < 1e-9);
    }
}
