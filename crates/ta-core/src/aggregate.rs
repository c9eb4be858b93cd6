use crate::candle::Candle;
use crate::timeframe::Timeframe;

/// Roll a base-resolution candle sequence up into `timeframe` buckets.
///
/// Bucket key is `floor(time / duration) * duration`. Per bucket:
/// open = first open, high/low = extrema, close = last close,
/// volume = sum. Input gaps simply produce sparser buckets; the final
/// bucket may represent a still-open period. No look-ahead: a bucket only
/// ever contains candles whose time falls inside it.
pub fn aggregate(base: &[Candle], timeframe: Timeframe) -> Vec<Candle> {
    let duration = timeframe.duration_ms();
    let mut out: Vec<Candle> = Vec::new();

    for candle in base {
        let bucket_time = candle.time.div_euclid(duration) * duration;
        match out.last_mut() {
            Some(bucket) if bucket.time == bucket_time => {
                bucket.high = bucket.high.max(candle.high);
                bucket.low = bucket.low.min(candle.low);
                bucket.close = candle.close;
                bucket.volume += candle.volume;
            }
            _ => out.push(Candle {
                time: bucket_time,
                open: candle.open,
                high: candle.high,
                low: candle.low,
                close: candle.close,
                volume: candle.volume,
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minute_candle(i: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle {
            time: i * 60_000,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn sixty_minutes_roll_into_one_hour_bucket() {
        let base: Vec<Candle> = (0..60)
            .map(|i| {
                let price = 100.0 + i as f64;
                minute_candle(i, price, price + 2.0, price - 1.0, price + 0.5, 10.0)
            })
            .collect();

        let buckets = aggregate(&base, Timeframe::H1);
        assert_eq!(buckets.len(), 1);
        let b = &buckets[0];
        assert_eq!(b.time, 0);
        assert_eq!(b.open, 100.0); // first candle's open
        assert_eq!(b.close, 159.0 + 0.5); // last candle's close
        assert_eq!(b.high, 159.0 + 2.0); // max across all 60
        assert_eq!(b.low, 99.0); // min across all 60
        assert_eq!(b.volume, 600.0); // summed
    }

    #[test]
    fn gaps_produce_sparser_buckets_not_errors() {
        // Minutes 0..3 then 17..19: two 5m buckets, the second from minute 15.
        let mut base: Vec<Candle> = (0..3)
            .map(|i| minute_candle(i, 100.0, 101.0, 99.0, 100.0, 1.0))
            .collect();
        base.extend((17..20).map(|i| minute_candle(i, 105.0, 106.0, 104.0, 105.0, 1.0)));

        let buckets = aggregate(&base, Timeframe::M5);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].time, 0);
        assert_eq!(buckets[1].time, 15 * 60_000);
        assert_eq!(buckets[1].volume, 3.0);
    }

    #[test]
    fn final_bucket_may_be_partial() {
        let base: Vec<Candle> = (0..7)
            .map(|i| minute_candle(i, 100.0, 101.0, 99.0, 100.0, 1.0))
            .collect();
        let buckets = aggregate(&base, Timeframe::M5);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].volume, 2.0); // only minutes 5 and 6 so far
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate(&[], Timeframe::M5).is_empty());
    }
}
