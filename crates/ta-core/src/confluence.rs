use serde::Serialize;

use crate::indicators::IndicatorSnapshot;
use crate::signal::Direction;

/// One indicator's directional vote.
#[derive(Debug, Clone, Serialize)]
pub struct Vote {
    pub name: &'static str,
    pub direction: Direction,
}

/// Outcome of the single-timeframe confluence vote.
#[derive(Debug, Clone, Serialize)]
pub struct ConfluenceResult {
    pub direction: Direction,
    /// max(bull, bear) / 5 · 100.
    pub percent: f64,
    pub votes: Vec<Vote>,
}

/// Score five independent directional votes on the primary timeframe.
///
/// Direction requires the winning side to hold at least 2 votes; otherwise
/// SIDEWAYS. Callers suppress emission entirely below the confluence
/// threshold.
pub fn score(snap: &IndicatorSnapshot) -> ConfluenceResult {
    let votes = vec![
        Vote {
            name: "ema_cross",
            direction: if snap.ema_fast > snap.ema_slow {
                Direction::Up
            } else if snap.ema_fast < snap.ema_slow {
                Direction::Down
            } else {
                Direction::Sideways
            },
        },
        Vote {
            name: "rsi",
            direction: if snap.rsi > 55.0 {
                Direction::Up
            } else if snap.rsi < 45.0 {
                Direction::Down
            } else {
                Direction::Sideways
            },
        },
        Vote {
            name: "macd",
            direction: if snap.macd.histogram > 0.0 {
                Direction::Up
            } else if snap.macd.histogram < 0.0 {
                Direction::Down
            } else {
                Direction::Sideways
            },
        },
        Vote {
            name: "bollinger",
            direction: if snap.bollinger.percent_b > 0.6 {
                Direction::Up
            } else if snap.bollinger.percent_b < 0.4 {
                Direction::Down
            } else {
                Direction::Sideways
            },
        },
        Vote {
            name: "stoch_rsi",
            direction: if snap.stoch_rsi_k > 60.0 {
                Direction::Up
            } else if snap.stoch_rsi_k < 40.0 {
                Direction::Down
            } else {
                Direction::Sideways
            },
        },
    ];

    let bull = votes.iter().filter(|v| v.direction == Direction::Up).count();
    let bear = votes.iter().filter(|v| v.direction == Direction::Down).count();

    // Winning requires strictly more votes; a tie is contradiction, not
    // agreement.
    let (winner, count) = if bull > bear {
        (Direction::Up, bull)
    } else if bear > bull {
        (Direction::Down, bear)
    } else {
        (Direction::Sideways, bull)
    };
    let percent = count as f64 / votes.len() as f64 * 100.0;

    ConfluenceResult {
        direction: if winner.is_directional() && count >= 2 {
            winner
        } else {
            Direction::Sideways
        },
        percent,
        votes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::bollinger::BollingerOutput;
    use crate::indicators::macd::MacdOutput;

    fn snapshot(
        ema_fast: f64,
        ema_slow: f64,
        rsi: f64,
        histogram: f64,
        percent_b: f64,
        stoch_k: f64,
    ) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 100.0,
            ema_fast,
            ema_slow,
            rsi,
            macd: MacdOutput {
                macd: histogram,
                signal: 0.0,
                histogram,
            },
            bollinger: BollingerOutput {
                upper: 102.0,
                middle: 100.0,
                lower: 98.0,
                percent_b,
                bandwidth: 4.0,
            },
            stoch_rsi_k: stoch_k,
            stoch_rsi_d: stoch_k,
            atr: 1.0,
            adx: 30.0,
            plus_di: 20.0,
            minus_di: 10.0,
            volume_sma: 1.0,
            volume_poc: 100.0,
        }
    }

    #[test]
    fn full_agreement_scores_100() {
        let snap = snapshot(101.0, 100.0, 70.0, 0.5, 0.9, 80.0);
        let result = score(&snap);
        assert_eq!(result.direction, Direction::Up);
        assert_eq!(result.percent, 100.0);
    }

    #[test]
    fn full_disagreement_scores_0_and_stays_sideways() {
        // Every vote lands in its neutral band.
        let snap = snapshot(100.0, 100.0, 50.0, 0.0, 0.5, 50.0);
        let result = score(&snap);
        assert_eq!(result.direction, Direction::Sideways);
        assert_eq!(result.percent, 0.0);
    }

    #[test]
    fn single_vote_is_not_enough_for_a_direction() {
        let snap = snapshot(100.0, 100.0, 50.0, 0.0, 0.9, 50.0);
        let result = score(&snap);
        assert_eq!(result.direction, Direction::Sideways);
        assert_eq!(result.percent, 20.0);
    }

    #[test]
    fn split_vote_is_sideways_not_a_direction() {
        // ema + rsi bullish, macd + bollinger bearish, stoch neutral:
        // perfectly contradictory evidence must not read as a direction.
        let snap = snapshot(101.0, 100.0, 70.0, -0.5, 0.1, 50.0);
        let result = score(&snap);
        assert_eq!(result.direction, Direction::Sideways);
        assert_eq!(result.percent, 40.0);
    }

    #[test]
    fn two_bear_votes_beat_one_bull_vote() {
        let snap = snapshot(99.0, 100.0, 40.0, 0.0, 0.9, 50.0);
        let result = score(&snap);
        assert_eq!(result.direction, Direction::Down);
        assert_eq!(result.percent, 40.0);
    }
}
