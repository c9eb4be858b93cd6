use crate::config::EngineConfig;
use crate::pattern::CandlePattern;
use crate::timeframe::Timeframe;
use crate::trend::StrengthTier;

fn adx_bonus(tier: StrengthTier) -> f64 {
    match tier {
        StrengthTier::Weak => 0.0,
        StrengthTier::Moderate => 10.0,
        StrengthTier::Strong => 20.0,
        StrengthTier::VeryStrong => 30.0,
    }
}

fn volume_bonus(volume_ratio: f64) -> f64 {
    if volume_ratio > 1.5 {
        10.0
    } else if volume_ratio > 1.2 {
        5.0
    } else {
        0.0
    }
}

/// Compose the final confidence score, always within [0, 100].
///
/// Base 50, plus a trend-tier bonus, a quarter of the consensus share and
/// the pattern bonus, clipped, then scaled by the timeframe multiplier and
/// topped up by the volume bonus before the final clip.
pub fn compose(
    tier: StrengthTier,
    consensus_percent: f64,
    pattern: CandlePattern,
    timeframe: Timeframe,
    volume_ratio: f64,
    cfg: &EngineConfig,
) -> f64 {
    let base = (50.0 + adx_bonus(tier) + consensus_percent * 0.25 + pattern.bonus())
        .clamp(0.0, 100.0);
    (base * cfg.timeframe_multiplier(timeframe) + volume_bonus(volume_ratio)).clamp(0.0, 100.0)
}
