use std::fmt;

use serde::Serialize;

use crate::pattern::CandlePattern;
use crate::targets::Targets;

/// Directional verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Sideways,
}

impl Direction {
    pub fn is_directional(self) -> bool {
        !matches!(self, Direction::Sideways)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Sideways => write!(f, "SIDEWAYS"),
        }
    }
}

/// Risk annotation derived from the volatility guard and reversal-trap
/// detector. Informational only — never blocks emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Final engine output. Immutable once emitted.
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub direction: Direction,
    /// Always within [0, 100].
    pub confidence: f64,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub targets: Targets,
    pub adx: f64,
    pub confirmation_count: u32,
    /// True only when the persistence gate has seen enough consecutive
    /// identical reads.
    pub confirmed: bool,
    pub pattern: CandlePattern,
    /// Fixed weight of the detected pattern.
    pub pattern_weight: f64,
}

impl Signal {
    /// Gate-abort signal: SIDEWAYS, zero confidence, explanatory warning.
    pub fn sideways(warning: impl Into<String>, price: f64, adx: f64) -> Self {
        Self {
            direction: Direction::Sideways,
            confidence: 0.0,
            risk_level: RiskLevel::Low,
            warning: Some(warning.into()),
            targets: Targets::neutral(price),
            adx,
            confirmation_count: 0,
            confirmed: false,
            pattern: CandlePattern::Neutral,
            pattern_weight: CandlePattern::Neutral.weight(),
        }
    }
}
