/// Unified error type for the signal engine.
///
/// Computation paths never error on short or degenerate data — every
/// indicator has a documented sentinel. Errors here are configuration and
/// input-boundary problems caught before evaluation runs.
#[derive(Debug)]
pub enum EngineError {
    InvalidTimeframe(String),
    InvalidConfig(String),
    UnknownAsset(String),
    Parse(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeframe(tf) => {
                write!(f, "invalid timeframe {tf:?}; expected 1m|5m|15m|30m|1h|4h|1d")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::UnknownAsset(asset) => write!(f, "unknown asset: {asset}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
