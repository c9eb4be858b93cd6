pub mod candle;
pub mod timeframe;
pub mod aggregate;
pub mod indicators;
pub mod smoothing;
pub mod trend;
pub mod confluence;
pub mod consensus;
pub mod persistence;
pub mod guards;
pub mod pattern;
pub mod targets;
pub mod confidence;
pub mod signal;
pub mod config;
pub mod error;
pub mod engine;

pub use candle::{Candle, CandleSeries};
pub use config::EngineConfig;
pub use engine::{Evaluation, SignalEngine};
pub use error::EngineError;
pub use signal::{Direction, RiskLevel, Signal};
pub use timeframe::Timeframe;
