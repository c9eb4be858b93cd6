//! Async runtime around the signal engine: a shared base-candle feed and a
//! fixed-interval scheduler that fans evaluations out over a channel.

pub mod feed;
pub mod runner;

pub use feed::CandleFeed;
pub use runner::{Runner, Subscription};
