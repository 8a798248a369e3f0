pub mod classifier;
pub mod indicators;
pub mod services;

pub use classifier::{SignalTracker, classify, classify_series};
pub use indicators::{IndicatorEngine, IndicatorParams, IndicatorState};
pub use services::PairScanner;
