pub mod config;
pub mod errors;
pub mod logger;
pub mod models;
pub mod sink;

pub use errors::{ConfigError, DeliveryError, MarketDataError, SignalError};
pub use sink::{Destination, ReportSink};
