pub mod candle;
pub mod indicator;
pub mod report;
pub mod signal;

pub use candle::Candle;
pub use indicator::IndicatorSnapshot;
pub use report::{PairReport, ScanReport};
pub use signal::Signal;
