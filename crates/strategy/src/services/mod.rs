pub use scanner_service::PairScanner;

pub mod scanner_service;
