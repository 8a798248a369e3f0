use thiserror::Error;

use crate::sink::Destination;

/// Failures while retrieving a candle window for one symbol.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Market data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },
}

impl MarketDataError {
    pub fn unavailable(symbol: &str, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    #[error("Insufficient history: need {required} points, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Invalid indicator parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Destination {destination} unreachable: {reason}")]
    Unreachable {
        destination: Destination,
        reason: String,
    },
}

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}
