use std::{env, time::Duration};

use crate::errors::ConfigError;

pub const EMA_WINDOW: usize = 50;
pub const BAND_WINDOW: usize = 20;
pub const BAND_DEVIATIONS: f64 = 2.0;

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const DEFAULT_CANDLE_INTERVAL: &str = "1m";
const DEFAULT_CANDLE_LIMIT: u16 = 100;
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 300;
const MAX_CANDLE_LIMIT: u16 = 1000;

/// A screened instrument: how it is shown to users and how the provider names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub display_name: &'static str,
    pub symbol: &'static str,
}

impl Pair {
    pub const fn new(display_name: &'static str, symbol: &'static str) -> Self {
        Self {
            display_name,
            symbol,
        }
    }
}

pub const PAIRS: &[Pair; 7] = &[
    Pair::new("EUR/USD", "EURUSDT"),
    Pair::new("GBP/USD", "GBPUSDT"),
    Pair::new("USD/JPY", "USDJPY"),
    Pair::new("USD/CHF", "USDCHF"),
    Pair::new("AUD/USD", "AUDUSDT"),
    Pair::new("NZD/USD", "NZDUSDT"),
    Pair::new("USD/CAD", "USDCAD"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub telegram_token: String,
    pub binance_base_url: String,
    pub candle_interval: String,
    pub candle_limit: u16,
    pub scan_interval: Duration,
    pub pairs: Vec<Pair>,
}

impl Settings {
    /// Reads the process environment. `.env` loading is left to the binary.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let telegram_token = non_empty("TELEGRAM_BOT_TOKEN")
            .or_else(|| non_empty("TOKEN"))
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let binance_base_url = non_empty("BINANCE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let candle_interval =
            non_empty("CANDLE_INTERVAL").unwrap_or_else(|| DEFAULT_CANDLE_INTERVAL.to_string());

        let candle_limit = match non_empty("CANDLE_LIMIT") {
            Some(raw) => parse_candle_limit(&raw)?,
            None => DEFAULT_CANDLE_LIMIT,
        };

        let scan_interval_secs = match non_empty("SIGNAL_INTERVAL_SECS") {
            Some(raw) => parse_interval_secs(&raw)?,
            None => DEFAULT_SCAN_INTERVAL_SECS,
        };

        Ok(Self {
            telegram_token,
            binance_base_url,
            candle_interval,
            candle_limit,
            scan_interval: Duration::from_secs(scan_interval_secs),
            pairs: PAIRS.to_vec(),
        })
    }
}

fn parse_candle_limit(raw: &str) -> Result<u16, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "CANDLE_LIMIT",
        reason,
    };
    let limit = raw.trim().parse::<u16>().map_err(|e| invalid(e.to_string()))?;
    if limit == 0 || limit > MAX_CANDLE_LIMIT {
        return Err(invalid(format!("must be between 1 and {}", MAX_CANDLE_LIMIT)));
    }
    Ok(limit)
}

fn parse_interval_secs(raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "SIGNAL_INTERVAL_SECS",
        reason,
    };
    let secs = raw.trim().parse::<u64>().map_err(|e| invalid(e.to_string()))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(secs)
}
