use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use common::MarketDataError;
use common::models::Candle;

use crate::traits::RemoteResponse;

// [open time, open, high, low, close, volume, close time, ...]
const OPEN_TIME: usize = 0;
const OPEN: usize = 1;
const HIGH: usize = 2;
const LOW: usize = 3;
const CLOSE: usize = 4;

/// Body of `GET /api/v3/klines`: one array per candle, oldest first.
#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub struct KlineResponse {
    pub rows: Vec<KlineRow>,
}

#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub struct KlineRow {
    pub fields: Vec<Value>,
}

impl KlineRow {
    fn price(&self, index: usize, symbol: &str) -> Result<f64, MarketDataError> {
        let raw = self
            .fields
            .get(index)
            .ok_or_else(|| MarketDataError::unavailable(symbol, format!("missing field {index}")))?;

        let parsed = match raw {
            Value::String(s) => s.parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };

        parsed.ok_or_else(|| {
            MarketDataError::unavailable(symbol, format!("field {index} is not numeric: {raw}"))
        })
    }
}

impl RemoteResponse<Candle> for KlineRow {
    fn to_model(&self, symbol: &str) -> Result<Candle, MarketDataError> {
        let open_time_ms = self
            .fields
            .get(OPEN_TIME)
            .and_then(Value::as_i64)
            .ok_or_else(|| MarketDataError::unavailable(symbol, "missing open time"))?;

        let open_time = DateTime::from_timestamp_millis(open_time_ms).ok_or_else(|| {
            MarketDataError::unavailable(symbol, format!("open time out of range: {open_time_ms}"))
        })?;

        Ok(Candle {
            open_time,
            open: self.price(OPEN, symbol)?,
            high: self.price(HIGH, symbol)?,
            low: self.price(LOW, symbol)?,
            close: self.price(CLOSE, symbol)?,
        })
    }
}

impl RemoteResponse<Vec<Candle>> for KlineResponse {
    fn to_model(&self, symbol: &str) -> Result<Vec<Candle>, MarketDataError> {
        self.rows.iter().map(|row| row.to_model(symbol)).collect()
    }
}
