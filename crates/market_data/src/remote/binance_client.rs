use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use common::MarketDataError;
use common::models::Candle;

use crate::remote::KlineResponse;
use crate::traits::{CandleSource, RemoteResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("fx_signal_bot/0.1.0")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u16,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::unavailable(symbol, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Binance klines request for {} failed: {} {}", symbol, status, error_text);
            return Err(MarketDataError::unavailable(
                symbol,
                format!("HTTP {status}: {error_text}"),
            ));
        }

        let body = response
            .json::<KlineResponse>()
            .await
            .map_err(|e| MarketDataError::unavailable(symbol, e))?;

        let candles = body.to_model(symbol)?;
        debug!("Fetched {} candles for {}", candles.len(), symbol);

        Ok(candles)
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u16,
    ) -> Result<Vec<Candle>, MarketDataError> {
        self.get_klines(symbol, interval, limit).await
    }
}
