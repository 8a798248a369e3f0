use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use common::models::Candle;
use common::{DeliveryError, Destination, MarketDataError, ReportSink};
use market_data::CandleSource;

/// Answers every request with an empty window.
pub struct StaticSource;

#[async_trait]
impl CandleSource for StaticSource {
    async fn fetch_candles(
        &self,
        _symbol: &str,
        _interval: &str,
        _limit: u16,
    ) -> Result<Vec<Candle>, MarketDataError> {
        Ok(Vec::new())
    }
}

/// Like [`StaticSource`] but every request takes `delay` of (virtual) time.
pub struct SlowSource {
    delay: Duration,
}

impl SlowSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CandleSource for SlowSource {
    async fn fetch_candles(
        &self,
        _symbol: &str,
        _interval: &str,
        _limit: u16,
    ) -> Result<Vec<Candle>, MarketDataError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    fail: bool,
    attempts: AtomicUsize,
    deliveries: Mutex<Vec<(Destination, String)>>,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn deliveries(&self) -> Vec<(Destination, String)> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn deliver(&self, destination: Destination, text: &str) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DeliveryError::Unreachable {
                destination,
                reason: "chat not found".to_string(),
            });
        }
        self.deliveries
            .lock()
            .unwrap()
            .push((destination, text.to_string()));
        Ok(())
    }
}
