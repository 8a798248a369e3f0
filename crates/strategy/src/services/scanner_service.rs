use std::sync::Arc;

use tracing::{debug, info, warn};

use common::SignalError;
use common::config::Pair;
use common::models::{Candle, ScanReport, Signal};
use market_data::CandleSource;

use crate::classifier::classify;
use crate::indicators::IndicatorEngine;

const DEFAULT_INTERVAL: &str = "1m";
const DEFAULT_LIMIT: u16 = 100;

/// Screens a fixed basket of pairs, one candle window per pair.
pub struct PairScanner {
    source: Arc<dyn CandleSource>,
    pairs: Vec<Pair>,
    interval: String,
    limit: u16,
    engine: IndicatorEngine,
}

impl PairScanner {
    pub fn new(source: Arc<dyn CandleSource>, pairs: &[Pair]) -> Self {
        Self {
            source,
            pairs: pairs.to_vec(),
            interval: DEFAULT_INTERVAL.to_string(),
            limit: DEFAULT_LIMIT,
            engine: IndicatorEngine::default(),
        }
    }

    pub fn with_window(mut self, interval: &str, limit: u16) -> Self {
        self.interval = interval.to_string();
        self.limit = limit;
        self
    }

    pub fn with_engine(mut self, engine: IndicatorEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Never fails: a pair whose data cannot be used is reported as `NoData`.
    pub async fn scan(&self) -> ScanReport {
        info!("Scanning {} pairs", self.pairs.len());
        let mut report = ScanReport::with_capacity(self.pairs.len());

        for pair in &self.pairs {
            let signal = self.scan_pair(pair).await;
            debug!("{} ({}): {:?}", pair.display_name, pair.symbol, signal);
            report.push(pair.display_name, signal);
        }

        info!(
            "Scan finished: {} actionable, {} without data",
            report.entries.iter().filter(|e| e.signal.is_actionable()).count(),
            report.count(Signal::NoData)
        );
        report
    }

    async fn scan_pair(&self, pair: &Pair) -> Signal {
        let candles = match self
            .source
            .fetch_candles(pair.symbol, &self.interval, self.limit)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                warn!("{}", e);
                return Signal::NoData;
            }
        };

        match self.engine.latest_two(&Candle::closes(&candles)) {
            Ok((latest, previous)) => classify(Some(&latest), Some(&previous)),
            Err(e @ SignalError::InsufficientHistory { .. }) => {
                debug!("{}: {}", pair.symbol, e);
                Signal::NoData
            }
            Err(e) => {
                warn!("{}: {}", pair.symbol, e);
                Signal::NoData
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorParams;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use common::MarketDataError;
    use common::config::PAIRS;
    use mockall::mock;

    mock! {
        pub Source {}

        #[async_trait]
        impl CandleSource for Source {
            async fn fetch_candles(
                &self,
                symbol: &str,
                interval: &str,
                limit: u16,
            ) -> Result<Vec<Candle>, MarketDataError>;
        }
    }

    fn candles(closes: &[f64]) -> Vec<Candle> {
        let start = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                open_time: start + Duration::minutes(i as i64),
                open: close,
                high: close,
                low: close,
                close,
            })
            .collect()
    }

    /// Flat window whose last bar jumps above the EMA after closing below it.
    fn upward_crossing() -> Vec<Candle> {
        let mut closes = vec![1.0; 98];
        closes.push(0.99);
        closes.push(1.05);
        candles(&closes)
    }

    #[tokio::test]
    async fn test_one_entry_per_pair_in_configured_order() {
        let mut source = MockSource::new();
        source
            .expect_fetch_candles()
            .withf(|_, interval, limit| interval == "1m" && *limit == 100)
            .times(PAIRS.len())
            .returning(|_, _, _| Ok(upward_crossing()));

        let scanner = PairScanner::new(Arc::new(source), PAIRS);
        let report = scanner.scan().await;

        let names: Vec<&str> = report.entries.iter().map(|e| e.display_name.as_str()).collect();
        let expected: Vec<&str> = PAIRS.iter().map(|p| p.display_name).collect();
        assert_eq!(names, expected);
        assert_eq!(report.count(Signal::StrongBuy), PAIRS.len());
    }

    #[tokio::test]
    async fn test_single_fetch_failure_is_isolated() {
        let mut source = MockSource::new();
        source
            .expect_fetch_candles()
            .times(PAIRS.len())
            .returning(|symbol, _, _| {
                if symbol == "USDJPY" {
                    Err(MarketDataError::unavailable(symbol, "timeout"))
                } else {
                    Ok(upward_crossing())
                }
            });

        let report = PairScanner::new(Arc::new(source), PAIRS).scan().await;

        assert_eq!(report.len(), 7);
        assert_eq!(report.count(Signal::StrongBuy), 6);
        assert_eq!(report.count(Signal::NoData), 1);
        assert_eq!(report.signal_for("USD/JPY"), Some(Signal::NoData));
        assert_eq!(report.entries[2].display_name, "USD/JPY");
    }

    #[tokio::test]
    async fn test_every_fetch_failing_still_yields_full_report() {
        let mut source = MockSource::new();
        source
            .expect_fetch_candles()
            .returning(|symbol, _, _| Err(MarketDataError::unavailable(symbol, "HTTP 451")));

        let report = PairScanner::new(Arc::new(source), PAIRS).scan().await;

        assert_eq!(report.len(), PAIRS.len());
        assert_eq!(report.count(Signal::NoData), PAIRS.len());
    }

    #[tokio::test]
    async fn test_short_or_empty_window_is_no_data() {
        let mut source = MockSource::new();
        source.expect_fetch_candles().returning(|symbol, _, _| {
            if symbol == "EURUSDT" {
                Ok(Vec::new())
            } else {
                Ok(candles(&[1.0; 30]))
            }
        });

        let pairs = &PAIRS[..2];
        let report = PairScanner::new(Arc::new(source), pairs).scan().await;

        assert_eq!(report.len(), 2);
        assert_eq!(report.count(Signal::NoData), 2);
    }

    #[tokio::test]
    async fn test_custom_window_is_forwarded_to_source() {
        let mut source = MockSource::new();
        source
            .expect_fetch_candles()
            .withf(|symbol, interval, limit| symbol == "EURUSDT" && interval == "5m" && *limit == 60)
            .times(1)
            .returning(|_, _, _| Ok(candles(&[1.25; 60])));

        let report = PairScanner::new(Arc::new(source), &PAIRS[..1])
            .with_window("5m", 60)
            .scan()
            .await;

        assert_eq!(report.signal_for("EUR/USD"), Some(Signal::Neutral));
    }

    #[tokio::test]
    async fn test_custom_engine_classifies_short_windows() {
        let mut source = MockSource::new();
        source
            .expect_fetch_candles()
            .returning(|_, _, _| Ok(candles(&[1.0, 1.0, 1.0, 0.99, 1.05])));

        let engine = IndicatorEngine::new(IndicatorParams {
            ema_window: 3,
            band_window: 3,
            band_deviations: 2.0,
        })
        .unwrap();

        let default = PairScanner::new(Arc::new(source), &PAIRS[..1]);
        assert_eq!(default.scan().await.signal_for("EUR/USD"), Some(Signal::NoData));

        let tuned = default.with_engine(engine);
        assert_eq!(tuned.scan().await.signal_for("EUR/USD"), Some(Signal::StrongBuy));
    }

    #[tokio::test]
    async fn test_empty_basket_yields_empty_report() {
        let source = MockSource::new();
        let report = PairScanner::new(Arc::new(source), &[]).scan().await;
        assert!(report.is_empty());
    }
}
