use async_trait::async_trait;
use common::MarketDataError;
use common::models::Candle;

/// Conversion of a raw provider payload into a domain model.
pub trait RemoteResponse<T> {
    fn to_model(&self, symbol: &str) -> Result<T, MarketDataError>;
}

/// Source of bounded candle windows for one symbol.
///
/// Implementations must map every transport, status or decoding failure to
/// [`MarketDataError::DataUnavailable`] and must not retry.
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u16,
    ) -> Result<Vec<Candle>, MarketDataError>;
}
