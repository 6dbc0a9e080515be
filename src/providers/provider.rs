use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Candle, MarketIndex, Quote, Timeframe};

/// A third-party (or synthetic) source of quotes and candles.
///
/// Providers implement whatever subset of operations their upstream API
/// offers; unimplemented operations return `Unsupported` and the fallback
/// chain moves on to the next hop.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short identifier used in logs ("nse", "yahoo", ...)
    fn id(&self) -> &'static str;

    /// Latest quote for one symbol
    async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        let _ = symbol;
        Err(AppError::Unsupported(self.id().to_string()))
    }

    /// Quotes for every constituent of an index
    async fn index_quotes(&self, index: MarketIndex) -> Result<Vec<Quote>> {
        let _ = index;
        Err(AppError::Unsupported(self.id().to_string()))
    }

    /// Historical OHLCV candles for one symbol
    async fn historical_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let _ = (symbol, timeframe);
        Err(AppError::Unsupported(self.id().to_string()))
    }
}
