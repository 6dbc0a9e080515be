use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Candle, MarketIndex, Quote, Timeframe};
use crate::providers::provider::MarketDataProvider;

/// Ordered fallback chain over providers.
///
/// Each operation tries providers in order and returns the first success.
/// Failures (including empty result sets) are logged and the next hop is
/// tried; only when every hop fails does the error surface.
pub struct ProviderChain {
    providers: Vec<Arc<dyn MarketDataProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        Self { providers }
    }

    pub async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        for provider in &self.providers {
            match provider.latest_quote(symbol).await {
                Ok(quote) => {
                    tracing::debug!(provider = provider.id(), symbol, "Quote resolved");
                    return Ok(quote);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.id(), symbol, error = %e, "Quote fetch failed, trying next provider");
                }
            }
        }
        Err(AppError::ProviderExhausted(format!("quote for {}", symbol)))
    }

    pub async fn index_quotes(&self, index: MarketIndex) -> Result<Vec<Quote>> {
        for provider in &self.providers {
            match provider.index_quotes(index).await {
                Ok(quotes) if !quotes.is_empty() => {
                    tracing::debug!(provider = provider.id(), index = %index, count = quotes.len(), "Index listing resolved");
                    return Ok(quotes);
                }
                Ok(_) => {
                    tracing::warn!(provider = provider.id(), index = %index, "Provider returned empty listing, trying next");
                }
                Err(e) => {
                    tracing::warn!(provider = provider.id(), index = %index, error = %e, "Index fetch failed, trying next provider");
                }
            }
        }
        Err(AppError::ProviderExhausted(format!("listing for {}", index)))
    }

    pub async fn historical_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Candle>> {
        for provider in &self.providers {
            match provider.historical_candles(symbol, timeframe).await {
                Ok(candles) if !candles.is_empty() => {
                    tracing::debug!(provider = provider.id(), symbol, count = candles.len(), "History resolved");
                    return Ok(candles);
                }
                Ok(_) => {
                    tracing::warn!(provider = provider.id(), symbol, "Provider returned empty history, trying next");
                }
                Err(e) => {
                    tracing::warn!(provider = provider.id(), symbol, error = %e, "History fetch failed, trying next provider");
                }
            }
        }
        Err(AppError::ProviderExhausted(format!("history for {}", symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedQuote {
        id: &'static str,
        price: Option<f64>,
    }

    #[async_trait]
    impl MarketDataProvider for FixedQuote {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
            match self.price {
                Some(price) => Ok(Quote {
                    symbol: symbol.to_string(),
                    name: None,
                    price,
                    change: 0.0,
                    change_percent: 0.0,
                    high: price,
                    low: price,
                    volume: 0,
                    previous_close: price,
                    market_cap: None,
                }),
                None => Err(AppError::NotFound(self.id.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let chain = ProviderChain::new(vec![
            Arc::new(FixedQuote { id: "a", price: Some(10.0) }),
            Arc::new(FixedQuote { id: "b", price: Some(20.0) }),
        ]);
        let quote = chain.latest_quote("X").await.unwrap();
        assert!((quote.price - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_falls_through_failures() {
        let chain = ProviderChain::new(vec![
            Arc::new(FixedQuote { id: "a", price: None }),
            Arc::new(FixedQuote { id: "b", price: None }),
            Arc::new(FixedQuote { id: "c", price: Some(30.0) }),
        ]);
        let quote = chain.latest_quote("X").await.unwrap();
        assert!((quote.price - 30.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_exhausted_chain_errors() {
        let chain = ProviderChain::new(vec![Arc::new(FixedQuote { id: "a", price: None })]);
        assert!(matches!(
            chain.latest_quote("X").await,
            Err(AppError::ProviderExhausted(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_operation_falls_through() {
        // FixedQuote has no index_quotes impl, so the default Unsupported
        // error should push the chain onward to the synthetic terminal.
        let chain = ProviderChain::new(vec![
            Arc::new(FixedQuote { id: "a", price: Some(1.0) }),
            Arc::new(crate::providers::synthetic::SyntheticProvider),
        ]);
        let quotes = chain.index_quotes(MarketIndex::Nifty50).await.unwrap();
        assert_eq!(quotes.len(), 50);
    }
}
