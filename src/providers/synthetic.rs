use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::nifty_company_name;
use crate::error::Result;
use crate::models::{
    format_symbol_as_name, nse_symbol, pure_symbol, Candle, MarketIndex, Quote, Timeframe,
};
use crate::providers::provider::MarketDataProvider;

/// Terminal fallback that synthesizes plausible, deterministic data.
///
/// Every chain ends here, so all three operations are infallible. Values are
/// derived from the symbol text alone: the same symbol always produces the
/// same quote shape and the same candle series.
pub struct SyntheticProvider;

fn symbol_seed(symbol: &str) -> u64 {
    pure_symbol(symbol).bytes().map(u64::from).sum()
}

pub(crate) fn synthetic_quote(symbol: &str) -> Quote {
    let pure = pure_symbol(symbol);
    let seed = symbol_seed(symbol);
    let seed_f = seed as f64 / 1000.0;

    let base = 1000.0 + seed_f * 2000.0;
    let change = if seed_f > 0.5 {
        seed_f * 20.0
    } else {
        -seed_f * 20.0
    };

    let name = nifty_company_name(pure)
        .map(str::to_string)
        .unwrap_or_else(|| format_symbol_as_name(symbol));

    // The symbol comes back exactly as the caller asked for it
    Quote {
        symbol: symbol.to_string(),
        name: Some(name),
        price: base,
        change,
        change_percent: change / base * 100.0,
        high: base + seed_f * 50.0,
        low: base - seed_f * 50.0,
        volume: (500_000.0 + seed_f * 5_000_000.0) as u64,
        previous_close: base - change,
        market_cap: Some((500.0 + seed_f * 10_000.0).floor()),
    }
}

pub(crate) fn synthetic_candles(symbol: &str, timeframe: Timeframe) -> Vec<Candle> {
    let pure = pure_symbol(symbol);
    let bytes = pure.as_bytes();
    let base = 500.0 + ((u64::from(*bytes.first().unwrap_or(&0)) + u64::from(*bytes.get(1).unwrap_or(&0))) % 1000) as f64;

    let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));
    let (days, stride) = timeframe.synthetic_span();
    let today = Utc::now().date_naive();

    let mut candles = Vec::new();
    let mut i = days;
    loop {
        let trend = (i as f64 / 10.0).sin() * 50.0;
        let noise: f64 = rng.gen_range(-10.0..10.0);
        let close = base + trend + noise;
        let open = close - rng.gen_range(-10.0..10.0);
        let high = open.max(close) + rng.gen_range(0.0..10.0);
        let low = open.min(close) - rng.gen_range(0.0..10.0);
        let volume = rng.gen_range(100_000..1_100_000);

        candles.push(Candle::new(
            today - Duration::days(i),
            open,
            high,
            low,
            close,
            volume,
        ));

        if i < stride {
            break;
        }
        i -= stride;
    }

    candles
}

#[async_trait]
impl MarketDataProvider for SyntheticProvider {
    fn id(&self) -> &'static str {
        "synthetic"
    }

    async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        tracing::debug!(symbol, "Synthesizing quote");
        Ok(synthetic_quote(symbol))
    }

    async fn index_quotes(&self, index: MarketIndex) -> Result<Vec<Quote>> {
        tracing::debug!(index = %index, "Synthesizing index quotes");
        Ok(index
            .constituents()
            .into_iter()
            .map(|(symbol, _)| synthetic_quote(&nse_symbol(symbol)))
            .collect())
    }

    async fn historical_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        tracing::debug!(symbol, timeframe = %timeframe, "Synthesizing candles");
        Ok(synthetic_candles(symbol, timeframe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_is_deterministic() {
        let a = synthetic_quote("NSE:RELIANCE");
        let b = synthetic_quote("NSE:RELIANCE");
        assert_eq!(a.price, b.price);
        assert_eq!(a.volume, b.volume);
        assert_eq!(a.change, b.change);
    }

    #[test]
    fn test_quote_shape_is_plausible() {
        let q = synthetic_quote("NSE:TCS");
        assert!(q.price > 0.0);
        assert!(q.low <= q.price && q.price <= q.high);
        assert!(q.volume >= 500_000);
        assert!((q.previous_close - (q.price - q.change)).abs() < 1e-9);
        assert_eq!(q.name.as_deref(), Some("Tata Consultancy Services Ltd."));
    }

    #[test]
    fn test_quote_preserves_caller_symbol() {
        assert_eq!(synthetic_quote("AAPL").symbol, "AAPL");
        assert_eq!(synthetic_quote("NSE:RELIANCE").symbol, "NSE:RELIANCE");
    }

    #[test]
    fn test_candles_are_deterministic() {
        let a = synthetic_candles("NSE:INFY", Timeframe::Daily);
        let b = synthetic_candles("NSE:INFY", Timeframe::Daily);
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].close, b[0].close);
        assert_eq!(a[a.len() - 1].volume, b[b.len() - 1].volume);
    }

    #[test]
    fn test_candle_ohlc_invariants() {
        for timeframe in [Timeframe::Daily, Timeframe::Weekly, Timeframe::Monthly] {
            let candles = synthetic_candles("NSE:HDFCBANK", timeframe);
            assert!(!candles.is_empty());
            for c in &candles {
                assert!(c.high >= c.open.max(c.close));
                assert!(c.low <= c.open.min(c.close));
                assert!(c.volume >= 100_000);
            }
            for pair in candles.windows(2) {
                assert!(pair[0].date < pair[1].date);
            }
        }
    }

    #[test]
    fn test_candle_counts_per_timeframe() {
        assert_eq!(synthetic_candles("X", Timeframe::Daily).len(), 91);
        assert_eq!(synthetic_candles("X", Timeframe::Weekly).len(), 53);
        assert_eq!(synthetic_candles("X", Timeframe::Monthly).len(), 25);
    }

    #[tokio::test]
    async fn test_index_quotes_cover_constituents() {
        let provider = SyntheticProvider;
        let quotes = provider.index_quotes(MarketIndex::Nifty50).await.unwrap();
        assert_eq!(quotes.len(), 50);
        assert!(quotes.iter().all(|q| q.symbol.starts_with("NSE:")));

        let nifty100 = provider.index_quotes(MarketIndex::Nifty100).await.unwrap();
        assert_eq!(nifty100.len(), 100);
    }
}
