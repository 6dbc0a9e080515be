use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::Value;

use crate::constants::{
    FINNHUB_DEFAULT_SYMBOLS, FINNHUB_RATE_LIMIT_PER_MINUTE, FINNHUB_SYMBOL_FETCH_LIMIT,
};
use crate::error::{AppError, Result};
use crate::models::{format_symbol_as_name, nse_symbol, pure_symbol, Candle, Quote, Timeframe};
use crate::providers::http::{json_f64, json_u64, ApiClient};
use crate::providers::provider::MarketDataProvider;
use crate::providers::rate_limit::SharedRateLimiter;

const BASE_URL: &str = "https://finnhub.io/api/v1";

/// Finnhub, used for global mode. The free tier allows 60 calls/minute, so
/// every request goes through a shared rate limiter.
pub struct FinnhubProvider {
    api: ApiClient,
    api_key: String,
    rate_limiter: Arc<SharedRateLimiter>,
}

impl FinnhubProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(false)?,
            api_key,
            rate_limiter: Arc::new(SharedRateLimiter::new(
                FINNHUB_RATE_LIMIT_PER_MINUTE,
                Duration::from_secs(60),
            )),
        })
    }

    async fn throttle(&self) {
        let waited = self.rate_limiter.acquire().await;
        if !waited.is_zero() {
            tracing::debug!(wait_ms = waited.as_millis() as u64, "Throttled by Finnhub rate limit");
        }
    }

    /// Best-effort company profile lookup for name and market cap.
    /// Finnhub reports market cap in millions of the listing currency,
    /// which for NSE listings is already close enough to crores to use as-is.
    async fn company_profile(&self, pure: &str) -> (String, Option<f64>) {
        let url = format!(
            "{}/stock/profile2?symbol={}&token={}",
            BASE_URL,
            pure,
            self.api_key
        );

        self.throttle().await;
        match self.api.get_json(&url).await {
            Ok(profile) => {
                let name = profile
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format_symbol_as_name(pure));
                let market_cap = profile.get("marketCapitalization").and_then(json_f64);
                (name, market_cap)
            }
            Err(e) => {
                tracing::warn!(symbol = pure, error = %e, "Finnhub profile lookup failed");
                (format_symbol_as_name(pure), None)
            }
        }
    }

    /// Symbols to use for the index listing: the NSE exchange directory when
    /// it answers, otherwise the built-in default set.
    async fn listing_symbols(&self) -> Vec<String> {
        let url = format!("{}/stock/symbol?exchange=NSE&token={}", BASE_URL, self.api_key);

        self.throttle().await;
        let listed = match self.api.get_json(&url).await {
            Ok(Value::Array(entries)) => entries
                .iter()
                .filter_map(|e| e.get("symbol").and_then(Value::as_str))
                .map(nse_symbol)
                .collect::<Vec<_>>(),
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Finnhub symbol directory unavailable");
                Vec::new()
            }
        };

        if listed.is_empty() {
            FINNHUB_DEFAULT_SYMBOLS
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            listed
        }
    }
}

pub(crate) fn parse_quote(symbol: &str, payload: &Value) -> Result<Quote> {
    // `c` is always present in the response; 0 with no `t` means unknown symbol
    let price = payload
        .get("c")
        .and_then(json_f64)
        .ok_or_else(|| AppError::Parse(format!("Finnhub returned no price for {}", symbol)))?;

    let get = |key: &str| payload.get(key).and_then(json_f64);
    let change = get("d").unwrap_or(0.0);

    // Global symbols keep whatever form the caller asked for
    Ok(Quote {
        symbol: symbol.to_string(),
        name: None,
        price,
        change,
        change_percent: get("dp").unwrap_or(0.0),
        high: get("h").unwrap_or(price * 1.05),
        low: get("l").unwrap_or(price * 0.95),
        volume: payload.get("v").and_then(json_u64).unwrap_or(0),
        previous_close: get("pc").unwrap_or(price - change),
        market_cap: None,
    })
}

pub(crate) fn parse_candles(payload: &Value) -> Result<Vec<Candle>> {
    if payload.get("s").and_then(Value::as_str) != Some("ok") {
        return Err(AppError::NotFound("Finnhub has no candles for symbol".to_string()));
    }

    let series = |key: &str| payload.get(key).and_then(Value::as_array);
    let timestamps = series("t")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::NotFound("Finnhub candle response is empty".to_string()))?;

    let (opens, highs, lows, closes) = match (series("o"), series("h"), series("l"), series("c")) {
        (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
        _ => return Err(AppError::Parse("Finnhub candle response is missing OHLC".to_string())),
    };
    let volumes = series("v");

    let mut candles = Vec::new();
    for (i, ts) in timestamps.iter().enumerate() {
        let date = match ts
            .as_i64()
            .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
        {
            Some(dt) => dt.date_naive(),
            None => continue,
        };

        let (open, high, low, close) = match (
            opens.get(i).and_then(json_f64),
            highs.get(i).and_then(json_f64),
            lows.get(i).and_then(json_f64),
            closes.get(i).and_then(json_f64),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };

        let volume = volumes
            .and_then(|v| v.get(i))
            .and_then(json_u64)
            .unwrap_or(0);

        candles.push(Candle::new(date, open, high, low, close, volume));
    }

    if candles.is_empty() {
        return Err(AppError::NotFound("Finnhub candles had no usable bars".to_string()));
    }
    Ok(candles)
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        "finnhub"
    }

    async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        let pure = pure_symbol(symbol).to_string();
        let url = format!("{}/quote?symbol={}&token={}", BASE_URL, pure, self.api_key);
        tracing::debug!(symbol, "Fetching Finnhub quote");

        self.throttle().await;
        let payload = self.api.get_json(&url).await?;
        let mut quote = parse_quote(symbol, &payload)?;

        let (name, market_cap) = self.company_profile(&pure).await;
        quote.name = Some(name);
        quote.market_cap = market_cap;
        Ok(quote)
    }

    async fn index_quotes(&self, _index: crate::models::MarketIndex) -> Result<Vec<Quote>> {
        let symbols = self.listing_symbols().await;
        let capped: Vec<&String> = symbols.iter().take(FINNHUB_SYMBOL_FETCH_LIMIT).collect();

        let results = join_all(capped.iter().map(|s| self.latest_quote(s))).await;

        let quotes: Vec<Quote> = results
            .into_iter()
            .zip(capped.iter())
            .filter_map(|(result, symbol)| match result {
                Ok(q) => Some(q),
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Skipping symbol in Finnhub listing");
                    None
                }
            })
            .collect();

        if quotes.is_empty() {
            return Err(AppError::NotFound("Finnhub returned no quotes".to_string()));
        }

        tracing::info!(count = quotes.len(), "Finnhub listing fetch complete");
        Ok(quotes)
    }

    async fn historical_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let to = Utc::now().timestamp();
        let from = to - 31_536_000; // one year

        let url = format!(
            "{}/stock/candle?symbol={}&resolution={}&from={}&to={}&token={}",
            BASE_URL,
            pure_symbol(symbol),
            timeframe.finnhub_resolution(),
            from,
            to,
            self.api_key
        );
        tracing::debug!(symbol, timeframe = %timeframe, "Fetching Finnhub candles");

        self.throttle().await;
        let payload = self.api.get_json(&url).await?;
        let candles = parse_candles(&payload)?;

        tracing::info!(symbol, count = candles.len(), "Finnhub candles fetched");
        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_quote() {
        let payload = json!({
            "c": 178.25, "d": 1.52, "dp": 0.86,
            "h": 179.4, "l": 176.1, "pc": 176.73, "v": 4521000
        });

        let quote = parse_quote("AAPL", &payload).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert!((quote.price - 178.25).abs() < 1e-9);
        assert!((quote.previous_close - 176.73).abs() < 1e-9);
        assert_eq!(quote.volume, 4_521_000);
    }

    #[test]
    fn test_parse_quote_keeps_prefixed_symbol() {
        let payload = json!({ "c": 2900.0 });
        let quote = parse_quote("NSE:RELIANCE", &payload).unwrap();
        assert_eq!(quote.symbol, "NSE:RELIANCE");
    }

    #[test]
    fn test_parse_quote_fills_missing_range_from_price() {
        let payload = json!({ "c": 100.0 });
        let quote = parse_quote("XYZ", &payload).unwrap();
        assert!((quote.high - 105.0).abs() < 1e-9);
        assert!((quote.low - 95.0).abs() < 1e-9);
        assert!((quote.previous_close - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_quote_rejects_missing_price() {
        assert!(parse_quote("XYZ", &json!({})).is_err());
    }

    #[test]
    fn test_parse_candles() {
        let payload = json!({
            "s": "ok",
            "t": [1700000000i64, 1700086400i64],
            "o": [100.0, 102.0],
            "h": [105.0, 106.0],
            "l": [99.0, 101.0],
            "c": [102.0, 104.0],
            "v": [50000, 61000]
        });

        let candles = parse_candles(&payload).unwrap();
        assert_eq!(candles.len(), 2);
        assert!(candles[1].is_bullish());
    }

    #[test]
    fn test_parse_candles_no_data_status() {
        let payload = json!({ "s": "no_data" });
        assert!(matches!(parse_candles(&payload), Err(AppError::NotFound(_))));
    }
}
