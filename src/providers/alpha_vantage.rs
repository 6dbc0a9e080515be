use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{format_symbol_as_name, nse_symbol, pure_symbol, Candle, Quote, Timeframe};
use crate::providers::http::{json_f64, json_u64, ApiClient};
use crate::providers::provider::MarketDataProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage GLOBAL_QUOTE and TIME_SERIES endpoints.
///
/// Only constructed when an API key is configured; the free tier is heavily
/// throttled so this sits late in the fallback order.
pub struct AlphaVantageProvider {
    api: ApiClient,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(false)?,
            api_key,
        })
    }
}

pub(crate) fn parse_global_quote(symbol: &str, payload: &Value) -> Result<Quote> {
    let quote = payload
        .get("Global Quote")
        .filter(|q| q.as_object().is_some_and(|o| !o.is_empty()))
        .ok_or_else(|| AppError::NotFound(format!("Alpha Vantage has no quote for {}", symbol)))?;

    let get = |key: &str| quote.get(key).and_then(json_f64);

    let price = get("05. price")
        .ok_or_else(|| AppError::Parse(format!("Alpha Vantage quote for {} has no price", symbol)))?;
    let change = get("09. change").unwrap_or(0.0);

    Ok(Quote {
        symbol: nse_symbol(pure_symbol(symbol)),
        name: Some(format_symbol_as_name(symbol)),
        price,
        change,
        // "10. change percent" arrives as e.g. "0.8213%"
        change_percent: get("10. change percent").unwrap_or(0.0),
        high: get("03. high").unwrap_or(0.0),
        low: get("04. low").unwrap_or(0.0),
        volume: quote.get("06. volume").and_then(json_u64).unwrap_or(0),
        previous_close: get("08. previous close").unwrap_or(price - change),
        market_cap: None,
    })
}

pub(crate) fn parse_time_series(timeframe: Timeframe, payload: &Value) -> Result<Vec<Candle>> {
    let series = payload
        .get(timeframe.alpha_vantage_series_key())
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AppError::NotFound("Alpha Vantage returned no time series".to_string())
        })?;

    let mut candles = Vec::new();
    for (date, bar) in series {
        let date = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => continue,
        };

        let get = |key: &str| bar.get(key).and_then(json_f64);
        let (open, high, low, close) = match (
            get("1. open"),
            get("2. high"),
            get("3. low"),
            get("4. close"),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };

        let volume = bar.get("5. volume").and_then(json_u64).unwrap_or(0);
        candles.push(Candle::new(date, open, high, low, close, volume));
    }

    if candles.is_empty() {
        return Err(AppError::NotFound(
            "Alpha Vantage time series had no usable bars".to_string(),
        ));
    }

    candles.sort_by_key(|c| c.date);
    Ok(candles)
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        "alpha_vantage"
    }

    async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        let url = format!(
            "{}?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            BASE_URL,
            pure_symbol(symbol),
            self.api_key
        );
        tracing::debug!(symbol, "Fetching Alpha Vantage quote");

        let payload = self.api.get_json(&url).await?;
        parse_global_quote(symbol, &payload)
    }

    async fn historical_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let url = format!(
            "{}?function={}&symbol={}&apikey={}",
            BASE_URL,
            timeframe.alpha_vantage_function(),
            pure_symbol(symbol),
            self.api_key
        );
        tracing::debug!(symbol, timeframe = %timeframe, "Fetching Alpha Vantage candles");

        let payload = self.api.get_json(&url).await?;
        let candles = parse_time_series(timeframe, &payload)?;

        tracing::info!(symbol, count = candles.len(), "Alpha Vantage candles fetched");
        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_global_quote() {
        let payload = json!({
            "Global Quote": {
                "01. symbol": "RELIANCE",
                "03. high": "2910.5000",
                "04. low": "2865.3000",
                "05. price": "2897.4500",
                "06. volume": "3245678",
                "08. previous close": "2873.8900",
                "09. change": "23.5600",
                "10. change percent": "0.8213%"
            }
        });

        let quote = parse_global_quote("RELIANCE", &payload).unwrap();
        assert_eq!(quote.symbol, "NSE:RELIANCE");
        assert!((quote.price - 2897.45).abs() < 1e-9);
        assert!((quote.change_percent - 0.8213).abs() < 1e-9);
        assert_eq!(quote.volume, 3_245_678);
    }

    #[test]
    fn test_parse_global_quote_empty_object_is_not_found() {
        let payload = json!({ "Global Quote": {} });
        assert!(matches!(
            parse_global_quote("RELIANCE", &payload),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_time_series_sorted_ascending() {
        let payload = json!({
            "Time Series (Daily)": {
                "2024-03-15": {
                    "1. open": "2880.00",
                    "2. high": "2910.50",
                    "3. low": "2865.30",
                    "4. close": "2897.45",
                    "5. volume": "3245678"
                },
                "2024-03-14": {
                    "1. open": "2850.00",
                    "2. high": "2885.00",
                    "3. low": "2840.00",
                    "4. close": "2873.89",
                    "5. volume": "2987654"
                }
            }
        });

        let candles = parse_time_series(Timeframe::Daily, &payload).unwrap();
        assert_eq!(candles.len(), 2);
        assert!(candles[0].date < candles[1].date);
        assert!((candles[1].close - 2897.45).abs() < 1e-9);
    }

    #[test]
    fn test_parse_time_series_wrong_key_is_not_found() {
        let payload = json!({ "Time Series (Daily)": {} });
        assert!(parse_time_series(Timeframe::Weekly, &payload).is_err());
    }
}
