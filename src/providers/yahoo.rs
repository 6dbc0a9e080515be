use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::constants::CRORE;
use crate::error::{AppError, Result};
use crate::models::{format_symbol_as_name, pure_symbol, Candle, Quote, Timeframe};
use crate::providers::http::{json_f64, json_u64, ApiClient};
use crate::providers::provider::MarketDataProvider;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";

/// Yahoo Finance chart + quote endpoints, queried with the ".NS" suffix
/// that maps a bare NSE symbol onto Yahoo's namespace.
pub struct YahooProvider {
    api: ApiClient,
}

impl YahooProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(true)?,
        })
    }

    fn yahoo_symbol(symbol: &str) -> String {
        format!("{}.NS", pure_symbol(symbol))
    }
}

/// Pull candles out of a v8 chart payload. Bars with any null OHLC entry
/// are dropped (Yahoo emits them for non-trading sessions).
pub(crate) fn parse_chart_payload(payload: &Value) -> Result<Vec<Candle>> {
    let result = payload
        .get("chart")
        .and_then(|c| c.get("result"))
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .ok_or_else(|| AppError::Parse("Invalid response from Yahoo Finance API".to_string()))?;

    let timestamps = result
        .get("timestamp")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::NotFound("Yahoo chart has no timestamps".to_string()))?;

    let quote = result
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(Value::as_array)
        .and_then(|q| q.first())
        .ok_or_else(|| AppError::Parse("Yahoo chart has no quote indicators".to_string()))?;

    let series = |key: &str| quote.get(key).and_then(Value::as_array);
    let (opens, highs, lows, closes) = match (
        series("open"),
        series("high"),
        series("low"),
        series("close"),
    ) {
        (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
        _ => return Err(AppError::Parse("Yahoo chart is missing OHLC arrays".to_string())),
    };
    let volumes = series("volume");

    let mut candles = Vec::new();
    for (i, ts) in timestamps.iter().enumerate() {
        let (open, high, low, close) = match (
            opens.get(i).and_then(json_f64),
            highs.get(i).and_then(json_f64),
            lows.get(i).and_then(json_f64),
            closes.get(i).and_then(json_f64),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };

        let timestamp = match ts.as_i64() {
            Some(t) => t,
            None => continue,
        };
        let date = match DateTime::<Utc>::from_timestamp(timestamp, 0) {
            Some(dt) => dt.date_naive(),
            None => continue,
        };

        let volume = volumes
            .and_then(|v| v.get(i))
            .and_then(json_u64)
            .unwrap_or(0);

        candles.push(Candle::new(date, open, high, low, close, volume));
    }

    if candles.is_empty() {
        return Err(AppError::NotFound("Yahoo chart returned no usable bars".to_string()));
    }
    Ok(candles)
}

/// Map a v7 quote result into the common shape
pub(crate) fn parse_quote_payload(symbol: &str, payload: &Value) -> Result<Quote> {
    let quote = payload
        .get("quoteResponse")
        .and_then(|r| r.get("result"))
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .ok_or_else(|| AppError::NotFound(format!("Yahoo has no quote for {}", symbol)))?;

    let get = |key: &str| quote.get(key).and_then(json_f64);

    let price = get("regularMarketPrice")
        .ok_or_else(|| AppError::Parse(format!("Yahoo quote for {} has no price", symbol)))?;
    let change = get("regularMarketChange").unwrap_or(0.0);

    let name = quote
        .get("longName")
        .or_else(|| quote.get("shortName"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format_symbol_as_name(symbol));

    Ok(Quote {
        symbol: symbol.to_string(),
        name: Some(name),
        price,
        change,
        change_percent: get("regularMarketChangePercent").unwrap_or(0.0),
        high: get("regularMarketDayHigh").unwrap_or(0.0),
        low: get("regularMarketDayLow").unwrap_or(0.0),
        volume: quote
            .get("regularMarketVolume")
            .and_then(json_u64)
            .unwrap_or(0),
        previous_close: get("regularMarketPreviousClose").unwrap_or(price - change),
        market_cap: quote.get("marketCap").and_then(json_f64).map(|c| c / CRORE),
    })
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        "yahoo"
    }

    async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        let url = format!("{}?symbols={}", QUOTE_URL, Self::yahoo_symbol(symbol));
        tracing::debug!(symbol, "Fetching Yahoo quote");

        let payload = self.api.get_json(&url).await?;
        parse_quote_payload(symbol, &payload)
    }

    async fn historical_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let end = Utc::now().timestamp();
        let start = end - timeframe.lookback_days() * 86_400;

        let url = format!(
            "{}/{}?period1={}&period2={}&interval={}&includePrePost=false",
            CHART_URL,
            Self::yahoo_symbol(symbol),
            start,
            end,
            timeframe.yahoo_interval()
        );
        tracing::debug!(symbol, timeframe = %timeframe, "Fetching Yahoo candles");

        let payload = self.api.get_json(&url).await?;
        let candles = parse_chart_payload(&payload)?;

        tracing::info!(symbol, count = candles.len(), "Yahoo candles fetched");
        Ok(candles)
    }
}
