use async_trait::async_trait;
use serde_json::Value;

use crate::constants::CRORE;
use crate::error::{AppError, Result};
use crate::models::{nse_symbol, MarketIndex, Quote};
use crate::providers::http::{json_f64, json_u64, ApiClient};
use crate::providers::provider::MarketDataProvider;

const BASE_URL: &str = "https://www.nseindia.com/api";

/// NSE India equity-stockIndices endpoint.
///
/// Primary source for index listings. The endpoint rejects non-browser
/// requests, so the shared client's browser headers are load-bearing here.
pub struct NseProvider {
    api: ApiClient,
}

impl NseProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(true)?,
        })
    }
}

/// Map one row of the NSE index payload into a quote.
///
/// Rows without a symbol or last price are skipped (the payload includes a
/// header row for the index itself with a different shape).
fn parse_index_row(item: &Value) -> Option<Quote> {
    let symbol = item.get("symbol")?.as_str()?;
    let price = json_f64(item.get("lastPrice")?)?;

    let name = item
        .get("meta")
        .and_then(|m| m.get("companyName"))
        .and_then(Value::as_str)
        .unwrap_or(symbol)
        .to_string();

    let get = |key: &str| item.get(key).and_then(json_f64).unwrap_or(0.0);

    Some(Quote {
        symbol: nse_symbol(symbol),
        name: Some(name),
        price,
        change: get("change"),
        change_percent: get("pChange"),
        high: get("dayHigh"),
        low: get("dayLow"),
        volume: item
            .get("totalTradedVolume")
            .and_then(json_u64)
            .unwrap_or(0),
        previous_close: get("previousClose"),
        market_cap: item.get("marketCap").and_then(json_f64).map(|c| c / CRORE),
    })
}

pub(crate) fn parse_index_payload(data: &Value) -> Result<Vec<Quote>> {
    let rows = data
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Parse("Invalid response from NSE API".to_string()))?;

    let quotes: Vec<Quote> = rows.iter().filter_map(parse_index_row).collect();

    if quotes.is_empty() {
        return Err(AppError::NotFound("NSE index returned no rows".to_string()));
    }
    Ok(quotes)
}

#[async_trait]
impl MarketDataProvider for NseProvider {
    fn id(&self) -> &'static str {
        "nse"
    }

    async fn index_quotes(&self, index: MarketIndex) -> Result<Vec<Quote>> {
        let url = format!(
            "{}/equity-stockIndices?index={}",
            BASE_URL,
            index.nse_api_param()
        );
        tracing::debug!(index = %index, "Fetching NSE index listing");

        let data = self.api.get_json(&url).await?;
        let quotes = parse_index_payload(&data)?;

        tracing::info!(index = %index, count = quotes.len(), "NSE index listing fetched");
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_index_payload() {
        let data = json!({
            "data": [
                {
                    "symbol": "RELIANCE",
                    "meta": { "companyName": "Reliance Industries Ltd." },
                    "lastPrice": "2897.45",
                    "change": "23.56",
                    "pChange": "0.82",
                    "dayHigh": "2910.50",
                    "dayLow": "2865.30",
                    "totalTradedVolume": "3245678",
                    "previousClose": "2873.89",
                    "marketCap": "185346700000"
                },
                { "indexSymbol": "NIFTY 50", "last": 22000 }
            ]
        });

        let quotes = parse_index_payload(&data).unwrap();
        assert_eq!(quotes.len(), 1);

        let q = &quotes[0];
        assert_eq!(q.symbol, "NSE:RELIANCE");
        assert_eq!(q.name.as_deref(), Some("Reliance Industries Ltd."));
        assert!((q.price - 2897.45).abs() < 1e-9);
        assert_eq!(q.volume, 3_245_678);
        assert!((q.market_cap.unwrap() - 18534.67).abs() < 1e-6);
    }

    #[test]
    fn test_parse_index_payload_rejects_missing_data() {
        assert!(parse_index_payload(&json!({})).is_err());
        assert!(parse_index_payload(&json!({ "data": [] })).is_err());
    }
}
