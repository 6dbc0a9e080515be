use async_trait::async_trait;
use serde_json::Value;

use crate::constants::{nifty_company_name, CRORE, MONEYCONTROL_INDEX_FETCH_LIMIT};
use crate::error::{AppError, Result};
use crate::models::{format_symbol_as_name, nse_symbol, pure_symbol, MarketIndex, Quote};
use crate::providers::http::{json_f64, json_u64, ApiClient};
use crate::providers::provider::MarketDataProvider;

const BASE_URL: &str = "https://priceapi.moneycontrol.com/pricefeed/nse/equitycash";

/// MoneyControl price feed.
///
/// One request per symbol, so the index operation walks the locally known
/// constituents and tolerates per-symbol failures. Capped at
/// `MONEYCONTROL_INDEX_FETCH_LIMIT` symbols to keep the fallback usable.
pub struct MoneyControlProvider {
    api: ApiClient,
}

impl MoneyControlProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(true)?,
        })
    }
}

pub(crate) fn parse_price_feed(symbol: &str, payload: &Value) -> Result<Quote> {
    let data = payload
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| AppError::Parse("Invalid response from MoneyControl API".to_string()))?;

    let get = |key: &str| data.get(key).and_then(json_f64).unwrap_or(0.0);

    let price = data
        .get("pricecurrent")
        .and_then(json_f64)
        .ok_or_else(|| AppError::Parse(format!("MoneyControl returned no price for {}", symbol)))?;

    let pure = pure_symbol(symbol);
    let name = nifty_company_name(pure)
        .map(str::to_string)
        .unwrap_or_else(|| format_symbol_as_name(symbol));

    let market_cap = data.get("MARKET_CAP").and_then(json_f64).map(|c| c / CRORE);

    Ok(Quote {
        symbol: nse_symbol(pure),
        name: Some(name),
        price,
        change: get("pricechange"),
        change_percent: get("pricepercentchange"),
        high: get("HIGH"),
        low: get("LOW"),
        volume: data.get("VOLUME").and_then(json_u64).unwrap_or(0),
        previous_close: get("priceprevclose"),
        market_cap,
    })
}

#[async_trait]
impl MarketDataProvider for MoneyControlProvider {
    fn id(&self) -> &'static str {
        "moneycontrol"
    }

    async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        let pure = pure_symbol(symbol);
        let url = format!("{}/{}", BASE_URL, pure);
        tracing::debug!(symbol, "Fetching MoneyControl quote");

        let payload = self.api.get_json(&url).await?;
        parse_price_feed(symbol, &payload)
    }

    async fn index_quotes(&self, index: MarketIndex) -> Result<Vec<Quote>> {
        let mut quotes = Vec::new();

        for (symbol, _) in index
            .constituents()
            .into_iter()
            .take(MONEYCONTROL_INDEX_FETCH_LIMIT)
        {
            match self.latest_quote(symbol).await {
                Ok(quote) => quotes.push(quote),
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "Skipping symbol in MoneyControl index fetch");
                }
            }
        }

        if quotes.is_empty() {
            return Err(AppError::NotFound(format!(
                "MoneyControl returned no quotes for {}",
                index
            )));
        }

        tracing::info!(index = %index, count = quotes.len(), "MoneyControl index fetch complete");
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_price_feed() {
        let payload = json!({
            "data": {
                "pricecurrent": "2897.45",
                "pricechange": "23.56",
                "pricepercentchange": "0.82",
                "HIGH": "2910.50",
                "LOW": "2865.30",
                "VOLUME": "3245678",
                "priceprevclose": "2873.89",
                "MARKET_CAP": "185346700000"
            }
        });

        let quote = parse_price_feed("NSE:RELIANCE", &payload).unwrap();
        assert_eq!(quote.symbol, "NSE:RELIANCE");
        assert_eq!(quote.name.as_deref(), Some("Reliance Industries Ltd."));
        assert!((quote.change - 23.56).abs() < 1e-9);
        assert!((quote.market_cap.unwrap() - 18534.67).abs() < 1e-6);
    }

    #[test]
    fn test_parse_price_feed_unknown_symbol_gets_formatted_name() {
        let payload = json!({ "data": { "pricecurrent": "120.5" } });
        let quote = parse_price_feed("OBSCURECO", &payload).unwrap();
        assert_eq!(quote.name.as_deref(), Some("Obscureco"));
        assert_eq!(quote.symbol, "NSE:OBSCURECO");
    }

    #[test]
    fn test_parse_price_feed_rejects_missing_data() {
        assert!(parse_price_feed("NSE:RELIANCE", &json!({})).is_err());
        assert!(parse_price_feed("NSE:RELIANCE", &json!({ "data": {} })).is_err());
    }
}
