use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Candle, MarketIndex, Mode, Quote, Timeframe};
use crate::providers::{
    AlphaVantageProvider, FinnhubProvider, MarketDataProvider, MoneyControlProvider, NseProvider,
    ProviderChain, SyntheticProvider, YahooProvider,
};
use crate::utils::{get_alpha_vantage_api_key, get_finnhub_api_key};

/// Field a stock listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Price,
    Change,
    Volume,
}

impl SortField {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "change" => Some(Self::Change),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }
}

/// Sort quotes in place. Name sorts are case-insensitive; numeric sorts
/// treat NaN as equal so a bad value cannot poison the ordering.
pub fn sort_quotes(quotes: &mut [Quote], field: SortField, descending: bool) {
    quotes.sort_by(|a, b| {
        let ord = match field {
            SortField::Name => a
                .display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase()),
            SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            SortField::Change => a
                .change_percent
                .partial_cmp(&b.change_percent)
                .unwrap_or(Ordering::Equal),
            SortField::Volume => a.volume.cmp(&b.volume),
        };
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

/// The fallback chains for each mode and operation.
///
/// Indian listings come from NSE first because one request covers the whole
/// index; per-symbol detail prefers MoneyControl's richer feed. Global mode
/// runs entirely on Finnhub. Every chain terminates in the synthetic
/// provider, so these operations never fail outright.
pub struct MarketDataService {
    indian_index: ProviderChain,
    indian_quote: ProviderChain,
    indian_candles: ProviderChain,
    global: ProviderChain,
}

impl MarketDataService {
    pub fn new() -> Result<Self> {
        let synthetic: Arc<dyn MarketDataProvider> = Arc::new(SyntheticProvider);

        let nse: Arc<dyn MarketDataProvider> = Arc::new(NseProvider::new()?);
        let moneycontrol: Arc<dyn MarketDataProvider> = Arc::new(MoneyControlProvider::new()?);
        let yahoo: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);

        let alpha_vantage: Option<Arc<dyn MarketDataProvider>> = match get_alpha_vantage_api_key() {
            Some(key) => {
                tracing::info!("Alpha Vantage API key configured, enabling provider");
                Some(Arc::new(AlphaVantageProvider::new(key)?))
            }
            None => None,
        };

        let mut indian_quote = vec![moneycontrol.clone(), yahoo.clone()];
        let mut indian_candles = vec![yahoo];
        if let Some(av) = alpha_vantage {
            indian_quote.push(av.clone());
            indian_candles.push(av);
        }
        indian_quote.push(synthetic.clone());
        indian_candles.push(synthetic.clone());

        let global = match get_finnhub_api_key() {
            Some(key) => {
                let finnhub: Arc<dyn MarketDataProvider> = Arc::new(FinnhubProvider::new(key)?);
                vec![finnhub, synthetic.clone()]
            }
            None => {
                tracing::warn!("FINNHUB_API_KEY not set, global mode will serve synthetic data");
                vec![synthetic.clone()]
            }
        };

        Ok(Self {
            indian_index: ProviderChain::new(vec![nse, moneycontrol, synthetic]),
            indian_quote: ProviderChain::new(indian_quote),
            indian_candles: ProviderChain::new(indian_candles),
            global: ProviderChain::new(global),
        })
    }

    pub async fn index_quotes(&self, mode: Mode, index: MarketIndex) -> Result<Vec<Quote>> {
        let chain = match mode {
            Mode::Indian => &self.indian_index,
            Mode::Global => &self.global,
        };
        let quotes = chain.index_quotes(index).await?;
        Ok(quotes.into_iter().map(Quote::repair).collect())
    }

    pub async fn quote(&self, mode: Mode, symbol: &str) -> Result<Quote> {
        let chain = match mode {
            Mode::Indian => &self.indian_quote,
            Mode::Global => &self.global,
        };
        Ok(chain.latest_quote(symbol).await?.repair())
    }

    pub async fn history(
        &self,
        mode: Mode,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Candle>> {
        let chain = match mode {
            Mode::Indian => &self.indian_candles,
            Mode::Global => &self.global,
        };
        let mut candles = chain.historical_candles(symbol, timeframe).await?;
        candles.sort_by_key(|c| c.date);
        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, name: &str, price: f64, change_percent: f64, volume: u64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            name: Some(name.to_string()),
            price,
            change: 0.0,
            change_percent,
            high: price,
            low: price,
            volume,
            previous_close: price,
            market_cap: None,
        }
    }

    fn sample() -> Vec<Quote> {
        vec![
            quote("NSE:TCS", "Tata Consultancy", 4100.0, -0.5, 900_000),
            quote("NSE:RELIANCE", "Reliance Industries", 2900.0, 0.8, 3_000_000),
            quote("NSE:INFY", "Infosys", 1500.0, 1.2, 2_000_000),
        ]
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let mut quotes = sample();
        sort_quotes(&mut quotes, SortField::Name, false);
        assert_eq!(quotes[0].symbol, "NSE:INFY");
        assert_eq!(quotes[2].symbol, "NSE:TCS");
    }

    #[test]
    fn test_sort_by_price_descending() {
        let mut quotes = sample();
        sort_quotes(&mut quotes, SortField::Price, true);
        assert_eq!(quotes[0].symbol, "NSE:TCS");
        assert_eq!(quotes[2].symbol, "NSE:INFY");
    }

    #[test]
    fn test_sort_by_change_and_volume() {
        let mut quotes = sample();
        sort_quotes(&mut quotes, SortField::Change, false);
        assert_eq!(quotes[0].symbol, "NSE:TCS");

        sort_quotes(&mut quotes, SortField::Volume, true);
        assert_eq!(quotes[0].symbol, "NSE:RELIANCE");
    }

    #[test]
    fn test_sort_field_from_str() {
        assert_eq!(SortField::from_str("VOLUME"), Some(SortField::Volume));
        assert_eq!(SortField::from_str("marketcap"), None);
    }

    #[tokio::test]
    async fn test_repair_applied_to_listing() {
        let quotes = crate::providers::SyntheticProvider
            .index_quotes(MarketIndex::Nifty50)
            .await
            .unwrap();
        let repaired: Vec<Quote> = quotes.into_iter().map(Quote::repair).collect();
        assert!(repaired.iter().all(|q| q.high >= q.low));
    }
}
