use serde::{Deserialize, Serialize};

use crate::constants::NSE_PREFIX;

/// Point-in-time price record for a single symbol
///
/// Field names serialize in camelCase so the payload matches what dashboard
/// frontends expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Symbol, usually exchange-prefixed (e.g. "NSE:RELIANCE")
    pub symbol: String,

    /// Company name when a provider supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Last traded price
    pub price: f64,

    /// Absolute change since previous close
    pub change: f64,

    /// Percent change since previous close
    pub change_percent: f64,

    /// Day high
    pub high: f64,

    /// Day low
    pub low: f64,

    /// Traded volume
    pub volume: u64,

    /// Previous close
    pub previous_close: f64,

    /// Market cap in crores, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

impl Quote {
    /// Name to show in lists: company name, falling back to the symbol
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }

    /// Fill gaps a provider left behind so every quote is renderable.
    ///
    /// Rules carried over from the upstream data sources: a missing high/low
    /// becomes a 5% band around the price, a missing previous close is
    /// derived from price minus change, and the percent change is recomputed
    /// when absent but derivable.
    pub fn repair(mut self) -> Self {
        if self.high <= 0.0 {
            self.high = self.price * 1.05;
        }
        if self.low <= 0.0 {
            self.low = self.price * 0.95;
        }
        if self.previous_close <= 0.0 {
            self.previous_close = self.price - self.change;
        }
        if self.change_percent == 0.0 && self.change != 0.0 && self.previous_close > 0.0 {
            self.change_percent = self.change / self.previous_close * 100.0;
        }
        // The reported day range must bracket the last price
        if self.high < self.price {
            self.high = self.price;
        }
        if self.low > self.price {
            self.low = self.price;
        }
        self
    }
}

/// Strip the exchange prefix: "NSE:RELIANCE" -> "RELIANCE"
pub fn pure_symbol(symbol: &str) -> &str {
    match symbol.split_once(':') {
        Some((_, rest)) => rest,
        None => symbol,
    }
}

/// Prefix a bare symbol with the NSE exchange tag
pub fn nse_symbol(symbol: &str) -> String {
    format!("{}{}", NSE_PREFIX, symbol)
}

/// Turn a bare symbol into a readable display name.
///
/// Drops the exchange prefix, replaces dots with spaces and titlecases each
/// word ("NSE:TATAMOTORS" -> "Tatamotors", "RELIANCE.BSE" -> "Reliance Bse").
pub fn format_symbol_as_name(symbol: &str) -> String {
    pure_symbol(symbol)
        .replace('.', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
