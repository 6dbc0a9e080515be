use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{NIFTY_100_ADDITIONS, NIFTY_50};

/// Stock index whose constituents populate the list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketIndex {
    Nifty50,
    Nifty100,
}

impl MarketIndex {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "nifty50" | "nifty-50" | "nifty 50" => Ok(MarketIndex::Nifty50),
            "nifty100" | "nifty-100" | "nifty 100" => Ok(MarketIndex::Nifty100),
            _ => Err(format!(
                "Invalid index: '{}'. Valid values: nifty50, nifty100",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketIndex::Nifty50 => "nifty50",
            MarketIndex::Nifty100 => "nifty100",
        }
    }

    /// URL-encoded index name for the NSE equity-stockIndices endpoint
    pub fn nse_api_param(&self) -> &'static str {
        match self {
            MarketIndex::Nifty50 => "NIFTY%2050",
            MarketIndex::Nifty100 => "NIFTY%20100",
        }
    }

    /// Locally known constituents: (symbol, company name).
    ///
    /// The live NSE endpoint returns the full membership; these tables back
    /// the per-symbol fallbacks and the synthetic generator.
    pub fn constituents(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            MarketIndex::Nifty50 => NIFTY_50.to_vec(),
            MarketIndex::Nifty100 => NIFTY_50
                .iter()
                .chain(NIFTY_100_ADDITIONS)
                .copied()
                .collect(),
        }
    }
}

impl fmt::Display for MarketIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for MarketIndex {
    fn default() -> Self {
        MarketIndex::Nifty50
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_from_str() {
        assert_eq!(
            MarketIndex::from_str("nifty50").unwrap(),
            MarketIndex::Nifty50
        );
        assert_eq!(
            MarketIndex::from_str("NIFTY-100").unwrap(),
            MarketIndex::Nifty100
        );
        assert!(MarketIndex::from_str("sensex").is_err());
    }

    #[test]
    fn test_nse_api_param() {
        assert_eq!(MarketIndex::Nifty50.nse_api_param(), "NIFTY%2050");
        assert_eq!(MarketIndex::Nifty100.nse_api_param(), "NIFTY%20100");
    }

    #[test]
    fn test_constituent_universes_differ() {
        let nifty50 = MarketIndex::Nifty50.constituents();
        let nifty100 = MarketIndex::Nifty100.constituents();
        assert_eq!(nifty50.len(), 50);
        assert_eq!(nifty100.len(), 100);
        assert_eq!(&nifty100[..50], &nifty50[..]);
    }

    #[test]
    fn test_deserialize_from_query_value() {
        let index: MarketIndex = serde_json::from_str(r#""nifty100""#).unwrap();
        assert_eq!(index, MarketIndex::Nifty100);
    }
}
