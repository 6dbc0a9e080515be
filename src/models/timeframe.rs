use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart timeframe for historical candles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Daily candles over ~3 months
    Daily,
    /// Weekly candles over ~1 year
    Weekly,
    /// Monthly candles over ~2 years
    Monthly,
}

impl Timeframe {
    /// Parse from string (CLI and query-string form)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "daily" | "1d" | "d" => Ok(Timeframe::Daily),
            "weekly" | "1w" | "w" => Ok(Timeframe::Weekly),
            "monthly" | "1mo" | "m" => Ok(Timeframe::Monthly),
            _ => Err(format!(
                "Invalid timeframe: '{}'. Valid values: daily, weekly, monthly",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }

    /// Yahoo Finance chart interval parameter
    pub fn yahoo_interval(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1wk",
            Timeframe::Monthly => "1mo",
        }
    }

    /// How far back the Yahoo chart query reaches, in days
    pub fn lookback_days(&self) -> i64 {
        match self {
            Timeframe::Daily => 90,
            Timeframe::Weekly => 365,
            Timeframe::Monthly => 730,
        }
    }

    /// Finnhub candle resolution parameter
    pub fn finnhub_resolution(&self) -> &'static str {
        match self {
            Timeframe::Daily => "D",
            Timeframe::Weekly => "W",
            Timeframe::Monthly => "M",
        }
    }

    /// Alpha Vantage time-series function name
    pub fn alpha_vantage_function(&self) -> &'static str {
        match self {
            Timeframe::Daily => "TIME_SERIES_DAILY",
            Timeframe::Weekly => "TIME_SERIES_WEEKLY",
            Timeframe::Monthly => "TIME_SERIES_MONTHLY",
        }
    }

    /// Key of the time-series object in an Alpha Vantage response
    pub fn alpha_vantage_series_key(&self) -> &'static str {
        match self {
            Timeframe::Daily => "Time Series (Daily)",
            Timeframe::Weekly => "Time Series (Weekly)",
            Timeframe::Monthly => "Time Series (Monthly)",
        }
    }

    /// Synthetic series shape: (lookback days, day stride between bars)
    pub fn synthetic_span(&self) -> (i64, i64) {
        match self {
            Timeframe::Daily => (90, 1),
            Timeframe::Weekly => (365, 7),
            Timeframe::Monthly => (730, 30),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Daily
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_default() {
        assert_eq!(Timeframe::default(), Timeframe::Daily);
    }

    #[test]
    fn test_timeframe_from_str() {
        assert_eq!(Timeframe::from_str("daily").unwrap(), Timeframe::Daily);
        assert_eq!(Timeframe::from_str("WEEKLY").unwrap(), Timeframe::Weekly);
        assert_eq!(Timeframe::from_str("1mo").unwrap(), Timeframe::Monthly);
        assert!(Timeframe::from_str("hourly").is_err());
    }

    #[test]
    fn test_provider_formats() {
        assert_eq!(Timeframe::Daily.yahoo_interval(), "1d");
        assert_eq!(Timeframe::Weekly.yahoo_interval(), "1wk");
        assert_eq!(Timeframe::Monthly.finnhub_resolution(), "M");
        assert_eq!(
            Timeframe::Weekly.alpha_vantage_function(),
            "TIME_SERIES_WEEKLY"
        );
    }

    #[test]
    fn test_timeframe_deserialize() {
        let tf: Timeframe = serde_json::from_str(r#""weekly""#).unwrap();
        assert_eq!(tf, Timeframe::Weekly);
    }
}
