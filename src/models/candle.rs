use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One OHLCV bar for a given date and timeframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar date, serialized as YYYY-MM-DD
    pub date: NaiveDate,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume
    pub volume: u64,
}

impl Candle {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Whether the bar closed above its open
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_date_serializes_as_plain_date() {
        let candle = Candle::new(
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            100.0,
            110.0,
            95.0,
            105.0,
            250_000,
        );
        let json = serde_json::to_value(&candle).unwrap();
        assert_eq!(json["date"], "2024-03-15");
    }

    #[test]
    fn test_is_bullish() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(Candle::new(date, 100.0, 111.0, 99.0, 110.0, 1).is_bullish());
        assert!(!Candle::new(date, 110.0, 111.0, 99.0, 100.0, 1).is_bullish());
    }
}
