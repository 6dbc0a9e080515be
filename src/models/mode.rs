/// Market mode for API endpoints
///
/// Determines which provider chain serves a query.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Indian equities (default)
    ///
    /// Providers: NSE India, MoneyControl, Yahoo Finance, synthetic fallback
    #[serde(alias = "in", alias = "nse")]
    Indian,

    /// Global symbols via Finnhub
    #[serde(alias = "world")]
    Global,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Indian
    }
}

impl Mode {
    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "indian" | "in" | "nse" => Ok(Mode::Indian),
            "global" | "world" => Ok(Mode::Global),
            _ => Err(format!(
                "Invalid mode: '{}'. Valid values: indian, global",
                s
            )),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Indian => "indian",
            Mode::Global => "global",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_default() {
        assert_eq!(Mode::default(), Mode::Indian);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::from_str("indian").unwrap(), Mode::Indian);
        assert_eq!(Mode::from_str("NSE").unwrap(), Mode::Indian);
        assert_eq!(Mode::from_str("global").unwrap(), Mode::Global);
        assert!(Mode::from_str("crypto").is_err());
    }

    #[test]
    fn test_mode_serialize() {
        assert_eq!(serde_json::to_string(&Mode::Indian).unwrap(), r#""indian""#);
        assert_eq!(serde_json::to_string(&Mode::Global).unwrap(), r#""global""#);
    }

    #[test]
    fn test_mode_deserialize_aliases() {
        let nse: Mode = serde_json::from_str(r#""nse""#).unwrap();
        assert_eq!(nse, Mode::Indian);

        let world: Mode = serde_json::from_str(r#""world""#).unwrap();
        assert_eq!(world, Mode::Global);
    }
}
