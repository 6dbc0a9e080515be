/// Get server port from environment variable or use default
pub fn get_port() -> u16 {
    std::env::var("STOCKDASH_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

/// Finnhub API key, required for global-mode quotes
pub fn get_finnhub_api_key() -> Option<String> {
    std::env::var("FINNHUB_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// Alpha Vantage API key; the provider is skipped when unset
pub fn get_alpha_vantage_api_key() -> Option<String> {
    std::env::var("ALPHAVANTAGE_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}
