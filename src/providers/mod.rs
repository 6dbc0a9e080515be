pub mod alpha_vantage;
pub mod chain;
pub mod finnhub;
pub mod http;
pub mod moneycontrol;
pub mod nse;
pub mod provider;
pub mod rate_limit;
pub mod synthetic;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageProvider;
pub use chain::ProviderChain;
pub use finnhub::FinnhubProvider;
pub use moneycontrol::MoneyControlProvider;
pub use nse::NseProvider;
pub use provider::MarketDataProvider;
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
