mod candle;
mod market_index;
mod mode;
mod quote;
mod timeframe;

pub use candle::Candle;
pub use market_index::MarketIndex;
pub use mode::Mode;
pub use quote::{format_symbol_as_name, nse_symbol, pure_symbol, Quote};
pub use timeframe::Timeframe;
