use crate::market::MarketDataService;
use crate::models::{Mode, Timeframe};

pub fn run(symbol: &str, timeframe: &str, limit: usize, global: bool) {
    let timeframe = match Timeframe::from_str(timeframe) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("❌ {}", msg);
            std::process::exit(1);
        }
    };
    let mode = if global { Mode::Global } else { Mode::Indian };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        println!(
            "📊 Fetching {} {} candles ({} mode)...",
            symbol,
            timeframe,
            mode.as_str()
        );

        let service = match MarketDataService::new() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to initialize providers: {}", e);
                std::process::exit(1);
            }
        };

        let candles = match service.history(mode, symbol, timeframe).await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to fetch history: {}", e);
                std::process::exit(1);
            }
        };

        let start = candles.len().saturating_sub(limit);
        println!(
            "{:<12} {:>10} {:>10} {:>10} {:>10} {:>12}",
            "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"
        );
        for candle in &candles[start..] {
            println!(
                "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
                candle.date, candle.open, candle.high, candle.low, candle.close, candle.volume
            );
        }
        println!(
            "✅ {} candles ({} shown)",
            candles.len(),
            candles.len() - start
        );
    });
}
