use crate::market::MarketDataService;
use crate::models::Mode;

pub fn run(symbol: &str, global: bool) {
    let mode = if global { Mode::Global } else { Mode::Indian };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        println!("📊 Fetching quote for {} ({} mode)...", symbol, mode.as_str());

        let service = match MarketDataService::new() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to initialize providers: {}", e);
                std::process::exit(1);
            }
        };

        let quote = match service.quote(mode, symbol).await {
            Ok(q) => q,
            Err(e) => {
                eprintln!("❌ Failed to fetch quote: {}", e);
                std::process::exit(1);
            }
        };

        println!("✅ {} ({})", quote.display_name(), quote.symbol);
        println!("   Price:      {:.2}", quote.price);
        println!(
            "   Change:     {:+.2} ({:+.2}%)",
            quote.change, quote.change_percent
        );
        println!("   Day range:  {:.2} - {:.2}", quote.low, quote.high);
        println!("   Prev close: {:.2}", quote.previous_close);
        println!("   Volume:     {}", quote.volume);
        if let Some(cap) = quote.market_cap {
            println!("   Market cap: {:.0} Cr", cap);
        }
    });
}
