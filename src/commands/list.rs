use crate::market::{sort_quotes, MarketDataService, SortField};
use crate::models::{MarketIndex, Mode};

pub fn run(index: &str, sort: &str, desc: bool, global: bool) {
    let index = match MarketIndex::from_str(index) {
        Ok(i) => i,
        Err(msg) => {
            eprintln!("❌ {}", msg);
            std::process::exit(1);
        }
    };
    let field = match SortField::from_str(sort) {
        Some(f) => f,
        None => {
            eprintln!("❌ Invalid sort field: '{}'. Valid values: name, price, change, volume", sort);
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
        println!("📊 Fetching {} quotes ({} mode)...", index, mode.as_str());

        let service = match MarketDataService::new() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to initialize providers: {}", e);
                std::process::exit(1);
            }
        };

        let mut quotes = match service.index_quotes(mode, index).await {
            Ok(q) => q,
            Err(e) => {
                eprintln!("❌ Failed to fetch quotes: {}", e);
                std::process::exit(1);
            }
        };
        sort_quotes(&mut quotes, field, desc);

        println!(
            "{:<16} {:<32} {:>10} {:>8} {:>12}",
            "SYMBOL", "NAME", "PRICE", "CHG%", "VOLUME"
        );
        for quote in &quotes {
            println!(
                "{:<16} {:<32} {:>10.2} {:>7.2}% {:>12}",
                quote.symbol,
                quote.display_name(),
                quote.price,
                quote.change_percent,
                quote.volume
            );
        }
        println!("✅ {} quotes", quotes.len());
    });
}
