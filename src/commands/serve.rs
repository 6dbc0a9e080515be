use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::market::MarketDataService;
use crate::server::{self, HealthStats};
use crate::utils::get_port;

pub fn run(port: Option<u16>) {
    let port = port.unwrap_or_else(get_port);
    println!("🚀 Starting stockdash server on port {}", port);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        let market = match MarketDataService::new() {
            Ok(service) => Arc::new(service),
            Err(e) => {
                eprintln!("❌ Failed to initialize providers: {}", e);
                std::process::exit(1);
            }
        };

        let start_time = Instant::now();
        let shared_health_stats = Arc::new(RwLock::new(HealthStats::default()));

        // Uptime tracker
        let uptime_health_stats = shared_health_stats.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
                let mut health = uptime_health_stats.write().await;
                health.uptime_secs = start_time.elapsed().as_secs();
            }
        });

        if let Err(e) = server::serve(market, shared_health_stats, port).await {
            eprintln!("❌ Server error: {}", e);
            std::process::exit(1);
        }
    });
}
