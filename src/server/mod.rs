pub mod api;

use std::sync::Arc;

use axum::http::Method;
use axum::{extract::FromRef, routing::get, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::market::MarketDataService;

/// Uptime and request counters surfaced on /health
#[derive(Debug, Default, Clone, Serialize)]
pub struct HealthStats {
    pub uptime_secs: u64,
    pub requests_total: u64,
}

pub type SharedHealthStats = Arc<tokio::sync::RwLock<HealthStats>>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketDataService>,
    pub health_stats: SharedHealthStats,
}

impl FromRef<AppState> for Arc<MarketDataService> {
    fn from_ref(app_state: &AppState) -> Arc<MarketDataService> {
        app_state.market.clone()
    }
}

impl FromRef<AppState> for SharedHealthStats {
    fn from_ref(app_state: &AppState) -> SharedHealthStats {
        app_state.health_stats.clone()
    }
}

/// Start the axum server
pub async fn serve(
    market: Arc<MarketDataService>,
    health_stats: SharedHealthStats,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = AppState {
        market,
        health_stats,
    };

    // Dashboards are served from arbitrary origins, so CORS stays open
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/stocks", get(api::list_stocks))
        .route("/stocks/{symbol}", get(api::stock_detail))
        .route("/stocks/{symbol}/history", get(api::stock_history))
        .route("/health", get(api::health))
        .layer(cors)
        .with_state(app_state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("  GET /stocks");
    tracing::info!("  GET /stocks/{{symbol}}");
    tracing::info!("  GET /stocks/{{symbol}}/history");
    tracing::info!("  GET /health");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
