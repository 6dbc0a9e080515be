use axum::extract::{Path, State};
use axum::http::{header::CACHE_CONTROL, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::market::{sort_quotes, SortField};
use crate::models::{Candle, MarketIndex, Mode, Quote, Timeframe};
use crate::server::{AppState, SharedHealthStats};

const DEFAULT_PER_PAGE: usize = 25;
const MAX_PER_PAGE: usize = 100;

/// Query parameters for /stocks
#[derive(Debug, Deserialize, Default)]
pub struct StockListQuery {
    /// Index to list: nifty50 (default) or nifty100
    pub index: Option<String>,
    /// Case-insensitive substring match on symbol or company name
    pub search: Option<String>,
    /// Sort field: name (default), price, change, volume
    pub sort: Option<String>,
    /// Sort direction: asc (default) or desc
    pub dir: Option<String>,
    /// 1-based page number
    pub page: Option<usize>,
    /// Page size, default 25, capped at 100
    pub per_page: Option<usize>,
    /// Market mode: indian (default) or global
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StockDetailQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub timeframe: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StockListResponse {
    pub index: String,
    pub mode: String,
    pub total: usize,
    pub page: usize,
    #[serde(rename = "perPage")]
    pub per_page: usize,
    pub stocks: Vec<Quote>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub timeframe: String,
    pub candles: Vec<Candle>,
}

fn error_response(err: AppError) -> Response {
    let status = match &err {
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AppError::ProviderExhausted(_) | AppError::Network(_) | AppError::RateLimit => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

fn parse_mode(raw: Option<&str>) -> Result<Mode, AppError> {
    match raw {
        None => Ok(Mode::default()),
        Some(s) => Mode::from_str(s).map_err(AppError::InvalidInput),
    }
}

async fn count_request(health: &SharedHealthStats) {
    health.write().await.requests_total += 1;
}

/// Apply search, sort, and pagination to a fetched listing.
/// Returns the page slice and the pre-pagination total.
pub(crate) fn shape_listing(
    mut quotes: Vec<Quote>,
    query: &StockListQuery,
) -> Result<(Vec<Quote>, usize, usize, usize), AppError> {
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let needle = search.trim().to_lowercase();
        quotes.retain(|q| {
            q.symbol.to_lowercase().contains(&needle)
                || q.display_name().to_lowercase().contains(&needle)
        });
    }

    let field = match query.sort.as_deref() {
        None => SortField::default(),
        Some(s) => SortField::from_str(s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown sort field '{}'", s)))?,
    };
    let descending = match query.dir.as_deref() {
        None | Some("asc") => false,
        Some("desc") => true,
        Some(other) => {
            return Err(AppError::InvalidInput(format!(
                "Unknown sort direction '{}'",
                other
            )))
        }
    };
    sort_quotes(&mut quotes, field, descending);

    let total = quotes.len();
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let page = query.page.unwrap_or(1).max(1);

    let start = (page - 1).saturating_mul(per_page);
    let stocks: Vec<Quote> = quotes.into_iter().skip(start).take(per_page).collect();

    Ok((stocks, total, page, per_page))
}

/// GET /stocks
pub async fn list_stocks(
    State(state): State<AppState>,
    Query(query): Query<StockListQuery>,
) -> Response {
    count_request(&state.health_stats).await;

    let mode = match parse_mode(query.mode.as_deref()) {
        Ok(m) => m,
        Err(e) => return error_response(e),
    };
    let index = match query.index.as_deref() {
        None => MarketIndex::default(),
        Some(s) => match MarketIndex::from_str(s) {
            Ok(i) => i,
            Err(msg) => return error_response(AppError::InvalidInput(msg)),
        },
    };

    let quotes = match state.market.index_quotes(mode, index).await {
        Ok(q) => q,
        Err(e) => return error_response(e),
    };

    let (stocks, total, page, per_page) = match shape_listing(quotes, &query) {
        Ok(shaped) => shaped,
        Err(e) => return error_response(e),
    };

    let body = StockListResponse {
        index: index.as_str().to_string(),
        mode: mode.as_str().to_string(),
        total,
        page,
        per_page,
        stocks,
    };
    ([(CACHE_CONTROL, "public, max-age=30")], Json(body)).into_response()
}

/// GET /stocks/{symbol}
pub async fn stock_detail(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<StockDetailQuery>,
) -> Response {
    count_request(&state.health_stats).await;

    if symbol.trim().is_empty() {
        return error_response(AppError::InvalidInput("Empty symbol".to_string()));
    }
    let mode = match parse_mode(query.mode.as_deref()) {
        Ok(m) => m,
        Err(e) => return error_response(e),
    };

    match state.market.quote(mode, &symbol).await {
        Ok(quote) => ([(CACHE_CONTROL, "public, max-age=30")], Json(quote)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /stocks/{symbol}/history
pub async fn stock_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    count_request(&state.health_stats).await;

    if symbol.trim().is_empty() {
        return error_response(AppError::InvalidInput("Empty symbol".to_string()));
    }
    let mode = match parse_mode(query.mode.as_deref()) {
        Ok(m) => m,
        Err(e) => return error_response(e),
    };
    let timeframe = match query.timeframe.as_deref() {
        None => Timeframe::default(),
        Some(s) => match Timeframe::from_str(s) {
            Ok(t) => t,
            Err(msg) => return error_response(AppError::InvalidInput(msg)),
        },
    };

    match state.market.history(mode, &symbol, timeframe).await {
        Ok(candles) => {
            let body = HistoryResponse {
                symbol,
                timeframe: timeframe.as_str().to_string(),
                candles,
            };
            ([(CACHE_CONTROL, "public, max-age=300")], Json(body)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    count_request(&state.health_stats).await;

    let stats = state.health_stats.read().await.clone();
    Json(json!({
        "status": "ok",
        "uptimeSecs": stats.uptime_secs,
        "requestsTotal": stats.requests_total,
        "modes": [Mode::Indian.as_str(), Mode::Global.as_str()],
    }))
    .into_response()
}
