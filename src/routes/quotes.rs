use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{NormalizedQuote, QuoteQueryParams};
use crate::routes::ChartParams;
use crate::services::quote_service::{self, QuoteRequest};
use crate::services::symbol_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/fetch.json", get(fetch_quote))
}

/// GET /api/fetch.json
///
/// Query parameters:
/// - `stock`: ticker or company name
/// - `range`: `1D`, `1W`, `1M`, `1Y`, `ALL` or `custom`
/// - `startDate` / `endDate`: `YYYY-MM-DD`, used with `range=custom`
pub async fn fetch_quote(
    State(state): State<AppState>,
    query: Result<Query<QuoteQueryParams>, QueryRejection>,
) -> Result<Json<NormalizedQuote>, AppError> {
    let params = ChartParams::from_query(query).map_err(|e| {
        warn!("GET /api/fetch.json - rejected: {}", e);
        e
    })?;

    info!(
        "GET /api/fetch.json - Fetching {} (range={})",
        params.stock, params.range
    );

    let symbol = symbol_service::resolve_symbol(state.market_data.as_ref(), &params.stock).await?;

    let request = QuoteRequest {
        symbol,
        range: params.range,
        start_date: params.start_date,
        end_date: params.end_date,
        today: Utc::now().date_naive(),
        include_profile: state.include_profile,
    };

    let quote = quote_service::get_quote(state.market_data.as_ref(), &request)
        .await
        .map_err(|e| {
            error!("Failed to fetch quote for {}: {}", request.symbol, e);
            e
        })?;

    Ok(Json(quote))
}
