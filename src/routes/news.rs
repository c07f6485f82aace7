use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{NewsResponse, QuoteQueryParams};
use crate::routes::ChartParams;
use crate::services::{news_service, range_resolver, symbol_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/news.json", get(get_news))
}

/// GET /api/news.json
///
/// Company news for the ticker over the selected range (`1W`, `1M`, `1Y` or
/// `custom` with `startDate`/`endDate`; anything else means one month).
async fn get_news(
    State(state): State<AppState>,
    query: Result<Query<QuoteQueryParams>, QueryRejection>,
) -> Result<Json<NewsResponse>, AppError> {
    let params = ChartParams::from_query(query).map_err(|e| {
        warn!("GET /api/news.json - rejected: {}", e);
        e
    })?;

    info!(
        "GET /api/news.json - Fetching news for {} (range={})",
        params.stock, params.range
    );

    let Some(provider) = state.news_provider.as_ref() else {
        error!("News requested but no news provider is configured");
        return Err(AppError::UpstreamUnavailable(
            "News provider is not configured".to_string(),
        ));
    };

    let symbol = symbol_service::resolve_symbol(state.market_data.as_ref(), &params.stock).await?;
    let (from, to) = range_resolver::news_window(
        params.range,
        params.start_date,
        params.end_date,
        Utc::now().date_naive(),
    );

    let articles = news_service::fetch_news(provider.as_ref(), state.news_config, &symbol, from, to)
        .await
        .map_err(|e| {
            error!("Failed to fetch news for {}: {}", symbol, e);
            AppError::from(e)
        })?;

    Ok(Json(NewsResponse { articles }))
}
