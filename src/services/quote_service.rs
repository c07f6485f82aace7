use chrono::NaiveDate;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::models::{NormalizedQuote, RangeToken};
use crate::services::{quote_normalizer, range_resolver};

/// Everything a quote lookup needs besides the provider.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub symbol: String,
    pub range: RangeToken,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub today: NaiveDate,
    pub include_profile: bool,
}

/// Resolve the range, fetch series and profile concurrently, and reshape the
/// result. Either upstream call failing fails the whole request.
pub async fn get_quote(
    provider: &dyn MarketDataProvider,
    request: &QuoteRequest,
) -> Result<NormalizedQuote, AppError> {
    let query = range_resolver::resolve(
        request.range,
        request.start_date,
        request.end_date,
        request.today,
    );
    let symbol = request.symbol.as_str();

    info!(
        "Fetching {} {} from {} ({} to {}, {:?})",
        symbol,
        request.range,
        provider.kind(),
        query.start_date,
        query.end_date,
        query.interval
    );

    let series = async {
        provider
            .fetch_time_series(symbol, &query)
            .await
            .map_err(|e| match e {
                ProviderError::SymbolNotFound(_) => ProviderError::SymbolNotFound(symbol.to_string()),
                other => other,
            })
    };

    let profile = async {
        if !request.include_profile {
            return Ok::<Option<Value>, ProviderError>(None);
        }
        match provider.fetch_profile(symbol).await {
            Ok(raw) => Ok(Some(raw)),
            // the series alone decides whether an unknown ticker is a 404
            Err(ProviderError::SymbolNotFound(msg)) => {
                warn!("No profile for {}: {}", symbol, msg);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    };

    let (series, profile) = tokio::try_join!(series, profile)
        .map_err(|e| {
            error!("Upstream call for {} failed: {}", symbol, e);
            e
        })?;

    let quote = quote_normalizer::normalize(provider.kind(), symbol, &series, profile.as_ref(), &query)
        .map_err(|e| {
            error!("Failed to normalize {} response for {}: {}", provider.kind(), symbol, e);
            e
        })?;

    info!("Normalized {} points for {}", quote.dates.len(), symbol);
    Ok(quote)
}
