pub mod alphavantage;
pub mod finnhub;
pub mod fmp;
pub mod http;
pub mod market_data_provider;
pub mod polygon;
pub mod twelvedata;

#[cfg(test)]
pub mod stub;

use std::sync::Arc;

use crate::external::alphavantage::AlphaVantageProvider;
use crate::external::finnhub::FinnhubProvider;
use crate::external::fmp::FmpProvider;
use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::external::polygon::PolygonProvider;
use crate::external::twelvedata::TwelveDataProvider;
use crate::models::ProviderKind;

/// Build the market-data adapter selected by configuration.
pub fn market_data_provider(
    kind: ProviderKind,
) -> Result<Arc<dyn MarketDataProvider>, ProviderError> {
    let provider: Arc<dyn MarketDataProvider> = match kind {
        ProviderKind::AlphaVantage => Arc::new(AlphaVantageProvider::from_env()?),
        ProviderKind::TwelveData => Arc::new(TwelveDataProvider::from_env()?),
        ProviderKind::Polygon => Arc::new(PolygonProvider::from_env()?),
        ProviderKind::Finnhub => Arc::new(FinnhubProvider::from_env()?),
        ProviderKind::Fmp => Arc::new(FmpProvider::from_env()?),
    };
    Ok(provider)
}
