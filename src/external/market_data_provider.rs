use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{ProviderKind, ProviderQuery};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Upstream(String),

    #[error("missing time series: {0}")]
    MissingSeries(String),

    #[error("no data returned for {0}")]
    EmptySeries(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("{0}")]
    NotConfigured(String),
}

/// Outbound adapter for one market-data vendor.
///
/// Adapters only translate a [`ProviderQuery`] into the vendor's URL and
/// return the raw JSON body; reshaping happens in
/// `services::quote_normalizer`, keyed by [`MarketDataProvider::kind`].
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn fetch_time_series(
        &self,
        symbol: &str,
        query: &ProviderQuery,
    ) -> Result<Value, ProviderError>;

    async fn fetch_profile(&self, symbol: &str) -> Result<Value, ProviderError>;

    async fn search_symbol(&self, keyword: &str) -> Result<Value, ProviderError>;
}
