use crate::external::http::get_json;
use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::models::{Interval, ProviderKind, ProviderQuery};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

pub struct FmpProvider {
    client: reqwest::Client,
    api_key: String,
}

impl FmpProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("FMP_API_KEY")
            .map_err(|_| ProviderError::NotConfigured("FMP_API_KEY not set".into()))?;

        Ok(Self::new(api_key))
    }
}

/// FMP serves intraday bars from `historical-chart/{interval}` and anything
/// coarser from the daily `historical-price-full` endpoint; weekly and monthly
/// ranges come back as daily closes over the same window.
fn series_path(symbol: &str, interval: Interval) -> String {
    match interval {
        Interval::FiveMinute => format!("/historical-chart/5min/{}", symbol),
        Interval::Hourly => format!("/historical-chart/1hour/{}", symbol),
        Interval::Daily | Interval::Weekly | Interval::Monthly => {
            format!("/historical-price-full/{}", symbol)
        }
    }
}

#[async_trait]
impl MarketDataProvider for FmpProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Fmp
    }

    async fn fetch_time_series(
        &self,
        symbol: &str,
        query: &ProviderQuery,
    ) -> Result<Value, ProviderError> {
        info!("FMP historical prices for {} ({:?})", symbol, query.interval);
        let from = query.start_date.format("%Y-%m-%d").to_string();
        let to = query.end_date.format("%Y-%m-%d").to_string();
        let request = self
            .client
            .get(format!("{}{}", BASE_URL, series_path(symbol, query.interval)))
            .query(&[
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("apikey", self.api_key.as_str()),
            ]);

        get_json(request).await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(format!("{}/profile/{}", BASE_URL, symbol))
            .query(&[("apikey", self.api_key.as_str())]);

        get_json(request).await
    }

    async fn search_symbol(&self, keyword: &str) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(format!("{}/search", BASE_URL))
            .query(&[
                ("query", keyword),
                ("limit", "5"),
                ("apikey", self.api_key.as_str()),
            ]);

        get_json(request).await
    }
}
