use crate::external::http::get_json;
use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::models::{Interval, ProviderKind, ProviderQuery};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

const BASE_URL: &str = "https://api.polygon.io";

pub struct PolygonProvider {
    client: reqwest::Client,
    api_key: String,
}

impl PolygonProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("POLYGON_API_KEY")
            .map_err(|_| ProviderError::NotConfigured("POLYGON_API_KEY not set".into()))?;

        Ok(Self::new(api_key))
    }
}

/// (multiplier, timespan) pair used in the aggregates path
fn timespan(interval: Interval) -> (u32, &'static str) {
    match interval {
        Interval::FiveMinute => (5, "minute"),
        Interval::Hourly => (1, "hour"),
        Interval::Daily => (1, "day"),
        Interval::Weekly => (1, "week"),
        Interval::Monthly => (1, "month"),
    }
}

fn aggregates_url(symbol: &str, query: &ProviderQuery) -> String {
    let (multiplier, span) = timespan(query.interval);
    format!(
        "{}/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
        BASE_URL,
        symbol,
        multiplier,
        span,
        query.start_date.format("%Y-%m-%d"),
        query.end_date.format("%Y-%m-%d"),
    )
}

#[async_trait]
impl MarketDataProvider for PolygonProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Polygon
    }

    async fn fetch_time_series(
        &self,
        symbol: &str,
        query: &ProviderQuery,
    ) -> Result<Value, ProviderError> {
        info!("Polygon aggregates for {} ({:?})", symbol, query.interval);
        let request = self.client.get(aggregates_url(symbol, query)).query(&[
            ("adjusted", "true"),
            ("sort", "asc"),
            ("limit", "50000"),
            ("apiKey", self.api_key.as_str()),
        ]);

        get_json(request).await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(format!("{}/v3/reference/tickers/{}", BASE_URL, symbol))
            .query(&[("apiKey", self.api_key.as_str())]);

        get_json(request).await
    }

    async fn search_symbol(&self, keyword: &str) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(format!("{}/v3/reference/tickers", BASE_URL))
            .query(&[
                ("search", keyword),
                ("active", "true"),
                ("market", "stocks"),
                ("limit", "5"),
                ("apiKey", self.api_key.as_str()),
            ]);

        get_json(request).await
    }
}
