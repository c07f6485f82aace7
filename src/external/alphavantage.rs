use crate::external::http::get_json;
use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::models::{Interval, ProviderKind, ProviderQuery};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

const BASE_URL: &str = "https://www.alphavantage.co/query";

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("ALPHAVANTAGE_API_KEY")
            .map_err(|_| ProviderError::NotConfigured("ALPHAVANTAGE_API_KEY not set".into()))?;

        Ok(Self::new(api_key))
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(BASE_URL)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())]);

        get_json(request).await
    }
}

/// Alpha Vantage has no date filter, so the function and `outputsize` are
/// picked to return at least as many points as the range needs. The
/// normalizer trims the rest.
fn series_params(query: &ProviderQuery) -> Vec<(&'static str, &'static str)> {
    // compact = latest 100 points, full = entire history
    let outputsize = match query.max_points {
        Some(n) if n <= 100 => "compact",
        _ => "full",
    };

    match query.interval {
        Interval::FiveMinute => vec![
            ("function", "TIME_SERIES_INTRADAY"),
            ("interval", "5min"),
            ("outputsize", outputsize),
        ],
        Interval::Hourly => vec![
            ("function", "TIME_SERIES_INTRADAY"),
            ("interval", "60min"),
            ("outputsize", outputsize),
        ],
        Interval::Daily => vec![("function", "TIME_SERIES_DAILY"), ("outputsize", outputsize)],
        Interval::Weekly => vec![("function", "TIME_SERIES_WEEKLY")],
        Interval::Monthly => vec![("function", "TIME_SERIES_MONTHLY")],
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AlphaVantage
    }

    async fn fetch_time_series(
        &self,
        symbol: &str,
        query: &ProviderQuery,
    ) -> Result<Value, ProviderError> {
        let mut params: Vec<(&str, &str)> = series_params(query);
        params.push(("symbol", symbol));
        info!("Alpha Vantage time series for {} ({:?})", symbol, query.interval);
        self.query(&params).await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<Value, ProviderError> {
        self.query(&[("function", "OVERVIEW"), ("symbol", symbol)]).await
    }

    async fn search_symbol(&self, keyword: &str) -> Result<Value, ProviderError> {
        self.query(&[("function", "SYMBOL_SEARCH"), ("keywords", keyword)]).await
    }
}
