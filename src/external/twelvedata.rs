use crate::external::http::get_json;
use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::models::{Interval, ProviderKind, ProviderQuery};
use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;
use tracing::info;

const BASE_URL: &str = "https://api.twelvedata.com";

pub struct TwelveDataProvider {
    client: reqwest::Client,
    api_key: String,
}

impl TwelveDataProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("TWELVEDATA_API_KEY")
            .map_err(|_| ProviderError::NotConfigured("TWELVEDATA_API_KEY not set".into()))?;

        Ok(Self::new(api_key))
    }
}

fn interval_param(interval: Interval) -> &'static str {
    match interval {
        Interval::FiveMinute => "5min",
        Interval::Hourly => "1h",
        Interval::Daily => "1day",
        Interval::Weekly => "1week",
        Interval::Monthly => "1month",
    }
}

/// Twelve Data treats `end_date` as exclusive, so the window is widened by a
/// day to include the last requested date.
fn series_params(symbol: &str, query: &ProviderQuery) -> Vec<(&'static str, String)> {
    let end_exclusive = query.end_date + Duration::days(1);
    vec![
        ("symbol", symbol.to_string()),
        ("interval", interval_param(query.interval).to_string()),
        ("start_date", query.start_date.format("%Y-%m-%d").to_string()),
        ("end_date", end_exclusive.format("%Y-%m-%d").to_string()),
        // max allowed, the date window is the real bound
        ("outputsize", "5000".to_string()),
    ]
}

#[async_trait]
impl MarketDataProvider for TwelveDataProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::TwelveData
    }

    async fn fetch_time_series(
        &self,
        symbol: &str,
        query: &ProviderQuery,
    ) -> Result<Value, ProviderError> {
        info!("Twelve Data time series for {} ({:?})", symbol, query.interval);
        let request = self
            .client
            .get(format!("{}/time_series", BASE_URL))
            .query(&series_params(symbol, query))
            .query(&[("apikey", self.api_key.as_str())]);

        get_json(request).await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(format!("{}/profile", BASE_URL))
            .query(&[("symbol", symbol), ("apikey", self.api_key.as_str())]);

        get_json(request).await
    }

    async fn search_symbol(&self, keyword: &str) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(format!("{}/symbol_search", BASE_URL))
            .query(&[
                ("symbol", keyword),
                ("outputsize", "5"),
                ("apikey", self.api_key.as_str()),
            ]);

        get_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_end_date_is_widened_by_one_day() {
        let query = ProviderQuery {
            interval: Interval::Daily,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            max_points: Some(30),
        };

        let params = series_params("AAPL", &query);

        assert!(params.contains(&("interval", "1day".to_string())));
        assert!(params.contains(&("start_date", "2024-02-01".to_string())));
        assert!(params.contains(&("end_date", "2024-03-01".to_string())));
    }

    #[test]
    fn test_interval_vocabulary() {
        assert_eq!(interval_param(Interval::FiveMinute), "5min");
        assert_eq!(interval_param(Interval::Hourly), "1h");
        assert_eq!(interval_param(Interval::Weekly), "1week");
        assert_eq!(interval_param(Interval::Monthly), "1month");
    }
}
