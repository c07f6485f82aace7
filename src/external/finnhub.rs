use crate::external::http::get_json;
use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::models::{Interval, NewsArticle, ProviderKind, ProviderQuery};
use crate::services::news_service::NewsProvider;
use crate::services::quote_normalizer::upstream_error;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

const BASE_URL: &str = "https://finnhub.io/api/v1";

pub struct FinnhubProvider {
    client: reqwest::Client,
    api_key: String,
}

impl FinnhubProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("FINNHUB_API_KEY")
            .map_err(|_| ProviderError::NotConfigured("FINNHUB_API_KEY not set".into()))?;

        Ok(Self::new(api_key))
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ProviderError> {
        let request = self
            .client
            .get(format!("{}{}", BASE_URL, path))
            .query(params)
            .query(&[("token", self.api_key.as_str())]);

        get_json(request).await
    }
}

fn resolution(interval: Interval) -> &'static str {
    match interval {
        Interval::FiveMinute => "5",
        Interval::Hourly => "60",
        Interval::Daily => "D",
        Interval::Weekly => "W",
        Interval::Monthly => "M",
    }
}

/// Candle window as unix seconds, covering the whole of both end dates (UTC).
fn candle_window(query: &ProviderQuery) -> (i64, i64) {
    let from = query
        .start_date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default();
    let to = query
        .end_date
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default();
    (from, to)
}

#[derive(Debug, Deserialize)]
struct FinnhubNewsItem {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    datetime: i64,
}

/// Finnhub answers `company-news` with a bare array; anything else is an
/// error object.
fn parse_company_news(raw: Value) -> Result<Vec<NewsArticle>, ProviderError> {
    if !raw.is_array() {
        let msg = upstream_error(&raw).unwrap_or_else(|| "Error fetching news".to_string());
        return Err(ProviderError::Upstream(msg));
    }

    let items: Vec<FinnhubNewsItem> =
        serde_json::from_value(raw).map_err(|e| ProviderError::Parse(e.to_string()))?;

    Ok(items
        .into_iter()
        .map(|item| NewsArticle {
            title: item.headline,
            description: item.summary,
            url: item.url,
            published_at: match item.datetime {
                0 => None,
                ts => DateTime::from_timestamp(ts, 0),
            },
        })
        .collect())
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Finnhub
    }

    async fn fetch_time_series(
        &self,
        symbol: &str,
        query: &ProviderQuery,
    ) -> Result<Value, ProviderError> {
        info!("Finnhub candles for {} ({:?})", symbol, query.interval);
        let (from, to) = candle_window(query);
        self.get(
            "/stock/candle",
            &[
                ("symbol", symbol.to_string()),
                ("resolution", resolution(query.interval).to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
        )
        .await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<Value, ProviderError> {
        self.get("/stock/profile2", &[("symbol", symbol.to_string())]).await
    }

    async fn search_symbol(&self, keyword: &str) -> Result<Value, ProviderError> {
        self.get("/search", &[("q", keyword.to_string())]).await
    }
}

#[async_trait]
impl NewsProvider for FinnhubProvider {
    async fn fetch_company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        info!("Fetching news from Finnhub for {} ({} to {})", symbol, from, to);

        let raw = self
            .get(
                "/company-news",
                &[
                    ("symbol", symbol.to_string()),
                    ("from", from.format("%Y-%m-%d").to_string()),
                    ("to", to.format("%Y-%m-%d").to_string()),
                ],
            )
            .await?;

        let articles = parse_company_news(raw).map_err(|e| {
            warn!("Finnhub news for {} failed: {}", symbol, e);
            e
        })?;

        info!("Fetched {} news articles from Finnhub", articles.len());
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_company_news_maps_fields() {
        let raw = json!([
            {
                "headline": "Apple unveils new chip",
                "summary": "AAPL shares rose.",
                "url": "https://example.com/a",
                "datetime": 1710500000,
                "source": "Reuters"
            },
            { "headline": "No timestamp", "summary": "", "url": "https://example.com/b" }
        ]);

        let articles = parse_company_news(raw).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Apple unveils new chip");
        assert_eq!(articles[0].description, "AAPL shares rose.");
        assert_eq!(articles[0].published_at.unwrap().timestamp(), 1710500000);
        assert!(articles[1].published_at.is_none());
    }

    #[test]
    fn test_parse_company_news_surfaces_error_object() {
        let err = parse_company_news(json!({ "error": "Invalid API key" })).unwrap_err();
        assert_eq!(err, ProviderError::Upstream("Invalid API key".into()));

        let err = parse_company_news(json!({})).unwrap_err();
        assert_eq!(err, ProviderError::Upstream("Error fetching news".into()));
    }

    #[test]
    fn test_candle_window_spans_whole_days() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let query = ProviderQuery {
            interval: Interval::Daily,
            start_date: day,
            end_date: day,
            max_points: None,
        };

        let (from, to) = candle_window(&query);
        assert_eq!(to - from, 86_399);
        assert_eq!(resolution(Interval::Hourly), "60");
    }
}
