//! In-memory providers for router and service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

use crate::external::market_data_provider::{MarketDataProvider, ProviderError};
use crate::models::{NewsArticle, ProviderKind, ProviderQuery};
use crate::services::news_service::NewsProvider;

pub struct StubProvider {
    pub kind: ProviderKind,
    pub series: Result<Value, ProviderError>,
    pub profile: Result<Value, ProviderError>,
    pub search: Value,
    pub calls: AtomicUsize,
    pub last_query: Mutex<Option<ProviderQuery>>,
}

impl StubProvider {
    pub fn new(kind: ProviderKind, series: Value) -> Self {
        Self {
            kind,
            series: Ok(series),
            profile: Ok(json!({})),
            search: json!({}),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn with_profile(mut self, profile: Value) -> Self {
        self.profile = Ok(profile);
        self
    }

    pub fn with_profile_error(mut self, err: ProviderError) -> Self {
        self.profile = Err(err);
        self
    }

    pub fn with_series_error(mut self, err: ProviderError) -> Self {
        self.series = Err(err);
        self
    }

    pub fn with_search(mut self, search: Value) -> Self {
        self.search = search;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch_time_series(
        &self,
        _symbol: &str,
        query: &ProviderQuery,
    ) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.series.clone()
    }

    async fn fetch_profile(&self, _symbol: &str) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profile.clone()
    }

    async fn search_symbol(&self, _keyword: &str) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.search.clone())
    }
}

pub struct StubNewsProvider {
    pub articles: Result<Vec<NewsArticle>, ProviderError>,
    pub calls: AtomicUsize,
    pub last_window: Mutex<Option<(NaiveDate, NaiveDate)>>,
}

impl StubNewsProvider {
    pub fn new(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles: Ok(articles),
            calls: AtomicUsize::new(0),
            last_window: Mutex::new(None),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            articles: Err(err),
            calls: AtomicUsize::new(0),
            last_window: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsProvider for StubNewsProvider {
    async fn fetch_company_news(
        &self,
        _symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some((from, to));
        self.articles.clone()
    }
}

/// Twelve Data shaped payload of `count` daily bars ending at `last_day`,
/// newest first, closes rising by one per day.
pub fn twelvedata_daily_newest_first(last_day: NaiveDate, count: usize) -> Value {
    let values: Vec<Value> = (0..count)
        .map(|i| {
            let day = last_day - Duration::days(i as i64);
            json!({
                "datetime": day.format("%Y-%m-%d").to_string(),
                "open": "0",
                "close": format!("{}.00", 100 + count - i),
            })
        })
        .collect();

    json!({
        "meta": { "symbol": "AAPL", "interval": "1day" },
        "values": values,
        "status": "ok"
    })
}

pub fn article(title: &str, description: &str) -> NewsArticle {
    NewsArticle {
        title: title.to_string(),
        description: description.to_string(),
        url: format!("https://news.example.com/{}", title.len()),
        published_at: None,
    }
}
