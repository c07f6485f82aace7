use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::external::market_data_provider::ProviderError;
use crate::models::NewsArticle;
use crate::services::news_filter::{filter_relevant, RelevancePolicy};

/// Configuration for news service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsConfig {
    pub filter_enabled: bool,
    pub policy: RelevancePolicy,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            filter_enabled: true,
            policy: RelevancePolicy::default(),
        }
    }
}

/// Trait for news providers
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsArticle>, ProviderError>;
}

/// Fetch company news for `symbol` in `[from, to]` and apply the relevance
/// filter when enabled.
pub async fn fetch_news(
    provider: &dyn NewsProvider,
    config: NewsConfig,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<NewsArticle>, ProviderError> {
    let articles = provider.fetch_company_news(symbol, from, to).await?;

    if !config.filter_enabled {
        return Ok(articles);
    }

    let total = articles.len();
    let kept = filter_relevant(articles, symbol, config.policy);
    info!("Kept {} of {} news articles for {}", kept.len(), total, symbol);

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::stub::{article, StubNewsProvider};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_news_filters_when_enabled() {
        let provider = StubNewsProvider::new(vec![
            article("MSFT beats estimates", "Cloud growth."),
            article("Generic market update", "Stocks drifted."),
        ]);

        let articles = fetch_news(&provider, NewsConfig::default(), "MSFT", day(2024, 3, 1), day(2024, 3, 8))
            .await
            .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(*provider.last_window.lock().unwrap(), Some((day(2024, 3, 1), day(2024, 3, 8))));
    }

    #[tokio::test]
    async fn test_fetch_news_passes_through_when_disabled() {
        let provider = StubNewsProvider::new(vec![
            article("MSFT beats estimates", "Cloud growth."),
            article("Generic market update", "Stocks drifted."),
        ]);
        let config = NewsConfig { filter_enabled: false, ..NewsConfig::default() };

        let articles = fetch_news(&provider, config, "MSFT", day(2024, 3, 1), day(2024, 3, 8))
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_news_propagates_provider_error() {
        let provider = StubNewsProvider::failing(ProviderError::Upstream("Invalid API key".into()));

        let err = fetch_news(&provider, NewsConfig::default(), "MSFT", day(2024, 3, 1), day(2024, 3, 8))
            .await
            .unwrap_err();

        assert_eq!(err, ProviderError::Upstream("Invalid API key".into()));
    }
}
