use std::sync::Arc;

use crate::external::market_data_provider::MarketDataProvider;
use crate::services::news_service::{NewsConfig, NewsProvider};

#[derive(Clone)]
pub struct AppState {
    pub market_data: Arc<dyn MarketDataProvider>,
    /// `None` when no news vendor is configured
    pub news_provider: Option<Arc<dyn NewsProvider>>,
    pub news_config: NewsConfig,
    pub include_profile: bool,
}
